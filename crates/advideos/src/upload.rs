//! Chunked video upload.
//!
//! The upload runs three phases against `/act_{id}/advideos`:
//!
//! 1. **start**: open a session for `file_size` bytes; the server answers
//!    with the first byte window `[start_offset, end_offset)`
//! 2. **transfer**: send the next `min(window, remaining)` bytes; every
//!    answer carries the next window
//! 3. **finish**: close the session with the video title
//!
//! The window is the server's flow control: chunk sizes always come from
//! the last answer, never from a client constant.

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info};

use crate::error::VideoError;
use crate::service::VideoService;
use crate::types::{
    FinishRequest, FinishResponse, StartRequest, StartResponse, TransferResponse, UploadPhase,
    Video,
};

/// Server-granted state of one upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadWindow {
    session_id: String,
    video_id: String,
    start_offset: u64,
    end_offset: u64,
}

impl UploadWindow {
    /// Opens the window from the start-phase answer.
    pub fn from_start(resp: StartResponse) -> Result<Self, VideoError> {
        if resp.upload_session_id.is_empty() {
            return Err(VideoError::Protocol(
                "start response has no upload_session_id".into(),
            ));
        }
        if resp.video_id.is_empty() {
            return Err(VideoError::Protocol("start response has no video_id".into()));
        }
        if resp.end_offset < resp.start_offset {
            return Err(VideoError::Protocol(format!(
                "inverted window [{}, {})",
                resp.start_offset, resp.end_offset
            )));
        }

        Ok(Self {
            session_id: resp.upload_session_id,
            video_id: resp.video_id,
            start_offset: resp.start_offset,
            end_offset: resp.end_offset,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    pub fn start_offset(&self) -> u64 {
        self.start_offset
    }

    pub fn end_offset(&self) -> u64 {
        self.end_offset
    }

    /// Size of the next chunk given `remaining` unsent bytes.
    ///
    /// Never larger than the window or than `remaining`. An empty window
    /// while bytes remain would stall the upload, so it is rejected.
    pub fn next_chunk_len(&self, remaining: u64) -> Result<u64, VideoError> {
        let window = self.end_offset - self.start_offset;
        if window == 0 {
            return Err(VideoError::Protocol(format!(
                "empty window at offset {} with {remaining} bytes left",
                self.start_offset
            )));
        }
        Ok(window.min(remaining))
    }

    /// Form fields of a transfer call at the current offset.
    pub fn transfer_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("upload_phase", UploadPhase::Transfer.as_str().to_string()),
            ("upload_session_id", self.session_id.clone()),
            ("start_offset", self.start_offset.to_string()),
        ]
    }

    /// Moves to the window granted by a transfer answer.
    ///
    /// Offsets never move backwards.
    pub fn advance(&mut self, resp: TransferResponse) -> Result<(), VideoError> {
        if resp.start_offset < self.start_offset || resp.end_offset < resp.start_offset {
            return Err(VideoError::Protocol(format!(
                "window moved from [{}, {}) to [{}, {})",
                self.start_offset, self.end_offset, resp.start_offset, resp.end_offset
            )));
        }
        self.start_offset = resp.start_offset;
        self.end_offset = resp.end_offset;
        Ok(())
    }
}

impl VideoService {
    /// Uploads `size` bytes read from `content` into ad account
    /// `account_id` and returns the created video.
    ///
    /// `content` must yield at least `size` bytes; a short stream fails
    /// with [`VideoError::Io`]. Any failure aborts the upload and the
    /// session is abandoned on the server.
    pub async fn upload<R>(
        &self,
        account_id: &str,
        title: &str,
        size: u64,
        mut content: R,
    ) -> Result<Video, VideoError>
    where
        R: AsyncRead + Unpin + Send,
    {
        let route = Self::account_route(account_id)?.to_string();

        // 1. Start
        self.check_cancelled()?;
        let start = serde_json::to_value(StartRequest {
            upload_phase: UploadPhase::Start,
            file_size: size,
        })?;
        let body = self.guard(self.api.post_json(&route, &start)).await?;
        let mut window = UploadWindow::from_start(serde_json::from_slice(&body)?)?;

        info!(
            account = %account_id,
            session = %window.session_id(),
            video_id = %window.video_id(),
            size,
            "upload session started"
        );

        // 2. Transfer
        let mut remaining = size;
        let mut chunks = 0u32;
        while remaining > 0 {
            self.check_cancelled()?;

            let chunk_len = window.next_chunk_len(remaining)?;
            let len = usize::try_from(chunk_len).map_err(|_| {
                VideoError::Protocol(format!("window of {chunk_len} bytes is not addressable"))
            })?;
            let mut chunk = vec![0u8; len];
            content.read_exact(&mut chunk).await?;

            let fields = window.transfer_fields();
            let body = self
                .guard(self.api.upload_file(&route, title, chunk, &fields))
                .await?;
            window.advance(serde_json::from_slice(&body)?)?;

            remaining -= chunk_len;
            chunks += 1;

            debug!(
                session = %window.session_id(),
                chunk = chunks,
                bytes = chunk_len,
                remaining,
                next_start = window.start_offset(),
                next_end = window.end_offset(),
                "chunk transferred"
            );
        }

        // 3. Finish
        self.check_cancelled()?;
        let finish = serde_json::to_value(FinishRequest {
            upload_phase: UploadPhase::Finish,
            upload_session_id: window.session_id().to_string(),
            title: title.to_string(),
        })?;
        let body = self.guard(self.api.post_json(&route, &finish)).await?;
        let resp: FinishResponse = serde_json::from_slice(&body)?;
        if !resp.success {
            return Err(VideoError::FinishRejected);
        }

        info!(
            session = %window.session_id(),
            video_id = %window.video_id(),
            chunks,
            "upload finished"
        );

        self.get(window.video_id())
            .await?
            .ok_or_else(|| VideoError::MissingAfterUpload(window.video_id().to_string()))
    }
}
