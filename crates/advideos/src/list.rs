//! Streaming video list.
//!
//! A fetch task drives the client's paginated read and a decode task turns
//! raw entries into [`Video`]s. The two are joined by a bounded relay and
//! fail fast: the first error from either side ends the read and drops the
//! other side.

use serde_json::value::RawValue;
use tokio::sync::mpsc;
use tracing::debug;

use crate::LIST_PAGE_SIZE;
use crate::error::VideoError;
use crate::service::VideoService;
use crate::types::{ADVIDEO_FIELDS, Video};

/// Raw entries buffered between fetch and decode: one full page.
const RELAY_CAPACITY: usize = LIST_PAGE_SIZE as usize;

impl VideoService {
    /// Streams every video of ad account `account_id` into `out`.
    ///
    /// Videos arrive in the order pages are returned. `out` is never
    /// closed here; if its receiver goes away the read stops with
    /// [`VideoError::OutputClosed`].
    pub async fn read_list(
        &self,
        account_id: &str,
        out: &mpsc::Sender<Video>,
    ) -> Result<(), VideoError> {
        let route = Self::account_route(account_id)?
            .fields(ADVIDEO_FIELDS)
            .limit(LIST_PAGE_SIZE)
            .to_string();

        self.check_cancelled()?;

        let (relay_tx, mut relay_rx) = mpsc::channel::<Box<RawValue>>(RELAY_CAPACITY);

        // Dropping relay_tx when the fetch ends closes the relay.
        let fetch = async {
            self.api
                .read_list(&route, relay_tx)
                .await
                .map_err(VideoError::from)
        };

        let decode = async {
            let mut count = 0usize;
            while let Some(raw) = relay_rx.recv().await {
                let video: Video = serde_json::from_str(raw.get())?;
                out.send(video)
                    .await
                    .map_err(|_| VideoError::OutputClosed)?;
                count += 1;
            }
            Ok::<usize, VideoError>(count)
        };

        let ((), count) = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(VideoError::Cancelled),
            result = async { tokio::try_join!(fetch, decode) } => result?,
        };

        debug!(account = %account_id, videos = count, "video list read");
        Ok(())
    }
}
