//! Video service: single-video reads plus the shared plumbing used by
//! upload and list.

use std::future::Future;
use std::sync::Arc;

use adgraph_client::route::segment;
use adgraph_client::{GraphApi, GraphError, Route};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::API_VERSION;
use crate::error::VideoError;
use crate::types::{ADVIDEO_FIELDS, Video};

/// Works with the `advideos` of ad accounts.
///
/// Every network call is raced against the service's cancellation token;
/// once cancelled, in-flight and future operations fail with
/// [`VideoError::Cancelled`].
pub struct VideoService {
    pub(crate) api: Arc<dyn GraphApi>,
    pub(crate) cancel: CancellationToken,
}

impl VideoService {
    pub fn new(api: Arc<dyn GraphApi>) -> Self {
        Self::with_cancel(api, CancellationToken::new())
    }

    /// Creates a service bound to an existing cancellation token.
    pub fn with_cancel(api: Arc<dyn GraphApi>, cancel: CancellationToken) -> Self {
        Self { api, cancel }
    }

    /// Returns the token that cancels this service's operations.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Returns a single video, or `None` if it does not exist.
    pub async fn get(&self, id: &str) -> Result<Option<Video>, VideoError> {
        if id.is_empty() {
            return Err(VideoError::InvalidArgument("video id is empty".into()));
        }

        let route = Route::new(API_VERSION, format!("/{}", segment(id)))
            .fields(ADVIDEO_FIELDS)
            .to_string();

        match self.guard(self.api.get_json(&route)).await {
            Ok(body) => Ok(Some(serde_json::from_slice(&body)?)),
            Err(VideoError::Graph(e)) if e.is_not_found() => {
                debug!(video_id = %id, "video not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// `/act_{account_id}/advideos` under the binding's API version.
    pub(crate) fn account_route(account_id: &str) -> Result<Route, VideoError> {
        if account_id.is_empty() {
            return Err(VideoError::InvalidArgument("account id is empty".into()));
        }
        Ok(Route::new(
            API_VERSION,
            format!("/act_{}/advideos", segment(account_id)),
        ))
    }

    /// Runs a Graph call unless the service is cancelled first.
    pub(crate) async fn guard<T, F>(&self, call: F) -> Result<T, VideoError>
    where
        F: Future<Output = Result<T, GraphError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(VideoError::Cancelled),
            result = call => result.map_err(VideoError::from),
        }
    }

    pub(crate) fn check_cancelled(&self) -> Result<(), VideoError> {
        if self.cancel.is_cancelled() {
            Err(VideoError::Cancelled)
        } else {
            Ok(())
        }
    }
}
