//! Transport-agnostic Graph API seam.
//!
//! [`Client`](crate::Client) implements this trait over HTTP. Resource
//! bindings only see the trait, which keeps them testable with mocks.

use std::future::Future;
use std::pin::Pin;

use serde_json::value::RawValue;
use tokio::sync::mpsc;

use crate::error::GraphError;

/// Boxed, sendable future returned by [`GraphApi`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Authenticated Graph API operations.
///
/// Successful calls return the raw response body; callers decode it into
/// their own types.
pub trait GraphApi: Send + Sync {
    /// GETs `route` and returns the JSON body.
    fn get_json<'a>(&'a self, route: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GraphError>>;

    /// POSTs `body` as JSON to `route` and returns the JSON body.
    fn post_json<'a>(
        &'a self,
        route: &'a str,
        body: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<Vec<u8>, GraphError>>;

    /// POSTs a multipart form with `fields` and one file part holding `data`.
    fn upload_file<'a>(
        &'a self,
        route: &'a str,
        filename: &'a str,
        data: Vec<u8>,
        fields: &'a [(&'static str, String)],
    ) -> BoxFuture<'a, Result<Vec<u8>, GraphError>>;

    /// Reads every page of a list endpoint, sending each raw entry to `out`.
    ///
    /// Follows `paging.next` until the last page. `out` is dropped when the
    /// read ends, which closes the channel for the receiver.
    fn read_list<'a>(
        &'a self,
        route: &'a str,
        out: mpsc::Sender<Box<RawValue>>,
    ) -> BoxFuture<'a, Result<(), GraphError>>;
}
