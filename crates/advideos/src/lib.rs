//! Ad video (`advideos`) binding for the marketing Graph API.
//!
//! Three operations over a [`GraphApi`](adgraph_client::GraphApi):
//!
//! 1. **Get**: fetch one video, `Ok(None)` when it does not exist
//! 2. **Upload**: start / transfer / finish chunked upload driven by the
//!    server's byte window
//! 3. **List**: concurrent fetch + decode pipeline streaming every video
//!    of an ad account into a channel

pub mod error;
pub mod list;
pub mod service;
pub mod types;
pub mod upload;

#[cfg(test)]
mod testing;

pub use error::VideoError;
pub use service::VideoService;
pub use types::{
    ADVIDEO_FIELDS, CaptionRef, Captions, Privacy, Video, VideoFormat, VideoOwner, VideoStatus,
};
pub use upload::UploadWindow;

/// Graph API version this binding targets.
pub const API_VERSION: &str = "v20.0";

/// Page size requested by [`VideoService::read_list`].
pub const LIST_PAGE_SIZE: u32 = 1000;
