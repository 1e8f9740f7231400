//! Ad video schema and upload wire types.

use serde::{Deserialize, Deserializer, Serialize};

/// Fields requested for every video read.
pub const ADVIDEO_FIELDS: &[&str] = &[
    "title",
    "id",
    "picture",
    "description",
    "from",
    "format",
    "length",
    "status",
];

/// An ad video as returned by the Graph API.
///
/// Every field except `id` may be missing depending on the requested
/// field set, so they all default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content_category: String,
    #[serde(default)]
    pub created_time: String,
    #[serde(default)]
    pub updated_time: String,
    #[serde(default)]
    pub embed_html: String,
    #[serde(default)]
    pub embeddable: bool,
    #[serde(default)]
    pub icon: String,
    /// Duration in seconds.
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub monetization_status: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub is_crosspost_video: bool,
    #[serde(default)]
    pub is_crossposting_eligible: bool,
    #[serde(default)]
    pub is_instagram_eligible: bool,
    #[serde(default)]
    pub permalink_url: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub auto_generated_captions: Captions,
    /// One entry per rendition.
    #[serde(default)]
    pub format: Vec<VideoFormat>,
    #[serde(default, rename = "from")]
    pub owner: VideoOwner,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default)]
    pub status: VideoStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Captions {
    #[serde(default)]
    pub data: Vec<CaptionRef>,
    #[serde(default)]
    pub paging: CaptionPaging,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionPaging {
    #[serde(default)]
    pub cursors: CaptionCursors,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptionCursors {
    #[serde(default)]
    pub before: String,
    #[serde(default)]
    pub after: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFormat {
    #[serde(default)]
    pub embed_html: String,
    #[serde(default)]
    pub filter: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub width: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoOwner {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Privacy {
    #[serde(default)]
    pub allow: String,
    #[serde(default)]
    pub deny: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub friends: String,
    #[serde(default)]
    pub networks: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStatus {
    /// e.g. `"ready"`, `"processing"`, `"error"`.
    #[serde(default)]
    pub video_status: String,
}

// ---------------------------------------------------------------------------
// Upload protocol
// ---------------------------------------------------------------------------

/// Phase tag sent with every upload call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadPhase {
    Start,
    Transfer,
    Finish,
}

impl UploadPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadPhase::Start => "start",
            UploadPhase::Transfer => "transfer",
            UploadPhase::Finish => "finish",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StartRequest {
    pub upload_phase: UploadPhase,
    pub file_size: u64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct FinishRequest {
    pub upload_phase: UploadPhase,
    pub upload_session_id: String,
    pub title: String,
}

/// Response to the start phase.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StartResponse {
    pub upload_session_id: String,
    pub video_id: String,
    #[serde(deserialize_with = "offset")]
    pub start_offset: u64,
    #[serde(deserialize_with = "offset")]
    pub end_offset: u64,
}

/// Response to a transfer phase: the next window.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransferResponse {
    #[serde(deserialize_with = "offset")]
    pub start_offset: u64,
    #[serde(deserialize_with = "offset")]
    pub end_offset: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct FinishResponse {
    #[serde(default)]
    pub success: bool,
}

/// Offsets arrive as decimal strings; bare numbers are accepted too.
fn offset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::Num(n) => Ok(n),
    }
}
