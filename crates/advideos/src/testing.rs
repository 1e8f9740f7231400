//! In-memory [`GraphApi`] used by the unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use adgraph_client::{BoxFuture, GraphApi, GraphError};
use serde_json::value::RawValue;
use tokio::sync::mpsc;

/// One recorded transfer call.
#[derive(Debug, Clone)]
pub(crate) struct TransferCall {
    pub filename: String,
    pub data: Vec<u8>,
    pub fields: Vec<(&'static str, String)>,
}

impl TransferCall {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Mock Graph backend.
///
/// Upload calls behave like the real endpoint: the start phase opens a
/// session and every transfer acknowledges the bytes it received and
/// grants the next window from `windows` (the last entry repeats).
pub(crate) struct MockGraph {
    videos: HashMap<String, String>,
    get_error: Option<(u16, String)>,
    windows: Vec<u64>,
    start_error: Option<u16>,
    fail_transfer: Option<usize>,
    finish_success: bool,
    list_entries: Vec<String>,
    list_error: Option<u16>,
    list_hang: bool,

    pub gets: Mutex<Vec<String>>,
    pub posts: Mutex<Vec<(String, serde_json::Value)>>,
    pub transfers: Mutex<Vec<TransferCall>>,
    pub list_routes: Mutex<Vec<String>>,
}

impl MockGraph {
    pub fn new() -> Self {
        Self {
            videos: HashMap::new(),
            get_error: None,
            windows: vec![1000],
            start_error: None,
            fail_transfer: None,
            finish_success: true,
            list_entries: Vec::new(),
            list_error: None,
            list_hang: false,
            gets: Mutex::new(Vec::new()),
            posts: Mutex::new(Vec::new()),
            transfers: Mutex::new(Vec::new()),
            list_routes: Mutex::new(Vec::new()),
        }
    }

    pub fn with_video(mut self, id: &str, json: &str) -> Self {
        self.videos.insert(id.to_string(), json.to_string());
        self
    }

    pub fn with_get_error(mut self, status: u16, body: &str) -> Self {
        self.get_error = Some((status, body.to_string()));
        self
    }

    /// Window sizes granted by start, then by each transfer.
    pub fn with_windows(mut self, windows: &[u64]) -> Self {
        self.windows = windows.to_vec();
        self
    }

    pub fn with_start_error(mut self, status: u16) -> Self {
        self.start_error = Some(status);
        self
    }

    /// Fails the transfer call with the given zero-based index.
    pub fn with_failing_transfer(mut self, index: usize) -> Self {
        self.fail_transfer = Some(index);
        self
    }

    pub fn with_finish_success(mut self, success: bool) -> Self {
        self.finish_success = success;
        self
    }

    pub fn with_list(mut self, entries: Vec<String>) -> Self {
        self.list_entries = entries;
        self
    }

    /// Fails the list read after all entries were sent.
    pub fn with_list_error(mut self, status: u16) -> Self {
        self.list_error = Some(status);
        self
    }

    /// Makes the list read never finish after sending its entries.
    pub fn with_list_hang(mut self) -> Self {
        self.list_hang = true;
        self
    }

    pub fn transfer_sizes(&self) -> Vec<usize> {
        self.transfers
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.data.len())
            .collect()
    }

    pub fn phases(&self) -> Vec<String> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body["upload_phase"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    fn window(&self, round: usize) -> u64 {
        self.windows
            .get(round)
            .or_else(|| self.windows.last())
            .copied()
            .unwrap_or(0)
    }

    fn offsets(start: u64, window: u64) -> Vec<u8> {
        serde_json::json!({
            "start_offset": start.to_string(),
            "end_offset": (start + window).to_string(),
        })
        .to_string()
        .into_bytes()
    }
}

fn api_error(status: u16) -> GraphError {
    GraphError::from_response(status, r#"{"error":{"message":"mock failure","code":1}}"#)
}

impl GraphApi for MockGraph {
    fn get_json<'a>(&'a self, route: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GraphError>> {
        self.gets.lock().unwrap().push(route.to_string());

        let id = route
            .trim_start_matches("/v20.0/")
            .split('?')
            .next()
            .unwrap_or_default()
            .to_string();

        Box::pin(async move {
            if let Some((status, body)) = &self.get_error {
                return Err(GraphError::from_response(*status, body));
            }
            match self.videos.get(&id) {
                Some(json) => Ok(json.clone().into_bytes()),
                None => Err(GraphError::from_response(404, "")),
            }
        })
    }

    fn post_json<'a>(
        &'a self,
        route: &'a str,
        body: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<Vec<u8>, GraphError>> {
        self.posts
            .lock()
            .unwrap()
            .push((route.to_string(), body.clone()));

        Box::pin(async move {
            match body["upload_phase"].as_str() {
                Some("start") => {
                    if let Some(status) = self.start_error {
                        return Err(api_error(status));
                    }
                    let window = self.window(0);
                    Ok(serde_json::json!({
                        "upload_session_id": "sess-1",
                        "video_id": "vid-1",
                        "start_offset": "0",
                        "end_offset": window.to_string(),
                    })
                    .to_string()
                    .into_bytes())
                }
                Some("finish") => Ok(serde_json::json!({ "success": self.finish_success })
                    .to_string()
                    .into_bytes()),
                _ => Err(api_error(400)),
            }
        })
    }

    fn upload_file<'a>(
        &'a self,
        _route: &'a str,
        filename: &'a str,
        data: Vec<u8>,
        fields: &'a [(&'static str, String)],
    ) -> BoxFuture<'a, Result<Vec<u8>, GraphError>> {
        let call = TransferCall {
            filename: filename.to_string(),
            data,
            fields: fields.to_vec(),
        };
        let start: u64 = call
            .field("start_offset")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();
        let next_start = start + call.data.len() as u64;

        let round = {
            let mut transfers = self.transfers.lock().unwrap();
            transfers.push(call);
            transfers.len()
        };

        Box::pin(async move {
            if self.fail_transfer == Some(round - 1) {
                return Err(api_error(500));
            }
            Ok(Self::offsets(next_start, self.window(round)))
        })
    }

    fn read_list<'a>(
        &'a self,
        route: &'a str,
        out: mpsc::Sender<Box<RawValue>>,
    ) -> BoxFuture<'a, Result<(), GraphError>> {
        self.list_routes.lock().unwrap().push(route.to_string());

        Box::pin(async move {
            for entry in &self.list_entries {
                let raw = RawValue::from_string(entry.clone())?;
                out.send(raw).await.map_err(|_| GraphError::ListClosed)?;
            }
            if self.list_hang {
                std::future::pending::<()>().await;
            }
            if let Some(status) = self.list_error {
                return Err(api_error(status));
            }
            Ok(())
        })
    }
}
