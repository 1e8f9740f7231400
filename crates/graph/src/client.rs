//! Graph API HTTP client.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use serde_json::value::RawValue;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{BoxFuture, GraphApi};
use crate::config::ClientConfig;
use crate::error::GraphError;
use crate::types::Page;

/// Multipart field name of the uploaded file part.
const FILE_FIELD: &str = "source";

/// Graph API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Creates a client from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self, GraphError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|_| GraphError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves a route against the base URL. Absolute URLs (paging links)
    /// pass through unchanged.
    fn url(&self, route: &str) -> String {
        if route.starts_with("http://") || route.starts_with("https://") {
            route.to_string()
        } else {
            format!("{}{}", self.base_url, route)
        }
    }

    /// Performs an authenticated GET request.
    pub async fn get(&self, route: &str) -> Result<Vec<u8>, GraphError> {
        let resp = self.http.get(self.url(route)).send().await?;
        read_body(route, resp).await
    }

    /// Performs an authenticated JSON POST request.
    pub async fn post(
        &self,
        route: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, GraphError> {
        let resp = self.http.post(self.url(route)).json(body).send().await?;
        read_body(route, resp).await
    }

    /// Performs an authenticated multipart POST with one file part.
    pub async fn upload(
        &self,
        route: &str,
        filename: &str,
        data: Vec<u8>,
        fields: &[(&'static str, String)],
    ) -> Result<Vec<u8>, GraphError> {
        let size = data.len();
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(*name, value.clone());
        }
        form = form.part(FILE_FIELD, Part::bytes(data).file_name(filename.to_string()));

        debug!(route = %route, bytes = size, "uploading file part");
        let resp = self.http.post(self.url(route)).multipart(form).send().await?;
        read_body(route, resp).await
    }

    /// Reads all pages of a list endpoint into `out`.
    pub async fn list(
        &self,
        route: &str,
        out: mpsc::Sender<Box<RawValue>>,
    ) -> Result<(), GraphError> {
        let mut next = route.to_string();
        let mut pages = 0usize;

        loop {
            let body = self.get(&next).await?;
            let page: Page = serde_json::from_slice(&body)?;
            pages += 1;

            let entries = page.data.len();
            debug!(route = %route, page = pages, entries, "list page received");

            for entry in page.data {
                out.send(entry).await.map_err(|_| GraphError::ListClosed)?;
            }

            // An empty page ends the read even if a next link is present.
            match page.paging.and_then(|p| p.next) {
                Some(url) if entries > 0 && !url.is_empty() => next = url,
                _ => break,
            }
        }

        Ok(())
    }
}

/// Returns the body of a successful response or a classified error.
async fn read_body(route: &str, resp: reqwest::Response) -> Result<Vec<u8>, GraphError> {
    let status = resp.status();
    debug!(route = %route, status = status.as_u16(), "graph response");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GraphError::from_response(status.as_u16(), &body));
    }

    Ok(resp.bytes().await?.to_vec())
}

impl GraphApi for Client {
    fn get_json<'a>(&'a self, route: &'a str) -> BoxFuture<'a, Result<Vec<u8>, GraphError>> {
        Box::pin(self.get(route))
    }

    fn post_json<'a>(
        &'a self,
        route: &'a str,
        body: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<Vec<u8>, GraphError>> {
        Box::pin(self.post(route, body))
    }

    fn upload_file<'a>(
        &'a self,
        route: &'a str,
        filename: &'a str,
        data: Vec<u8>,
        fields: &'a [(&'static str, String)],
    ) -> BoxFuture<'a, Result<Vec<u8>, GraphError>> {
        Box::pin(self.upload(route, filename, data, fields))
    }

    fn read_list<'a>(
        &'a self,
        route: &'a str,
        out: mpsc::Sender<Box<RawValue>>,
    ) -> BoxFuture<'a, Result<(), GraphError>> {
        Box::pin(self.list(route, out))
    }
}
