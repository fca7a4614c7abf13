//! REST tree database mirror.
//!
//! Children live at `{base}/notes/{key}.json`: `PUT` replaces a child,
//! `DELETE` removes it and `GET {base}/notes.json` returns the whole tree.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::{MirrorError, MirrorResult, RemoteMirror};
use crate::codec::decode_remote_tree;
use crate::config::MirrorConfig;
use crate::models::Note;
use crate::util::{error_excerpt, mirror_base_url, non_blank};

const NOTES_NODE: &str = "notes";

#[derive(Clone)]
pub struct HttpMirror {
    base_url: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpMirror {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("HttpMirror")
            .field("base_url", &self.base_url)
            .field(
                "auth_token",
                &self.auth_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish_non_exhaustive()
    }
}

impl HttpMirror {
    pub fn new(config: &MirrorConfig) -> MirrorResult<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            base_url,
            auth_token: non_blank(config.auth_token.clone()),
            client,
        })
    }

    fn child_url(&self, key: &str) -> String {
        format!("{}/{NOTES_NODE}/{key}.json", self.base_url)
    }

    fn tree_url(&self) -> String {
        format!("{}/{NOTES_NODE}.json", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_token.as_deref() {
            Some(token) => request.query(&[("auth", token)]),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> MirrorResult<reqwest::Response> {
        let response = self
            .authorize(request)
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(MirrorError::Api(parse_api_error(status, &body)))
        }
    }
}

#[async_trait]
impl RemoteMirror for HttpMirror {
    async fn upsert(&self, key: &str, record: Value) -> MirrorResult<()> {
        self.send(self.client.put(self.child_url(key)).json(&record))
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> MirrorResult<()> {
        self.send(self.client.delete(self.child_url(key))).await?;
        Ok(())
    }

    async fn fetch_all(&self) -> MirrorResult<Vec<Note>> {
        let response = self.send(self.client.get(self.tree_url())).await?;
        let snapshot = response.json::<Value>().await?;
        Ok(decode_remote_tree(&snapshot))
    }
}

#[derive(Debug, Deserialize)]
struct MirrorErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<MirrorErrorBody>(body) {
        if let Some(message) = payload.error.or(payload.message) {
            return format!("{} ({})", error_excerpt(&message), status.as_u16());
        }
    }

    let trimmed = error_excerpt(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{trimmed} ({})", status.as_u16())
    }
}

fn normalize_base_url(raw: &str) -> MirrorResult<String> {
    if raw.trim().is_empty() {
        return Err(MirrorError::InvalidConfiguration(
            "base_url must not be empty".to_string(),
        ));
    }
    mirror_base_url(raw).ok_or_else(|| {
        MirrorError::InvalidConfiguration("base_url must be an http:// or https:// URL".to_string())
    })
}
