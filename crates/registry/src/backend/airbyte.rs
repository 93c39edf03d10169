//! HTTP backend for the Airbyte configuration API.
//!
//! Every endpoint is a `POST {base_url}/api/v1/<collection>/<verb>` taking a
//! JSON body and answering with a JSON object that wraps the collection
//! (`{"sources": [...]}`). Authentication is HTTP basic with the client id
//! and secret.

use crate::backend::Registry;
use crate::error::{Error, Result};
use crate::types::{ResourceKind, ResourceRecord, Workspace};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

/// Registry backed by one Airbyte server.
///
/// # Example
///
/// ```no_run
/// use registry::backend::Registry;
/// use registry::backend::airbyte::HttpRegistry;
/// use registry::ResourceKind;
///
/// let registry = HttpRegistry::new("https://airbyte.dev.example.com", "id", "secret");
/// let workspace = registry.default_workspace_id().unwrap();
/// let sources = registry.list(ResourceKind::Source, &workspace).unwrap();
/// println!("Found {} sources", sources.len());
/// ```
pub struct HttpRegistry {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl HttpRegistry {
    /// Create a registry for a server.
    #[must_use]
    pub fn new(base_url: impl Into<String>, client_id: &str, client_secret: &str) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorization: basic_auth(client_id, client_secret),
        }
    }

    /// Server base URL, without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an API path such as `/v1/sources/list`.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(path);
        log::debug!("POST {url}");

        let response: Value = self
            .agent
            .post(&url)
            .header("Authorization", self.authorization.as_str())
            .header("Accept", "application/json")
            .send_json(body)?
            .body_mut()
            .read_json()?;

        Ok(response)
    }
}

impl Registry for HttpRegistry {
    fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        let response = self.post("/v1/workspaces/list", &json!({}))?;
        collection(response, "workspaces")?
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(Error::from))
            .collect()
    }

    fn list(&self, kind: ResourceKind, workspace_id: &str) -> Result<Vec<ResourceRecord>> {
        let response = self.post(&kind.list_path(), &json!({ "workspaceId": workspace_id }))?;
        let records = collection(response, kind.plural())?
            .into_iter()
            .map(|item| ResourceRecord::from_json(kind, item))
            .collect::<Result<Vec<_>>>()?;

        log::debug!(
            "{} {} in workspace {workspace_id} at {}",
            records.len(),
            kind.plural(),
            self.base_url
        );
        Ok(records)
    }
}

/// `Authorization` header value for HTTP basic auth.
fn basic_auth(client_id: &str, client_secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{client_id}:{client_secret}")))
}

/// Unwrap the array stored under `key` in a response object.
fn collection(response: Value, key: &str) -> Result<Vec<Value>> {
    match response {
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(Error::InvalidResponse(format!(
                "`{key}` is not an array: {other}"
            ))),
            None => Err(Error::InvalidResponse(format!("missing `{key}` in response"))),
        },
        other => Err(Error::InvalidResponse(format!(
            "expected an object, got {other}"
        ))),
    }
}
