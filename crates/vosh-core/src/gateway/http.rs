//! REST client for the backend API.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::Gateway;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::models::{DirectoryEntry, EntryId, EntryPatch, NewEntry, ProcessId, ProcessInfo, Quota};

#[derive(Deserialize)]
struct ContentBody {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct WriteBody<'a> {
    content: &'a str,
    append: bool,
}

#[derive(Serialize)]
struct SpawnBody {
    file_object: EntryId,
}

#[derive(Deserialize)]
struct SpawnedBody {
    id: ProcessId,
}

#[derive(Serialize)]
struct PkillBody<'a> {
    name: &'a str,
}

#[derive(Deserialize)]
struct PkillResult {
    #[serde(default)]
    killed: u64,
}

/// [`Gateway`] backed by the HTTP API, authenticated with a bearer token.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Absolute URL for an API path such as `objects/12/`.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::get(&self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::post(&self.url(path)))
    }

    fn patch(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::patch(&self.url(path)))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.authorized(Request::delete(&self.url(path)))
    }

    async fn send(request: Request) -> Result<Response, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(GatewayError::from_status(response.status()));
        }
        Ok(response)
    }

    async fn send_empty(builder: RequestBuilder) -> Result<Response, GatewayError> {
        let request = builder
            .build()
            .map_err(|e| GatewayError::Invalid(e.to_string()))?;
        Self::send(request).await
    }

    async fn send_json<B>(builder: RequestBuilder, body: &B) -> Result<Response, GatewayError>
    where
        B: Serialize + ?Sized,
    {
        let request = builder
            .json(body)
            .map_err(|e| GatewayError::Invalid(e.to_string()))?;
        Self::send(request).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Query value for a parent id; the backend spells the root as `null`.
fn parent_param(parent: Option<EntryId>) -> String {
    parent
        .map(|id| id.to_string())
        .unwrap_or_else(|| "null".to_string())
}

#[async_trait(?Send)]
impl Gateway for HttpGateway {
    async fn list_entries(&self, parent: Option<EntryId>) -> Result<Vec<DirectoryEntry>, GatewayError> {
        let path = format!("objects/?parent={}", parent_param(parent));
        let response = Self::send_empty(self.get(&path)).await?;
        Self::decode(response).await
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<DirectoryEntry, GatewayError> {
        let response = Self::send_json(self.post("objects/"), &entry).await?;
        Self::decode(response).await
    }

    async fn delete_entry(&self, id: EntryId) -> Result<(), GatewayError> {
        Self::send_empty(self.delete(&format!("objects/{}/", id))).await?;
        Ok(())
    }

    async fn patch_entry(&self, id: EntryId, patch: EntryPatch) -> Result<(), GatewayError> {
        Self::send_json(self.patch(&format!("objects/{}/", id)), &patch).await?;
        Ok(())
    }

    async fn read_content(&self, id: EntryId) -> Result<String, GatewayError> {
        let response = Self::send_empty(self.get(&format!("objects/{}/content/", id))).await?;
        let body: ContentBody = Self::decode(response).await?;
        Ok(body.content.unwrap_or_default())
    }

    async fn write_content(&self, id: EntryId, content: &str, append: bool) -> Result<(), GatewayError> {
        let body = WriteBody { content, append };
        Self::send_json(self.patch(&format!("objects/{}/content/", id)), &body).await?;
        Ok(())
    }

    async fn create_process(&self, file: EntryId) -> Result<ProcessId, GatewayError> {
        let body = SpawnBody { file_object: file };
        let response = Self::send_json(self.post("processes/"), &body).await?;
        let spawned: SpawnedBody = Self::decode(response).await?;
        Ok(spawned.id)
    }

    async fn list_processes(&self) -> Result<Vec<ProcessInfo>, GatewayError> {
        let response = Self::send_empty(self.get("processes/")).await?;
        Self::decode(response).await
    }

    async fn kill_process(&self, pid: ProcessId) -> Result<(), GatewayError> {
        Self::send_empty(self.delete(&format!("processes/{}/", pid))).await?;
        Ok(())
    }

    async fn kill_by_name(&self, name: &str) -> Result<u64, GatewayError> {
        let response = Self::send_json(self.post("processes/pkill/"), &PkillBody { name }).await?;
        let result: PkillResult = Self::decode(response).await?;
        Ok(result.killed)
    }

    async fn quota(&self) -> Result<Quota, GatewayError> {
        let response = Self::send_empty(self.get("quota/")).await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_param() {
        assert_eq!(parent_param(None), "null");
        assert_eq!(parent_param(Some(EntryId(12))), "12");
    }

    #[test]
    fn test_url_joins_base() {
        let gateway = HttpGateway::new(GatewayConfig::new("http://host/api/", None));
        assert_eq!(gateway.url("objects/3/"), "http://host/api/objects/3/");
    }

    #[test]
    fn test_write_body_shape() {
        let body = serde_json::to_value(WriteBody {
            content: "hi",
            append: true,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"content": "hi", "append": true}));
    }

    #[test]
    fn test_content_body_null() {
        let body: ContentBody = serde_json::from_str(r#"{"content": null}"#).unwrap();
        assert!(body.content.is_none());
    }
}
