use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use tracing::debug;

use super::{PostgrestConfig, RecordTable, RemoteError, dto};
use crate::models::{StudyInput, StudyRecord};

/// `RecordTable` backed by a PostgREST endpoint (`{url}/rest/v1/{table}`).
pub struct PostgrestTable {
    client: Client,
    config: PostgrestConfig,
    endpoint: Url,
}

impl PostgrestTable {
    pub fn new(config: PostgrestConfig) -> Result<Self, RemoteError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        let endpoint = table_url(&config.url, &config.table)?;

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    fn by_id(&self, id: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
        url
    }
}

fn table_url(base: &str, table: &str) -> Result<Url, RemoteError> {
    let raw = format!("{}/rest/v1/{}", base.trim_end_matches('/'), table);
    Url::parse(&raw).map_err(|e| RemoteError::InvalidUrl(format!("{}: {}", raw, e)))
}

async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let (code, message) = match serde_json::from_str::<dto::PostgrestError>(&body) {
        Ok(err) => (err.code.clone(), err.describe()),
        Err(_) => (None, body),
    };
    Err(RemoteError::Status {
        status: status.as_u16(),
        code,
        message,
    })
}

#[async_trait]
impl RecordTable for PostgrestTable {
    async fn select_all(&self) -> Result<Vec<StudyRecord>, RemoteError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("select", "*");

        let response = self.request(Method::GET, url).send().await?;
        let body = ensure_success(response).await?.text().await?;

        let records: Vec<StudyRecord> =
            serde_json::from_str(&body).map_err(|e| RemoteError::Decode(e.to_string()))?;
        debug!("selected {} rows from {}", records.len(), self.config.table);
        Ok(records)
    }

    async fn insert(&self, input: &StudyInput) -> Result<(), RemoteError> {
        let response = self
            .request(Method::POST, self.endpoint.clone())
            .header("Prefer", "return=minimal")
            .json(&[input])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn update(&self, id: &str, input: &StudyInput) -> Result<(), RemoteError> {
        let response = self
            .request(Method::PATCH, self.by_id(id))
            .header("Prefer", "return=minimal")
            .json(input)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let response = self.request(Method::DELETE, self.by_id(id)).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}
