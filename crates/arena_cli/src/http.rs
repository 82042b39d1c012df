//! `reqwest`-backed access to the arena server.

use arena::api::{self, STATS_PATH};
use arena::{Action, ActionResponse, Backend, BackendError, ClientConfig, StatsResponse};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("arena-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn body(response: reqwest::Response) -> Result<String, BackendError> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }
        response
            .text()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

impl Backend for HttpBackend {
    async fn fetch_stats(&self) -> Result<StatsResponse, BackendError> {
        let url = self.config.url(STATS_PATH);
        let response = self.client.get(&url).send().await.map_err(transport)?;
        api::decode_stats(&Self::body(response).await?)
    }

    async fn post_action(&self, action: Action) -> Result<ActionResponse, BackendError> {
        let url = self.config.url(action.path());
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(transport)?;
        api::decode_action(&Self::body(response).await?)
    }
}

fn transport(err: reqwest::Error) -> BackendError {
    BackendError::Transport(err.to_string())
}
