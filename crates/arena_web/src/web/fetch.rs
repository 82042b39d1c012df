use arena::api::{self, STATS_PATH};
use arena::{Action, ActionResponse, Backend, BackendError, ClientConfig, StatsResponse};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// `fetch`-backed access to the arena server.
pub(crate) struct FetchBackend {
    config: ClientConfig,
}

impl FetchBackend {
    pub(crate) fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    async fn send(&self, method: &str, path: &str) -> Result<String, BackendError> {
        let init = RequestInit::new();
        init.set_method(method);
        if method == "POST" {
            let headers = Headers::new().map_err(transport)?;
            headers
                .set("Content-Type", "application/json")
                .map_err(transport)?;
            init.set_headers(&headers);
        }

        let url = self.config.url(path);
        let request = Request::new_with_str_and_init(&url, &init).map_err(transport)?;
        let window =
            web_sys::window().ok_or_else(|| BackendError::Transport("no window".to_string()))?;

        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?;
        let response: Response = response.dyn_into().map_err(transport)?;
        if !response.ok() {
            return Err(BackendError::Status(response.status()));
        }

        let body = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(transport)?;
        body.as_string()
            .ok_or_else(|| BackendError::Decode("response body is not text".to_string()))
    }
}

impl Backend for FetchBackend {
    async fn fetch_stats(&self) -> Result<StatsResponse, BackendError> {
        let body = self.send("GET", STATS_PATH).await?;
        api::decode_stats(&body)
    }

    async fn post_action(&self, action: Action) -> Result<ActionResponse, BackendError> {
        let body = self.send("POST", action.path()).await?;
        api::decode_action(&body)
    }
}

fn transport(err: JsValue) -> BackendError {
    if let Some(message) = err.as_string() {
        return BackendError::Transport(message);
    }
    match err.dyn_into::<js_sys::Error>() {
        Ok(error) => BackendError::Transport(error.message().into()),
        Err(_) => BackendError::Transport("fetch failed".to_string()),
    }
}
