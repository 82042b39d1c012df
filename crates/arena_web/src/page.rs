//! Page-level settings that do not need a browser to compute.

use arena::{ClientConfig, ConfigError};

/// `<body>` attribute carrying optional JSON overrides.
pub const CONFIG_ATTRIBUTE: &str = "data-arena-config";

/// Builds the client config from the page attribute. Without an explicit
/// `base_url` the client talks to the origin that served the page.
pub fn page_config(raw: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return Ok(ClientConfig::same_origin()),
    };
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let mut config = ClientConfig::from_json(raw)?;
    if value.get("base_url").is_none() {
        config.base_url = String::new();
    }
    Ok(config)
}

/// WebSocket URL of the push channel.
///
/// `page_protocol` and `page_host` come from `window.location` and are used
/// when the config is same-origin.
pub fn push_url(config: &ClientConfig, page_protocol: &str, page_host: &str) -> String {
    let path = config.push_path.trim_start_matches('/');
    if config.is_same_origin() {
        let scheme = if page_protocol == "https:" { "wss:" } else { "ws:" };
        return format!("{scheme}//{page_host}/{path}");
    }
    let base = config.base_url.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{base}/{path}")
}
