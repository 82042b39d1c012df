//! Diagnostic push channel. Connect and disconnect are logged; a (re)connect
//! triggers a resync. No dashboard state flows through it.

use arena::ClientConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CloseEvent, Event, WebSocket};

use super::WebDriver;
use crate::page::push_url;

pub(crate) fn connect(config: &ClientConfig, driver: WebDriver) {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return;
    };
    let protocol = location.protocol().unwrap_or_default();
    let host = location.host().unwrap_or_default();
    let url = push_url(config, &protocol, &host);

    let socket = match WebSocket::new(&url) {
        Ok(s) => s,
        Err(_) => {
            console::warn_1(&format!("arena: push channel unavailable at {url}").into());
            return;
        }
    };

    let onopen = Closure::wrap(Box::new(move |_ev: Event| {
        console::log_1(&"arena: connected to server".into());
        driver.resync();
    }) as Box<dyn FnMut(_)>);
    socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let onclose = Closure::wrap(Box::new(move |ev: CloseEvent| {
        console::log_1(&format!("arena: disconnected from server ({})", ev.code()).into());
    }) as Box<dyn FnMut(_)>);
    socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();
}
