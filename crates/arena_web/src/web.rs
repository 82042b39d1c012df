use arena::{Action, Dashboard, Driver, ElementId, Renderer};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

mod dom;
mod exec;
mod fetch;
mod push;

use dom::DomSurface;
use exec::BrowserExecutor;
use fetch::FetchBackend;

use crate::page::{page_config, CONFIG_ATTRIBUTE};

pub(crate) type WebDriver = Driver<DomSurface, FetchBackend, BrowserExecutor>;

pub fn start() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        web_sys::console::error_1(&"arena: no document".into());
        return;
    };

    let raw = document
        .body()
        .and_then(|b| b.get_attribute(CONFIG_ATTRIBUTE));
    let config = match page_config(raw.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            web_sys::console::warn_1(&format!("arena: ignoring {CONFIG_ATTRIBUTE}: {e}").into());
            arena::ClientConfig::same_origin()
        }
    };

    let dashboard = Dashboard::new(
        DomSurface::new(document.clone()),
        Renderer::local(),
        &config,
    );
    let driver: WebDriver = Driver::new(
        dashboard,
        FetchBackend::new(config.clone()),
        BrowserExecutor,
        &config,
    );

    bind_controls(&document, &driver);
    driver.start();
    push::connect(&config, driver.clone());
    web_sys::console::log_1(&"arena: dashboard started".into());
}

/// Click on a control → one request. The load control is optional in the
/// template.
fn bind_controls(document: &web_sys::Document, driver: &WebDriver) {
    for &action in Action::all() {
        let Some(el) = document.get_element_by_id(ElementId::button(action).as_str()) else {
            continue;
        };
        let driver = driver.clone();
        let cb = Closure::wrap(Box::new(move || {
            driver.request(action);
        }) as Box<dyn FnMut()>);
        if el
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            .is_ok()
        {
            cb.forget();
        }
    }
}
