use std::time::Duration;

use arena::{LocalExecutor, LocalFuture};
use wasm_bindgen_futures::JsFuture;

/// The browser event loop: microtask-spawned futures and `setTimeout`.
pub(crate) struct BrowserExecutor;

impl LocalExecutor for BrowserExecutor {
    fn spawn(&self, fut: LocalFuture) {
        wasm_bindgen_futures::spawn_local(fut);
    }

    fn sleep(&self, delay: Duration) -> LocalFuture {
        let ms = delay.as_millis().min(i32::MAX as u128) as i32;
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().and_then(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .ok()
            });
            if scheduled.is_none() {
                web_sys::console::warn_1(&"arena: setTimeout unavailable, timer dropped".into());
            }
        });
        Box::pin(async move {
            let _ = JsFuture::from(promise).await;
        })
    }
}
