//! Browser client for the arena dashboard.
//!
//! The page template is served by the arena server; this crate binds to its
//! element IDs and runs the polling dashboard against same-origin endpoints.
//!
//! This crate is a stub by default so the workspace builds on native targets
//! without a wasm toolchain. Enable the real client with `--features web` (and
//! a wasm32 target).

pub mod page;

/// Placeholder function for non-web (or non-wasm) builds.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
pub fn placeholder() {
    // No-op.
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::start;
