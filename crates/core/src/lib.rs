//! # arena
//!
//! Client core for the arena leaderboard dashboard.
//!
//! The dashboard polls `GET /api/stats` on a fixed interval, re-renders the
//! leaderboard and message feeds only when their content changed, keeps the
//! scalar counters current and drives the load / start / stop controls from
//! the server-reported flags. Actions are single `POST`s whose success applies
//! an optimistic transition that the next poll confirms or corrects.
//!
//! Nothing here touches a DOM or a socket directly:
//!
//! - [`Dashboard`] is the sans-IO controller. Its entry points return
//!   [`Command`]s.
//! - [`Driver`] runs those commands against a [`Backend`] on a
//!   [`LocalExecutor`].
//! - [`Surface`] is the page the dashboard writes into.
//!
//! ## Modules
//!
//! - [`model`]: wire payloads
//! - [`api`]: endpoints, action responses, the `Backend` seam
//! - [`diff`]: per-feed memoized rendering
//! - [`render`]: feed fragments
//! - [`controls`]: the control state machine
//! - [`config`]: client configuration

pub mod api;
pub mod config;
pub mod controls;
pub mod dashboard;
pub mod diff;
pub mod dispatch;
pub mod fmt;
pub mod model;
pub mod observable;
pub mod poll;
pub mod render;
pub mod runtime;
pub mod surface;
pub mod time;

pub use api::{Action, ActionResponse, Backend, BackendError, StatsResponse};
pub use config::{ClientConfig, ConfigError};
pub use controls::{derive_controls, ButtonView, ControlFlags, ControlMode, ControlsView};
pub use dashboard::{Command, Dashboard, Deferred};
pub use render::Renderer;
pub use runtime::{Driver, LocalExecutor, LocalFuture};
pub use surface::{ElementId, MemorySurface, Surface};
