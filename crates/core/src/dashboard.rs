//! The dashboard controller.
//!
//! [`Dashboard`] owns every piece of client state: the control flags, the
//! per-feed render cache and the dispatch-local button overlays. Each source
//! of change has one entry point ([`Dashboard::on_stats`] for polls,
//! [`Dashboard::on_action_result`] for actions, [`Dashboard::on_deferred`] for
//! timers). None of them perform I/O; they return [`Command`]s for a driver to
//! execute.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::api::Action;
use crate::config::ClientConfig;
use crate::controls::{derive_controls, ControlState, ControlsView};
use crate::diff::SnapshotDiffer;
use crate::dispatch::Dispatcher;
use crate::observable::Observable;
use crate::render::Renderer;
use crate::surface::{ElementId, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchStats,
    Post(Action),
    After { delay: Duration, task: Deferred },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Out-of-cycle stats poll.
    RefreshStats,
    /// Drop the transient label of `action`'s control if `ticket` still owns it.
    ResetControl { action: Action, ticket: u64 },
}

pub struct Dashboard<S: Surface> {
    pub(crate) surface: Rc<RefCell<S>>,
    pub(crate) renderer: Renderer,
    pub(crate) differ: SnapshotDiffer,
    pub(crate) state: ControlState,
    pub(crate) dispatcher: Dispatcher,
    pub(crate) controls: Observable<ControlsView>,
    pub(crate) polls: u64,
    pub(crate) load_refresh_delay: Duration,
    pub(crate) label_reset_delay: Duration,
}

impl<S: Surface + 'static> Dashboard<S> {
    pub fn new(surface: S, renderer: Renderer, config: &ClientConfig) -> Self {
        let surface = Rc::new(RefCell::new(surface));
        let state = ControlState::default();
        let mut controls = Observable::new(derive_controls(state.flags()));
        {
            let surface = Rc::clone(&surface);
            controls.subscribe(move |view: &ControlsView| {
                let mut s = surface.borrow_mut();
                for &action in Action::all() {
                    s.apply_button(ElementId::button(action), view.get(action));
                }
            });
        }

        Self {
            surface,
            renderer,
            differ: SnapshotDiffer::default(),
            state,
            dispatcher: Dispatcher::default(),
            controls,
            polls: 0,
            load_refresh_delay: config.load_refresh_delay(),
            label_reset_delay: config.label_reset_delay(),
        }
    }
}

impl<S: Surface> Dashboard<S> {
    /// Re-publishes the controls and asks for a fresh snapshot. Called at
    /// startup and whenever the push channel (re)connects.
    pub fn resync(&mut self) -> Vec<Command> {
        self.controls.notify();
        vec![Command::FetchStats]
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn controls(&self) -> &ControlsView {
        self.controls.get()
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    /// Recomputes the visible controls from the flags plus the overlays.
    pub(crate) fn publish_controls(&mut self) {
        let mut view = derive_controls(self.state.flags());
        self.dispatcher.overlay_onto(&mut view);
        if self.controls.set(view) {
            debug!(mode = ?self.state.mode(), "controls updated");
        }
    }
}
