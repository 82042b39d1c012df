//! Action dispatcher: one-shot load/start/stop commands.
//!
//! Each request issues exactly one `POST`. While it is pending the control
//! wears an in-flight overlay, which also keeps the control disabled. Nothing
//! deduplicates requests beyond that.

use tracing::{debug, error, info};

use crate::api::{Action, ActionResponse, BackendError};
use crate::controls::{ButtonView, ControlsView, Transition};
use crate::dashboard::{Command, Dashboard, Deferred};
use crate::model::{Scalar, StatsSnapshot};
use crate::poll::update_scalars;
use crate::surface::Surface;

pub const LOAD_ACK_LABEL: &str = "✅ Data Loaded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Request sent, response pending.
    InFlight,
    /// Request succeeded; transient confirmation label until reset.
    Acknowledged,
}

impl Overlay {
    fn view(self, action: Action) -> Option<ButtonView> {
        match (self, action) {
            (Overlay::InFlight, Action::Load) => Some(ButtonView::disabled("⏳ Loading...")),
            (Overlay::InFlight, Action::Start) => Some(ButtonView::disabled("⏳ Starting...")),
            (Overlay::InFlight, Action::Stop) => Some(ButtonView::disabled("⏳ Stopping...")),
            (Overlay::Acknowledged, Action::Load) => Some(ButtonView::disabled(LOAD_ACK_LABEL)),
            (Overlay::Acknowledged, _) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    overlay: Overlay,
    ticket: u64,
}

/// Dispatch-local overlays, one slot per control. Independent of the control
/// flags.
#[derive(Debug, Default)]
pub struct Dispatcher {
    slots: [Option<Slot>; 3],
    next_ticket: u64,
}

impl Dispatcher {
    fn put(&mut self, action: Action, overlay: Overlay) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.slots[action.index()] = Some(Slot { overlay, ticket });
        ticket
    }

    pub fn begin(&mut self, action: Action) -> u64 {
        self.put(action, Overlay::InFlight)
    }

    pub fn acknowledge(&mut self, action: Action) -> u64 {
        self.put(action, Overlay::Acknowledged)
    }

    pub fn settle(&mut self, action: Action) {
        self.slots[action.index()] = None;
    }

    /// Clears `action`'s overlay only if `ticket` still owns it.
    pub fn expire(&mut self, action: Action, ticket: u64) -> bool {
        match self.slots[action.index()] {
            Some(slot) if slot.ticket == ticket => {
                self.slots[action.index()] = None;
                true
            }
            _ => false,
        }
    }

    pub fn overlay(&self, action: Action) -> Option<Overlay> {
        self.slots[action.index()].map(|s| s.overlay)
    }

    pub fn overlay_onto(&self, view: &mut ControlsView) {
        for &action in Action::all() {
            if let Some(v) = self.overlay(action).and_then(|o| o.view(action)) {
                *view.get_mut(action) = v;
            }
        }
    }
}

fn failure_notice(action: Action, reason: &str) -> String {
    match action {
        Action::Load => format!("Error loading data: {reason}"),
        Action::Start => format!("Error starting simulation: {reason}"),
        Action::Stop => format!("Error stopping simulation: {reason}"),
    }
}

fn network_notice(action: Action) -> &'static str {
    match action {
        Action::Load => "Network error loading data",
        Action::Start => "Network error starting simulation",
        Action::Stop => "Network error stopping simulation",
    }
}

impl<S: Surface> Dashboard<S> {
    pub fn request_load(&mut self) -> Vec<Command> {
        self.request(Action::Load)
    }

    pub fn request_start(&mut self) -> Vec<Command> {
        self.request(Action::Start)
    }

    pub fn request_stop(&mut self) -> Vec<Command> {
        self.request(Action::Stop)
    }

    /// Marks the control in flight and emits the one outbound call. A request
    /// for a control that is currently disabled is dropped, as a click on a
    /// disabled button would be.
    pub fn request(&mut self, action: Action) -> Vec<Command> {
        if !self.controls().get(action).enabled {
            debug!(action = action.label(), "ignoring request for disabled control");
            return Vec::new();
        }
        info!(action = action.label(), "sending action");
        self.dispatcher.begin(action);
        self.publish_controls();
        vec![Command::Post(action)]
    }

    pub fn on_action_result(
        &mut self,
        action: Action,
        result: Result<ActionResponse, BackendError>,
    ) -> Vec<Command> {
        match result {
            Ok(resp) if resp.success => self.action_succeeded(action, &resp),
            Ok(resp) => {
                let notice = failure_notice(action, resp.failure_reason());
                error!(action = action.label(), "{}", notice);
                self.action_failed(action, &notice)
            }
            Err(e) => {
                error!(action = action.label(), "action failed: {}", e);
                self.action_failed(action, network_notice(action))
            }
        }
    }

    fn action_succeeded(&mut self, action: Action, resp: &ActionResponse) -> Vec<Command> {
        info!(
            action = action.label(),
            message = resp.message.as_deref().unwrap_or(""),
            "action accepted"
        );
        self.state
            .apply_optimistic(Transition::for_action(action), self.polls);

        let mut commands = Vec::new();
        match action {
            Action::Load => {
                let ticket = self.dispatcher.acknowledge(action);
                commands.push(Command::After {
                    delay: self.load_refresh_delay,
                    task: Deferred::RefreshStats,
                });
                commands.push(Command::After {
                    delay: self.label_reset_delay,
                    task: Deferred::ResetControl { action, ticket },
                });
            }
            Action::Start => self.dispatcher.settle(action),
            Action::Stop => {
                self.dispatcher.settle(action);
                // Display-side only; the next poll reports the real values.
                let zeroed = StatsSnapshot {
                    online_count: Some(Scalar::Int(0)),
                    ops_per_second: Some(Scalar::Int(0)),
                    demo_counter: Some(Scalar::Int(0)),
                    ..StatsSnapshot::default()
                };
                update_scalars(&mut *self.surface.borrow_mut(), &zeroed);
            }
        }
        self.publish_controls();
        commands
    }

    fn action_failed(&mut self, action: Action, notice: &str) -> Vec<Command> {
        self.dispatcher.settle(action);
        self.publish_controls();
        self.surface.borrow_mut().notify(notice);
        Vec::new()
    }

    pub fn on_deferred(&mut self, task: Deferred) -> Vec<Command> {
        match task {
            Deferred::RefreshStats => vec![Command::FetchStats],
            Deferred::ResetControl { action, ticket } => {
                if self.dispatcher.expire(action, ticket) {
                    self.publish_controls();
                }
                Vec::new()
            }
        }
    }
}
