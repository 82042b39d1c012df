//! Control state machine for the load / start / stop buttons.
//!
//! The visible configuration is a pure function of two flags. Which source set
//! the flags is tracked separately as a [`Phase`]: an optimistic value is
//! provisional until a poll reports both flags, and lapses after one full poll
//! cycle without such a report.

use crate::api::Action;
use crate::model::ReportedFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFlags {
    pub simulation_running: bool,
    pub data_loaded: bool,
}

impl ControlFlags {
    pub fn new(simulation_running: bool, data_loaded: bool) -> Self {
        Self {
            simulation_running,
            data_loaded,
        }
    }
}

/// The reachable UI configurations.
///
/// `running && !loaded` maps to `Running`: the running flag takes precedence
/// for the start/stop pair. The server can report that combination briefly and
/// the buttons must still show something deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    IdleNoData,
    IdleLoaded,
    Running,
}

impl ControlMode {
    pub fn from_flags(flags: ControlFlags) -> Self {
        if flags.simulation_running {
            ControlMode::Running
        } else if flags.data_loaded {
            ControlMode::IdleLoaded
        } else {
            ControlMode::IdleNoData
        }
    }
}

pub const LOAD_LABEL: &str = "📊 Load Game Data";
pub const START_LABEL: &str = "▶️ Start Simulation";
pub const START_NEEDS_DATA_LABEL: &str = "📊 Load Data First";
pub const START_RUNNING_LABEL: &str = "✅ Running";
pub const STOP_LABEL: &str = "⏹️ Stop Simulation";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub enabled: bool,
    pub label: &'static str,
}

impl ButtonView {
    pub fn enabled(label: &'static str) -> Self {
        Self {
            enabled: true,
            label,
        }
    }

    pub fn disabled(label: &'static str) -> Self {
        Self {
            enabled: false,
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub load: ButtonView,
    pub start: ButtonView,
    pub stop: ButtonView,
}

impl ControlsView {
    pub fn get(&self, action: Action) -> &ButtonView {
        match action {
            Action::Load => &self.load,
            Action::Start => &self.start,
            Action::Stop => &self.stop,
        }
    }

    pub fn get_mut(&mut self, action: Action) -> &mut ButtonView {
        match action {
            Action::Load => &mut self.load,
            Action::Start => &mut self.start,
            Action::Stop => &mut self.stop,
        }
    }
}

pub fn derive_controls(flags: ControlFlags) -> ControlsView {
    match ControlMode::from_flags(flags) {
        ControlMode::IdleNoData => ControlsView {
            load: ButtonView::enabled(LOAD_LABEL),
            start: ButtonView::disabled(START_NEEDS_DATA_LABEL),
            stop: ButtonView::disabled(STOP_LABEL),
        },
        ControlMode::IdleLoaded => ControlsView {
            load: ButtonView::enabled(LOAD_LABEL),
            start: ButtonView::enabled(START_LABEL),
            stop: ButtonView::disabled(STOP_LABEL),
        },
        ControlMode::Running => ControlsView {
            load: ButtonView::disabled(LOAD_LABEL),
            start: ButtonView::disabled(START_RUNNING_LABEL),
            stop: ButtonView::enabled(STOP_LABEL),
        },
    }
}

/// Local transition applied right after an action succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    DataLoaded,
    SimulationStarted,
    SimulationStopped,
}

impl Transition {
    pub fn for_action(action: Action) -> Self {
        match action {
            Action::Load => Transition::DataLoaded,
            Action::Start => Transition::SimulationStarted,
            Action::Stop => Transition::SimulationStopped,
        }
    }

    pub fn apply(self, mut flags: ControlFlags) -> ControlFlags {
        match self {
            Transition::DataLoaded => flags.data_loaded = true,
            Transition::SimulationStarted => flags.simulation_running = true,
            Transition::SimulationStopped => flags.simulation_running = false,
        }
        flags
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Confirmed,
    /// Set locally after poll number `since_poll`. Poll `since_poll + 1`
    /// confirms or corrects it when it reports both flags; any later poll
    /// ends the optimistic phase regardless.
    Optimistic { since_poll: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    Unchanged,
    /// The server agreed with an optimistic value.
    Confirmed,
    Corrected {
        from: ControlFlags,
        to: ControlFlags,
    },
    /// An optimistic value outlived its poll cycle without a full report and
    /// is kept as the settled state.
    Lapsed { since_poll: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    flags: ControlFlags,
    phase: Phase,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            flags: ControlFlags::default(),
            phase: Phase::Confirmed,
        }
    }
}

impl ControlState {
    pub fn flags(&self) -> ControlFlags {
        self.flags
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> ControlMode {
        ControlMode::from_flags(self.flags)
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self.phase, Phase::Optimistic { .. })
    }

    /// Returns whether the flags changed.
    pub fn apply_optimistic(&mut self, transition: Transition, polls_seen: u64) -> bool {
        let next = transition.apply(self.flags);
        self.phase = Phase::Optimistic {
            since_poll: polls_seen,
        };
        let changed = next != self.flags;
        self.flags = next;
        changed
    }

    /// Authoritative sync from snapshot number `poll`. Flags the snapshot
    /// leaves out stay as they are.
    pub fn sync(&mut self, reported: ReportedFlags, poll: u64) -> Reconciliation {
        let next = ControlFlags {
            simulation_running: reported
                .simulation_running
                .unwrap_or(self.flags.simulation_running),
            data_loaded: reported.data_loaded.unwrap_or(self.flags.data_loaded),
        };
        let complete = reported.simulation_running.is_some() && reported.data_loaded.is_some();
        let was_provisional = self.is_provisional();

        let mut lapsed = None;
        if complete {
            self.phase = Phase::Confirmed;
        } else if let Phase::Optimistic { since_poll } = self.phase {
            if poll > since_poll + 1 {
                self.phase = Phase::Confirmed;
                lapsed = Some(since_poll);
            }
        }

        if next != self.flags {
            let from = self.flags;
            self.flags = next;
            return Reconciliation::Corrected { from, to: next };
        }

        match lapsed {
            Some(since_poll) => Reconciliation::Lapsed { since_poll },
            None if complete && was_provisional => Reconciliation::Confirmed,
            None => Reconciliation::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reported(running: bool, loaded: bool) -> ReportedFlags {
        ReportedFlags {
            simulation_running: Some(running),
            data_loaded: Some(loaded),
        }
    }

    #[test]
    fn idle_without_data() {
        let v = derive_controls(ControlFlags::new(false, false));
        assert!(v.load.enabled);
        assert!(!v.start.enabled);
        assert_eq!(v.start.label, START_NEEDS_DATA_LABEL);
        assert!(!v.stop.enabled);
    }

    #[test]
    fn idle_with_data() {
        let v = derive_controls(ControlFlags::new(false, true));
        assert!(v.load.enabled);
        assert!(v.start.enabled);
        assert_eq!(v.start.label, START_LABEL);
        assert!(!v.stop.enabled);
    }

    #[test]
    fn running() {
        let v = derive_controls(ControlFlags::new(true, true));
        assert!(!v.load.enabled);
        assert!(!v.start.enabled);
        assert_eq!(v.start.label, START_RUNNING_LABEL);
        assert!(v.stop.enabled);
    }

    #[test]
    fn running_takes_precedence_over_missing_data() {
        assert_eq!(
            ControlMode::from_flags(ControlFlags::new(true, false)),
            ControlMode::Running
        );
        assert_eq!(
            derive_controls(ControlFlags::new(true, false)),
            derive_controls(ControlFlags::new(true, true))
        );
    }

    #[test]
    fn optimistic_value_is_confirmed_by_next_poll() {
        let mut s = ControlState::default();
        assert!(s.apply_optimistic(Transition::DataLoaded, 3));
        assert_eq!(s.phase(), Phase::Optimistic { since_poll: 3 });

        assert_eq!(s.sync(reported(false, true), 4), Reconciliation::Confirmed);
        assert_eq!(s.phase(), Phase::Confirmed);
        assert_eq!(s.sync(reported(false, true), 5), Reconciliation::Unchanged);
    }

    #[test]
    fn optimistic_value_is_corrected_by_next_poll() {
        let mut s = ControlState::default();
        s.apply_optimistic(Transition::DataLoaded, 0);
        s.apply_optimistic(Transition::SimulationStarted, 0);
        assert_eq!(s.mode(), ControlMode::Running);

        let r = s.sync(reported(false, true), 1);
        assert_eq!(
            r,
            Reconciliation::Corrected {
                from: ControlFlags::new(true, true),
                to: ControlFlags::new(false, true),
            }
        );
        assert!(!s.is_provisional());
        assert_eq!(s.mode(), ControlMode::IdleLoaded);
    }

    #[test]
    fn absent_flags_leave_state_unchanged() {
        let mut s = ControlState::default();
        s.apply_optimistic(Transition::DataLoaded, 1);
        assert_eq!(s.sync(ReportedFlags::default(), 2), Reconciliation::Unchanged);
        assert!(s.is_provisional());
        assert!(s.flags().data_loaded);

        let mut s = ControlState::default();
        s.apply_optimistic(Transition::DataLoaded, 1);
        let partial = ReportedFlags {
            simulation_running: Some(true),
            data_loaded: None,
        };
        assert!(matches!(s.sync(partial, 2), Reconciliation::Corrected { .. }));
        assert_eq!(s.flags(), ControlFlags::new(true, true));
        assert!(s.is_provisional());
    }

    #[test]
    fn optimistic_value_lapses_after_one_poll_cycle() {
        let mut s = ControlState::default();
        s.apply_optimistic(Transition::DataLoaded, 1);
        let partial = ReportedFlags {
            simulation_running: Some(false),
            data_loaded: None,
        };
        assert_eq!(s.sync(partial, 2), Reconciliation::Unchanged);
        assert!(s.is_provisional());

        assert_eq!(
            s.sync(partial, 3),
            Reconciliation::Lapsed { since_poll: 1 }
        );
        assert_eq!(s.phase(), Phase::Confirmed);
        assert!(s.flags().data_loaded);
        assert_eq!(s.sync(partial, 4), Reconciliation::Unchanged);
    }

    #[test]
    fn late_partial_report_still_ends_optimistic_phase() {
        let mut s = ControlState::default();
        s.apply_optimistic(Transition::SimulationStarted, 5);
        let partial = ReportedFlags {
            simulation_running: Some(false),
            data_loaded: None,
        };
        assert!(matches!(s.sync(partial, 9), Reconciliation::Corrected { .. }));
        assert!(!s.is_provisional());
        assert_eq!(s.mode(), ControlMode::IdleNoData);
    }

    #[test]
    fn stop_clears_only_running() {
        let f = Transition::SimulationStopped.apply(ControlFlags::new(true, true));
        assert_eq!(f, ControlFlags::new(false, true));
    }
}
