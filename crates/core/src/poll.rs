//! Poll loop fan-out: one stats snapshot in, feeds/scalars/controls out.

use tracing::{debug, info, warn};

use crate::api::{BackendError, StatsResponse};
use crate::controls::Reconciliation;
use crate::dashboard::{Command, Dashboard};
use crate::diff::FeedPayload;
use crate::model::{Scalar, StatsSnapshot};
use crate::surface::{ElementId, Surface};

impl<S: Surface> Dashboard<S> {
    /// Handles the outcome of one `GET /api/stats`. Failures are logged and the
    /// cycle is skipped; the next regular tick is the retry.
    pub fn on_stats(&mut self, result: Result<StatsResponse, BackendError>) -> Vec<Command> {
        match result {
            Ok(resp) if resp.success => {
                self.apply_snapshot(&resp.snapshot);
            }
            Ok(resp) => {
                warn!(
                    error = resp.error.as_deref().unwrap_or("unknown error"),
                    "stats poll rejected by server"
                );
            }
            Err(e) => warn!("stats poll failed: {}", e),
        }
        Vec::new()
    }

    /// Applies a successful snapshot: diffed feeds, scalar displays and the
    /// authoritative control sync.
    pub fn apply_snapshot(&mut self, snap: &StatsSnapshot) -> Reconciliation {
        self.polls += 1;

        {
            let mut surface = self.surface.borrow_mut();
            if let Some(board) = snap.leaderboard.as_deref() {
                let payload = FeedPayload::Leaderboard(board);
                if self.differ.should_render(payload) {
                    self.renderer.render(&mut *surface, payload);
                }
            }
            if let Some(messages) = snap.recent_messages.as_deref() {
                let payload = FeedPayload::Messages(messages);
                if self.differ.should_render(payload) {
                    self.renderer.render(&mut *surface, payload);
                }
            }
            update_scalars(&mut *surface, snap);
        }

        let outcome = self.state.sync(snap.reported_flags(), self.polls);
        match outcome {
            Reconciliation::Corrected { from, to } => {
                info!(?from, ?to, "control state synced from server");
                self.publish_controls();
            }
            Reconciliation::Confirmed => debug!(poll = self.polls, "optimistic state confirmed"),
            Reconciliation::Lapsed { since_poll } => warn!(
                since_poll,
                poll = self.polls,
                "server did not report both control flags; keeping optimistic state"
            ),
            Reconciliation::Unchanged => {}
        }
        outcome
    }
}

/// Writes the scalar displays. Always overwritten, never diffed; fields the
/// snapshot leaves out keep their current text.
pub fn update_scalars<S: Surface + ?Sized>(surface: &mut S, snap: &StatsSnapshot) {
    set_scalar(surface, ElementId::OnlineCount, snap.online_count.as_ref());
    set_scalar(surface, ElementId::OpsPerSecond, snap.ops_per_second.as_ref());
    set_scalar(surface, ElementId::DemoCounter, snap.demo_counter.as_ref());

    if let Some(profile) = &snap.profile_stats {
        set_scalar(surface, ElementId::TotalPlayers, profile.total_players.as_ref());
        set_scalar(surface, ElementId::ActiveGames, profile.active_games.as_ref());
        set_scalar(surface, ElementId::HighScore, profile.high_score.as_ref());
        if let Some(status) = &profile.server_status {
            surface.set_text(ElementId::ServerUptime, status);
        }
    }
}

fn set_scalar<S: Surface + ?Sized>(surface: &mut S, id: ElementId, value: Option<&Scalar>) {
    if let Some(v) = value {
        surface.set_text(id, &v.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProfileStats;
    use crate::surface::MemorySurface;

    #[test]
    fn scalar_updates_are_idempotent() {
        let snap = StatsSnapshot {
            online_count: Some(Scalar::Int(12)),
            ops_per_second: Some(Scalar::Float(1520.5)),
            demo_counter: Some(Scalar::Int(7)),
            profile_stats: Some(ProfileStats {
                high_score: Some(Scalar::Text("12,500".into())),
                server_status: Some("Running".into()),
                ..ProfileStats::default()
            }),
            ..StatsSnapshot::default()
        };
        let mut surface = MemorySurface::new();
        update_scalars(&mut surface, &snap);
        update_scalars(&mut surface, &snap);

        assert_eq!(surface.text(ElementId::OnlineCount), Some("12"));
        assert_eq!(surface.text(ElementId::OpsPerSecond), Some("1520.5"));
        assert_eq!(surface.text(ElementId::DemoCounter), Some("7"));
        assert_eq!(surface.text(ElementId::HighScore), Some("12,500"));
        assert_eq!(surface.text(ElementId::ServerUptime), Some("Running"));
        assert_eq!(surface.text(ElementId::TotalPlayers), None);
    }

    #[test]
    fn absent_scalars_keep_previous_text() {
        let mut surface = MemorySurface::new();
        surface.set_text(ElementId::OnlineCount, "3");
        update_scalars(&mut surface, &StatsSnapshot::default());
        assert_eq!(surface.text(ElementId::OnlineCount), Some("3"));
    }
}
