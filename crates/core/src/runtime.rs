//! Executes dashboard [`Command`]s on a single-threaded executor.
//!
//! Every fetch, post and timer is its own task. Responses are fed back into the
//! [`Dashboard`] in whatever order they complete; the dashboard borrow is never
//! held across an `.await`.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

use crate::api::{Action, Backend};
use crate::config::ClientConfig;
use crate::dashboard::{Command, Dashboard};
use crate::surface::Surface;
use crate::time::Instant;

pub type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// The two things the driver needs from an event loop.
pub trait LocalExecutor {
    fn spawn(&self, fut: LocalFuture);

    fn sleep(&self, delay: Duration) -> LocalFuture;
}

pub struct Driver<S: Surface, B, X> {
    dashboard: Rc<RefCell<Dashboard<S>>>,
    backend: Rc<B>,
    executor: Rc<X>,
    poll_interval: Duration,
}

impl<S: Surface, B, X> Clone for Driver<S, B, X> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Rc::clone(&self.dashboard),
            backend: Rc::clone(&self.backend),
            executor: Rc::clone(&self.executor),
            poll_interval: self.poll_interval,
        }
    }
}

impl<S, B, X> Driver<S, B, X>
where
    S: Surface + 'static,
    B: Backend + 'static,
    X: LocalExecutor + 'static,
{
    pub fn new(dashboard: Dashboard<S>, backend: B, executor: X, config: &ClientConfig) -> Self {
        Self {
            dashboard: Rc::new(RefCell::new(dashboard)),
            backend: Rc::new(backend),
            executor: Rc::new(executor),
            poll_interval: config.poll_interval(),
        }
    }

    /// Polls once immediately, then every `poll_interval` for as long as the
    /// executor lives.
    pub fn start(&self) {
        self.resync();
        let this = self.clone();
        self.executor.spawn(Box::pin(async move {
            loop {
                this.executor.sleep(this.poll_interval).await;
                this.execute(Command::FetchStats);
            }
        }));
    }

    pub fn resync(&self) {
        let commands = self.dashboard.borrow_mut().resync();
        self.run(commands);
    }

    pub fn request(&self, action: Action) {
        let commands = self.dashboard.borrow_mut().request(action);
        self.run(commands);
    }

    pub fn run(&self, commands: Vec<Command>) {
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&self, command: Command) {
        let this = self.clone();
        let task: LocalFuture = match command {
            Command::FetchStats => Box::pin(async move {
                let started = Instant::now();
                let result = this.backend.fetch_stats().await;
                debug!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    ok = result.is_ok(),
                    "GET stats"
                );
                let next = this.dashboard.borrow_mut().on_stats(result);
                this.run(next);
            }),
            Command::Post(action) => Box::pin(async move {
                let started = Instant::now();
                let result = this.backend.post_action(action).await;
                debug!(
                    path = action.path(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    ok = result.is_ok(),
                    "POST action"
                );
                let next = this.dashboard.borrow_mut().on_action_result(action, result);
                this.run(next);
            }),
            Command::After { delay, task } => Box::pin(async move {
                this.executor.sleep(delay).await;
                let next = this.dashboard.borrow_mut().on_deferred(task);
                this.run(next);
            }),
        };
        self.executor.spawn(task);
    }

    pub fn with_dashboard<R>(&self, f: impl FnOnce(&Dashboard<S>) -> R) -> R {
        f(&self.dashboard.borrow())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::collections::VecDeque;

    use tokio::task::LocalSet;

    use crate::api::{ActionResponse, BackendError, StatsResponse};
    use crate::controls::{ControlMode, LOAD_LABEL, START_LABEL};
    use crate::dispatch::LOAD_ACK_LABEL;
    use crate::model::StatsSnapshot;
    use crate::render::Renderer;
    use crate::surface::{ElementId, MemorySurface};

    struct TokioExecutor;

    impl LocalExecutor for TokioExecutor {
        fn spawn(&self, fut: LocalFuture) {
            tokio::task::spawn_local(fut);
        }

        fn sleep(&self, delay: Duration) -> LocalFuture {
            Box::pin(tokio::time::sleep(delay))
        }
    }

    struct FakeBackend {
        fetches: Cell<usize>,
        posts: RefCell<Vec<Action>>,
        data_loaded: Cell<bool>,
        /// Per-fetch latency and reported `simulation_running`, consumed in
        /// request order. Empty means instant and not running.
        replies: RefCell<VecDeque<(Duration, bool)>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                fetches: Cell::new(0),
                posts: RefCell::new(Vec::new()),
                data_loaded: Cell::new(false),
                replies: RefCell::new(VecDeque::new()),
            }
        }
    }

    impl Backend for FakeBackend {
        async fn fetch_stats(&self) -> Result<StatsResponse, BackendError> {
            self.fetches.set(self.fetches.get() + 1);
            let reply = self.replies.borrow_mut().pop_front();
            let (latency, running) = reply.unwrap_or((Duration::ZERO, false));
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok(StatsResponse {
                success: true,
                error: None,
                snapshot: StatsSnapshot {
                    simulation_running: Some(running),
                    data_loaded: Some(self.data_loaded.get()),
                    ..StatsSnapshot::default()
                },
            })
        }

        async fn post_action(&self, action: Action) -> Result<ActionResponse, BackendError> {
            self.posts.borrow_mut().push(action);
            if action == Action::Load {
                self.data_loaded.set(true);
            }
            Ok(ActionResponse {
                success: true,
                error: None,
                message: Some("ok".into()),
            })
        }
    }

    fn driver() -> Driver<MemorySurface, FakeBackend, TokioExecutor> {
        let config = ClientConfig::default();
        let dashboard = Dashboard::new(MemorySurface::new(), Renderer::local(), &config);
        Driver::new(dashboard, FakeBackend::new(), TokioExecutor, &config)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn load_button(
        d: &Driver<MemorySurface, FakeBackend, TokioExecutor>,
    ) -> Option<(bool, &'static str)> {
        d.with_dashboard(|db| {
            db.surface()
                .button(ElementId::LoadButton)
                .map(|b| (b.enabled, b.label))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_on_interval() {
        LocalSet::new()
            .run_until(async {
                let d = driver();
                d.start();
                tokio::time::sleep(ms(10)).await;
                assert_eq!(d.backend().fetches.get(), 1);

                tokio::time::sleep(ms(2000)).await;
                assert_eq!(d.backend().fetches.get(), 2);

                tokio::time::sleep(ms(4000)).await;
                assert_eq!(d.backend().fetches.get(), 4);
                assert_eq!(d.with_dashboard(|db| db.polls()), 4);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn load_refreshes_early_and_resets_label() {
        LocalSet::new()
            .run_until(async {
                let d = driver();
                d.start();
                tokio::time::sleep(ms(10)).await;

                d.request(Action::Load);
                assert_eq!(load_button(&d), Some((false, "⏳ Loading...")));
                tokio::time::sleep(ms(10)).await;
                assert_eq!(*d.backend().posts.borrow(), vec![Action::Load]);
                assert_eq!(load_button(&d), Some((false, LOAD_ACK_LABEL)));

                // Out-of-cycle poll ~500ms after the load succeeded.
                tokio::time::sleep(ms(500)).await;
                assert_eq!(d.backend().fetches.get(), 2);
                let start = d.with_dashboard(|db| db.controls().start.clone());
                assert!(start.enabled);
                assert_eq!(start.label, START_LABEL);

                tokio::time::sleep(ms(1600)).await;
                assert_eq!(load_button(&d), Some((true, LOAD_LABEL)));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_control_sends_nothing() {
        LocalSet::new()
            .run_until(async {
                let d = driver();
                d.start();
                tokio::time::sleep(ms(10)).await;

                // No data loaded yet: start and stop are both disabled.
                d.request(Action::Start);
                d.request(Action::Stop);
                tokio::time::sleep(ms(10)).await;
                assert!(d.backend().posts.borrow().is_empty());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_polls_apply_in_arrival_order() {
        LocalSet::new()
            .run_until(async {
                let d = driver();
                d.backend().data_loaded.set(true);
                d.backend()
                    .replies
                    .borrow_mut()
                    .extend([(ms(300), true), (ms(50), false)]);
                let progress = || d.with_dashboard(|db| (db.polls(), db.state().mode()));

                d.resync();
                tokio::time::sleep(ms(1)).await;
                d.resync();

                // The second request answers first.
                tokio::time::sleep(ms(100)).await;
                assert_eq!(d.backend().fetches.get(), 2);
                assert_eq!(progress(), (1, ControlMode::IdleLoaded));

                // The slow one is not dropped: the last response processed wins.
                tokio::time::sleep(ms(300)).await;
                assert_eq!(progress(), (2, ControlMode::Running));
                let stop = d.with_dashboard(|db| db.controls().stop.clone());
                assert!(stop.enabled);
            })
            .await;
    }
}
