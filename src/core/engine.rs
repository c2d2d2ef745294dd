use crate::core::dashboard::{Dashboard, LoadState};
use crate::core::scheduler::{Animator, FrameLoop, MonotonicClock};
use crate::core::store::DataStore;
use crate::domain::model::DashboardSnapshot;
use crate::domain::ports::{Clock, Presenter};
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;
use std::rc::Rc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Where the dashboard's active domain comes from for one run.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub default_domain: String,
    pub site: Option<String>,
    pub location: Option<String>,
}

impl Selection {
    pub fn new(default_domain: impl Into<String>) -> Self {
        Self {
            default_domain: default_domain.into(),
            ..Self::default()
        }
    }

    pub fn with_site(mut self, site: Option<&str>) -> Self {
        self.site = site.map(str::to_owned);
        self
    }

    pub fn with_location(mut self, location: Option<&str>) -> Self {
        self.location = location.map(str::to_owned);
        self
    }
}

/// `tokio::time::interval` rejects a zero period.
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

pub struct DashboardEngine {
    store: DataStore,
    frame_interval: Duration,
    monitor: RunMonitor,
}

impl DashboardEngine {
    pub fn new(store: DataStore, frame_interval: Duration) -> Self {
        Self::new_with_monitoring(store, frame_interval, false)
    }

    pub fn new_with_monitoring(store: DataStore, frame_interval: Duration, monitor_enabled: bool) -> Self {
        Self {
            store,
            frame_interval: frame_interval.max(MIN_FRAME_INTERVAL),
            monitor: RunMonitor::new(monitor_enabled),
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Mounts a dashboard, loads the dataset once and drives frames until
    /// the load has resolved and every card has settled.
    ///
    /// Runs on the current task: timelines are `Rc`-based and never cross
    /// threads.
    pub async fn run<P: Presenter>(
        &mut self,
        selection: &Selection,
        presenter: &mut P,
    ) -> Result<DashboardSnapshot> {
        tracing::info!("🚀 Starting dashboard run");
        self.monitor.log_stats("Start");

        let clock = Rc::new(MonotonicClock::new());
        let frames = Rc::new(FrameLoop::new());
        let animator = Animator::new(clock.clone(), frames.clone());

        let mut dashboard = Dashboard::mount(&animator, &selection.default_domain);
        if let Some(site) = selection.site.as_deref() {
            dashboard.set_domain(site);
        }
        if let Some(location) = selection.location.as_deref() {
            dashboard.navigate(location);
        }

        let ticket = dashboard.load_ticket();
        let load = self.store.load();
        tokio::pin!(load);
        let mut fetched = false;

        let mut ticker = tokio::time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                outcome = &mut load, if !fetched => {
                    fetched = true;
                    if ticket.is_alive() {
                        dashboard.apply_load(outcome);
                    }
                    let phase = match dashboard.load_state() {
                        LoadState::Ready(_) => "Dataset loaded",
                        LoadState::Failed { .. } => "Dataset failed",
                        LoadState::Pending => "Dataset ignored",
                    };
                    self.monitor.log_stats(phase);
                }
                _ = ticker.tick() => {
                    frames.run_frame(clock.now());
                    self.monitor.record_frame();
                    presenter.present(&dashboard.snapshot())?;
                    if fetched && dashboard.is_settled() {
                        break;
                    }
                }
            }
        }

        tracing::info!(
            "✅ Dashboard settled after {} frames for '{}'",
            frames.frames_run(),
            dashboard.domain()
        );
        self.monitor.log_final_stats();

        let snapshot = dashboard.snapshot();
        presenter.finish(&snapshot)?;
        Ok(snapshot)
    }
}
