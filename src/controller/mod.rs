//! Dashboard Controller
//!
//! Drives one embedded dashboard widget through its lifecycle:
//!
//! ```text
//! Uninitialized --initialize--> Loading
//! Loading --success--> Ready
//! Loading --failure--> Failed
//! Failed --retry timer (retry_count < max)--> Loading
//! Failed (retry_count == max) is terminal
//! Ready --refresh--> Ready (delegated to the widget)
//! not Ready --online--> Loading
//! ```
//!
//! Widget failures are caught here and turned into a rendered error panel plus
//! a bounded, delayed retry. Nothing is propagated to the caller.
//!
//! Timers cannot be cancelled. Each retry timer carries a generation and only
//! the most recently scheduled one may start an attempt.

pub mod region;
pub mod scheduler;
pub mod state;
pub mod view;

pub use region::{ConsoleRegion, DisplayRegion};
pub use scheduler::{Scheduler, TokioScheduler};
pub use state::{ControllerState, EmbedConfig, Phase};
pub use view::{View, render};

use crate::consts::embed_consts::controller::{
    loading_cleanup_delay, page_ready_cleanup_delay, retry_delay,
};
use crate::error_classifier::ErrorClassifier;
use crate::events::{ControllerEvent, Timer};
use crate::widget::error::WidgetError;
use crate::widget::{Widget, WidgetOptions, WidgetSdk};
use log::{debug, info, log, warn};

pub struct DashboardController<W: WidgetSdk, S: Scheduler, R: DisplayRegion> {
    config: EmbedConfig,
    sdk: W,
    scheduler: S,
    region: R,
    state: ControllerState,
    widget: Option<Box<dyn Widget>>,
    error_classifier: ErrorClassifier,
}

impl<W: WidgetSdk, S: Scheduler, R: DisplayRegion> DashboardController<W, S, R> {
    pub fn new(config: EmbedConfig, sdk: W, scheduler: S, region: R) -> Self {
        Self {
            config,
            sdk,
            scheduler,
            region,
            state: ControllerState::default(),
            widget: None,
            error_classifier: ErrorClassifier::new(),
        }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn region(&self) -> &R {
        &self.region
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }

    /// Dispatches one event.
    pub async fn handle(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Initialize => self.initialize().await,
            ControllerEvent::Refresh => self.refresh().await,
            ControllerEvent::Online => self.on_online().await,
            ControllerEvent::Offline => self.on_offline(),
            ControllerEvent::Timer(timer) => self.on_timer(timer).await,
        }
    }

    /// Arms the page-level watchdog that clears any leftover loading overlay.
    pub fn on_page_ready(&mut self) {
        self.scheduler
            .schedule(page_ready_cleanup_delay(), Timer::PageReadyCleanup);
    }

    /// Creates and initializes the widget, retrying on failure.
    pub async fn initialize(&mut self) {
        self.state.phase = Phase::Loading;
        self.state.retry_pending = false;
        self.present();

        match self.mount().await {
            Ok(widget) => {
                self.widget = Some(widget);
                self.state.phase = Phase::Ready;
                self.state.last_error = None;
                self.remove_loading();
                self.present();
                self.scheduler
                    .schedule(loading_cleanup_delay(), Timer::LoadingCleanup);
                info!("Dashboard {} ready", self.config.dashboard_id);
            }
            Err(e) => self.fail(e),
        }
    }

    /// Reloads a ready widget; anything else is treated as a fresh initialize.
    pub async fn refresh(&mut self) {
        if self.state.is_ready() {
            if let Some(widget) = self.widget.as_mut() {
                if let Err(e) = widget.refresh().await {
                    warn!("Dashboard refresh failed: {}", e);
                }
                return;
            }
        }
        self.initialize().await;
    }

    pub async fn on_online(&mut self) {
        if self.state.is_ready() {
            debug!("Connectivity restored; dashboard already initialized");
            return;
        }
        info!("Connectivity restored; initializing dashboard");
        self.initialize().await;
    }

    /// Connectivity loss. Reserved hook, no state change.
    pub fn on_offline(&mut self) {
        debug!("Connectivity lost");
    }

    pub async fn on_timer(&mut self, timer: Timer) {
        match timer {
            Timer::Retry(generation) => {
                if !self.state.expects_retry(generation) {
                    debug!(
                        "Ignoring stale retry timer #{} in phase {}",
                        generation, self.state.phase
                    );
                    return;
                }
                self.initialize().await;
            }
            Timer::LoadingCleanup | Timer::PageReadyCleanup => self.remove_loading(),
        }
    }

    /// Removes the loading overlay if one is still present.
    pub fn remove_loading(&mut self) {
        if self.region.remove_loading() {
            debug!("Removed loading overlay from #{}", self.region.id());
        }
    }

    /// Acquires the SDK, constructs the widget and awaits its setup.
    async fn mount(&mut self) -> Result<Box<dyn Widget>, WidgetError> {
        self.sdk.load().await?;

        let mut widget = self.sdk.create(WidgetOptions {
            instance_url: self.config.instance_url.clone(),
            workspace_id: self.config.workspace_id.clone(),
            dashboard_id: self.config.dashboard_id.clone(),
            token: self.config.access_token.clone(),
            container: self.region.id().to_string(),
        })?;

        // The widget owns the region from here on.
        self.remove_loading();

        widget.initialize().await?;
        Ok(widget)
    }

    fn fail(&mut self, error: WidgetError) {
        let category = self.error_classifier.classify(error.description());
        let level: log::Level = self.error_classifier.log_level(category).into();
        log!(
            level,
            "Failed to initialize dashboard ({} stage, {}): {}",
            error.stage(),
            category,
            error
        );

        self.state.phase = Phase::Failed;
        self.state.last_error = Some(error.description().to_string());

        if self.state.retries_exhausted() {
            self.state.retry_pending = false;
            warn!(
                "Giving up after {} retries; manual intervention required",
                self.state.retry_count
            );
        } else {
            self.state.retry_count += 1;
            self.state.retry_pending = true;
            self.state.retry_generation += 1;
            self.scheduler
                .schedule(retry_delay(), Timer::Retry(self.state.retry_generation));
            info!(
                "Retrying dashboard initialization ({}/{}) in {:?}",
                self.state.retry_count,
                self.state.max_retries,
                retry_delay()
            );
        }
        self.present();
    }

    /// Pushes the view for the current state.
    fn present(&mut self) {
        self.region.show(&render(&self.state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::region::MemoryRegion;
    use crate::controller::scheduler::VirtualScheduler;
    use crate::controller::view::RETRYING_NOTICE;
    use crate::widget::{MockWidget, MockWidgetSdk};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type TestController = DashboardController<MockWidgetSdk, VirtualScheduler, MemoryRegion>;

    fn config() -> EmbedConfig {
        EmbedConfig {
            instance_url: "https://adb-123.azuredatabricks.net".to_string(),
            workspace_id: "123".to_string(),
            dashboard_id: "dash-1".to_string(),
            access_token: "scoped-token".to_string(),
        }
    }

    fn ready_widget(refreshes: Arc<AtomicUsize>) -> MockWidget {
        let mut widget = MockWidget::new();
        widget.expect_initialize().returning(|| Ok(()));
        widget.expect_refresh().returning(move || {
            refreshes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        widget
    }

    /// SDK whose widgets always initialize successfully.
    fn healthy_sdk(refreshes: Arc<AtomicUsize>) -> MockWidgetSdk {
        let mut sdk = MockWidgetSdk::new();
        sdk.expect_load().returning(|| Ok(()));
        sdk.expect_create().returning(move |options| {
            assert_eq!(options.container, "dashboard-content");
            Ok(Box::new(ready_widget(refreshes.clone())))
        });
        sdk
    }

    /// SDK whose widget setup always fails with `message`.
    fn failing_sdk(message: &'static str, attempts: Arc<AtomicUsize>) -> MockWidgetSdk {
        let mut sdk = MockWidgetSdk::new();
        sdk.expect_load().returning(|| Ok(()));
        sdk.expect_create().returning(move |_| {
            attempts.fetch_add(1, Ordering::SeqCst);
            let mut widget = MockWidget::new();
            widget
                .expect_initialize()
                .returning(move || Err(WidgetError::Initialize(message.to_string())));
            Ok(Box::new(widget))
        });
        sdk
    }

    fn controller(sdk: MockWidgetSdk, scheduler: &VirtualScheduler) -> TestController {
        DashboardController::new(config(), sdk, scheduler.clone(), MemoryRegion::default())
    }

    /// Fires pending timers one by one until none are left.
    async fn run_until_idle(controller: &mut TestController, scheduler: &VirtualScheduler) {
        while let Some(timer) = scheduler.fire_next() {
            controller.on_timer(timer).await;
        }
    }

    #[tokio::test]
    async fn successful_initialize_ends_ready_without_overlay() {
        let scheduler = VirtualScheduler::new();
        let mut controller = controller(healthy_sdk(Arc::default()), &scheduler);

        controller.initialize().await;

        assert_eq!(controller.state().phase, Phase::Ready);
        assert_eq!(controller.state().retry_count, 0);
        assert!(controller.has_widget());
        assert_eq!(
            scheduler.pending(),
            vec![(Duration::from_secs(2), Timer::LoadingCleanup)]
        );

        run_until_idle(&mut controller, &scheduler).await;
        let region = controller.region();
        assert!(region.history[0].is_loading());
        assert_eq!(region.history.last(), Some(&View::Widget));
        assert_eq!(region.content, Some(View::Widget), "loading overlay must be gone");
        assert_eq!(region.loading_removals, 1);
    }

    #[tokio::test]
    // Every attempt fails with a network error until retries run out.
    async fn persistent_network_failure_exhausts_retries() {
        let scheduler = VirtualScheduler::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut controller =
            controller(failing_sdk("network timeout", attempts.clone()), &scheduler);

        controller.initialize().await;
        assert_eq!(controller.state().phase, Phase::Failed);
        assert_eq!(controller.state().retry_count, 1);
        assert_eq!(
            scheduler.pending(),
            vec![(Duration::from_secs(3), Timer::Retry(1))]
        );

        run_until_idle(&mut controller, &scheduler).await;

        let state = controller.state();
        assert_eq!(state.phase, Phase::Failed);
        assert_eq!(state.retry_count, 3);
        assert!(!state.retry_pending);
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        assert_eq!(scheduler.now(), Duration::from_secs(9));
        assert!(scheduler.pending().is_empty(), "no retry past exhaustion");

        let last = controller.region().content.clone().unwrap();
        assert_eq!(
            last,
            View::Error {
                icon: "!".to_string(),
                title: "Erro ao Carregar Dashboard".to_string(),
                message: "Erro de conexão. Verifique sua conexão com a internet.".to_string(),
                retrying: false,
            }
        );
        assert!(!last.to_html().contains(RETRYING_NOTICE));
        assert!(
            !controller.region().history.contains(&View::Widget),
            "a failed attempt must never look ready"
        );
    }

    #[tokio::test]
    async fn retry_window_shows_notice_while_retry_is_pending() {
        let scheduler = VirtualScheduler::new();
        let mut controller = controller(failing_sdk("invalid token", Arc::default()), &scheduler);

        controller.initialize().await;

        match controller.region().content.clone().unwrap() {
            View::Error {
                message, retrying, ..
            } => {
                assert_eq!(message, "Erro de autenticação. Verifique as credenciais.");
                assert!(retrying);
            }
            other => panic!("expected error panel, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn exhausted_controller_ignores_late_retry_timers() {
        let scheduler = VirtualScheduler::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut controller = controller(failing_sdk("boom", attempts.clone()), &scheduler);
        controller.initialize().await;
        run_until_idle(&mut controller, &scheduler).await;
        assert_eq!(attempts.load(Ordering::SeqCst), 4);

        for generation in 0..=4 {
            controller.on_timer(Timer::Retry(generation)).await;
        }
        assert_eq!(controller.state().phase, Phase::Failed);
        assert_eq!(controller.state().retry_count, 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    // A manual attempt during the retry window supersedes the pending timer.
    async fn online_during_retry_window_keeps_retry_bound() {
        let scheduler = VirtualScheduler::new();
        let attempts = Arc::new(AtomicUsize::new(0));
        let mut controller =
            controller(failing_sdk("network timeout", attempts.clone()), &scheduler);

        controller.initialize().await;
        controller.on_online().await;
        assert_eq!(controller.state().retry_count, 2);
        assert_eq!(scheduler.pending().len(), 2);

        let mut attempts_after_exhaustion = 0;
        while let Some(timer) = scheduler.fire_next() {
            let exhausted =
                controller.state().retries_exhausted() && !controller.state().retry_pending;
            let before = attempts.load(Ordering::SeqCst);
            controller.on_timer(timer).await;
            if exhausted && attempts.load(Ordering::SeqCst) > before {
                attempts_after_exhaustion += 1;
            }
        }

        assert_eq!(attempts_after_exhaustion, 0);
        assert_eq!(controller.state().retry_count, 3);
        assert!(!controller.state().retry_pending);
        // initial + online + two automatic retries
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn recovers_when_a_retry_succeeds() {
        let scheduler = VirtualScheduler::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut sdk = MockWidgetSdk::new();
        let load_calls = calls.clone();
        sdk.expect_load().returning(move || {
            if load_calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(WidgetError::Load("Failed to fetch module".to_string()))
            } else {
                Ok(())
            }
        });
        sdk.expect_create()
            .returning(|_| Ok(Box::new(ready_widget(Arc::default()))));
        let mut controller = controller(sdk, &scheduler);

        controller.initialize().await;
        assert_eq!(controller.state().phase, Phase::Failed);

        let fired = scheduler.advance(Duration::from_secs(3));
        assert_eq!(fired, vec![Timer::Retry(1)]);
        controller.on_timer(Timer::Retry(1)).await;

        assert_eq!(controller.state().phase, Phase::Ready);
        assert_eq!(controller.state().retry_count, 1);
        assert!(controller.state().last_error.is_none());
    }

    #[tokio::test]
    async fn refresh_when_ready_delegates_to_widget() {
        let scheduler = VirtualScheduler::new();
        let refreshes = Arc::new(AtomicUsize::new(0));
        let mut controller = controller(healthy_sdk(refreshes.clone()), &scheduler);
        controller.initialize().await;
        let history_len = controller.region().history.len();

        controller.refresh().await;
        controller.handle(ControllerEvent::Refresh).await;

        assert_eq!(refreshes.load(Ordering::SeqCst), 2);
        assert_eq!(controller.state().phase, Phase::Ready);
        assert_eq!(controller.state().retry_count, 0);
        assert_eq!(controller.region().history.len(), history_len);
    }

    #[tokio::test]
    async fn failed_widget_refresh_keeps_ready_state() {
        let scheduler = VirtualScheduler::new();
        let mut sdk = MockWidgetSdk::new();
        sdk.expect_load().returning(|| Ok(()));
        sdk.expect_create().returning(|_| {
            let mut widget = MockWidget::new();
            widget.expect_initialize().returning(|| Ok(()));
            widget
                .expect_refresh()
                .returning(|| Err(WidgetError::Refresh("network down".to_string())));
            Ok(Box::new(widget))
        });
        let mut controller = controller(sdk, &scheduler);
        controller.initialize().await;

        controller.refresh().await;

        assert_eq!(controller.state().phase, Phase::Ready);
        assert_eq!(controller.state().retry_count, 0);
    }

    #[tokio::test]
    // Refresh before a widget exists is indistinguishable from initialize.
    async fn refresh_when_not_ready_initializes() {
        let via_refresh = VirtualScheduler::new();
        let mut refreshed = controller(failing_sdk("dashboard gone", Arc::default()), &via_refresh);
        refreshed.refresh().await;

        let via_initialize = VirtualScheduler::new();
        let mut initialized =
            controller(failing_sdk("dashboard gone", Arc::default()), &via_initialize);
        initialized.initialize().await;

        assert_eq!(refreshed.state(), initialized.state());
        assert_eq!(refreshed.region().history, initialized.region().history);
        assert_eq!(via_refresh.pending(), via_initialize.pending());
    }

    #[tokio::test]
    async fn offline_then_online_initializes_exactly_once() {
        let scheduler = VirtualScheduler::new();
        let mut sdk = MockWidgetSdk::new();
        sdk.expect_load().times(1).returning(|| Ok(()));
        sdk.expect_create()
            .times(1)
            .returning(|_| Ok(Box::new(ready_widget(Arc::default()))));
        let mut controller = controller(sdk, &scheduler);

        controller.handle(ControllerEvent::Offline).await;
        assert_eq!(controller.state().phase, Phase::Uninitialized);
        controller.handle(ControllerEvent::Online).await;
        assert_eq!(controller.state().phase, Phase::Ready);

        // Already initialized: further connectivity changes do nothing.
        controller.handle(ControllerEvent::Online).await;
        assert_eq!(controller.state().phase, Phase::Ready);
    }

    #[tokio::test]
    async fn construction_failure_is_caught_and_classified() {
        let scheduler = VirtualScheduler::new();
        let mut sdk = MockWidgetSdk::new();
        sdk.expect_load().returning(|| Ok(()));
        sdk.expect_create()
            .returning(|_| Err(WidgetError::Construct("missing dashboard id".to_string())));
        let mut controller = controller(sdk, &scheduler);

        controller.initialize().await;

        assert_eq!(controller.state().phase, Phase::Failed);
        assert!(!controller.has_widget());
        match controller.region().content.clone().unwrap() {
            View::Error { message, .. } => {
                assert_eq!(message, "Dashboard não encontrado. Verifique o ID do dashboard.")
            }
            other => panic!("expected error panel, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn cleanup_without_overlay_is_noop() {
        let scheduler = VirtualScheduler::new();
        let mut controller = controller(MockWidgetSdk::new(), &scheduler);

        controller.remove_loading();
        controller.on_timer(Timer::LoadingCleanup).await;

        assert_eq!(controller.state().phase, Phase::Uninitialized);
        assert_eq!(controller.region().loading_removals, 0);
    }

    #[tokio::test]
    async fn page_ready_watchdog_clears_stuck_overlay() {
        let scheduler = VirtualScheduler::new();
        let mut controller = controller(MockWidgetSdk::new(), &scheduler);
        controller.on_page_ready();
        controller.region.show(&render(&ControllerState::loading()));

        assert!(scheduler.advance(Duration::from_secs(4)).is_empty());
        for timer in scheduler.advance(Duration::from_secs(1)) {
            controller.on_timer(timer).await;
        }

        assert!(controller.region().content.is_none());
    }
}
