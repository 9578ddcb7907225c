//! AppBuilder - ports を [`Docket`] に組み立てる
//!
//! # 起動時検証（Fail-fast）
//! - 必須 port が欠けていれば `build()` が失敗する
//! - 不正な config も `build()` の時点で拒否（最初のコマンドまで持ち越さない）

use std::sync::Arc;

use super::context::AppContext;
use super::reminders::ReminderService;
use super::sweep::SweepReport;
use super::sweep_loop::SweepLoop;
use super::work_items::WorkItemService;
use crate::config::DocketConfig;
use crate::domain::errors::{DocketError, Result};
use crate::ports::{
    Clock, EventSink, IdGenerator, JobDispatchGateway, NoopEventSink, NotificationSender,
    ReminderStore, SystemClock, UlidGenerator, WorkItemStore,
};

/// AppBuilder はアプリケーションを構築
///
/// - 必須: 2 つの store、notifier、job gateway
/// - 省略時: event sink（`NoopEventSink`）、clock（`SystemClock`）、
///   id generator（clock を使う `UlidGenerator`）、config（`DocketConfig::default()`）
#[derive(Default)]
pub struct AppBuilder {
    reminders: Option<Arc<dyn ReminderStore>>,
    work_items: Option<Arc<dyn WorkItemStore>>,
    notifier: Option<Arc<dyn NotificationSender>>,
    gateway: Option<Arc<dyn JobDispatchGateway>>,
    events: Option<Arc<dyn EventSink>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    config: Option<DocketConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing port: {0}. Register it on the AppBuilder before build().")]
    MissingPort(&'static str),

    #[error(transparent)]
    Config(#[from] DocketError),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reminder_store(mut self, store: Arc<dyn ReminderStore>) -> Self {
        self.reminders = Some(store);
        self
    }

    pub fn work_item_store(mut self, store: Arc<dyn WorkItemStore>) -> Self {
        self.work_items = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationSender>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn job_gateway(mut self, gateway: Arc<dyn JobDispatchGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = Some(sink);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn config(mut self, config: DocketConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<Docket, BuildError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(Arc::clone(&clock))));

        let ctx = Arc::new(AppContext {
            reminders: self.reminders.ok_or(BuildError::MissingPort("reminder store"))?,
            work_items: self.work_items.ok_or(BuildError::MissingPort("work item store"))?,
            notifier: self.notifier.ok_or(BuildError::MissingPort("notification sender"))?,
            gateway: self.gateway.ok_or(BuildError::MissingPort("job dispatch gateway"))?,
            events: self.events.unwrap_or_else(|| Arc::new(NoopEventSink)),
            clock,
            ids,
            policy: config.scheduling_policy(),
        });

        Ok(Docket {
            reminders: ReminderService::new(Arc::clone(&ctx)),
            work_items: WorkItemService::new(Arc::clone(&ctx)),
            ctx,
            config,
        })
    }
}

/// The assembled application.
pub struct Docket {
    pub reminders: ReminderService,
    pub work_items: WorkItemService,
    ctx: Arc<AppContext>,
    config: DocketConfig,
}

impl Docket {
    pub fn config(&self) -> &DocketConfig {
        &self.config
    }

    /// One sweep at the current clock time with the configured batch limit.
    pub async fn run_sweep_once(&self) -> Result<SweepReport> {
        let as_of = self.ctx.clock.now();
        self.reminders
            .process_due_sweep(as_of, self.config.sweep.batch_limit)
            .await
    }

    pub async fn spawn_sweep_loop(&self) -> SweepLoop {
        SweepLoop::spawn(
            Arc::clone(&self.ctx),
            self.config.sweep_interval(),
            self.config.sweep.batch_limit,
        )
        .await
    }
}
