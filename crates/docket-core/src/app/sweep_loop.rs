//! SweepLoop - due reminder の定期 sweep

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::context::AppContext;
use super::reminders::ReminderService;

/// Shortest tick the loop accepts; `interval` is raised to this.
const MIN_TICK: Duration = Duration::from_millis(1);

/// バックグラウンド sweep のハンドル
///
/// # 停止
/// - `request_shutdown()`: 処理中の reminder の後でループを止める
/// - `shutdown_and_join()`: 止めた上で終了を待つ
pub struct SweepLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SweepLoop {
    /// Register the recurring job with the gateway and start ticking.
    ///
    /// A gateway failure is logged; the local loop runs regardless.
    pub async fn spawn(
        ctx: Arc<AppContext>,
        interval: Duration,
        batch_limit: usize,
    ) -> Self {
        let interval = interval.max(MIN_TICK);
        let secs = interval.as_secs().max(1);
        match ctx.gateway.schedule_recurring(secs).await {
            Ok(job_id) => tracing::info!(job_id = %job_id, interval_secs = secs, "sweep job registered"),
            Err(e) => tracing::warn!(error = %e, "could not register sweep job; running locally only"),
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let service = ReminderService::new(ctx);
        let join = tokio::spawn(async move {
            sweep_loop(service, interval, batch_limit, &mut shutdown_rx).await;
        });

        Self { shutdown_tx, join }
    }

    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(e) = self.join.await {
            tracing::error!(error = %e, "sweep loop task panicked");
        }
    }
}

async fn sweep_loop(
    service: ReminderService,
    interval: Duration,
    batch_limit: usize,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                // sender dropped: nobody can stop us any more, so stop now
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        let as_of = service.ctx.clock.now();
        if let Err(e) = service
            .process_due_sweep_until(as_of, batch_limit, shutdown_rx)
            .await
        {
            tracing::error!(error = %e, "sweep run failed");
        }
    }
    tracing::info!("sweep loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::Harness;
    use crate::domain::ReminderStatus;
    use crate::impls::JobSchedule;
    use crate::ports::JobId;

    #[tokio::test]
    async fn registers_job_and_fires_due_reminders() {
        let h = Harness::new();
        let wi = h.work_item("Report").await;
        let id = h.schedule(wi, chrono::Duration::minutes(10), "x").await;
        h.clock.advance(chrono::Duration::minutes(15));

        let sweep = SweepLoop::spawn(h.ctx.clone(), Duration::from_millis(10), 10).await;
        for _ in 0..100 {
            if h.reminder(id).await.status() != ReminderStatus::Scheduled {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        sweep.shutdown_and_join().await;

        assert_eq!(h.reminder(id).await.status(), ReminderStatus::Triggered);
        let job = h.gateway.job(&JobId::sweep()).await.unwrap();
        assert_eq!(job.schedule, JobSchedule::Recurring { every_secs: 1 });
    }

    #[tokio::test]
    async fn zero_interval_is_raised_to_the_minimum_tick() {
        let h = Harness::new();
        let sweep = SweepLoop::spawn(h.ctx.clone(), Duration::ZERO, 10).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        tokio::time::timeout(Duration::from_secs(5), sweep.shutdown_and_join())
            .await
            .unwrap();
        assert_eq!(
            h.gateway.job(&JobId::sweep()).await.unwrap().schedule,
            JobSchedule::Recurring { every_secs: 1 }
        );
    }

    #[tokio::test]
    async fn shutdown_without_work_returns_promptly() {
        let h = Harness::new();
        h.gateway.set_unavailable(true);
        let sweep = SweepLoop::spawn(h.ctx.clone(), Duration::from_secs(3600), 10).await;

        tokio::time::timeout(Duration::from_secs(5), sweep.shutdown_and_join())
            .await
            .unwrap();
    }
}
