//! Cron-driven rotation for running as a resident service.

use crate::config::RotatePlan;
use crate::daemon::signal::Reloader;
use crate::rotate::{RotationReport, Rotator};
use crate::utils::errors::RotateError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

/// Run one rotation on the blocking thread pool.
pub async fn run_blocking<R>(plan: Arc<RotatePlan>, reloader: R) -> anyhow::Result<RotationReport>
where
    R: Reloader + Send + 'static,
{
    let report = tokio::task::spawn_blocking(move || Rotator::new(reloader).run(&plan)).await??;
    Ok(report)
}

pub struct RotationScheduler<R> {
    scheduler: Mutex<JobScheduler>,
    plan: Arc<RotatePlan>,
    reloader: R,
}

impl<R> RotationScheduler<R>
where
    R: Reloader + Clone + Send + Sync + 'static,
{
    pub async fn new(plan: RotatePlan, reloader: R) -> anyhow::Result<Self> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            plan: Arc::new(plan),
            reloader,
        })
    }

    pub async fn schedule(&self, cron_expression: &str) -> anyhow::Result<()> {
        let plan = self.plan.clone();
        let reloader = self.reloader.clone();

        let job = Job::new_async(cron_expression, move |_uuid, _lock| {
            let plan = plan.clone();
            let reloader = reloader.clone();
            Box::pin(async move {
                match run_blocking(plan, reloader).await {
                    Ok(report) => {
                        tracing::info!(
                            backup_dir = %report.backup_dir.display(),
                            moved = report.moved.len(),
                            removed = report.removed.len(),
                            "Scheduled rotation finished"
                        );
                    }
                    Err(e) => match e.downcast_ref::<RotateError>() {
                        Some(RotateError::AlreadyRotated(path)) => {
                            tracing::warn!(path = %path.display(), "Skipping scheduled rotation: backup already exists today");
                        }
                        _ => tracing::error!(error = %e, "Scheduled rotation failed"),
                    },
                }
            })
        })?;

        self.scheduler.lock().await.add(job).await?;
        tracing::info!(cron = %cron_expression, "Rotation scheduled");
        Ok(())
    }

    pub async fn start(&self) -> anyhow::Result<()> {
        self.scheduler.lock().await.start().await?;
        Ok(())
    }

    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.scheduler.lock().await.shutdown().await?;
        Ok(())
    }

    /// Start the scheduler and keep it running until `cancel` fires.
    pub async fn run_until(&self, cancel: CancellationToken) -> anyhow::Result<()> {
        self.start().await?;
        cancel.cancelled().await;
        self.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotateOptions;
    use crate::utils::errors::Result;
    use nix::unistd::Pid;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct CountingReloader {
        calls: Arc<AtomicUsize>,
    }

    impl Reloader for CountingReloader {
        fn reload(&self, _pid: Pid) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn plan(temp: &TempDir) -> RotatePlan {
        let source = temp.path().join("logs");
        let backup = temp.path().join("bak");
        let pid = temp.path().join("nginx.pid");
        fs::create_dir(&source).unwrap();
        fs::create_dir(&backup).unwrap();
        fs::write(&pid, "99\n").unwrap();
        fs::write(source.join("access.log"), "GET /").unwrap();

        RotateOptions {
            source_dir: Some(source),
            backup_dir: Some(backup),
            pid_file: Some(pid),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_blocking() {
        let temp = TempDir::new().unwrap();
        let reloader = CountingReloader::default();

        let report = run_blocking(Arc::new(plan(&temp)), reloader.clone())
            .await
            .unwrap();

        assert_eq!(report.moved.len(), 1);
        assert_eq!(report.reloaded, Some(Pid::from_raw(99)));
        assert_eq!(reloader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_blocking_keeps_rotate_error() {
        let temp = TempDir::new().unwrap();
        let plan = Arc::new(plan(&temp));
        let reloader = CountingReloader::default();

        run_blocking(plan.clone(), reloader.clone()).await.unwrap();
        let err = run_blocking(plan, reloader).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RotateError>(),
            Some(RotateError::AlreadyRotated(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_scheduled_rotation_runs_once_per_day() {
        let temp = TempDir::new().unwrap();
        let plan = plan(&temp);
        let backup = plan.backup_dir.clone();
        let reloader = CountingReloader::default();

        let scheduler = RotationScheduler::new(plan, reloader.clone()).await.unwrap();
        scheduler.schedule("* * * * * *").await.unwrap();

        let cancel = CancellationToken::new();
        let calls = reloader.calls.clone();
        let stopper = cancel.clone();
        tokio::spawn(async move {
            // Every-second schedule: the first tick rotates, later ticks hit today's directory
            let mut waited = Duration::ZERO;
            while waited < Duration::from_secs(10) && calls.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
                waited += Duration::from_millis(100);
            }
            tokio::time::sleep(Duration::from_millis(2500)).await;
            stopper.cancel();
        });

        tokio::time::timeout(Duration::from_secs(30), scheduler.run_until(cancel))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reloader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fs::read_dir(&backup).unwrap().count(), 1);
    }
}
