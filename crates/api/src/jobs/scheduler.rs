//! Cyclic job scheduler.
//!
//! One background loop owns every registered job. The loop wakes on a small
//! fixed tick, checks elapsed time per job, and runs the due ones inline, so
//! job execution may lag its period by up to the tick plus the runtime of
//! earlier jobs. A failing job is reported and the loop continues; the only
//! way the loop ends is cancellation through [`JobScheduler::shutdown`].

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::services::telemetry::Telemetry;

/// Default polling increment of the scheduler loop.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

/// Trait for implementing cyclic background jobs.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// The name of this job (used for logging).
    fn name(&self) -> &'static str;

    /// Fixed period between executions.
    fn period(&self) -> Duration;

    /// Execute the job. Returns Ok(()) on success, Err with message on failure.
    async fn execute(&self) -> Result<(), String>;
}

/// Cancellable background scheduler holding `(period, job)` registrations.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    tick: Duration,
    telemetry: Telemetry,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handle: Option<JoinHandle<()>>,
}

impl JobScheduler {
    /// Create a new scheduler reporting failures to `telemetry`.
    pub fn new(telemetry: Telemetry) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            tick: DEFAULT_TICK,
            telemetry,
            shutdown_tx,
            shutdown_rx,
            handle: None,
        }
    }

    /// Override the polling increment. Intended for tests.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Register a job with the scheduler.
    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    /// Spawn the scheduler loop. Jobs first run one full period after start.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            warn!("Job scheduler already started");
            return;
        }

        info!("Starting job scheduler with {} jobs", self.jobs.len());
        let jobs = self.jobs.clone();
        let tick = self.tick;
        let telemetry = self.telemetry.clone();
        let mut shutdown_rx = self.shutdown_rx.clone();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // Consume the immediate first tick.
            interval.tick().await;

            let mut last_run: Vec<Instant> = jobs.iter().map(|_| Instant::now()).collect();

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        for (idx, job) in jobs.iter().enumerate() {
                            if last_run[idx].elapsed() < job.period() {
                                continue;
                            }
                            last_run[idx] = Instant::now();

                            let name = job.name();
                            let start = Instant::now();
                            match job.execute().await {
                                Ok(()) => {
                                    info!(
                                        job = name,
                                        elapsed_ms = start.elapsed().as_millis() as u64,
                                        "Job completed"
                                    );
                                }
                                Err(e) => {
                                    error!(
                                        job = name,
                                        elapsed_ms = start.elapsed().as_millis() as u64,
                                        error = %e,
                                        "Job failed"
                                    );
                                    telemetry.capture_job_failure(name, &e);
                                }
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("Job scheduler shutting down");
                            break;
                        }
                    }
                }
            }
        });

        self.handle = Some(handle);
    }

    /// Signal cancellation. Returns immediately.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for the loop to exit, bounded by `timeout`.
    pub async fn wait_for_shutdown(mut self, timeout: Duration) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(())) => info!("Job scheduler stopped"),
            Ok(Err(e)) => warn!("Job scheduler task panicked: {}", e),
            Err(_) => warn!("Job scheduler shutdown timed out after {:?}", timeout),
        }
    }
}
