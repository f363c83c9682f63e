//! Runs a set of named long-lived processes under one cancellation token.
//!
//! Processes run concurrently until a shutdown signal arrives (SIGINT or
//! SIGTERM) or one of them fails; either way every process is cancelled,
//! then all registered closers execute under a shared timeout. Process
//! names only exist for log attribution.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Boxed future a process runs to completion.
pub type ProcessFuture = Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send>>;

type ProcessFn = Box<dyn FnOnce(CancellationToken) -> ProcessFuture + Send>;
type Closer = Box<dyn FnOnce() -> ProcessFuture + Send>;

struct NamedProcess {
    name: String,
    start: ProcessFn,
}

/// Supervisor for the application's long-lived tasks.
pub struct Runner {
    processes: Vec<NamedProcess>,
    closers: Vec<Closer>,
    closer_timeout: Duration,
    cancellation_token: CancellationToken,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            processes: Vec::new(),
            closers: Vec::new(),
            closer_timeout: Duration::from_secs(10),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Registers a process under `name`. The process receives a clone of the
    /// runner's cancellation token and must return once it is cancelled.
    pub fn with_named_process<N, F, Fut>(mut self, name: N, process: F) -> Self
    where
        N: Into<String>,
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.processes.push(NamedProcess {
            name: name.into(),
            start: Box::new(|token| Box::pin(process(token))),
        });
        self
    }

    /// Registers cleanup work that runs after every process has stopped,
    /// regardless of why they stopped.
    pub fn with_closer<F, Fut>(mut self, closer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.closers.push(Box::new(|| Box::pin(closer())));
        self
    }

    /// Shared deadline for all closers together. Defaults to 10 seconds.
    pub fn with_closer_timeout(mut self, timeout: Duration) -> Self {
        self.closer_timeout = timeout;
        self
    }

    /// Replaces the runner-owned cancellation token, allowing external
    /// shutdown control.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Runs everything to completion and exits the process: 0 after a clean
    /// shutdown, 1 when a process failed.
    pub async fn run(self) {
        let token = self.cancellation_token.clone();
        spawn_signal_handlers(token.clone());

        let first_error = supervise(self.processes, token).await;

        if !self.closers.is_empty() {
            info!(timeout = ?self.closer_timeout, "running closers");
            match tokio::time::timeout(self.closer_timeout, run_closers(self.closers)).await {
                Ok(()) => info!("all closers completed"),
                Err(_) => error!(timeout = ?self.closer_timeout, "closers timed out"),
            }
        }

        match first_error {
            Some(err) => {
                error!("exiting after process failure: {:#}", err);
                std::process::exit(1);
            }
            None => {
                info!("exiting normally");
                std::process::exit(0);
            }
        }
    }
}

/// Cancels the token on SIGINT, and on SIGTERM where that exists.
fn spawn_signal_handlers(token: CancellationToken) {
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received interrupt signal");
                ctrl_c_token.cancel();
            }
            Err(err) => error!("failed to install interrupt handler: {}", err),
        }
    });

    #[cfg(unix)]
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received SIGTERM");
                token.cancel();
            }
            Err(err) => error!("failed to install SIGTERM handler: {}", err),
        }
    });
}

/// Drives all processes until cancellation or the first failure, then waits
/// for the rest to wind down. Returns the first failure, if any.
async fn supervise(
    processes: Vec<NamedProcess>,
    token: CancellationToken,
) -> Option<anyhow::Error> {
    let mut join_set = JoinSet::new();
    for process in processes {
        let process_token = token.clone();
        join_set.spawn(async move {
            let result = (process.start)(process_token).await;
            (process.name, result)
        });
    }

    let mut first_error = None;
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((name, Ok(()))) => debug!(process = %name, "process completed"),
            Ok((name, Err(err))) => {
                if first_error.is_none() {
                    error!(process = %name, "process failed: {:#}", err);
                    first_error = Some(err);
                } else {
                    error!(process = %name, "process failed after shutdown began: {:#}", err);
                }
                token.cancel();
            }
            Err(join_err) => {
                error!("process panicked: {}", join_err);
                token.cancel();
            }
        }
    }

    first_error
}

async fn run_closers(closers: Vec<Closer>) {
    let mut closer_set = JoinSet::new();
    for closer in closers {
        closer_set.spawn(closer());
    }

    while let Some(result) = closer_set.join_next().await {
        match result {
            Ok(Ok(())) => debug!("closer completed"),
            Ok(Err(err)) => error!("closer failed: {:#}", err),
            Err(join_err) => error!("closer panicked: {}", join_err),
        }
    }
}
