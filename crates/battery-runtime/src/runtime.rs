//! Tokio runtime management for contexts built outside a runtime

use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};

/// Errors raised while assembling an execution context
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("no transport configured")]
    MissingTransport,

    #[error("failed to create runtime: {0}")]
    Build(#[from] std::io::Error),
}

/// Configuration for an owned async runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of worker threads (None = number of CPU cores)
    pub worker_threads: Option<usize>,
    /// Name prefix for worker threads
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "battery-worker".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// A multi-threaded Tokio runtime owned by an execution context
pub struct AsyncRuntime {
    runtime: Option<Runtime>,
    handle: Handle,
    config: RuntimeConfig,
}

impl AsyncRuntime {
    pub fn new(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        let mut builder = Builder::new_multi_thread();
        if let Some(threads) = config.worker_threads {
            builder.worker_threads(threads);
        }
        let runtime = builder
            .thread_name(&config.thread_name)
            .enable_all()
            .build()?;
        tracing::debug!(thread_name = %config.thread_name, "started owned runtime");

        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
            config,
        })
    }

    pub fn with_defaults() -> Result<Self, RuntimeError> {
        Self::new(RuntimeConfig::default())
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Block on a future from a synchronous caller
    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.handle.block_on(future)
    }
}

impl std::fmt::Debug for AsyncRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRuntime")
            .field("config", &self.config)
            .finish()
    }
}

impl Drop for AsyncRuntime {
    fn drop(&mut self) {
        // The last context clone may be dropped on one of the runtime's own workers
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
