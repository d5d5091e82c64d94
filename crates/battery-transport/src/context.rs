//! Shared state consulted by the request and response pipelines

use battery_core::{DescriptorRegistry, ExecutionConfig};
use std::sync::Arc;

/// Descriptor registry and configuration used to encode and decode calls
#[derive(Debug, Clone, Default)]
pub struct WireContext {
    registry: Arc<DescriptorRegistry>,
    config: Arc<ExecutionConfig>,
}

impl WireContext {
    pub fn new(registry: Arc<DescriptorRegistry>, config: Arc<ExecutionConfig>) -> Self {
        Self { registry, config }
    }

    /// A context with a fresh registry and the given configuration
    pub fn with_config(config: ExecutionConfig) -> Self {
        Self::new(Arc::default(), Arc::new(config))
    }

    pub fn registry(&self) -> &Arc<DescriptorRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &Arc<ExecutionConfig> {
        &self.config
    }
}
