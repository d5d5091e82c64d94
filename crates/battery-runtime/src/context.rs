//! Execution context and the call pipeline
//!
//! One call runs `RequestFactory → Transport → ObjectBuilder → ResponseValidator`
//! and completes the caller's [`OnResponse`] exactly once, unless an error
//! handler claims the failure. Request-build failures skip the handler chain.

use crate::callback::OnResponse;
use crate::handler::{CallScope, ErrorHandler, ErrorHandlerChain};
use crate::runtime::{AsyncRuntime, RuntimeConfig, RuntimeError};
use crate::state::CallState;
use crate::validator::ResponseValidator;
use battery_core::{
    DescriptorRegistry, ExecutionConfig, FieldNameTranslator, RpcError, RpcObject, TransportError,
};
use battery_transport::{ObjectBuilder, RequestFactory, Transport, WireContext};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Runtime the context spawns calls on
enum Executor {
    Shared(Handle),
    Owned(AsyncRuntime),
}

impl Executor {
    fn handle(&self) -> &Handle {
        match self {
            Executor::Shared(handle) => handle,
            Executor::Owned(runtime) => runtime.handle(),
        }
    }
}

struct ContextInner {
    wire: WireContext,
    transport: Arc<dyn Transport>,
    handlers: ErrorHandlerChain,
    validator: Option<Arc<dyn ResponseValidator>>,
    executor: Executor,
}

/// Orchestrates RPC calls for one configured client.
///
/// Cloning is cheap; clones share the descriptor registry, handlers,
/// validator, transport and runtime. All registration happens on
/// [`ExecutionContextBuilder`], so a built context never changes.
#[derive(Clone)]
pub struct ExecutionContext {
    inner: Arc<ContextInner>,
}

impl ExecutionContext {
    pub fn builder() -> ExecutionContextBuilder {
        ExecutionContextBuilder::new()
    }

    pub fn config(&self) -> &ExecutionConfig {
        self.inner.wire.config()
    }

    pub fn registry(&self) -> &Arc<DescriptorRegistry> {
        self.inner.wire.registry()
    }

    pub fn wire(&self) -> &WireContext {
        &self.inner.wire
    }

    pub fn handlers(&self) -> &ErrorHandlerChain {
        &self.inner.handlers
    }

    /// Handle of the runtime [`invoke`](Self::invoke) spawns on
    pub fn runtime_handle(&self) -> &Handle {
        self.inner.executor.handle()
    }

    /// Offer an error to the handler chain
    pub fn dispatch_error_handler(&self, scope: &CallScope, error: &RpcError) -> bool {
        self.inner.handlers.dispatch(scope, error)
    }

    /// Start a call in the background and return immediately
    pub fn invoke<T, C>(&self, object: T, callback: C) -> JoinHandle<()>
    where
        T: RpcObject,
        C: OnResponse<T>,
    {
        let context = self.clone();
        self.runtime_handle()
            .spawn(async move { context.execute(object, callback).await })
    }

    /// Await the outcome; `None` when an error handler claimed the failure
    pub async fn call<T: RpcObject>(&self, object: T) -> Option<Result<T, RpcError>> {
        let (sender, receiver) = oneshot::channel();
        self.execute(object, sender).await;
        receiver.await.ok()
    }

    /// Run a call on the current task
    pub async fn execute<T, C>(&self, mut object: T, callback: C)
    where
        T: RpcObject,
        C: OnResponse<T>,
    {
        let wire = &self.inner.wire;

        let descriptor = match wire.registry().resolve::<T>() {
            Ok(descriptor) => descriptor,
            Err(err) => {
                error!(type_name = std::any::type_name::<T>(), error = %err, "descriptor resolution failed");
                callback.on_failure(err.into());
                return;
            }
        };
        let scope = CallScope::for_descriptor(&descriptor);
        trace_state(&scope, CallState::Created);

        let request = match RequestFactory::create_with_descriptor(wire, &descriptor, &object) {
            Ok(request) => request,
            Err(err) => {
                error!(call_id = %scope.call_id(), error = %err, "request build failed");
                callback.on_failure(err);
                return;
            }
        };
        trace_state(&scope, CallState::RequestBuilt);

        trace_state(&scope, CallState::Submitted);
        let response = match self.inner.transport.submit(request).await {
            Ok(response) => response,
            Err(raw) => {
                trace_state(&scope, CallState::TransportFailed);
                self.fail_transport::<T, C>(&scope, raw, callback);
                return;
            }
        };
        trace_state(&scope, CallState::Succeeded);

        let content_type = descriptor
            .expected_content_type()
            .or(response.content_type());
        if let Err(err) = ObjectBuilder::build_shape(
            wire,
            content_type,
            response.body(),
            &mut object,
            descriptor.shape(),
            descriptor.name_translator(),
        ) {
            trace_state(&scope, CallState::DecodeFailed);
            self.fail::<T, C>(&scope, err.into(), callback);
            return;
        }
        trace_state(&scope, CallState::Decoded);

        if let Some(validator) = &self.inner.validator
            && let Err(err) = validator.validate(&object)
        {
            trace_state(&scope, CallState::ValidationFailed);
            self.fail::<T, C>(&scope, err.into(), callback);
            return;
        }
        trace_state(&scope, CallState::Validated);

        trace_state(&scope, CallState::Delivered);
        callback.on_response(object);
    }

    fn fail<T, C: OnResponse<T>>(&self, scope: &CallScope, error: RpcError, callback: C) {
        if self.dispatch_error_handler(scope, &error) {
            return;
        }
        debug!(call_id = %scope.call_id(), error = %error, "delivering failure");
        callback.on_failure(error);
    }

    /// Handlers see the raw error first, then its cause. An unclaimed error
    /// with a source is delivered as is; otherwise the caller receives an
    /// [`RpcError::Rpc`] that keeps the raw error attached.
    fn fail_transport<T, C: OnResponse<T>>(
        &self,
        scope: &CallScope,
        raw: TransportError,
        callback: C,
    ) {
        error!(call_id = %scope.call_id(), error = %raw, "transport failed");
        if self.config().debug_dump_response
            && let Some(body) = raw.body()
        {
            info!(call_id = %scope.call_id(), body = %String::from_utf8_lossy(body), "error response body");
        }

        let cause = transport_cause(&raw);
        let raw_error = RpcError::Transport(raw.clone());
        if self.dispatch_error_handler(scope, &raw_error)
            || self.dispatch_error_handler(scope, &cause)
        {
            return;
        }

        let delivered = match cause {
            RpcError::Rpc { message, .. } => RpcError::Rpc {
                message,
                transport: Some(raw),
            },
            _ => raw_error,
        };
        callback.on_failure(delivered);
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("config", self.config())
            .field("handlers", &self.inner.handlers)
            .field("validator", &self.inner.validator.is_some())
            .finish()
    }
}

/// Cause offered to handlers after the raw transport error
fn transport_cause(raw: &TransportError) -> RpcError {
    match raw.cause() {
        Some(source) => RpcError::Cause(Arc::clone(source)),
        None if raw.is_server_error() => RpcError::rpc("Server Error"),
        None => RpcError::rpc(raw.to_string()),
    }
}

fn trace_state(scope: &CallScope, state: CallState) {
    debug!(
        call_id = %scope.call_id(),
        type_name = scope.type_name(),
        state = %state,
        "call state"
    );
}

/// Assembles an [`ExecutionContext`]
#[derive(Default)]
pub struct ExecutionContextBuilder {
    config: ExecutionConfig,
    transport: Option<Arc<dyn Transport>>,
    handlers: Vec<Arc<dyn ErrorHandler>>,
    validator: Option<Arc<dyn ResponseValidator>>,
    translator: Option<FieldNameTranslator>,
    registry: Option<Arc<DescriptorRegistry>>,
    handle: Option<Handle>,
}

impl ExecutionContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn transport(self, transport: impl Transport + 'static) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Append a handler; handlers run in registration order
    pub fn register_error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    /// Replace the response validator
    pub fn set_response_validator(mut self, validator: impl ResponseValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Default translator for types that do not declare one.
    ///
    /// Ignored when a registry is supplied with [`descriptor_registry`](Self::descriptor_registry).
    pub fn name_translator(mut self, translator: FieldNameTranslator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Share a descriptor registry between contexts
    pub fn descriptor_registry(mut self, registry: Arc<DescriptorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Spawn calls on an existing runtime
    pub fn runtime_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Build the context.
    ///
    /// Without an explicit handle the ambient Tokio runtime is used; outside
    /// any runtime the context starts and owns one sized by
    /// [`ExecutionConfig::worker_threads`].
    pub fn build(self) -> Result<ExecutionContext, RuntimeError> {
        let transport = self.transport.ok_or(RuntimeError::MissingTransport)?;
        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(DescriptorRegistry::new(self.translator.unwrap_or_default())),
        };

        let executor = match self.handle.or_else(|| Handle::try_current().ok()) {
            Some(handle) => Executor::Shared(handle),
            None => {
                let mut runtime_config = RuntimeConfig::new();
                if let Some(threads) = self.config.worker_threads {
                    runtime_config = runtime_config.with_worker_threads(threads);
                }
                Executor::Owned(AsyncRuntime::new(runtime_config)?)
            }
        };

        debug!(
            handlers = self.handlers.len(),
            validator = self.validator.is_some(),
            base_url = %self.config.base_url,
            "execution context built"
        );

        Ok(ExecutionContext {
            inner: Arc::new(ContextInner {
                wire: WireContext::new(registry, Arc::new(self.config)),
                transport,
                handlers: ErrorHandlerChain::new(self.handlers),
                validator: self.validator,
                executor,
            }),
        })
    }
}
