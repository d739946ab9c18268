//! Model registry: models and the method chains registered on them.

use crate::chain::{Layer, LayerDef, MethodChain};
use crate::config::{RegistryConfig, StrataConfig};
use crate::dispatch::CallContext;
use crate::error::{DispatchError, RegistryError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// An entity kind and its method chains
pub struct Model<R> {
    name: String,
    trace_layers: bool,
    methods: RwLock<HashMap<String, Arc<MethodChain<R>>>>,
}

impl<R> Model<R> {
    fn new(name: &str, trace_layers: bool) -> Self {
        Self {
            name: name.to_string(),
            trace_layers,
            methods: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn trace_layers(&self) -> bool {
        self.trace_layers
    }

    /// Look up the chain of `method`.
    ///
    /// Calling an undeclared method is a programming error; it is logged and
    /// reported as `UnknownMethod`.
    pub fn get(&self, method: &str) -> Result<Arc<MethodChain<R>>, DispatchError> {
        match self.methods.read().get(method) {
            Some(chain) => Ok(Arc::clone(chain)),
            None => {
                error!(model = %self.name, method, "Unknown method in model");
                Err(DispatchError::UnknownMethod {
                    model: self.name.clone(),
                    method: method.to_string(),
                })
            }
        }
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.read().contains_key(method)
    }

    /// Declared method names, sorted
    pub fn methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.methods.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Process-wide table of models
///
/// Built during a registration phase, then shared read-mostly behind an `Arc`.
/// Registration stays possible until [`ModelRegistry::seal`] is called; calls
/// already in progress keep the layers they resolved.
pub struct ModelRegistry<R> {
    models: RwLock<HashMap<String, Arc<Model<R>>>>,
    sealed: AtomicBool,
    config: RegistryConfig,
    trace_layers: bool,
}

impl<R: Clone + Send + Sync + 'static> ModelRegistry<R> {
    /// Create an empty registry with default settings
    pub fn new() -> Self {
        Self::with_config(&StrataConfig::default())
    }

    pub fn with_config(config: &StrataConfig) -> Self {
        Self {
            models: RwLock::new(HashMap::new()),
            sealed: AtomicBool::new(false),
            config: config.registry.clone(),
            trace_layers: config.dispatch.trace_layers,
        }
    }

    /// Build a shared registry: run `setup` to register layers, then seal the
    /// registry if `registry.seal_after_setup` is enabled.
    pub fn bootstrap<F>(config: &StrataConfig, setup: F) -> Result<Arc<Self>, RegistryError>
    where
        F: FnOnce(&Self) -> Result<(), RegistryError>,
    {
        let registry = Self::with_config(config);
        setup(&registry)?;
        if config.registry.seal_after_setup {
            registry.seal();
        }
        Ok(Arc::new(registry))
    }

    /// Get or create the model named `name`
    pub fn declare_model(&self, name: &str) -> Arc<Model<R>> {
        if let Some(model) = self.models.read().get(name) {
            return Arc::clone(model);
        }
        let mut models = self.models.write();
        let model = models
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Model::new(name, self.trace_layers)));
        Arc::clone(model)
    }

    pub fn model(&self, name: &str) -> Option<Arc<Model<R>>> {
        self.models.read().get(name).cloned()
    }

    /// Declared model names, sorted
    pub fn models(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Register a layer for `model.method`.
    ///
    /// The new layer becomes the most specific one: unqualified calls reach it
    /// first and it can delegate to the layers registered before it.
    pub fn register(
        &self,
        model: &str,
        method: &str,
        def: LayerDef<R>,
    ) -> Result<Arc<Layer<R>>, RegistryError> {
        if self.is_sealed() {
            warn!(model, method, "Registration rejected: registry is sealed");
            return Err(RegistryError::Sealed {
                model: model.to_string(),
                method: method.to_string(),
            });
        }

        let target = self.declare_model(model);
        let chain = {
            let mut methods = target.methods.write();
            let chain = methods
                .entry(method.to_string())
                .or_insert_with(|| {
                    Arc::new(MethodChain::new(model, method, def.signature.clone()))
                });
            Arc::clone(chain)
        };

        if self.config.strict_signatures && *chain.signature() != def.signature {
            warn!(
                model,
                method,
                expected = %chain.signature(),
                actual = %def.signature,
                "Layer signature does not match method"
            );
            return Err(RegistryError::SignatureMismatch {
                model: model.to_string(),
                method: method.to_string(),
                expected: chain.signature().to_string(),
                actual: def.signature.to_string(),
            });
        }

        let layer = chain.push(def);
        debug!(
            model,
            method,
            position = layer.position(),
            origin = layer.origin().unwrap_or("-"),
            "Registered method layer"
        );
        Ok(layer)
    }

    /// Look up the chain of `model.method`
    pub fn get(&self, model: &str, method: &str) -> Result<Arc<MethodChain<R>>, DispatchError> {
        match self.model(model) {
            Some(m) => m.get(method),
            None => {
                error!(model, method, "Unknown method in model");
                Err(DispatchError::UnknownMethod {
                    model: model.to_string(),
                    method: method.to_string(),
                })
            }
        }
    }

    /// Start a call tree on `model` with an empty call stack.
    ///
    /// An undeclared model is not added to the registry; the context gets a
    /// detached empty model and every call on it reports `UnknownMethod`.
    pub fn context(&self, model: &str, record: R) -> CallContext<R> {
        let target = self.model(model).unwrap_or_else(|| {
            debug!(model, "Context on undeclared model");
            Arc::new(Model::new(model, self.trace_layers))
        });
        CallContext::new(target, record)
    }

    /// End the registration phase
    pub fn seal(&self) {
        if !self.sealed.swap(true, Ordering::SeqCst) {
            info!(models = self.models.read().len(), "Model registry sealed");
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::SeqCst)
    }
}

impl<R: Clone + Send + Sync + 'static> Default for ModelRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}
