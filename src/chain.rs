//! Method chains
//!
//! A chain is the ordered, append-only list of layers registered for one
//! (model, method) pair. Layers are stored base-first: a layer's `position`
//! counts from the base and never changes once assigned, so frames that hold a
//! layer stay valid while later registrations extend the chain.

use crate::dispatch::CallContext;
use crate::error::DispatchError;
use crate::types::{MethodSignature, Value};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Uniform invocation interface of a layer body
pub trait MethodImpl<R>: Send + Sync {
    fn invoke(&self, ctx: &CallContext<R>, args: &[Value]) -> Result<Vec<Value>, DispatchError>;
}

impl<R, F> MethodImpl<R> for F
where
    F: Fn(&CallContext<R>, &[Value]) -> Result<Vec<Value>, DispatchError> + Send + Sync,
{
    fn invoke(&self, ctx: &CallContext<R>, args: &[Value]) -> Result<Vec<Value>, DispatchError> {
        self(ctx, args)
    }
}

/// A layer waiting to be registered
pub struct LayerDef<R> {
    pub(crate) signature: MethodSignature,
    pub(crate) imp: Arc<dyn MethodImpl<R>>,
    pub(crate) origin: Option<String>,
}

impl<R: 'static> LayerDef<R> {
    pub fn new<F>(signature: MethodSignature, f: F) -> Self
    where
        F: Fn(&CallContext<R>, &[Value]) -> Result<Vec<Value>, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        Self::from_impl(signature, Arc::new(f))
    }

    pub fn from_impl(signature: MethodSignature, imp: Arc<dyn MethodImpl<R>>) -> Self {
        Self {
            signature,
            imp,
            origin: None,
        }
    }

    /// Name of the extension contributing this layer (diagnostics only)
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// One registered implementation of a method
pub struct Layer<R> {
    position: usize,
    origin: Option<String>,
    signature: MethodSignature,
    imp: Arc<dyn MethodImpl<R>>,
}

impl<R> Layer<R> {
    /// Position counted from the base layer (base = 0)
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn is_base(&self) -> bool {
        self.position == 0
    }

    pub(crate) fn invoke(
        &self,
        ctx: &CallContext<R>,
        args: &[Value],
    ) -> Result<Vec<Value>, DispatchError> {
        self.imp.invoke(ctx, args)
    }
}

impl<R> fmt::Debug for Layer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("position", &self.position)
            .field("origin", &self.origin)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Ordered layers of one method on one model
pub struct MethodChain<R> {
    model: String,
    method: String,
    signature: MethodSignature,
    layers: RwLock<Vec<Arc<Layer<R>>>>,
}

impl<R> MethodChain<R> {
    pub(crate) fn new(model: &str, method: &str, signature: MethodSignature) -> Self {
        Self {
            model: model.to_string(),
            method: method.to_string(),
            signature,
            layers: RwLock::new(Vec::new()),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Signature fixed by the first registered layer
    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn len(&self) -> usize {
        self.layers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.read().is_empty()
    }

    /// Append a layer above every existing one.
    pub(crate) fn push(&self, def: LayerDef<R>) -> Arc<Layer<R>> {
        let mut layers = self.layers.write();
        let layer = Arc::new(Layer {
            position: layers.len(),
            origin: def.origin,
            signature: def.signature,
            imp: def.imp,
        });
        layers.push(Arc::clone(&layer));
        layer
    }

    /// Most specific layer, reached by an unqualified call
    pub fn top(&self) -> Option<Arc<Layer<R>>> {
        self.layers.read().last().cloned()
    }

    /// Next less specific layer, or `None` at the base
    pub fn below(&self, layer: &Layer<R>) -> Option<Arc<Layer<R>>> {
        let position = layer.position.checked_sub(1)?;
        self.layers.read().get(position).cloned()
    }

    /// Layer at `depth`, where depth 0 is the most specific layer
    pub fn layer(&self, depth: usize) -> Option<Arc<Layer<R>>> {
        let layers = self.layers.read();
        let position = layers.len().checked_sub(depth)?.checked_sub(1)?;
        layers.get(position).cloned()
    }

    /// Depth of `layer` relative to the current top
    pub fn depth_of(&self, layer: &Layer<R>) -> usize {
        self.len().saturating_sub(layer.position + 1)
    }

    /// Layers ordered most specific first
    pub fn layers(&self) -> Vec<Arc<Layer<R>>> {
        self.layers.read().iter().rev().cloned().collect()
    }
}

impl<R> fmt::Debug for MethodChain<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodChain")
            .field("model", &self.model)
            .field("method", &self.method)
            .field("signature", &self.signature)
            .field("layers", &self.len())
            .finish()
    }
}
