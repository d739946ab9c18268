//! Dispatcher
//!
//! [`CallContext`] pairs a record handle with the call stack of one logical
//! call tree. `call_multi` resolves which layer runs, `parent` moves the
//! current frame one layer toward the base.
//!
//! A layer delegates to its parent like this:
//!
//! ```ignore
//! registry.register("Partner", "greet", LayerDef::new(sig, |ctx, args| {
//!     let mut res = ctx.parent()?.call_multi("greet", args)?;
//!     res.push(json!("ok!"));
//!     Ok(res)
//! }))?;
//! ```

use crate::error::DispatchError;
use crate::registry::Model;
use crate::stack::{CallStack, Frame};
use crate::types::{MethodSignature, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, trace};

/// Snapshot of one active frame, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub model: String,
    pub method: String,
    /// 0 is the most specific layer
    pub depth: usize,
    pub origin: Option<String>,
}

/// Record handle plus the frames of the call tree it travels through
///
/// Contexts are values: every operation that changes the stack returns a new
/// context and leaves `self` untouched.
pub struct CallContext<R> {
    model: Arc<Model<R>>,
    record: R,
    stack: CallStack<R>,
}

impl<R: Clone> Clone for CallContext<R> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            record: self.record.clone(),
            stack: self.stack.clone(),
        }
    }
}

impl<R: fmt::Debug> fmt::Debug for CallContext<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("model", &self.model.name())
            .field("record", &self.record)
            .field("stack", &self.stack)
            .finish()
    }
}

impl<R: Clone + Send + Sync + 'static> CallContext<R> {
    /// New call tree on `model` with an empty stack
    pub fn new(model: Arc<Model<R>>, record: R) -> Self {
        Self {
            model,
            record,
            stack: CallStack::new(),
        }
    }

    pub fn model(&self) -> &Arc<Model<R>> {
        &self.model
    }

    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn stack(&self) -> &CallStack<R> {
        &self.stack
    }

    /// Attach another record handle, keeping the call stack
    pub fn with_record(&self, record: R) -> Self {
        Self {
            model: Arc::clone(&self.model),
            record,
            stack: self.stack.clone(),
        }
    }

    fn with_stack(&self, stack: CallStack<R>) -> Self {
        Self {
            model: Arc::clone(&self.model),
            record: self.record.clone(),
            stack,
        }
    }

    /// Call `method` and return all of its results.
    ///
    /// If `method` is already executing in this call tree, the call runs the
    /// layer its frame currently points at instead of restarting from the
    /// most specific one.
    pub fn call_multi(&self, method: &str, args: &[Value]) -> Result<Vec<Value>, DispatchError> {
        let chain = self.model.get(method)?;

        let live = self.stack.promote(&chain).and_then(|stack| {
            let frame = stack.front().cloned()?;
            Some((frame, stack))
        });
        let (frame, stack) = match live {
            Some(live) => live,
            None => {
                let layer = chain.top().ok_or_else(|| DispatchError::UnknownMethod {
                    model: self.model.name().to_string(),
                    method: method.to_string(),
                })?;
                let frame = Frame::new(Arc::clone(&chain), layer);
                let stack = self.stack.push(frame.clone());
                (frame, stack)
            }
        };

        if self.model.trace_layers() {
            trace!(
                model = %self.model.name(),
                method,
                depth = frame.depth(),
                stack = stack.len(),
                "Dispatching method layer"
            );
        }

        frame.layer().invoke(&self.with_stack(stack), args)
    }

    /// Call `method` and return only its first result
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Option<Value>, DispatchError> {
        Ok(self.call_multi(method, args)?.into_iter().next())
    }

    /// Context whose current method will run its next, less specific layer.
    ///
    /// Meant for use inside a layer body, followed by a call to the same
    /// method: `ctx.parent()?.call("greet", args)`.
    pub fn parent(&self) -> Result<Self, DispatchError> {
        let current = match self.stack.front() {
            Some(frame) => frame,
            None => {
                error!(model = %self.model.name(), "Empty call stack");
                return Err(DispatchError::EmptyCallStack {
                    model: self.model.name().to_string(),
                });
            }
        };

        match current.advanced() {
            Some(next) => Ok(self.with_stack(self.stack.replace_front(next))),
            None => {
                let method = current.chain().method();
                error!(
                    model = %self.model.name(),
                    method,
                    "Called parent() on a base method"
                );
                Err(DispatchError::NoParentLayer {
                    model: self.model.name().to_string(),
                    method: method.to_string(),
                })
            }
        }
    }

    /// Declared signature of `method`, taken from its most specific layer
    pub fn method_signature(&self, method: &str) -> Result<MethodSignature, DispatchError> {
        let chain = self.model.get(method)?;
        Ok(chain
            .top()
            .map(|layer| layer.signature().clone())
            .unwrap_or_else(|| chain.signature().clone()))
    }

    /// Active frames, most recent first
    pub fn backtrace(&self) -> Vec<FrameInfo> {
        self.stack
            .iter()
            .map(|frame| FrameInfo {
                model: frame.chain().model().to_string(),
                method: frame.chain().method().to_string(),
                depth: frame.depth(),
                origin: frame.layer().origin().map(str::to_string),
            })
            .collect()
    }
}
