//! Strata: Layered Method Dispatch
//!
//! Lets independently registered extensions stack implementations of the same
//! named method on a model. The most recently registered layer runs first and
//! may delegate to the layer below it through [`CallContext::parent`]; the
//! delegation target is resolved per call from the context's call stack.

pub mod chain;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod registry;
pub mod stack;
pub mod types;

pub use chain::{Layer, LayerDef, MethodChain, MethodImpl};
pub use dispatch::{CallContext, FrameInfo};
pub use error::{ArgumentError, ConfigError, DispatchError, RegistryError};
pub use registry::{Model, ModelRegistry};
pub use stack::{CallStack, Frame};
pub use types::{MethodSignature, Value, ValueKind};
