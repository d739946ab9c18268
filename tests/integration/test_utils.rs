//! Shared test utilities for integration tests

use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use strata::{CallContext, LayerDef, MethodSignature, ModelRegistry, Value};

/// Record handle that journals every layer invocation
#[derive(Clone, Debug, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn note(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

pub type Ctx = CallContext<Journal>;

/// Register a layer that journals `label` and returns it
pub fn register_leaf(registry: &ModelRegistry<Journal>, method: &str, label: &'static str) {
    registry
        .register(
            "Partner",
            method,
            LayerDef::new(MethodSignature::default(), move |ctx: &Ctx, _: &[Value]| {
                ctx.record().note(label);
                Ok(vec![json!(label)])
            })
            .origin(label),
        )
        .unwrap();
}

/// Register a layer that journals `label`, then delegates to its parent
pub fn register_delegating(
    registry: &ModelRegistry<Journal>,
    method: &'static str,
    label: &'static str,
) {
    registry
        .register(
            "Partner",
            method,
            LayerDef::new(MethodSignature::default(), move |ctx: &Ctx, args: &[Value]| {
                ctx.record().note(label);
                let mut res = ctx.parent()?.call_multi(method, args)?;
                res.push(json!(label));
                Ok(res)
            })
            .origin(label),
        )
        .unwrap();
}
