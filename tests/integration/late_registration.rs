//! Registrations after dispatch affect only later calls

use super::test_utils::{register_delegating, register_leaf, Ctx, Journal};
use serde_json::json;
use std::sync::Arc;
use strata::{LayerDef, MethodSignature, ModelRegistry, RegistryError, Value};

#[test]
fn test_new_layer_applies_to_future_calls() {
    let registry = ModelRegistry::new();
    register_leaf(&registry, "greet", "L1");

    let ctx = registry.context("Partner", Journal::default());
    let before = ctx.call("greet", &[]).unwrap();
    let chain = registry.get("Partner", "greet").unwrap();

    register_delegating(&registry, "greet", "L2");

    assert_eq!(before, Some(json!("L1")));
    assert!(Arc::ptr_eq(&chain, &registry.get("Partner", "greet").unwrap()));
    assert_eq!(chain.len(), 2);
    assert_eq!(
        ctx.call_multi("greet", &[]).unwrap(),
        vec![json!("L1"), json!("L2")]
    );
}

#[test]
fn test_registration_during_call_keeps_running_chain() {
    let registry = Arc::new(ModelRegistry::<Journal>::new());
    register_leaf(&registry, "greet", "L1");

    let weak = Arc::downgrade(&registry);
    registry
        .register(
            "Partner",
            "greet",
            LayerDef::new(MethodSignature::default(), move |ctx: &Ctx, args: &[Value]| {
                ctx.record().note("L2");
                if let Some(registry) = weak.upgrade() {
                    super::test_utils::register_leaf(&registry, "greet", "L3");
                }
                ctx.parent()?.call_multi("greet", args)
            }),
        )
        .unwrap();

    let journal = Journal::default();
    let ctx = registry.context("Partner", journal.clone());
    assert_eq!(ctx.call("greet", &[]).unwrap(), Some(json!("L1")));
    assert_eq!(journal.entries(), vec!["L2", "L1"]);

    assert_eq!(ctx.call("greet", &[]).unwrap(), Some(json!("L3")));
}

#[test]
fn test_sealed_registry_rejects_layers() {
    let registry = ModelRegistry::new();
    register_leaf(&registry, "greet", "L1");
    registry.seal();

    let err = registry
        .register(
            "Partner",
            "greet",
            LayerDef::new(MethodSignature::default(), |_: &Ctx, _: &[Value]| Ok(vec![])),
        )
        .unwrap_err();
    assert!(matches!(err, RegistryError::Sealed { .. }));

    let ctx = registry.context("Partner", Journal::default());
    assert_eq!(ctx.call("greet", &[]).unwrap(), Some(json!("L1")));
}
