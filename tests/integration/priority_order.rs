//! Layer priority: last registered runs first, parent() walks toward the base

use super::test_utils::{register_delegating, register_leaf, Ctx, Journal};
use serde_json::json;
use strata::{DispatchError, LayerDef, MethodSignature, ModelRegistry, Value};

#[test]
fn test_unqualified_call_reaches_last_registered() {
    let registry = ModelRegistry::new();
    register_leaf(&registry, "greet", "L1");
    register_leaf(&registry, "greet", "L2");
    register_leaf(&registry, "greet", "L3");

    let journal = Journal::default();
    let ctx = registry.context("Partner", journal.clone());
    assert_eq!(ctx.call("greet", &[]).unwrap(), Some(json!("L3")));
    assert_eq!(journal.entries(), vec!["L3"]);
}

#[test]
fn test_parent_walks_every_layer_once() {
    let registry = ModelRegistry::new();
    register_leaf(&registry, "greet", "L1");
    register_delegating(&registry, "greet", "L2");
    register_delegating(&registry, "greet", "L3");

    let journal = Journal::default();
    let ctx = registry.context("Partner", journal.clone());
    let res = ctx.call_multi("greet", &[]).unwrap();

    assert_eq!(journal.entries(), vec!["L3", "L2", "L1"]);
    assert_eq!(res, vec![json!("L1"), json!("L2"), json!("L3")]);
}

#[test]
fn test_parent_past_base_fails() {
    let registry = ModelRegistry::new();
    register_delegating(&registry, "greet", "L1");
    register_delegating(&registry, "greet", "L2");
    register_delegating(&registry, "greet", "L3");

    let journal = Journal::default();
    let ctx = registry.context("Partner", journal.clone());
    let err = ctx.call("greet", &[]).unwrap_err();

    assert!(matches!(
        err,
        DispatchError::NoParentLayer { ref model, ref method } if model == "Partner" && method == "greet"
    ));
    assert_eq!(journal.entries(), vec!["L3", "L2", "L1"]);
}

#[test]
fn test_parent_steps_are_explicit() {
    // Each step through the chain is driven by the caller, one parent() at a time
    let registry = ModelRegistry::new();
    for label in ["L1", "L2", "L3"] {
        registry
            .register(
                "Partner",
                "greet",
                LayerDef::new(MethodSignature::default(), move |ctx: &Ctx, args: &[Value]| {
                    let steps = args.first().and_then(Value::as_u64).unwrap_or(0);
                    if steps == 0 {
                        return Ok(vec![json!(label)]);
                    }
                    ctx.parent()?.call_multi("greet", &[json!(steps - 1)])
                }),
            )
            .unwrap();
    }

    let ctx = registry.context("Partner", Journal::default());
    assert_eq!(ctx.call("greet", &[json!(0)]).unwrap(), Some(json!("L3")));
    assert_eq!(ctx.call("greet", &[json!(1)]).unwrap(), Some(json!("L2")));
    assert_eq!(ctx.call("greet", &[json!(2)]).unwrap(), Some(json!("L1")));
    assert!(matches!(
        ctx.call("greet", &[json!(3)]),
        Err(DispatchError::NoParentLayer { .. })
    ));
}
