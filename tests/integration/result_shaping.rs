//! Result shaping for call and call_multi, and argument checking

use super::test_utils::{Ctx, Journal};
use serde_json::json;
use strata::{ArgumentError, LayerDef, MethodSignature, ModelRegistry, Value, ValueKind};

fn returning(values: Vec<Value>) -> LayerDef<Journal> {
    LayerDef::new(MethodSignature::default(), move |_: &Ctx, _: &[Value]| {
        Ok(values.clone())
    })
}

#[test]
fn test_zero_results() {
    let registry = ModelRegistry::new();
    registry.register("Partner", "touch", returning(vec![])).unwrap();
    let ctx = registry.context("Partner", Journal::default());

    assert!(ctx.call_multi("touch", &[]).unwrap().is_empty());
    assert_eq!(ctx.call("touch", &[]).unwrap(), None);
}

#[test]
fn test_many_results_in_order() {
    let registry = ModelRegistry::new();
    registry
        .register(
            "Partner",
            "split",
            returning(vec![json!("a"), json!(2), json!(null), json!({"k": true})]),
        )
        .unwrap();
    let ctx = registry.context("Partner", Journal::default());

    assert_eq!(
        ctx.call_multi("split", &[]).unwrap(),
        vec![json!("a"), json!(2), json!(null), json!({"k": true})]
    );
    assert_eq!(ctx.call("split", &[]).unwrap(), Some(json!("a")));
}

#[test]
fn test_null_first_result_is_present() {
    let registry = ModelRegistry::new();
    registry
        .register("Partner", "nothing", returning(vec![json!(null)]))
        .unwrap();
    let ctx = registry.context("Partner", Journal::default());
    assert_eq!(ctx.call("nothing", &[]).unwrap(), Some(json!(null)));
}

#[test]
fn test_check_args_before_invoking() {
    let registry = ModelRegistry::new();
    let sig = MethodSignature::new(&[ValueKind::String, ValueKind::Number], &[ValueKind::String]);
    registry
        .register(
            "Partner",
            "label",
            LayerDef::new(sig.clone(), |_: &Ctx, args: &[Value]| {
                Ok(vec![json!(format!("{}#{}", args[0], args[1]))])
            }),
        )
        .unwrap();
    let ctx = registry.context("Partner", Journal::default());

    let declared = ctx.method_signature("label").unwrap();
    assert_eq!(declared, sig);
    assert_eq!(declared.arity(), 2);

    let good = [json!("acme"), json!(7)];
    assert!(declared.check_args(&good).is_ok());
    assert!(ctx.call("label", &good).unwrap().is_some());

    assert_eq!(
        declared.check_args(&[json!("acme")]),
        Err(ArgumentError::Arity {
            expected: 2,
            actual: 1
        })
    );
    assert_eq!(
        declared.check_args(&[json!("acme"), json!("7")]),
        Err(ArgumentError::Kind {
            index: 1,
            expected: ValueKind::Number,
            actual: ValueKind::String
        })
    );
}
