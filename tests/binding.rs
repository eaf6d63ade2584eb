use dotcall::binder::{bind, ArgumentBag};
use dotcall::object::Object;
use dotcall::signature::{Param, Signature};
use dotcall::CallError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};

fn bag(entries: &[(&str, Value)]) -> ArgumentBag {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), Object::Data(value.clone())))
        .collect()
}

#[test]
fn spread_fills_slots_before_the_variadic_parameter() {
    // (a, *b): [1, 2, 3] lands as a=1 with b receiving the tail.
    let signature =
        Signature::new(vec![Param::positional("a"), Param::var_positional("b")]).unwrap();
    let (positional, residual) = bind(&signature, bag(&[("*", json!([1, 2, 3]))])).unwrap();
    assert_eq!(
        positional,
        vec![Object::Data(json!(1)), Object::Data(json!(2)), Object::Data(json!(3))]
    );
    assert!(residual.is_empty());
}

#[test]
fn positional_only_values_are_pulled_out_of_the_bag() {
    let signature = Signature::new(vec![
        Param::positional_only("a"),
        Param::positional_only("b"),
        Param::keyword_only("bar"),
        Param::var_keyword("extra"),
    ])
    .unwrap();
    let (positional, residual) = bind(
        &signature,
        bag(&[("a", json!(1)), ("b", json!(2)), ("bar", json!(3)), ("other", json!(4))]),
    )
    .unwrap();
    assert_eq!(positional, vec![Object::Data(json!(1)), Object::Data(json!(2))]);
    // Keyword-only and unknown keys stay in the residual mapping verbatim.
    assert_eq!(residual, bag(&[("bar", json!(3)), ("other", json!(4))]));
}

#[test]
fn spread_with_colliding_named_slot_fails() {
    let signature =
        Signature::new(vec![Param::positional("a"), Param::positional("b")]).unwrap();
    let err = bind(&signature, bag(&[("*", json!([1, 2])), ("b", json!(9))])).unwrap_err();
    assert!(matches!(err, CallError::ConflictingArguments { name } if name == "b"));
}

#[test]
fn spread_with_keyword_only_arguments_succeeds() {
    let signature =
        Signature::new(vec![Param::var_positional("values"), Param::keyword_only("key")])
            .unwrap();
    let (positional, residual) =
        bind(&signature, bag(&[("*", json!([3, 5])), ("key", json!("rank"))])).unwrap();
    assert_eq!(positional, vec![Object::Data(json!(3)), Object::Data(json!(5))]);
    assert_eq!(residual, bag(&[("key", json!("rank"))]));
}

#[test]
fn residual_keys_survive_exactly_once() {
    let signature = Signature::new(vec![Param::positional("a"), Param::var_keyword("extra")])
        .unwrap();
    let (positional, residual) =
        bind(&signature, bag(&[("a", json!(1)), ("x", json!(2)), ("y", json!(3))])).unwrap();
    assert_eq!(positional.len(), 1);
    assert_eq!(residual.keys().collect::<Vec<_>>(), vec!["x", "y"]);
}

proptest! {
    // No bag value is ever dropped: each entry lands in the positional row
    // or the residual mapping.
    #[test]
    fn bind_never_drops_values(
        entries in proptest::collection::btree_map("[a-d]{1,2}", any::<i64>(), 0..8)
    ) {
        let signature = Signature::new(vec![
            Param::positional("a"),
            Param::positional("b"),
            Param::var_positional("rest"),
            Param::var_keyword("extra"),
        ])
        .unwrap();
        let total = entries.len();
        let bag: ArgumentBag =
            entries.into_iter().map(|(key, value)| (key, Object::Data(json!(value)))).collect();
        let (positional, residual) = bind(&signature, bag).unwrap();
        prop_assert_eq!(positional.len() + residual.len(), total);
    }
}
