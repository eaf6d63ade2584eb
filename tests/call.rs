use dotcall::binder::ArgumentBag;
use dotcall::object::{Namespace, Object};
use dotcall::{CallError, Dispatcher, CONTEXT_KEY, CONTEXT_KEY_ALIAS, SPREAD_KEY};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn bag(entries: &[(&str, Value)]) -> ArgumentBag {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), Object::Data(value.clone())))
        .collect()
}

#[test]
fn call_max_with_spread() {
    let dispatcher = Dispatcher::with_builtins();
    let result = dispatcher.call("max", bag(&[("*", json!([1, 2, 3]))])).unwrap();
    assert_eq!(result, Object::Data(json!(3)));
}

#[test]
fn call_max_with_key_function() {
    let dispatcher = Dispatcher::with_builtins();
    let negate = dispatcher.resolve("negate", None).unwrap();
    let mut args = bag(&[("*", json!([3, 5]))]);
    args.insert("key".to_string(), negate);
    let result = dispatcher.call("max", args).unwrap();
    assert_eq!(result, Object::Data(json!(3)));
}

#[test]
fn call_echo_like_print() {
    let dispatcher = Dispatcher::with_builtins();
    assert_eq!(dispatcher.call("echo", bag(&[])).unwrap(), Object::Data(json!("")));
    assert_eq!(
        dispatcher
            .call("echo", bag(&[("*", json!(["foo", "bar"])), ("sep", json!(""))]))
            .unwrap(),
        Object::Data(json!("foobar"))
    );
    // A single (non-sequence) spread value is one positional argument.
    assert_eq!(
        dispatcher.call("echo", bag(&[("*", json!("foo")), ("sep", json!(""))])).unwrap(),
        Object::Data(json!("foo"))
    );
}

#[test]
fn call_unresolvable_path_is_not_found() {
    let dispatcher = Dispatcher::with_builtins();
    let err = dispatcher.call("foo.nonexistent", bag(&[])).unwrap_err();
    assert!(matches!(&err, CallError::NotFound(_)));
    assert!(err.to_string().contains("foo.nonexistent"));
}

#[test]
fn call_non_callable_is_a_type_failure() {
    let dispatcher = Dispatcher::with_builtins();
    let err = dispatcher.call("math.pi", bag(&[])).unwrap_err();
    assert!(matches!(&err, CallError::NotCallable(_)));
    assert!(err.to_string().contains("math.pi"));
}

#[test]
fn call_spread_and_named_slot_conflict() {
    let dispatcher = Dispatcher::with_builtins();
    let err = dispatcher
        .call("strings.join", bag(&[("separator", json!(",")), ("*", json!(["x", "y"]))]))
        .unwrap_err();
    assert!(matches!(&err, CallError::ConflictingArguments { .. }));
    assert!(err.to_string().contains("cannot be specified at the same time"));
}

#[test]
fn call_spread_filling_the_separator_slot_succeeds() {
    let dispatcher = Dispatcher::with_builtins();
    let result =
        dispatcher.call("strings.join", bag(&[("*", json!([",", "x", "y"]))])).unwrap();
    assert_eq!(result, Object::Data(json!("x,y")));
}

#[test]
fn call_with_context_namespace() {
    let dispatcher = Dispatcher::with_builtins();
    let mut context = Namespace::new();
    context.insert("neg", dispatcher.resolve("negate", None).unwrap());

    let mut args = bag(&[("*", json!(5))]);
    args.insert(CONTEXT_KEY.to_string(), Object::Namespace(context));
    let result = dispatcher.call("neg", args).unwrap();
    assert_eq!(result, Object::Data(json!(-5)));
}

#[test]
fn call_object_get_through_context() {
    let dispatcher = Dispatcher::with_builtins();
    let context = Object::Data(json!({"foo": {"a": 1, "b": 2}}));

    let mut args = bag(&[("key", json!("a"))]);
    args.insert(CONTEXT_KEY_ALIAS.to_string(), context.clone());
    assert_eq!(dispatcher.call("foo.get", args).unwrap(), Object::Data(json!(1)));

    let mut args = bag(&[("*", json!("b"))]);
    args.insert(CONTEXT_KEY.to_string(), context.clone());
    assert_eq!(dispatcher.call("foo.get", args).unwrap(), Object::Data(json!(2)));

    // Missing keys fall back to the supplied default.
    let mut args = bag(&[("*", json!(["c", 3]))]);
    args.insert(CONTEXT_KEY.to_string(), context.clone());
    assert_eq!(dispatcher.call("foo.get", args).unwrap(), Object::Data(json!(3)));

    let mut args = bag(&[("*", json!(["d", null]))]);
    args.insert(CONTEXT_KEY.to_string(), context);
    assert_eq!(dispatcher.call("foo.get", args).unwrap(), Object::Data(json!(null)));
}

#[test]
fn primary_context_key_wins_over_the_alias() {
    let dispatcher = Dispatcher::with_builtins();
    let mut args = bag(&[("key", json!("a"))]);
    args.insert(CONTEXT_KEY.to_string(), Object::Data(json!({"foo": {"a": 1}})));
    args.insert(CONTEXT_KEY_ALIAS.to_string(), Object::Data(json!({"foo": {"a": 99}})));
    assert_eq!(dispatcher.call("foo.get", args).unwrap(), Object::Data(json!(1)));
}

#[test]
fn context_key_is_consumed_not_forwarded() {
    // echo rejects unknown keywords, so a leaked context key would fail.
    let dispatcher = Dispatcher::with_builtins();
    let mut args = bag(&[("*", json!("hi"))]);
    args.insert(CONTEXT_KEY.to_string(), Object::Data(json!({})));
    assert_eq!(dispatcher.call("echo", args).unwrap(), Object::Data(json!("hi")));
}

#[test]
fn callable_errors_propagate_unchanged() {
    let dispatcher = Dispatcher::with_builtins();

    let err = dispatcher.call("len", bag(&[])).unwrap_err();
    assert!(matches!(&err, CallError::Invocation(_)));
    assert!(err.to_string().contains("len() takes exactly one argument"));

    let err = dispatcher.call("max", bag(&[("*", json!([1])), ("bogus", json!(2))])).unwrap_err();
    assert!(matches!(&err, CallError::Invocation(_)));
    assert!(err.to_string().contains("unexpected keyword argument `bogus`"));

    let err = dispatcher.call("math.sqrt", bag(&[("x", json!(-1))])).unwrap_err();
    assert!(err.to_string().contains("math domain error"));
}

#[test]
fn call_module_functions_by_name() {
    let dispatcher = Dispatcher::with_builtins();
    assert_eq!(
        dispatcher.call("math.sqrt", bag(&[("x", json!(9))])).unwrap(),
        Object::Data(json!(3.0))
    );
    assert_eq!(
        dispatcher.call("strings.upper", bag(&[("value", json!("bar"))])).unwrap(),
        Object::Data(json!("BAR"))
    );
}

#[test]
fn call_aggregates_over_sequences() {
    let dispatcher = Dispatcher::with_builtins();
    assert_eq!(
        dispatcher.call("sum", bag(&[("*", json!([1, 2, 3]))])).unwrap(),
        Object::Data(json!(6))
    );
    // A lone array argument is iterated element-wise.
    assert_eq!(
        dispatcher.call("max", bag(&[("values", json!([1, 2, 3]))])).unwrap(),
        Object::Data(json!(3))
    );
    assert_eq!(
        dispatcher.call("len", bag(&[("value", json!([1, 2, 3]))])).unwrap(),
        Object::Data(json!(3))
    );
}

#[test]
fn integer_overflow_widens_to_float() {
    let dispatcher = Dispatcher::with_builtins();
    assert_eq!(
        dispatcher.call("sum", bag(&[("*", json!([i64::MAX, 1]))])).unwrap(),
        Object::Data(json!(i64::MAX as f64 + 1.0))
    );
    assert_eq!(
        dispatcher.call("negate", bag(&[("value", json!(i64::MIN))])).unwrap(),
        Object::Data(json!(-(i64::MIN as f64)))
    );
    assert_eq!(
        dispatcher.call("abs", bag(&[("value", json!(i64::MIN))])).unwrap(),
        Object::Data(json!((i64::MIN as f64).abs()))
    );
}

#[test]
fn convenience_entry_points_use_builtins() {
    assert_eq!(
        dotcall::call("max", bag(&[(SPREAD_KEY, json!([4, 7, 5]))])).unwrap(),
        Object::Data(json!(7))
    );
    assert!(dotcall::resolve("math.exp").is_some());
    assert!(dotcall::resolve("nope").is_none());
}
