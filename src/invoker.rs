use serde_json::Value;
use tracing::trace;

use crate::binder::{bind, ArgumentBag};
use crate::env::Env;
use crate::errors::{CallError, Result};
use crate::object::{Namespace, Object};

/// Synthetic bag key supplying the resolution context.
pub const CONTEXT_KEY: &str = "__context__";
/// Keyword-friendly alias for [`CONTEXT_KEY`].
pub const CONTEXT_KEY_ALIAS: &str = "dotcall_context";

/// Resolves `name`, binds the argument bag, and invokes the result.
///
/// The context key (either spelling) is removed from the bag before binding.
/// Errors raised by the invoked callable propagate unchanged.
pub fn call(env: &Env, name: &str, mut args: ArgumentBag) -> Result<Object> {
    let context = take_context(&mut args);
    trace!(name, "dispatching call");
    let object = env
        .resolve(name, context.as_ref())
        .ok_or_else(|| CallError::NotFound(name.to_string()))?;
    let Object::Callable(callable) = object else {
        return Err(CallError::NotCallable(name.to_string()));
    };
    let (positional, keywords) = bind(callable.signature(), args)?;
    callable.invoke(&positional, &keywords)
}

// Removes both context spellings; the primary wins when both appear.
fn take_context(args: &mut ArgumentBag) -> Option<Namespace> {
    let primary = args.remove(CONTEXT_KEY);
    let alias = args.remove(CONTEXT_KEY_ALIAS);
    as_namespace(primary.or(alias))
}

fn as_namespace(object: Option<Object>) -> Option<Namespace> {
    match object? {
        Object::Namespace(namespace) => Some(namespace),
        Object::Data(Value::Object(map)) => Some(Namespace::from_object_map(&map)),
        _ => None,
    }
}
