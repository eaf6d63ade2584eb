pub mod errors;
pub mod object;
pub mod env;
pub mod signature;
pub mod binder;
pub mod functions; // builtin callables, plugin model
mod invoker;

use binder::ArgumentBag;
use env::Env;
use errors::Result;
use object::{Namespace, Object};

/// The main dispatch facade: owns the ambient environment and composes
/// resolution, binding, and invocation.
pub struct Dispatcher {
    env: Env,
}

impl Dispatcher {
    pub fn new(env: Env) -> Self {
        Self { env }
    }

    /// A dispatcher over the builtin environment.
    pub fn with_builtins() -> Self {
        Self::new(Env::with_builtins())
    }

    pub fn env_mut(&mut self) -> &mut Env {
        &mut self.env
    }

    /// Resolves a dotted path; absence is a normal result, never an error.
    pub fn resolve(&self, path: &str, context: Option<&Namespace>) -> Option<Object> {
        self.env.resolve(path, context)
    }

    /// Resolves `name`, binds `args`, and invokes the resulting callable.
    pub fn call(&self, name: &str, args: ArgumentBag) -> Result<Object> {
        invoker::call(&self.env, name, args)
    }
}

/// Convenience: resolve against a fresh builtin environment.
pub fn resolve(path: &str) -> Option<Object> {
    Dispatcher::with_builtins().resolve(path, None)
}

/// Convenience: call against a fresh builtin environment.
pub fn call(name: &str, args: ArgumentBag) -> Result<Object> {
    Dispatcher::with_builtins().call(name, args)
}

/// Re-export the most-used pieces for direct callers.
pub use binder::{bind, SPREAD_KEY};
pub use errors::CallError;
pub use functions::Callable;
pub use invoker::{CONTEXT_KEY, CONTEXT_KEY_ALIAS};
