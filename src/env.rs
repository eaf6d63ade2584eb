use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::functions::builtins;
use crate::object::{Namespace, Object};

/// Produces a module namespace on first resolution of its name.
pub type ModuleLoader = fn() -> Namespace;

/// The ambient global namespace dotted paths resolve against: builtin names
/// plus lazily loaded modules. Loading is idempotent; the loaded namespace is
/// cached, so repeated resolution returns the identical object.
pub struct Env {
    globals: Namespace,
    loaders: HashMap<&'static str, ModuleLoader>,
    loaded: RwLock<HashMap<String, Namespace>>,
}

impl Env {
    pub fn new(globals: Namespace) -> Self {
        Self { globals, loaders: HashMap::new(), loaded: RwLock::new(HashMap::new()) }
    }

    /// An environment with the standard builtin set and modules registered.
    pub fn with_builtins() -> Self {
        let mut globals = Namespace::new();
        globals.insert("max", Object::callable(builtins::Max::new()));
        globals.insert("min", Object::callable(builtins::Min::new()));
        globals.insert("sum", Object::callable(builtins::Sum::new()));
        globals.insert("len", Object::callable(builtins::Len::new()));
        globals.insert("abs", Object::callable(builtins::Abs::new()));
        globals.insert("negate", Object::callable(builtins::Negate::new()));
        globals.insert("echo", Object::callable(builtins::Echo::new()));
        let mut env = Self::new(globals);
        env.register_module("math", builtins::math_module);
        env.register_module("strings", builtins::strings_module);
        env
    }

    /// Adds a global binding.
    pub fn register(&mut self, name: impl Into<String>, object: impl Into<Object>) {
        self.globals.insert(name, object);
    }

    /// Registers a module to be loaded the first time its name is resolved.
    pub fn register_module(&mut self, name: &'static str, loader: ModuleLoader) {
        self.loaders.insert(name, loader);
    }

    /// Resolves a dotted path to an object.
    ///
    /// The first segment is looked up in `context` (when supplied), then in
    /// the globals, then among registered modules. Remaining segments are
    /// attribute lookups on the current object. Absence is a normal result,
    /// never an error.
    pub fn resolve(&self, path: &str, context: Option<&Namespace>) -> Option<Object> {
        if path.is_empty() {
            return None;
        }
        let mut segments = path.split('.');
        let head = segments.next()?;
        let mut current = self.head(head, context)?;
        for segment in segments {
            current = current.attr(segment)?;
        }
        Some(current)
    }

    fn head(&self, head: &str, context: Option<&Namespace>) -> Option<Object> {
        if let Some(context) = context {
            if let Some(object) = context.get(head) {
                return Some(object);
            }
        }
        if let Some(object) = self.globals.get(head) {
            return Some(object);
        }
        self.module(head).map(Object::Namespace)
    }

    fn module(&self, name: &str) -> Option<Namespace> {
        if let Some(namespace) = self.loaded.read().ok()?.get(name) {
            return Some(namespace.clone());
        }
        let loader = self.loaders.get(name)?;
        let namespace = loader();
        debug!(module = name, "loaded module");
        let mut loaded = self.loaded.write().ok()?;
        // A racing loader may have won; keep the first namespace so identity
        // stays stable across calls.
        Some(loaded.entry(name.to_string()).or_insert(namespace).clone())
    }
}
