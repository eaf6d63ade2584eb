use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::functions::{methods, Callable};

/// Universal runtime value: what a dotted path resolves to and what argument
/// bags carry.
#[derive(Clone)]
pub enum Object {
    /// Plain JSON data.
    Data(Value),
    /// An invocable function or value-bound method.
    Callable(Arc<dyn Callable>),
    /// A named collection of objects (a module or a caller-supplied context).
    Namespace(Namespace),
}

impl Object {
    pub fn data(value: impl Into<Value>) -> Self {
        Object::Data(value.into())
    }

    pub fn callable(callable: impl Callable + 'static) -> Self {
        Object::Callable(Arc::new(callable))
    }

    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Object::Data(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Arc<dyn Callable>> {
        match self {
            Object::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    /// Attribute lookup for one dotted-path segment.
    ///
    /// Data objects expose value-bound methods first, then their own fields.
    pub(crate) fn attr(&self, name: &str) -> Option<Object> {
        match self {
            Object::Namespace(namespace) => namespace.get(name),
            Object::Data(value) => methods::lookup(value, name)
                .map(Object::Callable)
                .or_else(|| match value {
                    Value::Object(map) => map.get(name).cloned().map(Object::Data),
                    _ => None,
                }),
            Object::Callable(_) => None,
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Data(value) => write!(f, "{value}"),
            Object::Callable(callable) => write!(f, "<callable {}>", callable.name()),
            Object::Namespace(namespace) => fmt::Debug::fmt(namespace, f),
        }
    }
}

// Data compares structurally; callables and namespaces by identity.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Data(a), Object::Data(b)) => a == b,
            (Object::Callable(a), Object::Callable(b)) => Arc::ptr_eq(a, b),
            (Object::Namespace(a), Object::Namespace(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for Object {
    fn from(value: Value) -> Self {
        Object::Data(value)
    }
}

impl From<Namespace> for Object {
    fn from(namespace: Namespace) -> Self {
        Object::Namespace(namespace)
    }
}

/// String-keyed namespace with copy-on-write insert.
#[derive(Clone, Default)]
pub struct Namespace {
    inner: Arc<HashMap<String, Object>>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, object: impl Into<Object>) {
        let map = Arc::make_mut(&mut self.inner);
        map.insert(name.into(), object.into());
    }

    pub fn get(&self, name: &str) -> Option<Object> {
        self.inner.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Coerces a JSON object into a namespace of data entries.
    pub fn from_object_map(map: &Map<String, Value>) -> Self {
        let mut namespace = Self::new();
        for (key, value) in map {
            namespace.insert(key.clone(), Object::Data(value.clone()));
        }
        namespace
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.inner.keys().cloned().collect();
        names.sort();
        f.debug_struct("Namespace").field("names", &names).finish()
    }
}

// Identity, not structure: two separately built namespaces are never equal.
impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl FromIterator<(String, Object)> for Namespace {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        Self { inner: Arc::new(iter.into_iter().collect()) }
    }
}
