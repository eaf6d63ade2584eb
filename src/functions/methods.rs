//! Methods bound to plain data values during attribute traversal.
//!
//! Resolving `foo.upper` where `foo` is a string, or `foo.get` where `foo`
//! is an object, yields a callable that captured the receiver.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::{reject_unknown, sig, Callable};
use crate::binder::ArgumentBag;
use crate::errors::{CallError, Result};
use crate::object::Object;
use crate::signature::{Param, Signature};

/// Resolves one attribute segment to a bound method, if the receiver has one.
pub(crate) fn lookup(receiver: &Value, name: &str) -> Option<Arc<dyn Callable>> {
    match (receiver, name) {
        (Value::String(s), "upper") => Some(Arc::new(Case::upper(s.clone()))),
        (Value::String(s), "lower") => Some(Arc::new(Case::lower(s.clone()))),
        (Value::Object(map), "get") => Some(Arc::new(Get::new(map.clone()))),
        (Value::Object(map), "keys") => Some(Arc::new(Keys::new(map.clone()))),
        _ => None,
    }
}

struct Case {
    receiver: String,
    upper: bool,
    signature: Signature,
}

impl Case {
    fn upper(receiver: String) -> Self {
        Self { receiver, upper: true, signature: Signature::empty() }
    }

    fn lower(receiver: String) -> Self {
        Self { receiver, upper: false, signature: Signature::empty() }
    }
}

impl Callable for Case {
    fn name(&self) -> &str {
        if self.upper {
            "upper"
        } else {
            "lower"
        }
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
        reject_unknown(self.name(), keywords, &[])?;
        if !positional.is_empty() {
            return Err(CallError::invocation(format!("{}() takes no arguments", self.name())));
        }
        let transformed =
            if self.upper { self.receiver.to_uppercase() } else { self.receiver.to_lowercase() };
        Ok(Object::Data(Value::String(transformed)))
    }
}

struct Get {
    receiver: Map<String, Value>,
    signature: Signature,
}

impl Get {
    fn new(receiver: Map<String, Value>) -> Self {
        let signature =
            sig(vec![Param::positional_only("key"), Param::positional_only("default")]);
        Self { receiver, signature }
    }
}

impl Callable for Get {
    fn name(&self) -> &str {
        "get"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
        reject_unknown("get", keywords, &[])?;
        if positional.is_empty() || positional.len() > 2 {
            return Err(CallError::invocation(format!(
                "get() takes one or two arguments but {} were given",
                positional.len()
            )));
        }
        let Some(Value::String(key)) = positional[0].as_data() else {
            return Err(CallError::invocation("get() key must be a string"));
        };
        if let Some(value) = self.receiver.get(key) {
            return Ok(Object::Data(value.clone()));
        }
        // Missing key falls back to the supplied default, else null.
        Ok(positional.get(1).cloned().unwrap_or(Object::Data(Value::Null)))
    }
}

struct Keys {
    receiver: Map<String, Value>,
    signature: Signature,
}

impl Keys {
    fn new(receiver: Map<String, Value>) -> Self {
        Self { receiver, signature: Signature::empty() }
    }
}

impl Callable for Keys {
    fn name(&self) -> &str {
        "keys"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
        reject_unknown("keys", keywords, &[])?;
        if !positional.is_empty() {
            return Err(CallError::invocation("keys() takes no arguments"));
        }
        let keys: Vec<Value> =
            self.receiver.keys().map(|key| Value::String(key.clone())).collect();
        Ok(Object::Data(Value::Array(keys)))
    }
}
