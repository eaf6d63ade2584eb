use crate::binder::ArgumentBag;
use crate::errors::{CallError, Result};
use crate::object::Object;
use crate::signature::Signature;

pub mod methods;

/// Trait for objects invocable through a dotted-path name.
///
/// `invoke` receives the bound positional row and the residual keyword
/// mapping produced by the binder. Implementations validate their own arity
/// and keyword set; those failures surface as [`CallError::Invocation`] and
/// are passed through to the caller untouched.
pub trait Callable: Send + Sync {
    fn name(&self) -> &str;
    fn signature(&self) -> &Signature;
    fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object>;
}

// Validates a signature that is declared statically in this crate.
fn sig(params: Vec<crate::signature::Param>) -> Signature {
    Signature::new(params).expect("builtin signature is well-formed")
}

// Rejects residual keywords the callable does not understand.
pub(crate) fn reject_unknown(name: &str, keywords: &ArgumentBag, allowed: &[&str]) -> Result<()> {
    if let Some(key) = keywords.keys().find(|key| !allowed.contains(&key.as_str())) {
        return Err(CallError::invocation(format!(
            "{name}() got an unexpected keyword argument `{key}`"
        )));
    }
    Ok(())
}

pub mod builtins {
    use std::cmp::Ordering;
    use std::sync::Arc;

    use itertools::Itertools;
    use serde_json::Value;

    use super::{reject_unknown, sig, Callable};
    use crate::binder::ArgumentBag;
    use crate::errors::{CallError, Result};
    use crate::object::{Namespace, Object};
    use crate::signature::{Param, Signature};

    /// Value ordering used by `max`/`min`: numeric for numbers, lexicographic
    /// for strings, stringified comparison as the fallback.
    fn order(a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Number(na), Value::Number(nb)) => {
                let da = na.as_f64().unwrap_or(0.0);
                let db = nb.as_f64().unwrap_or(0.0);
                da.partial_cmp(&db).unwrap_or(Ordering::Equal)
            }
            (Value::String(sa), Value::String(sb)) => sa.cmp(sb),
            (Value::Bool(ba), Value::Bool(bb)) => ba.cmp(bb),
            _ => a.to_string().cmp(&b.to_string()),
        }
    }

    // A lone array argument is iterated element-wise, so `max([1, 2, 3])`
    // and `max(1, 2, 3)` agree.
    fn flatten(positional: &[Object]) -> Vec<Object> {
        match positional {
            [Object::Data(Value::Array(items))] => {
                items.iter().cloned().map(Object::Data).collect()
            }
            _ => positional.to_vec(),
        }
    }

    fn rank(name: &str, key: Option<&Arc<dyn Callable>>, value: &Object) -> Result<Value> {
        match key {
            Some(f) => match f.invoke(std::slice::from_ref(value), &ArgumentBag::new())? {
                Object::Data(data) => Ok(data),
                _ => Err(CallError::invocation(format!("{name}(): `key` must return data"))),
            },
            None => match value {
                Object::Data(data) => Ok(data.clone()),
                _ => Err(CallError::invocation(format!(
                    "{name}() cannot order non-data values"
                ))),
            },
        }
    }

    fn extreme(
        name: &'static str,
        positional: &[Object],
        keywords: &ArgumentBag,
        winning: Ordering,
    ) -> Result<Object> {
        reject_unknown(name, keywords, &["key"])?;
        let key = match keywords.get("key") {
            Some(Object::Callable(f)) => Some(f),
            Some(_) => {
                return Err(CallError::invocation(format!("{name}(): `key` must be callable")))
            }
            None => None,
        };
        let mut values = flatten(positional).into_iter();
        let Some(first) = values.next() else {
            return Err(CallError::invocation(format!("{name}() expected at least one value")));
        };
        let mut best_rank = rank(name, key, &first)?;
        let mut best = first;
        for value in values {
            let candidate = rank(name, key, &value)?;
            if order(&candidate, &best_rank) == winning {
                best_rank = candidate;
                best = value;
            }
        }
        Ok(best)
    }

    fn expect_one(name: &str, positional: &[Object]) -> Result<()> {
        if positional.len() != 1 {
            return Err(CallError::invocation(format!(
                "{name}() takes exactly one argument but {} were given",
                positional.len()
            )));
        }
        Ok(())
    }

    fn number(name: &str, object: &Object) -> Result<f64> {
        match object.as_data() {
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| CallError::invocation(format!("{name}() expected a number"))),
            _ => Err(CallError::invocation(format!("{name}() expected a number"))),
        }
    }

    // String form used by echo/join: strings verbatim, everything else via
    // the object's debug rendering (numbers print plainly).
    fn display(object: &Object) -> String {
        match object {
            Object::Data(Value::String(s)) => s.clone(),
            other => format!("{other:?}"),
        }
    }

    pub struct Max(Signature);

    impl Max {
        pub fn new() -> Self {
            Self(sig(vec![Param::var_positional("values"), Param::keyword_only("key")]))
        }
    }

    impl Default for Max {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Max {
        fn name(&self) -> &str {
            "max"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            extreme("max", positional, keywords, Ordering::Greater)
        }
    }

    pub struct Min(Signature);

    impl Min {
        pub fn new() -> Self {
            Self(sig(vec![Param::var_positional("values"), Param::keyword_only("key")]))
        }
    }

    impl Default for Min {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Min {
        fn name(&self) -> &str {
            "min"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            extreme("min", positional, keywords, Ordering::Less)
        }
    }

    pub struct Sum(Signature);

    impl Sum {
        pub fn new() -> Self {
            Self(sig(vec![Param::var_positional("values")]))
        }
    }

    impl Default for Sum {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Sum {
        fn name(&self) -> &str {
            "sum"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("sum", keywords, &[])?;
            let mut int_total: i64 = 0;
            let mut float_total = 0.0;
            let mut all_int = true;
            for value in flatten(positional) {
                let Some(Value::Number(n)) = value.as_data() else {
                    return Err(CallError::invocation("sum() expected numeric values"));
                };
                match n.as_i64().and_then(|i| int_total.checked_add(i)) {
                    Some(total) if all_int => int_total = total,
                    _ => all_int = false,
                }
                float_total += n.as_f64().unwrap_or(0.0);
            }
            let total = if all_int { Value::from(int_total) } else { Value::from(float_total) };
            Ok(Object::Data(total))
        }
    }

    pub struct Len(Signature);

    impl Len {
        pub fn new() -> Self {
            Self(sig(vec![Param::positional_only("value")]))
        }
    }

    impl Default for Len {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Len {
        fn name(&self) -> &str {
            "len"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("len", keywords, &[])?;
            expect_one("len", positional)?;
            let count = match &positional[0] {
                Object::Data(Value::Array(items)) => items.len(),
                Object::Data(Value::String(s)) => s.chars().count(),
                Object::Data(Value::Object(map)) => map.len(),
                Object::Namespace(namespace) => namespace.len(),
                _ => return Err(CallError::invocation("len() unsupported operand")),
            };
            Ok(Object::Data(Value::from(count)))
        }
    }

    pub struct Abs(Signature);

    impl Abs {
        pub fn new() -> Self {
            Self(sig(vec![Param::positional_only("value")]))
        }
    }

    impl Default for Abs {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Abs {
        fn name(&self) -> &str {
            "abs"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("abs", keywords, &[])?;
            expect_one("abs", positional)?;
            numeric_unary("abs", &positional[0], i64::checked_abs, f64::abs)
        }
    }

    pub struct Negate(Signature);

    impl Negate {
        pub fn new() -> Self {
            Self(sig(vec![Param::positional_only("value")]))
        }
    }

    impl Default for Negate {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Negate {
        fn name(&self) -> &str {
            "negate"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("negate", keywords, &[])?;
            expect_one("negate", positional)?;
            numeric_unary("negate", &positional[0], i64::checked_neg, |f| -f)
        }
    }

    // Integer inputs stay integers; everything else, including integer
    // overflow, goes through f64.
    fn numeric_unary(
        name: &str,
        value: &Object,
        int_op: fn(i64) -> Option<i64>,
        float_op: fn(f64) -> f64,
    ) -> Result<Object> {
        match value.as_data() {
            Some(Value::Number(n)) => {
                if let Some(result) = n.as_i64().and_then(int_op) {
                    Ok(Object::Data(Value::from(result)))
                } else {
                    let f = n
                        .as_f64()
                        .ok_or_else(|| CallError::invocation(format!("{name}() expected a number")))?;
                    Ok(Object::Data(Value::from(float_op(f))))
                }
            }
            _ => Err(CallError::invocation(format!("{name}() expected a number"))),
        }
    }

    /// Print-like: joins the string forms of its arguments with `sep`.
    pub struct Echo(Signature);

    impl Echo {
        pub fn new() -> Self {
            Self(sig(vec![Param::var_positional("values"), Param::keyword_only("sep")]))
        }
    }

    impl Default for Echo {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("echo", keywords, &["sep"])?;
            let sep = match keywords.get("sep") {
                Some(Object::Data(Value::String(s))) => s.clone(),
                Some(_) => return Err(CallError::invocation("echo(): `sep` must be a string")),
                None => " ".to_string(),
            };
            let line = positional.iter().map(display).join(&sep);
            Ok(Object::Data(Value::String(line)))
        }
    }

    pub struct Exp(Signature);

    impl Exp {
        pub fn new() -> Self {
            Self(sig(vec![Param::positional_only("x")]))
        }
    }

    impl Default for Exp {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Exp {
        fn name(&self) -> &str {
            "exp"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("exp", keywords, &[])?;
            expect_one("exp", positional)?;
            let x = number("exp", &positional[0])?;
            Ok(Object::Data(Value::from(x.exp())))
        }
    }

    pub struct Sqrt(Signature);

    impl Sqrt {
        pub fn new() -> Self {
            Self(sig(vec![Param::positional_only("x")]))
        }
    }

    impl Default for Sqrt {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Sqrt {
        fn name(&self) -> &str {
            "sqrt"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("sqrt", keywords, &[])?;
            expect_one("sqrt", positional)?;
            let x = number("sqrt", &positional[0])?;
            if x < 0.0 {
                return Err(CallError::invocation("sqrt() math domain error"));
            }
            Ok(Object::Data(Value::from(x.sqrt())))
        }
    }

    pub struct Upper(Signature);

    impl Upper {
        pub fn new() -> Self {
            Self(sig(vec![Param::positional_only("value")]))
        }
    }

    impl Default for Upper {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Upper {
        fn name(&self) -> &str {
            "upper"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("upper", keywords, &[])?;
            expect_one("upper", positional)?;
            Ok(case(&positional[0], str::to_uppercase))
        }
    }

    pub struct Lower(Signature);

    impl Lower {
        pub fn new() -> Self {
            Self(sig(vec![Param::positional_only("value")]))
        }
    }

    impl Default for Lower {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Lower {
        fn name(&self) -> &str {
            "lower"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("lower", keywords, &[])?;
            expect_one("lower", positional)?;
            Ok(case(&positional[0], str::to_lowercase))
        }
    }

    // Non-string values pass through unchanged.
    fn case(value: &Object, transform: fn(&str) -> String) -> Object {
        match value {
            Object::Data(Value::String(s)) => Object::Data(Value::String(transform(s))),
            other => other.clone(),
        }
    }

    pub struct Join(Signature);

    impl Join {
        pub fn new() -> Self {
            Self(sig(vec![Param::positional_only("separator"), Param::var_positional("parts")]))
        }
    }

    impl Default for Join {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Callable for Join {
        fn name(&self) -> &str {
            "join"
        }
        fn signature(&self) -> &Signature {
            &self.0
        }
        fn invoke(&self, positional: &[Object], keywords: &ArgumentBag) -> Result<Object> {
            reject_unknown("join", keywords, &[])?;
            let Some((separator, parts)) = positional.split_first() else {
                return Err(CallError::invocation("join() missing separator"));
            };
            let Some(Value::String(separator)) = separator.as_data() else {
                return Err(CallError::invocation("join() separator must be a string"));
            };
            let joined = parts.iter().map(display).join(separator);
            Ok(Object::Data(Value::String(joined)))
        }
    }

    /// Content of the lazily loaded `math` module.
    pub fn math_module() -> Namespace {
        let mut namespace = Namespace::new();
        namespace.insert("pi", Object::Data(Value::from(std::f64::consts::PI)));
        namespace.insert("e", Object::Data(Value::from(std::f64::consts::E)));
        namespace.insert("exp", Object::callable(Exp::new()));
        namespace.insert("sqrt", Object::callable(Sqrt::new()));
        namespace
    }

    /// Content of the lazily loaded `strings` module.
    pub fn strings_module() -> Namespace {
        let mut namespace = Namespace::new();
        namespace.insert("upper", Object::callable(Upper::new()));
        namespace.insert("lower", Object::callable(Lower::new()));
        namespace.insert("join", Object::callable(Join::new()));
        namespace
    }
}
