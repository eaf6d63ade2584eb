use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::{CallError, Result};
use crate::object::Object;
use crate::signature::{ParamKind, Signature};

/// Synthetic bag key carrying positional arguments: a single value or an
/// ordered sequence.
pub const SPREAD_KEY: &str = "*";

/// Mapping from parameter-name-or-synthetic-key to value.
pub type ArgumentBag = BTreeMap<String, Object>;

/// Splits an argument bag into a positional row and the residual keyword
/// mapping, driven by the declared signature.
///
/// Positional-only and positional-or-keyword parameters are filled from the
/// bag by name first, in declaration order; the spread then fills the
/// still-unfilled positional slots, and its remainder feeds the
/// variadic-positional parameter. Everything left in the bag is returned
/// verbatim as residual keywords. No value is ever dropped: each bag entry
/// lands in the positional row or the residual mapping, or the bind fails.
pub fn bind(signature: &Signature, mut bag: ArgumentBag) -> Result<(Vec<Object>, ArgumentBag)> {
    let spread = bag.remove(SPREAD_KEY).map(into_sequence);

    // The spread would consume the first `covered` positional slots were the
    // bag empty; a named value for any of those slots is a conflict, as is a
    // named value for the variadic-positional parameter itself.
    if let Some(values) = &spread {
        let positional: Vec<&str> = signature.positional_names().collect();
        let covered = positional.len().min(values.len());
        if let Some(name) = positional[..covered].iter().find(|name| bag.contains_key(**name)) {
            return Err(CallError::ConflictingArguments { name: (*name).to_string() });
        }
        if let Some(name) = signature.var_positional() {
            if bag.contains_key(name) {
                return Err(CallError::ConflictingArguments { name: name.to_string() });
            }
        }
    }

    let mut positional = Vec::new();
    let mut spread = spread.unwrap_or_default().into_iter();
    for param in signature.params() {
        match param.kind() {
            ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword => {
                if let Some(value) = bag.remove(param.name()) {
                    positional.push(value);
                } else if let Some(value) = spread.next() {
                    positional.push(value);
                }
                // Unfilled slots collapse; the callable sees a shorter row.
            }
            ParamKind::VarPositional => {
                // The parameter's own name spreads too: a sequence value
                // supplies several positional arguments, anything else one.
                if let Some(value) = bag.remove(param.name()) {
                    positional.extend(into_sequence(value));
                }
                positional.extend(&mut spread);
            }
            ParamKind::KeywordOnly | ParamKind::VarKeyword => {}
        }
    }
    // Leftover spread values with no variadic slot stay on the row; the
    // callable rejects them with its own arity error at invocation time.
    positional.extend(spread);

    Ok((positional, bag))
}

fn into_sequence(value: Object) -> Vec<Object> {
    match value {
        Object::Data(Value::Array(items)) => items.into_iter().map(Object::Data).collect(),
        other => vec![other],
    }
}
