use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::errors::{CallError, Result};

/// How a declared parameter may receive its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    /// Fillable only from the positional row.
    PositionalOnly,
    /// Fillable from the positional row or by name.
    PositionalOrKeyword,
    /// Collects excess positional values.
    VarPositional,
    /// Fillable only by name; always stays in the residual mapping.
    KeywordOnly,
    /// Collects excess keyword values.
    VarKeyword,
}

impl ParamKind {
    // Declaration-order rank; a well-formed signature is non-decreasing.
    fn rank(self) -> u8 {
        match self {
            ParamKind::PositionalOnly => 0,
            ParamKind::PositionalOrKeyword => 1,
            ParamKind::VarPositional => 2,
            ParamKind::KeywordOnly => 3,
            ParamKind::VarKeyword => 4,
        }
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    name: String,
    kind: ParamKind,
}

impl Param {
    pub fn positional_only(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ParamKind::PositionalOnly }
    }

    pub fn positional(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ParamKind::PositionalOrKeyword }
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ParamKind::VarPositional }
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ParamKind::KeywordOnly }
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: ParamKind::VarKeyword }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }
}

/// Ordered parameter shape of a callable, validated at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Builds a signature from parameters in declaration order.
    ///
    /// Kinds must not regress (e.g. no positional parameter after a
    /// keyword-only one), variadic parameters are unique, names are unique.
    pub fn new(params: Vec<Param>) -> Result<Self> {
        let mut last_rank = 0;
        for param in &params {
            let rank = param.kind().rank();
            if rank < last_rank {
                return Err(CallError::InvalidSignature {
                    reason: format!("parameter `{}` is out of declaration order", param.name()),
                });
            }
            last_rank = rank;
        }
        if params.iter().filter(|p| p.kind() == ParamKind::VarPositional).count() > 1 {
            return Err(CallError::InvalidSignature {
                reason: "more than one variadic-positional parameter".into(),
            });
        }
        if params.iter().filter(|p| p.kind() == ParamKind::VarKeyword).count() > 1 {
            return Err(CallError::InvalidSignature {
                reason: "more than one variadic-keyword parameter".into(),
            });
        }
        if let Some(name) = params.iter().map(Param::name).duplicates().next() {
            return Err(CallError::InvalidSignature {
                reason: format!("duplicate parameter `{name}`"),
            });
        }
        Ok(Self { params })
    }

    /// A signature declaring no parameters (bound methods use this).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Names of positional-only and positional-or-keyword parameters, in order.
    pub fn positional_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .filter(|p| {
                matches!(p.kind(), ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword)
            })
            .map(Param::name)
    }

    /// Name of the variadic-positional parameter, if declared.
    pub fn var_positional(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.kind() == ParamKind::VarPositional)
            .map(Param::name)
    }
}
