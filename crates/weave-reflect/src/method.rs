use std::fmt;

use weave_types::{Member, MethodDef, TypeQuery};

use crate::ModelType;

/// Arity-matching policy for method lookup.
///
/// Lookup asks for methods by name and argument count. A candidate admits a
/// count either exactly, or — when its final parameter is a trailing pack —
/// whenever the fixed parameters leave at least one slot for the pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArityRule {
    /// Non-variadic: the parameter count must equal the requested arity.
    Exact(usize),
    /// Variadic: `fixed` counts the parameters before the trailing pack; the
    /// candidate admits any arity of at least `fixed + 1`.
    VariadicTail { fixed: usize },
}

impl ArityRule {
    pub fn of(method: &MethodDef) -> Self {
        if method.is_varargs {
            ArityRule::VariadicTail {
                fixed: method.params.len().saturating_sub(1),
            }
        } else {
            ArityRule::Exact(method.params.len())
        }
    }

    pub fn admits(self, arity: usize) -> bool {
        match self {
            ArityRule::Exact(count) => count == arity,
            // Equivalent to "fixed <= arity - 1" without underflow at zero.
            ArityRule::VariadicTail { fixed } => arity >= fixed + 1,
        }
    }
}

/// One resolved method: its declaring instantiation, parameter and return
/// types after substitution for that instantiation, and its variadic flag.
#[derive(Clone)]
pub struct ModelMethod<'q> {
    query: &'q dyn TypeQuery,
    member: Member,
}

impl<'q> ModelMethod<'q> {
    pub(crate) fn new(query: &'q dyn TypeQuery, member: Member) -> Self {
        Self { query, member }
    }

    pub fn name(&self) -> &str {
        &self.member.method.name
    }

    pub fn declaring_type(&self) -> ModelType<'q> {
        ModelType::new(self.query, self.member.declaring.clone())
    }

    pub fn parameter_types(&self) -> Vec<ModelType<'q>> {
        self.member
            .method
            .params
            .iter()
            .cloned()
            .map(|param| ModelType::new(self.query, param))
            .collect()
    }

    /// Return type, substituted for the declaring instantiation.
    pub fn return_type(&self) -> ModelType<'q> {
        ModelType::new(self.query, self.member.method.return_type.clone())
    }

    pub fn is_varargs(&self) -> bool {
        self.member.method.is_varargs
    }

    pub fn is_static(&self) -> bool {
        self.member.method.is_static
    }

    pub fn arity_rule(&self) -> ArityRule {
        ArityRule::of(&self.member.method)
    }
}

impl fmt::Debug for ModelMethod<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelMethod")
            .field("member", &self.member)
            .finish_non_exhaustive()
    }
}
