//! Method signatures as plain data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The ordered parameter names of a method.
///
/// Contracts compare signatures by [`arity`](Self::arity) only. The names are
/// kept so that conformance errors can show both shapes, e.g.
/// `foo(bar, baz)` versus `foo(bar, baz, cb)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature {
    params: Vec<String>,
}

impl Signature {
    /// Create a signature from parameter names.
    pub fn new<P>(params: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// A signature with no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// The parameter names in declaration order.
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.params.join(", "))
    }
}
