//! Callable values.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::id::ObjectId;
use crate::signature::Signature;
use crate::value::Value;

type Body = dyn Fn(&[Value]) -> Value + Send + Sync;

pub(crate) struct FunctionInner {
    pub(crate) id: ObjectId,
    signature: Signature,
    body: Box<Body>,
}

/// A reference-counted callable with a declared [`Signature`].
///
/// Cloning a `Function` clones the reference, not the function: clones share
/// one [`ObjectId`]. The declared signature is independent of the body, so a
/// body may ignore, or read past, its declared parameters.
#[derive(Clone)]
pub struct Function(pub(crate) Arc<FunctionInner>);

impl Function {
    /// Create a function from parameter names and a body.
    pub fn new<P, F>(params: P, body: F) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::with_signature(Signature::new(params), body)
    }

    /// Create a function from a prepared signature and a body.
    pub fn with_signature<F>(signature: Signature, body: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(FunctionInner {
            id: ObjectId::next(),
            signature,
            body: Box::new(body),
        }))
    }

    /// A signature-only function whose body returns [`Value::Null`].
    ///
    /// Contracts hold these as method descriptors. They are never invoked by
    /// the registry.
    pub fn descriptor<P>(params: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self::new(params, |_| Value::Null)
    }

    /// Identity of this function.
    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    /// The declared signature.
    pub fn signature(&self) -> &Signature {
        &self.0.signature
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.0.signature.arity()
    }

    /// Invoke the body with `args`.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.0.body)(args)
    }

    /// Returns `true` if both references point at the same function.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> Weak<FunctionInner> {
        Arc::downgrade(&self.0)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({}{})", self.0.id.short_hex(), self.0.signature)
    }
}
