//! Contracts expressed as plain data.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::function::Function;
use crate::object::Object;
use crate::signature::Signature;
use crate::value::Value;

/// The method shape of a contract: capability name to [`Signature`].
///
/// A shape can be written by hand, deserialized from configuration, or read
/// back from a contract object with [`Object::shape`]. It serializes as a
/// plain map, so a TOML table such as
///
/// ```toml
/// log = ["level", "message"]
/// flush = []
/// ```
///
/// describes a contract with two methods.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractShape {
    methods: IndexMap<String, Signature>,
}

impl ContractShape {
    /// An empty shape (a contract with no required methods).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a method from parameter names.
    pub fn with_method<P>(self, name: impl Into<String>, params: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        self.with_signature(name, Signature::new(params))
    }

    /// Add a method from a prepared signature.
    pub fn with_signature(mut self, name: impl Into<String>, signature: Signature) -> Self {
        self.methods.insert(name.into(), signature);
        self
    }

    /// The signature declared for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.methods.get(name)
    }

    /// Declared methods in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Signature)> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of declared methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if no methods are declared.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Build a fresh contract object holding one descriptor per method.
    ///
    /// Each call allocates a new identity, so two contracts built from the
    /// same shape are distinct registry keys.
    pub fn into_contract(self) -> Object {
        self.methods
            .into_iter()
            .fold(Object::builder(), |builder, (name, signature)| {
                builder.field(name, Function::with_signature(signature, |_| Value::Null))
            })
            .build()
    }
}
