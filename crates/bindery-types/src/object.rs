//! Objects with identity and ordered members.

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;

use crate::function::Function;
use crate::id::ObjectId;
use crate::shape::ContractShape;
use crate::value::Value;

pub(crate) struct ObjectInner {
    pub(crate) id: ObjectId,
    members: IndexMap<String, Value>,
}

/// A reference-counted object with named members.
///
/// Members are fixed at construction and kept in insertion order, which is
/// the order contract conformance is checked in. Cloning an `Object` clones
/// the reference; clones share one [`ObjectId`].
#[derive(Clone)]
pub struct Object(pub(crate) Arc<ObjectInner>);

impl Object {
    /// Create an object with no members.
    pub fn new() -> Self {
        Self::from_members(IndexMap::new())
    }

    /// Start building an object member by member.
    pub fn builder() -> ObjectBuilder {
        ObjectBuilder::default()
    }

    fn from_members(members: IndexMap<String, Value>) -> Self {
        Self(Arc::new(ObjectInner {
            id: ObjectId::next(),
            members,
        }))
    }

    /// Identity of this object.
    pub fn id(&self) -> ObjectId {
        self.0.id
    }

    /// Look up a member by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.members.get(key)
    }

    /// Member names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.members.keys().map(String::as_str)
    }

    /// Members in insertion order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Members holding functions, in insertion order.
    pub fn methods(&self) -> impl Iterator<Item = (&str, &Function)> {
        self.members().filter_map(|(k, v)| v.as_function().map(|f| (k, f)))
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.0.members.len()
    }

    /// Returns `true` if the object has no members.
    pub fn is_empty(&self) -> bool {
        self.0.members.is_empty()
    }

    /// The method shape this object declares when used as a contract.
    pub fn shape(&self) -> ContractShape {
        self.methods()
            .fold(ContractShape::new(), |shape, (name, f)| {
                shape.with_signature(name, f.signature().clone())
            })
    }

    /// Returns `true` if both references point at the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> Weak<ObjectInner> {
        Arc::downgrade(&self.0)
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.keys().collect();
        f.debug_struct("Object")
            .field("id", &self.0.id)
            .field("keys", &keys)
            .finish()
    }
}

/// Builder for [`Object`].
#[derive(Default)]
pub struct ObjectBuilder {
    members: IndexMap<String, Value>,
}

impl ObjectBuilder {
    /// Add a plain member. A later member with the same name replaces the
    /// value but keeps the original position.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.members.insert(name.into(), value.into());
        self
    }

    /// Add a callable member.
    pub fn method<P, F>(self, name: impl Into<String>, params: P, body: F) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.field(name, Function::new(params, body))
    }

    /// Add a signature-only member, as contracts declare them.
    pub fn descriptor<P>(self, name: impl Into<String>, params: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        self.field(name, Function::descriptor(params))
    }

    /// Finish the object, allocating its identity.
    pub fn build(self) -> Object {
        Object::from_members(self.members)
    }
}
