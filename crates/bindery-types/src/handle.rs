//! Owning and non-owning references to object-like values.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Weak;

use crate::function::{Function, FunctionInner};
use crate::id::ObjectId;
use crate::object::{Object, ObjectInner};
use crate::value::Value;

/// An object-like value: something with identity that can act as a
/// contract or a type.
///
/// Equality and hashing use the [`ObjectId`] only.
#[derive(Clone, Debug)]
pub enum Handle {
    Object(Object),
    Function(Function),
}

impl Handle {
    /// Identity of the referenced object or function.
    pub fn id(&self) -> ObjectId {
        match self {
            Self::Object(o) => o.id(),
            Self::Function(f) => f.id(),
        }
    }

    /// The referenced object, if this handle is not a function.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            Self::Function(_) => None,
        }
    }

    /// A non-owning reference to the same object or function.
    pub fn downgrade(&self) -> WeakHandle {
        let inner = match self {
            Self::Object(o) => WeakInner::Object(o.downgrade()),
            Self::Function(f) => WeakInner::Function(f.downgrade()),
        };
        WeakHandle {
            id: self.id(),
            inner,
        }
    }

    /// Convert back into a [`Value`].
    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(o) => Value::Object(o.clone()),
            Self::Function(f) => Value::Function(f.clone()),
        }
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl From<Object> for Handle {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl From<Function> for Handle {
    fn from(f: Function) -> Self {
        Self::Function(f)
    }
}

impl From<Handle> for Value {
    fn from(h: Handle) -> Self {
        match h {
            Handle::Object(o) => Value::Object(o),
            Handle::Function(f) => Value::Function(f),
        }
    }
}

enum WeakInner {
    Object(Weak<ObjectInner>),
    Function(Weak<FunctionInner>),
}

/// A [`Handle`] that does not keep its subject alive.
#[derive(Clone)]
pub struct WeakHandle {
    id: ObjectId,
    inner: WeakInner,
}

impl WeakHandle {
    /// Identity of the subject, available even after it has been dropped.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Returns `true` while at least one owning reference exists.
    pub fn is_alive(&self) -> bool {
        match &self.inner {
            WeakInner::Object(w) => w.strong_count() > 0,
            WeakInner::Function(w) => w.strong_count() > 0,
        }
    }

    /// Recover an owning handle if the subject is still alive.
    pub fn upgrade(&self) -> Option<Handle> {
        match &self.inner {
            WeakInner::Object(w) => w.upgrade().map(|inner| Handle::Object(Object(inner))),
            WeakInner::Function(w) => w.upgrade().map(|inner| Handle::Function(Function(inner))),
        }
    }
}

impl Clone for WeakInner {
    fn clone(&self) -> Self {
        match self {
            Self::Object(w) => Self::Object(w.clone()),
            Self::Function(w) => Self::Function(w.clone()),
        }
    }
}

impl fmt::Debug for WeakHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakHandle")
            .field("id", &self.id)
            .field("alive", &self.is_alive())
            .finish()
    }
}
