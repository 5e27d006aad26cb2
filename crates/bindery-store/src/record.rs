//! Per-object metadata records.

use std::fmt;

use bindery_types::{Function, Handle, Value};
use serde::{Deserialize, Serialize};

/// What a type is bound to.
#[derive(Clone, Debug)]
pub enum Binding {
    /// A fixed value returned on every resolution.
    Instance(Value),
    /// A function invoked on every resolution with the caller's arguments.
    Factory(Function),
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Instance(_) => BindingKind::Instance,
            Self::Factory(_) => BindingKind::Factory,
        }
    }
}

/// The variant of a [`Binding`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BindingKind {
    Instance,
    Factory,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance => f.write_str("instance"),
            Self::Factory => f.write_str("factory"),
        }
    }
}

/// Metadata attached to one object identity.
///
/// A contract uses `associated_types`; a type uses `binding`. Both live in
/// the same record shape so an object can act in either role.
#[derive(Clone, Debug, Default)]
pub struct Record {
    associated_types: Option<Vec<Handle>>,
    binding: Option<Binding>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The types offered for this object as a contract.
    ///
    /// `None` until the first type is associated. An emptied list stays
    /// `Some`, so "never associated" and "no types left" remain distinct.
    pub fn associated_types(&self) -> Option<&[Handle]> {
        self.associated_types.as_deref()
    }

    /// Returns `true` if `ty` is among the associated types.
    pub fn has_type(&self, ty: &Handle) -> bool {
        self.associated_types
            .as_ref()
            .is_some_and(|types| types.contains(ty))
    }

    /// Append `ty` to the associated types. Returns `false` without
    /// modifying the list if it is already present.
    pub fn push_type(&mut self, ty: Handle) -> bool {
        let types = self.associated_types.get_or_insert_with(Vec::new);
        if types.contains(&ty) {
            return false;
        }
        types.push(ty);
        true
    }

    /// Remove `ty` from the associated types. Returns `true` if it was there.
    pub fn remove_type(&mut self, ty: &Handle) -> bool {
        match self.associated_types.as_mut() {
            Some(types) => {
                let before = types.len();
                types.retain(|t| t != ty);
                types.len() != before
            }
            None => false,
        }
    }

    /// The current binding, if any.
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    /// The bound instance, if the binding is an instance.
    pub fn instance(&self) -> Option<&Value> {
        match &self.binding {
            Some(Binding::Instance(v)) => Some(v),
            _ => None,
        }
    }

    /// The bound factory, if the binding is a factory.
    pub fn factory(&self) -> Option<&Function> {
        match &self.binding {
            Some(Binding::Factory(f)) => Some(f),
            _ => None,
        }
    }

    /// Install a binding. Returns the kind already present, leaving it in
    /// place, if the record is bound.
    pub fn bind(&mut self, binding: Binding) -> Result<(), BindingKind> {
        if let Some(existing) = &self.binding {
            return Err(existing.kind());
        }
        self.binding = Some(binding);
        Ok(())
    }

    /// Remove and return the binding.
    pub fn clear_binding(&mut self) -> Option<Binding> {
        self.binding.take()
    }
}
