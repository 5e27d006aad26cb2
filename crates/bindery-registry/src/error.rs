//! Error types for registry operations and configuration loading.

use std::fmt;
use std::path::PathBuf;

use bindery_types::{ObjectId, Signature};

/// The argument position that failed an object-like check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Contract,
    Type,
    Argument,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contract => f.write_str("contract"),
            Self::Type => f.write_str("type"),
            Self::Argument => f.write_str("argument"),
        }
    }
}

/// Broad classification of a [`RegistryError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value had the wrong shape: not object-like, or not callable.
    InvalidArgument,
    /// An association rule was broken, resolution found zero or several
    /// candidates, or the resolved instance does not fit its contract.
    Association,
}

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A contract, type, or target was not an object or function.
    #[error("{role} must be object")]
    NotObject { role: Role },

    /// A factory was not a function.
    #[error("factory must be function")]
    NotCallable,

    /// The type is already in the contract's type list.
    #[error("this contract is already associated with this type")]
    AlreadyAssociated { contract: ObjectId, ty: ObjectId },

    /// The type is already bound to an instance.
    #[error("this type is already associated with an instance")]
    AlreadyHasInstance { ty: ObjectId },

    /// The type is already bound to a factory.
    #[error("this type is already associated with a factory")]
    AlreadyHasFactory { ty: ObjectId },

    /// No type was ever associated with the contract.
    #[error("no types for contract")]
    NoTypes { contract: ObjectId },

    /// None of the contract's types is bound.
    #[error("no instance or factory for contract")]
    NoCandidates { contract: ObjectId },

    /// More than one of the contract's types is bound.
    #[error("more than one possible instance or factory for contract")]
    Ambiguous { contract: ObjectId, count: usize },

    /// The resolved instance lacks a method the contract declares.
    #[error("instance does not implement {member}{expected}")]
    NotImplemented { member: String, expected: Signature },

    /// The resolved instance has the method with a different arity.
    #[error("instance implements {member}{actual} but contract defines {member}{expected}")]
    ArityMismatch {
        member: String,
        actual: Signature,
        expected: Signature,
    },

    /// `unassociate` was called on an object the registry never recorded.
    #[error("given object was not associated")]
    NotAssociated { id: ObjectId },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotObject { .. } | Self::NotCallable => ErrorKind::InvalidArgument,
            _ => ErrorKind::Association,
        }
    }

    /// Returns `true` for the "nothing available" outcomes that optional
    /// resolution turns into an absent value.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::NoTypes { .. } | Self::NoCandidates { .. })
    }
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors from loading a [`RegistryConfig`](crate::RegistryConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
