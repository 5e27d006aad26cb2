//! Foundation types for the Bindery registry.
//!
//! The registry binds contracts to implementations by object identity and
//! checks implementations against a contract's declared method shapes. This
//! crate provides the small dynamic value model those rules operate on.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Process-unique identity of an object or function
//! - [`Value`] — Any value the registry can store or return
//! - [`Object`] — Reference-counted object with ordered, named members
//! - [`Function`] — Reference-counted callable carrying a [`Signature`]
//! - [`Handle`] / [`WeakHandle`] — Owning and non-owning object-like references
//! - [`ContractShape`] — A contract expressed as plain data

pub mod function;
pub mod handle;
pub mod id;
pub mod object;
pub mod shape;
pub mod signature;
pub mod value;

pub use function::Function;
pub use handle::{Handle, WeakHandle};
pub use id::ObjectId;
pub use object::{Object, ObjectBuilder};
pub use shape::ContractShape;
pub use signature::Signature;
pub use value::Value;
