//! Identity-keyed metadata store for the Bindery registry.
//!
//! The registry needs to remember facts about objects it does not own: which
//! types a contract offers, and which instance or factory a type is bound to.
//! Those facts live in a [`Record`] per object, kept in a side table keyed by
//! the object's identity. The objects themselves are never modified.
//!
//! # Storage Backends
//!
//! All backends implement the [`RecordStore`] trait:
//!
//! - [`IdentityStore`] -- `HashMap`-based side table with weak subjects
//!
//! # Design Rules
//!
//! 1. At most one record per object identity.
//! 2. A record never keeps its subject alive; dead subjects are swept.
//! 3. A record holds at most one binding (an instance or a factory).
//! 4. The store never interprets bound values.

pub mod identity;
pub mod record;
pub mod traits;

pub use identity::{IdentityStore, DEFAULT_SWEEP_INTERVAL};
pub use record::{Binding, BindingKind, Record};
pub use traits::RecordStore;
