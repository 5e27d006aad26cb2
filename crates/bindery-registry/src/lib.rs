//! Contract registry for Bindery.
//!
//! A contract is an object whose function members declare required methods
//! by signature. Wiring code offers one or more *types* for a contract and
//! binds each type to a fixed instance or to a factory. Consumers then ask
//! the registry for the contract and get back exactly one implementation,
//! checked against the contract's method arities.
//!
//! # Quick Start
//!
//! ```rust
//! use bindery_registry::{ContractShape, Function, Object, Registry, Value};
//!
//! let registry = Registry::new();
//!
//! let greeter = Value::from(ContractShape::new().with_method("greet", ["name"]).into_contract());
//! let english = Value::from(Function::descriptor(Vec::<String>::new()));
//! registry.associate(&greeter, &english).unwrap();
//!
//! let hello = Object::builder()
//!     .method("greet", ["name"], |args| {
//!         let name = args.first().and_then(Value::as_str).unwrap_or("world");
//!         Value::from(format!("hello, {name}"))
//!     })
//!     .build();
//! registry.set_instance(&english, hello.clone()).unwrap();
//!
//! let resolved = registry.resolve(&greeter, &[]).unwrap();
//! assert_eq!(resolved, Value::from(hello));
//! ```
//!
//! # Resolution
//!
//! 1. A truthy instance bound to the target itself is returned as is.
//! 2. Otherwise every associated type contributes its factory, or its
//!    instance if truthy. Exactly one contribution must exist.
//! 3. A factory is called with the caller's arguments.
//! 4. The result is checked against the target's declared methods.
//!
//! [`ResolveMode::Optional`] turns "no types" and "nothing bound" into
//! `None`. Ambiguity is always an error.

pub mod config;
pub mod conformance;
pub mod error;
pub mod registry;

pub use config::{ConformanceCheck, RegistryConfig, UnassociatePolicy};
pub use conformance::check_conformance;
pub use error::{ConfigError, ErrorKind, RegistryError, Result, Role};
pub use registry::{Registry, ResolveMode};

// Re-export the value model so wiring code needs a single dependency.
pub use bindery_store::{BindingKind, IdentityStore, RecordStore};
pub use bindery_types::{ContractShape, Function, Handle, Object, ObjectId, Signature, Value};
