//! Structural conformance of resolved instances.
//!
//! A contract declares methods as signature-only functions. An instance
//! conforms when it has a function member of the same name and the same
//! number of parameters for every declared method. Parameter names are only
//! used to render errors.

use bindery_types::{Handle, Value};

use crate::error::{RegistryError, Result};

/// Check `instance` against the methods declared on `contract`.
///
/// Methods are checked in the contract's member order and the first failure
/// is returned. Members of the contract that are not functions declare
/// nothing. A function used as a contract has no members, so every instance
/// conforms to it.
pub fn check_conformance(contract: &Handle, instance: &Value) -> Result<()> {
    let Some(contract) = contract.as_object() else {
        return Ok(());
    };
    for (name, declared) in contract.methods() {
        let Some(implemented) = instance.member(name).and_then(Value::as_function) else {
            return Err(RegistryError::NotImplemented {
                member: name.to_string(),
                expected: declared.signature().clone(),
            });
        };
        if implemented.arity() != declared.arity() {
            return Err(RegistryError::ArityMismatch {
                member: name.to_string(),
                actual: implemented.signature().clone(),
                expected: declared.signature().clone(),
            });
        }
    }
    Ok(())
}
