//! The registry engine: association, binding, resolution, unassociation.

use bindery_store::{Binding, BindingKind, IdentityStore, Record, RecordStore};
use bindery_types::{Handle, Value};
use tracing::debug;

use crate::config::{ConformanceCheck, RegistryConfig, UnassociatePolicy};
use crate::conformance::check_conformance;
use crate::error::{RegistryError, Result, Role};

// ---------------------------------------------------------------------------
// ResolveMode
// ---------------------------------------------------------------------------

/// How [`Registry::resolve_with`] treats a contract with nothing bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolveMode {
    /// Missing types or candidates are errors.
    #[default]
    Required,
    /// Missing types or candidates resolve to `None`. Ambiguity and
    /// conformance failures are still errors.
    Optional,
}

impl ResolveMode {
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Binds contracts to types and types to instances or factories, and
/// resolves a contract to exactly one conforming instance.
///
/// A registry is an ordinary value: create one per application (or per
/// test) and pass it by reference to the code that wires or consumes
/// implementations. Objects registered with it are never modified; all
/// bookkeeping lives in the registry's [`RecordStore`].
#[derive(Debug)]
pub struct Registry<S = IdentityStore> {
    store: S,
    config: RegistryConfig,
}

impl Registry<IdentityStore> {
    /// Create a registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry backed by an [`IdentityStore`] built from `config`.
    pub fn with_config(config: RegistryConfig) -> Self {
        let store = IdentityStore::with_sweep_interval(config.sweep_interval);
        Self { store, config }
    }
}

impl Default for Registry<IdentityStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RecordStore> Registry<S> {
    /// Create a registry over a caller-supplied store.
    pub fn with_store(store: S, config: RegistryConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The underlying record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Offer `ty` as an implementation strategy for `contract`.
    ///
    /// A contract may have any number of types, and a type may be offered
    /// for any number of contracts, but each (contract, type) pair only
    /// once.
    pub fn associate(&self, contract: &Value, ty: &Value) -> Result<()> {
        let ty = object_like(ty, Role::Type)?;
        let contract = object_like(contract, Role::Contract)?;

        let added = self.store.update(&contract, |record| record.push_type(ty.clone()));
        if !added {
            return Err(RegistryError::AlreadyAssociated {
                contract: contract.id(),
                ty: ty.id(),
            });
        }

        debug!(contract = %contract.id(), ty = %ty.id(), "type associated");
        Ok(())
    }

    /// Bind `ty` to a fixed instance. Any value is accepted, including
    /// [`Value::Null`].
    pub fn set_instance(&self, ty: &Value, instance: impl Into<Value>) -> Result<()> {
        let ty = object_like(ty, Role::Type)?;
        self.bind(&ty, Binding::Instance(instance.into()))
    }

    /// Bind `ty` to a factory, invoked with the caller's arguments on every
    /// resolution.
    pub fn set_factory(&self, ty: &Value, factory: &Value) -> Result<()> {
        let Value::Function(factory) = factory else {
            return Err(RegistryError::NotCallable);
        };
        let ty = object_like(ty, Role::Type)?;
        self.bind(&ty, Binding::Factory(factory.clone()))
    }

    fn bind(&self, ty: &Handle, binding: Binding) -> Result<()> {
        let kind = binding.kind();
        self.store
            .update(ty, |record| record.bind(binding))
            .map_err(|existing| match existing {
                BindingKind::Instance => RegistryError::AlreadyHasInstance { ty: ty.id() },
                BindingKind::Factory => RegistryError::AlreadyHasFactory { ty: ty.id() },
            })?;

        debug!(ty = %ty.id(), %kind, "type bound");
        Ok(())
    }

    /// Clear the instance or factory bound to `target`.
    ///
    /// The record itself stays, so a later `unassociate` succeeds again.
    /// Under [`UnassociatePolicy::Cascade`] the target is also removed from
    /// every contract's type list.
    pub fn unassociate(&self, target: &Value) -> Result<()> {
        let target = object_like(target, Role::Argument)?;

        let cleared = self
            .store
            .update_existing(&target, Record::clear_binding)
            .ok_or(RegistryError::NotAssociated { id: target.id() })?;

        let detached = match self.config.unassociate {
            UnassociatePolicy::BindingOnly => 0,
            UnassociatePolicy::Cascade => self.store.detach_everywhere(&target),
        };

        debug!(
            id = %target.id(),
            cleared = ?cleared.as_ref().map(Binding::kind),
            detached,
            "unassociated"
        );
        Ok(())
    }

    /// Resolve `target` to a single conforming instance.
    ///
    /// `args` are passed to a factory; a bound instance ignores them.
    pub fn resolve(&self, target: &Value, args: &[Value]) -> Result<Value> {
        self.lookup(target, args)
    }

    /// Like [`resolve`](Self::resolve), but a contract with no types or no
    /// bound type resolves to `None`.
    pub fn resolve_optional(&self, target: &Value, args: &[Value]) -> Result<Option<Value>> {
        self.resolve_with(target, ResolveMode::Optional, args)
    }

    /// Resolve with an explicit [`ResolveMode`].
    ///
    /// Returns `Ok(None)` only in [`ResolveMode::Optional`], and only when
    /// nothing is available. Ambiguity is an error in every mode.
    pub fn resolve_with(
        &self,
        target: &Value,
        mode: ResolveMode,
        args: &[Value],
    ) -> Result<Option<Value>> {
        match self.lookup(target, args) {
            Ok(instance) => Ok(Some(instance)),
            Err(err) if mode.is_optional() && err.is_unresolved() => {
                debug!(reason = %err, "optional resolution found nothing");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn lookup(&self, target: &Value, args: &[Value]) -> Result<Value> {
        let target = object_like(target, Role::Contract)?;

        // Resolution records every object it visits, so each of them can
        // later be unassociated.
        let (direct, types) = self.store.update(&target, |record| {
            let direct = record
                .instance()
                .filter(|instance| instance.is_truthy())
                .cloned();
            let types = record.associated_types().map(<[Handle]>::to_vec);
            (direct, types)
        });

        // A bound instance on the target itself wins and is not validated.
        if let Some(instance) = direct {
            debug!(target = %target.id(), "resolved directly");
            return Ok(instance);
        }

        let types = types.ok_or(RegistryError::NoTypes {
            contract: target.id(),
        })?;

        let mut candidates: Vec<Binding> = types
            .iter()
            .filter_map(|ty| self.store.update(ty, |record| candidate(record)))
            .collect();

        if candidates.len() > 1 {
            return Err(RegistryError::Ambiguous {
                contract: target.id(),
                count: candidates.len(),
            });
        }
        let Some(chosen) = candidates.pop() else {
            return Err(RegistryError::NoCandidates {
                contract: target.id(),
            });
        };

        // The store is not locked here, so a factory may use the registry.
        let instance = match &chosen {
            Binding::Factory(factory) => factory.call(args),
            Binding::Instance(instance) => instance.clone(),
        };

        if self.config.conformance == ConformanceCheck::Arity {
            check_conformance(&target, &instance)?;
        }

        debug!(contract = %target.id(), via = %chosen.kind(), "resolved");
        Ok(instance)
    }

    /// The types associated with `contract`, in association order.
    pub fn types_for(&self, contract: &Value) -> Result<Vec<Handle>> {
        let contract = object_like(contract, Role::Contract)?;
        Ok(self.store.read(&contract, |record| {
            record
                .and_then(Record::associated_types)
                .map(<[Handle]>::to_vec)
                .unwrap_or_default()
        }))
    }

    /// Returns `true` if `ty` is in `contract`'s type list.
    pub fn is_associated(&self, contract: &Value, ty: &Value) -> Result<bool> {
        let contract = object_like(contract, Role::Contract)?;
        let ty = object_like(ty, Role::Type)?;
        Ok(self
            .store
            .read(&contract, |record| record.is_some_and(|r| r.has_type(&ty))))
    }

    /// What `ty` is bound to, if anything.
    pub fn binding_kind(&self, ty: &Value) -> Result<Option<BindingKind>> {
        let ty = object_like(ty, Role::Type)?;
        Ok(self
            .store
            .read(&ty, |record| record.and_then(Record::binding).map(Binding::kind)))
    }

    /// Number of records held for registered objects.
    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    /// Drop records of objects that no longer exist. Returns how many were
    /// removed.
    pub fn sweep(&self) -> usize {
        self.store.sweep()
    }
}

fn object_like(value: &Value, role: Role) -> Result<Handle> {
    value.as_handle().ok_or(RegistryError::NotObject { role })
}

/// The resolution candidate a type contributes: its factory, else its
/// instance if truthy, else nothing.
fn candidate(record: &Record) -> Option<Binding> {
    match record.binding()? {
        Binding::Factory(factory) => Some(Binding::Factory(factory.clone())),
        Binding::Instance(instance) if instance.is_truthy() => {
            Some(Binding::Instance(instance.clone()))
        }
        Binding::Instance(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use bindery_types::{ContractShape, Function, Object};

    /// Helper: a fresh marker type, the way wiring code usually makes one.
    fn marker() -> Value {
        Value::from(Function::descriptor(Vec::<String>::new()))
    }

    /// Helper: an empty contract.
    fn contract() -> Value {
        Value::from(Object::new())
    }

    fn factory<F>(params: &[&str], body: F) -> Value
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Value::from(Function::new(params.iter().copied(), body))
    }

    // -----------------------------------------------------------------------
    // associate
    // -----------------------------------------------------------------------

    #[test]
    fn associate_rejects_null_contract() {
        let registry = Registry::new();
        let err = registry.associate(&Value::Null, &marker()).unwrap_err();
        assert_eq!(err, RegistryError::NotObject { role: Role::Contract });
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn associate_rejects_string_contract() {
        let registry = Registry::new();
        let err = registry
            .associate(&Value::from("my-contract"), &marker())
            .unwrap_err();
        assert_eq!(err.to_string(), "contract must be object");
    }

    #[test]
    fn associate_rejects_null_type() {
        let registry = Registry::new();
        let err = registry.associate(&contract(), &Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "type must be object");
    }

    #[test]
    fn associate_checks_type_before_contract() {
        let registry = Registry::new();
        let err = registry.associate(&Value::Null, &Value::Null).unwrap_err();
        assert_eq!(err, RegistryError::NotObject { role: Role::Type });
    }

    #[test]
    fn associate_accepts_object_types() {
        let registry = Registry::new();
        assert!(registry
            .associate(&contract(), &Value::from(Object::new()))
            .is_ok());
    }

    #[test]
    fn associate_allows_second_type() {
        let registry = Registry::new();
        let c = contract();
        registry.associate(&c, &marker()).unwrap();
        assert!(registry.associate(&c, &marker()).is_ok());
        assert_eq!(registry.types_for(&c).unwrap().len(), 2);
    }

    #[test]
    fn associate_rejects_same_pair_twice() {
        let registry = Registry::new();
        let c = contract();
        let ty = marker();
        registry.associate(&c, &ty).unwrap();

        let err = registry.associate(&c, &ty).unwrap_err();
        assert_eq!(err.to_string(), "this contract is already associated with this type");
        assert_eq!(err.kind(), ErrorKind::Association);
    }

    #[test]
    fn associate_does_not_touch_contract_members() {
        let registry = Registry::new();
        let obj = Object::builder()
            .method("value_of", Vec::<String>::new(), |_| Value::from(1))
            .build();
        registry
            .associate(&Value::from(&obj), &Value::from(Object::new()))
            .unwrap();

        let keys: Vec<&str> = obj.keys().collect();
        assert_eq!(keys, vec!["value_of"]);
        let value_of = obj.get("value_of").and_then(Value::as_function).unwrap();
        assert_eq!(value_of.call(&[]), Value::from(1));
    }

    #[test]
    fn one_type_may_serve_several_contracts() {
        let registry = Registry::new();
        let (a, b, ty) = (contract(), contract(), marker());
        registry.associate(&a, &ty).unwrap();
        registry.associate(&b, &ty).unwrap();
        registry.set_instance(&ty, "shared").unwrap();

        assert_eq!(registry.resolve(&a, &[]).unwrap(), Value::from("shared"));
        assert_eq!(registry.resolve(&b, &[]).unwrap(), Value::from("shared"));
    }

    // -----------------------------------------------------------------------
    // set_instance
    // -----------------------------------------------------------------------

    #[test]
    fn set_instance_rejects_null_type() {
        let registry = Registry::new();
        let err = registry.set_instance(&Value::Null, Object::new()).unwrap_err();
        assert_eq!(err.to_string(), "type must be object");
    }

    #[test]
    fn set_instance_rejects_string_type() {
        let registry = Registry::new();
        let err = registry
            .set_instance(&Value::from("some-type"), Object::new())
            .unwrap_err();
        assert_eq!(err, RegistryError::NotObject { role: Role::Type });
    }

    #[test]
    fn set_instance_accepts_null() {
        let registry = Registry::new();
        let ty = marker();
        assert!(registry.set_instance(&ty, Value::Null).is_ok());
        assert_eq!(registry.binding_kind(&ty).unwrap(), Some(BindingKind::Instance));
    }

    #[test]
    fn set_instance_twice_fails() {
        let registry = Registry::new();
        let ty = marker();
        registry.set_instance(&ty, Object::new()).unwrap();

        let err = registry.set_instance(&ty, Object::new()).unwrap_err();
        assert_eq!(err.to_string(), "this type is already associated with an instance");
    }

    #[test]
    fn set_instance_after_factory_fails() {
        let registry = Registry::new();
        let ty = marker();
        registry.set_factory(&ty, &marker()).unwrap();

        let err = registry.set_instance(&ty, Object::new()).unwrap_err();
        assert_eq!(err.to_string(), "this type is already associated with a factory");
    }

    // -----------------------------------------------------------------------
    // set_factory
    // -----------------------------------------------------------------------

    #[test]
    fn set_factory_rejects_null_type() {
        let registry = Registry::new();
        let err = registry.set_factory(&Value::Null, &marker()).unwrap_err();
        assert_eq!(err.to_string(), "type must be object");
    }

    #[test]
    fn set_factory_rejects_object_factory() {
        let registry = Registry::new();
        let err = registry
            .set_factory(&marker(), &Value::from(Object::new()))
            .unwrap_err();
        assert_eq!(err, RegistryError::NotCallable);
        assert_eq!(err.to_string(), "factory must be function");
    }

    #[test]
    fn set_factory_checks_callable_before_type() {
        let registry = Registry::new();
        let err = registry.set_factory(&Value::Null, &Value::Null).unwrap_err();
        assert_eq!(err, RegistryError::NotCallable);
    }

    #[test]
    fn set_factory_twice_fails() {
        let registry = Registry::new();
        let ty = marker();
        registry.set_factory(&ty, &marker()).unwrap();

        let err = registry.set_factory(&ty, &marker()).unwrap_err();
        assert_eq!(err.to_string(), "this type is already associated with a factory");
    }

    #[test]
    fn set_factory_after_instance_fails() {
        let registry = Registry::new();
        let ty = marker();
        registry.set_instance(&ty, Object::new()).unwrap();

        let err = registry.set_factory(&ty, &marker()).unwrap_err();
        assert_eq!(err.to_string(), "this type is already associated with an instance");
    }

    // -----------------------------------------------------------------------
    // resolve
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_rejects_null() {
        let registry = Registry::new();
        let err = registry.resolve(&Value::Null, &[]).unwrap_err();
        assert_eq!(err.to_string(), "contract must be object");
    }

    #[test]
    fn resolve_rejects_string() {
        let registry = Registry::new();
        let err = registry.resolve(&Value::from("some-contract"), &[]).unwrap_err();
        assert_eq!(err, RegistryError::NotObject { role: Role::Contract });
    }

    #[test]
    fn resolve_after_associate_then_instance() {
        let registry = Registry::new();
        let (c, ty, instance) = (contract(), marker(), marker());
        registry.associate(&c, &ty).unwrap();
        registry.set_instance(&ty, instance.clone()).unwrap();

        assert_eq!(registry.resolve(&c, &[]).unwrap(), instance);
    }

    #[test]
    fn resolve_after_instance_then_associate() {
        let registry = Registry::new();
        let (c, ty, instance) = (contract(), marker(), marker());
        registry.set_instance(&ty, instance.clone()).unwrap();
        registry.associate(&c, &ty).unwrap();

        assert_eq!(registry.resolve(&c, &[]).unwrap(), instance);
    }

    #[test]
    fn resolve_returns_factory_result() {
        let registry = Registry::new();
        let (c, ty) = (contract(), marker());
        let instance = Object::new();
        let produced = instance.clone();
        registry.associate(&c, &ty).unwrap();
        registry
            .set_factory(&ty, &factory(&[], move |_| Value::from(&produced)))
            .unwrap();

        assert_eq!(registry.resolve(&c, &[]).unwrap(), Value::from(instance));
    }

    #[test]
    fn resolve_passes_arguments_to_factory() {
        let registry = Registry::new();
        let (c, ty) = (contract(), marker());
        registry.associate(&c, &ty).unwrap();
        registry
            .set_factory(
                &ty,
                &factory(&["a", "b", "c"], |args| {
                    Value::from(args.iter().filter_map(Value::as_f64).product::<f64>())
                }),
            )
            .unwrap();

        let value = registry
            .resolve(&c, &[Value::from(2), Value::from(3), Value::from(7)])
            .unwrap();
        assert_eq!(value, Value::from(42));
    }

    #[test]
    fn factory_runs_on_every_resolution() {
        let registry = Registry::new();
        let (c, ty) = (contract(), marker());
        registry.associate(&c, &ty).unwrap();
        registry
            .set_factory(&ty, &factory(&[], |_| Value::from(Object::new())))
            .unwrap();

        let first = registry.resolve(&c, &[]).unwrap();
        let second = registry.resolve(&c, &[]).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn resolve_fails_on_two_instances() {
        let registry = Registry::new();
        let (c, a, b) = (contract(), marker(), marker());
        registry.associate(&c, &a).unwrap();
        registry.associate(&c, &b).unwrap();
        registry.set_instance(&a, Object::new()).unwrap();
        registry.set_instance(&b, Object::new()).unwrap();

        let err = registry.resolve(&c, &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "more than one possible instance or factory for contract"
        );
    }

    #[test]
    fn resolve_fails_on_two_factories() {
        let registry = Registry::new();
        let (c, a, b) = (contract(), marker(), marker());
        registry.associate(&c, &a).unwrap();
        registry.associate(&c, &b).unwrap();
        registry.set_factory(&a, &marker()).unwrap();
        registry.set_factory(&b, &marker()).unwrap();

        let err = registry.resolve(&c, &[]).unwrap_err();
        assert!(matches!(err, RegistryError::Ambiguous { count: 2, .. }));
    }

    #[test]
    fn resolve_fails_on_instance_and_factory() {
        let registry = Registry::new();
        let (c, a, b) = (contract(), marker(), marker());
        registry.associate(&c, &a).unwrap();
        registry.associate(&c, &b).unwrap();
        registry.set_instance(&a, Object::new()).unwrap();
        registry.set_factory(&b, &marker()).unwrap();

        let err = registry.resolve(&c, &[]).unwrap_err();
        assert!(matches!(err, RegistryError::Ambiguous { .. }));
    }

    #[test]
    fn resolve_fails_without_types() {
        let registry = Registry::new();
        let err = registry.resolve(&contract(), &[]).unwrap_err();
        assert_eq!(err.to_string(), "no types for contract");
    }

    #[test]
    fn resolve_fails_without_instances() {
        let registry = Registry::new();
        let c = contract();
        registry.associate(&c, &marker()).unwrap();

        let err = registry.resolve(&c, &[]).unwrap_err();
        assert_eq!(err.to_string(), "no instance or factory for contract");
    }

    #[test]
    fn falsy_instances_are_not_candidates() {
        let registry = Registry::new();
        let (c, ty) = (contract(), marker());
        registry.associate(&c, &ty).unwrap();
        registry.set_instance(&ty, 0).unwrap();

        let err = registry.resolve(&c, &[]).unwrap_err();
        assert!(matches!(err, RegistryError::NoCandidates { .. }));
    }

    #[test]
    fn resolve_fails_when_method_missing() {
        let registry = Registry::new();
        let c = Value::from(ContractShape::new().with_method("foo", ["bar", "baz"]).into_contract());
        let ty = marker();
        registry.associate(&c, &ty).unwrap();
        registry.set_instance(&ty, Object::new()).unwrap();

        let err = registry.resolve(&c, &[]).unwrap_err();
        assert_eq!(err.to_string(), "instance does not implement foo(bar, baz)");
    }

    #[test]
    fn resolve_fails_on_arity_mismatch() {
        let registry = Registry::new();
        let c = Value::from(
            ContractShape::new()
                .with_method("foo", ["bar", "baz", "cb"])
                .into_contract(),
        );
        let ty = marker();
        registry.associate(&c, &ty).unwrap();
        registry
            .set_instance(
                &ty,
                Object::builder()
                    .method("foo", ["bar", "baz"], |_| Value::Null)
                    .build(),
            )
            .unwrap();

        let err = registry.resolve(&c, &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "instance implements foo(bar, baz) but contract defines foo(bar, baz, cb)"
        );
    }

    #[test]
    fn resolve_accepts_matching_instance() {
        let registry = Registry::new();
        let c = Value::from(
            ContractShape::new()
                .with_method("foo", ["bar", "baz", "cb"])
                .into_contract(),
        );
        let ty = marker();
        registry.associate(&c, &ty).unwrap();
        registry
            .set_instance(
                &ty,
                Object::builder()
                    .method("foo", ["bar", "baz", "cb"], |_| Value::Null)
                    .build(),
            )
            .unwrap();

        assert!(registry.resolve(&c, &[]).is_ok());
    }

    #[test]
    fn lenient_config_skips_conformance() {
        let registry = Registry::with_config(RegistryConfig::lenient());
        let c = Value::from(ContractShape::new().with_method("foo", ["bar"]).into_contract());
        let ty = marker();
        registry.associate(&c, &ty).unwrap();
        registry.set_instance(&ty, 42).unwrap();

        assert_eq!(registry.resolve(&c, &[]).unwrap(), Value::from(42));
    }

    #[test]
    fn resolve_type_without_contract() {
        let registry = Registry::new();
        let ty = marker();
        let instance = Object::new();
        registry.set_instance(&ty, instance.clone()).unwrap();

        assert_eq!(registry.resolve(&ty, &[]).unwrap(), Value::from(instance));
    }

    #[test]
    fn direct_instance_on_contract_skips_conformance() {
        let registry = Registry::new();
        let c = Value::from(ContractShape::new().with_method("foo", ["bar"]).into_contract());
        registry.set_instance(&c, "direct").unwrap();

        assert_eq!(registry.resolve(&c, &[]).unwrap(), Value::from("direct"));
    }

    #[test]
    fn factory_may_resolve_through_the_registry() {
        let registry = std::sync::Arc::new(Registry::new());
        let (inner, inner_ty) = (contract(), marker());
        registry.associate(&inner, &inner_ty).unwrap();
        registry.set_instance(&inner_ty, 20).unwrap();

        let (outer, outer_ty) = (contract(), marker());
        let nested = std::sync::Arc::clone(&registry);
        let inner_key = inner.clone();
        registry.associate(&outer, &outer_ty).unwrap();
        registry
            .set_factory(
                &outer_ty,
                &factory(&[], move |_| {
                    let base = nested
                        .resolve(&inner_key, &[])
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or_default();
                    Value::from(base + 1.0)
                }),
            )
            .unwrap();

        assert_eq!(registry.resolve(&outer, &[]).unwrap(), Value::from(21));
    }

    // -----------------------------------------------------------------------
    // optional resolution
    // -----------------------------------------------------------------------

    #[test]
    fn optional_unknown_contract_is_none() {
        let registry = Registry::new();
        assert_eq!(registry.resolve_optional(&contract(), &[]).unwrap(), None);
    }

    #[test]
    fn optional_contract_without_instance_is_none() {
        let registry = Registry::new();
        let c = contract();
        registry.associate(&c, &marker()).unwrap();

        let value = registry.resolve_with(&c, ResolveMode::Optional, &[]).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn optional_still_fails_on_ambiguity() {
        let registry = Registry::new();
        let (c, a, b) = (contract(), marker(), marker());
        registry.associate(&c, &a).unwrap();
        registry.associate(&c, &b).unwrap();
        registry.set_instance(&a, 1).unwrap();
        registry.set_instance(&b, 2).unwrap();

        let err = registry.resolve_optional(&c, &[]).unwrap_err();
        assert!(matches!(err, RegistryError::Ambiguous { .. }));
    }

    #[test]
    fn optional_still_fails_on_non_object() {
        let registry = Registry::new();
        let err = registry.resolve_optional(&Value::Null, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn optional_still_fails_on_nonconforming_instance() {
        let registry = Registry::new();
        let c = Value::from(ContractShape::new().with_method("foo", ["bar"]).into_contract());
        let ty = marker();
        registry.associate(&c, &ty).unwrap();
        registry.set_instance(&ty, Object::new()).unwrap();

        let err = registry.resolve_optional(&c, &[]).unwrap_err();
        assert!(matches!(err, RegistryError::NotImplemented { .. }));
    }

    #[test]
    fn required_mode_matches_resolve() {
        let registry = Registry::new();
        let (c, ty) = (contract(), marker());
        registry.associate(&c, &ty).unwrap();
        registry.set_instance(&ty, "x").unwrap();

        let value = registry.resolve_with(&c, ResolveMode::Required, &[]).unwrap();
        assert_eq!(value, Some(Value::from("x")));
        assert_eq!(ResolveMode::default(), ResolveMode::Required);
    }

    // -----------------------------------------------------------------------
    // unassociate
    // -----------------------------------------------------------------------

    #[test]
    fn unassociate_removes_instance() {
        let registry = Registry::new();
        let ty = marker();
        registry.set_instance(&ty, Object::new()).unwrap();

        registry.unassociate(&ty).unwrap();

        assert!(registry.resolve(&ty, &[]).is_err());
        assert_eq!(registry.binding_kind(&ty).unwrap(), None);
    }

    #[test]
    fn unassociate_rejects_null() {
        let registry = Registry::new();
        let err = registry.unassociate(&Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "argument must be object");
    }

    #[test]
    fn unassociate_rejects_string() {
        let registry = Registry::new();
        let err = registry.unassociate(&Value::from("some-foo")).unwrap_err();
        assert_eq!(err, RegistryError::NotObject { role: Role::Argument });
    }

    #[test]
    fn unassociate_unknown_object_fails() {
        let registry = Registry::new();
        let err = registry.unassociate(&contract()).unwrap_err();
        assert_eq!(err.to_string(), "given object was not associated");
    }

    #[test]
    fn unassociate_allows_rebinding() {
        let registry = Registry::new();
        let (c, ty) = (contract(), marker());
        registry.associate(&c, &ty).unwrap();
        registry.set_instance(&ty, "old").unwrap();

        registry.unassociate(&ty).unwrap();
        registry.set_factory(&ty, &factory(&[], |_| Value::from("new"))).unwrap();

        assert_eq!(registry.resolve(&c, &[]).unwrap(), Value::from("new"));
    }

    #[test]
    fn unassociate_keeps_memberships_by_default() {
        let registry = Registry::new();
        let (c, ty) = (contract(), marker());
        registry.associate(&c, &ty).unwrap();
        registry.set_instance(&ty, "x").unwrap();

        registry.unassociate(&ty).unwrap();

        assert!(registry.is_associated(&c, &ty).unwrap());
        let err = registry.resolve(&c, &[]).unwrap_err();
        assert!(matches!(err, RegistryError::NoCandidates { .. }));
    }

    #[test]
    fn cascade_unassociate_leaves_contracts() {
        let config = RegistryConfig {
            unassociate: UnassociatePolicy::Cascade,
            ..Default::default()
        };
        let registry = Registry::with_config(config);
        let (a, b, ty) = (contract(), contract(), marker());
        registry.associate(&a, &ty).unwrap();
        registry.associate(&b, &ty).unwrap();
        registry.set_instance(&ty, "x").unwrap();

        registry.unassociate(&ty).unwrap();

        assert!(!registry.is_associated(&a, &ty).unwrap());
        assert!(!registry.is_associated(&b, &ty).unwrap());
        assert!(registry.types_for(&a).unwrap().is_empty());
        let err = registry.resolve(&a, &[]).unwrap_err();
        assert!(matches!(err, RegistryError::NoCandidates { .. }));
    }

    // -----------------------------------------------------------------------
    // introspection and lifetime
    // -----------------------------------------------------------------------

    #[test]
    fn types_for_preserves_order() {
        let registry = Registry::new();
        let (c, a, b) = (contract(), marker(), marker());
        registry.associate(&c, &a).unwrap();
        registry.associate(&c, &b).unwrap();

        let ids: Vec<_> = registry.types_for(&c).unwrap().iter().map(Handle::id).collect();
        let expected: Vec<_> = [&a, &b]
            .iter()
            .filter_map(|v| v.as_handle())
            .map(|h| h.id())
            .collect();
        assert_eq!(ids, expected);
        assert!(registry.types_for(&contract()).unwrap().is_empty());
    }

    #[test]
    fn resolution_records_visited_objects() {
        let registry = Registry::new();
        let (c, ty) = (contract(), marker());
        registry.associate(&c, &ty).unwrap();
        let _ = registry.resolve(&c, &[]);

        assert!(registry.unassociate(&ty).is_ok());
        assert!(registry.unassociate(&c).is_ok());
    }

    #[test]
    fn optional_resolution_records_target() {
        let registry = Registry::new();
        let c = contract();
        assert_eq!(registry.resolve_optional(&c, &[]).unwrap(), None);

        assert_eq!(registry.record_count(), 1);
        assert!(registry.unassociate(&c).is_ok());
    }

    #[test]
    fn sweep_forgets_dropped_types() {
        let registry = Registry::with_config(RegistryConfig {
            sweep_interval: 0,
            ..Default::default()
        });
        {
            let ty = marker();
            registry.set_instance(&ty, "temporary").unwrap();
        }
        let kept = marker();
        registry.set_instance(&kept, "kept").unwrap();

        assert_eq!(registry.record_count(), 2);
        assert_eq!(registry.sweep(), 1);
        assert_eq!(registry.record_count(), 1);
        assert_eq!(registry.resolve(&kept, &[]).unwrap(), Value::from("kept"));
    }

    #[test]
    fn registries_are_isolated() {
        let first = Registry::new();
        let second = Registry::new();
        let ty = marker();
        first.set_instance(&ty, "one").unwrap();

        assert!(second.resolve(&ty, &[]).is_err());
        assert!(second.set_instance(&ty, "two").is_ok());
        assert_eq!(first.resolve(&ty, &[]).unwrap(), Value::from("one"));
    }
}
