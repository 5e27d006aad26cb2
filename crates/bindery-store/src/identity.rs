//! `HashMap`-backed record store with weakly held subjects.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bindery_types::{Handle, ObjectId, WeakHandle};
use tracing::debug;

use crate::record::Record;
use crate::traits::RecordStore;

/// Record creations between automatic sweeps.
pub const DEFAULT_SWEEP_INTERVAL: usize = 64;

#[derive(Debug)]
struct Entry {
    subject: WeakHandle,
    record: Record,
}

#[derive(Debug, Default)]
struct Table {
    entries: HashMap<ObjectId, Entry>,
    created_since_sweep: usize,
}

impl Table {
    fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.subject.is_alive());
        self.created_since_sweep = 0;
        before - self.entries.len()
    }
}

/// In-memory, `HashMap`-based [`RecordStore`].
///
/// Subjects are held through [`WeakHandle`]s, so attaching a record never
/// extends an object's lifetime. Records of dropped subjects are removed by
/// [`sweep`](RecordStore::sweep), which also runs automatically after every
/// `sweep_interval` record creations.
///
/// A poisoned lock is recovered rather than propagated: every operation
/// leaves the table consistent before it can call user code.
pub struct IdentityStore {
    table: RwLock<Table>,
    sweep_interval: usize,
}

impl IdentityStore {
    /// Create an empty store with the default sweep interval.
    pub fn new() -> Self {
        Self::with_sweep_interval(DEFAULT_SWEEP_INTERVAL)
    }

    /// Create an empty store that sweeps after `interval` record creations.
    /// An interval of `0` disables automatic sweeping.
    pub fn with_sweep_interval(interval: usize) -> Self {
        Self {
            table: RwLock::new(Table::default()),
            sweep_interval: interval,
        }
    }

    /// The configured automatic sweep interval.
    pub fn sweep_interval(&self) -> usize {
        self.sweep_interval
    }

    fn read_table(&self) -> RwLockReadGuard<'_, Table> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> RwLockWriteGuard<'_, Table> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for IdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for IdentityStore {
    fn update<R>(&self, subject: &Handle, f: impl FnOnce(&mut Record) -> R) -> R {
        let mut guard = self.write_table();
        let table = &mut *guard;
        let id = subject.id();
        if !table.entries.contains_key(&id) {
            if self.sweep_interval > 0 && table.created_since_sweep >= self.sweep_interval {
                let removed = table.sweep();
                if removed > 0 {
                    debug!(removed, "swept records of dropped objects");
                }
            }
            table.created_since_sweep += 1;
            debug!(id = %id, "record created");
        }
        let entry = table.entries.entry(id).or_insert_with(|| Entry {
            subject: subject.downgrade(),
            record: Record::new(),
        });
        f(&mut entry.record)
    }

    fn update_existing<R>(
        &self,
        subject: &Handle,
        f: impl FnOnce(&mut Record) -> R,
    ) -> Option<R> {
        let mut table = self.write_table();
        table
            .entries
            .get_mut(&subject.id())
            .map(|entry| f(&mut entry.record))
    }

    fn read<R>(&self, subject: &Handle, f: impl FnOnce(Option<&Record>) -> R) -> R {
        let table = self.read_table();
        f(table.entries.get(&subject.id()).map(|entry| &entry.record))
    }

    fn detach_everywhere(&self, ty: &Handle) -> usize {
        let mut table = self.write_table();
        table
            .entries
            .values_mut()
            .map(|entry| entry.record.remove_type(ty))
            .filter(|changed| *changed)
            .count()
    }

    fn contains(&self, id: ObjectId) -> bool {
        self.read_table().entries.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.read_table().entries.len()
    }

    fn sweep(&self) -> usize {
        let removed = self.write_table().sweep();
        if removed > 0 {
            debug!(removed, "swept records of dropped objects");
        }
        removed
    }
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore")
            .field("record_count", &self.len())
            .field("sweep_interval", &self.sweep_interval)
            .finish()
    }
}
