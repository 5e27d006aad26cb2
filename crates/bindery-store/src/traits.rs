//! The [`RecordStore`] trait defining the record storage interface.

use bindery_types::{Handle, ObjectId};

use crate::record::Record;

/// Side table of [`Record`]s keyed by object identity.
///
/// All implementations must satisfy these invariants:
/// - At most one record exists per [`ObjectId`].
/// - Records are created only by [`update`](Self::update); reads never
///   allocate.
/// - A record must not keep its subject alive. Values stored *inside* a
///   record are owned by the record, so a bound instance (or a factory
///   closure) that holds its own subject keeps that subject, and its
///   record, alive until the binding is cleared.
/// - Callbacks run while the store is locked and must not call back into
///   the store.
pub trait RecordStore: Send + Sync {
    /// Run `f` on the record for `subject`, creating an empty one first if
    /// none exists.
    fn update<R>(&self, subject: &Handle, f: impl FnOnce(&mut Record) -> R) -> R;

    /// Run `f` on the record for `subject` if one exists.
    ///
    /// Returns `None` without calling `f` if the subject has no record.
    fn update_existing<R>(&self, subject: &Handle, f: impl FnOnce(&mut Record) -> R)
        -> Option<R>;

    /// Run `f` with the record for `subject`, or `None` if there is none.
    fn read<R>(&self, subject: &Handle, f: impl FnOnce(Option<&Record>) -> R) -> R;

    /// Remove `ty` from the associated types of every record. Returns the
    /// number of records that changed.
    fn detach_everywhere(&self, ty: &Handle) -> usize;

    /// Check whether a record exists for `id`.
    fn contains(&self, id: ObjectId) -> bool;

    /// Number of records currently held, including ones whose subject has
    /// been dropped but not yet swept.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop records whose subject no longer exists. Returns the number of
    /// records removed.
    fn sweep(&self) -> usize;
}
