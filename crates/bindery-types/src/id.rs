use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of an object-like value.
///
/// Every [`Object`](crate::Object) and [`Function`](crate::Function) is given
/// a fresh `ObjectId` when it is created. Ids are allocated from a
/// process-wide counter and never reused, so an id outliving its object can
/// never alias a newer one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Allocate the next unused id.
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Short hex representation, as used in log fields.
    pub fn short_hex(&self) -> String {
        format!("{:08x}", self.0)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj:{}", self.short_hex())
    }
}
