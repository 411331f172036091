// Path: crates/state/src/memory.rs
//! An ordered, in-memory state backend.

use agora_api::state::{StateAccess, StateScanIter};
use agora_types::error::StateError;
use std::collections::BTreeMap;
use std::ops::Bound::{Included, Unbounded};
use std::sync::Arc;

/// A `StateAccess` backed by a `BTreeMap`.
///
/// Iteration order is the byte order of keys, so prefix scans are
/// deterministic across runs and replicas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStateManager {
    data: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStateManager {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of stored keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates every stored pair in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.data.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

impl FromIterator<(Vec<u8>, Vec<u8>)> for MemoryStateManager {
    fn from_iter<I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl StateAccess for MemoryStateManager {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.data.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.data.remove(key);
        Ok(())
    }

    fn batch_apply(
        &mut self,
        inserts: &[(Vec<u8>, Vec<u8>)],
        deletes: &[Vec<u8>],
    ) -> Result<(), StateError> {
        log::trace!(
            "[MemoryState] applying batch: {} inserts, {} deletes",
            inserts.len(),
            deletes.len()
        );
        for key in deletes {
            self.data.remove(key);
        }
        for (key, value) in inserts {
            self.data.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let owned_prefix = prefix.to_vec();
        let iter = self
            .data
            .range::<Vec<u8>, _>((Included(&owned_prefix), Unbounded))
            .take_while(move |(k, _)| k.starts_with(&owned_prefix))
            .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice()))));
        Ok(Box::new(iter))
    }
}
