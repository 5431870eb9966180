use std::sync::{PoisonError, RwLock};

use indexmap::IndexSet;
use tabula_range::{Range1D, RangeError};

use crate::error::{TableError, UnresolvedIdentifier};

/// A bidirectional mapping between row names and dense system ids.
///
/// The id of a name is its insertion position. Names are only ever appended, so an id
/// never changes once handed out and registering a known name returns its existing id.
#[derive(Debug)]
pub struct IdType {
    id: String,
    names: RwLock<IndexSet<String>>,
}

impl IdType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            names: RwLock::new(IndexSet::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.names.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Register names and return their ids, in input order
    pub fn register<I, S>(&self, names: I) -> Vec<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = self.names.write().unwrap_or_else(PoisonError::into_inner);
        let before = set.len();
        let ids: Vec<usize> = names
            .into_iter()
            .map(|name| match set.get_index_of(name.as_ref()) {
                Some(id) => id,
                None => set.insert_full(name.as_ref().to_string()).0,
            })
            .collect();
        log::debug!(
            "registered {} new names with id type `{}`",
            set.len() - before,
            self.id
        );
        ids
    }

    /// Look up the id of each name, with a separate outcome per name
    pub fn map<S: AsRef<str>>(&self, names: &[S]) -> Vec<Result<usize, UnresolvedIdentifier>> {
        let set = self.names.read().unwrap_or_else(PoisonError::into_inner);
        let ids: Vec<_> = names
            .iter()
            .map(|name| {
                set.get_index_of(name.as_ref())
                    .ok_or_else(|| UnresolvedIdentifier(name.as_ref().to_string()))
            })
            .collect();
        let misses = ids.iter().filter(|id| id.is_err()).count();
        if misses > 0 {
            log::warn!(
                "{misses} of {} names are not registered with id type `{}`",
                names.len(),
                self.id
            );
        }
        ids
    }

    /// Look up the id of each name, failing on the first unknown one
    pub fn map_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>, TableError> {
        self.map(names)
            .into_iter()
            .map(|id| id.map_err(TableError::from))
            .collect()
    }

    /// Names of the selected ids
    pub fn unmap(&self, ids: &Range1D) -> Result<Vec<String>, RangeError> {
        let set = self.names.read().unwrap_or_else(PoisonError::into_inner);
        ids.iter(set.len())?
            .map(|id| {
                set.get_index(id).cloned().ok_or(RangeError::OutOfRange {
                    index: id,
                    size: set.len(),
                })
            })
            .collect()
    }

    pub fn name(&self, id: usize) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get_index(id)
            .cloned()
    }
}
