//! # Unused Id Pool

use std::collections::BTreeSet;

use crate::errors::CTResult;
use crate::types::{TokenType, empty_token};
use crate::utility::validators::try_vocab_size;

/// The set of ids a coder has not assigned yet.
///
/// The pool covers `[0, limit)`. Ids at or above `frontier` are all unused;
/// below it, only the `holes` are. Ids are usually taken smallest-first, so
/// `holes` stays small, and an unbounded pool (`limit = T::max_value()`)
/// never materializes its range.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdPool<T: TokenType> {
    limit: T,
    frontier: T,
    holes: BTreeSet<T>,
}

impl<T: TokenType> IdPool<T> {
    /// Create a pool over `[0, vocab_size)`.
    ///
    /// ## Arguments
    /// * `vocab_size` - The number of ids; must fit below the empty-token sentinel.
    pub fn bounded(vocab_size: usize) -> CTResult<Self> {
        let vocab_size = try_vocab_size::<T>(vocab_size)?;
        Ok(Self {
            limit: T::from_usize(vocab_size).unwrap_or_else(empty_token),
            frontier: T::zero(),
            holes: BTreeSet::new(),
        })
    }

    /// Create a pool over every id below the empty-token sentinel.
    pub fn unbounded() -> Self {
        Self {
            limit: empty_token(),
            frontier: T::zero(),
            holes: BTreeSet::new(),
        }
    }

    /// The exclusive upper bound of the pool.
    pub fn limit(&self) -> T {
        self.limit
    }

    /// The smallest unused id, if any remain.
    pub fn smallest(&self) -> Option<T> {
        match self.holes.first() {
            Some(&hole) => Some(hole),
            None if self.frontier < self.limit => Some(self.frontier),
            None => None,
        }
    }

    /// Is `id` unused?
    pub fn contains(
        &self,
        id: T,
    ) -> bool {
        if id < self.frontier {
            self.holes.contains(&id)
        } else {
            id < self.limit
        }
    }

    /// Remove `id` from the pool.
    ///
    /// ## Returns
    /// `true` if `id` was unused.
    pub fn take(
        &mut self,
        id: T,
    ) -> bool {
        if id < self.frontier {
            return self.holes.remove(&id);
        }
        if id >= self.limit {
            return false;
        }
        let mut skipped = self.frontier;
        while skipped < id {
            self.holes.insert(skipped);
            skipped = skipped + T::one();
        }
        self.frontier = id + T::one();
        true
    }

    /// Take the smallest unused id.
    pub fn take_smallest(&mut self) -> Option<T> {
        let id = self.smallest()?;
        self.take(id);
        Some(id)
    }

    /// The number of unused ids.
    pub fn len(&self) -> usize {
        let tail = (self.limit - self.frontier)
            .to_usize()
            .unwrap_or(usize::MAX);
        tail.saturating_add(self.holes.len())
    }

    /// Are all ids taken?
    pub fn is_empty(&self) -> bool {
        self.smallest().is_none()
    }

    /// Iterate over the unused ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let limit = self.limit;
        let tail = core::iter::successors(Some(self.frontier), move |&id| Some(id + T::one()))
            .take_while(move |&id| id < limit);
        self.holes.iter().copied().chain(tail)
    }
}
