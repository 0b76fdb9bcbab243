//! Resolution cache.
//!
//! Memoizes, per `(class, name)`, which strategy answered a resolution: a
//! fallback defined by some class in the chain, a miss, or (until one of
//! those is known) the instance's own slot. Only the fallback decision is ever served from the
//! cache; own slots are checked live on every call, because two instances
//! of one class can hold different slots.
//!
//! # Invalidation
//!
//! Entries are valid for one registry epoch. Registering a class or adding
//! a fallback bumps the epoch, and the first access with a newer epoch
//! drops every entry.
//!
//! # Concurrency
//!
//! Population is double-checked: a read-locked fast path, then a
//! write-locked slow path that re-checks before probing.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use slot_ir::Name;
use slot_object::{ClassId, ObjResult};

/// Cache key: the class the lookup started from and the requested name.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct ResolutionKey {
    pub class: ClassId,
    pub name: Name,
}

impl ResolutionKey {
    #[inline]
    pub const fn new(class: ClassId, name: Name) -> Self {
        Self { class, name }
    }
}

/// How a name was last resolved for a class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// An instance's own slot answered.
    OwnSlot,
    /// The fallback defined by `defined_in` answered.
    Fallback { defined_in: ClassId },
    /// Nothing in the chain defines the name.
    Miss,
}

impl Strategy {
    /// Whether this entry settles the fallback decision.
    #[inline]
    fn decides_fallback(self) -> bool {
        !matches!(self, Strategy::OwnSlot)
    }
}

/// Counters for cache behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Fallback decisions served from the cache.
    pub hits: u64,
    /// Fallback decisions that walked the chain.
    pub probes: u64,
    /// Times a stale epoch cleared the cache.
    pub invalidations: u64,
}

struct CacheState {
    epoch: u64,
    entries: FxHashMap<ResolutionKey, Strategy>,
}

impl CacheState {
    /// Drop entries from an older epoch. Returns whether anything was reset.
    fn sync_epoch(&mut self, epoch: u64) -> bool {
        if self.epoch == epoch {
            return false;
        }
        self.epoch = epoch;
        self.entries.clear();
        true
    }
}

/// Shared per-(class, name) strategy memo.
pub struct ResolutionCache {
    state: RwLock<CacheState>,
    hits: AtomicU64,
    probes: AtomicU64,
    invalidations: AtomicU64,
}

impl ResolutionCache {
    pub fn new() -> Self {
        ResolutionCache {
            state: RwLock::new(CacheState {
                epoch: 0,
                entries: FxHashMap::default(),
            }),
            hits: AtomicU64::new(0),
            probes: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// The cached strategy for `key`, if recorded in `epoch`.
    pub fn get(&self, key: ResolutionKey, epoch: u64) -> Option<Strategy> {
        let state = self.state.read();
        if state.epoch != epoch {
            return None;
        }
        state.entries.get(&key).copied()
    }

    /// Return the cached fallback decision for `key`, or run `probe` and
    /// record its answer.
    ///
    /// `probe` runs under the cache's write lock and must not re-enter the
    /// cache.
    pub fn fallback_or_probe<F>(&self, key: ResolutionKey, epoch: u64, probe: F) -> ObjResult<Strategy>
    where
        F: FnOnce() -> ObjResult<Strategy>,
    {
        // Fast path: read lock only
        if let Some(strategy) = self.get(key, epoch).filter(|s| s.decides_fallback()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(strategy);
        }

        let mut state = self.state.write();
        if state.sync_epoch(epoch) {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(epoch, "resolution cache invalidated");
        }

        // Double-check after acquiring write lock
        if let Some(&strategy) = state.entries.get(&key) {
            if strategy.decides_fallback() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(strategy);
            }
        }

        let strategy = probe()?;
        self.probes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(?key, ?strategy, "resolution cache populated");
        state.entries.insert(key, strategy);
        Ok(strategy)
    }

    /// Record that an own slot answered for `key`.
    ///
    /// Only fills a vacant entry. A fallback decision already recorded for
    /// the class still holds for instances without the slot, so it is kept.
    pub fn record_own_slot(&self, key: ResolutionKey, epoch: u64) {
        if self.get(key, epoch).is_some() {
            return;
        }
        let mut state = self.state.write();
        if state.sync_epoch(epoch) {
            self.invalidations.fetch_add(1, Ordering::Relaxed);
        }
        state.entries.entry(key).or_insert(Strategy::OwnSlot);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }

    /// Number of entries, whatever their epoch.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("entries", &self.len())
            .field("stats", &self.stats())
            .finish()
    }
}
