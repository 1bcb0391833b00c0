//! Per-document cache of parsed trees.
//!
//! An entry is reused only when the version and the text both match and the
//! entry is younger than the TTL. Anything else replaces the entry wholesale.
//! After every insert the oldest-written entries are evicted until the cache
//! fits `max_size`.

use crate::adapter::ParserAdapter;
use crate::error::ParseFailure;
use crate::tree::SyntaxTree;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default number of cached documents.
pub const DEFAULT_MAX_SIZE: usize = 64;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Stable key of a document, typically its URI or path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(SmolStr);

impl DocumentId {
    /// Creates an id.
    #[must_use]
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// The id as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cache limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries.
    pub max_size: usize,
    /// Entries older than this are treated as misses.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            ttl: DEFAULT_TTL,
        }
    }
}

/// Source of timestamps for entry ages.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug)]
struct CacheEntry {
    version: i32,
    tree: Arc<SyntaxTree>,
    written_at: Instant,
    /// Insertion sequence number; orders entries written within the same instant.
    write_seq: u64,
}

enum Lookup {
    Hit(Arc<SyntaxTree>),
    Changed(Arc<SyntaxTree>),
    Miss,
}

/// Maps document ids to their most recent tree.
#[derive(Debug)]
pub struct DocumentCache<C: Clock = SystemClock> {
    adapter: ParserAdapter,
    entries: FxHashMap<DocumentId, CacheEntry>,
    config: CacheConfig,
    clock: C,
    next_seq: u64,
}

impl DocumentCache<SystemClock> {
    /// Creates a cache using wall-clock time.
    #[must_use]
    pub fn new(adapter: ParserAdapter, config: CacheConfig) -> Self {
        Self::with_clock(adapter, config, SystemClock)
    }
}

impl<C: Clock> DocumentCache<C> {
    /// Creates a cache with an explicit clock.
    #[must_use]
    pub fn with_clock(adapter: ParserAdapter, config: CacheConfig, clock: C) -> Self {
        Self {
            adapter,
            entries: FxHashMap::default(),
            config,
            clock,
            next_seq: 0,
        }
    }

    /// The adapter used for parsing.
    #[must_use]
    pub fn adapter(&self) -> &ParserAdapter {
        &self.adapter
    }

    /// Current limits.
    #[must_use]
    pub fn config(&self) -> CacheConfig {
        self.config
    }

    /// Number of cached documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an entry exists for `id`, fresh or not.
    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns the cached tree for `id` or parses `text` and caches the result.
    ///
    /// A hit returns the very same `Arc`. When an entry for `id` exists but its
    /// version or text differ, the new tree is parsed incrementally from it.
    pub fn get_or_parse(
        &mut self,
        id: &DocumentId,
        version: i32,
        text: &str,
    ) -> Result<Arc<SyntaxTree>, ParseFailure> {
        let now = self.clock.now();
        let lookup = match self.entries.get(id) {
            None => Lookup::Miss,
            Some(entry) if now.saturating_duration_since(entry.written_at) >= self.config.ttl => {
                Lookup::Miss
            }
            Some(entry) if entry.version == version && entry.tree.text() == text => {
                Lookup::Hit(Arc::clone(&entry.tree))
            }
            Some(entry) => Lookup::Changed(Arc::clone(&entry.tree)),
        };

        let tree = match lookup {
            Lookup::Hit(tree) => {
                debug!(document = %id, version, "cache hit");
                return Ok(tree);
            }
            Lookup::Changed(previous) => {
                debug!(document = %id, version, "cache entry outdated");
                self.adapter.parse_incremental(text, &previous)?
            }
            Lookup::Miss => {
                if self.entries.remove(id).is_some() {
                    debug!(document = %id, "cache entry expired");
                } else {
                    debug!(document = %id, version, "cache miss");
                }
                self.adapter.parse(text)?
            }
        };

        let tree = Arc::new(tree);
        let write_seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            id.clone(),
            CacheEntry {
                version,
                tree: Arc::clone(&tree),
                written_at: now,
                write_seq,
            },
        );
        self.evict_overflow();
        Ok(tree)
    }

    /// The cached tree for `id` if it is fresh and was parsed from `text`.
    ///
    /// Never parses and never modifies the cache.
    #[must_use]
    pub fn peek(&self, id: &DocumentId, text: &str) -> Option<Arc<SyntaxTree>> {
        let entry = self.entries.get(id)?;
        let age = self.clock.now().saturating_duration_since(entry.written_at);
        (age < self.config.ttl && entry.tree.text() == text).then(|| Arc::clone(&entry.tree))
    }

    /// Removes the entry for `id`, if any.
    pub fn invalidate(&mut self, id: &DocumentId) {
        if self.entries.remove(id).is_some() {
            debug!(document = %id, "cache entry invalidated");
        }
    }

    /// Removes every entry.
    pub fn invalidate_all(&mut self) {
        debug!(entries = self.entries.len(), "cache cleared");
        self.entries.clear();
    }

    /// Changes the size limit, evicting immediately when it shrinks.
    pub fn set_max_size(&mut self, max_size: usize) {
        self.config.max_size = max_size;
        self.evict_overflow();
    }

    /// Changes the entry lifetime. Existing entries are judged by the new value.
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.config.ttl = ttl;
    }

    /// Replaces both limits.
    pub fn set_config(&mut self, config: CacheConfig) {
        self.set_ttl(config.ttl);
        self.set_max_size(config.max_size);
    }

    fn evict_overflow(&mut self) {
        if self.entries.len() <= self.config.max_size {
            return;
        }

        let mut candidates: Vec<(u64, DocumentId)> = self
            .entries
            .iter()
            .map(|(id, entry)| (entry.write_seq, id.clone()))
            .collect();
        candidates.sort_by_key(|(seq, _)| *seq);

        let excess = self.entries.len() - self.config.max_size;
        for (_, id) in candidates.into_iter().take(excess) {
            self.entries.remove(&id);
            debug!(document = %id, "cache entry evicted");
        }
    }
}
