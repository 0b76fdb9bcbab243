//! Object space configuration.

/// Default dispatch depth limit.
///
/// Deep enough for long ancestor chains and chatty callables, shallow enough
/// that a callable resolving its own name fails quickly.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 512;

/// Dispatch policy for an `ObjectSpace`.
///
/// Set through `ObjectSpace::builder()`; `SpaceConfig::default()` is what
/// `ObjectSpace::new()` uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpaceConfig {
    /// Memoize per-(class, name) fallback decisions.
    ///
    /// When off, every own-slot miss walks the ancestor chain.
    pub resolution_cache: bool,
    /// Maximum number of nested callable invocations, or `None` for no
    /// limit (native stack growth only).
    pub max_call_depth: Option<usize>,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        SpaceConfig {
            resolution_cache: true,
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
        }
    }
}
