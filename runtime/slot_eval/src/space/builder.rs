//! `ObjectSpaceBuilder` for creating object spaces with non-default policy.

use slot_ir::SharedInterner;

use super::ObjectSpace;
use crate::config::SpaceConfig;

/// Builder for [`ObjectSpace`].
///
/// ```text
/// let space = ObjectSpace::builder()
///     .resolution_cache(false)
///     .max_call_depth(Some(64))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ObjectSpaceBuilder {
    config: SpaceConfig,
    interner: Option<SharedInterner>,
}

impl ObjectSpaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the resolution cache.
    #[must_use]
    pub fn resolution_cache(mut self, enabled: bool) -> Self {
        self.config.resolution_cache = enabled;
        self
    }

    /// Set the dispatch depth limit. `None` removes it.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.config.max_call_depth = depth;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: SpaceConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing interner, so names agree with another space.
    #[must_use]
    pub fn interner(mut self, interner: SharedInterner) -> Self {
        self.interner = Some(interner);
        self
    }

    pub fn build(self) -> ObjectSpace {
        tracing::debug!(
            resolution_cache = self.config.resolution_cache,
            max_call_depth = ?self.config.max_call_depth,
            "building object space"
        );
        ObjectSpace::from_parts(self.interner.unwrap_or_default(), self.config)
    }
}
