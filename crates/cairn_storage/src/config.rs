//! Store configuration.

/// Flags governing how a store saves and loads built-in things.
///
/// Terrain and special things are recreated by startup registration, so by
/// default they are neither written to save data nor read back from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Write terrain/special things and their components when saving.
    ///
    /// Such records are always ignored on load; this only makes them visible
    /// in the saved data.
    pub persist_builtin: bool,

    /// Carry terrain/special things and their components over from the
    /// pre-load store when loading.
    pub restore_builtin: bool,

    /// Reject a saved thing whose component mask disagrees with the loaded
    /// tables. When off, masks are recomputed from the tables.
    pub verify_masks: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persist_builtin: false,
            restore_builtin: true,
            verify_masks: true,
        }
    }
}

impl StoreConfig {
    /// Configuration that also writes built-in things, for inspecting
    /// saved data.
    #[must_use]
    pub fn inspection() -> Self {
        Self {
            persist_builtin: true,
            ..Self::default()
        }
    }

    /// Configuration that repairs inconsistent masks instead of failing.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            verify_masks: false,
            ..Self::default()
        }
    }

    /// Builder method to set `persist_builtin`.
    #[must_use]
    pub fn with_persist_builtin(mut self, persist: bool) -> Self {
        self.persist_builtin = persist;
        self
    }

    /// Builder method to set `restore_builtin`.
    #[must_use]
    pub fn with_restore_builtin(mut self, restore: bool) -> Self {
        self.restore_builtin = restore;
        self
    }

    /// Builder method to set `verify_masks`.
    #[must_use]
    pub fn with_verify_masks(mut self, verify: bool) -> Self {
        self.verify_masks = verify;
        self
    }
}
