//! Allocator statistics.
//!
//! The agent binary runs on jemalloc and these figures come from its
//! `stats.*` controls. jemalloc caches them per epoch, so the epoch is
//! advanced before every read.

use metrix_core::error::{MetrixError, Result};

/// Point-in-time allocator figures, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Allocated by the application.
    pub allocated: usize,
    /// In active pages.
    pub active: usize,
    /// In physically resident data pages.
    pub resident: usize,
    /// In extents mapped by the allocator.
    pub mapped: usize,
    /// Allocator metadata.
    pub metadata: usize,
    /// Kept mapped instead of being returned to the OS.
    pub retained: usize,
}

impl AllocStats {
    #[cfg(not(target_env = "msvc"))]
    pub fn read() -> Result<Self> {
        use tikv_jemalloc_ctl::{epoch, stats};

        let ctl = |e: tikv_jemalloc_ctl::Error| MetrixError::Internal(format!("jemalloc stats: {e}"));
        epoch::advance().map_err(ctl)?;
        Ok(Self {
            allocated: stats::allocated::read().map_err(ctl)?,
            active: stats::active::read().map_err(ctl)?,
            resident: stats::resident::read().map_err(ctl)?,
            mapped: stats::mapped::read().map_err(ctl)?,
            metadata: stats::metadata::read().map_err(ctl)?,
            retained: stats::retained::read().map_err(ctl)?,
        })
    }

    #[cfg(target_env = "msvc")]
    pub fn read() -> Result<Self> {
        Err(MetrixError::Internal("allocator statistics need jemalloc".into()))
    }

    /// Address space obtained from the OS, released or not.
    pub fn obtained(&self) -> usize {
        self.mapped.saturating_add(self.retained)
    }
}
