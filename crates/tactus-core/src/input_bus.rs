//! Input-side buffer ownership and upstream acquisition.
//!
//! An [`InputBus`] pairs the owned storage for one upstream bus with the
//! facet the kernel reads through. In framework-pulled mode the engine asks
//! the bus to invoke the caller-supplied pull function, which fills the
//! store in place; a successful pull links the facet over the fresh
//! samples. A failed pull leaves the facet unlinked and the failure aborts
//! the render call.

use crate::buffer_view::BufferView;
use crate::config::StreamFormat;
use crate::error::{ConfigError, ConfigResult, RenderStatus};
use crate::event::RenderTimestamp;
use crate::sample::Sample;
use crate::sample_store::SampleStore;

/// Action flags accompanying an upstream pull.
///
/// Carried opaquely for the upstream renderer's benefit; the engine never
/// interprets or sets them.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderActionFlags(pub u32);

/// Upstream pull function supplied by the caller for one render call.
///
/// Fills the target store with `frame_count` frames for `bus` and returns a
/// status; any non-success status aborts the render call that issued the
/// pull. Invoked zero or one time per render call per bus.
pub type PullInputFn<'a, S> = dyn FnMut(
        &mut RenderActionFlags,
        &RenderTimestamp,
        u32,
        usize,
        &mut SampleStore<S>,
    ) -> RenderStatus
    + 'a;

/// Owned storage plus read facet for one upstream bus.
#[derive(Debug, Default)]
pub struct InputBus<S: Sample> {
    store: SampleStore<S>,
    facet: BufferView<S>,
}

impl<S: Sample> InputBus<S> {
    /// Create an empty, unallocated bus.
    pub fn new() -> Self {
        Self {
            store: SampleStore::new(),
            facet: BufferView::new(),
        }
    }

    /// Allocate storage for `format` sized to `max_frames` frames and size
    /// the facet to match.
    ///
    /// Fails with [`ConfigError::ChannelCountMismatch`] if the facet is
    /// still linked with a different channel count; callers release or
    /// unlink before changing formats.
    pub fn allocate(&mut self, format: &StreamFormat, max_frames: u32) -> ConfigResult<()> {
        if self.facet.is_linked() && self.facet.channel_count() != format.channel_count {
            return Err(ConfigError::ChannelCountMismatch {
                expected: self.facet.channel_count(),
                actual: format.channel_count,
            });
        }
        self.store.allocate(format, max_frames)?;
        self.facet.reserve_channels(format.channel_count);
        Ok(())
    }

    /// Unlink the facet and free the storage.
    pub fn release(&mut self) {
        self.facet.unlink();
        self.store.release();
    }

    /// Configured maximum frame count (0 when unallocated).
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.store.capacity()
    }

    /// Whether storage is currently allocated.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.store.is_allocated()
    }

    /// Invoke the upstream pull function over this bus's store.
    ///
    /// On success the facet is linked over the pulled samples, windowed to
    /// `frame_count`. On failure the facet is left unlinked and the status
    /// is returned for the caller to propagate.
    pub fn pull(
        &mut self,
        action_flags: &mut RenderActionFlags,
        timestamp: &RenderTimestamp,
        frame_count: u32,
        bus: usize,
        pull: &mut PullInputFn<'_, S>,
    ) -> RenderStatus {
        let status = pull(action_flags, timestamp, frame_count, bus, &mut self.store);
        if status.is_ok() {
            self.facet.link_store(&mut self.store);
            self.facet.set_frame_count(frame_count);
        } else {
            self.facet.unlink();
        }
        status
    }

    /// The read facet over this bus's samples.
    #[inline]
    pub fn facet(&self) -> &BufferView<S> {
        &self.facet
    }

    /// Mutable access to the read facet (for windowing).
    #[inline]
    pub fn facet_mut(&mut self) -> &mut BufferView<S> {
        &mut self.facet
    }

    /// The owned sample store.
    #[inline]
    pub fn store(&self) -> &SampleStore<S> {
        &self.store
    }

    /// Mutable access to the owned sample store.
    #[inline]
    pub fn store_mut(&mut self) -> &mut SampleStore<S> {
        &mut self.store
    }
}
