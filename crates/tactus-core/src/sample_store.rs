//! Owned per-bus sample storage for real-time safe rendering.
//!
//! A [`SampleStore`] owns the contiguous channel buffers behind one bus.
//! Storage is sized once for a maximum frame capacity during setup and then
//! reused for every render call.
//!
//! # Real-Time Safety
//!
//! - `allocate()` and `release()` run only in configuration context and are
//!   the sole operations that touch the heap.
//! - During rendering the store is written through [`BufferView`] windows or
//!   `channel_mut()` slices; no call on this type allocates on that path.
//! - Storage is never resized during rendering; changing capacity or channel
//!   count requires full reconfiguration.
//!
//! [`BufferView`]: crate::buffer_view::BufferView

use crate::config::StreamFormat;
use crate::error::{ConfigError, ConfigResult};
use crate::sample::Sample;

/// Owned channel sample storage for one bus.
///
/// Freshly allocated storage is silent (all zeros). A released store has
/// `capacity() == 0` and no channels.
#[derive(Debug, Default)]
pub struct SampleStore<S: Sample> {
    channels: Vec<Vec<S>>,
    capacity: u32,
}

impl<S: Sample> SampleStore<S> {
    /// Create an empty, unallocated store.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            capacity: 0,
        }
    }

    /// Reserve channel buffers for `format` sized to `max_frames` frames.
    ///
    /// Idempotent for repeated calls with identical parameters; otherwise
    /// existing storage is replaced. Runs only in configuration context.
    pub fn allocate(&mut self, format: &StreamFormat, max_frames: u32) -> ConfigResult<()> {
        if max_frames == 0 {
            return Err(ConfigError::ZeroFrameCapacity);
        }
        if format.channel_count == 0 {
            return Err(ConfigError::NoChannels);
        }
        if self.capacity == max_frames && self.channels.len() == format.channel_count {
            return Ok(());
        }

        log::debug!(
            "SampleStore::allocate: {} channels x {} frames",
            format.channel_count,
            max_frames
        );

        self.channels = (0..format.channel_count)
            .map(|_| vec![S::ZERO; max_frames as usize])
            .collect();
        self.capacity = max_frames;
        Ok(())
    }

    /// Free all storage. After this call `capacity()` is 0.
    ///
    /// Runs only in configuration context.
    pub fn release(&mut self) {
        self.channels = Vec::new();
        self.capacity = 0;
    }

    /// The configured maximum frame count (0 when unallocated).
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of allocated channels (0 when unallocated).
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Whether the store currently holds storage.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.capacity > 0
    }

    /// Borrow one channel's samples.
    ///
    /// Returns `None` if the channel index is out of bounds.
    #[inline]
    pub fn channel(&self, channel: usize) -> Option<&[S]> {
        self.channels.get(channel).map(|c| c.as_slice())
    }

    /// Mutably borrow one channel's samples.
    ///
    /// This is how an upstream pull function fills the store in place.
    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut [S]> {
        self.channels.get_mut(channel).map(|c| c.as_mut_slice())
    }

    /// Overwrite every channel with silence.
    pub fn fill_silence(&mut self) {
        for channel in &mut self.channels {
            channel.fill(S::ZERO);
        }
    }

    /// Raw base pointer of one channel, for view linking.
    ///
    /// Returns a null pointer if the channel does not exist. The pointer is
    /// valid until the store is released or reallocated.
    #[inline]
    pub(crate) fn channel_ptr(&mut self, channel: usize) -> *mut S {
        self.channels
            .get_mut(channel)
            .map(|c| c.as_mut_ptr())
            .unwrap_or(std::ptr::null_mut())
    }
}
