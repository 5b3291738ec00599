//! Error and status types for the render core.
//!
//! The core distinguishes two execution contexts with different error
//! propagation rules:
//!
//! - **Render context** (the audio thread) reports failures as plain
//!   [`RenderStatus`] values. Nothing on this path panics, allocates, or
//!   unwinds.
//! - **Configuration context** (the control thread) uses ordinary
//!   `Result<_, ConfigError>` returns and may allocate freely.

/// Status returned from render-context entry points.
///
/// Render errors are terminal for the call that reports them: no partial
/// output is produced. There is no retry anywhere in the core; retries, if
/// desired, belong to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    /// The render call completed and produced `frame_count` frames.
    Ok,
    /// The requested frame count exceeds the configured capacity.
    /// No output was produced.
    TooManyFrames,
    /// The upstream pull function failed with the contained host status
    /// code. The failure aborted the call before any frame was rendered.
    Upstream(i32),
}

impl RenderStatus {
    /// Whether this status represents success.
    #[inline]
    pub fn is_ok(self) -> bool {
        matches!(self, RenderStatus::Ok)
    }
}

/// Errors raised by configuration-context entry points.
///
/// None of these are recoverable without reconfiguration: the engine stays
/// in its previous configuration when a call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A maximum frame count of zero was requested.
    ZeroFrameCapacity,
    /// The stream format declares zero channels.
    NoChannels,
    /// The stream format declares more channels than [`MAX_CHANNELS`].
    ///
    /// [`MAX_CHANNELS`]: crate::config::MAX_CHANNELS
    TooManyChannels(usize),
    /// A bus count of zero was requested.
    NoBuses,
    /// More buses were requested than [`MAX_BUSES`].
    ///
    /// [`MAX_BUSES`]: crate::config::MAX_BUSES
    TooManyBuses(usize),
    /// The requested channel count is inconsistent with a view that is
    /// still linked to the storage being reconfigured.
    ChannelCountMismatch {
        /// Channel count of the linked view.
        expected: usize,
        /// Channel count requested by the new format.
        actual: usize,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroFrameCapacity => write!(f, "maximum frame count must be non-zero"),
            Self::NoChannels => write!(f, "stream format declares zero channels"),
            Self::TooManyChannels(n) => {
                write!(f, "stream format declares {n} channels, exceeding the limit")
            }
            Self::NoBuses => write!(f, "bus count must be non-zero"),
            Self::TooManyBuses(n) => write!(f, "{n} buses requested, exceeding the limit"),
            Self::ChannelCountMismatch { expected, actual } => write!(
                f,
                "channel count {actual} is inconsistent with a linked view of {expected} channels"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type for configuration-context operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
