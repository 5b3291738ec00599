//! Engine configuration types.
//!
//! Configuration is a control-thread concern: these types are built,
//! validated, and (de)serialized outside the render path, then handed to
//! [`RenderEngine::configure`] while the audio engine is stopped.
//!
//! [`RenderEngine::configure`]: crate::engine::RenderEngine::configure

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Maximum number of buses an engine will accept.
pub const MAX_BUSES: usize = 16;

/// Maximum number of channels per bus an engine will accept.
pub const MAX_CHANNELS: usize = 32;

/// Channel and rate description shared by every bus of an engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StreamFormat {
    /// Number of channels per bus.
    pub channel_count: usize,
    /// Sample rate in Hz.
    pub sample_rate: f64,
}

impl StreamFormat {
    /// Create a new stream format.
    pub const fn new(channel_count: usize, sample_rate: f64) -> Self {
        Self {
            channel_count,
            sample_rate,
        }
    }

    /// Single-channel format at the given rate.
    pub const fn mono(sample_rate: f64) -> Self {
        Self::new(1, sample_rate)
    }

    /// Two-channel format at the given rate.
    pub const fn stereo(sample_rate: f64) -> Self {
        Self::new(2, sample_rate)
    }

    /// Validate channel count against system limits.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.channel_count == 0 {
            return Err(ConfigError::NoChannels);
        }
        if self.channel_count > MAX_CHANNELS {
            return Err(ConfigError::TooManyChannels(self.channel_count));
        }
        Ok(())
    }
}

impl Default for StreamFormat {
    /// Stereo at 44.1 kHz.
    fn default() -> Self {
        Self::stereo(44_100.0)
    }
}

/// Full engine configuration.
///
/// Bundles the three values [`RenderEngine::configure`] takes so a host can
/// persist and restore its audio setup as JSON.
///
/// [`RenderEngine::configure`]: crate::engine::RenderEngine::configure
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of buses to allocate.
    pub bus_count: usize,
    /// Stream format shared by all buses.
    pub format: StreamFormat,
    /// Maximum number of frames a single render call may request.
    pub max_frames: u32,
}

impl EngineConfig {
    /// Create a new engine configuration.
    pub const fn new(bus_count: usize, format: StreamFormat, max_frames: u32) -> Self {
        Self {
            bus_count,
            format,
            max_frames,
        }
    }

    /// Validate the configuration against system limits.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.bus_count == 0 {
            return Err(ConfigError::NoBuses);
        }
        if self.bus_count > MAX_BUSES {
            return Err(ConfigError::TooManyBuses(self.bus_count));
        }
        self.format.validate()?;
        if self.max_frames == 0 {
            return Err(ConfigError::ZeroFrameCapacity);
        }
        Ok(())
    }

    /// Parse a configuration from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for EngineConfig {
    /// Single stereo bus at 44.1 kHz with a 4096-frame capacity.
    fn default() -> Self {
        Self::new(1, StreamFormat::default(), 4096)
    }
}
