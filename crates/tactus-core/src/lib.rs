//! # Tactus Core
//!
//! Sample-accurate render core for real-time DSP kernels.
//!
//! Tactus interleaves discrete control events (parameter changes, MIDI
//! messages) with block-based audio rendering so every event takes effect
//! on its exact sample, and supplies the zero-allocation buffer
//! infrastructure that makes this safe to run on a hard-real-time audio
//! callback thread.
//!
//! ## Architecture
//!
//! ```text
//! Your Kernel (implements Kernel trait)
//!        ↑ statically dispatched
//! RenderEngine<S, K>  — event-interleaved scheduler, bypass, capacity checks
//!        ↓
//! InputBus / SampleStore / BufferView — owned storage and facet windows
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tactus_core::{Kernel, OutputBufferList, RenderEngine, RenderTimestamp, StreamFormat};
//!
//! struct MyKernel { gain: f32 }
//!
//! impl Kernel<f32> for MyKernel {
//!     fn render_frames(&mut self, bus, input, output, frame_count) {
//!         // Your DSP here
//!     }
//!     fn handle_parameter_event(&mut self, event) { /* automation */ }
//!     fn handle_midi_event(&mut self, event) { /* MIDI */ }
//! }
//!
//! // Configuration context:
//! let mut engine = RenderEngine::new(MyKernel { gain: 1.0 });
//! engine.configure(1, StreamFormat::stereo(48_000.0), 4096)?;
//!
//! // Render context (audio thread), once per callback:
//! engine.process_and_render(&timestamp, frames, 0, &mut output, events, Some(&mut pull));
//! ```
//!
//! ## Real-Time Safety
//!
//! The render path never allocates, locks, or unwinds: all storage is
//! sized in [`RenderEngine::configure`], errors are [`RenderStatus`]
//! values, and the caller guarantees configuration calls never run
//! concurrently with a render call on the same engine.

pub mod buffer_view;
pub mod buffers;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod input_bus;
pub mod kernel;
pub mod sample;
pub mod sample_store;

pub use buffer_view::BufferView;
pub use buffers::OutputBufferList;
pub use config::{EngineConfig, StreamFormat, MAX_BUSES, MAX_CHANNELS};
pub use engine::RenderEngine;
pub use error::{ConfigError, ConfigResult, RenderStatus};
pub use event::{
    EventCursor, EventKind, MidiEvent, ParameterEvent, ParameterId, ParameterRamp, RenderEvent,
    RenderTimestamp,
};
pub use input_bus::{InputBus, PullInputFn, RenderActionFlags};
pub use kernel::Kernel;
pub use sample::Sample;
pub use sample_store::SampleStore;
