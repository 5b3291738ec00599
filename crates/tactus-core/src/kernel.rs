//! Kernel contract consumed by the render engine.
//!
//! A kernel is the concrete DSP behind an engine: it renders frame ranges
//! and consumes the control events the scheduler interleaves between them.
//! The engine is generic over its kernel type, so every call below is
//! resolved at compile time — there is no virtual dispatch on the render
//! path.

use crate::buffer_view::BufferView;
use crate::error::RenderStatus;
use crate::event::{MidiEvent, ParameterEvent, RenderTimestamp};
use crate::input_bus::PullInputFn;
use crate::sample::Sample;

/// The capability set a DSP kernel exposes to the engine.
///
/// `render_frames` runs on the audio thread between event boundaries and
/// must not allocate or block. The event consumers run on the same thread
/// at exact sample positions: an event dispatched at sample time T affects
/// frame T onward, never frame T-1.
pub trait Kernel<S: Sample> {
    /// Render `frame_count` frames for `bus`.
    ///
    /// Both views are positioned over the segment being rendered; `input`
    /// is `None` when no upstream samples were acquired for this call (an
    /// instrument, or kernel-pulled mode where the kernel manages its own
    /// buffers).
    fn render_frames(
        &mut self,
        bus: usize,
        input: Option<&BufferView<S>>,
        output: &BufferView<S>,
        frame_count: u32,
    );

    /// Apply an immediate or ramped parameter change.
    fn handle_parameter_event(&mut self, event: &ParameterEvent);

    /// Apply a MIDI message.
    fn handle_midi_event(&mut self, event: &MidiEvent);

    /// Acquire upstream samples in kernel-pulled mode.
    ///
    /// Called instead of the engine's own input preparation when the
    /// engine was built with [`RenderEngine::with_kernel_pull`]; the kernel
    /// decides which of its buffers the pull function fills. A non-success
    /// status aborts the render call before any frame is produced.
    ///
    /// The default implementation acquires nothing and succeeds.
    ///
    /// [`RenderEngine::with_kernel_pull`]: crate::engine::RenderEngine::with_kernel_pull
    fn pull_input(
        &mut self,
        timestamp: &RenderTimestamp,
        frame_count: u32,
        bus: usize,
        pull: &mut PullInputFn<'_, S>,
    ) -> RenderStatus {
        let _ = (timestamp, frame_count, bus, pull);
        RenderStatus::Ok
    }
}
