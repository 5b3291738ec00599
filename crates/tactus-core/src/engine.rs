//! The event-interleaved render engine.
//!
//! [`RenderEngine`] is the scheduler at the center of the core: given a
//! frame block and a time-ordered event sequence, it repeatedly renders the
//! longest event-free prefix, then dispatches every event at the current
//! time point, until the block is exhausted. Splitting at event boundaries
//! guarantees each parameter or MIDI event takes effect at its exact sample
//! rather than being rounded to a block boundary.
//!
//! The engine is generic over its [`Kernel`], so all kernel calls are
//! monomorphized; there is no virtual dispatch on the render path.
//!
//! # Execution contexts
//!
//! - [`process_and_render`] runs in render context: bounded time, no
//!   allocation, no locks, errors as status values.
//! - [`configure`], [`teardown`], and [`set_bypass`] run in configuration
//!   context and may allocate. The caller guarantees these never execute
//!   concurrently with a render call on the same engine (typically by
//!   stopping the audio engine first); the engine itself holds no locks.
//!
//! [`process_and_render`]: RenderEngine::process_and_render
//! [`configure`]: RenderEngine::configure
//! [`teardown`]: RenderEngine::teardown
//! [`set_bypass`]: RenderEngine::set_bypass

use crate::buffer_view::BufferView;
use crate::buffers::OutputBufferList;
use crate::config::{EngineConfig, StreamFormat};
use crate::error::{ConfigResult, RenderStatus};
use crate::event::{EventCursor, EventKind, RenderEvent, RenderTimestamp};
use crate::input_bus::{InputBus, PullInputFn, RenderActionFlags};
use crate::kernel::Kernel;
use crate::sample::Sample;
use crate::sample_store::SampleStore;

/// Sample-accurate scheduler interleaving control events with block
/// rendering.
///
/// One engine owns one kernel plus the per-bus input storage behind it.
/// Input acquisition mode is fixed at construction: [`RenderEngine::new`]
/// pulls upstream samples into the engine's own stores, while
/// [`RenderEngine::with_kernel_pull`] delegates acquisition to the kernel.
pub struct RenderEngine<S: Sample, K: Kernel<S>> {
    kernel: K,
    inputs: Vec<InputBus<S>>,
    output: BufferView<S>,
    format: Option<StreamFormat>,
    kernel_pull: bool,
    bypassed: bool,
}

impl<S: Sample, K: Kernel<S>> RenderEngine<S, K> {
    /// Create an engine that pulls upstream samples into its own input
    /// stores (framework-pulled mode).
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            inputs: Vec::new(),
            output: BufferView::new(),
            format: None,
            kernel_pull: false,
            bypassed: false,
        }
    }

    /// Create an engine whose kernel performs its own input acquisition
    /// (kernel-pulled mode): the upstream pull function is handed to
    /// [`Kernel::pull_input`] and the engine prepares no input buffers.
    pub fn with_kernel_pull(kernel: K) -> Self {
        Self {
            kernel_pull: true,
            ..Self::new(kernel)
        }
    }

    /// Borrow the kernel.
    #[inline]
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Mutably borrow the kernel (configuration context).
    #[inline]
    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    /// Consume the engine, returning its kernel.
    pub fn into_kernel(self) -> K {
        self.kernel
    }

    /// Number of configured buses (0 before [`configure`]).
    ///
    /// [`configure`]: RenderEngine::configure
    #[inline]
    pub fn bus_count(&self) -> usize {
        self.inputs.len()
    }

    /// The configured stream format, if any.
    #[inline]
    pub fn format(&self) -> Option<StreamFormat> {
        self.format
    }

    /// Configured maximum frame count for `bus` (0 for unconfigured buses).
    #[inline]
    pub fn capacity(&self, bus: usize) -> u32 {
        self.inputs.get(bus).map_or(0, |b| b.capacity())
    }

    /// Borrow the input store behind `bus`.
    #[inline]
    pub fn input_store(&self, bus: usize) -> Option<&SampleStore<S>> {
        self.inputs.get(bus).map(|b| b.store())
    }

    /// Mutably borrow the input store behind `bus` (configuration context).
    #[inline]
    pub fn input_store_mut(&mut self, bus: usize) -> Option<&mut SampleStore<S>> {
        self.inputs.get_mut(bus).map(|b| b.store_mut())
    }

    /// Allocate buffers for `bus_count` buses of `format`, each sized to
    /// `max_frames` frames.
    ///
    /// Idempotent for identical parameters; otherwise storage is replaced.
    /// Changing the channel count after a render call requires an
    /// intervening [`teardown`], since the previous call's input views are
    /// still linked to the old layout.
    ///
    /// [`teardown`]: RenderEngine::teardown
    pub fn configure(
        &mut self,
        bus_count: usize,
        format: StreamFormat,
        max_frames: u32,
    ) -> ConfigResult<()> {
        self.configure_with(&EngineConfig::new(bus_count, format, max_frames))
    }

    /// [`configure`] from a bundled (possibly deserialized) configuration.
    ///
    /// [`configure`]: RenderEngine::configure
    pub fn configure_with(&mut self, config: &EngineConfig) -> ConfigResult<()> {
        config.validate()?;
        log::info!(
            "configure: {} buses, {} channels, {} max frames",
            config.bus_count,
            config.format.channel_count,
            config.max_frames
        );

        self.output.unlink();
        self.inputs.resize_with(config.bus_count, InputBus::new);
        for bus in &mut self.inputs {
            bus.allocate(&config.format, config.max_frames)?;
        }
        self.output.reserve_channels(config.format.channel_count);
        self.format = Some(config.format);
        Ok(())
    }

    /// Rendering has stopped: free all buffer storage.
    pub fn teardown(&mut self) {
        log::info!("teardown");
        self.output.unlink();
        for bus in &mut self.inputs {
            bus.release();
        }
        self.inputs.clear();
        self.format = None;
    }

    /// Set the bypass mode.
    ///
    /// While bypassed, rendering degenerates to a copy from the input
    /// window to the output window and the kernel's render routine is not
    /// invoked (events are still dispatched).
    pub fn set_bypass(&mut self, bypass: bool) {
        log::info!("set_bypass: {bypass}");
        self.bypassed = bypass;
    }

    /// Current bypass mode.
    #[inline]
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Process events and render `frame_count` frames for `bus`.
    ///
    /// Events and rendering are interleaved so that event times align with
    /// samples: an event at sample time T affects frame T onward, never
    /// frame T-1. `events` is borrowed for this call only and must be
    /// non-decreasing in sample time (caller contract, not validated; a
    /// late event is dispatched immediately at the current time point).
    /// Events timed past the end of the block are never dispatched; an
    /// event timed exactly at the end is consumed but affects no frame of
    /// this call.
    ///
    /// Fails with [`RenderStatus::TooManyFrames`] before any side effect
    /// when `frame_count` exceeds the configured capacity of `bus`
    /// (requests for unconfigured buses report the same, as their capacity
    /// is zero). A failed upstream pull aborts with the propagated status
    /// before any frame is rendered. A zero-frame request succeeds without
    /// touching buffers or invoking the pull function.
    pub fn process_and_render(
        &mut self,
        timestamp: &RenderTimestamp,
        frame_count: u32,
        bus: usize,
        output: &mut OutputBufferList<S>,
        events: &[RenderEvent],
        pull: Option<&mut PullInputFn<'_, S>>,
    ) -> RenderStatus {
        let capacity = self.capacity(bus);
        if frame_count > capacity {
            log::error!(
                "process_and_render: too many frames - frame_count: {frame_count} capacity: {capacity}"
            );
            return RenderStatus::TooManyFrames;
        }
        if frame_count == 0 {
            return RenderStatus::Ok;
        }

        if let Some(pull) = pull {
            if self.kernel_pull {
                let status = self.kernel.pull_input(timestamp, frame_count, bus, pull);
                if !status.is_ok() {
                    log::error!("process_and_render: kernel pull failed - {status:?}");
                    return status;
                }
            } else {
                let mut action_flags = RenderActionFlags::default();
                let status =
                    self.inputs[bus].pull(&mut action_flags, timestamp, frame_count, bus, pull);
                if !status.is_ok() {
                    log::error!("process_and_render: failed pull - {status:?}");
                    return status;
                }
            }
        }
        // With no pull function (an instrument with no upstream bus) the
        // input view simply stays unlinked for this call.

        self.output.link_output(output, self.inputs[bus].store_mut());
        self.output.set_frame_count(frame_count);

        self.render(bus, timestamp, frame_count, events);

        self.output.unlink();
        RenderStatus::Ok
    }

    /// The interleaving loop: longest event-free prefix, then all events at
    /// the current time point, until the block is exhausted.
    fn render(
        &mut self,
        bus: usize,
        timestamp: &RenderTimestamp,
        frame_count: u32,
        events: &[RenderEvent],
    ) {
        let mut now = timestamp.sample_time;
        let mut remaining = frame_count;
        let mut cursor = EventCursor::new(events);

        while remaining > 0 {
            let Some(event) = cursor.peek() else {
                // No more events to interleave.
                self.render_segment(bus, remaining, frame_count - remaining);
                return;
            };

            // Render the frames between now and the first event, clamped to
            // the end of the block.
            let gap = u64::try_from(event.sample_time.saturating_sub(now)).unwrap_or(0);
            let segment = gap.min(u64::from(remaining)) as u32;
            if segment > 0 {
                self.render_segment(bus, segment, frame_count - remaining);
                now += i64::from(segment);
                remaining -= segment;
            }

            // Dispatch the events for the current time.
            self.dispatch_events_at(now, &mut cursor);
        }
    }

    /// Forward every event at or before `now` to the kernel, in sequence
    /// order.
    fn dispatch_events_at(&mut self, now: i64, cursor: &mut EventCursor<'_>) {
        while let Some(event) = cursor.peek() {
            if event.sample_time > now {
                break;
            }
            match &event.kind {
                EventKind::Parameter(parameter) => {
                    self.kernel.handle_parameter_event(parameter);
                }
                EventKind::Midi(midi) => self.kernel.handle_midi_event(midi),
                EventKind::Other => {}
            }
            cursor.advance();
        }
    }

    /// Render one event-free segment of `frame_count` frames starting
    /// `offset` frames into the block.
    fn render_segment(&mut self, bus: usize, frame_count: u32, offset: u32) {
        let input = &mut self.inputs[bus];

        if self.bypassed {
            // Copies nothing if the input view is unlinked.
            input.facet().copy_into(&self.output, offset, frame_count);
            return;
        }

        if input.facet().is_linked() {
            let facet = input.facet_mut();
            facet.set_offset(offset);
            facet.set_frame_count(frame_count);
        }
        self.output.set_offset(offset);
        self.output.set_frame_count(frame_count);

        let input_facet = self.inputs[bus].facet();
        let input_view = input_facet.is_linked().then_some(input_facet);
        self.kernel
            .render_frames(bus, input_view, &self.output, frame_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{MidiEvent, ParameterEvent};

    /// What the engine asked of the kernel, in call order.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Render { offset: u32, frames: u32 },
        Parameter { id: u64, value: f32 },
        Midi { data: [u8; 3] },
        Pull { bus: usize },
    }

    /// Test kernel recording every engine call; writes `fill` into the
    /// output window so frame coverage can be asserted.
    #[derive(Default)]
    struct RecordingKernel {
        calls: Vec<Call>,
        fill: f32,
        copy_input: bool,
    }

    impl Kernel<f32> for RecordingKernel {
        fn render_frames(
            &mut self,
            _bus: usize,
            input: Option<&BufferView<f32>>,
            output: &BufferView<f32>,
            frame_count: u32,
        ) {
            self.calls.push(Call::Render {
                offset: output.offset(),
                frames: frame_count,
            });
            for ch in 0..output.channel_count() {
                // SAFETY: the engine positions the window within capacity
                // and guarantees exclusive render access.
                let out = unsafe { output.channel_mut(ch) };
                if self.copy_input {
                    if let Some(input) = input {
                        // SAFETY: input is linked over the same window.
                        out.copy_from_slice(unsafe { input.channel(ch) });
                        continue;
                    }
                }
                out.fill(self.fill);
            }
        }

        fn handle_parameter_event(&mut self, event: &ParameterEvent) {
            self.calls.push(Call::Parameter {
                id: event.id,
                value: event.value,
            });
        }

        fn handle_midi_event(&mut self, event: &MidiEvent) {
            self.calls.push(Call::Midi { data: event.data });
        }

        fn pull_input(
            &mut self,
            _timestamp: &RenderTimestamp,
            _frame_count: u32,
            bus: usize,
            _pull: &mut PullInputFn<'_, f32>,
        ) -> RenderStatus {
            self.calls.push(Call::Pull { bus });
            RenderStatus::Ok
        }
    }

    fn configured_engine(max_frames: u32) -> RenderEngine<f32, RecordingKernel> {
        let mut engine = RenderEngine::new(RecordingKernel {
            fill: 1.0,
            ..Default::default()
        });
        engine
            .configure(1, StreamFormat::stereo(48_000.0), max_frames)
            .unwrap();
        engine
    }

    fn output_buffers(frames: usize) -> (Vec<f32>, Vec<f32>) {
        (vec![0.0; frames], vec![0.0; frames])
    }

    /// Pull function writing an ascending ramp per channel.
    fn ramp_pull(
        _: &mut RenderActionFlags,
        _: &RenderTimestamp,
        frames: u32,
        _: usize,
        store: &mut SampleStore<f32>,
    ) -> RenderStatus {
        for ch in 0..store.channel_count() {
            let samples = store.channel_mut(ch).unwrap();
            for (i, s) in samples.iter_mut().take(frames as usize).enumerate() {
                *s = (ch * 1000 + i) as f32;
            }
        }
        RenderStatus::Ok
    }

    #[test]
    fn test_empty_event_list_renders_one_segment() {
        let mut engine = configured_engine(256);
        let (mut left, mut right) = output_buffers(256);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            256,
            0,
            &mut output,
            &[],
            None,
        );

        assert_eq!(status, RenderStatus::Ok);
        assert_eq!(
            engine.kernel().calls,
            vec![Call::Render {
                offset: 0,
                frames: 256
            }]
        );
        assert!(left.iter().all(|&s| s == 1.0));
        assert!(right.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_parameter_event_splits_block() {
        let mut engine = configured_engine(128);
        let (mut left, mut right) = output_buffers(100);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let events = [RenderEvent::parameter(1000 + 40, 3, 0.25)];
        let status = engine.process_and_render(
            &RenderTimestamp::new(1000),
            100,
            0,
            &mut output,
            &events,
            None,
        );

        assert_eq!(status, RenderStatus::Ok);
        assert_eq!(
            engine.kernel().calls,
            vec![
                Call::Render {
                    offset: 0,
                    frames: 40
                },
                Call::Parameter { id: 3, value: 0.25 },
                Call::Render {
                    offset: 40,
                    frames: 60
                },
            ]
        );
    }

    #[test]
    fn test_midi_events_at_block_start_dispatch_before_rendering() {
        let mut engine = configured_engine(64);
        let (mut left, mut right) = output_buffers(64);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let events = [
            RenderEvent::midi(500, &[0x90, 60, 100]).unwrap(),
            RenderEvent::midi(500, &[0x90, 64, 100]).unwrap(),
        ];
        engine.process_and_render(
            &RenderTimestamp::new(500),
            64,
            0,
            &mut output,
            &events,
            None,
        );

        assert_eq!(
            engine.kernel().calls,
            vec![
                Call::Midi {
                    data: [0x90, 60, 100]
                },
                Call::Midi {
                    data: [0x90, 64, 100]
                },
                Call::Render {
                    offset: 0,
                    frames: 64
                },
            ]
        );
    }

    #[test]
    fn test_total_frames_across_segments_equals_request() {
        let mut engine = configured_engine(256);
        let (mut left, mut right) = output_buffers(256);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let events = [
            RenderEvent::parameter(10, 1, 0.1),
            RenderEvent::parameter(20, 2, 0.2),
            RenderEvent::parameter(250, 3, 0.3),
        ];
        engine.process_and_render(
            &RenderTimestamp::new(0),
            256,
            0,
            &mut output,
            &events,
            None,
        );

        let rendered: u32 = engine
            .kernel()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Render { frames, .. } => Some(*frames),
                _ => None,
            })
            .sum();
        assert_eq!(rendered, 256);

        // Segments are contiguous and in order.
        let mut expected_offset = 0;
        for call in &engine.kernel().calls {
            if let Call::Render { offset, frames } = call {
                assert_eq!(*offset, expected_offset);
                expected_offset += frames;
            }
        }
        assert!(left.iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_capacity_boundary() {
        let mut engine = configured_engine(128);
        let (mut left, mut right) = output_buffers(129);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        // Exactly at capacity succeeds.
        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            128,
            0,
            &mut output,
            &[],
            None,
        );
        assert_eq!(status, RenderStatus::Ok);

        // One past capacity fails with no side effects.
        engine.kernel_mut().calls.clear();
        left.fill(-9.0);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);
        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            129,
            0,
            &mut output,
            &[],
            None,
        );
        assert_eq!(status, RenderStatus::TooManyFrames);
        assert!(engine.kernel().calls.is_empty());
        assert!(left.iter().all(|&s| s == -9.0));
    }

    #[test]
    fn test_failed_pull_aborts_before_rendering() {
        let mut engine = configured_engine(64);
        let (mut left, mut right) = output_buffers(64);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let mut failing = |_: &mut RenderActionFlags,
                           _: &RenderTimestamp,
                           _: u32,
                           _: usize,
                           _: &mut SampleStore<f32>|
         -> RenderStatus { RenderStatus::Upstream(-10877) };

        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            64,
            0,
            &mut output,
            &[],
            Some(&mut failing),
        );

        assert_eq!(status, RenderStatus::Upstream(-10877));
        assert!(engine.kernel().calls.is_empty());
        assert!(left.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_pull_fills_input_facet() {
        let mut engine = configured_engine(64);
        engine.kernel_mut().copy_input = true;
        let (mut left, mut right) = output_buffers(16);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let mut pull = ramp_pull;
        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            16,
            0,
            &mut output,
            &[],
            Some(&mut pull),
        );

        assert_eq!(status, RenderStatus::Ok);
        // Kernel copied the pulled ramp through to the output.
        assert_eq!(left[5], 5.0);
        assert_eq!(right[5], 1005.0);
    }

    #[test]
    fn test_bypass_copies_input_window() {
        let mut engine = configured_engine(64);
        engine.set_bypass(true);
        assert!(engine.is_bypassed());

        let (mut left, mut right) = output_buffers(32);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let mut pull = ramp_pull;
        let events = [RenderEvent::parameter(10, 1, 0.5)];
        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            32,
            0,
            &mut output,
            &events,
            Some(&mut pull),
        );

        assert_eq!(status, RenderStatus::Ok);
        // Output is a direct copy of the input; the kernel rendered nothing
        // but still saw the parameter event.
        for (i, &s) in left.iter().enumerate() {
            assert_eq!(s, i as f32);
        }
        for (i, &s) in right.iter().enumerate() {
            assert_eq!(s, (1000 + i) as f32);
        }
        assert_eq!(
            engine.kernel().calls,
            vec![Call::Parameter { id: 1, value: 0.5 }]
        );
    }

    #[test]
    fn test_bypass_without_input_is_noop() {
        let mut engine = configured_engine(64);
        engine.set_bypass(true);

        let (mut left, mut right) = output_buffers(16);
        left.fill(0.5);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            16,
            0,
            &mut output,
            &[],
            None,
        );

        assert_eq!(status, RenderStatus::Ok);
        // Nothing to copy from: output untouched.
        assert!(left.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn test_in_place_output_renders_into_input_store() {
        let mut engine = configured_engine(32);
        let mut output: OutputBufferList<f32> = OutputBufferList::in_place(2);

        let mut pull = ramp_pull;
        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            32,
            0,
            &mut output,
            &[],
            Some(&mut pull),
        );

        assert_eq!(status, RenderStatus::Ok);
        // The host list now points into the input store, which holds the
        // rendered samples.
        assert!(!output.channel_ptr(0).is_null());
        let store = engine.input_store(0).unwrap();
        assert!(store.channel(0).unwrap()[..32].iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_kernel_pull_mode_delegates_acquisition() {
        let mut engine = RenderEngine::with_kernel_pull(RecordingKernel {
            fill: 1.0,
            ..Default::default()
        });
        engine
            .configure(1, StreamFormat::stereo(48_000.0), 64)
            .unwrap();

        let (mut left, mut right) = output_buffers(64);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let mut untouched = true;
        let mut pull = |_: &mut RenderActionFlags,
                        _: &RenderTimestamp,
                        _: u32,
                        _: usize,
                        _: &mut SampleStore<f32>|
         -> RenderStatus {
            untouched = false;
            RenderStatus::Ok
        };

        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            64,
            0,
            &mut output,
            &[],
            Some(&mut pull),
        );

        assert_eq!(status, RenderStatus::Ok);
        // The kernel saw the pull request; the engine did not pull itself,
        // so the kernel rendered with no input view.
        assert_eq!(
            engine.kernel().calls,
            vec![
                Call::Pull { bus: 0 },
                Call::Render {
                    offset: 0,
                    frames: 64
                }
            ]
        );
        assert!(untouched);
    }

    #[test]
    fn test_event_past_block_end_is_not_dispatched() {
        let mut engine = configured_engine(256);
        let (mut left, mut right) = output_buffers(256);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let events = [RenderEvent::parameter(300, 1, 0.9)];
        engine.process_and_render(
            &RenderTimestamp::new(0),
            256,
            0,
            &mut output,
            &events,
            None,
        );

        assert_eq!(
            engine.kernel().calls,
            vec![Call::Render {
                offset: 0,
                frames: 256
            }]
        );
    }

    #[test]
    fn test_late_event_dispatches_immediately() {
        let mut engine = configured_engine(64);
        let (mut left, mut right) = output_buffers(64);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        // Event timed before the block start: dispatched at the current
        // time point before any rendering.
        let events = [RenderEvent::parameter(100, 1, 0.5)];
        engine.process_and_render(
            &RenderTimestamp::new(200),
            64,
            0,
            &mut output,
            &events,
            None,
        );

        assert_eq!(
            engine.kernel().calls,
            vec![
                Call::Parameter { id: 1, value: 0.5 },
                Call::Render {
                    offset: 0,
                    frames: 64
                }
            ]
        );
    }

    #[test]
    fn test_zero_frame_request_is_noop() {
        let mut engine = configured_engine(64);
        let mut output: OutputBufferList<f32> = OutputBufferList::in_place(2);

        let mut pull = |_: &mut RenderActionFlags,
                        _: &RenderTimestamp,
                        _: u32,
                        _: usize,
                        _: &mut SampleStore<f32>|
         -> RenderStatus {
            panic!("pull must not run for a zero-frame request")
        };

        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            0,
            0,
            &mut output,
            &[],
            Some(&mut pull),
        );
        assert_eq!(status, RenderStatus::Ok);
        assert!(engine.kernel().calls.is_empty());
    }

    #[test]
    fn test_unconfigured_bus_reports_too_many_frames() {
        let mut engine = configured_engine(64);
        let mut output: OutputBufferList<f32> = OutputBufferList::in_place(2);

        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            64,
            5,
            &mut output,
            &[],
            None,
        );
        assert_eq!(status, RenderStatus::TooManyFrames);
    }

    #[test]
    fn test_multi_bus_pull_receives_bus_index() {
        let mut engine = RenderEngine::new(RecordingKernel {
            fill: 1.0,
            ..Default::default()
        });
        engine
            .configure(3, StreamFormat::mono(48_000.0), 32)
            .unwrap();
        assert_eq!(engine.bus_count(), 3);

        let (mut mono, _) = output_buffers(32);
        let mut channels: Vec<&mut [f32]> = vec![&mut mono];
        let mut output = OutputBufferList::from_slices(&mut channels);

        let mut seen = usize::MAX;
        let mut pull = |_: &mut RenderActionFlags,
                        _: &RenderTimestamp,
                        _: u32,
                        bus: usize,
                        _: &mut SampleStore<f32>|
         -> RenderStatus {
            seen = bus;
            RenderStatus::Ok
        };

        let status = engine.process_and_render(
            &RenderTimestamp::new(0),
            32,
            2,
            &mut output,
            &[],
            Some(&mut pull),
        );
        assert_eq!(status, RenderStatus::Ok);
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_reconfigure_channel_count_requires_teardown() {
        let mut engine = configured_engine(64);
        let (mut left, mut right) = output_buffers(16);
        let mut channels: Vec<&mut [f32]> = vec![&mut left, &mut right];
        let mut output = OutputBufferList::from_slices(&mut channels);

        // A render with a pull links the input views.
        let mut pull = ramp_pull;
        engine.process_and_render(
            &RenderTimestamp::new(0),
            16,
            0,
            &mut output,
            &[],
            Some(&mut pull),
        );

        // Changing the channel count now is inconsistent with the linked
        // views; after teardown it succeeds.
        assert!(engine
            .configure(1, StreamFormat::mono(48_000.0), 64)
            .is_err());
        engine.teardown();
        assert!(engine
            .configure(1, StreamFormat::mono(48_000.0), 64)
            .is_ok());
        assert_eq!(engine.capacity(0), 64);
    }

    #[test]
    fn test_configure_rejects_invalid_config() {
        let mut engine = RenderEngine::new(RecordingKernel::default());
        assert!(engine
            .configure(0, StreamFormat::stereo(48_000.0), 64)
            .is_err());
        assert!(engine
            .configure(1, StreamFormat::stereo(48_000.0), 0)
            .is_err());
        assert_eq!(engine.bus_count(), 0);
    }

    #[test]
    fn test_teardown_releases_capacity() {
        let mut engine = configured_engine(64);
        assert_eq!(engine.capacity(0), 64);
        engine.teardown();
        assert_eq!(engine.capacity(0), 0);
        assert_eq!(engine.bus_count(), 0);
        assert!(engine.format().is_none());
    }

    #[test]
    fn test_configure_with_deserialized_config() {
        let config = EngineConfig::from_json(
            r#"{"bus_count":2,"format":{"channel_count":1,"sample_rate":44100.0},"max_frames":128}"#,
        )
        .unwrap();
        let mut engine = RenderEngine::new(RecordingKernel::default());
        engine.configure_with(&config).unwrap();
        assert_eq!(engine.bus_count(), 2);
        assert_eq!(engine.capacity(1), 128);
    }
}
