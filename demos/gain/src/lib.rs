//! Demo gain kernel driving the Tactus render engine.
//!
//! The smallest complete kernel: one gain parameter, automatable
//! immediately or over a ramp, plus a MIDI volume mapping (CC 7). It shows
//! the minimal pattern a kernel follows — keep DSP state in plain fields,
//! apply events in the consumers, and render from the positioned views.

use tactus_core::{
    BufferView, Kernel, MidiEvent, ParameterEvent, ParameterId, ParameterRamp, Sample,
};

/// Parameter id of the gain control, in dB.
pub const GAIN: ParameterId = 0;

/// A gain stage with sample-accurate, optionally ramped automation.
///
/// Generic over the sample type so the same kernel serves f32 and f64
/// engines; ramp state is kept in f64 and converted per sample.
pub struct GainKernel {
    /// Current linear gain.
    gain: f64,
    /// Ramp target linear gain.
    target: f64,
    /// Per-sample ramp increment.
    step: f64,
    /// Samples left until the ramp lands on `target`.
    ramp_remaining: u32,
}

impl GainKernel {
    /// Create a kernel at the given gain in dB (0 dB is unity).
    pub fn new(gain_db: f32) -> Self {
        let gain = db_to_linear(gain_db);
        Self {
            gain,
            target: gain,
            step: 0.0,
            ramp_remaining: 0,
        }
    }

    /// The current linear gain.
    pub fn gain_linear(&self) -> f64 {
        self.gain
    }

    /// Step the ramp state as if `frames` samples had been rendered.
    fn advance_ramp(&mut self, frames: u32) {
        if self.ramp_remaining == 0 {
            return;
        }
        let steps = self.ramp_remaining.min(frames);
        self.gain += self.step * f64::from(steps);
        self.ramp_remaining -= steps;
        if self.ramp_remaining == 0 {
            self.gain = self.target;
        }
    }
}

impl Default for GainKernel {
    /// Unity gain.
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Convert dB to a linear amplitude multiplier.
fn db_to_linear(db: f32) -> f64 {
    10f64.powf(f64::from(db) / 20.0)
}

impl<S: Sample> Kernel<S> for GainKernel {
    fn render_frames(
        &mut self,
        _bus: usize,
        input: Option<&BufferView<S>>,
        output: &BufferView<S>,
        frame_count: u32,
    ) {
        for ch in 0..output.channel_count() {
            // Every channel replays the ramp from the same starting state;
            // the shared state advances once below.
            let mut gain = self.gain;
            let mut remaining = self.ramp_remaining;

            // SAFETY: the engine positions the output window within the
            // linked storage and guarantees exclusive render access.
            let out = unsafe { output.channel_mut(ch) };
            match input {
                Some(input) => {
                    // SAFETY: the input window mirrors the output window.
                    let inp = unsafe { input.channel(ch) };
                    for (i, o) in inp.iter().zip(out.iter_mut()) {
                        if remaining > 0 {
                            gain += self.step;
                            remaining -= 1;
                            if remaining == 0 {
                                gain = self.target;
                            }
                        }
                        *o = *i * S::from_f64(gain);
                    }
                }
                // No upstream samples: a gain stage outputs silence.
                None => out.fill(S::ZERO),
            }
        }
        self.advance_ramp(frame_count);
    }

    fn handle_parameter_event(&mut self, event: &ParameterEvent) {
        if event.id != GAIN {
            return;
        }
        let target = db_to_linear(event.value);
        match event.ramp {
            ParameterRamp::Immediate => {
                self.gain = target;
                self.target = target;
                self.ramp_remaining = 0;
            }
            ParameterRamp::Linear { duration_samples } if duration_samples > 0 => {
                self.target = target;
                self.step = (target - self.gain) / f64::from(duration_samples);
                self.ramp_remaining = duration_samples;
            }
            ParameterRamp::Linear { .. } => {
                self.gain = target;
                self.target = target;
                self.ramp_remaining = 0;
            }
        }
    }

    fn handle_midi_event(&mut self, event: &MidiEvent) {
        // CC 7 (channel volume) maps straight onto linear gain.
        if event.status() == 0xB0 && event.length == 3 && event.data[1] == 7 {
            let gain = f64::from(event.data[2]) / 127.0;
            self.gain = gain;
            self.target = gain;
            self.ramp_remaining = 0;
        }
    }
}
