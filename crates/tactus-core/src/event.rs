//! Render event model.
//!
//! Control events arrive as a caller-owned, time-ordered sequence presented
//! for the duration of one render call. The scheduler walks the sequence
//! with an [`EventCursor`] and never mutates or retains it; events are not
//! persisted across render calls.
//!
//! Event sample times are absolute (the same clock as
//! [`RenderTimestamp::sample_time`]), non-decreasing within a sequence.
//! Ordering is the caller's contract and is not validated.

/// Timestamp of the first frame of a render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderTimestamp {
    /// Absolute sample time of the first frame.
    pub sample_time: i64,
}

impl RenderTimestamp {
    /// Create a timestamp at the given absolute sample time.
    pub const fn new(sample_time: i64) -> Self {
        Self { sample_time }
    }
}

/// Identifier of a kernel parameter addressed by automation events.
pub type ParameterId = u64;

/// How a parameter change takes effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterRamp {
    /// Step to the new value at the event's sample time.
    Immediate,
    /// Interpolate toward the new value over the given number of samples,
    /// starting at the event's sample time.
    Linear {
        /// Ramp duration in samples.
        duration_samples: u32,
    },
}

/// A parameter change from host automation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterEvent {
    /// Target parameter.
    pub id: ParameterId,
    /// New value (immediate) or ramp target value.
    pub value: f32,
    /// Immediate or ramped application.
    pub ramp: ParameterRamp,
}

/// A raw MIDI 1.0 channel message.
///
/// Carries up to three bytes (status plus two data bytes); `length` gives
/// the number of valid bytes. SysEx and MIDI 2.0 packets are outside this
/// core's event model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent {
    /// Number of valid bytes in `data` (1 to 3).
    pub length: u8,
    /// MIDI bytes: status, data1, data2.
    pub data: [u8; 3],
    /// Virtual cable number.
    pub cable: u8,
}

impl MidiEvent {
    /// Create an event from raw bytes.
    ///
    /// Returns `None` for an empty slice; extra bytes beyond three are
    /// ignored.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        let mut data = [0u8; 3];
        let length = bytes.len().min(3);
        data[..length].copy_from_slice(&bytes[..length]);
        Some(Self {
            length: length as u8,
            data,
            cable: 0,
        })
    }

    /// The status nibble (high four bits of the status byte).
    #[inline]
    pub fn status(&self) -> u8 {
        self.data[0] & 0xF0
    }

    /// The MIDI channel (low four bits of the status byte).
    #[inline]
    pub fn channel(&self) -> u8 {
        self.data[0] & 0x0F
    }

    /// The valid bytes of the message.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.length as usize]
    }
}

/// The payload variants a render event can carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// Immediate or ramped parameter change.
    Parameter(ParameterEvent),
    /// Raw MIDI message.
    Midi(MidiEvent),
    /// Host event the core does not model; dropped silently by the
    /// scheduler.
    Other,
}

/// One entry of the time-ordered event sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderEvent {
    /// Absolute sample time at which the event takes effect.
    pub sample_time: i64,
    /// Event payload.
    pub kind: EventKind,
}

impl RenderEvent {
    /// An immediate parameter change.
    pub const fn parameter(sample_time: i64, id: ParameterId, value: f32) -> Self {
        Self {
            sample_time,
            kind: EventKind::Parameter(ParameterEvent {
                id,
                value,
                ramp: ParameterRamp::Immediate,
            }),
        }
    }

    /// A ramped parameter change.
    pub const fn parameter_ramp(
        sample_time: i64,
        id: ParameterId,
        value: f32,
        duration_samples: u32,
    ) -> Self {
        Self {
            sample_time,
            kind: EventKind::Parameter(ParameterEvent {
                id,
                value,
                ramp: ParameterRamp::Linear { duration_samples },
            }),
        }
    }

    /// A MIDI message event; `None` if `bytes` is empty.
    pub fn midi(sample_time: i64, bytes: &[u8]) -> Option<Self> {
        MidiEvent::from_bytes(bytes).map(|midi| Self {
            sample_time,
            kind: EventKind::Midi(midi),
        })
    }
}

/// Read cursor over a borrowed event sequence.
///
/// Replaces pointer-chasing over a linked list with an index into an
/// ordered slice; dispatch order is the slice order.
#[derive(Debug, Clone, Copy)]
pub struct EventCursor<'a> {
    events: &'a [RenderEvent],
    index: usize,
}

impl<'a> EventCursor<'a> {
    /// Create a cursor at the head of `events`.
    pub fn new(events: &'a [RenderEvent]) -> Self {
        Self { events, index: 0 }
    }

    /// The event at the cursor, if any remain.
    #[inline]
    pub fn peek(&self) -> Option<&'a RenderEvent> {
        self.events.get(self.index)
    }

    /// Advance past the current event.
    #[inline]
    pub fn advance(&mut self) {
        self.index += 1;
    }

    /// Whether every event has been consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.index >= self.events.len()
    }
}
