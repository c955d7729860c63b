//! Procedural audio
//!
//! Everything audible is synthesized: a step sequencer for the music and
//! short enveloped tones for effects. Voices are plain data so the
//! scheduling logic runs (and is tested) without a sound card; an
//! [`AudioOut`] backend turns them into real nodes.

pub mod sequencer;
pub mod sfx;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use sequencer::{Note, Sequencer};
pub use sfx::SoundEffect;
#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Volumes at or below this are treated as muted
pub const MUTE_THRESHOLD: f32 = 0.01;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// Sound source for a voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Source {
    Oscillator { waveform: Waveform, freq: f32 },
    /// White noise from a shared buffer
    Noise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

/// Parameter automation from the voice start to `to` over `over` seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub to: f32,
    pub over: f64,
    pub ramp: Ramp,
}

impl Sweep {
    pub const fn exp(to: f32, over: f64) -> Self {
        Self {
            to,
            over,
            ramp: Ramp::Exponential,
        }
    }

    pub const fn linear(to: f32, over: f64) -> Self {
        Self {
            to,
            over,
            ramp: Ramp::Linear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Lowpass,
    Highpass,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Filter {
    pub kind: FilterKind,
    pub cutoff: f32,
    pub sweep: Option<Sweep>,
}

/// One enveloped sound, ready to hand to a backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub source: Source,
    pub pitch_sweep: Option<Sweep>,
    pub filter: Option<Filter>,
    /// Peak gain at onset
    pub gain: f32,
    pub release: Sweep,
    /// Seconds until the source stops
    pub duration: f64,
}

impl Voice {
    /// Copy with the onset gain scaled by `factor`
    pub fn scaled(mut self, factor: f32) -> Self {
        self.gain *= factor;
        self
    }
}

/// Audio backend seam.
///
/// `now` is the hardware clock in seconds; `None` means no audio is
/// available and everything upstream becomes a no-op.
pub trait AudioOut {
    fn now(&self) -> Option<f64>;

    /// Schedule `voice` to start at `at` seconds on the `now` clock
    fn play(&mut self, voice: &Voice, at: f64);

    /// Wake a suspended output (browsers require a user gesture)
    fn resume(&mut self) {}
}

/// Silent backend for headless runs and platforms without audio
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioOut for NullAudio {
    fn now(&self) -> Option<f64> {
        None
    }

    fn play(&mut self, _voice: &Voice, _at: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_audio_is_unavailable() {
        let mut out = NullAudio;
        assert_eq!(out.now(), None);
        out.play(&SoundEffect::Hit.voice(), 0.0);
    }

    #[test]
    fn test_scaled_only_touches_gain() {
        let v = SoundEffect::Collect.voice();
        let half = v.scaled(0.5);
        assert_eq!(half.gain, v.gain * 0.5);
        assert_eq!(half.release, v.release);
        assert_eq!(half.source, v.source);
    }
}
