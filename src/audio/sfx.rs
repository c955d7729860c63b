//! One-shot sound effects

use super::{MUTE_THRESHOLD, Source, Sweep, Voice, Waveform};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Collectible picked up - rising chirp
    Collect,
    /// Obstacle hit - falling buzz
    Hit,
    /// Last life lost - long slide down
    GameOver,
    /// Speed milestone, powerup, jump - gentle sweep up
    SpeedUp,
}

impl SoundEffect {
    /// Unscaled voice for this effect
    pub fn voice(self) -> Voice {
        let (waveform, from, sweep, gain, release, duration) = match self {
            SoundEffect::Collect => (
                Waveform::Sine,
                800.0,
                Sweep::exp(1200.0, 0.1),
                0.1,
                Sweep::exp(0.01, 0.1),
                0.1,
            ),
            SoundEffect::Hit => (
                Waveform::Sawtooth,
                150.0,
                Sweep::exp(50.0, 0.2),
                0.2,
                Sweep::exp(0.01, 0.2),
                0.2,
            ),
            SoundEffect::GameOver => (
                Waveform::Triangle,
                300.0,
                Sweep::linear(100.0, 1.0),
                0.3,
                Sweep::linear(0.0, 1.0),
                1.0,
            ),
            SoundEffect::SpeedUp => (
                Waveform::Sine,
                440.0,
                Sweep::linear(660.0, 0.4),
                0.05,
                Sweep::linear(0.0, 0.4),
                0.4,
            ),
        };
        Voice {
            source: Source::Oscillator {
                waveform,
                freq: from,
            },
            pitch_sweep: Some(sweep),
            filter: None,
            gain,
            release,
            duration,
        }
    }

    /// Voice at `sfx_volume`, or `None` when effects are muted
    pub fn voice_at(self, sfx_volume: f32) -> Option<Voice> {
        if sfx_volume <= MUTE_THRESHOLD {
            return None;
        }
        Some(self.voice().scaled(sfx_volume))
    }
}
