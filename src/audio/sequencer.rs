//! Speed-synced step sequencer
//!
//! Runs on the audio clock, not the frame clock. Every call schedules all
//! steps that fall inside a short lookahead window, so a dropped frame only
//! means a bigger batch next time. `next_note_time` only ever moves forward,
//! which is what keeps a step from being scheduled twice.

use super::{Filter, FilterKind, MUTE_THRESHOLD, Source, Sweep, Voice, Waveform};
use crate::tuning::{INITIAL_SPEED, MAX_SPEED};

pub const STEPS: usize = 16;
/// Seconds ahead of the audio clock to schedule
pub const LOOKAHEAD: f64 = 0.1;
pub const BASE_BPM: f32 = 120.0;
pub const MAX_BPM: f32 = 170.0;
/// Music gain at full music volume
pub const MUSIC_GAIN: f32 = 0.3;

const BASS_NOTES: [f32; 8] = [98.0, 98.0, 116.5, 98.0, 130.8, 98.0, 116.5, 146.8];
const ARP_NOTES: [f32; 4] = [392.0, 466.1, 523.2, 587.3];

/// A voice pinned to a point on the audio clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub time: f64,
    pub step: usize,
    pub voice: Voice,
}

/// Tempo at game `speed`, linear from 120 to 170 BPM
pub fn tempo_bpm(speed: f32) -> f32 {
    let progress = ((speed - INITIAL_SPEED) / (MAX_SPEED - INITIAL_SPEED)).clamp(0.0, 1.0);
    BASE_BPM + progress * (MAX_BPM - BASE_BPM)
}

/// Seconds per sixteenth note at game `speed`
pub fn step_duration(speed: f32) -> f64 {
    60.0 / f64::from(tempo_bpm(speed)) / 4.0
}

/// Voices for one pattern step at master gain `master`
pub fn step_voices(step: usize, master: f32) -> Vec<Voice> {
    let mut voices = Vec::new();

    // Kick
    if step % 4 == 0 {
        voices.push(Voice {
            source: Source::Oscillator {
                waveform: Waveform::Sine,
                freq: 150.0,
            },
            pitch_sweep: Some(Sweep::exp(0.01, 0.5)),
            filter: None,
            gain: master,
            release: Sweep::exp(0.01, 0.5),
            duration: 0.5,
        });
    }

    // Hi-hat
    if step % 4 == 2 {
        voices.push(Voice {
            source: Source::Noise,
            pitch_sweep: None,
            filter: Some(Filter {
                kind: FilterKind::Highpass,
                cutoff: 8000.0,
                sweep: None,
            }),
            gain: 0.4 * master,
            release: Sweep::exp(0.01, 0.05),
            duration: 0.05,
        });
    }

    // Bass
    if step % 2 == 0 {
        voices.push(Voice {
            source: Source::Oscillator {
                waveform: Waveform::Sawtooth,
                freq: BASS_NOTES[(step / 2) % BASS_NOTES.len()],
            },
            pitch_sweep: None,
            filter: Some(Filter {
                kind: FilterKind::Lowpass,
                cutoff: 600.0,
                sweep: Some(Sweep::exp(100.0, 0.15)),
            }),
            gain: 0.4 * master,
            release: Sweep::linear(0.0, 0.2),
            duration: 0.2,
        });
    }

    // Arp
    if step % 3 == 0 && step != 0 {
        voices.push(Voice {
            source: Source::Oscillator {
                waveform: Waveform::Square,
                freq: ARP_NOTES[(step / 3) % ARP_NOTES.len()],
            },
            pitch_sweep: None,
            filter: None,
            gain: 0.08 * master,
            release: Sweep::exp(0.01, 0.1),
            duration: 0.1,
        });
    }

    voices
}

#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    /// Audio-clock time of the next unscheduled step
    next_note_time: f64,
    step: usize,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the pattern from step 0 at the next call
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn next_note_time(&self) -> f64 {
        self.next_note_time
    }

    /// Schedule every step due before `now + LOOKAHEAD`.
    ///
    /// A cursor more than `LOOKAHEAD` stale (first call, tab was hidden)
    /// jumps to `now + LOOKAHEAD` instead of replaying the backlog.
    pub fn schedule(&mut self, now: f64, speed: f32, music_volume: f32) -> Vec<Note> {
        if music_volume <= MUTE_THRESHOLD {
            return Vec::new();
        }

        if self.next_note_time < now - LOOKAHEAD {
            self.next_note_time = now + LOOKAHEAD;
        }

        let master = MUSIC_GAIN * music_volume;
        let step_len = step_duration(speed);
        let mut notes = Vec::new();
        while self.next_note_time < now + LOOKAHEAD {
            for voice in step_voices(self.step, master) {
                notes.push(Note {
                    time: self.next_note_time,
                    step: self.step,
                    voice,
                });
            }
            self.next_note_time += step_len;
            self.step = (self.step + 1) % STEPS;
        }
        notes
    }
}
