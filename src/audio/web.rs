//! Web Audio backend
//!
//! Builds a short-lived node graph per voice:
//! source -> [biquad] -> gain -> destination.

use web_sys::{
    AudioBuffer, AudioContext, AudioContextState, AudioNode, AudioParam, BiquadFilterType,
    OscillatorType,
};

use super::{AudioOut, FilterKind, Ramp, Source, Sweep, Voice, Waveform};

/// Seconds of white noise shared by every noise voice
const NOISE_SECONDS: f32 = 2.0;

pub struct WebAudio {
    ctx: Option<AudioContext>,
    noise: Option<AudioBuffer>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("{} - sound disabled", crate::Error::AudioUnavailable);
        }
        let noise = ctx.as_ref().and_then(make_noise);
        Self { ctx, noise }
    }

    fn source_node(&self, ctx: &AudioContext, voice: &Voice, at: f64) -> Option<AudioNode> {
        let stop = at + voice.duration;
        match voice.source {
            Source::Oscillator { waveform, freq } => {
                let osc = ctx.create_oscillator().ok()?;
                osc.set_type(oscillator_type(waveform));
                osc.frequency().set_value_at_time(freq, at).ok()?;
                if let Some(sweep) = voice.pitch_sweep {
                    apply_sweep(&osc.frequency(), sweep, at);
                }
                osc.start_with_when(at).ok()?;
                osc.stop_with_when(stop).ok()?;
                Some(osc.into())
            }
            Source::Noise => {
                let src = ctx.create_buffer_source().ok()?;
                src.set_buffer(self.noise.as_ref());
                src.start_with_when(at).ok()?;
                src.stop_with_when(stop).ok()?;
                Some(src.into())
            }
        }
    }
}

impl AudioOut for WebAudio {
    fn now(&self) -> Option<f64> {
        self.ctx.as_ref().map(|ctx| ctx.current_time())
    }

    fn play(&mut self, voice: &Voice, at: f64) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let Some(source) = self.source_node(ctx, voice, at) else {
            return;
        };
        let Ok(gain) = ctx.create_gain() else { return };
        gain.gain().set_value_at_time(voice.gain, at).ok();
        apply_sweep(&gain.gain(), voice.release, at);

        let tail: AudioNode = match voice.filter {
            Some(filter) => {
                let Ok(biquad) = ctx.create_biquad_filter() else {
                    return;
                };
                biquad.set_type(match filter.kind {
                    FilterKind::Lowpass => BiquadFilterType::Lowpass,
                    FilterKind::Highpass => BiquadFilterType::Highpass,
                });
                biquad.frequency().set_value_at_time(filter.cutoff, at).ok();
                if let Some(sweep) = filter.sweep {
                    apply_sweep(&biquad.frequency(), sweep, at);
                }
                if source.connect_with_audio_node(&biquad).is_err() {
                    return;
                }
                biquad.into()
            }
            None => source,
        };

        if tail.connect_with_audio_node(&gain).is_ok() {
            gain.connect_with_audio_node(&ctx.destination()).ok();
        }
    }

    fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }
}

fn oscillator_type(waveform: Waveform) -> OscillatorType {
    match waveform {
        Waveform::Sine => OscillatorType::Sine,
        Waveform::Square => OscillatorType::Square,
        Waveform::Sawtooth => OscillatorType::Sawtooth,
        Waveform::Triangle => OscillatorType::Triangle,
    }
}

fn apply_sweep(param: &AudioParam, sweep: Sweep, at: f64) {
    let end = at + sweep.over;
    match sweep.ramp {
        Ramp::Linear => param.linear_ramp_to_value_at_time(sweep.to, end).ok(),
        Ramp::Exponential => param.exponential_ramp_to_value_at_time(sweep.to, end).ok(),
    };
}

fn make_noise(ctx: &AudioContext) -> Option<AudioBuffer> {
    let rate = ctx.sample_rate();
    let len = (rate * NOISE_SECONDS) as u32;
    let buffer = ctx.create_buffer(1, len, rate).ok()?;
    let mut samples: Vec<f32> = (0..len).map(|_| rand::random::<f32>() * 2.0 - 1.0).collect();
    buffer.copy_to_channel(&mut samples, 0).ok()?;
    Some(buffer)
}
