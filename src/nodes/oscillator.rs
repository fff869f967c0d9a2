//! Oscillator nodes - sine and sawtooth with audio-rate frequency input
//!
//! Both oscillators integrate their frequency input sample by sample, so the
//! frequency can be modulated by any other signal (vibrato, FM, sweeps)
//! without discontinuities. Phase is kept in f64; an f32 accumulator drifts
//! audibly over clips longer than a few seconds.

use crate::operator::{Kernel, RenderContext};
use std::f64::consts::TAU;

/// Waveform types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Saw,
}

/// Oscillator with signal-controlled frequency
///
/// # Example
/// ```text
/// 440 sin          -- A4 sine
/// 110 saw 0.5 mul  -- half-amplitude A2 sawtooth
/// ```
pub struct OscillatorNode {
    waveform: Waveform,
}

impl OscillatorNode {
    pub fn new(waveform: Waveform) -> Self {
        Self { waveform }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }
}

impl Kernel for OscillatorNode {
    /// Sine: phase in radians, wrapped to [0, 2π).
    /// Saw: unwrapped phase in cycles.
    type State = f64;

    fn name(&self) -> &str {
        match self.waveform {
            Waveform::Sine => "sin",
            Waveform::Saw => "saw",
        }
    }

    fn description(&self) -> &str {
        match self.waveform {
            Waveform::Sine => "freq sin: sine oscillator, frequency in Hz",
            Waveform::Saw => "freq saw: sawtooth oscillator in [-1, 1), frequency in Hz",
        }
    }

    fn arity(&self) -> usize {
        1
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) -> f64 {
        0.0
    }

    fn tick(&self, inputs: &[&[f32]], i: usize, phase: &mut f64, ctx: &RenderContext) -> f32 {
        let freq = f64::from(inputs[0][i]);
        let period = f64::from(ctx.sample_period);

        // Output is taken before the phase advances, so sample 0 sits at phase 0
        match self.waveform {
            Waveform::Sine => {
                let out = phase.sin();
                *phase = (*phase + TAU * freq * period).rem_euclid(TAU);
                out as f32
            }
            Waveform::Saw => {
                let out = (*phase - phase.floor()) * 2.0 - 1.0;
                *phase += freq * period;
                out as f32
            }
        }
    }
}
