//! Audio rendering module for offline synthesis
//!
//! Runs the whole pipeline for one program (tokenize, build, evaluate) and
//! frames the root buffer as a 16-bit mono PCM WAV file. Nothing is written
//! until the whole buffer has been computed, so a failing program produces
//! no output bytes at all.

use crate::error::{Error, Result};
use crate::evaluator::Evaluator;
use crate::graph::count_reachable;
use crate::machine::{Limits, Machine};
use crate::operator::RenderContext;
use crate::registry::OperatorRegistry;
use crate::tokenizer::tokenize;
use std::io::{Cursor, Write};
use tracing::{debug, info};

/// Output sample rate in Hz
pub const SAMPLE_RATE: u32 = 44100;

/// Most 16-bit samples a WAV file can hold with a 32-bit RIFF size field
pub const MAX_SAMPLES: u64 = (u32::MAX as u64 - 44) / 2;

/// Configuration for rendering audio
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Duration in seconds
    pub duration: f32,
    /// Program size bounds
    pub limits: Limits,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            duration: 1.0,
            limits: Limits::default(),
        }
    }
}

impl RenderConfig {
    pub fn with_duration(duration: f32) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    /// Number of samples for the configured duration, rounded to nearest
    ///
    /// Durations that are not positive, or too long for a WAV data chunk, are
    /// rejected.
    pub fn sample_count(&self) -> Result<usize> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(Error::InvalidDuration(self.duration));
        }
        let samples = (f64::from(self.sample_rate) * f64::from(self.duration)).round();
        if samples > MAX_SAMPLES as f64 {
            return Err(Error::InvalidDuration(self.duration));
        }
        Ok(samples as usize)
    }
}

/// Result of a successful render
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Root buffer, before PCM conversion
    pub samples: Vec<f32>,
    /// Complete WAV file
    pub wav: Vec<u8>,
    pub stats: RenderStats,
}

/// Renderer for programs
pub struct Renderer {
    config: RenderConfig,
    registry: OperatorRegistry,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self::with_registry(config, OperatorRegistry::with_builtins())
    }

    pub fn with_registry(config: RenderConfig, registry: OperatorRegistry) -> Self {
        Self { config, registry }
    }

    /// Render a program to memory (samples plus encoded WAV)
    pub fn render(&self, source: &str) -> Result<Rendered> {
        let samples = self.render_to_buffer(source)?;
        let wav = encode_wav(&samples, self.config.sample_rate)?;
        let stats = RenderStats::from_samples(&samples, self.config.sample_rate);
        info!(
            samples = stats.sample_count,
            peak = stats.peak,
            rms = stats.rms,
            clipped = stats.clipped,
            "rendered"
        );
        Ok(Rendered {
            samples,
            wav,
            stats,
        })
    }

    /// Render a program and write the WAV file to `out`
    pub fn render_to_writer<W: Write>(&self, source: &str, mut out: W) -> Result<RenderStats> {
        let rendered = self.render(source)?;
        out.write_all(&rendered.wav)?;
        out.flush()?;
        Ok(rendered.stats)
    }

    /// Render a program to its root sample buffer
    pub fn render_to_buffer(&self, source: &str) -> Result<Vec<f32>> {
        let sample_count = self.config.sample_count()?;
        let tokens = tokenize(source, &self.config.limits)?;
        debug!(tokens = tokens.len(), sample_count, "tokenized program");

        let root = Machine::with_limits(&self.registry, self.config.limits).build(&tokens)?;
        debug!(nodes = count_reachable(&root), "graph ready");

        let ctx = RenderContext::from_rate(self.config.sample_rate, sample_count);
        let evaluator = Evaluator::new(&self.registry, ctx);
        let buffer = evaluator.evaluate(&root)?.to_vec();
        debug!(buffers = evaluator.buffers_computed(), "evaluated graph");

        Ok(buffer)
    }
}

/// Render `source` for `duration` seconds with the built-in operators
pub fn render_program(source: &str, duration: f32) -> Result<Rendered> {
    Renderer::new(RenderConfig::with_duration(duration)).render(source)
}

/// Convert a sample to 16-bit PCM: `round(x * 32767)`, wrapping on overflow
///
/// NaN becomes 0. Values beyond ±1 are not clamped; a program that wants
/// clean limiting has to call `clip` itself.
pub fn to_pcm16(x: f32) -> i16 {
    (x * 32767.0).round() as i32 as i16
}

/// Encode mono samples as a 16-bit PCM WAV file (44-byte header + data)
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
    for &sample in samples {
        writer.write_sample(to_pcm16(sample))?;
    }
    writer.finalize()?;

    Ok(cursor.into_inner())
}

/// Statistics about rendered audio
#[derive(Debug, Clone)]
pub struct RenderStats {
    pub duration: f32,
    pub sample_count: usize,
    pub rms: f32,
    pub peak: f32,
    pub dc_offset: f32,
    pub zero_crossings: usize,
    /// Samples outside [-1, 1] or not finite
    pub clipped: usize,
}

impl RenderStats {
    pub fn from_samples(samples: &[f32], sample_rate: u32) -> Self {
        let sample_count = samples.len();
        let n = sample_count.max(1) as f32;

        let sum_squares: f32 = samples.iter().map(|x| x * x).sum();
        let rms = (sum_squares / n).sqrt();

        let peak = samples.iter().map(|x| x.abs()).fold(0.0f32, f32::max);

        let dc_offset = samples.iter().sum::<f32>() / n;

        let zero_crossings = samples
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();

        let clipped = samples
            .iter()
            .filter(|x| !x.is_finite() || x.abs() > 1.0)
            .count();

        Self {
            duration: sample_count as f32 / sample_rate as f32,
            sample_count,
            rms,
            peak,
            dc_offset,
            zero_crossings,
            clipped,
        }
    }

    /// Summary for the terminal; stdout may carry the WAV, so this goes to stderr
    pub fn print_summary(&self) {
        eprintln!("Render Statistics:");
        eprintln!("  Duration:       {:.3} seconds", self.duration);
        eprintln!("  Samples:        {}", self.sample_count);
        eprintln!("  RMS:            {:.3}", self.rms);
        eprintln!("  Peak:           {:.3}", self.peak);
        eprintln!("  DC Offset:      {:.6}", self.dc_offset);
        eprintln!("  Zero Crossings: {}", self.zero_crossings);
        eprintln!("  Clipped:        {}", self.clipped);

        if self.duration > 0.0 {
            let est_freq = self.zero_crossings as f32 / (2.0 * self.duration);
            eprintln!("  Est. Frequency: {est_freq:.1} Hz");
        }
    }
}
