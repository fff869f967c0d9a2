//! Whole-buffer operator processing - the kernel abstraction behind every opcode
//!
//! Every signal operator is written as a per-sample transition function over
//! full-duration input buffers. The `Kernel` trait describes that function and
//! its private state; the blanket `Operator` impl turns it into a whole-buffer
//! `apply` that the registry can store behind a `Box<dyn Operator>`.

/// Context passed to every operator when a buffer is computed
///
/// All buffers in one render have the same length, so the context is fixed
/// for the whole evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Seconds per sample (1 / sample rate)
    pub sample_period: f32,

    /// Number of samples in every buffer
    pub sample_count: usize,
}

impl RenderContext {
    /// Create a new render context
    pub fn new(sample_period: f32, sample_count: usize) -> Self {
        Self {
            sample_period,
            sample_count,
        }
    }

    /// Context for `sample_count` samples at `sample_rate` Hz
    pub fn from_rate(sample_rate: u32, sample_count: usize) -> Self {
        Self::new(1.0 / sample_rate as f32, sample_count)
    }

    /// Time in seconds of sample `i`
    pub fn time_at(&self, i: usize) -> f32 {
        i as f32 * self.sample_period
    }

    /// Length of the whole clip in seconds
    pub fn duration(&self) -> f32 {
        self.sample_count as f32 * self.sample_period
    }
}

/// Per-sample transition function with private state
///
/// `init` builds the state once per `apply` call (oscillator phase, filter
/// memory). `tick` is then called for `i = 0..sample_count` in order and may
/// update the state for sample `i + 1`. State is never shared between two
/// graph nodes or two `apply` calls.
pub trait Kernel {
    type State;

    /// Name used in programs (e.g. `"sin"`)
    fn name(&self) -> &str;

    /// One-line description shown in the CLI help
    fn description(&self) -> &str;

    /// Number of input buffers the kernel consumes
    fn arity(&self) -> usize;

    /// Build the initial state for one pass over the buffer
    fn init(&self, inputs: &[&[f32]], ctx: &RenderContext) -> Self::State;

    /// Produce output sample `i`
    fn tick(&self, inputs: &[&[f32]], i: usize, state: &mut Self::State, ctx: &RenderContext)
        -> f32;
}

/// Object-safe operator stored in the registry
pub trait Operator {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn arity(&self) -> usize;

    /// Compute a fresh output buffer of `ctx.sample_count` samples
    ///
    /// `inputs` holds exactly `arity()` buffers, each `ctx.sample_count` long,
    /// in argument order.
    fn apply(&self, inputs: &[&[f32]], ctx: &RenderContext) -> Vec<f32>;
}

impl<K: Kernel> Operator for K {
    fn name(&self) -> &str {
        Kernel::name(self)
    }

    fn description(&self) -> &str {
        Kernel::description(self)
    }

    fn arity(&self) -> usize {
        Kernel::arity(self)
    }

    fn apply(&self, inputs: &[&[f32]], ctx: &RenderContext) -> Vec<f32> {
        debug_assert_eq!(
            inputs.len(),
            Kernel::arity(self),
            "{} requires {} inputs",
            Kernel::name(self),
            Kernel::arity(self)
        );
        debug_assert!(
            inputs.iter().all(|b| b.len() == ctx.sample_count),
            "input buffer length mismatch"
        );

        let mut output = Vec::with_capacity(ctx.sample_count);
        if ctx.sample_count == 0 {
            return output;
        }

        let mut state = self.init(inputs, ctx);
        for i in 0..ctx.sample_count {
            output.push(self.tick(inputs, i, &mut state, ctx));
        }
        output
    }
}
