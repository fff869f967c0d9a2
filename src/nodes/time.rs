//! Clock nodes - elapsed time and clip length as signals
//!
//! `time` ramps from 0 at the first sample; `length` is the clip duration
//! broadcast over every sample. Together they drive sweeps such as
//! `time length div 880 mul 110 add sin`.

use crate::operator::{Kernel, RenderContext};

/// Elapsed time in seconds: `time` -> i × T
pub struct TimeNode;

impl Kernel for TimeNode {
    type State = ();

    fn name(&self) -> &str {
        "time"
    }

    fn description(&self) -> &str {
        "time: seconds since the start of the clip"
    }

    fn arity(&self) -> usize {
        0
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, _inputs: &[&[f32]], i: usize, _state: &mut (), ctx: &RenderContext) -> f32 {
        ctx.time_at(i)
    }
}

/// Clip duration in seconds: `length` -> N × T
pub struct LengthNode;

impl Kernel for LengthNode {
    type State = f32;

    fn name(&self) -> &str {
        "length"
    }

    fn description(&self) -> &str {
        "length: duration of the clip in seconds"
    }

    fn arity(&self) -> usize {
        0
    }

    fn init(&self, _inputs: &[&[f32]], ctx: &RenderContext) -> f32 {
        ctx.duration()
    }

    fn tick(&self, _inputs: &[&[f32]], _i: usize, duration: &mut f32, _ctx: &RenderContext) -> f32 {
        *duration
    }
}
