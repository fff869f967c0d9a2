//! Less-than node - comparison operator (a < b returns 1.0, else 0.0)

use crate::operator::{Kernel, RenderContext};

/// Comparison: `a b lt` -> 1.0 when a < b
pub struct LessThanNode;

impl Kernel for LessThanNode {
    type State = ();

    fn name(&self) -> &str {
        "lt"
    }

    fn description(&self) -> &str {
        "a b lt: 1 if a < b else 0"
    }

    fn arity(&self) -> usize {
        2
    }

    fn init(&self, _inputs: &[&[f32]], _ctx: &RenderContext) {}

    fn tick(&self, inputs: &[&[f32]], i: usize, _state: &mut (), _ctx: &RenderContext) -> f32 {
        if inputs[0][i] < inputs[1][i] {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;

    #[test]
    fn test_less_than_node() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![2.0, 2.0, 2.0];
        let ctx = RenderContext::new(1.0 / 44100.0, 3);

        assert_eq!(LessThanNode.apply(&[&a, &b], &ctx), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_nan_compares_false() {
        let a = vec![f32::NAN];
        let b = vec![0.0];
        let ctx = RenderContext::new(1.0 / 44100.0, 1);

        assert_eq!(LessThanNode.apply(&[&a, &b], &ctx), vec![0.0]);
    }
}
