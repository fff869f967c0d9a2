//! Built-in operator kernels
//!
//! One kernel per file, each implementing [`Kernel`](crate::operator::Kernel).
//! The registry installs all of them at startup in the order listed by
//! [`builtins`].
//!
//! ## Math Nodes (combine signals)
//! - [`addition::AdditionNode`] - `add`
//! - [`subtraction::SubtractionNode`] - `sub`
//! - [`multiplication::MultiplicationNode`] - `mul`
//! - [`division::DivisionNode`] - `div`
//! - [`absolute::AbsoluteNode`] - `abs`
//! - [`invert::InvertNode`] - `neg`
//!
//! ## Logic Nodes (0/1 gates)
//! - [`greater_than::GreaterThanNode`] - `gt`
//! - [`less_than::LessThanNode`] - `lt`
//! - [`not::NotNode`] - `not`
//!
//! ## Shaping Nodes
//! - [`clip::ClipNode`] - `clip`
//! - [`log::LogNode`] - `log` (ratio to semitones)
//! - [`exp::ExpNode`] - `exp` (semitones to ratio)
//!
//! ## Synthesis Nodes (stateful)
//! - [`oscillator::OscillatorNode`] - `sin`, `saw`
//! - [`one_pole_filter::OnePoleFilterNode`] - `lowpass`
//! - [`adsr::ADSRNode`] - `adsr`
//!
//! ## Clock Nodes (no inputs)
//! - [`time::TimeNode`] - `time`
//! - [`time::LengthNode`] - `length`

pub mod absolute;
pub mod addition;
pub mod adsr;
pub mod clip;
pub mod division;
pub mod exp;
pub mod greater_than;
pub mod invert;
pub mod less_than;
pub mod log;
pub mod multiplication;
pub mod not;
pub mod one_pole_filter;
pub mod oscillator;
pub mod subtraction;
pub mod time;

pub use absolute::AbsoluteNode;
pub use addition::AdditionNode;
pub use adsr::ADSRNode;
pub use clip::ClipNode;
pub use division::DivisionNode;
pub use exp::ExpNode;
pub use greater_than::GreaterThanNode;
pub use invert::InvertNode;
pub use less_than::LessThanNode;
pub use log::LogNode;
pub use multiplication::MultiplicationNode;
pub use not::NotNode;
pub use one_pole_filter::OnePoleFilterNode;
pub use oscillator::{OscillatorNode, Waveform};
pub use subtraction::SubtractionNode;
pub use time::{LengthNode, TimeNode};

use crate::operator::Operator;

/// Every built-in operator, in help-listing order
pub fn builtins() -> Vec<Box<dyn Operator>> {
    vec![
        Box::new(AdditionNode),
        Box::new(SubtractionNode),
        Box::new(MultiplicationNode),
        Box::new(DivisionNode),
        Box::new(AbsoluteNode),
        Box::new(InvertNode),
        Box::new(GreaterThanNode),
        Box::new(LessThanNode),
        Box::new(NotNode),
        Box::new(ClipNode),
        Box::new(LogNode),
        Box::new(ExpNode),
        Box::new(OscillatorNode::new(Waveform::Sine)),
        Box::new(OscillatorNode::new(Waveform::Saw)),
        Box::new(OnePoleFilterNode),
        Box::new(ADSRNode),
        Box::new(TimeNode),
        Box::new(LengthNode),
    ]
}
