//! # rpnsynth - Reverse-Polish Signal Language
//!
//! rpnsynth compiles a stream of RPN tokens into a signal-flow graph and
//! renders it, sample by sample, into a mono 16-bit WAV file.
//!
//! ## Core Features
//!
//! - **Stack-Machine Graph Builder**: tokens wire operator nodes together on an operand stack
//! - **Memoized Evaluation**: every node computes its full buffer exactly once
//! - **Stateful Operators**: oscillators and filters keep phase/memory across the clip
//! - **Token-List Macros**: `[ ... ] @name` binds a replayable token range
//! - **Bit-Exact Output**: 44.1 kHz, mono, 16-bit PCM in a standard RIFF/WAVE container
//!
//! ## Quick Start
//!
//! ```rust
//! use rpnsynth::render::render_program;
//!
//! // A4 sine at half volume, one second
//! let rendered = render_program("440 sin 0.5 mul", 1.0).unwrap();
//! assert_eq!(rendered.samples.len(), 44100);
//! assert_eq!(rendered.wav.len(), 44 + 2 * 44100);
//! ```
//!
//! ### Building and Evaluating a Graph by Hand
//!
//! ```rust
//! use rpnsynth::evaluator::Evaluator;
//! use rpnsynth::machine::build;
//! use rpnsynth::operator::RenderContext;
//! use rpnsynth::registry::OperatorRegistry;
//! use rpnsynth::tokenizer::tokenize;
//!
//! let registry = OperatorRegistry::with_builtins();
//! let tokens = tokenize("[ 2 mul ] @double 3 double 5 double add", &Default::default()).unwrap();
//! let root = build(&registry, &tokens).unwrap();
//!
//! let evaluator = Evaluator::new(&registry, RenderContext::from_rate(44100, 4));
//! let out = evaluator.evaluate(&root).unwrap();
//! assert!(out.iter().all(|&x| x == 16.0));
//! ```
//!
//! ## Language
//!
//! - **`1.5`** - Number: push a constant signal
//! - **`add sub mul div`** - Arithmetic on the two top values (`a b sub` is `a - b`)
//! - **`sin saw`** - Oscillators, frequency in Hz from the top of the stack
//! - **`lowpass`** - One-pole filter: `signal cutoff lowpass`
//! - **`adsr`** - Envelope over the whole clip: `attack decay sustain release adsr`
//! - **`time length`** - Elapsed time and clip duration as signals
//! - **`dup`** - Duplicate the top value (shared, computed once)
//! - **`%n`** - Move the value `n` below the top to the top (`%1` swaps)
//! - **`@name`** - Pop the top value into a variable
//! - **`[ ... ]`** - Unexecuted token list, replayed when used
//! - **`# ...`** - Comment to end of line
//!
//! ## Architecture
//!
//! 1. [`tokenizer`] splits the source into words
//! 2. [`machine`] executes the words and builds a [`graph`] of nodes
//! 3. [`evaluator`] computes the root buffer through the [`registry`] kernels in [`nodes`]
//! 4. [`render`] converts the buffer to PCM and frames the WAV file
//!
//! ### Example Programs
//!
//! ```text
//! # Plucked saw through a closing filter
//! 110 saw
//! 4000 time 3 mul neg 12 mul exp mul lowpass
//! 0.01 0.3 0.2 0.5 adsr mul
//!
//! # Vibrato macro applied to two voices
//! [ 5 sin 3 mul add ] @vib
//! 220 vib sin 330 vib sin add 0.4 mul
//! ```

pub mod error;
pub mod evaluator;
pub mod graph;
pub mod machine;
pub mod nodes;
pub mod operator;
pub mod registry;
pub mod render;
pub mod tokenizer;

pub use error::{Error, Result};
