//! Engine: `Sequencer` (ejecución estricta en orden), su builder, la
//! sustitución de argumentos dependientes y el token de cancelación.

pub mod builder;
pub mod cancel;
pub mod core;
mod resolve;

pub use builder::SequencerBuilder;
pub use cancel::CancellationToken;
pub use core::{SequenceAbort, Sequencer};
