//! Platform abstraction layer
//!
//! The pieces of the host loop the simulation does not own:
//! - Input: held / pressed-this-tick key state and the pointer
//! - Time: fixed timestep accumulator

pub mod input;
pub mod time;

pub use input::{InputState, Key};
pub use time::FixedStep;
