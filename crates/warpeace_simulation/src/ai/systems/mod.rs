//! AI systems

pub mod attack;
pub mod fsm;
pub mod movement;

pub use attack::*;
pub use fsm::*;
pub use movement::*;
