pub mod human;
pub mod timer;

pub use human::{HumanMode, TerminalEngine};
pub use timer::TickTimer;
