pub mod console;
pub mod controls;
pub mod engine;
pub mod stopwatch;

pub use crate::controls::Button;
pub use crate::engine::{observe, Command, Engine, Handle, Observer};
pub use crate::stopwatch::format::format_time;
pub use crate::stopwatch::{Snapshot, Stopwatch};
