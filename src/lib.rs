pub mod error;
pub mod program;
pub mod tape;
pub mod sink;
pub mod machine;
pub mod check;
pub mod bench;

pub use error::{Error, SyntaxError};
pub use machine::{Machine, MachineConfig, interpret};
pub use sink::{IoSink, Sink};
pub use tape::BoundsPolicy;
