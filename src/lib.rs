//! Firmware core of a bench checker for 14-pin 74HC logic parts.
//!
//! The operator drops a part into the socket and presses the button. The
//! checker runs every part of its [`TestPlan`](descriptor::TestPlan) against
//! the socket and reports which one, if any, matched.

pub mod checker;
pub mod config;
pub mod debounce;
pub mod descriptor;
pub mod designator;
pub mod engine;
pub mod oracle;
pub mod pins;
pub mod presenter;
pub mod scheduler;
pub mod sequencer;
pub mod sim;
pub mod vectors;

pub use checker::Checker;
pub use descriptor::{ConfigError, IcDescriptor, TestPlan};
pub use designator::Designator;
pub use engine::{GateTestEngine, IcTester};
pub use oracle::{FailureOracle, Verdict};
