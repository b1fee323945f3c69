pub mod simulator;

pub use simulator::{decide_failure, ProgressSimulator, SimulatorConfig};
