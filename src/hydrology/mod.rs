//! Drainage: depression filling, flow routing and rivers.

pub mod config;
pub mod flood;
pub mod flow;
pub mod rivers;

pub use config::{AccumulationThresholdConfig, FlowStrategy, RiverStrategy, SteepestDescentConfig};
pub use flow::NO_FLOW;
pub use rivers::RiverClass;
