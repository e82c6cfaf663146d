//! Answer assembly from validated resolver replies.

pub mod aggregator;
pub mod answer;

pub use aggregator::{ComplexAnswer, ExecutionSummary, ResultAggregator, SimpleAnswer};
pub use answer::BrokerAnswer;
