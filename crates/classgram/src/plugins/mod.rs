//! Plugin implementations
//!
//! The class plugin implements the core traits for class diagrams; the
//! orchestrator wires its pieces into end-to-end conversions.

pub mod class;
pub mod orchestrator;

pub use class::*;
pub use orchestrator::*;
