//! Congestion cost estimation engine.
//!
//! Single-threaded and stateless between runs: samples go in, one immutable
//! [`AnalysisResult`](types::AnalysisResult) comes out. I/O belongs to the
//! store; rendering belongs to the report collaborators.

pub mod aggregate;
pub mod emission;
pub mod fuel;
pub mod productivity;
pub mod types;
