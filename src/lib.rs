pub mod catalog;
pub mod engine;
pub mod report;
pub mod sample;
pub mod store;
