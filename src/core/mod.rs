pub mod calculator;
pub mod edit;
pub mod filter;
pub mod import;
pub mod log;
pub mod report;
