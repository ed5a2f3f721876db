pub mod calldata;
pub mod chain;
pub mod config;
pub mod enrich;
pub mod registry;
pub mod report;
pub mod rpc;
pub mod scanner;
