// Library target holds the typing engine so the binary, integration tests and
// criterion benches share one module tree. The terminal front end lives in main.rs.

pub mod config;
pub mod engine;
pub mod generator;
pub mod session;
pub mod store;
