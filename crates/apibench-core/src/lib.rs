pub mod analysis;
pub mod engine;
pub mod error;
pub mod fixture;
pub mod http;
pub mod orchestrator;
pub mod plan;
pub mod results;
pub mod stats;

pub use error::ApibenchError;
