pub mod io;
pub mod model;
pub mod validation;

pub use model::BenchPlan;
pub use validation::validate_plan;
