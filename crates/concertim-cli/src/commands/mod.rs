pub mod plan;
pub mod token;
