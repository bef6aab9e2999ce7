pub mod types;
pub mod utils;
pub mod env;
pub mod json;
