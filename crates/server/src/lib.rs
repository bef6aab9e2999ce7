pub mod errors;
pub mod state;
pub mod guard;
pub mod routes;
pub mod openapi;
pub mod startup;

pub use startup::run_until;
