pub mod errors;
pub mod validation;
pub mod db;

pub mod location;
pub mod category;
pub mod user;
pub mod user_location;
pub mod advertisement;

#[cfg(test)]
mod tests;
