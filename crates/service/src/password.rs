use argon2::{password_hash::{PasswordHasher, SaltString}, Argon2};
use rand::rngs::OsRng;

use crate::errors::ServiceError;

/// Hash a plaintext password into an argon2 PHC string.
pub fn hash_password(plain: &str) -> Result<String, ServiceError> {
    if plain.is_empty() {
        return Err(ServiceError::Validation("password required".into()));
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| ServiceError::Validation(e.to_string()))?
        .to_string();
    Ok(hash)
}
