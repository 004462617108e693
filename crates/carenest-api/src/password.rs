use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use carenest_db::validation::validate_password;
use rand_core::OsRng;

use crate::error::{ApiError, ApiResult};

/// Checks the length rule, then hashes with Argon2id and a fresh salt.
/// The plaintext never leaves this function.
pub fn hash_password(password: &str) -> ApiResult<String> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {}", e)))?
        .to_string();
    Ok(hash)
}
