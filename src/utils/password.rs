use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::ErrorMessage;

const MAX_PASSWORD_LENGTH: usize = 64;

pub fn hash(password: impl Into<String>) -> Result<String, String> {
    let password = password.into();

    if password.is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(format!(
            "Password must not be longer than {} characters",
            MAX_PASSWORD_LENGTH
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hashed = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();

    Ok(hashed)
}

pub fn compare(password: &str, hashed_password: &str) -> Result<bool, String> {
    if password.is_empty() || password.len() > MAX_PASSWORD_LENGTH {
        return Err(ErrorMessage::WrongCredentials.to_string());
    }

    let parsed_hash = PasswordHash::new(hashed_password).map_err(|e| e.to_string())?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_compare_round_trip() {
        let hashed = hash("correct horse").unwrap();
        assert!(compare("correct horse", &hashed).unwrap());
        assert!(!compare("wrong horse", &hashed).unwrap());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(hash("").is_err());
    }
}
