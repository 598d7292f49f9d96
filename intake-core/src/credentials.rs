use crate::error::{IntakeError, IntakeResult};
use crate::model::User;
use crate::storage::IntakeStore;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;
use tracing::{debug, info};

static UNKNOWN_USER_HASH: OnceLock<String> = OnceLock::new();

/// Hash a password using Argon2id with default parameters
pub fn hash_password(password: &str) -> IntakeResult<String> {
    use argon2::password_hash::rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| IntakeError::PasswordHash(format!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against an Argon2id hash
pub fn verify_password(password: &str, password_hash: &str) -> IntakeResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| IntakeError::PasswordHash(format!("Failed to parse password hash: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}

/// Hash verified in place of a stored one when the username is unknown.
/// Computed once with the same parameters as real account hashes.
fn unknown_user_hash() -> IntakeResult<&'static str> {
    if let Some(hash) = UNKNOWN_USER_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password("")?;
    Ok(UNKNOWN_USER_HASH.get_or_init(|| hash))
}

/// The hash a login attempt is checked against: the account's own hash, or
/// the unknown-user hash when no account matched.
fn hash_to_verify(user: Option<&User>) -> IntakeResult<&str> {
    match user {
        Some(user) => Ok(&user.password_hash),
        None => unknown_user_hash(),
    }
}

/// Look up the user matching both username and password.
///
/// Returns `Ok(None)` for an unknown username and for a wrong password alike.
/// Both paths run one Argon2 verification so response time does not reveal
/// whether the account exists.
pub async fn check_credentials<S>(
    store: &S,
    username: &str,
    password: &str,
) -> IntakeResult<Option<User>>
where
    S: IntakeStore + ?Sized,
{
    let user = store.find_user(username).await?;
    let password_matches = verify_password(password, hash_to_verify(user.as_ref())?)?;

    let user = match user {
        Some(user) if password_matches => user,
        Some(_) => {
            debug!(username = %username, "Password mismatch");
            return Ok(None);
        }
        None => {
            debug!(username = %username, "No user with this username");
            return Ok(None);
        }
    };

    info!(user_id = user.id, "Credentials accepted");
    Ok(Some(user))
}
