//! Token generation and comparison.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use formwork_core::{FormError, FormResult};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Number of random bytes drawn per token.
pub const TOKEN_ENTROPY_BYTES: usize = 32;

/// Length of an encoded token: base64 of a SHA-256 digest.
pub const TOKEN_LENGTH: usize = 44;

/// Generates a fresh token from the operating system's secure random source.
///
/// 32 random bytes are hashed with SHA-256 and the digest is base64-encoded.
/// If the random source fails the error is returned; there is no fallback.
///
/// # Examples
///
/// ```
/// use formwork_csrf::token::{generate_token, TOKEN_LENGTH};
///
/// let token = generate_token().unwrap();
/// assert_eq!(token.len(), TOKEN_LENGTH);
/// ```
pub fn generate_token() -> FormResult<String> {
    generate_token_with(&mut OsRng)
}

/// Generates a token from `rng`.
pub fn generate_token_with<R: RngCore + ?Sized>(rng: &mut R) -> FormResult<String> {
    let mut entropy = [0u8; TOKEN_ENTROPY_BYTES];
    rng.try_fill_bytes(&mut entropy).map_err(|e| {
        tracing::error!(error = %e, "Secure random source unavailable");
        FormError::TokenGeneration(e.to_string())
    })?;

    let digest = Sha256::digest(entropy);
    Ok(STANDARD.encode(digest))
}

/// Compares the cookie token with the submitted token in constant time.
///
/// Both must be present and non-empty.
pub fn compare_token(cookie: Option<&str>, submitted: Option<&str>) -> bool {
    match (cookie, submitted) {
        (Some(cookie), Some(submitted)) if !cookie.is_empty() && !submitted.is_empty() => {
            cookie.as_bytes().ct_eq(submitted.as_bytes()).into()
        }
        _ => false,
    }
}
