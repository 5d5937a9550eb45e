//! Random hex tokens from a cryptographically secure source.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::error::Result;

/// Number of random bytes in a token when the caller has no preference.
pub const DEFAULT_TOKEN_LEN: usize = 32;

/// Generate `length` random bytes from the OS and render them as `2 * length`
/// lowercase hex characters.
pub fn generate_secure_token(length: usize) -> Result<String> {
    generate_token_with(&mut OsRng, length)
}

/// Same as [`generate_secure_token`], drawing from a caller-supplied CSPRNG.
///
/// A failing generator is reported as `Error::RandomnessUnavailable`.
pub fn generate_token_with<R>(rng: &mut R, length: usize) -> Result<String>
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut bytes = vec![0u8; length];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}
