//! Recovery key generation and normalization.
//!
//! A recovery key is 128 bits from the OS CSPRNG, shown to the user once as
//! four groups of eight uppercase hex characters
//! (`XXXXXXXX-XXXXXXXX-XXXXXXXX-XXXXXXXX`). Only its hash persists.

use rand::{RngCore, rngs::OsRng};
use thiserror::Error;

const RECOVERY_KEY_BYTES: usize = 16;
const RECOVERY_KEY_LEN: usize = 32;
const RECOVERY_KEY_GROUP_SIZE: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid recovery key length")]
    Length,
    #[error("invalid recovery key characters")]
    Alphabet,
}

/// Generate a fresh recovery key in grouped display form.
///
/// # Errors
///
/// Returns an error if the generated key cannot be formatted, which only
/// happens if the length constants disagree with each other.
pub fn generate() -> Result<String, Error> {
    let mut rng = OsRng;
    generate_with_rng(&mut rng)
}

fn generate_with_rng<R: RngCore + ?Sized>(rng: &mut R) -> Result<String, Error> {
    let mut raw = [0u8; RECOVERY_KEY_BYTES];
    rng.fill_bytes(&mut raw);
    let normalized: String = raw.iter().map(|byte| format!("{byte:02X}")).collect();
    format_key(&normalized)
}

/// Normalize a user-transcribed recovery key for verification.
///
/// Separators and whitespace are dropped and letters uppercased, so keys
/// survive re-typing from paper.
///
/// # Errors
///
/// Returns an error if the remaining characters are not exactly 32 hex
/// digits.
pub fn normalize(input: &str) -> Result<String, Error> {
    let normalized: String = input
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .collect();

    if normalized.len() != RECOVERY_KEY_LEN {
        return Err(Error::Length);
    }

    if !normalized.bytes().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(Error::Alphabet);
    }

    Ok(normalized)
}

/// Format a normalized recovery key for display.
///
/// # Errors
///
/// Returns an error if the input is not a normalized 32-character key.
pub fn format_key(normalized: &str) -> Result<String, Error> {
    if normalized.len() != RECOVERY_KEY_LEN {
        return Err(Error::Length);
    }
    let mut out = String::with_capacity(RECOVERY_KEY_LEN + 3);
    for (idx, chunk) in normalized
        .as_bytes()
        .chunks(RECOVERY_KEY_GROUP_SIZE)
        .enumerate()
    {
        if idx > 0 {
            out.push('-');
        }
        out.push_str(std::str::from_utf8(chunk).map_err(|_| Error::Alphabet)?);
    }
    Ok(out)
}
