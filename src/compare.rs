//! Constant-time comparison of secrets.

use subtle::ConstantTimeEq;

use crate::{HMAC, DIGEST_LEN};

/// Compare two strings without revealing where they differ.
///
/// Strings of different lengths compare unequal immediately, so the length
/// relation is observable through timing. Content is never short-circuited:
/// every byte pair is folded into the result before it is inspected.
pub fn safe_compare(a: impl AsRef<[u8]>, b: impl AsRef<[u8]>) -> bool {
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Check a received hex HMAC-SHA1 against the one computed for `message`.
///
/// Both sides are fixed-size MACs, so unlike [`safe_compare`] nothing about
/// the expected value leaks for well-formed input. Uppercase hex is accepted.
pub fn verify_hmac(key: impl AsRef<[u8]>, message: impl AsRef<[u8]>, expected: &str) -> bool {
    let mut received = [0u8; DIGEST_LEN];
    if hex::decode_to_slice(expected, &mut received).is_err() {
        return false;
    }
    HMAC::mac(message, key)[..].ct_eq(&received[..]).into()
}
