//! Confirmation codes — 可口述的预订确认码
//!
//! Codes are read to the caller over the phone, so the alphabet drops
//! characters that sound or look alike (0/O, 1/I/L). Uniqueness is checked
//! against the live reservation set at insert time, never assumed.

use rand::Rng;

/// 31 characters; no 0/O, 1/I/L
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Fixed code length
pub const CODE_LEN: usize = 6;

/// Generate one candidate code; the booking transaction re-rolls on
/// collision.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}
