//! 时间戳、ID 生成、电话号码规范化与指纹

use sha2::{Digest, Sha256};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms, collision-free at booking scale)
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    (ts << 12) | rand_bits
}

/// Normalize a phone number to canonical international form.
///
/// Strips separators (spaces, dashes, dots, parens), converts a `00` prefix
/// to `+`, and keeps a single leading `+` if present. Returns `None` when
/// the result is not 7–15 digits (E.164 bounds).
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let mut has_plus = false;
    let mut digits = String::with_capacity(trimmed.len());

    for (i, c) in trimmed.chars().enumerate() {
        match c {
            '+' if i == 0 => has_plus = true,
            '0'..='9' => digits.push(c),
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return None,
        }
    }

    // 00 国际前缀 → +
    if !has_plus && digits.starts_with("00") {
        has_plus = true;
        digits = digits[2..].to_string();
    }

    if digits.len() < 7 || digits.len() > 15 {
        return None;
    }

    if has_plus {
        Some(format!("+{digits}"))
    } else {
        Some(digits)
    }
}

/// One-way fingerprint of a normalized phone number.
///
/// Customers are keyed by this value so lookups never need the number in a
/// directly matchable column. Input must already be canonical — fingerprints
/// of "+34 600..." and "+34600..." must agree.
pub fn phone_fingerprint(normalized_phone: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized_phone.as_bytes());
    hex::encode(hasher.finalize())
}
