//! SHA256 + base36 ID generation for forms and fields.

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

/// Base36 alphabet (0-9, a-z).
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the hash part of generated ids.
pub const ID_HASH_LENGTH: usize = 8;

/// Prefix for schema ids.
pub const FORM_PREFIX: &str = "form";

/// Prefix for field ids.
pub const FIELD_PREFIX: &str = "field";

/// Converts a byte slice to a base36 string of exactly `length` characters.
///
/// Short results are left-padded with zeros; long ones keep the least
/// significant digits.
pub fn encode_base36(data: &[u8], length: usize) -> String {
    let mut num = BigUint::from_bytes_be(data);
    let base = BigUint::from(36u32);
    let zero = BigUint::zero();

    let mut chars: Vec<u8> = Vec::with_capacity(length);
    while num > zero {
        let rem = &num % &base;
        num /= &base;
        let idx = rem.to_u32_digits();
        let i = if idx.is_empty() { 0 } else { idx[0] as usize };
        chars.push(BASE36_ALPHABET[i]);
    }
    chars.reverse();

    let mut s: String = chars.into_iter().map(char::from).collect();

    if s.len() < length {
        s = "0".repeat(length - s.len()) + &s;
    }
    if s.len() > length {
        s = s[s.len() - length..].to_owned();
    }
    s
}

/// Creates an id like `field_k3x9a2q0` from a timestamp and a nonce.
///
/// The same inputs always produce the same id; callers bump `nonce` to
/// resolve collisions.
pub fn generate_id(prefix: &str, timestamp: DateTime<Utc>, nonce: u32) -> String {
    let content = format!(
        "{}|{}|{}",
        prefix,
        timestamp.timestamp_nanos_opt().unwrap_or(0),
        nonce
    );
    let hash = Sha256::digest(content.as_bytes());
    // 6 bytes = 48 bits ~ 9.3 base36 chars, enough for 8.
    format!("{}_{}", prefix, encode_base36(&hash[..6], ID_HASH_LENGTH))
}

/// Generates an id with `prefix` that `is_taken` does not reject.
pub fn generate_unique_id(
    prefix: &str,
    timestamp: DateTime<Utc>,
    mut is_taken: impl FnMut(&str) -> bool,
) -> String {
    let mut nonce = 0u32;
    loop {
        let id = generate_id(prefix, timestamp, nonce);
        if !is_taken(&id) {
            return id;
        }
        nonce = nonce.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base36_pads_and_truncates() {
        assert_eq!(encode_base36(&[0], 4), "0000");
        assert_eq!(encode_base36(&[35], 3), "00z");
        assert_eq!(encode_base36(&[1, 0], 2), "74"); // 256 = 7*36 + 4
        assert_eq!(encode_base36(&[0xff, 0xff, 0xff], 2).len(), 2);
    }

    #[test]
    fn ids_are_deterministic() {
        let ts = DateTime::parse_from_rfc3339("2024-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let a = generate_id(FIELD_PREFIX, ts, 0);
        let b = generate_id(FIELD_PREFIX, ts, 0);
        let c = generate_id(FIELD_PREFIX, ts, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("field_"));
        assert_eq!(a.len(), "field_".len() + ID_HASH_LENGTH);
    }

    #[test]
    fn unique_id_skips_taken() {
        let ts = Utc::now();
        let first = generate_id(FORM_PREFIX, ts, 0);
        let taken = first.clone();
        let id = generate_unique_id(FORM_PREFIX, ts, |candidate| candidate == taken);
        assert_ne!(id, first);
        assert_eq!(id, generate_id(FORM_PREFIX, ts, 1));
    }
}
