//! ID stamping and generation utilities.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Stamp a client-side ID for an item or comment created under `parent`.
///
/// Timestamp-based rather than random: two creates under the same parent
/// at the same millisecond would have to race to collide.
#[must_use]
pub fn child_id(parent: &str, now: DateTime<Utc>) -> String {
    format!("{parent}_{}", now.timestamp_millis())
}

/// Render a user identity as `"Display Name <unique.name>"`.
#[must_use]
pub fn identity_string(display_name: &str, unique_name: &str) -> String {
    format!("{display_name} <{unique_name}>")
}

/// Generate a store-assigned document ID for a record created with a
/// blank ID.
///
/// SHA-256 over the collection, a caller-supplied seed, and the creation
/// instant, base36-encoded. Hash length grows with collection size; the
/// `exists` closure screens collisions and bumps a nonce on a hit.
pub fn generate_document_id<F>(
    collection: &str,
    seed: &str,
    created_at: DateTime<Utc>,
    document_count: usize,
    exists: F,
) -> String
where
    F: Fn(&str) -> bool,
{
    let mut length = hash_length_for(document_count);

    for nonce in 0..u32::MAX {
        let input = format!(
            "{collection}|{seed}|{}|{nonce}",
            created_at.timestamp_nanos_opt().unwrap_or(0)
        );
        let id = hash_base36(&input, length);
        if !exists(&id) {
            return id;
        }
        // Widen the hash every few collisions.
        if nonce % 8 == 7 && length < 16 {
            length += 1;
        }
    }

    // Unreachable in practice: 2^32 nonces with a growing hash.
    hash_base36(seed, 16)
}

/// Hash length that keeps the collision probability below ~25% for the
/// given population.
#[allow(clippy::cast_precision_loss)]
fn hash_length_for(count: usize) -> usize {
    let n = count as f64;
    for (len, exp) in [(6_usize, 6_i32), (7, 7), (8, 8)] {
        let space = 36_f64.powi(exp);
        let prob = 1.0 - (-n * n / (2.0 * space)).exp();
        if prob < 0.25 {
            return len;
        }
    }
    8
}

fn hash_base36(input: &str, length: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();

    let mut num = 0u128;
    for &byte in digest.iter().take(16) {
        num = (num << 8) | u128::from(byte);
    }

    let mut chars = Vec::new();
    while num > 0 {
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.reverse();

    let encoded: String = chars.into_iter().collect();
    if encoded.len() >= length {
        encoded.chars().take(length).collect()
    } else {
        format!("{encoded:0>length$}")
    }
}
