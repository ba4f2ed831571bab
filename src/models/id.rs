use chrono::Utc;
use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Generate an entity id: creation time in milliseconds plus a random
/// base-36 suffix, e.g. `1760791200000_k3j9x0q2m`.
///
/// Uniqueness against existing records is enforced by the store, which
/// regenerates on collision.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}", Utc::now().timestamp_millis(), suffix)
}
