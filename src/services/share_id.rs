//! Random identifier generation for share links and internal record ids.
//!
//! Share ids are short URL-safe tokens acting as read capabilities:
//! whoever holds one can fetch the configuration it points to. They are
//! random rather than sequential so links cannot be enumerated, and short
//! enough that collisions are possible — the save coordinator absorbs
//! those with a bounded retry loop instead of this module guaranteeing
//! uniqueness.

use rand::Rng;

/// URL-safe alphabet for public share ids (64 symbols).
const SHARE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Alphabet for the random part of internal record ids.
const RECORD_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Prefix distinguishing internal record ids from share ids at a glance.
const RECORD_ID_PREFIX: &str = "cfg_";

/// Length of the random part of internal record ids.
const RECORD_ID_RANDOM_LEN: usize = 24;

/// Source of fresh identifiers for the save coordinator.
///
/// Both operations are infallible: drawing an identifier never errors,
/// it just may later collide on insert. The trait exists so tests can
/// script the exact identifiers the coordinator sees.
pub trait IdSource {
    /// Draw a fresh public share id.
    fn next_share_id(&self) -> String;

    /// Draw a fresh internal record id (`cfg_` + random suffix).
    fn next_record_id(&self) -> String;
}

/// Production identifier source backed by the thread-local CSPRNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomIds {
    share_id_length: usize,
}

impl RandomIds {
    pub fn new(share_id_length: usize) -> Self {
        Self { share_id_length }
    }
}

impl IdSource for RandomIds {
    fn next_share_id(&self) -> String {
        random_token(SHARE_ALPHABET, self.share_id_length)
    }

    fn next_record_id(&self) -> String {
        let mut id = String::with_capacity(RECORD_ID_PREFIX.len() + RECORD_ID_RANDOM_LEN);
        id.push_str(RECORD_ID_PREFIX);
        id.push_str(&random_token(RECORD_ALPHABET, RECORD_ID_RANDOM_LEN));
        id
    }
}

/// Uniformly sample `len` symbols from `alphabet`.
///
/// `random_range` rejects rather than folds out-of-range values, so every
/// symbol is equally likely regardless of alphabet size.
fn random_token(alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn share_ids_have_configured_length_and_alphabet() {
        let ids = RandomIds::new(12);
        for _ in 0..100 {
            let share_id = ids.next_share_id();
            assert_eq!(share_id.len(), 12);
            assert!(
                share_id.bytes().all(|b| SHARE_ALPHABET.contains(&b)),
                "unexpected symbol in {share_id}"
            );
        }
    }

    #[test]
    fn share_id_length_is_tunable() {
        let ids = RandomIds::new(10);
        assert_eq!(ids.next_share_id().len(), 10);
    }

    #[test]
    fn record_ids_are_prefixed_and_lowercase() {
        let ids = RandomIds::new(12);
        for _ in 0..100 {
            let record_id = ids.next_record_id();
            let suffix = record_id.strip_prefix("cfg_").expect("cfg_ prefix");
            assert_eq!(suffix.len(), 24);
            assert!(suffix.bytes().all(|b| RECORD_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn draws_are_practically_distinct() {
        // 12 symbols over a 64-symbol alphabet; 10k draws colliding would
        // indicate a broken random source, not bad luck.
        let ids = RandomIds::new(12);
        let drawn: HashSet<String> = (0..10_000).map(|_| ids.next_share_id()).collect();
        assert_eq!(drawn.len(), 10_000);
    }
}
