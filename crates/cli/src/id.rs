//! Short entry ids
//!
//! Ids are six lowercase base-36 characters derived from a SHA-256 of the
//! entry title and a random nonce. Callers check each candidate against the
//! store and ask for another on collision.

use rand::Rng;
use sha2::{Digest, Sha256};

const ID_LENGTH: usize = 6;
const MAX_ATTEMPTS: usize = 10;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Produces candidate ids for one new record
pub struct IdGenerator {
    seed: String,
    attempts: usize,
}

impl IdGenerator {
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            attempts: 0,
        }
    }

    /// Next candidate, or `None` once the attempt budget is spent
    pub fn next_id(&mut self) -> Option<String> {
        if self.attempts >= MAX_ATTEMPTS {
            return None;
        }
        self.attempts += 1;

        let nonce: u64 = rand::rng().random();
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(nonce.to_le_bytes());
        hasher.update(self.attempts.to_le_bytes());
        let digest = hasher.finalize();

        Some(
            digest
                .iter()
                .take(ID_LENGTH)
                .map(|b| ALPHABET[usize::from(*b) % ALPHABET.len()] as char)
                .collect(),
        )
    }
}

/// Readable id for a track name: lowercase words joined by dashes
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
