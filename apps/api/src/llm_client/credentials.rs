use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

/// Immutable list of provider API keys loaded once at startup.
///
/// Selection is uniform and uncoordinated: no health tracking, no fallback to
/// another key when a call fails. The random source is passed in so tests can
/// seed it.
#[derive(Clone)]
pub struct CredentialPool {
    keys: Arc<[String]>,
}

impl CredentialPool {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys: keys.into() }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Picks one key at random, or `None` when no keys are configured.
    pub fn pick<'a, R: Rng + ?Sized>(&'a self, rng: &mut R) -> Option<&'a str> {
        self.keys.choose(rng).map(String::as_str)
    }
}

impl fmt::Debug for CredentialPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPool")
            .field("keys", &format_args!("<{} redacted>", self.keys.len()))
            .finish()
    }
}
