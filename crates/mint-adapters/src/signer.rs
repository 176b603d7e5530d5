//! Firmante respaldado por el fichero de frase secreta (`.secret`).
//!
//! La frase nunca sale de aquí: el core recibe un `SignerHandle` con la
//! cuenta emisora y un `key_id` derivado (prefijo blake3 de la frase). La
//! firma real es responsabilidad del `ChainClient` que conozca el secreto.
use std::fmt;
use std::path::Path;

use mint_core::{SignerHandle, SignerProvider};
use mint_domain::Address;

use crate::error::AdapterError;

const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

pub struct MnemonicSigner {
    phrase: String,
    account: Address,
}

impl MnemonicSigner {
    pub fn new(phrase: &str, account: Address) -> Result<Self, AdapterError> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if !VALID_WORD_COUNTS.contains(&words.len()) {
            return Err(AdapterError::InvalidSecret(format!("expected 12, 15, 18, 21 or 24 words, got {}", words.len())));
        }
        if words.iter().any(|w| !w.chars().all(|c| c.is_ascii_lowercase())) {
            return Err(AdapterError::InvalidSecret("words must be lowercase ascii".into()));
        }
        Ok(Self { phrase: words.join(" "),
                  account })
    }

    /// Lee el fichero (recortando espacios), como hace truffle con `.secret`.
    pub fn from_file(path: impl AsRef<Path>, account: Address) -> Result<Self, AdapterError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| AdapterError::io(path, e))?;
        Self::new(raw.trim(), account)
    }

    pub fn key_id(&self) -> String {
        let digest = blake3::hash(self.phrase.as_bytes()).to_hex();
        digest[..16].to_string()
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split(' ').count()
    }
}

impl SignerProvider for MnemonicSigner {
    fn handle(&self) -> SignerHandle {
        SignerHandle::new(self.account.clone(), self.key_id())
    }
}

impl fmt::Debug for MnemonicSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MnemonicSigner")
         .field("account", &self.account)
         .field("phrase", &"<redacted>")
         .finish()
    }
}
