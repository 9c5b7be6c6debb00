//! PKCE (RFC 7636) helpers for the authorization-code flow

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// 32 random bytes, base64url encoded (43 characters).
pub(crate) fn random_token() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// BASE64URL(SHA256(verifier))
pub fn code_challenge(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Verifier, challenge and CSRF `state` for one login attempt.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// Kept server-side until the code exchange.
    pub code_verifier: String,
    /// Base64url SHA-256 of the verifier.
    pub code_challenge: String,
    /// Random CSRF token.
    pub state: String,
}

impl PkceChallenge {
    /// New random verifier and state.
    pub fn generate() -> Self {
        let code_verifier = random_token();
        let code_challenge = code_challenge(&code_verifier);
        Self { code_verifier, code_challenge, state: random_token() }
    }

    /// Always `S256`.
    pub fn challenge_method(&self) -> &'static str {
        "S256"
    }
}
