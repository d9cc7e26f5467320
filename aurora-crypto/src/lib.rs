#![forbid(unsafe_code)]

//! Opaque signature primitives and the token wire form (§6).
//!
//! Per spec.md §1, cryptographic novelty is explicitly out of scope: this
//! crate is a thin, boring wrapper around Ed25519 (`ed25519-dalek`, already
//! part of the corpus's crypto stack) and BLAKE3 for the opaque 64-bit
//! content hash. The signature primitive itself is assumed correct (§1); this
//! crate only owns key generation, signing, verification, and the token's
//! wire encoding.

pub mod token;

pub use token::Token;

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use thiserror::Error;

/// Crypto-domain errors. Kept separate from `aurora_core::Error` since every
/// variant here maps to a caller-visible boolean or opaque byte array per
/// §6's interface, not to the engine's control flow.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid key material: {0}")]
    InvalidKey(&'static str),
    #[error("invalid signature encoding")]
    InvalidSignature,
    #[error("token wire form deserialization failed: {0}")]
    Deserialization(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;

/// 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];
/// 64-byte private key: the 32-byte signing seed followed by its 32-byte
/// public key, matching the common NaCl/libsodium "secret key" encoding.
pub type PrivateKey = [u8; 64];
/// 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// Generate a fresh keypair.
pub fn keypair() -> (PublicKey, PrivateKey) {
    let mut rng = rand::rngs::OsRng;
    let signing_key = SigningKey::generate(&mut rng);
    let verifying_key = signing_key.verifying_key();
    let mut private = [0u8; 64];
    private[..32].copy_from_slice(&signing_key.to_bytes());
    private[32..].copy_from_slice(verifying_key.as_bytes());
    (verifying_key.to_bytes(), private)
}

/// Sign `message` with `private_key`.
pub fn sign(private_key: &PrivateKey, message: &[u8]) -> Signature {
    let seed: [u8; 32] = private_key[..32].try_into().expect("slice is 32 bytes");
    let signing_key = SigningKey::from_bytes(&seed);
    signing_key.sign(message).to_bytes()
}

/// Verify `sig` over `message` under `public_key`. Returns `false` (never
/// panics) on malformed key/signature bytes, since §7 treats signature
/// failure as a reportable condition, not a crash.
pub fn verify(public_key: &PublicKey, message: &[u8], sig: &Signature) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(public_key) else {
        return false;
    };
    let signature = ed25519_dalek::Signature::from_bytes(sig);
    verifying_key.verify(message, &signature).is_ok()
}

/// Opaque 64-bit hash, hex-encoded to 16 characters (§6).
pub fn h64(bytes: &[u8]) -> String {
    let digest = blake3::hash(bytes);
    let head: [u8; 8] = digest.as_bytes()[..8].try_into().expect("8 bytes");
    hex_encode(&head)
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_roundtrip() {
        let (pk, sk) = keypair();
        let msg = b"aurora-x payload";
        let sig = sign(&sk, msg);
        assert!(verify(&pk, msg, &sig));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let (pk, sk) = keypair();
        let sig = sign(&sk, b"original");
        assert!(!verify(&pk, b"tampered", &sig));
    }

    #[test]
    fn verify_rejects_wrong_key() {
        let (_pk1, sk1) = keypair();
        let (pk2, _sk2) = keypair();
        let sig = sign(&sk1, b"message");
        assert!(!verify(&pk2, b"message", &sig));
    }

    #[test]
    fn h64_is_16_hex_chars() {
        let h = h64(b"some payload bytes");
        assert_eq!(h.len(), 16);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn h64_is_deterministic() {
        assert_eq!(h64(b"same input"), h64(b"same input"));
        assert_ne!(h64(b"input a"), h64(b"input b"));
    }
}
