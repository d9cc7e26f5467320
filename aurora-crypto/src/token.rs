//! Token data model and wire form (§3, §6).

use crate::{sign, verify, h64, Error, PrivateKey, PublicKey, Result, Signature};
use std::time::{SystemTime, UNIX_EPOCH};

/// The single authenticated payload Aurora-X delivers.
///
/// Immutable after construction. `id` is a 64-bit hash (hex-encoded, §3) of
/// `payload ∥ ttl ∥ nonce`; the signature covers `id ∥ payload ∥ expiry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub id: String,
    pub payload: Vec<u8>,
    pub created_ts: u64,
    pub expiry_ts: u64,
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl Token {
    /// Build and sign a new token.
    ///
    /// `ttl_s` is the token's lifetime in seconds from "now"; `nonce` lets
    /// the caller mint distinct ids for identical payload/ttl pairs.
    pub fn new(payload: Vec<u8>, ttl_s: u64, nonce: u64, private_key: &PrivateKey) -> Self {
        let created_ts = now_unix();
        let expiry_ts = created_ts.saturating_add(ttl_s);
        let id = compute_id(&payload, ttl_s, nonce);
        let signature = sign(private_key, &signed_message(&id, &payload, expiry_ts));
        let public_key: PublicKey = private_key[32..]
            .try_into()
            .expect("private key carries its public half");
        Self {
            id,
            payload,
            created_ts,
            expiry_ts,
            public_key,
            signature,
        }
    }

    /// Verify this token's signature against its own embedded public key.
    /// Per §7, an invalid signature does not make the token unusable — the
    /// caller surfaces `sig=BAD` but still treats a successfully decoded
    /// payload as delivered.
    pub fn verify_signature(&self) -> bool {
        verify(
            &self.public_key,
            &signed_message(&self.id, &self.payload, self.expiry_ts),
            &self.signature,
        )
    }

    /// Whether `now` (unix seconds) is past this token's expiry.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.expiry_ts
    }

    /// Encode the length-prefixed little-endian wire form (§6).
    pub fn to_bytes(&self) -> Vec<u8> {
        let id_bytes = self.id.as_bytes();
        let mut out = Vec::with_capacity(
            4 + id_bytes.len() + 4 + self.payload.len() + 8 + 8 + 32 + 64,
        );
        out.extend_from_slice(&(id_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(id_bytes);
        out.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&self.created_ts.to_le_bytes());
        out.extend_from_slice(&self.expiry_ts.to_le_bytes());
        out.extend_from_slice(&self.public_key);
        out.extend_from_slice(&self.signature);
        out
    }

    /// Decode the wire form. Any truncation or length-prefix overrun is a
    /// structural failure and is surfaced (§7), never silently recovered.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(buf);
        let id_len = cur.take_u32()? as usize;
        let id_bytes = cur.take(id_len)?;
        let id = String::from_utf8(id_bytes.to_vec())
            .map_err(|_| Error::Deserialization("token id is not valid utf-8"))?;
        let payload_len = cur.take_u32()? as usize;
        let payload = cur.take(payload_len)?.to_vec();
        let created_ts = cur.take_u64()?;
        let expiry_ts = cur.take_u64()?;
        let public_key: PublicKey = cur.take(32)?.try_into().expect("checked length");
        let signature: Signature = cur.take(64)?.try_into().expect("checked length");
        Ok(Self {
            id,
            payload,
            created_ts,
            expiry_ts,
            public_key,
            signature,
        })
    }
}

fn signed_message(id: &str, payload: &[u8], expiry_ts: u64) -> Vec<u8> {
    let mut msg = Vec::with_capacity(id.len() + payload.len() + 8);
    msg.extend_from_slice(id.as_bytes());
    msg.extend_from_slice(payload);
    msg.extend_from_slice(&expiry_ts.to_le_bytes());
    msg
}

fn compute_id(payload: &[u8], ttl_s: u64, nonce: u64) -> String {
    let mut buf = Vec::with_capacity(payload.len() + 16);
    buf.extend_from_slice(payload);
    buf.extend_from_slice(&ttl_s.to_le_bytes());
    buf.extend_from_slice(&nonce.to_le_bytes());
    h64(&buf)
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Tiny bounds-checked cursor used only by `Token::from_bytes` so a truncated
/// buffer surfaces `Error::Deserialization` rather than panicking on an
/// out-of-bounds slice (§7).
struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(Error::Deserialization("token wire form truncated"))?;
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().expect("checked length")))
    }

    fn take_u64(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().expect("checked length")))
    }
}
