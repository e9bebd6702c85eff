//! NEAR ed25519 key strings.

use ed25519_dalek::SigningKey;

use crate::error::BridgeError;

pub const ED25519_PREFIX: &str = "ed25519:";

fn strip_prefix(raw: &str) -> &str {
    raw.strip_prefix(ED25519_PREFIX).unwrap_or(raw)
}

/// Parse a NEAR secret key, with or without the `ed25519:` prefix.
///
/// Accepts a base58 32-byte seed or the 64-byte `seed || public key` layout.
pub fn parse_secret_key(raw: &str) -> Result<SigningKey, BridgeError> {
    let bytes = bs58::decode(strip_prefix(raw.trim()))
        .into_vec()
        .map_err(|e| BridgeError::InvalidConfig(format!("invalid base58 key: {}", e)))?;

    match bytes.len() {
        32 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&bytes);
            Ok(SigningKey::from_bytes(&seed))
        }
        64 => {
            let mut keypair = [0u8; 64];
            keypair.copy_from_slice(&bytes);
            SigningKey::from_keypair_bytes(&keypair)
                .map_err(|e| BridgeError::InvalidConfig(format!("inconsistent key pair: {}", e)))
        }
        n => Err(BridgeError::InvalidConfig(format!("unexpected key length {}", n))),
    }
}

/// Public half embedded in a 64-byte secret key, whether or not it matches the seed.
pub fn claimed_public_key(raw: &str) -> Option<String> {
    let bytes = bs58::decode(strip_prefix(raw.trim())).into_vec().ok()?;
    (bytes.len() == 64).then(|| encode_public_key(&bytes[32..]))
}

/// `ed25519:<base58>` rendering of a public key.
pub fn encode_public_key(bytes: &[u8]) -> String {
    format!("{}{}", ED25519_PREFIX, bs58::encode(bytes).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_layouts() {
        let key = SigningKey::from_bytes(&[9u8; 32]);
        let mut full = [9u8; 32].to_vec();
        full.extend_from_slice(&key.verifying_key().to_bytes());

        let from_full = parse_secret_key(&format!("ed25519:{}", bs58::encode(&full).into_string())).unwrap();
        let from_seed = parse_secret_key(&bs58::encode([9u8; 32]).into_string()).unwrap();
        assert_eq!(from_full.to_bytes(), from_seed.to_bytes());
    }

    #[test]
    fn test_mismatched_pair_rejected_but_public_key_claimed() {
        let mut full = [1u8; 32].to_vec();
        full.extend_from_slice(&[2u8; 32]);
        let raw = bs58::encode(&full).into_string();
        assert!(parse_secret_key(&raw).is_err());
        assert_eq!(
            claimed_public_key(&raw),
            Some(encode_public_key(&[2u8; 32]))
        );
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_secret_key("ed25519:0OIl").is_err());
        assert!(parse_secret_key(&bs58::encode([1u8; 10]).into_string()).is_err());
    }
}
