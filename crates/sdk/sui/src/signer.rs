//! Signer provider for Sui secret keys.
//!
//! Two encodings are accepted, matching what `sui keytool` exports:
//! - Bech32 `suiprivkey1…`
//! - Base64 `flag || private key` (the `sui.keystore` format)

use std::fmt;

use drops_sdk_core::{InvalidKeyError, SecretKey, SigningIdentity};
use sui_types::base_types::SuiAddress;
use sui_types::crypto::{EncodeDecodeBase64, SuiKeyPair};

const BECH32_PREFIX: &str = "suiprivkey";

/// Keypair plus its derived address.
pub struct SuiSigner {
    keypair: SuiKeyPair,
    address: SuiAddress,
}

impl SuiSigner {
    pub fn from_keypair(keypair: SuiKeyPair) -> Self {
        let address = SuiAddress::from(&keypair.public());
        Self { keypair, address }
    }

    pub fn sui_address(&self) -> SuiAddress {
        self.address
    }

    pub(crate) fn keypair(&self) -> &SuiKeyPair {
        &self.keypair
    }
}

impl SigningIdentity for SuiSigner {
    fn address(&self) -> String {
        self.address.to_string()
    }
}

impl fmt::Debug for SuiSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Decode `secret` into a signer.
///
/// The error never echoes the secret.
pub fn get_signer(secret: &SecretKey) -> Result<SuiSigner, InvalidKeyError> {
    let raw = secret.expose().trim();
    if raw.is_empty() {
        return Err(InvalidKeyError::new("secret is empty"));
    }

    let keypair = if raw.starts_with(BECH32_PREFIX) {
        SuiKeyPair::decode(raw)
            .map_err(|_| InvalidKeyError::new("not a valid suiprivkey bech32 string"))?
    } else {
        SuiKeyPair::decode_base64(raw).map_err(|_| {
            InvalidKeyError::new("expected suiprivkey bech32 or base64 flag||key encoding")
        })?
    };

    let signer = SuiSigner::from_keypair(keypair);
    tracing::debug!("Loaded signer for {}", signer.address);
    Ok(signer)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ed25519 flag followed by 32 zero bytes.
    const ZERO_KEY_BASE64: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    #[test]
    fn base64_and_bech32_forms_derive_the_same_address() {
        let from_base64 = get_signer(&SecretKey::new(ZERO_KEY_BASE64)).unwrap();

        let bech32 = from_base64.keypair().encode().unwrap();
        assert!(bech32.starts_with(BECH32_PREFIX));

        let from_bech32 = get_signer(&SecretKey::new(bech32)).unwrap();
        assert_eq!(from_base64.sui_address(), from_bech32.sui_address());
        assert!(from_base64.address().starts_with("0x"));
    }

    #[test]
    fn rejects_malformed_secrets_without_echoing_them() {
        for secret in ["", "   ", "not-a-key", "suiprivkey1notreally", "AAAA"] {
            let err = get_signer(&SecretKey::new(secret)).unwrap_err();
            if !secret.trim().is_empty() {
                assert!(!err.to_string().contains(secret));
            }
        }
    }

    #[test]
    fn debug_output_shows_address_only() {
        let signer = get_signer(&SecretKey::new(ZERO_KEY_BASE64)).unwrap();
        let rendered = format!("{:?}", signer);

        assert!(rendered.contains(&signer.address()));
        assert!(!rendered.contains(ZERO_KEY_BASE64));
    }
}
