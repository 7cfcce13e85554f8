//! Wallet signing and CLOB authentication.
//!
//! The gateway owns one lazily-created signer (see
//! [`crate::execution::ClobGateway`]); everything here operates on a signer
//! reference so nothing global is kept.

use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use polymarket_client_sdk::clob::types::SignatureType;
use tracing::debug;

use crate::error::GatewayError;

/// Convert a config signature type to the SDK type.
///
/// - 0: EOA (Externally Owned Account), the default
/// - 1: Magic.link proxy wallet
/// - 2: Gnosis Safe multi-sig
pub fn signature_mode(sig_type: u8) -> SignatureType {
    match sig_type {
        1 => SignatureType::Proxy,
        2 => SignatureType::GnosisSafe,
        _ => SignatureType::Eoa,
    }
}

/// Create a signer from a hex-encoded private key, with or without the `0x`
/// prefix.
pub fn create_signer(private_key: &str) -> Result<PrivateKeySigner, GatewayError> {
    let key = private_key.strip_prefix("0x").unwrap_or(private_key);
    let bytes = hex::decode(key)
        .map_err(|e| GatewayError::Signing(format!("invalid private key hex: {e}")))?;

    if bytes.len() != 32 {
        return Err(GatewayError::Signing(format!(
            "private key must be 32 bytes, got {}",
            bytes.len()
        )));
    }

    let mut key_bytes = [0u8; 32];
    key_bytes.copy_from_slice(&bytes);

    PrivateKeySigner::from_bytes(&key_bytes.into())
        .map_err(|e| GatewayError::Signing(format!("failed to create signer: {e}")))
}

/// Checksummed wallet address of a signer.
pub fn address_of(signer: &PrivateKeySigner) -> String {
    format!("{:?}", signer.address())
}

/// Wallet address derived directly from a private key (diagnostics).
pub fn address_from_private_key(private_key: &str) -> Result<String, GatewayError> {
    Ok(address_of(&create_signer(private_key)?))
}

/// Sign an arbitrary message.
pub async fn sign_message(
    signer: &PrivateKeySigner,
    message: &[u8],
) -> Result<Vec<u8>, GatewayError> {
    let signature = signer
        .sign_message(message)
        .await
        .map_err(|e| GatewayError::Signing(format!("failed to sign message: {e}")))?;
    Ok(signature.as_bytes().to_vec())
}

/// Generate CLOB L2 authentication headers by signing a timestamp.
pub async fn auth_headers(
    signer: &PrivateKeySigner,
) -> Result<Vec<(String, String)>, GatewayError> {
    let address = address_of(signer);
    let timestamp = chrono::Utc::now().timestamp_millis().to_string();
    let message = format!("polymarket:{timestamp}");

    let signature = signer
        .sign_message(message.as_bytes())
        .await
        .map_err(|e| GatewayError::Signing(format!("failed to sign auth message: {e}")))?;

    debug!(address = %address, "generated auth headers");

    Ok(vec![
        ("POLY_ADDRESS".to_string(), address),
        (
            "POLY_SIGNATURE".to_string(),
            format!("0x{}", hex::encode(signature.as_bytes())),
        ),
        ("POLY_TIMESTAMP".to_string(), timestamp),
        ("POLY_NONCE".to_string(), "0".to_string()),
    ])
}
