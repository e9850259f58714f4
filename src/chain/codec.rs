use crate::chain::SignedTransaction;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to encode transaction: {0}")]
    EncodeError(String),

    #[error("Failed to decode transaction: {0}")]
    DecodeError(String),

    #[error("Invalid hex string: {0}")]
    InvalidHex(String),

    #[error("Invalid base64 string: {0}")]
    InvalidBase64(String),
}

/// Wire encoding for signed transactions (offline signing, later submission)
pub struct TxCodec;

impl TxCodec {
    pub fn encode(signed: &SignedTransaction) -> Result<Vec<u8>, CodecError> {
        postcard::to_allocvec(signed).map_err(|e| CodecError::EncodeError(e.to_string()))
    }

    pub fn decode(bytes: &[u8]) -> Result<SignedTransaction, CodecError> {
        postcard::from_bytes(bytes).map_err(|e| CodecError::DecodeError(e.to_string()))
    }

    pub fn encode_hex(signed: &SignedTransaction) -> Result<String, CodecError> {
        Ok(hex::encode(Self::encode(signed)?))
    }

    pub fn decode_hex(hex_str: &str) -> Result<SignedTransaction, CodecError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|e| CodecError::InvalidHex(e.to_string()))?;
        Self::decode(&bytes)
    }

    /// URL-safe base64 without padding
    pub fn encode_base64(signed: &SignedTransaction) -> Result<String, CodecError> {
        Ok(URL_SAFE_NO_PAD.encode(Self::encode(signed)?))
    }

    pub fn decode_base64(b64_str: &str) -> Result<SignedTransaction, CodecError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(b64_str.trim())
            .map_err(|e| CodecError::InvalidBase64(e.to_string()))?;
        Self::decode(&bytes)
    }
}
