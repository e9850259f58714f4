use crate::chain::{SignedTransaction, TxError};

/// Admission checks run before a transaction touches any state
pub struct TxValidator;

impl TxValidator {
    /// Validate a signed transaction against the sender's expected nonce
    ///
    /// This performs:
    /// - Sender address matches the attached public key
    /// - Signature verification over the signing bytes
    /// - Exact nonce match (replay protection)
    pub fn validate(signed: &SignedTransaction, expected_nonce: u64) -> Result<(), TxError> {
        Self::validate_signature(signed)?;

        let got = signed.tx().nonce();
        if got != expected_nonce {
            return Err(TxError::NonceMismatch {
                expected: expected_nonce,
                got,
            });
        }
        Ok(())
    }

    /// Signature and sender checks only, for offline-signed payloads
    pub fn validate_signature(signed: &SignedTransaction) -> Result<(), TxError> {
        let sender = *signed.tx().sender();
        if signed.public_key().address() != sender {
            return Err(TxError::SenderMismatch(sender));
        }
        signed.verify()?;
        Ok(())
    }
}
