//! RFC 7468 text encoding

use crate::error::{SecretsError, SecretsResult};
use pem_rfc7468::LineEnding;

/// Encode DER bytes as a PEM block with the given label
pub fn encode(label: &str, der: &[u8]) -> SecretsResult<String> {
    pem_rfc7468::encode_string(label, LineEnding::LF, der)
        .map_err(|e| SecretsError::Encoding(e.to_string()))
}

/// Encode a DER certificate as a `CERTIFICATE` PEM block
pub fn certificate(der: &[u8]) -> SecretsResult<String> {
    encode("CERTIFICATE", der)
}

/// Decode a single PEM block, requiring the given label
pub fn decode(label: &str, text: &str) -> SecretsResult<Vec<u8>> {
    let (found, der) = pem_rfc7468::decode_vec(text.trim().as_bytes())
        .map_err(|e| SecretsError::Encoding(e.to_string()))?;

    if found != label {
        return Err(SecretsError::Encoding(format!(
            "expected a {label} block, found {found}"
        )));
    }
    Ok(der)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_block_is_labelled() {
        let pem = certificate(&[0x30, 0x03, 0x02, 0x01, 0x01]).unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----\n"));
        assert!(pem.trim_end().ends_with("-----END CERTIFICATE-----"));
    }

    #[test]
    fn decode_checks_the_label() {
        let der = [0x30, 0x03, 0x02, 0x01, 0x01];
        let pem = certificate(&der).unwrap();

        assert_eq!(decode("CERTIFICATE", &pem).unwrap(), der);
        assert!(matches!(
            decode("PRIVATE KEY", &pem),
            Err(SecretsError::Encoding(_))
        ));
        assert!(decode("CERTIFICATE", "not pem").is_err());
    }
}
