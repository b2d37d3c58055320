//! Key command - print a private key

use crate::cli::args::KeyArgs;
use crate::config::schema::KeysConfig;
use crate::config::Config;
use crate::error::SecretsResult;
use crate::service::KeyRequest;
use tracing::debug;

/// Execute the key command
pub async fn execute(args: KeyArgs, config: &Config) -> SecretsResult<()> {
    let service = super::service(config).await?;
    let request = request(&args, &config.keys);

    let pem = super::blocking(move || {
        let key = service.load_key(&request)?;
        debug!("Key {:?} fingerprint {}", key, key.fingerprint()?);
        key.to_pkcs8_pem()
    })
    .await?;

    print!("{}", pem);
    Ok(())
}

/// Key request from `args`, with unset options taken from `defaults`
pub(crate) fn request(args: &KeyArgs, defaults: &KeysConfig) -> KeyRequest {
    let mut request = defaults.request(args.subject.as_str());
    if let Some(algorithm) = args.algorithm {
        request.algorithm = algorithm;
    }
    if let Some(length) = args.length {
        request.length = length;
    }
    if let Some(curve) = args.curve {
        request.curve = curve;
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Algorithm, Curve};

    #[test]
    fn flags_override_config() {
        let defaults = KeysConfig {
            algorithm: Algorithm::Ecdsa,
            rsa_length: 2048,
            curve: Curve::P384,
        };
        let args = KeyArgs {
            subject: "example.com".to_string(),
            algorithm: None,
            length: None,
            curve: Some(Curve::P521),
        };

        let request = request(&args, &defaults);
        assert_eq!(request.subject, "example.com");
        assert_eq!(request.algorithm, Algorithm::Ecdsa);
        assert_eq!(request.length, 2048);
        assert_eq!(request.curve, Curve::P521);
    }
}
