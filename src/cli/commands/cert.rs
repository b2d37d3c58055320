//! Cert command - print a TLS server certificate

use crate::cli::args::CertArgs;
use crate::config::Config;
use crate::error::SecretsResult;
use crate::service::TlsRequest;
use tracing::debug;

/// Execute the cert command
pub async fn execute(args: CertArgs, config: &Config) -> SecretsResult<()> {
    let service = super::service(config).await?;
    let request = request(&args, config);
    let with_key = args.with_key;

    let output = super::blocking(move || {
        let issued = service.tls_certificate(&request)?;
        debug!(
            "Certificate for {} signed by {:?}",
            request.key.subject, issued.key
        );

        let mut output = issued.certificate_pem()?;
        if with_key {
            output.push_str(&issued.key_pem()?);
        }
        Ok(output)
    })
    .await?;

    print!("{}", output);
    Ok(())
}

fn request(args: &CertArgs, config: &Config) -> TlsRequest {
    let key = super::key::request(&args.key, &config.keys);
    let mut request = config.tls.request(key);
    if let Some(organization) = &args.organization {
        request.organization = organization.clone();
    }
    if let Some(valid_at) = args.valid_at {
        request.valid_at = Some(valid_at);
    }
    if let Some(valid_for) = args.valid_for {
        request.valid_for = valid_for;
    }
    request
}
