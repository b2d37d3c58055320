//! CLI argument definitions using clap derive

use crate::crypto::{Algorithm, Curve};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// fake-secrets - Synthetic keys and certificates
///
/// Generates private keys and TLS certificates for development and test
/// environments. Equal requests under a fixed seed yield identical output.
#[derive(Parser, Debug)]
#[command(name = "fake-secrets")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "FAKE_SECRETS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for the random generator (0 = seed from the start time)
    #[arg(long, global = true, env = "FAKE_SECRETS_RANDOM_SEED")]
    pub seed: Option<u64>,

    /// Log output format
    #[arg(long, global = true, env = "FAKE_SECRETS_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print a PKCS#8 private key
    Key(KeyArgs),

    /// Print a TLS server certificate
    Cert(CertArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments describing a private key
#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Hostname, IP address or other subject the key belongs to
    pub subject: String,

    /// Key algorithm: RSA, ECDSA or ED25519 (default: from config)
    #[arg(short, long)]
    pub algorithm: Option<Algorithm>,

    /// RSA key length in bits (default: from config)
    #[arg(short, long)]
    pub length: Option<usize>,

    /// ECDSA curve: P-224, P-256, P-384 or P-521 (default: from config)
    #[arg(long)]
    pub curve: Option<Curve>,
}

/// Arguments for the cert command
#[derive(Args, Debug)]
pub struct CertArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Subject organization (default: from config)
    #[arg(short, long)]
    pub organization: Option<String>,

    /// Start of validity as a Unix timestamp (default: now)
    #[arg(long)]
    pub valid_at: Option<i64>,

    /// Validity length in seconds (default: from config)
    #[arg(long)]
    pub valid_for: Option<i64>,

    /// Also print the private key after the certificate
    #[arg(long)]
    pub with_key: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_key() {
        let cli = Cli::parse_from([
            "fake-secrets",
            "key",
            "example.com",
            "--algorithm",
            "ecdsa",
            "--curve",
            "secp384r1",
        ]);
        match cli.command {
            Commands::Key(args) => {
                assert_eq!(args.subject, "example.com");
                assert_eq!(args.algorithm, Some(Algorithm::Ecdsa));
                assert_eq!(args.curve, Some(Curve::P384));
                assert_eq!(args.length, None);
            }
            _ => panic!("expected Key command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_algorithm() {
        let result = Cli::try_parse_from(["fake-secrets", "key", "example.com", "-a", "dsa"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_cert() {
        let cli = Cli::parse_from([
            "fake-secrets",
            "cert",
            "127.0.0.1",
            "--organization",
            "Test Org",
            "--valid-at",
            "1700000000",
            "--with-key",
        ]);
        match cli.command {
            Commands::Cert(args) => {
                assert_eq!(args.key.subject, "127.0.0.1");
                assert_eq!(args.organization.as_deref(), Some("Test Org"));
                assert_eq!(args.valid_at, Some(1_700_000_000));
                assert_eq!(args.valid_for, None);
                assert!(args.with_key);
            }
            _ => panic!("expected Cert command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from([
            "fake-secrets",
            "config",
            "show",
            "--seed",
            "42",
            "--log-format",
            "json",
            "-vv",
        ]);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Show)
            })
        ));
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["fake-secrets", "config", "init", "--force"]);
        match cli.command {
            Commands::Config(args) => {
                assert!(matches!(args.action, Some(ConfigAction::Init { force: true })));
            }
            _ => panic!("expected Config command"),
        }
    }
}
