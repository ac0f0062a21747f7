//! Configuration settings for multidigest
//!
//! Defines the CLI arguments, the digest algorithm set and the session
//! configuration with its defaults and validation.

use crate::error::{DigestError, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of bytes read per block (1 MiB)
pub const DEFAULT_BLOCK_SIZE: usize = 1024 * 1024;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 8;

/// Default report field separator
pub const DEFAULT_SEPARATOR: &str = ",";

/// multidigest - single-pass multi-algorithm file hashing
#[derive(Parser, Debug, Clone)]
#[command(name = "multidigest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hash files with several algorithms in a single read")]
#[command(long_about = r#"
multidigest reads each file exactly once, one block at a time, feeding every
block to all requested digest algorithms. It also records a byte histogram
and reports the Shannon entropy of each file. Several files are hashed at
once by a bounded pool of worker threads; the report keeps input order.

Examples:
  multidigest a.iso b.iso                       # MD5, SHA1, SHA256, SHA512
  multidigest -a sha256 -a blake3 --tab *.bin   # Selected algorithms, TSV
  multidigest -t 2 -b 64K --format json big.img
"#)]
pub struct CliArgs {
    /// One or more files to hash
    #[arg(value_name = "FILENAME", required = true, num_args = 1..)]
    pub filenames: Vec<PathBuf>,

    /// Maximum number of files hashed at once
    #[arg(short = 't', long, default_value_t = DEFAULT_THREADS, value_name = "N")]
    pub threads: usize,

    /// Digest algorithms, in report column order
    #[arg(short = 'a', long = "algorithm", value_enum, value_delimiter = ',',
          value_name = "ALGO", default_values_t = DigestAlgorithm::defaults())]
    pub algorithms: Vec<DigestAlgorithm>,

    /// Bytes read from a file at once (e.g., 64K, 1M)
    #[arg(short = 'b', long, default_value = "1M", value_name = "SIZE")]
    pub block_size: String,

    /// Tab separated output
    #[arg(long)]
    pub tab: bool,

    /// Field separator for text output
    #[arg(short = 's', long, default_value = DEFAULT_SEPARATOR, value_name = "STR")]
    pub separator: String,

    /// Output format for the report
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show progress bars on stderr
    #[arg(short = 'p', long)]
    pub progress: bool,

    /// Verbose logging (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Digest algorithm applied to every block of a file
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// MD5 (128-bit)
    #[value(name = "md5")]
    Md5,
    /// SHA-1 (160-bit)
    #[value(name = "sha1")]
    Sha1,
    /// SHA-224
    #[value(name = "sha224")]
    Sha224,
    /// SHA-256
    #[value(name = "sha256")]
    Sha256,
    /// SHA-384
    #[value(name = "sha384")]
    Sha384,
    /// SHA-512
    #[value(name = "sha512")]
    Sha512,
    /// BLAKE3 (256-bit output)
    #[value(name = "blake3")]
    Blake3,
    /// XXHash3 128-bit, non-cryptographic
    #[value(name = "xxhash3")]
    XXHash3,
    /// XXHash64 with seed 0, non-cryptographic
    #[value(name = "xxhash64")]
    XXHash64,
}

impl DigestAlgorithm {
    /// The default algorithm list: MD5, SHA1, SHA256, SHA512
    pub fn defaults() -> Vec<Self> {
        vec![Self::Md5, Self::Sha1, Self::Sha256, Self::Sha512]
    }

    /// Lowercase algorithm name as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Blake3 => "blake3",
            Self::XXHash3 => "xxhash3",
            Self::XXHash64 => "xxhash64",
        }
    }

    /// Report header column for this algorithm
    pub fn column_name(&self) -> String {
        self.name().to_uppercase()
    }

    /// Get the output size in bytes
    pub fn output_size(&self) -> usize {
        match self {
            Self::Md5 => 16,
            Self::Sha1 => 20,
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
            Self::Blake3 => 32,
            Self::XXHash3 => 16,
            Self::XXHash64 => 8,
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Output format for reports
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Separator-joined text lines
    #[default]
    Text,
    /// JSON document
    Json,
}

/// Runtime configuration for a hashing session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Files to hash, in report order
    pub filenames: Vec<PathBuf>,
    /// Algorithms, in report column order
    pub algorithms: Vec<DigestAlgorithm>,
    /// Bytes read per block
    pub block_size: usize,
    /// Report field separator
    pub separator: String,
    /// Maximum number of concurrent workers
    pub threads: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            filenames: Vec::new(),
            algorithms: DigestAlgorithm::defaults(),
            block_size: DEFAULT_BLOCK_SIZE,
            separator: DEFAULT_SEPARATOR.to_string(),
            threads: DEFAULT_THREADS,
        }
    }
}

impl SessionConfig {
    /// Create a config for the given files with default settings
    pub fn for_files<I, P>(filenames: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            filenames: filenames.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Check the configuration and collapse duplicate algorithms.
    ///
    /// The first occurrence of an algorithm keeps its column position.
    pub fn validate(mut self) -> Result<Self> {
        if self.block_size == 0 {
            return Err(DigestError::config("block size must be a positive integer"));
        }
        if self.threads == 0 {
            return Err(DigestError::config("worker count must be a positive integer"));
        }
        if self.algorithms.is_empty() {
            return Err(DigestError::config("at least one digest algorithm is required"));
        }

        let mut seen = Vec::with_capacity(self.algorithms.len());
        self.algorithms.retain(|algo| {
            if seen.contains(algo) {
                false
            } else {
                seen.push(*algo);
                true
            }
        });

        Ok(self)
    }

    /// Create config from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        let block_size = parse_size(&args.block_size)? as usize;
        let separator = if args.tab {
            "\t".to_string()
        } else {
            args.separator.clone()
        };

        Self {
            filenames: args.filenames.clone(),
            algorithms: args.algorithms.clone(),
            block_size,
            separator,
            threads: args.threads,
        }
        .validate()
    }
}

/// Binary size suffixes, longest first so `KB` wins over `B`
const SIZE_SUFFIXES: [(&str, u64); 9] = [
    ("TB", 1 << 40),
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
    ("T", 1 << 40),
    ("G", 1 << 30),
    ("M", 1 << 20),
    ("K", 1 << 10),
    ("B", 1),
];

/// Parse a human-readable size (`4096`, `64K`, `1.5MB`) to bytes.
///
/// Sizes that do not fit in memory addressing (`usize`) are rejected.
pub fn parse_size(size: &str) -> Result<u64> {
    let size = size.trim().to_uppercase();
    if size.is_empty() {
        return Err(DigestError::InvalidSize("empty size string".to_string()));
    }

    let (number, multiplier) = SIZE_SUFFIXES
        .iter()
        .find_map(|(suffix, mult)| size.strip_suffix(suffix).map(|n| (n, *mult)))
        .unwrap_or((size.as_str(), 1));

    let number: f64 = number
        .trim()
        .parse()
        .map_err(|_| DigestError::InvalidSize(format!("invalid number: {}", number)))?;
    if !number.is_finite() || number < 0.0 {
        return Err(DigestError::InvalidSize(format!("invalid number: {}", number)));
    }

    let bytes = number * multiplier as f64;
    if bytes >= usize::MAX as f64 {
        return Err(DigestError::InvalidSize(format!("{} is too large", size)));
    }

    Ok(bytes as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1K").unwrap(), 1024);
        assert_eq!(parse_size("64kb").unwrap(), 64 * 1024);
        assert_eq!(parse_size("1M").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1G").unwrap(), 1024 * 1024 * 1024);
        assert_eq!(parse_size("1.5M").unwrap(), (1.5 * 1024.0 * 1024.0) as u64);
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-4K").is_err());
        assert_eq!(parse_size("64T").unwrap(), 64 << 40);
        assert!(matches!(parse_size("99999999999999999999T"), Err(DigestError::InvalidSize(_))));
        assert!(matches!(parse_size("1e30"), Err(DigestError::InvalidSize(_))));
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.block_size, 1_048_576);
        assert_eq!(config.separator, ",");
        assert_eq!(config.threads, 8);
        assert_eq!(
            config.algorithms,
            vec![
                DigestAlgorithm::Md5,
                DigestAlgorithm::Sha1,
                DigestAlgorithm::Sha256,
                DigestAlgorithm::Sha512
            ]
        );
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let zero_block = SessionConfig { block_size: 0, ..Default::default() };
        assert!(matches!(zero_block.validate(), Err(DigestError::ConfigError(_))));

        let zero_threads = SessionConfig { threads: 0, ..Default::default() };
        assert!(matches!(zero_threads.validate(), Err(DigestError::ConfigError(_))));

        let no_algos = SessionConfig { algorithms: Vec::new(), ..Default::default() };
        assert!(matches!(no_algos.validate(), Err(DigestError::ConfigError(_))));
    }

    #[test]
    fn test_validate_collapses_duplicate_algorithms() {
        let config = SessionConfig {
            algorithms: vec![
                DigestAlgorithm::Sha256,
                DigestAlgorithm::Md5,
                DigestAlgorithm::Sha256,
            ],
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(config.algorithms, vec![DigestAlgorithm::Sha256, DigestAlgorithm::Md5]);
    }

    #[test]
    fn test_from_cli() {
        let args = CliArgs::parse_from([
            "multidigest", "--tab", "-a", "sha256,md5", "-b", "64K", "-t", "2", "x.bin", "y.bin",
        ]);
        let config = SessionConfig::from_cli(&args).unwrap();

        assert_eq!(config.separator, "\t");
        assert_eq!(config.block_size, 64 * 1024);
        assert_eq!(config.threads, 2);
        assert_eq!(config.algorithms, vec![DigestAlgorithm::Sha256, DigestAlgorithm::Md5]);
        assert_eq!(config.filenames, vec![PathBuf::from("x.bin"), PathBuf::from("y.bin")]);
    }

    #[test]
    fn test_cli_defaults_and_rejections() {
        let args = CliArgs::parse_from(["multidigest", "only.bin"]);
        assert_eq!(args.algorithms, DigestAlgorithm::defaults());
        assert_eq!(args.threads, 8);
        assert_eq!(args.format, OutputFormat::Text);

        assert!(CliArgs::try_parse_from(["multidigest"]).is_err());
        assert!(CliArgs::try_parse_from(["multidigest", "-a", "crc32", "a"]).is_err());

        let zero_threads = CliArgs::parse_from(["multidigest", "-t", "0", "a"]);
        assert!(matches!(
            SessionConfig::from_cli(&zero_threads),
            Err(DigestError::ConfigError(_))
        ));
    }

    #[test]
    fn test_column_names() {
        assert_eq!(DigestAlgorithm::Md5.column_name(), "MD5");
        assert_eq!(DigestAlgorithm::Sha512.column_name(), "SHA512");
        assert_eq!(DigestAlgorithm::XXHash3.column_name(), "XXHASH3");
        assert_eq!(DigestAlgorithm::Sha1.output_size(), 20);
    }
}
