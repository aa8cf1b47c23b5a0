//! Canonicalize and hash JSON documents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use acad_core::{hmac_sha256, sha256, CanonicalBytes};

#[derive(Args, Debug)]
pub struct CanonicalizeArgs {
    /// JSON document to canonicalize.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// JSON document to hash (canonicalized first unless --raw).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    /// Hash the file bytes as-is.
    #[arg(long)]
    pub raw: bool,
    /// Print an HMAC-SHA256 tag under this hex key instead of a digest.
    #[arg(long, value_name = "HEX")]
    pub hmac_key: Option<String>,
}

pub fn run_canonicalize(args: &CanonicalizeArgs) -> Result<u8> {
    println!("{}", canonical(&args.file)?.as_str());
    Ok(0)
}

pub fn run_hash(args: &HashArgs) -> Result<u8> {
    println!("{}", hash_output(args)?);
    Ok(0)
}

fn canonical(path: &Path) -> Result<CanonicalBytes> {
    let value: serde_json::Value = crate::read_json(path)?;
    CanonicalBytes::from_value(value).context("failed to canonicalize document")
}

fn hash_output(args: &HashArgs) -> Result<String> {
    let bytes = if args.raw {
        std::fs::read(&args.file).with_context(|| format!("reading {}", args.file.display()))?
    } else {
        canonical(&args.file)?.as_bytes().to_vec()
    };

    match &args.hmac_key {
        Some(key_hex) => {
            let key = hex_to_bytes(key_hex.trim()).context("invalid --hmac-key")?;
            Ok(hmac_sha256(&key, &bytes).to_hex())
        }
        None => Ok(sha256(&bytes).to_string()),
    }
}

fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    if !hex.is_ascii() {
        anyhow::bail!("hex string contains non-ASCII characters");
    }
    if hex.len() % 2 != 0 {
        anyhow::bail!("hex string has odd length: {}", hex.len());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid hex at position {i}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn key_order_does_not_change_digest() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", r#"{"b": 2, "a": {"y": 1, "x": [1, 2]}}"#);
        let b = write(dir.path(), "b.json", "{\"a\":{\"x\":[1,2],\"y\":1},\n \"b\":2}");
        let digest = |file: PathBuf| {
            hash_output(&HashArgs {
                file,
                raw: false,
                hmac_key: None,
            })
            .unwrap()
        };
        let da = digest(a.clone());
        assert_eq!(da, digest(b));
        assert!(da.starts_with("sha256:"));
        assert_eq!(canonical(&a).unwrap().as_str(), r#"{"a":{"x":[1,2],"y":1},"b":2}"#);
    }

    #[test]
    fn raw_hash_of_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "empty", "");
        let out = hash_output(&HashArgs {
            file: path,
            raw: true,
            hmac_key: None,
        })
        .unwrap();
        assert_eq!(
            out,
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hmac_tag_depends_on_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "syllabus.json", r#"{"course": "CS101", "weeks": 14}"#);
        let tag = |key: &str| {
            hash_output(&HashArgs {
                file: path.clone(),
                raw: false,
                hmac_key: Some(key.into()),
            })
            .unwrap()
        };
        assert_eq!(tag("00ff").len(), 64);
        assert_ne!(tag("00ff"), tag("00fe"));
        assert!(hash_output(&HashArgs {
            file: path.clone(),
            raw: false,
            hmac_key: Some("abc".into()),
        })
        .is_err());
    }
}
