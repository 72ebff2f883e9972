//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Curio - media asset registry with a cached local index
#[derive(Parser, Debug)]
#[command(name = "curio")]
#[command(about = "Media asset registry with a cached local index reconciled against a remote store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the reconciled view of a collection
    List {
        /// Collection name (e.g. gallery, projects)
        collection: String,
    },

    /// Upload a file and add it to a collection
    Add {
        /// Collection name
        collection: String,

        /// File to upload (a copy is staged; the original is left alone)
        file: PathBuf,

        /// Metadata attribute, repeatable (e.g. --meta title=Riverside)
        #[arg(long = "meta", value_parser = parse_key_val)]
        meta: Vec<(String, String)>,
    },

    /// Remove an asset by position, remote id, URL or URL fragment
    Remove {
        /// Collection name
        collection: String,

        /// Identifier to resolve
        identifier: String,
    },

    /// Upload a standalone document such as a resume
    UploadDocument {
        /// File to upload (a copy is staged; the original is left alone)
        file: PathBuf,
    },
}

/// Parse a `key=value` pair.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(
            parse_key_val("title=Riverside Hall").unwrap(),
            ("title".to_string(), "Riverside Hall".to_string())
        );
        assert_eq!(
            parse_key_val("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("title").is_err());
        assert!(parse_key_val("=x").is_err());
    }
}
