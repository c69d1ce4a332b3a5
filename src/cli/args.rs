//! CLI argument definitions using clap
//!
//! Commands:
//! - aerosearch query --data <path> --collection <name> --param key=value ...
//! - aerosearch collections --data <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aerosearch - document search with field-value joins
#[derive(Parser, Debug)]
#[command(name = "aerosearch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one search and print the response
    Query {
        /// JSON data file: {"collections": {"name": [documents]}}
        #[arg(long)]
        data: PathBuf,

        /// Collection the query runs against
        #[arg(long)]
        collection: String,

        /// Request parameter as key=value; repeat for multi-valued params
        #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Optional search configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Suppress structured log output
        #[arg(long)]
        quiet: bool,
    },

    /// List collections and their document counts
    Collections {
        /// JSON data file
        #[arg(long)]
        data: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let cli = Cli::try_parse_from([
            "aerosearch",
            "query",
            "--data",
            "data.json",
            "--collection",
            "people",
            "--param",
            "q=*:*",
            "-p",
            "fq=name:john",
            "--quiet",
        ])
        .unwrap();

        match cli.command {
            Command::Query {
                collection,
                params,
                config,
                quiet,
                ..
            } => {
                assert_eq!(collection, "people");
                assert_eq!(params, vec!["q=*:*", "fq=name:john"]);
                assert!(config.is_none());
                assert!(quiet);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_query_requires_collection() {
        assert!(Cli::try_parse_from(["aerosearch", "query", "--data", "d.json"]).is_err());
    }
}
