use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::parse_variable;

/// packsel - choose which installer packs to install
#[derive(Parser, Debug)]
#[command(name = "packsel")]
#[command(about = "Interactive installer pack selection with dependency enforcement")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the interactive pack selection menu
    Select {
        /// Catalog file describing the packs
        #[arg(short, long)]
        catalog: PathBuf,

        /// Message overrides (JSON object of key: text)
        #[arg(short, long)]
        messages: Option<PathBuf>,

        /// Variable for pack names, NAME=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_variable)]
        variables: Vec<(String, String)>,

        /// Extra satisfied condition (repeatable)
        #[arg(long = "condition")]
        conditions: Vec<String>,

        /// Continue without asking once the menu is left
        #[arg(short, long)]
        yes: bool,
    },
    /// Resolve a selection without the menu and print it
    Resolve {
        /// Catalog file describing the packs
        #[arg(short, long)]
        catalog: PathBuf,

        /// Extra satisfied condition (repeatable)
        #[arg(long = "condition")]
        conditions: Vec<String>,

        /// Pack to leave out (repeatable); dependents are dropped with it
        #[arg(long = "without")]
        without: Vec<String>,

        /// Print the selection as JSON
        #[arg(long)]
        json: bool,

        /// Packs to select; dependencies are pulled in
        packs: Vec<String>,
    },
    /// Validate a catalog file
    Validate {
        /// Catalog file to validate
        catalog: PathBuf,
    },
    /// List the packs of a catalog with their initial state
    List {
        /// Catalog file describing the packs
        #[arg(short, long)]
        catalog: PathBuf,

        /// Extra satisfied condition (repeatable)
        #[arg(long = "condition")]
        conditions: Vec<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_select_args() {
        let cli = Cli::try_parse_from([
            "packsel",
            "select",
            "--catalog",
            "c.json",
            "--var",
            "APP=Frob",
            "--condition",
            "os.linux",
            "-y",
        ])
        .unwrap();
        match cli.command {
            Commands::Select {
                catalog,
                variables,
                conditions,
                yes,
                messages,
            } => {
                assert_eq!(catalog, PathBuf::from("c.json"));
                assert_eq!(variables, vec![("APP".to_string(), "Frob".to_string())]);
                assert_eq!(conditions, vec!["os.linux".to_string()]);
                assert!(yes);
                assert!(messages.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_bad_variable_rejected() {
        assert!(Cli::try_parse_from(["packsel", "select", "-c", "c.json", "--var", "nope"]).is_err());
    }

    #[test]
    fn test_resolve_args() {
        let cli = Cli::try_parse_from([
            "packsel", "resolve", "-c", "c.json", "--without", "docs", "samples", "extras",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve { packs, without, json, .. } => {
                assert_eq!(packs, vec!["samples", "extras"]);
                assert_eq!(without, vec!["docs"]);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
