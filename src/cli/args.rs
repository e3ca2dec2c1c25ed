//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::SearchField;

/// In-memory hierarchy index: nest, flatten and search tree datasets
#[derive(Parser, Debug)]
#[command(name = "treeindex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the dataset as a tree
    Tree {
        /// Dataset file (default: configured dataset)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Print JSON instead of a drawing
        #[arg(long)]
        json: bool,
    },

    /// Show matching nodes with their ancestors and descendants
    Search {
        /// Search text (blank shows everything)
        query: String,
        /// Dataset file (default: configured dataset)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Fields to search, overriding config (e.g. label,value)
        #[arg(short, long, value_delimiter = ',')]
        fields: Option<Vec<SearchField>>,
        /// Print JSON instead of a drawing
        #[arg(long)]
        json: bool,
    },

    /// Print the dataset as flat JSON records
    Flatten {
        /// Dataset file, flat or nested
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Report duplicate ids, dangling parents and cycles
    Check {
        /// Dataset file (default: configured dataset)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Generate a synthetic breadth-first dataset
    Generate {
        /// Total number of nodes
        count: usize,
        /// Children per node
        children: usize,
        /// Output file (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,
    /// Print a commented config template
    Template,
    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_comma_separated_fields_when_parsing_then_splits() {
        let cli = Cli::parse_from(["treeindex", "search", "alpha", "data.json", "-f", "label,value"]);
        match cli.command {
            Some(Commands::Search { fields, file, .. }) => {
                assert_eq!(fields, Some(vec![SearchField::Label, SearchField::Value]));
                assert_eq!(file, Some(PathBuf::from("data.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn given_repeated_debug_flag_when_parsing_then_counts() {
        let cli = Cli::parse_from(["treeindex", "-ddd", "config", "show"]);
        assert_eq!(cli.debug, 3);
    }
}
