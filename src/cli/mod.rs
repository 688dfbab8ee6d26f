//! Command-line interface, parsed with clap.

mod commands;

use crate::domain::ResourceKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// City Explorer - location-keyed cache-through aggregator
#[derive(Parser)]
#[command(name = "city-explorer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Resolve a query to a stored location, geocoding it if needed
    #[command(alias = "l")]
    Locate {
        /// Free-text location query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Print cached rows for a location, refreshing them when stale
    #[command(alias = "f")]
    Fetch {
        /// Resource kind (weather, yelp, movies, meetups, trails)
        kind: ResourceKind,
        /// Stored location id
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        location_id: i32,
    },

    /// Delete the cached batch of one kind for a location
    #[command(alias = "rm")]
    Purge {
        /// Resource kind (weather, yelp, movies, meetups, trails)
        kind: ResourceKind,
        /// Stored location id
        #[arg(value_parser = clap::value_parser!(i32).range(1..))]
        location_id: i32,
    },

    /// Write the effective config to a file
    Init {
        /// Destination path
        #[arg(default_value = "config.toml")]
        path: PathBuf,
    },
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["city-explorer"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn fetch_parses_kind_alias() {
        let cli = Cli::try_parse_from(["city-explorer", "fetch", "yelp", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Fetch {
                kind: ResourceKind::BusinessListing,
                location_id: 3
            })
        ));
    }

    #[test]
    fn locate_joins_words() {
        let cli = Cli::try_parse_from(["city-explorer", "locate", "Beverly", "Hills"]).unwrap();
        let Some(Commands::Locate { query }) = cli.command else {
            panic!("expected locate");
        };
        assert_eq!(query.join(" "), "Beverly Hills");
    }

    #[test]
    fn location_id_must_be_positive() {
        assert!(Cli::try_parse_from(["city-explorer", "fetch", "weather", "0"]).is_err());
        assert!(Cli::try_parse_from(["city-explorer", "purge", "weather", "--", "-1"]).is_err());
        assert!(Cli::try_parse_from(["city-explorer", "fetch", "weather", "abc"]).is_err());
        assert!(Cli::try_parse_from(["city-explorer", "purge", "weather", "1"]).is_ok());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Cli::try_parse_from(["city-explorer", "purge", "locations", "1"]).is_err());
    }
}
