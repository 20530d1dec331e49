//! Clap adapter for iniform.
//!
//! This module is the **optional integration layer** between iniform's
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! The module provides two clap derive types, [`ConfigArgs`] and
//! [`ConfigSubcommand`], that you can embed directly into your clap
//! `#[derive(Parser)]` struct to get `config list|gen|get|set|unset|inquire`
//! subcommands with no boilerplate.
//!
//! The only bridge to the core is [`ConfigArgs::into_action()`], which
//! converts clap-parsed arguments into a [`ConfigAction`](crate::ConfigAction).
//! From there, all logic flows through the clap-free
//! [`Configuration::handle()`](crate::Configuration::handle) API.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::types::ConfigAction;

/// Clap-derived args for the `config` subcommand group.
///
/// Embed this into your app's clap derive:
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
///
/// #[derive(Subcommand)]
/// enum Commands {
///     Config(ConfigArgs),
/// }
/// ```
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show all configuration values.
    List,
    /// Generate a commented configuration file from the declared defaults.
    Gen {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the value and comment of a key.
    Get {
        /// Key as section:option (e.g. "Server:port").
        key: String,
    },
    /// Write a value to the config file.
    Set {
        /// Key as section:option (e.g. "Server:port").
        key: String,
        /// Raw value to store.
        value: String,
    },
    /// Remove a value from the config file.
    Unset {
        /// Key as section:option (e.g. "Server:port").
        key: String,
    },
    /// Ask for every value interactively and write the answers.
    Inquire,
}

impl ConfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// Bare `config` (no subcommand) and explicit `config list` both map to
    /// `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Gen { output }) => ConfigAction::Gen { output },
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key },
            Some(ConfigSubcommand::Set { key, value }) => ConfigAction::Set { key, value },
            Some(ConfigSubcommand::Unset { key }) => ConfigAction::Unset { key },
            Some(ConfigSubcommand::Inquire) => ConfigAction::Inquire,
        }
    }
}
