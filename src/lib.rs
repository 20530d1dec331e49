//! Comment-preserving INI configuration for Rust applications. Declare your
//! entries, point at a file, and go.
//!
//! Iniform reads, edits, and writes INI files without losing the comments
//! people leave in them, resolves `${...}` references between options and
//! from the environment, and can ask the user for missing values through a
//! pluggable prompt.
//!
//! ```ignore
//! let mut config = Configuration::builder()
//!     .app_name("myapp")
//!     .entry(Entry::text("Server", "port", "8080", "Port to listen on"))
//!     .build();
//! config.load(false)?;
//! let port = config.value(&config.entries()[0])?;
//! ```
//!
//! That call reads `myapp.ini` from the platform config directory, keeps
//! every comment it finds, and hands you the interpolated value of
//! `Server:port`, or its declared default when the file doesn't set it.
//!
//! # Two layers
//!
//! The crate has a low-level and a high-level half. They compose: the
//! high-level half is built entirely on the public API of the low-level one.
//!
//! - **[`Document`]** is an ordered INI document. Sections, options, a
//!   `DEFAULT` section whose options every other section inherits, and a
//!   [`CommentStore`] holding the comments attached to each of them. It
//!   knows how to parse, look up, interpolate, mutate, and render itself.
//!   Use it directly when you only need a round-tripping INI editor.
//!
//! - **[`Configuration`]** wraps a document with a list of declared
//!   [`Entry`] values, a primary file, optional base files, and an inquire
//!   flow. Use it for application settings.
//!
//! # Comments
//!
//! Comments are attached to whatever follows them:
//!
//! ```text
//! # Top comment              <- file level, before the first section
//!
//! # Section comment          <- directly above a header
//! [Server]
//! # Option comment           <- directly above an option
//! port = 8080
//!
//! # End comment              <- after the last option
//! ```
//!
//! The [`LineMatcher`] recognises these positions from a configurable set of
//! delimiters (`=` and `:` by default) and comment prefixes (`#` and `;`).
//! Its [`matches()`](LineMatcher::matches) iterator yields one
//! [`CommentMatch`] per comment block, lazily, so it can run over any line
//! source. When the document is written, each comment reappears above its
//! owner with the first configured prefix.
//!
//! Only whole-line comments are kept. A `#` in the middle of a value is part
//! of the value.
//!
//! # Interpolation
//!
//! Values are interpolated on read, never on write. The default strategy is
//! [`EnvInterpolation`]:
//!
//! | Syntax | Resolves to |
//! |--------|-------------|
//! | `$$` | a literal `$` |
//! | `${name}` | environment variable `name`, else option `name` of the same section |
//! | `${section:name}` | option `name` of `section` |
//! | `$NAME` | environment variable `NAME` |
//!
//! Resolution is recursive up to [`MAX_INTERPOLATION_DEPTH`] levels; deeper
//! chains (including cycles) fail with
//! [`InterpolationDepth`](IniformError::InterpolationDepth). Unknown
//! references fail with
//! [`InterpolationMissing`](IniformError::InterpolationMissing) unless the
//! strategy is [`permissive`](EnvInterpolation::permissive), in which case
//! they are left in place.
//!
//! The environment is read through an [`EnvProvider`]. [`ProcessEnv`] reads
//! the real process environment; [`MapEnv`] is a fixed map for tests and
//! sandboxed callers. Use [`NoInterpolation`] to get raw values everywhere.
//!
//! # Entries
//!
//! An [`Entry`] declares one option: its section, name, default, a message,
//! and how it is asked for.
//!
//! - **[`Entry::text`]**: free text.
//! - **[`Entry::confirm`]**: yes/no, stored as `Yes` / `No`.
//! - **[`Entry::select`]**: one of a fixed list of choices.
//! - **[`Entry::multi_select`]**: any subset, joined by a delimiter.
//!
//! The message, instruction, and long instruction make up the comment written
//! above the option, so generated files document themselves. [`SectionDecl`]
//! saves repeating the section name; [`EntryGroup`] nests entries and
//! flattens them depth-first.
//!
//! # Files
//!
//! A configuration has at most one **primary file**, set with
//! [`path()`](ConfigurationBuilder::path) or derived from an app name and a
//! [`SearchPath`]. Writes always go to the primary file unless another target
//! is passed to [`write()`](Configuration::write).
//!
//! **Base files** ([`base_path()`](ConfigurationBuilder::base_path)) are read
//! before the primary file, so the primary file overrides them key by key.
//! Missing base files are skipped. When the configuration is written, keys
//! that only came from a base file are not copied into the primary file,
//! except for declared entries, whose effective values are always written.
//!
//! # Inquire
//!
//! [`inquire()`](Configuration::inquire) walks the declared entries, asks a
//! [`Prompter`] for each one that should be asked, and stores the answers.
//! [`load_or_inquire()`](Configuration::load_or_inquire) does this only when
//! the primary file doesn't exist yet, and writes the result.
//!
//! Prompters implemented here:
//!
//! - **[`ScriptedPrompter`]**: answers from a queue. For tests and
//!   non-interactive runs.
//! - **[`LinePrompter`]**: plain line-based prompts over any reader and writer.
//! - **[`TerminalPrompter`]**: rich terminal widgets, behind the `terminal`
//!   Cargo feature.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides
//! [`ConfigArgs`], a derive struct that gives your app
//! `config list|gen|get|set|unset|inquire` subcommands. Convert the parsed
//! args with [`into_action()`](ConfigArgs::into_action) and pass the
//! resulting [`ConfigAction`] to [`Configuration::handle()`]. The core has no
//! dependency on clap:
//!
//! ```toml
//! iniform = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`IniformError`]. Parse errors carry the
//! origin and line number; interpolation errors carry the option, section,
//! and raw value. With the `rich-errors` feature the error type also
//! implements `miette::Diagnostic`.

pub mod comments;
pub mod document;
pub mod entry;
pub mod env;
pub mod error;
pub mod interpolate;
pub mod matcher;
pub mod prompt;
#[cfg(feature = "terminal")]
pub mod terminal;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod configuration;
mod file;
mod grammar;
mod ops;

#[cfg(test)]
mod fixtures;

pub use builder::ConfigurationBuilder;
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use comments::CommentStore;
pub use configuration::{Configuration, LoadReport};
pub use document::{DEFAULT_SECTION, Document, Section};
pub use entry::{Entry, EntryGroup, EntryKind, EntryNode, EntryValue, InquireCondition, SectionDecl};
pub use env::{EnvProvider, MapEnv, ProcessEnv};
pub use error::IniformError;
pub use interpolate::{EnvInterpolation, Interpolation, MAX_INTERPOLATION_DEPTH, NoInterpolation};
pub use matcher::{CommentMatch, LineMatcher};
pub use ops::{ConfigResult, generate_template, parse_key};
pub use prompt::{LinePrompter, PromptKind, PromptRequest, PromptResponse, Prompter, ScriptedPrompter};
#[cfg(feature = "terminal")]
pub use terminal::TerminalPrompter;
pub use types::{ConfigAction, SearchPath};
