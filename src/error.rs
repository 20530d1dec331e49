use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum IniformError {
    #[error("Config file not found: {path}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::missing_file)))]
    MissingFile { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::io)))]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {origin} (line {line}) in section [{section}]: {content:?}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(iniform::parse),
            help("option lines need a delimiter; continuation lines must be indented")
        )
    )]
    ParseError {
        origin: String,
        line: usize,
        section: String,
        content: String,
    },

    #[error("File contains no section headers: {origin} (line {line}): {content:?}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::missing_section_header)))]
    MissingSectionHeader {
        origin: String,
        line: usize,
        content: String,
    },

    #[error("Section [{section}] already exists ({origin}, line {line})")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::duplicate_section)))]
    DuplicateSection {
        section: String,
        origin: String,
        line: usize,
    },

    #[error("Option '{option}' in section [{section}] already exists ({origin}, line {line})")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::duplicate_option)))]
    DuplicateOption {
        section: String,
        option: String,
        origin: String,
        line: usize,
    },

    #[error("No section: [{0}]")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::no_section)))]
    NoSection(String),

    #[error("No option '{option}' in section [{section}]")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::no_option)))]
    NoOption { section: String, option: String },

    #[error("Section [{0}] already exists")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::section_exists)))]
    SectionExists(String),

    #[error("Invalid line markers: {0}")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(iniform::invalid_markers),
            help("delimiters and comment prefixes must be non-empty lists of non-empty strings")
        )
    )]
    InvalidMarkers(String),

    #[error("Invalid section name: {0:?}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::invalid_section)))]
    InvalidSection(String),

    #[error(
        "Recursion limit exceeded in value substitution: option '{option}' in section [{section}] contains an interpolation key which cannot be substituted in {limit} steps. Raw value: {raw:?}"
    )]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(iniform::interpolation_depth),
            help("check for references that point back at each other")
        )
    )]
    InterpolationDepth {
        option: String,
        section: String,
        raw: String,
        limit: usize,
    },

    #[error(
        "Bad value substitution: option '{option}' in section [{section}] contains an interpolation key '{reference}' which is not a valid option name. Raw value: {raw:?}"
    )]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::interpolation_missing)))]
    InterpolationMissing {
        option: String,
        section: String,
        raw: String,
        reference: String,
    },

    #[error("Bad interpolation syntax in option '{option}' of section [{section}]: {reason}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::interpolation_syntax)))]
    InterpolationSyntax {
        option: String,
        section: String,
        reason: String,
    },

    #[error("Required value missing: '{option}' in section [{section}] ({path})")]
    #[cfg_attr(
        feature = "rich-errors",
        diagnostic(
            code(iniform::required_value),
            help("set the value in the file or run the inquire flow")
        )
    )]
    RequiredValueMissing {
        section: String,
        option: String,
        path: String,
    },

    #[error("No save path provided and no default path set; call .path() on the builder")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::no_save_path)))]
    NoSavePath,

    #[error("Key not found: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::key_not_found)))]
    KeyNotFound(String),

    #[error("Invalid key '{0}': expected 'section:option'")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::invalid_key)))]
    InvalidKey(String),

    #[error("Prompt failed: {0}")]
    #[cfg_attr(feature = "rich-errors", diagnostic(code(iniform::prompt)))]
    PromptError(String),
}
