//! copt - declarative command-line option parsing.
//!
//! This library matches a process's arguments against an ordered list of
//! option descriptors, captures option values, runs per-option validation
//! and missing-option callbacks, and reports the first error. It can also
//! print aligned syntax text for the declared options.

pub mod config;
pub mod help;
pub mod matching;
pub mod option;
pub mod output;
pub mod parser;

pub use config::{ConfigError, OptionConfig, RegistryConfig};
pub use help::{generate_help, render_help, write_help};
pub use option::{
    Arity, CallbackError, MatchMode, MissingHandler, OptionDescriptor, Registry, Validation,
    Validator,
};
pub use output::{generate_output_string, ParseReport};
pub use parser::{parse, ParseError, ParseOutcome, ParseResult, APPLICATION_ERROR};
