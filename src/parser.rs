//! The option matching and validation engine.

use crate::matching::{resolve, Resolution};
use crate::option::{Arity, CallbackError, Registry, Validation};
use thiserror::Error;
use tracing::{debug, trace};

/// Numeric code for a successful parse.
pub const OK: u32 = 0;
/// Numeric code for [`ParseError::UnrecognizedOption`] and [`ParseError::AmbiguousOption`].
pub const UNRECOGNIZED_OPTION: u32 = 1;
/// Numeric code for [`ParseError::UnexpectedAssignment`].
pub const UNEXPECTED_ASSIGNMENT: u32 = 2;
/// Numeric code for [`ParseError::MissingArgument`].
pub const MISSING_ARGUMENT: u32 = 3;
/// Numeric code for [`ParseError::MissingOption`].
pub const MISSING_OPTION: u32 = 4;
/// First code available to applications for [`CallbackError::Application`].
pub const APPLICATION_ERROR: u32 = 5;

/// Errors that stop a parse. Each carries the option name or raw token at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized option {0}")]
    UnrecognizedOption(String),

    #[error("ambiguous option {token} (could be {})", .candidates.join(", "))]
    AmbiguousOption {
        token: String,
        candidates: Vec<String>,
    },

    #[error("unexpected assignment for option {0}")]
    UnexpectedAssignment(String),

    #[error("missing argument for option {0}")]
    MissingArgument(String),

    #[error("missing required option {0}")]
    MissingOption(String),

    /// Raised by a callback. Codes below [`APPLICATION_ERROR`] are raised to it.
    #[error("application error {code} for option {option}")]
    Application { option: String, code: u32 },
}

impl ParseError {
    /// The option name (or unrecognized token) that caused the error.
    pub fn option(&self) -> &str {
        match self {
            ParseError::UnrecognizedOption(token) => token,
            ParseError::AmbiguousOption { token, .. } => token,
            ParseError::UnexpectedAssignment(option)
            | ParseError::MissingArgument(option)
            | ParseError::MissingOption(option) => option,
            ParseError::Application { option, .. } => option,
        }
    }

    /// Numeric error code, suitable for mapping onto process exit statuses.
    pub fn code(&self) -> u32 {
        match self {
            ParseError::UnrecognizedOption(_) | ParseError::AmbiguousOption { .. } => {
                UNRECOGNIZED_OPTION
            }
            ParseError::UnexpectedAssignment(_) => UNEXPECTED_ASSIGNMENT,
            ParseError::MissingArgument(_) => MISSING_ARGUMENT,
            ParseError::MissingOption(_) => MISSING_OPTION,
            ParseError::Application { code, .. } => *code,
        }
    }

    fn from_callback(option: String, err: CallbackError) -> Self {
        match err {
            CallbackError::MissingOption => ParseError::MissingOption(option),
            CallbackError::Application(code) => ParseError::Application {
                option,
                code: code.max(APPLICATION_ERROR),
            },
        }
    }
}

/// How a successful parse ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every argument matched and every missing-option check passed.
    Complete,
    /// A validator asked to stop early. Remaining arguments and the
    /// missing-option checks were skipped.
    Stopped { option: String },
}

/// Result of parsing arguments.
pub type ParseResult = Result<ParseOutcome, ParseError>;

/// Parse `args` (without the program name) against `registry`.
///
/// Matched descriptors get `present` set and their value captured; all
/// state from a previous parse is cleared first. `context` is handed to
/// every callback untouched. The scan stops at the first error.
pub fn parse<C, S: AsRef<str>>(
    args: &[S],
    registry: &mut Registry<C>,
    context: &mut C,
) -> ParseResult {
    let mut parser = Parser::new(registry, context);
    parser.parse(args)
}

impl<C> Registry<C> {
    /// Shorthand for [`parse`].
    pub fn parse<S: AsRef<str>>(&mut self, args: &[S], context: &mut C) -> ParseResult {
        parse(args, self, context)
    }
}

/// Internal parser state.
struct Parser<'a, C> {
    registry: &'a mut Registry<C>,
    context: &'a mut C,
}

impl<'a, C> Parser<'a, C> {
    fn new(registry: &'a mut Registry<C>, context: &'a mut C) -> Self {
        Self { registry, context }
    }

    fn parse<S: AsRef<str>>(&mut self, args: &[S]) -> ParseResult {
        self.registry.reset();

        let mut args_iter = args.iter().map(|a| a.as_ref());
        while let Some(arg) = args_iter.next() {
            trace!(arg = %arg, "scanning argument");
            if let Some(option) = self.parse_argument(arg, &mut args_iter)? {
                debug!(option = %option, "validator stopped parsing");
                return Ok(ParseOutcome::Stopped { option });
            }
        }

        self.check_missing()?;
        Ok(ParseOutcome::Complete)
    }

    /// Match one argument and run its validator.
    ///
    /// Returns the option name when the validator asked to stop.
    fn parse_argument<'b, I>(
        &mut self,
        arg: &'b str,
        rest: &mut I,
    ) -> Result<Option<String>, ParseError>
    where
        I: Iterator<Item = &'b str>,
    {
        let (head, inline_value) = match arg.split_once('=') {
            Some((head, value)) => (head, Some(value)),
            None => (arg, None),
        };

        let index = match resolve(self.registry.options(), head, self.registry.match_mode()) {
            Resolution::Matched(index) => index,
            Resolution::Ambiguous(candidates) => {
                return Err(ParseError::AmbiguousOption {
                    token: arg.to_string(),
                    candidates,
                })
            }
            Resolution::NoMatch => return Err(ParseError::UnrecognizedOption(arg.to_string())),
        };

        let option = self.registry.option_mut(index);
        option.present = true;
        let name = option.name().unwrap_or(head).to_string();

        match option.get_arity() {
            Arity::None => {
                if inline_value.is_some() {
                    return Err(ParseError::UnexpectedAssignment(name));
                }
            }
            Arity::Required => {
                let value = match inline_value {
                    Some(v) => v,
                    None => rest
                        .next()
                        .ok_or_else(|| ParseError::MissingArgument(name.clone()))?,
                };
                option.value = Some(value.to_string());
            }
            Arity::Optional => {
                option.value = inline_value.map(str::to_string);
            }
        }
        debug!(option = %name, value = ?option.value, "matched option");

        let Some(validate) = option.validator() else {
            return Ok(None);
        };
        let option = &self.registry.options()[index];
        match validate(option, self.context) {
            Validation::Continue => Ok(None),
            Validation::Stop => Ok(Some(name)),
            Validation::Fail(err) => Err(ParseError::from_callback(name, err)),
        }
    }

    /// Run the missing callback of every option that never matched, in declaration order.
    fn check_missing(&mut self) -> Result<(), ParseError> {
        for option in self.registry.options() {
            if option.is_present() {
                continue;
            }
            let Some(missing) = option.missing_handler() else {
                continue;
            };
            let name = option.name().unwrap_or_default();
            trace!(option = name, "running missing callback");
            if let Err(err) = missing(option, self.context) {
                debug!(option = name, error = %err, "missing callback failed");
                return Err(ParseError::from_callback(name.to_string(), err));
            }
        }
        Ok(())
    }
}
