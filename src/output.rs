//! JSON report of option state after a successful parse.

use crate::option::Registry;
use crate::parser::ParseOutcome;
use serde::Serialize;

/// State of one named option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionReport<'a> {
    pub name: &'a str,
    pub present: bool,
    pub value: Option<&'a str>,
}

/// Everything a caller needs to act on a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseReport<'a> {
    /// "complete" or "stopped"
    pub status: &'static str,
    /// The option whose validator stopped the parse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_by: Option<&'a str>,
    pub options: Vec<OptionReport<'a>>,
}

impl<'a> ParseReport<'a> {
    /// Snapshot the named options of `registry`. Dividers are left out.
    pub fn new<C>(registry: &'a Registry<C>, outcome: &'a ParseOutcome) -> Self {
        let (status, stopped_by) = match outcome {
            ParseOutcome::Complete => ("complete", None),
            ParseOutcome::Stopped { option } => ("stopped", Some(option.as_str())),
        };

        let options = registry
            .iter()
            .filter_map(|option| {
                Some(OptionReport {
                    name: option.name()?,
                    present: option.is_present(),
                    value: option.value(),
                })
            })
            .collect();

        Self {
            status,
            stopped_by,
            options,
        }
    }
}

/// Render the report as pretty-printed JSON.
pub fn generate_output_string<C>(
    registry: &Registry<C>,
    outcome: &ParseOutcome,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ParseReport::new(registry, outcome))
}
