//! Option syntax text for help output.
//!
//! Each named option renders as its name, an `=<arg>` or `=[arg]` suffix for
//! required and optional values, a dotted leader, and the description. All
//! descriptions start in the same column. Dividers render as a bare line.

use crate::option::{Arity, OptionDescriptor, Registry};
use std::io::{self, Write};

/// Width added to a name for its `=<arg> ` suffix.
const ARG_SUFFIX_WIDTH: usize = 7;
/// Padding between the widest name and the description column.
const FIELD_PADDING: usize = 5;

fn label<C>(option: &OptionDescriptor<C>, name: &str) -> String {
    match option.get_arity() {
        Arity::None => name.to_string(),
        Arity::Required => format!("{}=<arg>", name),
        Arity::Optional => format!("{}=[arg]", name),
    }
}

/// Total width of the option field, shared by every line.
fn field_width<C>(registry: &Registry<C>) -> usize {
    let widest = registry
        .iter()
        .filter_map(|option| {
            let name = option.name()?;
            let suffix = match option.get_arity() {
                Arity::None => 0,
                Arity::Required | Arity::Optional => ARG_SUFFIX_WIDTH,
            };
            Some(name.chars().count() + suffix)
        })
        .max()
        .unwrap_or(0);
    widest + FIELD_PADDING
}

fn format_line<C>(option: &OptionDescriptor<C>, width: usize) -> Option<String> {
    let Some(name) = option.name() else {
        return option.description().map(str::to_string);
    };

    let mut line = label(option, name);
    line.push(' ');
    let used = line.chars().count();
    line.push_str(&".".repeat(width.saturating_sub(2).saturating_sub(used)));
    line.push(' ');
    line.push_str(option.description().unwrap_or_default());
    Some(line)
}

/// Generate the syntax text for every option in declaration order.
pub fn generate_help<C>(registry: &Registry<C>) -> String {
    let width = field_width(registry);
    let mut help = String::new();
    for option in registry {
        if let Some(line) = format_line(option, width) {
            help.push_str(&line);
            help.push('\n');
        }
    }
    help
}

/// Write the syntax text to `out`.
pub fn write_help<C, W: Write>(registry: &Registry<C>, out: &mut W) -> io::Result<()> {
    out.write_all(generate_help(registry).as_bytes())
}

/// Print the syntax text to standard output.
pub fn render_help<C>(registry: &Registry<C>) {
    print!("{}", generate_help(registry));
}
