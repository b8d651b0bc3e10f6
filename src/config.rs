//! JSON declaration of an option registry.

use crate::option::{Arity, CallbackError, MatchMode, OptionDescriptor, Registry};
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during config parsing and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("duplicate option name: {0}")]
    DuplicateName(String),

    #[error("option at position {0} has an empty name")]
    EmptyName(usize),

    #[error("option name '{0}' contains '=' and can never match")]
    NameContainsEquals(String),

    #[error("entry at position {0} has neither a name nor a description")]
    EmptyDivider(usize),
}

/// Configuration for a single option or divider.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionConfig {
    /// The token typed on the command line. Omit for a help divider.
    pub name: Option<String>,
    /// Help text for this option, or the divider text
    pub description: Option<String>,
    /// Whether the option takes a value (default: "none")
    #[serde(default)]
    pub arity: Arity,
    /// Fail the parse with a missing-option error when not given
    #[serde(default)]
    pub required: bool,
}

/// Top-level configuration for a registry.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Options in declaration order
    #[serde(default)]
    pub options: Vec<OptionConfig>,
    /// Accept unambiguous abbreviations of option names
    #[serde(default)]
    pub abbreviations: bool,
}

fn require_option<C>(_: &OptionDescriptor<C>, _: &mut C) -> Result<(), CallbackError> {
    Err(CallbackError::MissingOption)
}

impl RegistryConfig {
    /// Parse a JSON string into a RegistryConfig.
    pub fn from_json(json: &str) -> Result<RegistryConfig, ConfigError> {
        let config: RegistryConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        use std::collections::HashSet;

        let mut names = HashSet::new();

        for (position, option) in self.options.iter().enumerate() {
            match option.name.as_deref() {
                Some("") => return Err(ConfigError::EmptyName(position)),
                Some(name) => {
                    if name.contains('=') {
                        return Err(ConfigError::NameContainsEquals(name.to_string()));
                    }
                    if !names.insert(name) {
                        return Err(ConfigError::DuplicateName(name.to_string()));
                    }
                }
                None => {
                    if option.description.is_none() {
                        return Err(ConfigError::EmptyDivider(position));
                    }
                }
            }
        }

        Ok(())
    }

    /// Build a registry from this configuration.
    ///
    /// Options marked `required` get a missing callback that fails with
    /// [`CallbackError::MissingOption`].
    pub fn into_registry<C>(self) -> Registry<C> {
        let mode = if self.abbreviations {
            MatchMode::UniquePrefix
        } else {
            MatchMode::Exact
        };

        let mut registry = Registry::new().with_match_mode(mode);
        for option in self.options {
            let description = option.description.unwrap_or_default();
            let descriptor = match option.name {
                Some(name) => {
                    let descriptor = OptionDescriptor::new(name, description).arity(option.arity);
                    if option.required {
                        descriptor.on_missing(require_option::<C>)
                    } else {
                        descriptor
                    }
                }
                None => OptionDescriptor::divider(description),
            };
            registry.push(descriptor);
        }
        registry
    }
}
