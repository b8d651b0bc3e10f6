//! Option descriptors and the registry the parser consults.

use std::fmt;
use thiserror::Error;

/// Whether an option takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arity {
    /// A plain flag (e.g., -v). `name=value` is rejected.
    #[default]
    None,
    /// A value must follow, either inline (`name=value`) or as the next argument.
    Required,
    /// A value may be given inline; the next argument is never consumed.
    Optional,
}

/// What a validator wants the parser to do after a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Keep scanning.
    Continue,
    /// Stop the whole parse and report success (e.g. a `--help` handler).
    Stop,
    /// Stop the whole parse and report an error for this option.
    Fail(CallbackError),
}

/// Error returned by a validator or missing callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    #[error("missing required option")]
    MissingOption,

    /// An application-defined code, expected to be at least `APPLICATION_ERROR`.
    #[error("application error {0}")]
    Application(u32),
}

/// Callback run immediately after an option matches.
pub type Validator<C> = fn(&OptionDescriptor<C>, &mut C) -> Validation;

/// Callback run once after the scan for every option that was never matched.
pub type MissingHandler<C> = fn(&OptionDescriptor<C>, &mut C) -> Result<(), CallbackError>;

/// How argument heads are resolved against option names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The head must equal an option name.
    #[default]
    Exact,
    /// Like `Exact`, but an unambiguous leading part of a name is accepted too.
    UniquePrefix,
}

/// One recognized option, or a divider line for help output when `name` is `None`.
pub struct OptionDescriptor<C = ()> {
    name: Option<String>,
    description: Option<String>,
    arity: Arity,
    validate: Option<Validator<C>>,
    missing: Option<MissingHandler<C>>,
    pub(crate) value: Option<String>,
    pub(crate) present: bool,
}

impl<C> OptionDescriptor<C> {
    /// Create a matchable option with no value (`Arity::None`).
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            arity: Arity::None,
            validate: None,
            missing: None,
            value: None,
            present: false,
        }
    }

    /// Create a divider. It never matches and only shows up in help output.
    pub fn divider(description: impl Into<String>) -> Self {
        Self {
            name: None,
            description: Some(description.into()),
            arity: Arity::None,
            validate: None,
            missing: None,
            value: None,
            present: false,
        }
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn on_validate(mut self, validate: Validator<C>) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn on_missing(mut self, missing: MissingHandler<C>) -> Self {
        self.missing = Some(missing);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn get_arity(&self) -> Arity {
        self.arity
    }

    /// The value captured by the last parse, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the last parse matched this option.
    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn is_divider(&self) -> bool {
        self.name.is_none()
    }

    pub(crate) fn validator(&self) -> Option<Validator<C>> {
        self.validate
    }

    pub(crate) fn missing_handler(&self) -> Option<MissingHandler<C>> {
        self.missing
    }

    pub(crate) fn reset(&mut self) {
        self.present = false;
        self.value = None;
    }
}

impl<C> fmt::Debug for OptionDescriptor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arity", &self.arity)
            .field("validate", &self.validate.is_some())
            .field("missing", &self.missing.is_some())
            .field("value", &self.value)
            .field("present", &self.present)
            .finish()
    }
}

/// Ordered collection of option descriptors.
///
/// Declaration order decides which descriptor wins when two share a name,
/// and is the order used for help output and for missing-option checks.
pub struct Registry<C = ()> {
    options: Vec<OptionDescriptor<C>>,
    match_mode: MatchMode,
}

impl<C> Registry<C> {
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            match_mode: MatchMode::Exact,
        }
    }

    /// Append a descriptor, builder style.
    pub fn with(mut self, option: OptionDescriptor<C>) -> Self {
        self.options.push(option);
        self
    }

    pub fn push(&mut self, option: OptionDescriptor<C>) {
        self.options.push(option);
    }

    pub fn with_match_mode(mut self, mode: MatchMode) -> Self {
        self.match_mode = mode;
        self
    }

    pub fn set_match_mode(&mut self, mode: MatchMode) {
        self.match_mode = mode;
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionDescriptor<C>> {
        self.options.iter()
    }

    /// First descriptor declared with `name`.
    pub fn get(&self, name: &str) -> Option<&OptionDescriptor<C>> {
        self.options.iter().find(|o| o.name() == Some(name))
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).map_or(false, |o| o.is_present())
    }

    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|o| o.value())
    }

    /// Clear `present` and `value` on every descriptor.
    pub fn reset(&mut self) {
        for option in &mut self.options {
            option.reset();
        }
    }

    pub(crate) fn options(&self) -> &[OptionDescriptor<C>] {
        &self.options
    }

    pub(crate) fn option_mut(&mut self, index: usize) -> &mut OptionDescriptor<C> {
        &mut self.options[index]
    }
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("options", &self.options)
            .field("match_mode", &self.match_mode)
            .finish()
    }
}

impl<C> FromIterator<OptionDescriptor<C>> for Registry<C> {
    fn from_iter<I: IntoIterator<Item = OptionDescriptor<C>>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
            match_mode: MatchMode::Exact,
        }
    }
}

impl<'a, C> IntoIterator for &'a Registry<C> {
    type Item = &'a OptionDescriptor<C>;
    type IntoIter = std::slice::Iter<'a, OptionDescriptor<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always_missing(_: &OptionDescriptor, _: &mut ()) -> Result<(), CallbackError> {
        Err(CallbackError::MissingOption)
    }

    #[test]
    fn test_new_option_defaults() {
        let opt: OptionDescriptor = OptionDescriptor::new("-a", "option a");
        assert_eq!(opt.name(), Some("-a"));
        assert_eq!(opt.description(), Some("option a"));
        assert_eq!(opt.get_arity(), Arity::None);
        assert!(!opt.is_present());
        assert!(opt.value().is_none());
        assert!(!opt.is_divider());
    }

    #[test]
    fn test_divider_has_no_name() {
        let opt: OptionDescriptor = OptionDescriptor::divider("more options:");
        assert!(opt.is_divider());
        assert_eq!(opt.description(), Some("more options:"));
    }

    #[test]
    fn test_builder_sets_callbacks() {
        let opt = OptionDescriptor::new("-c", "option c")
            .arity(Arity::Optional)
            .on_missing(always_missing);
        assert_eq!(opt.get_arity(), Arity::Optional);
        assert!(opt.missing_handler().is_some());
        assert!(opt.validator().is_none());
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry: Registry = Registry::new()
            .with(OptionDescriptor::new("-b", "b"))
            .with(OptionDescriptor::divider("--"))
            .with(OptionDescriptor::new("-a", "a"));
        let names: Vec<_> = registry.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec![Some("-b"), None, Some("-a")]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_registry_get_returns_first_declared() {
        let registry: Registry = Registry::new()
            .with(OptionDescriptor::new("-x", "first"))
            .with(OptionDescriptor::new("-x", "second"));
        assert_eq!(registry.get("-x").and_then(|o| o.description()), Some("first"));
        assert!(registry.get("-y").is_none());
    }

    #[test]
    fn test_registry_reset_clears_state() {
        let mut registry: Registry = vec![OptionDescriptor::new("-a", "a").arity(Arity::Required)]
            .into_iter()
            .collect();
        {
            let opt = registry.option_mut(0);
            opt.present = true;
            opt.value = Some("v".to_string());
        }
        assert!(registry.is_present("-a"));
        assert_eq!(registry.value_of("-a"), Some("v"));

        registry.reset();
        assert!(!registry.is_present("-a"));
        assert!(registry.value_of("-a").is_none());
    }

    #[test]
    fn test_match_mode_default_is_exact() {
        let registry: Registry = Registry::default();
        assert_eq!(registry.match_mode(), MatchMode::Exact);
        assert!(registry.is_empty());
        let registry = registry.with_match_mode(MatchMode::UniquePrefix);
        assert_eq!(registry.match_mode(), MatchMode::UniquePrefix);
    }

    #[test]
    fn test_arity_deserialize_lowercase() {
        let arity: Arity = serde_json::from_str(r#""required""#).unwrap();
        assert_eq!(arity, Arity::Required);
        assert!(serde_json::from_str::<Arity>(r#""Required""#).is_err());
    }
}
