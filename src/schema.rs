//! Registered option definitions and the read-only view over them.
use std::borrow::Cow;

use ref_cast::RefCast;

use crate::Result;
use crate::error::ErrorKind;

/// How many values an option takes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A flag, eg. `-h`.
    #[default]
    None,
    /// Exactly one value, inlined (`-iFILE`, `--input=FILE`) or as the next argument.
    Single,
}

/// The definition of one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    short: char,
    long: Option<Cow<'static, str>>,
    help: Cow<'static, str>,
    arity: Arity,
    value_name: Cow<'static, str>,
    reject_hyphen_values: bool,
}

impl OptionSpec {
    pub fn new(short: char, arity: Arity) -> Self {
        Self {
            short,
            long: None,
            help: Cow::Borrowed(""),
            arity,
            value_name: Cow::Borrowed("VALUE"),
            reject_hyphen_values: false,
        }
    }

    /// A flag taking no value.
    pub fn flag(short: char) -> Self {
        Self::new(short, Arity::None)
    }

    /// An option taking exactly one value.
    pub fn value(short: char) -> Self {
        Self::new(short, Arity::Single)
    }

    #[must_use]
    pub fn long(mut self, long: impl Into<Cow<'static, str>>) -> Self {
        self.long = Some(long.into());
        self
    }

    #[must_use]
    pub fn help(mut self, help: impl Into<Cow<'static, str>>) -> Self {
        self.help = help.into();
        self
    }

    /// The placeholder shown in help, `VALUE` by default.
    #[must_use]
    pub fn value_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.value_name = name.into();
        self
    }

    /// Refuse a following argument starting with `-` as the value, reporting
    /// `MissingValue` and leaving that argument for the next step.
    ///
    /// By default any following argument is taken. A lone `-` is always accepted.
    #[must_use]
    pub fn reject_hyphen_values(mut self, yes: bool) -> Self {
        self.reject_hyphen_values = yes;
        self
    }

    #[must_use]
    pub fn get_short(&self) -> char {
        self.short
    }

    #[must_use]
    pub fn get_long(&self) -> Option<&str> {
        self.long.as_deref()
    }

    #[must_use]
    pub fn get_help(&self) -> &str {
        &self.help
    }

    #[must_use]
    pub fn get_arity(&self) -> Arity {
        self.arity
    }

    #[must_use]
    pub fn get_value_name(&self) -> &str {
        &self.value_name
    }

    #[must_use]
    pub fn get_reject_hyphen_values(&self) -> bool {
        self.reject_hyphen_values
    }

    /// The usage form of this option: `-s`, `-s, --long` or `-s, --long <VALUE>`.
    #[must_use]
    pub fn description(&self) -> String {
        let mut out = String::with_capacity(16);
        out.push('-');
        out.push(self.short);
        if let Some(long) = &self.long {
            out.push_str(", --");
            out.push_str(long);
        }
        if self.arity == Arity::Single {
            out.push_str(" <");
            out.push_str(&self.value_name);
            out.push('>');
        }
        out
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let short_ok = self.short.is_ascii_graphic() && !matches!(self.short, '-' | '=');
        if !short_ok {
            return Err(ErrorKind::InvalidKey.with_input(self.short.to_string().into()));
        }
        if let Some(long) = self.get_long() {
            let long_ok = !long.is_empty()
                && !long.starts_with('-')
                && !long.chars().any(|c| c == '=' || c.is_whitespace() || c.is_control());
            if !long_ok {
                return Err(ErrorKind::InvalidKey.with_input(long.into()));
            }
        }
        Ok(())
    }
}

/// A borrowed view of registered options, in registration order.
#[derive(Debug, RefCast)]
#[repr(transparent)]
pub struct Schema([OptionSpec]);

impl Schema {
    pub(crate) fn new(options: &[OptionSpec]) -> &Self {
        Self::ref_cast(options)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionSpec> {
        self.0.iter()
    }

    #[must_use]
    pub fn find_short(&self, short: char) -> Option<&OptionSpec> {
        self.0.iter().find(|spec| spec.short == short)
    }

    #[must_use]
    pub fn find_long(&self, long: &str) -> Option<&OptionSpec> {
        self.0.iter().find(|spec| spec.get_long() == Some(long))
    }

    /// Check that `spec` is well-formed and collides with nothing registered.
    pub(crate) fn check_insert(&self, spec: &OptionSpec) -> Result<()> {
        spec.validate()?;
        if self.find_short(spec.short).is_some() {
            return Err(ErrorKind::DuplicateKey.with_input(format!("-{}", spec.short).into()));
        }
        if let Some(long) = spec.get_long() {
            if self.find_long(long).is_some() {
                return Err(ErrorKind::DuplicateKey.with_input(format!("--{long}").into()));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a OptionSpec;
    type IntoIter = std::slice::Iter<'a, OptionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
