use std::ffi::{OsStr, OsString};
use std::str::FromStr;

use crate::Result;
use crate::error::{DynStdError, ErrorKind};

/// One logical argument produced by [`Argz::advance`](crate::Argz::advance).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseResult {
    /// A flag without value, keyed by its short name.
    Flag(char),
    /// A single-value option, keyed by its short name.
    Value(char, OsString),
    /// A non-option argument, or any argument after `--`.
    Positional(OsString),
}

impl ParseResult {
    /// The short key of the matched option. `None` for positional arguments.
    #[must_use]
    pub fn key(&self) -> Option<char> {
        match self {
            Self::Flag(k) | Self::Value(k, _) => Some(*k),
            Self::Positional(_) => None,
        }
    }

    /// The raw value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&OsStr> {
        match self {
            Self::Flag(_) => None,
            Self::Value(_, v) | Self::Positional(v) => Some(v),
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<OsString> {
        match self {
            Self::Flag(_) => None,
            Self::Value(_, v) | Self::Positional(v) => Some(v),
        }
    }

    /// The value as UTF-8.
    ///
    /// # Errors
    ///
    /// `MissingValue` for flags, `InvalidUtf8` if the value is not UTF-8.
    pub fn value_str(&self) -> Result<&str> {
        let v = self.value().ok_or(ErrorKind::MissingValue)?;
        v.to_str().ok_or_else(|| ErrorKind::InvalidUtf8.with_input(v.into()))
    }

    /// Parse the value via [`FromStr`].
    ///
    /// # Errors
    ///
    /// Same as [`ParseResult::value_str`], plus `InvalidValue` carrying the
    /// underlying parse error as its source.
    pub fn parse_value<T>(&self) -> Result<T>
    where
        T: FromStr<Err: Into<DynStdError>>,
    {
        let s = self.value_str()?;
        s.parse::<T>()
            .map_err(|err| ErrorKind::InvalidValue.with_input(s.into()).with_source(err.into()))
    }
}
