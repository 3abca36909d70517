use std::ffi::OsString;
use std::fmt;

pub(crate) type DynStdError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for registration and parsing.
///
/// It is boxed so that `Result<Option<ParseResult>>` stays small on the happy path.
pub struct Error(Box<Inner>);

struct Inner {
    kind: ErrorKind,
    /// The offending raw input, if any.
    input: Option<OsString>,
    /// Description of the matched option, eg. `-i, --input <FILE>`, or an
    /// unknown option as written, eg. `--inptu`.
    option: Option<String>,
    source: Option<DynStdError>,
}

/// The kind of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A short or long key is registered twice.
    DuplicateKey,
    /// A key cannot be used as an option name.
    InvalidKey,
    /// An option-shaped argument matches no registered option.
    UnknownOption,
    /// A value-taking option is given without a value.
    MissingValue,
    /// A flag is given an inline value via `--flag=value`.
    UnexpectedValue,
    /// An option name or a requested string value is not valid UTF-8.
    InvalidUtf8,
    /// A value fails to parse into the requested type.
    InvalidValue,
    /// The argument vector does not even contain the program name.
    MissingArg0,
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.0.kind)
            .field("input", &self.0.input)
            .field("option", &self.0.option)
            .field("source", &self.0.source)
            .finish()
    }
}

impl From<ErrorKind> for Error {
    #[cold]
    fn from(kind: ErrorKind) -> Self {
        Self(Box::new(Inner { kind, input: None, option: None, source: None }))
    }
}

impl ErrorKind {
    #[cold]
    pub(crate) fn with_input(self, input: OsString) -> Error {
        Error::from(self).with_input(input)
    }
}

impl Error {
    #[cold]
    pub(crate) fn with_input(mut self, input: OsString) -> Self {
        self.0.input = Some(input);
        self
    }

    #[cold]
    pub(crate) fn with_option(mut self, desc: String) -> Self {
        self.0.option = Some(desc);
        self
    }

    #[cold]
    pub(crate) fn with_source(mut self, source: DynStdError) -> Self {
        self.0.source = Some(source);
        self
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.0.kind
    }

    /// The offending input text, if any.
    ///
    /// For unknown options this is the key without its dashes, eg. `x` for `-x`
    /// and `foo` for `--foo`, or the whole argument when it is not option-shaped.
    #[must_use]
    pub fn input(&self) -> Option<&std::ffi::OsStr> {
        self.0.input.as_deref()
    }

    /// The description of the option involved, if any.
    ///
    /// For unknown options this is the option as written, eg. `-x` or `--foo`.
    #[must_use]
    pub fn option(&self) -> Option<&str> {
        self.0.option.as_deref()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let err = self.0.source.as_deref()?;
        Some(err as _)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let input = self.0.input.as_deref().map(|s| s.to_string_lossy());
        let input = input.as_deref().unwrap_or("");
        let opt = self.0.option.as_deref().unwrap_or("");

        match self.0.kind {
            ErrorKind::DuplicateKey => write!(f, "option key '{input}' is already registered"),
            ErrorKind::InvalidKey => write!(f, "invalid option key '{input}'"),
            ErrorKind::UnknownOption => {
                let written = if opt.is_empty() { input } else { opt };
                write!(f, "unknown option '{written}'")
            }
            ErrorKind::MissingValue => {
                write!(f, "a value is required for '{opt}' but none was supplied")
            }
            ErrorKind::UnexpectedValue => {
                write!(f, "unexpected value '{input}' for '{opt}' which takes no value")
            }
            ErrorKind::InvalidUtf8 => {
                f.write_str("invalid UTF-8")?;
                if !input.is_empty() {
                    write!(f, " in '{input}'")?;
                }
                Ok(())
            }
            ErrorKind::InvalidValue => {
                write!(f, "invalid value '{input}'")?;
                if !opt.is_empty() {
                    write!(f, " for '{opt}'")?;
                }
                if let Some(src) = &self.0.source {
                    write!(f, ": {src}")?;
                }
                Ok(())
            }
            ErrorKind::MissingArg0 => f.write_str("missing executable argument (argv[0])"),
        }
    }
}
