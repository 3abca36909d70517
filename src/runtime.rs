use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::iter::FusedIterator;
use std::num::NonZero;
use std::path::Path;

use os_str_bytes::OsStrBytesExt;

use crate::Result;
use crate::error::{Error, ErrorKind};
use crate::schema::{Arity, OptionSpec, Schema};
use crate::values::ParseResult;

/// The option parser.
///
/// Options are registered first, then [`Argz::advance`] is called in a loop
/// until it returns `Ok(None)`. Arguments are consumed strictly left to right.
///
/// ```
/// use argz::{Argz, ParseResult};
///
/// let mut argz = Argz::new("me", ["-v", "-iin.txt", "--output", "out.txt"]);
/// argz.add_flag('v', "verbose")?
///     .add_value('i', "input file")?
///     .add_long_value('o', "output", "output file")?;
///
/// assert_eq!(argz.advance()?, Some(ParseResult::Flag('v')));
/// assert_eq!(argz.advance()?, Some(ParseResult::Value('i', "in.txt".into())));
/// assert_eq!(argz.advance()?, Some(ParseResult::Value('o', "out.txt".into())));
/// assert_eq!(argz.advance()?, None);
/// # Ok::<_, argz::Error>(())
/// ```
#[derive(Debug)]
pub struct Argz {
    program: OsString,
    options: Vec<OptionSpec>,
    args: Vec<OsString>,
    /// Index of the next raw argument.
    cursor: usize,
    /// If we are inside a short options bundle, the byte index of next short key
    /// in `args[cursor]`.
    next_short_idx: Option<NonZero<usize>>,
    /// Whether `--` has been seen.
    only_positional: bool,
    /// Whether bare arguments before `--` are yielded instead of rejected.
    allow_positional: bool,
}

impl Argz {
    /// Create a parser over `args`, which must not contain the program name.
    pub fn new<I, T>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self {
            program: program.into(),
            options: Vec::new(),
            args: args.into_iter().map(Into::into).collect(),
            cursor: 0,
            next_short_idx: None,
            only_positional: false,
            allow_positional: false,
        }
    }

    /// Create a parser from a full argument vector, whose first item is the program path.
    ///
    /// # Errors
    ///
    /// `MissingArg0` if `argv` is empty.
    pub fn try_from_argv<I, T>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut iter = argv.into_iter().map(Into::into);
        let arg0 = iter.next().ok_or(ErrorKind::MissingArg0)?;
        let program = Path::new(&arg0).file_name().unwrap_or(arg0.as_ref()).to_owned();
        Ok(Self::new(program, iter))
    }

    /// Create a parser from the process arguments.
    ///
    /// On failure, the error is printed and the process exits with status 1.
    pub fn from_env() -> Self {
        match Self::try_from_argv(std::env::args_os()) {
            Ok(v) => v,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }

    /// Register an option.
    ///
    /// # Errors
    ///
    /// `DuplicateKey` if the short or long key is already registered, or
    /// `InvalidKey` if a key cannot be used as an option name.
    pub fn register(&mut self, spec: OptionSpec) -> Result<&mut Self> {
        self.schema().check_insert(&spec)?;
        log::debug!("registered option {}", spec.description());
        self.options.push(spec);
        Ok(self)
    }

    /// Register an option from its parts.
    ///
    /// # Errors
    ///
    /// See [`Argz::register`].
    pub fn register_option(
        &mut self,
        short: char,
        long: Option<&str>,
        help: impl Into<Cow<'static, str>>,
        arity: Arity,
    ) -> Result<&mut Self> {
        let mut spec = OptionSpec::new(short, arity).help(help);
        if let Some(long) = long {
            spec = spec.long(long.to_owned());
        }
        self.register(spec)
    }

    /// Register a flag with only a short key. See [`Argz::register`] for errors.
    pub fn add_flag(&mut self, short: char, help: &'static str) -> Result<&mut Self> {
        self.register(OptionSpec::flag(short).help(help))
    }

    /// Register a flag with a short and a long key. See [`Argz::register`] for errors.
    pub fn add_long_flag(
        &mut self,
        short: char,
        long: &'static str,
        help: &'static str,
    ) -> Result<&mut Self> {
        self.register(OptionSpec::flag(short).long(long).help(help))
    }

    /// Register a single-value option with only a short key. See [`Argz::register`] for errors.
    pub fn add_value(&mut self, short: char, help: &'static str) -> Result<&mut Self> {
        self.register(OptionSpec::value(short).help(help))
    }

    /// Register a single-value option with a short and a long key. See [`Argz::register`]
    /// for errors.
    pub fn add_long_value(
        &mut self,
        short: char,
        long: &'static str,
        help: &'static str,
    ) -> Result<&mut Self> {
        self.register(OptionSpec::value(short).long(long).help(help))
    }

    /// Yield arguments not starting with `-` (and a lone `-`) as
    /// [`ParseResult::Positional`] instead of failing with `UnknownOption`.
    ///
    /// Arguments after `--` are always positional.
    pub fn allow_positional(&mut self, yes: bool) -> &mut Self {
        self.allow_positional = yes;
        self
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        Schema::new(&self.options)
    }

    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Whether all arguments are consumed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.next_short_idx.is_none() && self.cursor >= self.args.len()
    }

    /// Render the option listing, in registration order.
    #[cfg(feature = "help")]
    #[must_use]
    pub fn render_help(&self) -> String {
        let mut out = String::new();
        crate::help::render_help_into(&mut out, &self.program, self.schema());
        out
    }

    /// Parse the next logical argument.
    ///
    /// Returns `Ok(None)` when all arguments are consumed, and keeps returning
    /// it on further calls. On error, the offending argument is consumed, so
    /// calling again resumes at the next raw argument.
    ///
    /// # Errors
    ///
    /// `UnknownOption`, `MissingValue`, `UnexpectedValue` or `InvalidUtf8`.
    pub fn advance(&mut self) -> Result<Option<ParseResult>> {
        let ret = self.step();
        match &ret {
            Ok(Some(arg)) => log::trace!("parsed {arg:?} (cursor at {})", self.cursor),
            Ok(None) => log::trace!("no more arguments"),
            Err(err) => log::debug!("parse error at argument {}: {err}", self.cursor),
        }
        ret
    }

    fn step(&mut self) -> Result<Option<ParseResult>> {
        if let Some(pos) = self.next_short_idx {
            return self.step_short(pos.get()).map(Some);
        }

        loop {
            let Some(raw) = self.args.get_mut(self.cursor) else {
                return Ok(None);
            };

            if self.only_positional {
                let arg = std::mem::take(raw);
                self.cursor += 1;
                return Ok(Some(ParseResult::Positional(arg)));
            }
            if *raw == "-" || !raw.starts_with("-") {
                let arg = std::mem::take(raw);
                self.cursor += 1;
                if self.allow_positional {
                    return Ok(Some(ParseResult::Positional(arg)));
                }
                return Err(ErrorKind::UnknownOption.with_input(arg));
            }
            if *raw == "--" {
                self.only_positional = true;
                self.cursor += 1;
                continue;
            }
            if raw.starts_with("--") {
                return self.step_long().map(Some);
            }
            self.next_short_idx = NonZero::new(1);
            return self.step_short(1).map(Some);
        }
    }

    /// Parse `args[cursor]` as `--long` or `--long=value`.
    fn step_long(&mut self) -> Result<ParseResult> {
        let raw = &self.args[self.cursor];
        self.cursor += 1;

        let rest = raw.index(2..);
        let (name, inline) = match rest.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (rest, None),
        };
        let name = name.to_str().ok_or_else(|| ErrorKind::InvalidUtf8.with_input(name.into()))?;
        let Some(spec) = Schema::new(&self.options).find_long(name) else {
            return Err(unknown_option("--", name));
        };
        let (short, arity, reject_hyphen) =
            (spec.get_short(), spec.get_arity(), spec.get_reject_hyphen_values());

        match (arity, inline) {
            (Arity::None, None) => Ok(ParseResult::Flag(short)),
            (Arity::None, Some(v)) => {
                Err(ErrorKind::UnexpectedValue.with_input(v.into()).with_option(spec.description()))
            }
            (Arity::Single, Some(v)) => Ok(ParseResult::Value(short, v.to_owned())),
            (Arity::Single, None) => {
                let value = self.take_value(short, reject_hyphen)?;
                Ok(ParseResult::Value(short, value))
            }
        }
    }

    /// Parse the short key at byte `idx` of `args[cursor]`, which starts with `-`.
    fn step_short(&mut self, idx: usize) -> Result<ParseResult> {
        let raw = &self.args[self.cursor];
        let bytes = raw.as_encoded_bytes();
        debug_assert!(idx < bytes.len());

        // All registered short keys are ASCII. By induction, `bytes[..idx]` is ASCII.
        if !bytes[idx].is_ascii() {
            let err = unknown_non_ascii(raw.index(idx..));
            self.finish_arg();
            return Err(err);
        }
        let key = char::from(bytes[idx]);
        let next_byte = bytes.get(idx + 1).copied();

        let Some(spec) = Schema::new(&self.options).find_short(key) else {
            self.finish_arg();
            return Err(unknown_option("-", &key.to_string()));
        };
        let reject_hyphen = spec.get_reject_hyphen_values();

        match (spec.get_arity(), next_byte) {
            (Arity::None, None) => {
                self.finish_arg();
                Ok(ParseResult::Flag(key))
            }
            (Arity::None, Some(b'=')) => {
                let err = ErrorKind::UnexpectedValue
                    .with_input(raw.index(idx + 2..).to_owned())
                    .with_option(spec.description());
                self.finish_arg();
                Err(err)
            }
            (Arity::None, Some(_)) => {
                self.next_short_idx = NonZero::new(idx + 1);
                Ok(ParseResult::Flag(key))
            }
            (Arity::Single, None) => {
                self.finish_arg();
                let value = self.take_value(key, reject_hyphen)?;
                Ok(ParseResult::Value(key, value))
            }
            (Arity::Single, Some(b)) => {
                let start = if b == b'=' { idx + 2 } else { idx + 1 };
                let value = raw.index(start..).to_owned();
                self.finish_arg();
                Ok(ParseResult::Value(key, value))
            }
        }
    }

    /// Leave the current short options bundle and move to the next raw argument.
    fn finish_arg(&mut self) {
        self.next_short_idx = None;
        self.cursor += 1;
    }

    /// Take the next raw argument as the value of option `short`.
    fn take_value(&mut self, short: char, reject_hyphen: bool) -> Result<OsString> {
        debug_assert!(self.next_short_idx.is_none());
        let usable = self.args.get(self.cursor).is_some_and(|raw| {
            let raw = raw.as_encoded_bytes();
            !reject_hyphen || raw == b"-" || !raw.starts_with(b"-")
        });
        if !usable {
            return Err(self.missing_value(short));
        }
        let value = std::mem::take(&mut self.args[self.cursor]);
        self.cursor += 1;
        Ok(value)
    }

    #[cold]
    fn missing_value(&self, short: char) -> Error {
        let err = Error::from(ErrorKind::MissingValue);
        match self.schema().find_short(short) {
            Some(spec) => err.with_option(spec.description()),
            None => err,
        }
    }
}

#[cold]
fn unknown_option(dashes: &str, key: &str) -> Error {
    ErrorKind::UnknownOption.with_input(key.into()).with_option(format!("{dashes}{key}"))
}

/// The error for a short key starting with a non-ASCII byte.
#[cold]
fn unknown_non_ascii(rest: &OsStr) -> Error {
    let bytes = rest.as_encoded_bytes();
    let valid = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(err) => std::str::from_utf8(&bytes[..err.valid_up_to()]).unwrap_or_default(),
    };
    match valid.chars().next() {
        Some(ch) => unknown_option("-", &ch.to_string()),
        None => ErrorKind::InvalidUtf8.with_input(rest.to_owned()),
    }
}

/// Iterate parsed arguments until all are consumed.
///
/// Iteration continues after an error, resuming at the next raw argument.
impl Iterator for Argz {
    type Item = Result<ParseResult>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().transpose()
    }
}

impl FusedIterator for Argz {}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(args: &[&str]) -> Argz {
        let mut argz = Argz::new("me", args.iter().copied());
        argz.add_flag('a', "all")
            .unwrap()
            .add_long_flag('b', "brief", "brief")
            .unwrap()
            .add_value('i', "input")
            .unwrap()
            .add_long_value('o', "output", "output")
            .unwrap();
        argz
    }

    #[test]
    fn cursor_moves_by_token() {
        let mut argz = parser(&["-i", "x", "-ab", "-o=y"]);
        argz.advance().unwrap();
        assert_eq!(argz.cursor, 2);
        argz.advance().unwrap();
        assert_eq!((argz.cursor, argz.next_short_idx), (2, NonZero::new(2)));
        argz.advance().unwrap();
        assert_eq!((argz.cursor, argz.next_short_idx), (3, None));
        assert!(!argz.is_done());
        argz.advance().unwrap();
        assert!(argz.is_done());
    }

    #[test]
    fn hyphen_value_is_consumed_by_default() {
        let mut argz = parser(&["-i", "-a", "-o", "-5"]);
        assert_eq!(argz.advance().unwrap(), Some(ParseResult::Value('i', "-a".into())));
        assert_eq!(argz.cursor, 2);
        assert_eq!(argz.advance().unwrap(), Some(ParseResult::Value('o', "-5".into())));
        assert!(argz.is_done());
    }

    #[test]
    fn rejected_hyphen_value_is_not_consumed() {
        let mut argz = parser(&["-n", "-a"]);
        argz.register(OptionSpec::value('n').reject_hyphen_values(true)).unwrap();
        let err = argz.advance().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingValue);
        assert_eq!(err.option(), Some("-n <VALUE>"));
        assert_eq!(argz.cursor, 1);
        assert_eq!(argz.advance().unwrap(), Some(ParseResult::Flag('a')));
    }

    #[test]
    fn non_ascii_short() {
        let mut argz = parser(&["-aé"]);
        assert_eq!(argz.advance().unwrap(), Some(ParseResult::Flag('a')));
        let err = argz.advance().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownOption);
        assert_eq!(err.input().unwrap(), "é");
        assert_eq!(err.option(), Some("-é"));
        assert!(argz.is_done());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names() {
        use std::os::unix::ffi::OsStringExt;

        let mut argz = Argz::new(
            "me",
            [OsString::from_vec(b"-\xFF".to_vec()), OsString::from_vec(b"--a\xFF".to_vec())],
        );
        assert_eq!(argz.advance().unwrap_err().kind(), ErrorKind::InvalidUtf8);
        assert_eq!(argz.advance().unwrap_err().kind(), ErrorKind::InvalidUtf8);
        assert_eq!(argz.advance().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_values() {
        use std::os::unix::ffi::OsStringExt;

        let mut argz = parser(&[]);
        argz.args = vec![
            OsString::from_vec(b"-i\xFF".to_vec()),
            OsString::from_vec(b"--output=\xFE".to_vec()),
        ];
        assert_eq!(
            argz.advance().unwrap(),
            Some(ParseResult::Value('i', OsString::from_vec(vec![0xFF])))
        );
        assert_eq!(
            argz.advance().unwrap(),
            Some(ParseResult::Value('o', OsString::from_vec(vec![0xFE])))
        );
    }
}
