//! *A small getopt-style command line option parser.*
//!
//! Options are registered at runtime with a short key, an optional long key, a
//! description and an [`Arity`]. The parser then yields one [`ParseResult`] per
//! call to [`Argz::advance`], strictly left to right:
//!
//! - `-f`, `--flag` for flags;
//! - `-iVALUE`, `-i=VALUE`, `-i VALUE`, `--input=VALUE`, `--input VALUE` for
//!   single-value options;
//! - `-abc` bundles of short flags, where the last one may take the rest as value;
//! - `--` to stop option parsing; everything after it is yielded as
//!   [`ParseResult::Positional`]. Other arguments not starting with `-` fail
//!   with `UnknownOption` unless [`Argz::allow_positional`] is set.
//!
//! There is no notion of required options. Checking that an option was given is
//! up to the caller.
//!
//! ```
//! use argz::{Argz, ParseResult};
//!
//! let mut argz = Argz::try_from_argv(["/usr/bin/me", "-I", "in.txt"])?;
//! argz.add_value('i', "input text")?
//!     .add_long_value('I', "input", "input file")?
//!     .add_long_flag('h', "help", "print help")?;
//!
//! let mut input = None;
//! while let Some(arg) = argz.advance()? {
//!     match arg {
//!         ParseResult::Flag('h') => {
//!             print!("{}", argz.render_help());
//!             return Ok(());
//!         }
//!         ParseResult::Value('i' | 'I', v) => input = Some(v),
//!         _ => {}
//!     }
//! }
//! assert_eq!(input.unwrap(), "in.txt");
//! # Ok::<_, argz::Error>(())
//! ```
#![forbid(unsafe_code)]

mod error;
mod runtime;
mod schema;
mod values;

#[cfg(feature = "help")]
mod help;

pub use crate::error::{Error, ErrorKind};
pub use crate::runtime::Argz;
pub use crate::schema::{Arity, OptionSpec, Schema};
pub use crate::values::ParseResult;

pub type Result<T, E = Error> = std::result::Result<T, E>;
