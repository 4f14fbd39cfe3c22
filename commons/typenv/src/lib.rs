//! Typed environment variable parsing.
//!
//! [`parse`] reads one variable and converts it into the caller's type,
//! returning the supplied default when the variable is absent or empty.
//! Strings, booleans, integers, floats, [`std::time::Duration`],
//! [`chrono::DateTime`], [`url::Url`] and `Vec`s of all of these are handled
//! out of the box; anything else can be plugged in with
//! [`with_custom_marshaller`] or [`with_custom_marshaller_fn`].
//!
//! ```no_run
//! use std::time::Duration;
//! use typenv::{must_parse, parse, with_fallback_to_default_on_error};
//!
//! let port: u16 = must_parse("HTTP_PORT", 8080, &[]);
//! let timeout = parse(
//!     "REQUEST_TIMEOUT",
//!     Duration::from_secs(30),
//!     &[with_fallback_to_default_on_error(true)],
//! )
//! .unwrap();
//! # let _ = (port, timeout);
//! ```

pub mod duration;
pub mod error;
pub mod loader;
pub mod options;
mod parser;
mod value;

pub use duration::{DurationError, parse_duration};
pub use error::{BoxError, EnvError, OptionError, ValueError};
pub use loader::{EnvLoader, ProcessEnv};
pub use options::{
    AnyValue, CustomMarshaller, DEFAULT_SEPARATOR, MarshallerFn, ParseOption,
    ParseOptions, RFC3339, with_custom_marshaller, with_custom_marshaller_fn,
    with_fallback_to_default_on_error, with_loader, with_sensitive,
    with_separator, with_time_layout,
};
pub use parser::{EnvReader, must_parse, parse};
