use std::any::{Any, TypeId, type_name};

use tracing::{debug, error, trace};

use crate::error::{EnvError, OptionError, ValueError};
use crate::options::{ParseOption, ParseOptions};
use crate::value::Builtin;

/// Read `name` from the environment as a `T`, or return `default` when the
/// variable is absent or empty.
///
/// A registered custom marshaller for `T` wins over the built-in
/// conversions. Conversion failures return [`EnvError::Parse`] unless
/// [`with_fallback_to_default_on_error`](crate::with_fallback_to_default_on_error)
/// is set, in which case `default` is returned. Invalid options always fail
/// with [`EnvError::Configuration`].
///
/// ```
/// use std::collections::HashMap;
/// use typenv::{parse, with_loader, with_separator};
///
/// let env = HashMap::from([("PORTS".to_string(), "80;443".to_string())]);
/// let opts = [with_loader(env), with_separator(";")];
/// let ports: Vec<u16> = parse("PORTS", vec![], &opts).unwrap();
/// assert_eq!(ports, vec![80, 443]);
/// ```
pub fn parse<T>(
    name: &str,
    default: T,
    opts: &[ParseOption],
) -> Result<T, EnvError>
where
    T: Any + Send,
{
    parse_with(ParseOptions::global(), name, default, opts)
}

/// Like [`parse`], but logs the error and exits the process with status 1.
pub fn must_parse<T>(name: &str, default: T, opts: &[ParseOption]) -> T
where
    T: Any + Send,
{
    or_exit(name, parse(name, default, opts))
}

/// Parses against a template other than the process-wide default.
#[derive(Debug, Clone, Default)]
pub struct EnvReader {
    base: ParseOptions,
}

impl EnvReader {
    pub fn new(opts: &[ParseOption]) -> Result<Self, OptionError> {
        Ok(Self {
            base: ParseOptions::global().apply(opts)?,
        })
    }

    pub fn options(&self) -> &ParseOptions {
        &self.base
    }

    pub fn parse<T>(
        &self,
        name: &str,
        default: T,
        opts: &[ParseOption],
    ) -> Result<T, EnvError>
    where
        T: Any + Send,
    {
        parse_with(&self.base, name, default, opts)
    }

    pub fn must_parse<T>(
        &self,
        name: &str,
        default: T,
        opts: &[ParseOption],
    ) -> T
    where
        T: Any + Send,
    {
        or_exit(name, self.parse(name, default, opts))
    }
}

impl From<ParseOptions> for EnvReader {
    fn from(base: ParseOptions) -> Self {
        Self { base }
    }
}

fn parse_with<T>(
    base: &ParseOptions,
    name: &str,
    default: T,
    opts: &[ParseOption],
) -> Result<T, EnvError>
where
    T: Any + Send,
{
    let opts = base.apply(opts)?;
    let raw = opts.load(name);
    if raw.is_empty() {
        trace!(env_var = name, "env var not set, using default");
        return Ok(default);
    }

    match convert::<T>(name, &raw, &opts) {
        Ok(value) => {
            if opts.sensitive() {
                debug!(env_var = name, "parsed sensitive env var");
            } else {
                debug!(env_var = name, value = %raw, "parsed env var");
            }
            Ok(value)
        }
        Err(err) if opts.fallback_on_error() => {
            debug!(
                env_var = name,
                error = %err,
                "failed to parse env var, using default"
            );
            Ok(default)
        }
        Err(err) => Err(err),
    }
}

fn convert<T>(
    name: &str,
    raw: &str,
    opts: &ParseOptions,
) -> Result<T, EnvError>
where
    T: Any + Send,
{
    let type_name = type_name::<T>();
    let parse_err = |cause: ValueError| EnvError::Parse {
        name: name.to_string(),
        type_name,
        cause: if opts.sensitive() {
            ValueError::Redacted
        } else {
            cause
        },
    };

    let id = TypeId::of::<T>();
    let value = if let Some(marshaller) = opts.marshaller_for(id) {
        trace!(env_var = name, type_name, "using custom marshaller");
        marshaller
            .unmarshal_env(raw)
            .map_err(|e| parse_err(ValueError::Custom(e)))?
    } else if let Some(builtin) = Builtin::lookup(id) {
        trace!(
            env_var = name,
            kind = builtin.kind(),
            sequence = builtin.is_sequence(),
            "using built-in conversion"
        );
        builtin.convert(raw, opts).map_err(parse_err)?
    } else {
        return Err(EnvError::UnsupportedType {
            name: name.to_string(),
            type_name,
        });
    };

    value
        .downcast::<T>()
        .map(|v| *v)
        .map_err(|_| EnvError::TypeMismatch {
            name: name.to_string(),
            type_name,
        })
}

fn or_exit<T>(name: &str, result: Result<T, EnvError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            error!(env_var = name, error = %err, "failed to parse env var");
            std::process::exit(1);
        }
    }
}
