use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::error::{BoxError, OptionError};
use crate::loader::{EnvLoader, ProcessEnv};

/// Layout constant selecting strict RFC 3339 parsing, e.g.
/// `2021-01-01T00:00:00Z`.
pub const RFC3339: &str = "%+";

pub const DEFAULT_SEPARATOR: &str = ",";

pub type AnyValue = Box<dyn Any + Send>;

/// Converts a raw string into a value of the type it was registered for.
pub trait CustomMarshaller: Send + Sync {
    fn unmarshal_env(&self, value: &str) -> Result<AnyValue, BoxError>;
}

/// Adapts a plain function into a [`CustomMarshaller`].
pub struct MarshallerFn<F>(pub F);

impl<F> CustomMarshaller for MarshallerFn<F>
where
    F: Fn(&str) -> Result<AnyValue, BoxError> + Send + Sync,
{
    fn unmarshal_env(&self, value: &str) -> Result<AnyValue, BoxError> {
        (self.0)(value)
    }
}

/// Effective settings for one parse call.
///
/// The process-wide template returned by [`ParseOptions::global`] is never
/// mutated; [`ParseOptions::apply`] always works on a clone.
#[derive(Clone)]
pub struct ParseOptions {
    pub(crate) loader: Arc<dyn EnvLoader>,
    pub(crate) separator: String,
    pub(crate) fallback_on_error: bool,
    pub(crate) time_layout: String,
    pub(crate) sensitive: bool,
    pub(crate) marshallers: HashMap<TypeId, Arc<dyn CustomMarshaller>>,
}

static GLOBAL_OPTIONS: LazyLock<ParseOptions> =
    LazyLock::new(ParseOptions::default);

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            loader: Arc::new(ProcessEnv),
            separator: DEFAULT_SEPARATOR.to_string(),
            fallback_on_error: false,
            time_layout: RFC3339.to_string(),
            sensitive: false,
            marshallers: HashMap::new(),
        }
    }
}

impl ParseOptions {
    pub fn global() -> &'static ParseOptions {
        &GLOBAL_OPTIONS
    }

    /// Clone this template and apply `opts` in order. Later options win.
    pub fn apply(
        &self,
        opts: &[ParseOption],
    ) -> Result<ParseOptions, OptionError> {
        let mut effective = self.clone();
        for opt in opts {
            (opt.apply)(&mut effective)?;
        }
        Ok(effective)
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn time_layout(&self) -> &str {
        &self.time_layout
    }

    pub fn fallback_on_error(&self) -> bool {
        self.fallback_on_error
    }

    pub fn sensitive(&self) -> bool {
        self.sensitive
    }

    pub(crate) fn load(&self, name: &str) -> String {
        self.loader.load(name)
    }

    pub(crate) fn marshaller_for(
        &self,
        id: TypeId,
    ) -> Option<&Arc<dyn CustomMarshaller>> {
        self.marshallers.get(&id)
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("separator", &self.separator)
            .field("fallback_on_error", &self.fallback_on_error)
            .field("time_layout", &self.time_layout)
            .field("sensitive", &self.sensitive)
            .field("marshallers", &self.marshallers.len())
            .finish_non_exhaustive()
    }
}

type ApplyFn =
    dyn Fn(&mut ParseOptions) -> Result<(), OptionError> + Send + Sync;

/// A named mutation of [`ParseOptions`]. Options can be reused across calls.
#[derive(Clone)]
pub struct ParseOption {
    name: &'static str,
    apply: Arc<ApplyFn>,
}

impl ParseOption {
    fn new<F>(name: &'static str, apply: F) -> Self
    where
        F: Fn(&mut ParseOptions) -> Result<(), OptionError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            apply: Arc::new(apply),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ParseOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParseOption").field(&self.name).finish()
    }
}

/// Override how raw values are loaded. Mostly useful in tests.
pub fn with_loader<L>(loader: L) -> ParseOption
where
    L: EnvLoader + 'static,
{
    let loader: Arc<dyn EnvLoader> = Arc::new(loader);
    ParseOption::new("with_loader", move |o| {
        o.loader = Arc::clone(&loader);
        Ok(())
    })
}

/// Separator used to split sequence values.
pub fn with_separator(sep: impl Into<String>) -> ParseOption {
    let sep = sep.into();
    ParseOption::new("with_separator", move |o| {
        if sep.is_empty() {
            return Err(OptionError::EmptySeparator {
                option: "with_separator",
            });
        }
        o.separator.clone_from(&sep);
        Ok(())
    })
}

/// Return the caller's default instead of an error when conversion fails.
pub fn with_fallback_to_default_on_error(fallback: bool) -> ParseOption {
    ParseOption::new("with_fallback_to_default_on_error", move |o| {
        o.fallback_on_error = fallback;
        Ok(())
    })
}

/// chrono `strftime` layout for timestamps. Defaults to [`RFC3339`].
pub fn with_time_layout(layout: impl Into<String>) -> ParseOption {
    let layout = layout.into();
    ParseOption::new("with_time_layout", move |o| {
        if layout.is_empty() {
            return Err(OptionError::EmptyTimeLayout {
                option: "with_time_layout",
            });
        }
        o.time_layout.clone_from(&layout);
        Ok(())
    })
}

/// Keep raw values out of logs and error messages.
pub fn with_sensitive(sensitive: bool) -> ParseOption {
    ParseOption::new("with_sensitive", move |o| {
        o.sensitive = sensitive;
        Ok(())
    })
}

/// Register `marshaller` for values of type `T`. It takes precedence over any
/// built-in conversion for `T`.
pub fn with_custom_marshaller<T, M>(marshaller: M) -> ParseOption
where
    T: Any,
    M: CustomMarshaller + 'static,
{
    let marshaller: Arc<dyn CustomMarshaller> = Arc::new(marshaller);
    ParseOption::new("with_custom_marshaller", move |o| {
        o.marshallers
            .insert(TypeId::of::<T>(), Arc::clone(&marshaller));
        Ok(())
    })
}

/// Register a conversion function for values of type `T`.
pub fn with_custom_marshaller_fn<T, E, F>(f: F) -> ParseOption
where
    T: Any + Send,
    E: Into<BoxError>,
    F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
{
    with_custom_marshaller::<T, _>(MarshallerFn(
        move |raw: &str| -> Result<AnyValue, BoxError> {
            f(raw).map(|v| Box::new(v) as AnyValue).map_err(Into::into)
        },
    ))
}
