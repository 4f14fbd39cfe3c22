//! Built-in conversions, keyed by the `TypeId` of the target type.

use std::any::TypeId;
use std::collections::HashMap;
use std::num::IntErrorKind;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::format::ParseErrorKind;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use url::Url;

use crate::duration::parse_duration;
use crate::error::ValueError;
use crate::options::{AnyValue, ParseOptions, RFC3339};

/// A type with a built-in single-value conversion.
pub(crate) trait Scalar: Sized + Send + 'static {
    const KIND: &'static str;

    fn parse_scalar(raw: &str, opts: &ParseOptions) -> Result<Self, ValueError>;
}

type ConvertFn = fn(&str, &ParseOptions) -> Result<AnyValue, ValueError>;

#[derive(Clone, Copy)]
pub(crate) enum Builtin {
    Scalar {
        kind: &'static str,
        convert: ConvertFn,
    },
    Sequence {
        element: &'static str,
        convert: ConvertFn,
    },
}

static BUILTINS: LazyLock<HashMap<TypeId, Builtin>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    register::<String>(&mut table);
    register::<bool>(&mut table);
    register::<i8>(&mut table);
    register::<i16>(&mut table);
    register::<i32>(&mut table);
    register::<i64>(&mut table);
    register::<isize>(&mut table);
    register::<u8>(&mut table);
    register::<u16>(&mut table);
    register::<u32>(&mut table);
    register::<u64>(&mut table);
    register::<usize>(&mut table);
    register::<f32>(&mut table);
    register::<f64>(&mut table);
    register::<Duration>(&mut table);
    register::<DateTime<Utc>>(&mut table);
    register::<DateTime<FixedOffset>>(&mut table);
    register::<Url>(&mut table);
    table
});

fn register<T: Scalar>(table: &mut HashMap<TypeId, Builtin>) {
    table.insert(
        TypeId::of::<T>(),
        Builtin::Scalar {
            kind: T::KIND,
            convert: convert_scalar::<T>,
        },
    );
    table.insert(
        TypeId::of::<Vec<T>>(),
        Builtin::Sequence {
            element: T::KIND,
            convert: convert_sequence::<T>,
        },
    );
}

impl Builtin {
    pub(crate) fn lookup(id: TypeId) -> Option<Builtin> {
        BUILTINS.get(&id).copied()
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Builtin::Scalar { kind, .. } => *kind,
            Builtin::Sequence { element, .. } => *element,
        }
    }

    pub(crate) fn is_sequence(&self) -> bool {
        matches!(self, Builtin::Sequence { .. })
    }

    pub(crate) fn convert(
        &self,
        raw: &str,
        opts: &ParseOptions,
    ) -> Result<AnyValue, ValueError> {
        match self {
            Builtin::Scalar { convert, .. }
            | Builtin::Sequence { convert, .. } => convert(raw, opts),
        }
    }
}

fn convert_scalar<T: Scalar>(
    raw: &str,
    opts: &ParseOptions,
) -> Result<AnyValue, ValueError> {
    T::parse_scalar(raw, opts).map(|v| Box::new(v) as AnyValue)
}

fn convert_sequence<T: Scalar>(
    raw: &str,
    opts: &ParseOptions,
) -> Result<AnyValue, ValueError> {
    parse_sequence::<T>(raw, opts).map(|v| Box::new(v) as AnyValue)
}

/// Split on the configured separator, trim each item and convert in order.
/// Stops at the first failing item.
pub(crate) fn parse_sequence<T: Scalar>(
    raw: &str,
    opts: &ParseOptions,
) -> Result<Vec<T>, ValueError> {
    raw.split(opts.separator())
        .map(str::trim)
        .enumerate()
        .map(|(pos, item)| {
            T::parse_scalar(item, opts).map_err(|e| ValueError::Item {
                pos,
                value: item.to_string(),
                cause: Box::new(e),
            })
        })
        .collect()
}

impl Scalar for String {
    const KIND: &'static str = "string";

    fn parse_scalar(raw: &str, _: &ParseOptions) -> Result<Self, ValueError> {
        Ok(raw.to_string())
    }
}

impl Scalar for bool {
    const KIND: &'static str = "bool";

    fn parse_scalar(raw: &str, _: &ParseOptions) -> Result<Self, ValueError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ValueError::invalid_syntax(Self::KIND, raw)),
        }
    }
}

macro_rules! integer_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: &'static str = stringify!($ty);

                fn parse_scalar(
                    raw: &str,
                    _: &ParseOptions,
                ) -> Result<Self, ValueError> {
                    raw.parse::<$ty>().map_err(|e| match e.kind() {
                        IntErrorKind::PosOverflow
                        | IntErrorKind::NegOverflow => {
                            ValueError::out_of_range(Self::KIND, raw)
                        }
                        _ => ValueError::invalid_syntax(Self::KIND, raw),
                    })
                }
            }
        )*
    };
}

integer_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: &'static str = stringify!($ty);

                fn parse_scalar(
                    raw: &str,
                    _: &ParseOptions,
                ) -> Result<Self, ValueError> {
                    let v = raw.parse::<$ty>().map_err(|_| {
                        ValueError::invalid_syntax(Self::KIND, raw)
                    })?;
                    // overflow parses as infinity; only explicit tokens may
                    if v.is_infinite() && !is_infinity_token(raw) {
                        return Err(ValueError::out_of_range(Self::KIND, raw));
                    }
                    Ok(v)
                }
            }
        )*
    };
}

float_scalar!(f32, f64);

fn is_infinity_token(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf")
        || unsigned.eq_ignore_ascii_case("infinity")
}

impl Scalar for Duration {
    const KIND: &'static str = "duration";

    fn parse_scalar(raw: &str, _: &ParseOptions) -> Result<Self, ValueError> {
        Ok(parse_duration(raw)?)
    }
}

impl Scalar for DateTime<FixedOffset> {
    const KIND: &'static str = "timestamp";

    fn parse_scalar(
        raw: &str,
        opts: &ParseOptions,
    ) -> Result<Self, ValueError> {
        parse_time(raw, opts.time_layout())
    }
}

impl Scalar for DateTime<Utc> {
    const KIND: &'static str = "timestamp";

    fn parse_scalar(
        raw: &str,
        opts: &ParseOptions,
    ) -> Result<Self, ValueError> {
        parse_time(raw, opts.time_layout()).map(|t| t.with_timezone(&Utc))
    }
}

impl Scalar for Url {
    const KIND: &'static str = "url";

    fn parse_scalar(raw: &str, _: &ParseOptions) -> Result<Self, ValueError> {
        Url::parse(raw).map_err(|cause| ValueError::Url {
            value: raw.to_string(),
            cause,
        })
    }
}

/// Layouts that carry no offset are read as UTC; date-only layouts as
/// midnight UTC.
fn parse_time(
    raw: &str,
    layout: &str,
) -> Result<DateTime<FixedOffset>, ValueError> {
    let err = |cause: chrono::ParseError| ValueError::Time {
        value: raw.to_string(),
        layout: layout.to_string(),
        cause,
    };
    if layout == RFC3339 {
        return DateTime::parse_from_rfc3339(raw).map_err(err);
    }
    match DateTime::parse_from_str(raw, layout) {
        Ok(t) => Ok(t),
        Err(e) if e.kind() == ParseErrorKind::NotEnough => {
            let naive = match NaiveDateTime::parse_from_str(raw, layout) {
                Ok(dt) => dt,
                Err(e) if e.kind() == ParseErrorKind::NotEnough => {
                    NaiveDate::parse_from_str(raw, layout)
                        .map_err(err)?
                        .and_time(NaiveTime::MIN)
                }
                Err(e) => return Err(err(e)),
            };
            Ok(naive.and_utc().fixed_offset())
        }
        Err(e) => Err(err(e)),
    }
}
