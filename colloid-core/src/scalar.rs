//! Scalar domains: which representation each scalar kind stores, and how raw
//! construction arguments are converted into it.

use rust_decimal::Decimal;
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::kind::ScalarKind;
use crate::value::{Blob, Value};

/// Version number of time-based uuids.
const TIME_UUID_VERSION: usize = 1;

fn is_time_uuid(uuid: &Uuid) -> bool {
    uuid.get_version_num() == TIME_UUID_VERSION
}

/// Returns true if `value` uses the representation of `kind`.
pub(crate) fn conforms(kind: ScalarKind, value: &Value) -> bool {
    match kind {
        ScalarKind::Ascii => matches!(value, Value::Text(s) if s.is_ascii()),
        ScalarKind::Text | ScalarKind::Varchar => matches!(value, Value::Text(_)),
        ScalarKind::Bigint | ScalarKind::Counter => matches!(value, Value::Bigint(_)),
        ScalarKind::Blob => matches!(value, Value::Blob(_)),
        ScalarKind::Boolean => matches!(value, Value::Boolean(_)),
        ScalarKind::Decimal => matches!(value, Value::Decimal(_)),
        ScalarKind::Double => matches!(value, Value::Double(_)),
        ScalarKind::Float => matches!(value, Value::Float(_)),
        ScalarKind::Inet => matches!(value, Value::Inet(_)),
        ScalarKind::Int => matches!(value, Value::Int(_)),
        ScalarKind::Timestamp => matches!(value, Value::Timestamp(_)),
        ScalarKind::Timeuuid => matches!(value, Value::Uuid(uuid) if is_time_uuid(uuid)),
        ScalarKind::Uuid => matches!(value, Value::Uuid(_)),
        ScalarKind::Varint => matches!(value, Value::Varint(_)),
    }
}

fn mismatch(kind: ScalarKind, value: &Value) -> Error {
    Error::ValueTypeMismatch {
        expected: kind.name().to_string(),
        given: value.describe(),
    }
}

fn parse<T>(kind: ScalarKind, s: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.trim()
        .parse::<T>()
        .map_err(|e| Error::invalid_argument(kind, format!("cannot parse '{}': {}", s, e)))
}

fn out_of_range(kind: ScalarKind, value: impl std::fmt::Display) -> Error {
    Error::invalid_argument(kind, format!("{} is out of range", value))
}

/// Builds a time-based uuid from whole seconds since the Unix epoch, with a
/// zero node id and clock sequence so equal inputs give equal uuids.
fn time_uuid_from_unix(seconds: i64) -> Result<Uuid> {
    let seconds = u64::try_from(seconds).map_err(|_| out_of_range(ScalarKind::Timeuuid, seconds))?;
    let ts = uuid::Timestamp::from_unix(uuid::NoContext, seconds, 0);
    Ok(Uuid::new_v1(ts, &[0; 6]))
}

fn time_uuid(uuid: Uuid) -> Result<Value> {
    if is_time_uuid(&uuid) {
        Ok(Value::Uuid(uuid))
    } else {
        Err(Error::invalid_argument(
            ScalarKind::Timeuuid,
            format!("{} is a version {} uuid, expected version 1", uuid, uuid.get_version_num()),
        ))
    }
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let trimmed = s.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| {
            Error::invalid_argument(ScalarKind::Decimal, format!("cannot parse '{}': {}", s, e))
        })
}

/// Converts a raw argument into the representation of `kind`.
pub(crate) fn coerce(kind: ScalarKind, value: Value) -> Result<Value> {
    if conforms(kind, &value) {
        return Ok(value);
    }

    match (kind, value) {
        (ScalarKind::Ascii, Value::Text(s)) => Err(Error::invalid_argument(
            kind,
            format!("'{}' contains non-ASCII characters", s),
        )),

        (ScalarKind::Bigint | ScalarKind::Counter, Value::Int(n)) => {
            Ok(Value::Bigint(i64::from(n)))
        }
        (ScalarKind::Bigint | ScalarKind::Counter, Value::Varint(n)) => i64::try_from(n)
            .map(Value::Bigint)
            .map_err(|_| out_of_range(kind, n)),
        (ScalarKind::Bigint | ScalarKind::Counter, Value::Text(s)) => {
            parse(kind, &s).map(Value::Bigint)
        }

        (ScalarKind::Blob, Value::Text(s)) => Ok(Value::Blob(Blob(s.into_bytes()))),

        (ScalarKind::Boolean, Value::Text(s)) => parse(kind, &s).map(Value::Boolean),

        (ScalarKind::Decimal, Value::Int(n)) => Ok(Value::Decimal(Decimal::from(n))),
        (ScalarKind::Decimal, Value::Bigint(n)) => Ok(Value::Decimal(Decimal::from(n))),
        (ScalarKind::Decimal, Value::Varint(n)) => Decimal::try_from_i128_with_scale(n, 0)
            .map(Value::Decimal)
            .map_err(|_| out_of_range(kind, n)),
        (ScalarKind::Decimal, Value::Double(d)) => Decimal::try_from(d)
            .map(Value::Decimal)
            .map_err(|_| out_of_range(kind, d)),
        (ScalarKind::Decimal, Value::Text(s)) => parse_decimal(&s).map(Value::Decimal),

        (ScalarKind::Double, Value::Float(d)) => Ok(Value::Double(f64::from(d))),
        (ScalarKind::Double, Value::Int(n)) => Ok(Value::Double(f64::from(n))),
        (ScalarKind::Double, Value::Text(s)) => parse(kind, &s).map(Value::Double),

        (ScalarKind::Float, Value::Double(d)) => Ok(Value::Float(d as f32)),
        (ScalarKind::Float, Value::Int(n)) => Ok(Value::Float(n as f32)),
        (ScalarKind::Float, Value::Text(s)) => parse(kind, &s).map(Value::Float),

        (ScalarKind::Inet, Value::Text(s)) => parse::<IpAddr>(kind, &s).map(Value::Inet),

        (ScalarKind::Int, Value::Bigint(n)) => i32::try_from(n)
            .map(Value::Int)
            .map_err(|_| out_of_range(kind, n)),
        (ScalarKind::Int, Value::Varint(n)) => i32::try_from(n)
            .map(Value::Int)
            .map_err(|_| out_of_range(kind, n)),
        (ScalarKind::Int, Value::Text(s)) => parse(kind, &s).map(Value::Int),

        (ScalarKind::Timestamp, Value::Int(n)) => Ok(Value::Timestamp(i64::from(n))),
        (ScalarKind::Timestamp, Value::Bigint(n)) => Ok(Value::Timestamp(n)),

        (ScalarKind::Timeuuid, Value::Uuid(uuid)) => time_uuid(uuid),
        (ScalarKind::Timeuuid, Value::Text(s)) => time_uuid(parse(kind, &s)?),
        (ScalarKind::Timeuuid, Value::Int(n)) => time_uuid_from_unix(i64::from(n)).map(Value::Uuid),
        (ScalarKind::Timeuuid, Value::Bigint(n)) => time_uuid_from_unix(n).map(Value::Uuid),

        (ScalarKind::Uuid, Value::Text(s)) => parse(kind, &s).map(Value::Uuid),

        (ScalarKind::Varint, Value::Int(n)) => Ok(Value::Varint(i128::from(n))),
        (ScalarKind::Varint, Value::Bigint(n)) => Ok(Value::Varint(i128::from(n))),
        (ScalarKind::Varint, Value::Text(s)) => parse(kind, &s).map(Value::Varint),

        (kind, other) => Err(mismatch(kind, &other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_representations() {
        for kind in [ScalarKind::Ascii, ScalarKind::Text, ScalarKind::Varchar] {
            assert!(conforms(kind, &Value::text("abc")));
        }
        assert!(conforms(ScalarKind::Counter, &Value::Bigint(1)));
        assert!(!conforms(ScalarKind::Bigint, &Value::Int(1)));
        assert!(!conforms(ScalarKind::Ascii, &Value::text("héllo")));
    }

    #[test]
    fn varint_covers_128_bit_range() {
        let value = coerce(ScalarKind::Varint, Value::text("9223372036854775808")).unwrap();
        assert_eq!(value, Value::Varint(9_223_372_036_854_775_808));

        let max = i128::MAX.to_string();
        assert!(coerce(ScalarKind::Varint, Value::text(max.as_str())).is_ok());
        let too_big = format!("{}0", max);
        assert!(matches!(
            coerce(ScalarKind::Varint, Value::text(too_big)),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn bigint_range_is_checked() {
        assert_eq!(
            coerce(ScalarKind::Bigint, Value::text("9223372036854775807")).unwrap(),
            Value::Bigint(i64::MAX)
        );
        assert!(coerce(ScalarKind::Bigint, Value::Varint(i128::from(i64::MAX) + 1)).is_err());
        assert!(coerce(ScalarKind::Int, Value::Bigint(i64::from(i32::MAX) + 1)).is_err());
    }

    #[test]
    fn decimal_from_text_and_numbers() {
        let value = coerce(ScalarKind::Decimal, Value::text("3.14159265359")).unwrap();
        assert_eq!(value.to_string(), "3.14159265359");
        assert_eq!(
            coerce(ScalarKind::Decimal, Value::text("1.5e3")).unwrap(),
            Value::Decimal(Decimal::from(1500))
        );
        assert_eq!(
            coerce(ScalarKind::Decimal, Value::Int(7)).unwrap(),
            Value::Decimal(Decimal::from(7))
        );
    }

    #[test]
    fn inet_and_uuid_from_text() {
        assert!(matches!(
            coerce(ScalarKind::Inet, Value::text("127.0.0.1")).unwrap(),
            Value::Inet(addr) if addr.is_loopback()
        ));
        assert!(coerce(ScalarKind::Inet, Value::text("not an address")).is_err());

        let text = Value::text("03398c99-c635-4fad-b30a-3b2c49f785c2");
        let uuid = coerce(ScalarKind::Uuid, text).unwrap();
        assert_eq!(uuid.to_string(), "03398c99-c635-4fad-b30a-3b2c49f785c2");
    }

    #[test]
    fn timeuuid_requires_version_one() {
        let random = Value::text("03398c99-c635-4fad-b30a-3b2c49f785c2");
        assert!(coerce(ScalarKind::Timeuuid, random).is_err());

        let a = coerce(ScalarKind::Timeuuid, Value::Int(0)).unwrap();
        let b = coerce(ScalarKind::Timeuuid, Value::Int(0)).unwrap();
        assert_eq!(a, b);
        assert!(conforms(ScalarKind::Timeuuid, &a));
        assert!(coerce(ScalarKind::Timeuuid, Value::Int(-1)).is_err());
    }

    #[test]
    fn incompatible_representation_is_a_mismatch() {
        let err = coerce(ScalarKind::Boolean, Value::Int(1)).unwrap_err();
        assert_eq!(
            err,
            Error::ValueTypeMismatch {
                expected: "boolean".to_string(),
                given: "int".to_string(),
            }
        );
    }

    #[test]
    fn blob_from_text() {
        assert_eq!(
            coerce(ScalarKind::Blob, Value::text("blob")).unwrap(),
            Value::blob(b"blob".to_vec())
        );
    }
}
