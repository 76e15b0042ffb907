use rust_decimal::Decimal;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use uuid::Uuid;

use crate::collection::Collection;
use crate::equality;
use crate::map::Map;
use crate::set::Set;
use crate::tuple::Tuple;
use crate::user_type::UserTypeValue;

/// A wrapper for byte sequences, so `blob` values are not confused with lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    pub fn new(data: Vec<u8>) -> Self {
        Blob(data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(v: Vec<u8>) -> Self {
        Blob(v)
    }
}

impl From<&[u8]> for Blob {
    fn from(v: &[u8]) -> Self {
        Blob(v.to_vec())
    }
}

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// A concrete database value.
///
/// Scalars carry their underlying representation only; several kinds share one
/// representation (`ascii`/`text`/`varchar` are all [`Value::Text`], `bigint`
/// and `counter` are both [`Value::Bigint`], `uuid` and `timeuuid` are both
/// [`Value::Uuid`]). Composite values carry the descriptors they were built
/// with.
///
/// Equality and hashing are structural: two independently built values with
/// the same contents are equal and hash alike.
#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Bigint(i64),
    Blob(Blob),
    Boolean(bool),
    Decimal(Decimal),
    Double(f64),
    Float(f32),
    Inet(IpAddr),
    Int(i32),
    /// Milliseconds since the Unix epoch.
    Timestamp(i64),
    Uuid(Uuid),
    /// Arbitrary precision integer, limited to the 128-bit signed range.
    Varint(i128),
    Map(Map),
    Set(Set),
    Collection(Collection),
    Tuple(Tuple),
    UserType(UserTypeValue),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn bigint(n: i64) -> Self {
        Value::Bigint(n)
    }

    pub fn varint(n: i128) -> Self {
        Value::Varint(n)
    }

    pub fn timestamp(millis: i64) -> Self {
        Value::Timestamp(millis)
    }

    pub fn blob(data: impl Into<Blob>) -> Self {
        Value::Blob(data.into())
    }

    /// Name of the value's representation, as used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Bigint(_) => "bigint",
            Value::Blob(_) => "blob",
            Value::Boolean(_) => "boolean",
            Value::Decimal(_) => "decimal",
            Value::Double(_) => "double",
            Value::Float(_) => "float",
            Value::Inet(_) => "inet",
            Value::Int(_) => "int",
            Value::Timestamp(_) => "timestamp",
            Value::Uuid(_) => "uuid",
            Value::Varint(_) => "varint",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Collection(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::UserType(_) => "udt",
        }
    }

    /// Describes the value's type for mismatch diagnostics. Composite values
    /// report their full descriptor, e.g. `map<varchar, varchar>`.
    pub fn describe(&self) -> String {
        match self {
            Value::Map(map) => map.data_type().to_string(),
            Value::Set(set) => set.data_type().to_string(),
            Value::Collection(list) => list.data_type().to_string(),
            Value::Tuple(tuple) => tuple.data_type().to_string(),
            Value::UserType(udt) => udt.data_type().to_string(),
            scalar => scalar.type_name().to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }

    pub fn as_user_type(&self) -> Option<&UserTypeValue> {
        match self {
            Value::UserType(udt) => Some(udt),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equality::values_eq(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        equality::hash_value(self, state)
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

struct Nullable<'a>(Option<&'a Value>);

impl fmt::Display for Nullable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("null"),
        }
    }
}

/// Formats values as CQL literals.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Bigint(n) => write!(f, "{}", n),
            Value::Blob(blob) => write!(f, "{}", blob),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Double(d) => write!(f, "{}", d),
            Value::Float(d) => write!(f, "{}", d),
            Value::Inet(addr) => write!(f, "'{}'", addr),
            Value::Int(n) => write!(f, "{}", n),
            Value::Timestamp(millis) => write!(f, "{}", millis),
            Value::Uuid(uuid) => write!(f, "{}", uuid),
            Value::Varint(n) => write!(f, "{}", n),
            Value::Map(map) => {
                f.write_str("{")?;
                write_joined(f, map.iter().map(|(k, v)| format!("{}: {}", k, v)))?;
                f.write_str("}")
            }
            Value::Set(set) => {
                f.write_str("{")?;
                write_joined(f, set.iter())?;
                f.write_str("}")
            }
            Value::Collection(list) => {
                f.write_str("[")?;
                write_joined(f, list.iter())?;
                f.write_str("]")
            }
            Value::Tuple(tuple) => {
                f.write_str("(")?;
                write_joined(f, tuple.iter().map(Nullable))?;
                f.write_str(")")
            }
            Value::UserType(udt) => {
                f.write_str("{")?;
                write_joined(
                    f,
                    udt.iter().map(|(name, value)| format!("{}: {}", name, Nullable(value))),
                )?;
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

macro_rules! impl_from_scalar {
    ($t:ty, $variant:ident) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v)
            }
        }
    };
}

impl_from_scalar!(bool, Boolean);
impl_from_scalar!(i32, Int);
impl_from_scalar!(i64, Bigint);
impl_from_scalar!(i128, Varint);
impl_from_scalar!(f32, Float);
impl_from_scalar!(f64, Double);
impl_from_scalar!(Blob, Blob);
impl_from_scalar!(Decimal, Decimal);
impl_from_scalar!(IpAddr, Inet);
impl_from_scalar!(Uuid, Uuid);
impl_from_scalar!(Map, Map);
impl_from_scalar!(Set, Set);
impl_from_scalar!(Collection, Collection);
impl_from_scalar!(Tuple, Tuple);
impl_from_scalar!(UserTypeValue, UserType);

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(Blob(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn scalar_equality_is_by_value() {
        assert_eq!(Value::varint(9223372036854775808), Value::varint(9223372036854775808));
        assert_eq!(
            Value::Decimal(Decimal::from_str("3.14159265359").unwrap()),
            Value::Decimal(Decimal::from_str("3.14159265359").unwrap())
        );
        assert_eq!(Value::Double(3.14159), Value::Double(3.14159));
        assert_ne!(Value::Int(1), Value::Bigint(1));
    }

    #[test]
    fn text_literal_escapes_quotes() {
        assert_eq!(Value::text("it's").to_string(), "'it''s'");
    }

    #[test]
    fn blob_displays_as_hex() {
        assert_eq!(Value::blob(b"blob".as_slice()).to_string(), "0x626c6f62");
    }

    #[test]
    fn describe_scalars_by_representation() {
        assert_eq!(Value::from(true).describe(), "boolean");
        assert_eq!(Value::from("x").describe(), "text");
        assert_eq!(Value::varint(1).type_name(), "varint");
    }
}
