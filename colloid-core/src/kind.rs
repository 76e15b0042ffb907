use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar database types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Inet,
    Int,
    Text,
    Timestamp,
    Timeuuid,
    Uuid,
    Varchar,
    Varint,
}

/// Short names accepted wherever a type specification is expected.
const SCALAR_NAMES: &[(&str, ScalarKind)] = &[
    ("ascii", ScalarKind::Ascii),
    ("bigint", ScalarKind::Bigint),
    ("blob", ScalarKind::Blob),
    ("boolean", ScalarKind::Boolean),
    ("counter", ScalarKind::Counter),
    ("decimal", ScalarKind::Decimal),
    ("double", ScalarKind::Double),
    ("float", ScalarKind::Float),
    ("inet", ScalarKind::Inet),
    ("int", ScalarKind::Int),
    ("text", ScalarKind::Text),
    ("timestamp", ScalarKind::Timestamp),
    ("timeuuid", ScalarKind::Timeuuid),
    ("uuid", ScalarKind::Uuid),
    ("varchar", ScalarKind::Varchar),
    ("varint", ScalarKind::Varint),
];

impl ScalarKind {
    /// Returns every scalar kind, in short-name order.
    pub fn all() -> impl Iterator<Item = ScalarKind> {
        SCALAR_NAMES.iter().map(|(_, kind)| *kind)
    }

    /// Looks up a scalar kind by its short name.
    pub fn from_name(name: &str) -> Option<ScalarKind> {
        SCALAR_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, kind)| *kind)
    }

    /// Returns the short name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Ascii => "ascii",
            ScalarKind::Bigint => "bigint",
            ScalarKind::Blob => "blob",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Counter => "counter",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Double => "double",
            ScalarKind::Float => "float",
            ScalarKind::Inet => "inet",
            ScalarKind::Int => "int",
            ScalarKind::Text => "text",
            ScalarKind::Timestamp => "timestamp",
            ScalarKind::Timeuuid => "timeuuid",
            ScalarKind::Uuid => "uuid",
            ScalarKind::Varchar => "varchar",
            ScalarKind::Varint => "varint",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind tag of a [`DataType`](crate::DataType).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Scalar(ScalarKind),
    Map,
    Set,
    Collection,
    Tuple,
    UserType,
    /// Server-side custom type; never accepted by containers.
    Custom,
}

/// Supported kinds in the order they are listed in diagnostics.
const SUPPORTED: &[Kind] = &[
    Kind::Scalar(ScalarKind::Varchar),
    Kind::Scalar(ScalarKind::Text),
    Kind::Scalar(ScalarKind::Blob),
    Kind::Scalar(ScalarKind::Ascii),
    Kind::Scalar(ScalarKind::Bigint),
    Kind::Scalar(ScalarKind::Counter),
    Kind::Scalar(ScalarKind::Int),
    Kind::Scalar(ScalarKind::Varint),
    Kind::Scalar(ScalarKind::Boolean),
    Kind::Scalar(ScalarKind::Decimal),
    Kind::Scalar(ScalarKind::Double),
    Kind::Scalar(ScalarKind::Float),
    Kind::Scalar(ScalarKind::Inet),
    Kind::Scalar(ScalarKind::Timestamp),
    Kind::Scalar(ScalarKind::Uuid),
    Kind::Scalar(ScalarKind::Timeuuid),
    Kind::Map,
    Kind::Set,
    Kind::Collection,
    Kind::Tuple,
    Kind::UserType,
];

impl Kind {
    /// Returns every kind a container can be bound to.
    pub fn supported() -> &'static [Kind] {
        SUPPORTED
    }

    pub fn is_supported(self) -> bool {
        match self {
            Kind::Scalar(_)
            | Kind::Map
            | Kind::Set
            | Kind::Collection
            | Kind::Tuple
            | Kind::UserType => true,
            Kind::Custom => false,
        }
    }

    /// Returns true for kinds parameterized by nested descriptors.
    pub fn is_composite(self) -> bool {
        match self {
            Kind::Map | Kind::Set | Kind::Collection | Kind::Tuple | Kind::UserType => true,
            Kind::Scalar(_) | Kind::Custom => false,
        }
    }

    /// The `DataType` constructor producing a descriptor of this kind.
    fn constructor(self) -> String {
        match self {
            Kind::Scalar(scalar) => format!("DataType::{}()", scalar.name()),
            Kind::Map => "DataType::map()".to_string(),
            Kind::Set => "DataType::set()".to_string(),
            Kind::Collection => "DataType::collection()".to_string(),
            Kind::Tuple => "DataType::tuple()".to_string(),
            Kind::UserType => "DataType::udt()".to_string(),
            Kind::Custom => "DataType::custom()".to_string(),
        }
    }

    /// Human readable enumeration of the supported kinds, e.g.
    /// `DataType::varchar(), ..., DataType::tuple() or DataType::udt()`.
    pub(crate) fn supported_list() -> String {
        let names: Vec<String> = SUPPORTED.iter().map(|kind| kind.constructor()).collect();
        match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
            Some((last, _)) => last.clone(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Scalar(scalar) => f.write_str(scalar.name()),
            Kind::Map => f.write_str("map"),
            Kind::Set => f.write_str("set"),
            Kind::Collection => f.write_str("list"),
            Kind::Tuple => f.write_str("tuple"),
            Kind::UserType => f.write_str("udt"),
            Kind::Custom => f.write_str("custom"),
        }
    }
}
