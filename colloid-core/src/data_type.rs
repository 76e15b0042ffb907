use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::fingerprint::Fingerprint;
use crate::kind::{Kind, ScalarKind};
use crate::map::Map;
use crate::scalar;
use crate::set::Set;
use crate::tuple::Tuple;
use crate::user_type::UserTypeValue;
use crate::value::Value;

/// Type descriptor for database values.
///
/// Descriptors are immutable. Nested parameters are held behind `Arc` so a
/// descriptor can be shared by every container bound to it, across threads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Scalar(ScalarKind),
    Map {
        key: Arc<DataType>,
        value: Arc<DataType>,
    },
    Set(Arc<DataType>),
    /// Ordered collection (`list` in CQL).
    Collection(Arc<DataType>),
    Tuple(Vec<Arc<DataType>>),
    /// User-defined type with ordered named fields.
    UserType {
        name: String,
        fields: Vec<(String, Arc<DataType>)>,
    },
    /// Server-side custom type, identified by its class name.
    Custom(String),
}

/// A caller-supplied type specification, resolved by [`DataType::resolve`].
#[derive(Debug, Clone)]
pub enum TypeSpec {
    /// A short name such as `varchar`, or a CQL type such as `map<int, text>`.
    Name(String),
    /// An existing descriptor.
    Type(Arc<DataType>),
    /// A runtime value supplied where a type was expected. Text values are
    /// treated as names; anything else is rejected.
    Value(Value),
}

impl From<&str> for TypeSpec {
    fn from(name: &str) -> Self {
        TypeSpec::Name(name.to_string())
    }
}

impl From<String> for TypeSpec {
    fn from(name: String) -> Self {
        TypeSpec::Name(name)
    }
}

impl From<DataType> for TypeSpec {
    fn from(data_type: DataType) -> Self {
        TypeSpec::Type(Arc::new(data_type))
    }
}

impl From<&DataType> for TypeSpec {
    fn from(data_type: &DataType) -> Self {
        TypeSpec::Type(Arc::new(data_type.clone()))
    }
}

impl From<Arc<DataType>> for TypeSpec {
    fn from(data_type: Arc<DataType>) -> Self {
        TypeSpec::Type(data_type)
    }
}

impl From<&Arc<DataType>> for TypeSpec {
    fn from(data_type: &Arc<DataType>) -> Self {
        TypeSpec::Type(Arc::clone(data_type))
    }
}

impl From<ScalarKind> for TypeSpec {
    fn from(kind: ScalarKind) -> Self {
        TypeSpec::Type(Arc::new(DataType::Scalar(kind)))
    }
}

impl From<Value> for TypeSpec {
    fn from(value: Value) -> Self {
        TypeSpec::Value(value)
    }
}

/// Descriptor identity: pointer equality first, structural equality otherwise.
pub(crate) fn same_type(a: &Arc<DataType>, b: &Arc<DataType>) -> bool {
    Arc::ptr_eq(a, b) || a == b
}

macro_rules! scalar_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        impl DataType {
            $(
                #[doc = concat!("The `", stringify!($name), "` scalar type.")]
                pub fn $name() -> DataType {
                    DataType::Scalar(ScalarKind::$kind)
                }
            )*
        }
    };
}

scalar_constructors! {
    ascii => Ascii,
    bigint => Bigint,
    blob => Blob,
    boolean => Boolean,
    counter => Counter,
    decimal => Decimal,
    double => Double,
    float => Float,
    inet => Inet,
    int => Int,
    text => Text,
    timestamp => Timestamp,
    timeuuid => Timeuuid,
    uuid => Uuid,
    varchar => Varchar,
    varint => Varint,
}

impl DataType {
    /// Creates a map type.
    pub fn map(key: DataType, value: DataType) -> Self {
        DataType::Map {
            key: Arc::new(key),
            value: Arc::new(value),
        }
    }

    /// Creates a set type.
    pub fn set(element: DataType) -> Self {
        DataType::Set(Arc::new(element))
    }

    /// Creates an ordered collection (list) type.
    pub fn collection(element: DataType) -> Self {
        DataType::Collection(Arc::new(element))
    }

    /// Creates a tuple type.
    pub fn tuple(elements: impl IntoIterator<Item = DataType>) -> Self {
        DataType::Tuple(elements.into_iter().map(Arc::new).collect())
    }

    /// Creates a user-defined type from field definitions.
    pub fn udt<S: Into<String>>(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = (S, DataType)>,
    ) -> Self {
        DataType::UserType {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(field, ty)| (field.into(), Arc::new(ty)))
                .collect(),
        }
    }

    /// Creates a custom type. Custom types can be described but never bound
    /// to a container.
    pub fn custom(class_name: impl Into<String>) -> Self {
        DataType::Custom(class_name.into())
    }

    pub fn kind(&self) -> Kind {
        match self {
            DataType::Scalar(scalar) => Kind::Scalar(*scalar),
            DataType::Map { .. } => Kind::Map,
            DataType::Set(_) => Kind::Set,
            DataType::Collection(_) => Kind::Collection,
            DataType::Tuple(_) => Kind::Tuple,
            DataType::UserType { .. } => Kind::UserType,
            DataType::Custom(_) => Kind::Custom,
        }
    }

    /// Returns the nested descriptors, in declaration order.
    pub fn parameters(&self) -> Vec<&Arc<DataType>> {
        match self {
            DataType::Map { key, value } => vec![key, value],
            DataType::Set(element) | DataType::Collection(element) => vec![element],
            DataType::Tuple(elements) => elements.iter().collect(),
            DataType::UserType { fields, .. } => fields.iter().map(|(_, ty)| ty).collect(),
            DataType::Scalar(_) | DataType::Custom(_) => Vec::new(),
        }
    }

    /// Returns the named fields of a user-defined type; empty for other kinds.
    pub fn fields(&self) -> &[(String, Arc<DataType>)] {
        match self {
            DataType::UserType { fields, .. } => fields,
            _ => &[],
        }
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|(field, _)| field == name)
    }

    /// Finds the first descriptor in this tree whose kind is unsupported.
    fn find_unsupported(&self) -> Option<&DataType> {
        if !self.kind().is_supported() {
            return Some(self);
        }
        self.parameters()
            .into_iter()
            .find_map(|param| param.find_unsupported())
    }

    fn describe_unsupported(&self) -> String {
        match self {
            DataType::Custom(class_name) => format!("custom type '{}'", class_name),
            other => format!("an instance of {}", other),
        }
    }

    /// Resolves a type specification into a supported descriptor.
    ///
    /// `param` names the argument being resolved (e.g. `keyType`) and is
    /// substituted into error messages.
    pub fn resolve(spec: impl Into<TypeSpec>, param: &'static str) -> Result<Arc<DataType>> {
        let resolved = match spec.into() {
            TypeSpec::Type(data_type) => data_type,
            TypeSpec::Name(name) | TypeSpec::Value(Value::Text(name)) => {
                Arc::new(name.parse::<DataType>()?)
            }
            TypeSpec::Value(other) => {
                log::debug!("rejecting {} value as {}", other.type_name(), param);
                return Err(Error::InvalidTypeSpecification {
                    param,
                    given: other.type_name().to_string(),
                });
            }
        };

        if let Some(unsupported) = resolved.find_unsupported() {
            log::debug!("rejecting unsupported {} as {}", unsupported, param);
            return Err(Error::UnsupportedTypeKind {
                param,
                given: unsupported.describe_unsupported(),
            });
        }
        Ok(resolved)
    }

    /// Returns true if `value` has this descriptor's runtime representation.
    ///
    /// Composite values conform only when built with an equal descriptor.
    pub fn conforms(&self, value: &Value) -> bool {
        match (self, value) {
            (DataType::Scalar(kind), value) => scalar::conforms(*kind, value),
            (DataType::Map { key, value: val }, Value::Map(map)) => {
                same_type(key, map.key_type()) && same_type(val, map.value_type())
            }
            (DataType::Set(element), Value::Set(set)) => same_type(element, set.value_type()),
            (DataType::Collection(element), Value::Collection(list)) => {
                same_type(element, list.value_type())
            }
            (DataType::Tuple(types), Value::Tuple(tuple)) => {
                types.len() == tuple.types().len()
                    && types.iter().zip(tuple.types()).all(|(a, b)| same_type(a, b))
            }
            (DataType::UserType { .. }, Value::UserType(udt)) => self == udt.data_type().as_ref(),
            (DataType::Map { .. }, _)
            | (DataType::Set(_), _)
            | (DataType::Collection(_), _)
            | (DataType::Tuple(_), _)
            | (DataType::UserType { .. }, _)
            | (DataType::Custom(_), _) => false,
        }
    }

    /// Converts a single raw argument into a value of this type.
    ///
    /// Scalars accept the conversions listed on [`ScalarKind`] coercion;
    /// composite types only accept values already built with this descriptor.
    pub fn coerce(&self, arg: Value) -> Result<Value> {
        match self {
            DataType::Scalar(kind) => scalar::coerce(*kind, arg),
            DataType::Custom(_) => Err(self.unsupported_here()),
            _ if self.conforms(&arg) => Ok(arg),
            _ => Err(Error::ValueTypeMismatch {
                expected: self.to_string(),
                given: arg.describe(),
            }),
        }
    }

    fn unsupported_here(&self) -> Error {
        Error::UnsupportedTypeKind {
            param: "type",
            given: self.describe_unsupported(),
        }
    }

    /// Creates a value of this type from raw construction arguments.
    ///
    /// - scalars take exactly one argument;
    /// - maps take alternating keys and values;
    /// - sets and lists take their elements;
    /// - tuples take up to one argument per position, the rest stay null;
    /// - user-defined types take alternating field names and values.
    pub fn create<I>(&self, args: I) -> Result<Value>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let args: Vec<Value> = args.into_iter().map(Into::into).collect();
        match self {
            DataType::Scalar(kind) => match <[Value; 1]>::try_from(args) {
                Ok([arg]) => scalar::coerce(*kind, arg),
                Err(args) => Err(Error::invalid_argument(
                    kind,
                    format!("expected exactly one argument, {} given", args.len()),
                )),
            },
            DataType::Map { key, value } => {
                if args.len() % 2 != 0 {
                    return Err(Error::invalid_argument(
                        self,
                        "expected alternating keys and values, odd number of arguments given",
                    ));
                }
                let mut map = Map::from_types(Arc::clone(key), Arc::clone(value));
                let mut args = args.into_iter();
                while let (Some(k), Some(v)) = (args.next(), args.next()) {
                    map.set(key.coerce(k)?, value.coerce(v)?)?;
                }
                Ok(Value::Map(map))
            }
            DataType::Set(element) => {
                let mut set = Set::from_type(Arc::clone(element));
                for arg in args {
                    set.add(element.coerce(arg)?)?;
                }
                Ok(Value::Set(set))
            }
            DataType::Collection(element) => {
                let mut list = Collection::from_type(Arc::clone(element));
                for arg in args {
                    list.add(element.coerce(arg)?)?;
                }
                Ok(Value::Collection(list))
            }
            DataType::Tuple(types) => {
                if args.len() > types.len() {
                    return Err(Error::invalid_argument(
                        self,
                        format!("expected at most {} arguments, {} given", types.len(), args.len()),
                    ));
                }
                let mut tuple = Tuple::from_types(types.clone());
                for (index, (arg, ty)) in args.into_iter().zip(types).enumerate() {
                    tuple.set(index, ty.coerce(arg)?)?;
                }
                Ok(Value::Tuple(tuple))
            }
            DataType::UserType { .. } => {
                if args.len() % 2 != 0 {
                    return Err(Error::invalid_argument(
                        self,
                        "expected alternating field names and values, \
                         odd number of arguments given",
                    ));
                }
                let mut udt = UserTypeValue::from_type(Arc::new(self.clone()));
                let mut args = args.into_iter();
                while let (Some(name), Some(arg)) = (args.next(), args.next()) {
                    let name = match name {
                        Value::Text(name) => name,
                        other => {
                            return Err(Error::invalid_argument(
                                self,
                                format!("field names must be text, {} given", other.type_name()),
                            ));
                        }
                    };
                    let field_type = self.field_type(&name)?;
                    udt.set(&name, field_type.coerce(arg)?)?;
                }
                Ok(Value::UserType(udt))
            }
            DataType::Custom(_) => Err(self.unsupported_here()),
        }
    }

    /// Creates an empty value of a composite type, or fails for scalars.
    pub fn create_empty(&self) -> Result<Value> {
        self.create(std::iter::empty::<Value>())
    }

    pub(crate) fn field_type(&self, name: &str) -> Result<&Arc<DataType>> {
        self.field_index(name)
            .map(|index| &self.fields()[index].1)
            .ok_or_else(|| Error::UnknownField {
                udt: self.to_string(),
                field: name.to_string(),
            })
    }

    /// Serializes this descriptor to canonical CBOR bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        ciborium::into_writer(self, &mut bytes).expect("serialization should not fail");
        bytes
    }

    /// Deserializes a descriptor from CBOR bytes.
    pub fn from_bytes(
        data: &[u8],
    ) -> std::result::Result<Self, ciborium::de::Error<std::io::Error>> {
        ciborium::from_reader(data)
    }

    /// Computes the content fingerprint of this descriptor.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_encoding(&self.to_bytes())
    }
}

/// Formats descriptors in CQL syntax, e.g. `map<varint, varchar>`.
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Scalar(kind) => write!(f, "{}", kind),
            DataType::Map { key, value } => write!(f, "map<{}, {}>", key, value),
            DataType::Set(element) => write!(f, "set<{}>", element),
            DataType::Collection(element) => write!(f, "list<{}>", element),
            DataType::Tuple(elements) => {
                f.write_str("tuple<")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str(">")
            }
            DataType::UserType { name, .. } => f.write_str(name),
            DataType::Custom(class_name) => write!(f, "'{}'", class_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_parameters() {
        let ty = DataType::map(DataType::varint(), DataType::set(DataType::text()));
        assert_eq!(ty.kind(), Kind::Map);
        let params = ty.parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(**params[0], DataType::varint());
        assert_eq!(params[1].kind(), Kind::Set);
        assert!(DataType::int().parameters().is_empty());
    }

    #[test]
    fn display_uses_cql_syntax() {
        let ty = DataType::map(
            DataType::varint(),
            DataType::tuple([DataType::int(), DataType::collection(DataType::text())]),
        );
        assert_eq!(ty.to_string(), "map<varint, tuple<int, list<text>>>");
        assert_eq!(DataType::custom("org.example.Point").to_string(), "'org.example.Point'");
    }

    #[test]
    fn resolve_accepts_names_and_descriptors() {
        assert_eq!(*DataType::resolve("varchar", "keyType").unwrap(), DataType::varchar());
        assert_eq!(
            *DataType::resolve(DataType::set(DataType::int()), "keyType").unwrap(),
            DataType::set(DataType::int())
        );
        assert_eq!(
            *DataType::resolve(Value::text("uuid"), "keyType").unwrap(),
            DataType::uuid()
        );
    }

    #[test]
    fn resolve_shares_existing_descriptors() {
        let shared = Arc::new(DataType::varint());
        let resolved = DataType::resolve(&shared, "keyType").unwrap();
        assert!(Arc::ptr_eq(&shared, &resolved));
    }

    #[test]
    fn resolve_rejects_unknown_names() {
        let err = DataType::resolve("custom type", "keyType").unwrap_err();
        assert_eq!(err, Error::UnsupportedTypeName("custom type".to_string()));
        assert_eq!(err.to_string(), "Unsupported type 'custom type'");
    }

    #[test]
    fn resolve_rejects_non_type_values() {
        let err = DataType::resolve(Value::Int(42), "valueType").unwrap_err();
        assert_eq!(
            err.to_string(),
            "valueType must be a string or an instance of DataType, an instance of int given"
        );
    }

    #[test]
    fn resolve_rejects_nested_custom_types() {
        let ty = DataType::set(DataType::custom("org.example.Point"));
        let err = DataType::resolve(ty, "keyType").unwrap_err();
        assert!(matches!(err, Error::UnsupportedTypeKind { param: "keyType", .. }));
        assert!(err.to_string().ends_with("custom type 'org.example.Point' given"));
    }

    #[test]
    fn create_scalar_requires_one_argument() {
        assert_eq!(DataType::varint().create(["123"]).unwrap(), Value::varint(123));
        assert!(matches!(
            DataType::varint().create_empty(),
            Err(Error::InvalidArgument { .. })
        ));
        assert!(DataType::int().create([1, 2]).is_err());
    }

    #[test]
    fn create_map_consumes_pairs() {
        let ty = DataType::map(DataType::varchar(), DataType::int());
        let value = ty
            .create([Value::text("a"), Value::Int(1), Value::text("b"), Value::Int(2)])
            .unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Value::text("b")).unwrap(), &Value::Int(2));
        assert!(ty.create(["a"]).is_err());
    }

    #[test]
    fn create_tuple_leaves_missing_positions_null() {
        let ty = DataType::tuple([DataType::int(), DataType::text()]);
        let value = ty.create([7]).unwrap();
        let tuple = value.as_tuple().unwrap();
        assert_eq!(tuple.get(0).unwrap(), Some(&Value::Int(7)));
        assert_eq!(tuple.get(1).unwrap(), None);
        assert!(ty.create([1, 2, 3]).is_err());
    }

    #[test]
    fn create_udt_by_field_name() {
        let ty = DataType::udt("address", [("street", DataType::text()), ("zip", DataType::int())]);
        let value = ty.create([Value::text("zip"), Value::Int(12345)]).unwrap();
        let udt = value.as_user_type().unwrap();
        assert_eq!(udt.get("zip").unwrap(), Some(&Value::Int(12345)));
        assert_eq!(udt.get("street").unwrap(), None);

        let err = ty.create([Value::text("city"), Value::text("x")]).unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn create_custom_is_unsupported() {
        let err = DataType::custom("org.example.Point").create_empty().unwrap_err();
        assert!(matches!(err, Error::UnsupportedTypeKind { .. }));
    }

    #[test]
    fn composite_conformance_requires_same_descriptor() {
        let strings = DataType::set(DataType::varchar());
        let value = strings.create(["a"]).unwrap();
        assert!(strings.conforms(&value));
        assert!(!DataType::set(DataType::text()).conforms(&value));
        assert!(!DataType::collection(DataType::varchar()).conforms(&value));
    }

    #[test]
    fn cbor_roundtrip() {
        let original = DataType::udt(
            "point",
            [("x", DataType::double()), ("tags", DataType::set(DataType::text()))],
        );
        let recovered = DataType::from_bytes(&original.to_bytes()).unwrap();
        assert_eq!(original, recovered);
        assert_eq!(original.fingerprint(), recovered.fingerprint());
    }
}
