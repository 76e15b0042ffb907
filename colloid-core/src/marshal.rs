use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;
use std::hash::Hash;
use std::net::IpAddr;
use std::sync::Arc;
use uuid::Uuid;

use crate::collection::Collection;
use crate::data_type::DataType;
use crate::error::Result;
use crate::map::Map;
use crate::set::Set;
use crate::value::{Blob, Value};

/// A Rust type with a fixed database representation.
///
/// Containers built from marshalled values check every element against
/// `data_type()`, so an implementation whose values disagree with its
/// descriptor fails with a type mismatch instead of storing bad data.
pub trait Marshal {
    /// Returns the descriptor every value of this type conforms to.
    fn data_type() -> DataType;

    /// Converts this value into its runtime representation.
    fn to_value(&self) -> Result<Value>;
}

macro_rules! impl_marshal_scalar {
    ($t:ty, $constructor:ident) => {
        impl Marshal for $t {
            fn data_type() -> DataType {
                DataType::$constructor()
            }

            fn to_value(&self) -> Result<Value> {
                Ok(Value::from(self.clone()))
            }
        }
    };
}

impl_marshal_scalar!(bool, boolean);
impl_marshal_scalar!(i32, int);
impl_marshal_scalar!(i64, bigint);
impl_marshal_scalar!(i128, varint);
impl_marshal_scalar!(f32, float);
impl_marshal_scalar!(f64, double);
impl_marshal_scalar!(String, text);
impl_marshal_scalar!(Blob, blob);
impl_marshal_scalar!(Uuid, uuid);
impl_marshal_scalar!(IpAddr, inet);
impl_marshal_scalar!(Decimal, decimal);

impl<T: Marshal> Marshal for Vec<T> {
    fn data_type() -> DataType {
        DataType::collection(T::data_type())
    }

    fn to_value(&self) -> Result<Value> {
        let mut list = Collection::from_type(Arc::new(T::data_type()));
        for item in self {
            list.add(item.to_value()?)?;
        }
        Ok(Value::Collection(list))
    }
}

impl<T: Marshal + Hash + Eq> Marshal for IndexSet<T> {
    fn data_type() -> DataType {
        DataType::set(T::data_type())
    }

    fn to_value(&self) -> Result<Value> {
        let mut set = Set::from_type(Arc::new(T::data_type()));
        for item in self {
            set.add(item.to_value()?)?;
        }
        Ok(Value::Set(set))
    }
}

impl<K: Marshal + Hash + Eq, V: Marshal> Marshal for IndexMap<K, V> {
    fn data_type() -> DataType {
        DataType::map(K::data_type(), V::data_type())
    }

    fn to_value(&self) -> Result<Value> {
        Map::from_marshal(self).map(Value::Map)
    }
}
