use indexmap::IndexMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::data_type::{DataType, TypeSpec};
use crate::equality;
use crate::error::{Error, Result};
use crate::marshal::Marshal;
use crate::value::Value;

/// A key/value container with key and value types bound at construction.
///
/// Entries are kept in first-insertion order: re-setting an existing key
/// replaces its value without moving it. Keys are matched by structural
/// equality, so an independently built copy of a key finds the same entry.
///
/// # Example
///
/// ```
/// use colloid_core::{Map, Value};
///
/// let mut map = Map::new("varint", "varchar").unwrap();
/// map.set(Value::varint(1), "a").unwrap();
/// map.set(Value::varint(2), "b").unwrap();
///
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(&Value::varint(2)).unwrap(), &Value::text("b"));
/// ```
#[derive(Debug, Clone)]
pub struct Map {
    key_type: Arc<DataType>,
    value_type: Arc<DataType>,
    entries: IndexMap<Value, Value>,
}

impl Map {
    /// Creates an empty map, resolving both type specifications.
    pub fn new(key_type: impl Into<TypeSpec>, value_type: impl Into<TypeSpec>) -> Result<Self> {
        let key_type = DataType::resolve(key_type, "keyType")?;
        let value_type = DataType::resolve(value_type, "valueType")?;
        Ok(Map::from_types(key_type, value_type))
    }

    /// Creates an empty map from already resolved descriptors.
    pub(crate) fn from_types(key_type: Arc<DataType>, value_type: Arc<DataType>) -> Self {
        log::trace!("new map<{}, {}>", key_type, value_type);
        Map {
            key_type,
            value_type,
            entries: IndexMap::new(),
        }
    }

    /// Builds a map from Rust values whose types are known statically.
    ///
    /// Every entry goes through [`Map::set`], so a `Marshal` implementation
    /// producing values outside its declared type is reported, not stored.
    pub fn from_marshal<K: Marshal, V: Marshal>(entries: &IndexMap<K, V>) -> Result<Self> {
        let mut map = Map::from_types(Arc::new(K::data_type()), Arc::new(V::data_type()));
        for (key, value) in entries {
            map.set(key.to_value()?, value.to_value()?)?;
        }
        Ok(map)
    }

    pub fn key_type(&self) -> &Arc<DataType> {
        &self.key_type
    }

    pub fn value_type(&self) -> &Arc<DataType> {
        &self.value_type
    }

    /// Returns the `map<key, value>` descriptor of this container.
    pub fn data_type(&self) -> DataType {
        DataType::Map {
            key: Arc::clone(&self.key_type),
            value: Arc::clone(&self.value_type),
        }
    }

    fn check_key(&self, key: &Value) -> Result<()> {
        if self.key_type.conforms(key) {
            Ok(())
        } else {
            Err(Error::KeyTypeMismatch {
                expected: self.key_type.to_string(),
                given: key.describe(),
            })
        }
    }

    fn check_value(&self, value: &Value) -> Result<()> {
        if self.value_type.conforms(value) {
            Ok(())
        } else {
            Err(Error::ValueTypeMismatch {
                expected: self.value_type.to_string(),
                given: value.describe(),
            })
        }
    }

    /// Inserts or replaces the value for `key`.
    ///
    /// A new key is appended at the end; an existing key keeps its position.
    pub fn set(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        self.check_key(&key)?;
        self.check_value(&value)?;
        self.entries.insert(key, value);
        Ok(())
    }

    /// Like [`Map::set`], for keys and values that may be absent, such as
    /// decoded wire data. Absent keys and values are rejected.
    pub fn set_nullable(&mut self, key: Option<Value>, value: Option<Value>) -> Result<()> {
        let key = key.ok_or(Error::NullKeyNotAllowed)?;
        let value = value.ok_or(Error::NullValueNotAllowed { container: "maps" })?;
        self.set(key, value)
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &Value) -> Result<&Value> {
        self.check_key(key)?;
        self.entries
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    }

    /// Returns whether an entry exists for `key`.
    pub fn has(&self, key: &Value) -> Result<bool> {
        self.check_key(key)?;
        Ok(self.entries.contains_key(key))
    }

    pub(crate) fn lookup(&self, key: &Value) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Removes the entry for `key`, returning its value.
    ///
    /// Returns `None` when no entry matches; a key of the wrong type can never
    /// match. The relative order of the remaining entries is preserved.
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a snapshot of the keys, in insertion order.
    pub fn keys(&self) -> Vec<Value> {
        self.entries.keys().cloned().collect()
    }

    /// Returns a snapshot of the values, in insertion order.
    pub fn values(&self) -> Vec<Value> {
        self.entries.values().cloned().collect()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Value, Value> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Value, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Map {
    type Item = (Value, Value);
    type IntoIter = indexmap::map::IntoIter<Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        equality::maps_eq(self, other)
    }
}

impl Eq for Map {}

impl Hash for Map {
    fn hash<H: Hasher>(&self, state: &mut H) {
        equality::hash_map(self, state)
    }
}
