use std::collections::HashMap;
use std::sync::Arc;

use crate::data_type::{DataType, TypeSpec};
use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::map::Map;

/// Interns type descriptors by content fingerprint.
///
/// Interning a descriptor also interns every nested parameter, so equal
/// sub-descriptors are shared between all descriptors that contain them.
/// Containers built from interned descriptors compare their types by
/// pointer before falling back to a structural comparison.
///
/// # Example
///
/// ```
/// use colloid_core::{DataType, TypeRegistry};
/// use std::sync::Arc;
///
/// let mut registry = TypeRegistry::new();
/// let a = registry.intern(DataType::set(DataType::text()));
/// let b = registry.resolve("set<text>", "type").unwrap();
///
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Debug)]
pub struct TypeRegistry {
    types: HashMap<Fingerprint, Arc<DataType>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            types: HashMap::new(),
        }
    }

    /// Adds a descriptor, returning the shared instance.
    ///
    /// If an equal descriptor was interned before, that instance is returned.
    pub fn intern(&mut self, data_type: DataType) -> Arc<DataType> {
        let fingerprint = data_type.fingerprint();
        if let Some(existing) = self.types.get(&fingerprint) {
            return Arc::clone(existing);
        }

        let data_type = self.intern_parameters(data_type);
        log::debug!("interned {} as {}", data_type, fingerprint);
        let shared = Arc::new(data_type);
        self.types.insert(fingerprint, Arc::clone(&shared));
        shared
    }

    fn intern_shared(&mut self, data_type: &Arc<DataType>) -> Arc<DataType> {
        let fingerprint = data_type.fingerprint();
        if let Some(existing) = self.types.get(&fingerprint) {
            return Arc::clone(existing);
        }
        self.intern(data_type.as_ref().clone())
    }

    /// Rebuilds a descriptor so its parameters point at interned instances.
    fn intern_parameters(&mut self, data_type: DataType) -> DataType {
        match data_type {
            DataType::Map { key, value } => DataType::Map {
                key: self.intern_shared(&key),
                value: self.intern_shared(&value),
            },
            DataType::Set(element) => DataType::Set(self.intern_shared(&element)),
            DataType::Collection(element) => DataType::Collection(self.intern_shared(&element)),
            DataType::Tuple(elements) => DataType::Tuple(
                elements
                    .iter()
                    .map(|element| self.intern_shared(element))
                    .collect(),
            ),
            DataType::UserType { name, fields } => DataType::UserType {
                name,
                fields: fields
                    .into_iter()
                    .map(|(field, ty)| {
                        let ty = self.intern_shared(&ty);
                        (field, ty)
                    })
                    .collect(),
            },
            leaf @ (DataType::Scalar(_) | DataType::Custom(_)) => leaf,
        }
    }

    /// Resolves a type specification and interns the result.
    pub fn resolve(
        &mut self,
        spec: impl Into<TypeSpec>,
        param: &'static str,
    ) -> Result<Arc<DataType>> {
        let resolved = DataType::resolve(spec, param)?;
        Ok(self.intern_shared(&resolved))
    }

    /// Creates an empty map whose key and value descriptors are interned.
    pub fn map(
        &mut self,
        key_type: impl Into<TypeSpec>,
        value_type: impl Into<TypeSpec>,
    ) -> Result<Map> {
        let key_type = self.resolve(key_type, "keyType")?;
        let value_type = self.resolve(value_type, "valueType")?;
        Ok(Map::from_types(key_type, value_type))
    }

    /// Gets an interned descriptor by fingerprint.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<Arc<DataType>> {
        self.types.get(fingerprint).cloned()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.types.contains_key(fingerprint)
    }

    /// Returns the number of distinct descriptors interned.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::value::Value;

    #[test]
    fn interning_deduplicates() {
        let mut registry = TypeRegistry::new();
        let a = registry.intern(DataType::varint());
        let b = registry.intern(DataType::varint());
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&DataType::varint().fingerprint()));
    }

    #[test]
    fn nested_parameters_are_shared() {
        let mut registry = TypeRegistry::new();
        let list = registry.intern(DataType::collection(DataType::text()));
        let map = registry.intern(DataType::map(
            DataType::text(),
            DataType::collection(DataType::text()),
        ));

        // text, list<text>, map<text, list<text>>
        assert_eq!(registry.len(), 3);
        let DataType::Map { key, value } = map.as_ref() else {
            panic!("expected a map descriptor");
        };
        assert!(Arc::ptr_eq(value, &list));
        let DataType::Collection(element) = list.as_ref() else {
            panic!("expected a list descriptor");
        };
        assert!(Arc::ptr_eq(key, element));
    }

    #[test]
    fn deep_nesting() {
        let mut registry = TypeRegistry::new();
        registry.intern(DataType::set(DataType::set(DataType::set(DataType::boolean()))));
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn lookup_by_fingerprint() {
        let mut registry = TypeRegistry::new();
        let ty = DataType::tuple([DataType::int(), DataType::uuid()]);
        let interned = registry.intern(ty.clone());
        let found = registry.get(&ty.fingerprint()).unwrap();
        assert!(Arc::ptr_eq(&interned, &found));
        assert!(registry.get(&Fingerprint::of_encoding(b"nonexistent")).is_none());
    }

    #[test]
    fn maps_share_descriptors() {
        let mut registry = TypeRegistry::new();
        let mut first = registry.map("varint", "varchar").unwrap();
        let second = registry.map("varint", DataType::varchar()).unwrap();
        assert!(Arc::ptr_eq(first.key_type(), second.key_type()));
        assert!(Arc::ptr_eq(first.value_type(), second.value_type()));

        first.set(Value::varint(1), "a").unwrap();
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn resolution_errors_propagate() {
        let mut registry = TypeRegistry::new();
        let err = registry.map("nope", "int").unwrap_err();
        assert_eq!(err, Error::UnsupportedTypeName("nope".to_string()));
        assert!(registry.is_empty());
    }
}
