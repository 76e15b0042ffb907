use indexmap::IndexSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::data_type::{DataType, TypeSpec};
use crate::equality;
use crate::error::{Error, Result};
use crate::value::Value;

/// A set of unique values of one element type, kept in insertion order.
#[derive(Debug, Clone)]
pub struct Set {
    value_type: Arc<DataType>,
    elements: IndexSet<Value>,
}

impl Set {
    pub fn new(value_type: impl Into<TypeSpec>) -> Result<Self> {
        Ok(Set::from_type(DataType::resolve(value_type, "type")?))
    }

    pub(crate) fn from_type(value_type: Arc<DataType>) -> Self {
        Set {
            value_type,
            elements: IndexSet::new(),
        }
    }

    pub fn value_type(&self) -> &Arc<DataType> {
        &self.value_type
    }

    pub fn data_type(&self) -> DataType {
        DataType::Set(Arc::clone(&self.value_type))
    }

    fn check(&self, value: &Value) -> Result<()> {
        if self.value_type.conforms(value) {
            Ok(())
        } else {
            Err(Error::ValueTypeMismatch {
                expected: self.value_type.to_string(),
                given: value.describe(),
            })
        }
    }

    /// Adds a value, returning false if an equal value was already present.
    pub fn add(&mut self, value: impl Into<Value>) -> Result<bool> {
        let value = value.into();
        self.check(&value)?;
        Ok(self.elements.insert(value))
    }

    pub fn add_nullable(&mut self, value: Option<Value>) -> Result<bool> {
        let value = value.ok_or(Error::NullValueNotAllowed { container: "sets" })?;
        self.add(value)
    }

    pub fn has(&self, value: &Value) -> Result<bool> {
        self.check(value)?;
        Ok(self.elements.contains(value))
    }

    pub(crate) fn contains(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    /// Removes a value, returning whether it was present.
    pub fn remove(&mut self, value: &Value) -> bool {
        self.elements.shift_remove(value)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn values(&self) -> Vec<Value> {
        self.elements.iter().cloned().collect()
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Value> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = &'a Value;
    type IntoIter = indexmap::set::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl PartialEq for Set {
    fn eq(&self, other: &Self) -> bool {
        equality::sets_eq(self, other)
    }
}

impl Eq for Set {}

impl Hash for Set {
    fn hash<H: Hasher>(&self, state: &mut H) {
        equality::hash_set(self, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_ignored() {
        let mut set = Set::new("int").unwrap();
        assert!(set.add(1).unwrap());
        assert!(set.add(2).unwrap());
        assert!(!set.add(1).unwrap());
        assert_eq!(set.values(), vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn null_and_mistyped_values_are_rejected() {
        let mut set = Set::new("int").unwrap();
        assert_eq!(
            set.add_nullable(None).unwrap_err().to_string(),
            "Invalid value: null is not supported inside sets"
        );
        assert!(matches!(set.add("x"), Err(Error::ValueTypeMismatch { .. })));
        assert!(set.is_empty());
    }

    #[test]
    fn remove_reports_presence() {
        let mut set = Set::new("text").unwrap();
        set.add("a").unwrap();
        assert!(set.remove(&Value::text("a")));
        assert!(!set.remove(&Value::text("a")));
        assert!(!set.has(&Value::text("a")).unwrap());
    }
}
