use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::data_type::{DataType, TypeSpec};
use crate::equality;
use crate::error::{Error, Result};
use crate::value::Value;

/// An ordered collection (CQL `list`) of values of one element type.
#[derive(Debug, Clone)]
pub struct Collection {
    value_type: Arc<DataType>,
    elements: Vec<Value>,
}

impl Collection {
    pub fn new(value_type: impl Into<TypeSpec>) -> Result<Self> {
        Ok(Collection::from_type(DataType::resolve(value_type, "type")?))
    }

    pub(crate) fn from_type(value_type: Arc<DataType>) -> Self {
        Collection {
            value_type,
            elements: Vec::new(),
        }
    }

    pub fn value_type(&self) -> &Arc<DataType> {
        &self.value_type
    }

    pub fn data_type(&self) -> DataType {
        DataType::Collection(Arc::clone(&self.value_type))
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

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.elements.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                len: self.elements.len(),
            })
        }
    }

    /// Appends a value.
    pub fn add(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check(&value)?;
        self.elements.push(value);
        Ok(())
    }

    pub fn add_nullable(&mut self, value: Option<Value>) -> Result<()> {
        let value = value.ok_or(Error::NullValueNotAllowed { container: "collections" })?;
        self.add(value)
    }

    pub fn get(&self, index: usize) -> Result<&Value> {
        self.check_index(index)?;
        Ok(&self.elements[index])
    }

    /// Replaces the value at `index`.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.check_index(index)?;
        self.check(&value)?;
        self.elements[index] = value;
        Ok(())
    }

    /// Removes and returns the value at `index`, shifting later values down.
    pub fn remove(&mut self, index: usize) -> Result<Value> {
        self.check_index(index)?;
        Ok(self.elements.remove(index))
    }

    /// Returns the index of the first value equal to `value`.
    pub fn find(&self, value: &Value) -> Option<usize> {
        self.elements.iter().position(|element| element == value)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn values(&self) -> Vec<Value> {
        self.elements.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl PartialEq for Collection {
    fn eq(&self, other: &Self) -> bool {
        equality::collections_eq(self, other)
    }
}

impl Eq for Collection {}

impl Hash for Collection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        equality::hash_collection(self, state)
    }
}
