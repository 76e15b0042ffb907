use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::data_type::{DataType, TypeSpec};
use crate::equality;
use crate::error::{Error, Result};
use crate::value::Value;

/// A fixed-arity tuple. Each position has its own type and may be null.
#[derive(Debug, Clone)]
pub struct Tuple {
    types: Vec<Arc<DataType>>,
    values: Vec<Option<Value>>,
}

impl Tuple {
    pub fn new<T: Into<TypeSpec>>(types: impl IntoIterator<Item = T>) -> Result<Self> {
        let types = types
            .into_iter()
            .map(|spec| DataType::resolve(spec, "type"))
            .collect::<Result<Vec<_>>>()?;
        Ok(Tuple::from_types(types))
    }

    pub(crate) fn from_types(types: Vec<Arc<DataType>>) -> Self {
        let values = vec![None; types.len()];
        Tuple { types, values }
    }

    pub fn types(&self) -> &[Arc<DataType>] {
        &self.types
    }

    pub fn data_type(&self) -> DataType {
        DataType::Tuple(self.types.clone())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.types.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                len: self.types.len(),
            })
        }
    }

    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        self.set_nullable(index, Some(value.into()))
    }

    /// Sets or clears the value at `index`.
    pub fn set_nullable(&mut self, index: usize, value: Option<Value>) -> Result<()> {
        self.check_index(index)?;
        if let Some(value) = &value {
            let ty = &self.types[index];
            if !ty.conforms(value) {
                return Err(Error::ValueTypeMismatch {
                    expected: ty.to_string(),
                    given: value.describe(),
                });
            }
        }
        self.values[index] = value;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<Option<&Value>> {
        self.check_index(index)?;
        Ok(self.values[index].as_ref())
    }

    /// Returns the arity of the tuple.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> + '_ {
        self.values.iter().map(Option::as_ref)
    }
}

impl PartialEq for Tuple {
    fn eq(&self, other: &Self) -> bool {
        equality::tuples_eq(self, other)
    }
}

impl Eq for Tuple {}

impl Hash for Tuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        equality::hash_tuple(self, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_typed() {
        let mut tuple = Tuple::new(["int", "text"]).unwrap();
        tuple.set(0, 1).unwrap();
        assert!(matches!(tuple.set(1, 2), Err(Error::ValueTypeMismatch { .. })));
        tuple.set(1, "x").unwrap();
        assert_eq!(tuple.get(1).unwrap(), Some(&Value::text("x")));
        assert!(tuple.get(2).is_err());
    }

    #[test]
    fn positions_can_be_cleared() {
        let mut tuple = Tuple::new([DataType::int()]).unwrap();
        tuple.set(0, 1).unwrap();
        tuple.set_nullable(0, None).unwrap();
        assert_eq!(tuple.get(0).unwrap(), None);
        assert_eq!(tuple.len(), 1);
    }

    #[test]
    fn data_type_lists_positions() {
        let tuple = Tuple::new(["int", "list<text>"]).unwrap();
        assert_eq!(tuple.data_type().to_string(), "tuple<int, list<text>>");
    }
}
