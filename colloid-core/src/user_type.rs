use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::data_type::{DataType, TypeSpec};
use crate::equality;
use crate::error::{Error, Result};
use crate::kind::Kind;
use crate::value::Value;

/// A value of a user-defined type. Fields follow the declaration order of the
/// descriptor and may be null.
#[derive(Debug, Clone)]
pub struct UserTypeValue {
    data_type: Arc<DataType>,
    values: Vec<Option<Value>>,
}

impl UserTypeValue {
    pub fn new(data_type: impl Into<TypeSpec>) -> Result<Self> {
        let data_type = DataType::resolve(data_type, "type")?;
        if data_type.kind() != Kind::UserType {
            return Err(Error::invalid_argument(
                data_type.as_ref(),
                "expected a user-defined type",
            ));
        }
        Ok(UserTypeValue::from_type(data_type))
    }

    pub(crate) fn from_type(data_type: Arc<DataType>) -> Self {
        let values = vec![None; data_type.fields().len()];
        UserTypeValue { data_type, values }
    }

    /// Builds a value from field values in declaration order, checking each
    /// against its field type. Used by `#[derive(UserType)]`.
    #[doc(hidden)]
    pub fn from_marshalled(data_type: DataType, values: Vec<Option<Value>>) -> Result<Self> {
        if data_type.kind() != Kind::UserType || data_type.fields().len() != values.len() {
            let expected = data_type.fields().len();
            return Err(Error::invalid_argument(
                &data_type,
                format!("expected {} field values, {} given", expected, values.len()),
            ));
        }
        let mut udt = UserTypeValue::from_type(Arc::new(data_type));
        for (index, value) in values.into_iter().enumerate() {
            udt.set_at(index, value)?;
        }
        Ok(udt)
    }

    pub fn data_type(&self) -> &Arc<DataType> {
        &self.data_type
    }

    /// Returns the name of the user-defined type.
    pub fn name(&self) -> &str {
        match self.data_type.as_ref() {
            DataType::UserType { name, .. } => name,
            _ => "",
        }
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        self.set_nullable(field, Some(value.into()))
    }

    /// Sets or clears a field.
    pub fn set_nullable(&mut self, field: &str, value: Option<Value>) -> Result<()> {
        let index = self.index_of(field)?;
        self.set_at(index, value)
    }

    fn set_at(&mut self, index: usize, value: Option<Value>) -> Result<()> {
        if let Some(value) = &value {
            let ty = &self.data_type.fields()[index].1;
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

    pub fn get(&self, field: &str) -> Result<Option<&Value>> {
        let index = self.index_of(field)?;
        Ok(self.values[index].as_ref())
    }

    fn index_of(&self, field: &str) -> Result<usize> {
        self.data_type
            .field_index(field)
            .ok_or_else(|| Error::UnknownField {
                udt: self.data_type.to_string(),
                field: field.to_string(),
            })
    }

    /// Iterates over `(field name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> + '_ {
        self.data_type
            .fields()
            .iter()
            .zip(&self.values)
            .map(|((name, _), value)| (name.as_str(), value.as_ref()))
    }
}

impl PartialEq for UserTypeValue {
    fn eq(&self, other: &Self) -> bool {
        equality::user_types_eq(self, other)
    }
}

impl Eq for UserTypeValue {}

impl Hash for UserTypeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        equality::hash_user_type(self, state)
    }
}
