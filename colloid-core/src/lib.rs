//! Colloid provides typed containers and type descriptors for a wide-column
//! database driver.
//!
//! Core concepts:
//! - **DataType**: An immutable descriptor of a database type (scalar, map, set, list, tuple, udt)
//! - **Value**: A runtime value; composite values carry their descriptors
//! - **Map**: A key/value container whose key and value types are fixed at construction
//! - **TypeRegistry**: Interns descriptors by content fingerprint so equal types are shared
//! - **Marshal**: Maps Rust types onto descriptors and values
//!
//! # Example
//!
//! ```
//! use colloid_core::{DataType, Map, Value};
//!
//! let mut map = Map::new("varint", "varchar").unwrap();
//! map.set(Value::varint(1), "a").unwrap();
//!
//! // Composite keys are matched structurally.
//! let mut by_set = Map::new(DataType::set(DataType::varchar()), "int").unwrap();
//! let key = DataType::set(DataType::varchar()).create(["a", "b"]).unwrap();
//! by_set.set(key, 1).unwrap();
//!
//! let lookup = DataType::set(DataType::varchar()).create(["a", "b"]).unwrap();
//! assert_eq!(by_set.get(&lookup).unwrap(), &Value::Int(1));
//! ```

mod collection;
mod data_type;
mod equality;
mod error;
mod fingerprint;
mod kind;
mod map;
mod marshal;
mod parse;
mod registry;
mod scalar;
mod set;
mod tuple;
mod user_type;
mod value;

pub use collection::Collection;
pub use data_type::{DataType, TypeSpec};
pub use error::{Error, Result};
pub use fingerprint::Fingerprint;
pub use kind::{Kind, ScalarKind};
pub use map::Map;
pub use marshal::Marshal;
pub use registry::TypeRegistry;
pub use set::Set;
pub use tuple::Tuple;
pub use user_type::UserTypeValue;
pub use value::{Blob, Value};

#[cfg(feature = "derive")]
pub use colloid_derive::UserType;
