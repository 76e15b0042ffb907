//! Integration tests for `#[derive(UserType)]`.

use colloid_core::{DataType, Error, Map, Marshal, Result, UserType, Value};
use indexmap::IndexMap;

#[derive(Debug, Clone, UserType)]
struct PostalAddress {
    street: String,
    #[colloid(rename = "zip_code")]
    zip: i32,
    note: Option<String>,
    #[colloid(skip)]
    #[allow(dead_code)]
    cached_label: String,
}

#[derive(UserType)]
#[colloid(name = "person")]
struct Contact {
    name: String,
    tags: Vec<String>,
    address: PostalAddress,
}

#[derive(UserType)]
struct Wrapper<T> {
    inner: T,
}

fn address(note: Option<&str>) -> PostalAddress {
    PostalAddress {
        street: "Main St".to_string(),
        zip: 12345,
        note: note.map(str::to_string),
        cached_label: "ignored".to_string(),
    }
}

#[test]
fn descriptor_lists_fields_in_order() {
    let expected = DataType::udt(
        "postal_address",
        [
            ("street", DataType::text()),
            ("zip_code", DataType::int()),
            ("note", DataType::text()),
        ],
    );
    assert_eq!(PostalAddress::data_type(), expected);
}

#[test]
fn values_conform_to_descriptor() {
    let value = address(None).to_value().unwrap();
    assert!(PostalAddress::data_type().conforms(&value));

    let udt = value.as_user_type().unwrap();
    assert_eq!(udt.name(), "postal_address");
    assert_eq!(udt.get("street").unwrap(), Some(&Value::text("Main St")));
    assert_eq!(udt.get("zip_code").unwrap(), Some(&Value::Int(12345)));
    assert_eq!(udt.get("note").unwrap(), None);
    assert!(udt.get("cached_label").is_err());
}

#[test]
fn optional_fields_are_set_when_present() {
    let value = address(Some("back door")).to_value().unwrap();
    let udt = value.as_user_type().unwrap();
    assert_eq!(udt.get("note").unwrap(), Some(&Value::text("back door")));
    assert_eq!(
        value.to_string(),
        "{street: 'Main St', zip_code: 12345, note: 'back door'}"
    );
}

#[test]
fn nested_user_types() {
    let contact = Contact {
        name: "Ada".to_string(),
        tags: vec!["admin".to_string()],
        address: address(None),
    };
    let data_type = Contact::data_type();
    assert_eq!(data_type.to_string(), "person");
    assert_eq!(data_type.fields()[1].1.to_string(), "list<text>");
    assert_eq!(*data_type.fields()[2].1, PostalAddress::data_type());
    assert!(data_type.conforms(&contact.to_value().unwrap()));
}

#[test]
fn generic_structs() {
    let wrapper = Wrapper { inner: 7i64 };
    assert_eq!(
        Wrapper::<i64>::data_type(),
        DataType::udt("wrapper", [("inner", DataType::bigint())])
    );
    assert!(Wrapper::<i64>::data_type().conforms(&wrapper.to_value().unwrap()));
}

#[test]
fn equal_structs_are_equal_map_keys() {
    let mut by_address = IndexMap::new();
    by_address.insert("home".to_string(), address(None));
    let map = Map::from_marshal(&by_address).unwrap();

    let mut lookup = Map::new(PostalAddress::data_type(), "text").unwrap();
    let key = address(None).to_value().unwrap();
    lookup.set(key.clone(), "home").unwrap();
    assert_eq!(lookup.get(&key).unwrap(), &Value::text("home"));
    assert_eq!(map.get(&Value::text("home")).unwrap(), &key);
}

/// Declares `int` but produces text, so any struct embedding it must fail.
struct Mislabeled;

impl Marshal for Mislabeled {
    fn data_type() -> DataType {
        DataType::int()
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::text("not an int"))
    }
}

#[test]
fn mistyped_field_values_are_rejected() {
    let wrapper = Wrapper { inner: Mislabeled };
    let err = wrapper.to_value().unwrap_err();
    assert_eq!(
        err,
        Error::ValueTypeMismatch {
            expected: "int".to_string(),
            given: "text".to_string(),
        }
    );
}
