//! Structural equality and hashing of values.
//!
//! Scalars compare by value. Composite values compare equal when their
//! descriptors match and their elements are equal under the same rule:
//! sets and maps by membership, lists, tuples and user-defined types
//! position by position. Hashing walks the same structure, so `a == b`
//! implies `hash(a) == hash(b)`.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::mem;

use crate::collection::Collection;
use crate::data_type::same_type;
use crate::map::Map;
use crate::set::Set;
use crate::tuple::Tuple;
use crate::user_type::UserTypeValue;
use crate::value::Value;

pub(crate) fn values_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::Bigint(x), Value::Bigint(y)) => x == y,
        (Value::Blob(x), Value::Blob(y)) => x == y,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::Decimal(x), Value::Decimal(y)) => x == y,
        // Bit patterns keep NaN reflexive; zeros are folded first.
        (Value::Double(x), Value::Double(y)) => double_bits(*x) == double_bits(*y),
        (Value::Float(x), Value::Float(y)) => float_bits(*x) == float_bits(*y),
        (Value::Inet(x), Value::Inet(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Timestamp(x), Value::Timestamp(y)) => x == y,
        (Value::Uuid(x), Value::Uuid(y)) => x == y,
        (Value::Varint(x), Value::Varint(y)) => x == y,
        (Value::Map(x), Value::Map(y)) => maps_eq(x, y),
        (Value::Set(x), Value::Set(y)) => sets_eq(x, y),
        (Value::Collection(x), Value::Collection(y)) => collections_eq(x, y),
        (Value::Tuple(x), Value::Tuple(y)) => tuples_eq(x, y),
        (Value::UserType(x), Value::UserType(y)) => user_types_eq(x, y),
        _ => false,
    }
}

/// Bit pattern of `d`, with `-0.0` folded into `0.0`.
fn double_bits(d: f64) -> u64 {
    if d == 0.0 { 0 } else { d.to_bits() }
}

fn float_bits(f: f32) -> u32 {
    if f == 0.0 { 0 } else { f.to_bits() }
}

fn nullable_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (Some(x), Some(y)) => values_eq(x, y),
        (None, None) => true,
        _ => false,
    }
}

pub(crate) fn maps_eq(a: &Map, b: &Map) -> bool {
    same_type(a.key_type(), b.key_type())
        && same_type(a.value_type(), b.value_type())
        && a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.lookup(key).is_some_and(|other| values_eq(value, other)))
}

pub(crate) fn sets_eq(a: &Set, b: &Set) -> bool {
    same_type(a.value_type(), b.value_type())
        && a.len() == b.len()
        && a.iter().all(|element| b.contains(element))
}

pub(crate) fn collections_eq(a: &Collection, b: &Collection) -> bool {
    same_type(a.value_type(), b.value_type())
        && a.len() == b.len()
        && a.iter().zip(b.iter()).all(|(x, y)| values_eq(x, y))
}

pub(crate) fn tuples_eq(a: &Tuple, b: &Tuple) -> bool {
    a.types().len() == b.types().len()
        && a.types().iter().zip(b.types()).all(|(x, y)| same_type(x, y))
        && a.iter().zip(b.iter()).all(|(x, y)| nullable_eq(x, y))
}

pub(crate) fn user_types_eq(a: &UserTypeValue, b: &UserTypeValue) -> bool {
    same_type(a.data_type(), b.data_type())
        && a.iter().zip(b.iter()).all(|((_, x), (_, y))| nullable_eq(x, y))
}

pub(crate) fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    mem::discriminant(value).hash(state);
    match value {
        Value::Text(s) => s.hash(state),
        Value::Bigint(n) => n.hash(state),
        Value::Blob(blob) => blob.hash(state),
        Value::Boolean(b) => b.hash(state),
        Value::Decimal(d) => d.hash(state),
        Value::Double(d) => double_bits(*d).hash(state),
        Value::Float(f) => float_bits(*f).hash(state),
        Value::Inet(addr) => addr.hash(state),
        Value::Int(n) => n.hash(state),
        Value::Timestamp(millis) => millis.hash(state),
        Value::Uuid(uuid) => uuid.hash(state),
        Value::Varint(n) => n.hash(state),
        Value::Map(map) => hash_map(map, state),
        Value::Set(set) => hash_set(set, state),
        Value::Collection(list) => hash_collection(list, state),
        Value::Tuple(tuple) => hash_tuple(tuple, state),
        Value::UserType(udt) => hash_user_type(udt, state),
    }
}

fn hash_nullable<H: Hasher>(value: Option<&Value>, state: &mut H) {
    match value {
        Some(v) => {
            state.write_u8(1);
            hash_value(v, state);
        }
        None => state.write_u8(0),
    }
}

/// Hashes one set element or map entry on its own, so that the results
/// can be combined regardless of order.
fn detached_hash(values: &[&Value]) -> u64 {
    let mut hasher = DefaultHasher::new();
    for value in values {
        hash_value(value, &mut hasher);
    }
    hasher.finish()
}

pub(crate) fn hash_map<H: Hasher>(map: &Map, state: &mut H) {
    map.key_type().hash(state);
    map.value_type().hash(state);
    state.write_usize(map.len());
    let sum = map
        .iter()
        .fold(0u64, |sum, (key, value)| sum.wrapping_add(detached_hash(&[key, value])));
    state.write_u64(sum);
}

pub(crate) fn hash_set<H: Hasher>(set: &Set, state: &mut H) {
    set.value_type().hash(state);
    state.write_usize(set.len());
    let sum = set
        .iter()
        .fold(0u64, |sum, element| sum.wrapping_add(detached_hash(&[element])));
    state.write_u64(sum);
}

pub(crate) fn hash_collection<H: Hasher>(list: &Collection, state: &mut H) {
    list.value_type().hash(state);
    state.write_usize(list.len());
    for element in list.iter() {
        hash_value(element, state);
    }
}

pub(crate) fn hash_tuple<H: Hasher>(tuple: &Tuple, state: &mut H) {
    tuple.types().hash(state);
    for element in tuple.iter() {
        hash_nullable(element, state);
    }
}

pub(crate) fn hash_user_type<H: Hasher>(udt: &UserTypeValue, state: &mut H) {
    udt.data_type().hash(state);
    for (_, value) in udt.iter() {
        hash_nullable(value, state);
    }
}
