//! The dynamic value model produced and consumed by the codec.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::traits::{HessianEnum, HessianObject};

/// A decoded Hessian value.
///
/// Composite variants (`List`, `Map`, `Object`) are handles to shared
/// interior-mutable storage: cloning a `Value` clones the handle, not the
/// contents. This is what lets the reference table hand out a container
/// before its children have been decoded, so back-references and cycles
/// resolve naturally. Wire references (`'Q'`) never appear here — they are
/// resolved during decode.
#[derive(Clone)]
pub enum Value {
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 32-bit signed integer.
    Int(i32),
    /// A 64-bit signed integer.
    Long(i64),
    /// A 64-bit float.
    Double(f64),
    /// A millisecond-precision UTC timestamp.
    Date(DateTime<Utc>),
    /// A UTF-8 string.
    String(String),
    /// A raw byte array.
    Bytes(Vec<u8>),
    /// An ordered list, optionally carrying a wire type name.
    List(List),
    /// An ordered sequence of key/value pairs, optionally typed.
    Map(Map),
    /// A user-defined record instance.
    Object(Object),
    /// A Java enum constant.
    Enum(EnumValue),
}

impl Value {
    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the contained i32, if this is an `Int`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the contained i64, widening `Int` as well.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the contained f64, if this is a `Double`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the contained bool, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the contained string slice, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the list handle, if this is a `List`.
    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the map handle, if this is a `Map`.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the object handle, if this is an `Object`.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the enum constant, if this is an `Enum`.
    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Describes the value kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Double(_) => "double",
            Value::Date(_) => "date",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
            Value::Enum(_) => "enum",
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            (Value::Enum(a), Value::Enum(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Long(v) => write!(f, "Long({v})"),
            Value::Double(v) => write!(f, "Double({v})"),
            Value::Date(v) => write!(f, "Date({v})"),
            Value::String(v) => write!(f, "String({v:?})"),
            Value::Bytes(v) => write!(f, "Bytes({v:02x?})"),
            Value::List(v) => v.fmt(f),
            Value::Map(v) => v.fmt(f),
            Value::Object(v) => v.fmt(f),
            Value::Enum(v) => v.fmt(f),
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v.into())
            }
        })*
    };
}

impl_value_from! {
    bool => Bool,
    i32 => Int,
    i64 => Long,
    f64 => Double,
    String => String,
    &str => String,
    Vec<u8> => Bytes,
    DateTime<Utc> => Date,
    List => List,
    Map => Map,
    Object => Object,
    EnumValue => Enum,
}

/// A shared, growable list of values.
///
/// Identity-carrying: two clones of the same `List` point at the same
/// storage, and the encoder emits a back-reference when it meets the same
/// storage twice.
#[derive(Clone, Default)]
pub struct List {
    inner: Rc<RefCell<ListInner>>,
}

#[derive(Default)]
struct ListInner {
    type_name: Option<String>,
    items: Vec<Value>,
}

impl List {
    /// Creates an empty untyped list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list carrying a wire type name.
    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListInner {
                type_name: Some(type_name.into()),
                items: Vec::new(),
            })),
        }
    }

    /// The wire type name, if this list is typed.
    pub fn type_name(&self) -> Option<String> {
        self.inner.borrow().type_name.clone()
    }

    /// Appends a value.
    pub fn push(&self, v: impl Into<Value>) {
        self.inner.borrow_mut().items.push(v.into());
    }

    /// Returns the element at `index`, if present.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Returns true if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Borrows the elements for iteration.
    pub fn items(&self) -> Ref<'_, Vec<Value>> {
        Ref::map(self.inner.borrow(), |i| &i.items)
    }

    /// Returns true if both handles share the same storage.
    pub fn ptr_eq(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListInner {
                type_name: None,
                items,
            })),
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        *self.items() == *other.items()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut d = f.debug_tuple("List");
        if let Some(t) = &inner.type_name {
            d.field(t);
        }
        d.field(&inner.items).finish()
    }
}

/// A shared map of key/value pairs in wire order.
///
/// Pairs keep their on-wire order; keys are not required to be hashable
/// (a `Value` may hold a float), so lookup is a linear scan.
#[derive(Clone, Default)]
pub struct Map {
    inner: Rc<RefCell<MapInner>>,
}

#[derive(Default)]
struct MapInner {
    type_name: Option<String>,
    entries: Vec<(Value, Value)>,
}

impl Map {
    /// Creates an empty untyped map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty map carrying a wire type name.
    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MapInner {
                type_name: Some(type_name.into()),
                entries: Vec::new(),
            })),
        }
    }

    /// The wire type name, if this map is typed.
    pub fn type_name(&self) -> Option<String> {
        self.inner.borrow().type_name.clone()
    }

    /// Appends a key/value pair.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) {
        self.inner.borrow_mut().entries.push((key.into(), value.into()));
    }

    /// Returns the first value whose key equals `key`.
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.inner
            .borrow()
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Returns true if the map has no pairs.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Borrows the pairs for iteration.
    pub fn entries(&self) -> Ref<'_, Vec<(Value, Value)>> {
        Ref::map(self.inner.borrow(), |i| &i.entries)
    }

    /// Returns true if both handles share the same storage.
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        *self.entries() == *other.entries()
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        let mut d = f.debug_tuple("Map");
        if let Some(t) = &inner.type_name {
            d.field(t);
        }
        d.field(&inner.entries).finish()
    }
}

/// A shared handle to a decoded record instance.
#[derive(Clone)]
pub struct Object {
    inner: Rc<RefCell<Box<dyn HessianObject>>>,
}

impl Object {
    /// Wraps a boxed record instance.
    pub fn new(obj: Box<dyn HessianObject>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(obj)),
        }
    }

    /// Wraps a concrete record value.
    pub fn from_record<T: HessianObject>(record: T) -> Self {
        Self::new(Box::new(record))
    }

    /// The Java class name of the wrapped instance.
    ///
    /// Empty while the instance is mid-decode (its storage is borrowed).
    pub fn class_name(&self) -> String {
        self.inner
            .try_borrow()
            .map(|o| o.java_class_name().to_string())
            .unwrap_or_default()
    }

    /// Clones the wrapped instance out as a concrete type.
    ///
    /// `None` if the instance is another type or still mid-decode.
    pub fn get<T: HessianObject + Clone>(&self) -> Option<T> {
        self.inner
            .try_borrow()
            .ok()?
            .as_any()
            .downcast_ref::<T>()
            .cloned()
    }

    /// Returns true if both handles share the same storage.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&dyn HessianObject) -> R) -> R {
        f(&**self.inner.borrow())
    }

    pub(crate) fn with_mut<R>(&self, f: impl FnOnce(&mut dyn HessianObject) -> R) -> R {
        f(&mut **self.inner.borrow_mut())
    }

    pub(crate) fn ptr_id(&self) -> usize {
        Rc::as_ptr(&self.inner) as *const () as usize
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(o) => write!(f, "Object({})", o.java_class_name()),
            Err(_) => write!(f, "Object(<borrowed>)"),
        }
    }
}

/// A resolved Java enum constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// The fully qualified Java class name of the enum.
    pub class_name: String,
    /// The variant name as written on the wire.
    pub name: String,
    /// The declaration-order ordinal; 0 is the invalid sentinel.
    pub ordinal: i32,
}

impl EnumValue {
    /// Builds the wire representation of a typed enum constant.
    pub fn of<E: HessianEnum>(e: E) -> Self {
        Self {
            class_name: E::java_class_name().to_string(),
            name: e.string_name().to_string(),
            ordinal: e.ordinal(),
        }
    }

    /// Converts back to a typed enum via the ordinal.
    pub fn to_enum<E: HessianEnum>(&self) -> E {
        E::from_ordinal(self.ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl HessianObject for Point {
        fn java_class_name(&self) -> &str {
            "example.Point"
        }

        fn field_names(&self) -> &'static [&'static str] {
            &["x", "y"]
        }

        fn encode_field(&self, _name: &str, _encoder: &mut crate::Encoder) -> Result<()> {
            Ok(())
        }

        fn decode_field(&mut self, _name: &str, _decoder: &mut crate::Decoder<'_>) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_value_from_primitives() {
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(42i64), Value::Long(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("hi"), Value::String("hi".to_string()));
        assert_eq!(Value::from(1.5f64), Value::Double(1.5));
    }

    #[test]
    fn test_as_long_widens_int() {
        assert_eq!(Value::Int(7).as_long(), Some(7i64));
        assert_eq!(Value::Long(7).as_long(), Some(7i64));
        assert_eq!(Value::Double(7.0).as_long(), None);
    }

    #[test]
    fn test_list_push_and_get() {
        let list = List::new();
        list.push(1i32);
        list.push("two");
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0), Some(Value::Int(1)));
        assert_eq!(list.get(1), Some(Value::String("two".to_string())));
        assert_eq!(list.get(2), None);
    }

    #[test]
    fn test_list_clone_shares_storage() {
        let list = List::new();
        let alias = list.clone();
        alias.push(1i32);
        assert_eq!(list.len(), 1);
        assert!(list.ptr_eq(&alias));
    }

    #[test]
    fn test_list_structural_eq() {
        let a = List::from(vec![Value::Int(1), Value::Int(2)]);
        let b = List::from(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_typed_list_keeps_type_name() {
        let list = List::typed("java.util.ArrayList");
        assert_eq!(list.type_name().as_deref(), Some("java.util.ArrayList"));
    }

    #[test]
    fn test_map_insert_and_get() {
        let map = Map::new();
        map.insert("a", 1i32);
        map.insert(2i32, "b");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Value::from("a")), Some(Value::Int(1)));
        assert_eq!(map.get(&Value::Int(2)), Some(Value::from("b")));
        assert_eq!(map.get(&Value::Int(99)), None);
    }

    #[test]
    fn test_map_preserves_order() {
        let map = Map::new();
        map.insert("z", 1i32);
        map.insert("a", 2i32);
        let entries = map.entries();
        assert_eq!(entries[0].0, Value::from("z"));
        assert_eq!(entries[1].0, Value::from("a"));
    }

    #[test]
    fn test_object_downcast() {
        let obj = Object::from_record(Point { x: 1, y: 2 });
        assert_eq!(obj.class_name(), "example.Point");
        assert_eq!(obj.get::<Point>(), Some(Point { x: 1, y: 2 }));
    }

    #[test]
    fn test_object_identity_eq() {
        let obj = Object::from_record(Point::default());
        let alias = obj.clone();
        let other = Object::from_record(Point::default());
        assert_eq!(Value::Object(obj.clone()), Value::Object(alias));
        assert_ne!(Value::Object(obj), Value::Object(other));
    }

    #[test]
    fn test_cyclic_list_does_not_leak_into_eq() {
        let list = List::new();
        list.push(Value::List(list.clone()));
        // identity comparison short-circuits before recursing
        assert_eq!(list, list.clone());
    }
}
