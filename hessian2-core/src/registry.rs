//! Process-wide registry mapping Java class names to host record types.
//!
//! Registration is expected during program initialization; the registry
//! grows monotonically and is shared by every codec instance. A single
//! mutex guards both registration and lookup.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::traits::{HessianEnum, HessianObject};

/// Describes one registered host type: its foreign class name, the wire
/// field order, and how to materialize a fresh instance during decode.
pub struct TypeDescriptor {
    class_name: String,
    field_names: Vec<String>,
    kind: DescriptorKind,
}

enum DescriptorKind {
    Record {
        make: fn() -> Box<dyn HessianObject>,
    },
    Enum {
        resolve: fn(&str) -> i32,
    },
}

impl TypeDescriptor {
    /// The fully qualified Java class name.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Wire field names in declared order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Returns true if this descriptor carries the enum capability.
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, DescriptorKind::Enum { .. })
    }

    /// Allocates a fresh zero-state instance of the record type.
    ///
    /// Returns `None` for enum descriptors.
    pub fn new_instance(&self) -> Option<Box<dyn HessianObject>> {
        match self.kind {
            DescriptorKind::Record { make } => Some(make()),
            DescriptorKind::Enum { .. } => None,
        }
    }

    /// Resolves an enum variant name to its ordinal; 0 for unknown names.
    ///
    /// Returns `None` for record descriptors.
    pub fn resolve_enum(&self, name: &str) -> Option<i32> {
        match self.kind {
            DescriptorKind::Enum { resolve } => Some(resolve(name)),
            DescriptorKind::Record { .. } => None,
        }
    }
}

#[derive(Default)]
struct TypeRegistry {
    entries: Vec<Arc<TypeDescriptor>>,
    by_class_name: HashMap<String, usize>,
    by_type_id: HashMap<TypeId, usize>,
}

impl TypeRegistry {
    fn insert(&mut self, type_id: TypeId, descriptor: TypeDescriptor) -> usize {
        if let Some(&idx) = self.by_class_name.get(&descriptor.class_name) {
            return idx;
        }
        let idx = self.entries.len();
        self.by_class_name.insert(descriptor.class_name.clone(), idx);
        self.by_type_id.insert(type_id, idx);
        self.entries.push(Arc::new(descriptor));
        idx
    }
}

fn registry() -> &'static Mutex<TypeRegistry> {
    static REGISTRY: OnceLock<Mutex<TypeRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(TypeRegistry::default()))
}

fn make_record<T: HessianObject + Default + 'static>() -> Box<dyn HessianObject> {
    Box::new(T::default())
}

fn resolve_enum_name<E: HessianEnum>(name: &str) -> i32 {
    E::enum_value(name).ordinal()
}

/// Registers a record type, keyed by its Java class name.
///
/// Idempotent: re-registering a class name returns the existing global
/// index. The prototype instance comes from `T::default()` and supplies the
/// class name and wire field order.
pub fn register_record<T: HessianObject + Default + 'static>() -> usize {
    let proto = T::default();
    let descriptor = TypeDescriptor {
        class_name: proto.java_class_name().to_string(),
        field_names: proto.field_names().iter().map(|s| s.to_string()).collect(),
        kind: DescriptorKind::Record {
            make: make_record::<T>,
        },
    };
    let class = descriptor.class_name.clone();
    let idx = registry()
        .lock()
        .expect("type registry poisoned")
        .insert(TypeId::of::<T>(), descriptor);
    tracing::debug!(class = %class, index = idx, "registered record type");
    idx
}

/// Registers an enum type, keyed by its Java class name.
///
/// Idempotent. The wire form of an enum is an object with the single field
/// `name`; ordinal 0 is reserved for the invalid sentinel.
pub fn register_enum<E: HessianEnum>() -> usize {
    let descriptor = TypeDescriptor {
        class_name: E::java_class_name().to_string(),
        field_names: vec!["name".to_string()],
        kind: DescriptorKind::Enum {
            resolve: resolve_enum_name::<E>,
        },
    };
    let class = descriptor.class_name.clone();
    let idx = registry()
        .lock()
        .expect("type registry poisoned")
        .insert(TypeId::of::<E>(), descriptor);
    tracing::debug!(class = %class, index = idx, "registered enum type");
    idx
}

/// Looks up a descriptor by its Java class name.
pub fn lookup(class_name: &str) -> Option<Arc<TypeDescriptor>> {
    let reg = registry().lock().expect("type registry poisoned");
    reg.by_class_name
        .get(class_name)
        .map(|&idx| Arc::clone(&reg.entries[idx]))
}

/// Looks up the global index of a registered host type.
pub fn index_of<T: 'static>() -> Option<usize> {
    let reg = registry().lock().expect("type registry poisoned");
    reg.by_type_id.get(&TypeId::of::<T>()).copied()
}
