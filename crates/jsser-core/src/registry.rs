//! Type registry — resolves type names back to descriptors.
//!
//! Only type-identity values ([`TypeRef`]) need this: they are written as a
//! name string and must be looked up again when read. The registry is built
//! once at start-up and is read-only afterwards.
//!
//! Names are `std::any::type_name` strings, which are stable within one
//! build of a program. Register explicit aliases for names that must
//! survive across builds.

use crate::descriptor::{Def, Describe, TypeDescriptor};
use crate::value::JsonValue;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

/// A type-identity value: a handle to a registered descriptor.
#[derive(Clone, Copy)]
pub struct TypeRef(&'static TypeDescriptor);

impl TypeRef {
    pub fn of<T: Describe>() -> Self {
        TypeRef(T::DESCRIPTOR)
    }

    pub fn from_descriptor(descriptor: &'static TypeDescriptor) -> Self {
        TypeRef(descriptor)
    }

    pub fn descriptor(&self) -> &'static TypeDescriptor {
        self.0
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name())
    }
}

impl Describe for TypeRef {
    const DESCRIPTOR: &'static TypeDescriptor = &TypeDescriptor::new::<TypeRef>(Def::TypeIdentity);
}

static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();

/// Name → descriptor table.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    by_name: HashMap<&'static str, &'static TypeDescriptor>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every builtin scalar type.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register::<bool>()
            .register::<i8>()
            .register::<i16>()
            .register::<i32>()
            .register::<i64>()
            .register::<i128>()
            .register::<isize>()
            .register::<u8>()
            .register::<u16>()
            .register::<u32>()
            .register::<u64>()
            .register::<u128>()
            .register::<usize>()
            .register::<f32>()
            .register::<f64>()
            .register::<Decimal>()
            .register::<char>()
            .register::<String>()
            .register::<Uuid>()
            .register::<TimeDelta>()
            .register::<DateTime<Utc>>()
            .register::<DateTime<FixedOffset>>()
            .register::<NaiveDateTime>()
            .register::<TypeRef>()
            .register::<JsonValue>();
        registry
    }

    /// Register `T` under its type name.
    pub fn register<T: Describe>(&mut self) -> &mut Self {
        self.by_name.insert(T::DESCRIPTOR.name(), T::DESCRIPTOR);
        self
    }

    /// Register `T` under an extra name.
    pub fn register_as<T: Describe>(&mut self, alias: &'static str) -> &mut Self {
        self.by_name.insert(alias, T::DESCRIPTOR);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&'static TypeDescriptor> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// The process-wide registry. Holds the builtins unless another
    /// registry was [installed](Self::install) first.
    pub fn global() -> &'static TypeRegistry {
        GLOBAL.get_or_init(TypeRegistry::with_builtins)
    }

    /// Make `registry` the process-wide registry. Fails, handing the
    /// registry back, if the global one is already initialised.
    pub fn install(registry: TypeRegistry) -> Result<(), TypeRegistry> {
        GLOBAL.set(registry)
    }
}
