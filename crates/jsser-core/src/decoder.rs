//! Decoder — text → [`JsonValue`] → native value, directed by a descriptor.
//!
//! Wrappers are peeled first: `JsonValue` targets take the tree as-is,
//! `Option` targets turn `null` into `None`, and pointers decode their
//! pointee and wrap it. Everything else dispatches on the JSON variant
//! crossed with the target's [`Def`]:
//!
//! | JSON       | Target                                   |
//! |------------|------------------------------------------|
//! | `null`     | only `Option`/`JsonValue`                |
//! | bool       | `bool`                                   |
//! | string     | type identity, or the parse capability   |
//! | number     | the parse capability on the raw text     |
//! | array      | fixed or growable sequence               |
//! | object     | map, or record by exact member name      |

use crate::descriptor::{
    Def, Describe, FieldAccess, MapDef, PrimitiveKind, RecordDef, SequenceDef, TypeDescriptor,
};
use crate::error::{Error, Result};
use crate::parser::parse;
use crate::registry::{TypeRef, TypeRegistry};
use crate::value::JsonValue;
use std::any::Any;

/// Decode JSON text into a `T`, resolving type names through the global
/// registry.
///
/// # Example
/// ```
/// use jsser_core::deserialize;
/// let values: Vec<i32> = deserialize("[1,634,23,8568]").unwrap();
/// assert_eq!(values, vec![1, 634, 23, 8568]);
/// ```
pub fn deserialize<T: Describe>(text: &str) -> Result<T> {
    Deserializer::new().deserialize(text)
}

/// Decode an already parsed tree into a `T`.
pub fn from_value<T: Describe>(value: &JsonValue) -> Result<T> {
    Deserializer::new().from_value(value)
}

/// Decoding entry point bound to a [`TypeRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Deserializer<'r> {
    registry: &'r TypeRegistry,
}

impl Deserializer<'static> {
    /// Uses [`TypeRegistry::global`].
    pub fn new() -> Self {
        Deserializer {
            registry: TypeRegistry::global(),
        }
    }
}

impl Default for Deserializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Deserializer<'r> {
    pub fn with_registry(registry: &'r TypeRegistry) -> Self {
        Deserializer { registry }
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn deserialize<T: Describe>(&self, text: &str) -> Result<T> {
        let boxed = self.deserialize_erased(text, T::DESCRIPTOR)?;
        downcast::<T>(boxed)
    }

    /// Decode text into the type described by `descriptor`.
    pub fn deserialize_erased(
        &self,
        text: &str,
        descriptor: &'static TypeDescriptor,
    ) -> Result<Box<dyn Any>> {
        tracing::debug!(type_name = descriptor.name(), len = text.len(), "deserialize");
        let value = parse(text)?;
        self.decode(&value, descriptor)
    }

    pub fn from_value<T: Describe>(&self, value: &JsonValue) -> Result<T> {
        let boxed = self.decode(value, T::DESCRIPTOR)?;
        downcast::<T>(boxed)
    }

    /// Decode one tree node. Never mutates `value`.
    pub fn decode(
        &self,
        value: &JsonValue,
        descriptor: &'static TypeDescriptor,
    ) -> Result<Box<dyn Any>> {
        tracing::trace!(
            type_name = descriptor.name(),
            kind = descriptor.kind(),
            json = value.kind(),
            "decode"
        );
        match descriptor.def() {
            Def::Value => return Ok(Box::new(value.clone())),
            Def::Optional(def) => {
                let inner = (def.inner)();
                if value.is_null() || self.is_unresolved_name(value, inner) {
                    return Ok((def.none)());
                }
                let decoded = self.decode(value, inner)?;
                return (def.some)(decoded).ok_or_else(|| wrap_failed(descriptor, inner));
            }
            Def::Pointer(def) => {
                let pointee = (def.pointee)();
                let decoded = self.decode(value, pointee)?;
                return (def.wrap)(decoded).ok_or_else(|| wrap_failed(descriptor, pointee));
            }
            _ => {}
        }

        match value {
            JsonValue::Null => Err(Error::incompatible(descriptor.name(), "null")),
            JsonValue::Bool(b) => match descriptor.def() {
                Def::Primitive(def) if def.kind == PrimitiveKind::Bool => Ok(Box::new(*b)),
                _ => Err(Error::incompatible(descriptor.name(), "bool")),
            },
            JsonValue::String(text) => self.decode_text(text, descriptor, "string"),
            JsonValue::Number(text) => self.decode_text(text, descriptor, "number"),
            JsonValue::Array(items) => match descriptor.def() {
                Def::Sequence(def) => self.decode_sequence(items, descriptor, def),
                _ => Err(Error::incompatible(descriptor.name(), "array")),
            },
            JsonValue::Object(entries) => match descriptor.def() {
                Def::Map(def) => self.decode_map(entries, descriptor, def),
                Def::Record(def) => self.decode_record(entries, descriptor, def),
                _ => Err(Error::incompatible(descriptor.name(), "object")),
            },
        }
    }

    /// A string naming no registered type, headed for a type identity.
    /// Inside an `Option` this degrades to `None` instead of failing.
    fn is_unresolved_name(&self, value: &JsonValue, inner: &TypeDescriptor) -> bool {
        let (JsonValue::String(name), Def::TypeIdentity) = (value, inner.def()) else {
            return false;
        };
        if self.registry.resolve(name).is_some() {
            return false;
        }
        tracing::warn!(name = %name, "unresolved type name decoded as None");
        true
    }

    fn decode_text(
        &self,
        text: &str,
        descriptor: &'static TypeDescriptor,
        found: &'static str,
    ) -> Result<Box<dyn Any>> {
        if let Def::TypeIdentity = descriptor.def() {
            let resolved = self
                .registry
                .resolve(text)
                .ok_or_else(|| Error::UnresolvedTypeName {
                    name: text.to_string(),
                })?;
            return Ok(Box::new(TypeRef::from_descriptor(resolved)));
        }
        let from_text = descriptor
            .parse_fn()
            .ok_or_else(|| Error::incompatible(descriptor.name(), found))?;
        from_text(text).map_err(|reason| Error::InvalidText {
            type_name: descriptor.name(),
            text: text.to_string(),
            reason,
        })
    }

    fn decode_sequence(
        &self,
        items: &[JsonValue],
        descriptor: &'static TypeDescriptor,
        def: &SequenceDef,
    ) -> Result<Box<dyn Any>> {
        let element = (def.element)();
        if def.fixed_size {
            let from_elements = def
                .from_elements
                .ok_or_else(|| unsupported(descriptor, "from_elements"))?;
            let decoded = items
                .iter()
                .map(|item| self.decode(item, element))
                .collect::<Result<Vec<_>>>()?;
            return from_elements(decoded).ok_or_else(|| {
                Error::incompatible(
                    descriptor.name(),
                    format!("array of {} elements", items.len()),
                )
            });
        }

        let new_empty = def.new_empty.ok_or_else(|| unsupported(descriptor, "new"))?;
        let add = def.add.ok_or_else(|| unsupported(descriptor, "add"))?;
        let mut target = new_empty();
        for item in items {
            let decoded = self.decode(item, element)?;
            if !add(&mut *target, decoded) {
                return Err(wrap_failed(descriptor, element));
            }
        }
        Ok(target)
    }

    fn decode_map(
        &self,
        entries: &[(String, JsonValue)],
        descriptor: &'static TypeDescriptor,
        def: &MapDef,
    ) -> Result<Box<dyn Any>> {
        let new_empty = def.new_empty.ok_or_else(|| unsupported(descriptor, "new"))?;
        let insert = def.insert.ok_or_else(|| unsupported(descriptor, "insert"))?;
        let (key_desc, value_desc) = ((def.key)(), (def.value)());
        let mut target = new_empty();
        for (key, value) in entries {
            // Keys take the same text path as string values.
            let key = self.decode(&JsonValue::String(key.clone()), key_desc)?;
            let value = self.decode(value, value_desc)?;
            if !insert(&mut *target, key, value) {
                return Err(wrap_failed(descriptor, value_desc));
            }
        }
        Ok(target)
    }

    fn decode_record(
        &self,
        entries: &[(String, JsonValue)],
        descriptor: &'static TypeDescriptor,
        def: &RecordDef,
    ) -> Result<Box<dyn Any>> {
        let new_empty = def.new_empty.ok_or_else(|| unsupported(descriptor, "new"))?;
        let mut target = new_empty();
        for (key, value) in entries {
            let field = def.field(key).ok_or_else(|| Error::UnknownMember {
                type_name: descriptor.name(),
                member: key.clone(),
            })?;
            let FieldAccess::Stored { set: Some(set), .. } = &field.access else {
                tracing::trace!(member = %key, "read-only member skipped");
                continue;
            };
            let field_desc = (field.descriptor)();
            let decoded = self.decode(value, field_desc)?;
            if !set(&mut *target, decoded) {
                return Err(wrap_failed(descriptor, field_desc));
            }
        }
        Ok(target)
    }
}

fn downcast<T: Describe>(boxed: Box<dyn Any>) -> Result<T> {
    boxed
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| Error::incompatible(T::DESCRIPTOR.name(), "a value of another type"))
}

fn unsupported(descriptor: &TypeDescriptor, capability: &'static str) -> Error {
    Error::UnsupportedCollection {
        type_name: descriptor.name(),
        capability,
    }
}

/// A capability rejected a value built from `inner`'s own descriptor,
/// meaning the two descriptors disagree about the type.
fn wrap_failed(descriptor: &TypeDescriptor, inner: &TypeDescriptor) -> Error {
    Error::incompatible(descriptor.name(), inner.name())
}
