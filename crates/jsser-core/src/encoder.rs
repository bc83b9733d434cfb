//! Encoder — native value + descriptor → [`JsonValue`] → text.
//!
//! Dispatch is an exhaustive match over the descriptor's [`Def`]:
//!
//! - **Primitives**: `bool` → `true`/`false`, numbers → their decimal text,
//!   `char` → a one-character string.
//! - **Text-like**: the type's text form, quoted (instants as
//!   `yyyy-MM-ddTHH:mm:ss.fffZ` in UTC).
//! - **Type identity**: the registered type name, quoted.
//! - **Maps**: `{"key":value,...}` in the map's own iteration order; keys
//!   that do not encode to a string are quoted from their text.
//! - **Sequences**: `[a,b,...]`.
//! - **Records**: `{"member":value,...}` in declared member order.
//! - `Option`/pointers are transparent; `None` is `null`.
//!
//! # Cycle detection
//!
//! Every record, sequence and map is pushed onto an [`EncodingChain`]
//! before its members are encoded and popped by a guard when the encode
//! step returns, on success or error. Finding the same identity (address
//! plus type) already on the chain means the graph is cyclic, which is
//! only reachable through shared pointers such as `Rc<RefCell<T>>`.
//! Primitives own no references and are never tracked.

use crate::descriptor::{Def, Describe, FieldAccess, PrimitiveKind, TypeDescriptor};
use crate::error::{Error, Result};
use crate::registry::TypeRef;
use crate::value::JsonValue;
use std::any::{Any, TypeId};
use std::ops::{Deref, DerefMut};

/// Encode `value` to JSON text.
///
/// # Example
/// ```
/// use jsser_core::serialize;
/// assert_eq!(serialize(&vec![1, 2, 3]).unwrap(), "[1,2,3]");
/// assert_eq!(serialize(&Some("say \"hi\"".to_string())).unwrap(), r#""say \"hi\"""#);
/// ```
pub fn serialize<T: Describe>(value: &T) -> Result<String> {
    serialize_erased(value, T::DESCRIPTOR)
}

/// Encode a type-erased value described by `descriptor`.
pub fn serialize_erased(value: &dyn Any, descriptor: &'static TypeDescriptor) -> Result<String> {
    tracing::debug!(type_name = descriptor.name(), "serialize");
    let json = encode(value, descriptor, &mut EncodingChain::new())?;
    Ok(json.to_string())
}

/// Encode `value` to a [`JsonValue`] tree.
pub fn to_value<T: Describe>(value: &T) -> Result<JsonValue> {
    encode(value, T::DESCRIPTOR, &mut EncodingChain::new())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Identity {
    address: usize,
    type_id: TypeId,
}

impl Identity {
    fn of(value: &dyn Any, descriptor: &TypeDescriptor) -> Self {
        Identity {
            address: value as *const dyn Any as *const () as usize,
            type_id: descriptor.type_id(),
        }
    }
}

/// The composite values currently being encoded on the active call path.
///
/// Holds addresses only, never references, and lives for a single
/// top-level encode.
#[derive(Debug, Default)]
pub struct EncodingChain {
    stack: Vec<Identity>,
}

impl EncodingChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Push `value`, failing if it is already on the chain. The returned
    /// guard pops it again when dropped.
    pub fn enter(
        &mut self,
        value: &dyn Any,
        descriptor: &TypeDescriptor,
    ) -> Result<ChainGuard<'_>> {
        let identity = Identity::of(value, descriptor);
        if self.stack.contains(&identity) {
            return Err(Error::CircularReference {
                type_name: descriptor.name(),
            });
        }
        self.stack.push(identity);
        Ok(ChainGuard { chain: self })
    }
}

/// Pops its entry off the [`EncodingChain`] on drop.
#[derive(Debug)]
pub struct ChainGuard<'a> {
    chain: &'a mut EncodingChain,
}

impl Deref for ChainGuard<'_> {
    type Target = EncodingChain;

    fn deref(&self) -> &EncodingChain {
        self.chain
    }
}

impl DerefMut for ChainGuard<'_> {
    fn deref_mut(&mut self) -> &mut EncodingChain {
        self.chain
    }
}

impl Drop for ChainGuard<'_> {
    fn drop(&mut self) {
        self.chain.stack.pop();
    }
}

fn mismatch(descriptor: &TypeDescriptor) -> Error {
    Error::incompatible(descriptor.name(), "a value of another type")
}

/// Encode one value against its descriptor.
pub fn encode(
    value: &dyn Any,
    descriptor: &TypeDescriptor,
    chain: &mut EncodingChain,
) -> Result<JsonValue> {
    tracing::trace!(
        type_name = descriptor.name(),
        kind = descriptor.kind(),
        depth = chain.len(),
        "encode"
    );
    match descriptor.def() {
        Def::Primitive(def) => match def.kind {
            PrimitiveKind::Bool => value
                .downcast_ref::<bool>()
                .map(|b| JsonValue::Bool(*b))
                .ok_or_else(|| mismatch(descriptor)),
            PrimitiveKind::Integer => (def.format)(value)
                .map(JsonValue::Number)
                .ok_or_else(|| mismatch(descriptor)),
            // `NaN` has no text form the tokenizer reads back.
            PrimitiveKind::Floating => match (def.format)(value) {
                Some(text) if text == "NaN" => {
                    Err(Error::incompatible("a number other than NaN", text))
                }
                Some(text) => Ok(JsonValue::Number(text)),
                None => Err(mismatch(descriptor)),
            },
            PrimitiveKind::Char => (def.format)(value)
                .map(JsonValue::String)
                .ok_or_else(|| mismatch(descriptor)),
        },
        Def::TextLike(def) => (def.format)(value)
            .map(JsonValue::String)
            .ok_or_else(|| mismatch(descriptor)),
        Def::TypeIdentity => value
            .downcast_ref::<TypeRef>()
            .map(|t| JsonValue::String(t.name().to_string()))
            .ok_or_else(|| mismatch(descriptor)),
        Def::Value => value
            .downcast_ref::<JsonValue>()
            .cloned()
            .ok_or_else(|| mismatch(descriptor)),
        Def::Optional(def) => match (def.get)(value) {
            Some(Some(inner)) => encode(inner, (def.inner)(), chain),
            Some(None) => Ok(JsonValue::Null),
            None => Err(mismatch(descriptor)),
        },
        Def::Pointer(def) => {
            let pointee = (def.pointee)();
            (def.with)(value, &mut |inner: &dyn Any| encode(inner, pointee, chain))
        }
        Def::Map(def) => {
            let mut chain = chain.enter(value, descriptor)?;
            let entries = (def.entries)(value).ok_or_else(|| mismatch(descriptor))?;
            let (key_desc, value_desc) = ((def.key)(), (def.value)());
            let mut out = Vec::new();
            for (k, v) in entries {
                let key = encode_key(k, key_desc, &mut chain)?;
                out.push((key, encode(v, value_desc, &mut chain)?));
            }
            Ok(JsonValue::Object(out))
        }
        Def::Sequence(def) => {
            let mut chain = chain.enter(value, descriptor)?;
            let items = (def.iter)(value).ok_or_else(|| mismatch(descriptor))?;
            let element = (def.element)();
            let out = items
                .map(|item| encode(item, element, &mut chain))
                .collect::<Result<Vec<_>>>()?;
            Ok(JsonValue::Array(out))
        }
        Def::Record(def) => {
            let mut chain = chain.enter(value, descriptor)?;
            let mut out = Vec::with_capacity(def.fields.len());
            for field in def.fields {
                let field_desc = (field.descriptor)();
                let encoded = match &field.access {
                    FieldAccess::Stored { get, .. } => {
                        let member = get(value).ok_or_else(|| mismatch(descriptor))?;
                        encode(member, field_desc, &mut chain)?
                    }
                    FieldAccess::Computed(compute) => {
                        let member = compute(value).ok_or_else(|| mismatch(descriptor))?;
                        encode(&*member, field_desc, &mut chain)?
                    }
                };
                out.push((field.name.to_string(), encoded));
            }
            Ok(JsonValue::Object(out))
        }
    }
}

/// Map keys are always strings: a key that encodes to anything else is
/// replaced by its rendered text.
fn encode_key(key: &dyn Any, descriptor: &TypeDescriptor, chain: &mut EncodingChain) -> Result<String> {
    Ok(match encode(key, descriptor, chain)? {
        JsonValue::String(s) => s,
        other => other.to_string(),
    })
}
