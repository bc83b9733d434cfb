//! Type descriptors — a capability view over a native type.
//!
//! Every supported type implements [`Describe`], whose associated constant
//! is a compile-time [`TypeDescriptor`]: the type's kind plus plain function
//! pointers for the operations the encoder and decoder need (format, parse,
//! iterate, construct, add, get/set members). Nothing is discovered at run
//! time; a type that does not implement `Describe` cannot be encoded.
//!
//! Values cross the capability boundary type-erased, as `&dyn Any` when
//! read and `Box<dyn Any>` when built. Each capability downcasts to its own
//! concrete type and reports a mismatch by returning `None`/`false`.
//!
//! Nested descriptors are reached through [`DescriptorFn`] pointers rather
//! than direct references, so recursive types (`struct Node { next:
//! Option<Box<Node>> }`) describe themselves without a const cycle.

use crate::error::Result;
use crate::value::JsonValue;
use std::any::{type_name, Any, TypeId};
use std::fmt;

/// Lazily yields a nested descriptor.
pub type DescriptorFn = fn() -> &'static TypeDescriptor;
/// Render a value as text. `None` if the value is not of the described type.
pub type FormatFn = fn(&dyn Any) -> Option<String>;
/// Build a value from text (the "parse-from-string" capability).
pub type ParseFn = fn(&str) -> std::result::Result<Box<dyn Any>, String>;
/// Parameterless constructor.
pub type NewFn = fn() -> Box<dyn Any>;
/// Iterate sequence elements in order.
pub type IterFn =
    for<'a> fn(&'a dyn Any) -> Option<Box<dyn Iterator<Item = &'a dyn Any> + 'a>>;
/// Iterate map entries in the map's own order.
pub type EntriesFn = for<'a> fn(
    &'a dyn Any,
) -> Option<Box<dyn Iterator<Item = (&'a dyn Any, &'a dyn Any)> + 'a>>;
/// Single-argument add (`Vec::push`, `HashSet::insert`, ...).
pub type AddFn = fn(&mut dyn Any, Box<dyn Any>) -> bool;
/// Two-argument add (`HashMap::insert`, ...).
pub type InsertFn = fn(&mut dyn Any, Box<dyn Any>, Box<dyn Any>) -> bool;
/// Allocate a fixed-size sequence from already decoded elements.
pub type FromElementsFn = fn(Vec<Box<dyn Any>>) -> Option<Box<dyn Any>>;
/// Borrow a stored member.
pub type GetFn = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;
/// Compute a read-only member.
pub type ComputeFn = fn(&dyn Any) -> Option<Box<dyn Any>>;
/// Assign a stored member.
pub type SetFn = fn(&mut dyn Any, Box<dyn Any>) -> bool;
/// Outer `None`: wrong type. Inner `None`: the value is absent.
pub type OptionGetFn = for<'a> fn(&'a dyn Any) -> Option<Option<&'a dyn Any>>;
/// Wrap a decoded inner value (`Some`, `Box::new`, `Rc::new`, ...).
pub type WrapFn = fn(Box<dyn Any>) -> Option<Box<dyn Any>>;
/// Run an encode step against the pointee of a smart pointer.
pub type WithPointeeFn =
    fn(&dyn Any, &mut dyn FnMut(&dyn Any) -> Result<JsonValue>) -> Result<JsonValue>;

/// A type with a compile-time descriptor.
pub trait Describe: Any {
    const DESCRIPTOR: &'static TypeDescriptor;
}

/// The descriptor of `T`, as a function pointer target.
pub fn descriptor_of<T: Describe>() -> &'static TypeDescriptor {
    T::DESCRIPTOR
}

/// Parameterless constructor for any `Default` type.
pub fn new_default<T: Default + Any>() -> Box<dyn Any> {
    Box::new(T::default())
}

/// Describes one native type: its name, identity and kind.
pub struct TypeDescriptor {
    name: fn() -> &'static str,
    id: fn() -> TypeId,
    def: Def,
}

impl TypeDescriptor {
    pub const fn new<T: Any>(def: Def) -> Self {
        Self {
            name: type_name::<T>,
            id: TypeId::of::<T>,
            def,
        }
    }

    /// Fully qualified Rust type name. Stable within one build.
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    pub fn def(&self) -> &Def {
        &self.def
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    /// The from-text capability, present on primitive and text-like types.
    pub fn parse_fn(&self) -> Option<ParseFn> {
        match &self.def {
            Def::Primitive(def) => Some(def.parse),
            Def::TextLike(def) => Some(def.parse),
            _ => None,
        }
    }

    /// Short kind label for logs and errors.
    pub fn kind(&self) -> &'static str {
        match &self.def {
            Def::Primitive(_) => "primitive",
            Def::TextLike(_) => "text",
            Def::Sequence(_) => "sequence",
            Def::Map(_) => "map",
            Def::Record(_) => "record",
            Def::Optional(_) => "optional",
            Def::Pointer(_) => "pointer",
            Def::TypeIdentity => "type",
            Def::Value => "json",
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

/// The kind of a type, with its capabilities.
///
/// The first five variants are the value kinds. `Optional` and `Pointer`
/// wrap another descriptor; `TypeIdentity` is [`crate::TypeRef`];
/// `Value` is [`JsonValue`] itself, passed through untouched.
pub enum Def {
    Primitive(PrimitiveDef),
    TextLike(TextDef),
    Sequence(SequenceDef),
    Map(MapDef),
    Record(RecordDef),
    Optional(OptionDef),
    Pointer(PointerDef),
    TypeIdentity,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Bool,
    Integer,
    Floating,
    Char,
}

pub struct PrimitiveDef {
    pub kind: PrimitiveKind,
    pub format: FormatFn,
    pub parse: ParseFn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    String,
    Uuid,
    Duration,
    Instant,
    /// Any other type with a text form.
    Other,
}

pub struct TextDef {
    pub kind: TextKind,
    pub format: FormatFn,
    pub parse: ParseFn,
}

pub struct SequenceDef {
    pub element: DescriptorFn,
    /// Fixed sequences are allocated in one go from all elements;
    /// growable ones are built empty and filled with `add`.
    pub fixed_size: bool,
    pub iter: IterFn,
    pub new_empty: Option<NewFn>,
    pub add: Option<AddFn>,
    pub from_elements: Option<FromElementsFn>,
}

pub struct MapDef {
    pub key: DescriptorFn,
    pub value: DescriptorFn,
    pub entries: EntriesFn,
    pub new_empty: Option<NewFn>,
    pub insert: Option<InsertFn>,
}

pub struct RecordDef {
    /// Public members in declared order.
    pub fields: &'static [FieldDef],
    pub new_empty: Option<NewFn>,
}

impl RecordDef {
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub struct FieldDef {
    pub name: &'static str,
    pub descriptor: DescriptorFn,
    pub access: FieldAccess,
}

impl FieldDef {
    pub fn settable(&self) -> bool {
        matches!(self.access, FieldAccess::Stored { set: Some(_), .. })
    }
}

pub enum FieldAccess {
    /// A stored field. `set` is `None` for read-only fields.
    Stored { get: GetFn, set: Option<SetFn> },
    /// A read-only property computed from the record.
    Computed(ComputeFn),
}

pub struct OptionDef {
    pub inner: DescriptorFn,
    pub get: OptionGetFn,
    pub none: NewFn,
    pub some: WrapFn,
}

pub struct PointerDef {
    pub pointee: DescriptorFn,
    pub with: WithPointeeFn,
    pub wrap: WrapFn,
}
