//! # jsser-core
//!
//! A self-contained JSON text ↔ typed value converter.
//!
//! Text is split into [`Token`]s, parsed into a [`JsonValue`] tree, and
//! walked against a [`TypeDescriptor`] to build or read native values. Every
//! supported type carries its descriptor as a compile-time constant through
//! the [`Describe`] trait; user structs get one from the [`record!`] macro.
//!
//! ## Quick start
//!
//! ```rust
//! use jsser_core::{deserialize, record, serialize};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Sample {
//!     int_field: i32,
//!     tags: Vec<String>,
//! }
//!
//! record! {
//!     Sample {
//!         field int_field: i32 as "IntField",
//!         field tags: Vec<String> as "Tags",
//!     }
//! }
//!
//! let sample = Sample { int_field: 1, tags: vec!["a".into(), "b".into()] };
//! let text = serialize(&sample).unwrap();
//! assert_eq!(text, r#"{"IntField":1,"Tags":["a","b"]}"#);
//!
//! let back: Sample = deserialize(&text).unwrap();
//! assert_eq!(back, sample);
//! ```
//!
//! ## Wire format
//!
//! Ordinary JSON with three deviations: a trailing comma before `]`/`}` is
//! accepted, number tokens are not validated until decoded, and `\"` is the
//! only string escape recognised on read or written on encode.
//!
//! Parsing and both tree walks recurse once per nesting level with no depth
//! limit; pathologically deep input can exhaust the stack.
//!
//! ## Modules
//!
//! - [`tokenizer`] — text → tokens
//! - [`parser`] — tokens → [`JsonValue`]
//! - [`value`] — the `JsonValue` tree
//! - [`descriptor`] — `TypeDescriptor` and its capabilities
//! - [`registry`] — type-name lookup for [`TypeRef`] values
//! - [`encoder`] — value → `JsonValue` → text, with cycle detection
//! - [`decoder`] — text → `JsonValue` → value
//! - [`error`] — error types

pub mod decoder;
pub mod descriptor;
pub mod encoder;
pub mod error;
mod impls;
pub mod parser;
mod record;
pub mod registry;
pub mod tokenizer;
pub mod value;

pub use decoder::{deserialize, from_value, Deserializer};
pub use descriptor::{
    descriptor_of, Def, Describe, FieldAccess, FieldDef, MapDef, OptionDef, PointerDef,
    PrimitiveDef, PrimitiveKind, RecordDef, SequenceDef, TextDef, TextKind, TypeDescriptor,
};
pub use encoder::{serialize, serialize_erased, to_value, EncodingChain};
pub use error::{Error, Result};
pub use parser::parse;
pub use registry::{TypeRef, TypeRegistry};
pub use tokenizer::{tokenize, Token};
pub use value::JsonValue;
