//! Descriptors for `Option`, smart pointers and `JsonValue`.
//!
//! Pointers are transparent on the wire: `Box<T>`, `Rc<T>`, `Arc<T>` and
//! `RefCell<T>` all encode exactly as `T`. `Rc<RefCell<T>>` is how a cyclic
//! graph is built, and the encoder's identity chain sees the shared pointee.

use crate::descriptor::{descriptor_of, Def, Describe, OptionDef, PointerDef, TypeDescriptor};
use crate::error::Error;
use crate::value::JsonValue;
use std::any::{type_name, Any};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

fn unbox<T: Any>(value: Box<dyn Any>) -> Option<T> {
    value.downcast::<T>().ok().map(|v| *v)
}

fn wrong_type<T>() -> Error {
    Error::incompatible(type_name::<T>(), "a value of another type")
}

/// `None` encodes and decodes as `null`.
impl<T: Describe> Describe for Option<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Optional(OptionDef {
            inner: descriptor_of::<T>,
            get: |value| {
                value
                    .downcast_ref::<Self>()
                    .map(|opt| opt.as_ref().map(|inner| inner as &dyn Any))
            },
            none: || Box::new(None::<T>),
            some: |inner| Some(Box::new(Some(unbox::<T>(inner)?))),
        }));
}

impl<T: Describe> Describe for Box<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Pointer(PointerDef {
            pointee: descriptor_of::<T>,
            with: |value, f| match value.downcast_ref::<Self>() {
                Some(boxed) => f(&**boxed as &dyn Any),
                None => Err(wrong_type::<Self>()),
            },
            wrap: |inner| Some(Box::new(Box::new(unbox::<T>(inner)?))),
        }));
}

impl<T: Describe> Describe for Rc<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Pointer(PointerDef {
            pointee: descriptor_of::<T>,
            with: |value, f| match value.downcast_ref::<Self>() {
                Some(rc) => f(&**rc as &dyn Any),
                None => Err(wrong_type::<Self>()),
            },
            wrap: |inner| Some(Box::new(Rc::new(unbox::<T>(inner)?))),
        }));
}

impl<T: Describe> Describe for Arc<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Pointer(PointerDef {
            pointee: descriptor_of::<T>,
            with: |value, f| match value.downcast_ref::<Self>() {
                Some(arc) => f(&**arc as &dyn Any),
                None => Err(wrong_type::<Self>()),
            },
            wrap: |inner| Some(Box::new(Arc::new(unbox::<T>(inner)?))),
        }));
}

/// Encoding takes a shared borrow for the duration of the pointee's encode.
impl<T: Describe> Describe for RefCell<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Pointer(PointerDef {
            pointee: descriptor_of::<T>,
            with: |value, f| {
                let cell = value.downcast_ref::<Self>().ok_or_else(wrong_type::<Self>)?;
                let guard = cell.try_borrow().map_err(|_| Error::AlreadyBorrowed {
                    type_name: type_name::<Self>(),
                })?;
                f(&*guard as &dyn Any)
            },
            wrap: |inner| Some(Box::new(RefCell::new(unbox::<T>(inner)?))),
        }));
}

/// Decoding into `JsonValue` keeps the parsed tree as-is.
impl Describe for JsonValue {
    const DESCRIPTOR: &'static TypeDescriptor = &TypeDescriptor::new::<JsonValue>(Def::Value);
}
