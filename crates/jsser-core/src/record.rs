//! The [`record!`](crate::record) macro: a [`Describe`](crate::Describe)
//! impl for a plain struct.
//!
//! Members are listed explicitly; anything not listed is never encoded and
//! never accepted on decode. Three member kinds exist:
//!
//! - `field name: Type` — stored and settable.
//! - `readonly name: Type` — stored, encoded, skipped on decode.
//! - `computed name: Type => getter` — encoded from `getter(&record)`,
//!   skipped on decode.
//!
//! Any member may be renamed on the wire with `as "Name"`. The struct must
//! implement `Default`, which serves as its parameterless constructor.
//!
//! ```
//! use jsser_core::{record, serialize};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Point {
//!     fn is_empty(&self) -> bool {
//!         self.x == 0 && self.y == 0
//!     }
//! }
//!
//! record! {
//!     Point {
//!         computed is_empty: bool as "IsEmpty" => Point::is_empty,
//!         field x: i32 as "X",
//!         field y: i32 as "Y",
//!     }
//! }
//!
//! let text = serialize(&Point { x: 13, y: 99 }).unwrap();
//! assert_eq!(text, r#"{"IsEmpty":false,"X":13,"Y":99}"#);
//! ```

#[macro_export]
macro_rules! record {
    (
        $ty:ty {
            $( $kind:ident $member:ident : $fty:ty $(as $rename:literal)? $(=> $getter:expr)? ),* $(,)?
        }
    ) => {
        impl $crate::Describe for $ty {
            const DESCRIPTOR: &'static $crate::TypeDescriptor = {
                const FIELDS: &[$crate::FieldDef] = &[
                    $(
                        $crate::__record_member!(
                            $kind, $ty, $member, $fty,
                            $crate::__member_name!($member $(, $rename)?)
                            $(, $getter)?
                        )
                    ),*
                ];
                &$crate::TypeDescriptor::new::<$ty>($crate::Def::Record($crate::RecordDef {
                    fields: FIELDS,
                    new_empty: ::std::option::Option::Some($crate::descriptor::new_default::<$ty>),
                }))
            };
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __member_name {
    ($member:ident) => {
        ::std::stringify!($member)
    };
    ($member:ident, $rename:literal) => {
        $rename
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_member {
    (field, $ty:ty, $member:ident, $fty:ty, $name:expr) => {
        $crate::FieldDef {
            name: $name,
            descriptor: $crate::descriptor::descriptor_of::<$fty>,
            access: $crate::FieldAccess::Stored {
                get: $crate::__record_getter!($ty, $member),
                set: ::std::option::Option::Some({
                    fn set(
                        target: &mut dyn ::std::any::Any,
                        value: ::std::boxed::Box<dyn ::std::any::Any>,
                    ) -> bool {
                        match (target.downcast_mut::<$ty>(), value.downcast::<$fty>()) {
                            (::std::option::Option::Some(record), ::std::result::Result::Ok(value)) => {
                                record.$member = *value;
                                true
                            }
                            _ => false,
                        }
                    }
                    set
                }),
            },
        }
    };
    (readonly, $ty:ty, $member:ident, $fty:ty, $name:expr) => {
        $crate::FieldDef {
            name: $name,
            descriptor: $crate::descriptor::descriptor_of::<$fty>,
            access: $crate::FieldAccess::Stored {
                get: $crate::__record_getter!($ty, $member),
                set: ::std::option::Option::None,
            },
        }
    };
    (computed, $ty:ty, $member:ident, $fty:ty, $name:expr, $getter:expr) => {
        $crate::FieldDef {
            name: $name,
            descriptor: $crate::descriptor::descriptor_of::<$fty>,
            access: $crate::FieldAccess::Computed({
                fn compute(
                    value: &dyn ::std::any::Any,
                ) -> ::std::option::Option<::std::boxed::Box<dyn ::std::any::Any>> {
                    let record = value.downcast_ref::<$ty>()?;
                    let out: $fty = ($getter)(record);
                    ::std::option::Option::Some(::std::boxed::Box::new(out))
                }
                compute
            }),
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __record_getter {
    ($ty:ty, $member:ident) => {{
        fn get(value: &dyn ::std::any::Any) -> ::std::option::Option<&dyn ::std::any::Any> {
            value
                .downcast_ref::<$ty>()
                .map(|record| &record.$member as &dyn ::std::any::Any)
        }
        get
    }};
}
