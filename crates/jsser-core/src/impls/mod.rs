//! Builtin [`Describe`](crate::Describe) impls.

mod collections;
mod scalars;
mod wrappers;
