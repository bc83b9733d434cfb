//! Descriptors for sequences and maps.

use crate::descriptor::{
    descriptor_of, new_default, Def, Describe, MapDef, SequenceDef, TypeDescriptor,
};
use indexmap::IndexMap;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

type ErasedIter<'a> = Box<dyn Iterator<Item = &'a dyn Any> + 'a>;
type ErasedEntries<'a> = Box<dyn Iterator<Item = (&'a dyn Any, &'a dyn Any)> + 'a>;

fn erase<'a, T: Any>(iter: impl Iterator<Item = &'a T> + 'a) -> ErasedIter<'a> {
    Box::new(iter.map(|item| item as &dyn Any))
}

fn erase_entries<'a, K: Any, V: Any>(
    iter: impl Iterator<Item = (&'a K, &'a V)> + 'a,
) -> ErasedEntries<'a> {
    Box::new(iter.map(|(k, v)| (k as &dyn Any, v as &dyn Any)))
}

/// Downcast both the collection and the element, then hand them to `add`.
fn add_with<C: Any, T: Any>(
    target: &mut dyn Any,
    item: Box<dyn Any>,
    add: impl FnOnce(&mut C, T),
) -> bool {
    match (target.downcast_mut::<C>(), item.downcast::<T>()) {
        (Some(collection), Ok(item)) => {
            add(collection, *item);
            true
        }
        _ => false,
    }
}

fn insert_with<C: Any, K: Any, V: Any>(
    target: &mut dyn Any,
    key: Box<dyn Any>,
    value: Box<dyn Any>,
    insert: impl FnOnce(&mut C, K, V),
) -> bool {
    match (
        target.downcast_mut::<C>(),
        key.downcast::<K>(),
        value.downcast::<V>(),
    ) {
        (Some(map), Ok(key), Ok(value)) => {
            insert(map, *key, *value);
            true
        }
        _ => false,
    }
}

fn elements_into<T: Any>(elements: Vec<Box<dyn Any>>) -> Option<Vec<T>> {
    elements
        .into_iter()
        .map(|e| e.downcast::<T>().ok().map(|e| *e))
        .collect()
}

impl<T: Describe> Describe for Vec<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Sequence(SequenceDef {
            element: descriptor_of::<T>,
            fixed_size: false,
            iter: |value| Some(erase(value.downcast_ref::<Self>()?.iter())),
            new_empty: Some(new_default::<Self>),
            add: Some(|target, item| add_with(target, item, Vec::<T>::push)),
            from_elements: None,
        }));
}

impl<T: Describe> Describe for VecDeque<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Sequence(SequenceDef {
            element: descriptor_of::<T>,
            fixed_size: false,
            iter: |value| Some(erase(value.downcast_ref::<Self>()?.iter())),
            new_empty: Some(new_default::<Self>),
            add: Some(|target, item| add_with(target, item, VecDeque::<T>::push_back)),
            from_elements: None,
        }));
}

impl<T: Describe + Eq + Hash> Describe for HashSet<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Sequence(SequenceDef {
            element: descriptor_of::<T>,
            fixed_size: false,
            iter: |value| Some(erase(value.downcast_ref::<Self>()?.iter())),
            new_empty: Some(new_default::<Self>),
            add: Some(|target, item| {
                add_with(target, item, |set: &mut HashSet<T>, item: T| {
                    set.insert(item);
                })
            }),
            from_elements: None,
        }));
}

impl<T: Describe + Ord> Describe for BTreeSet<T> {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Sequence(SequenceDef {
            element: descriptor_of::<T>,
            fixed_size: false,
            iter: |value| Some(erase(value.downcast_ref::<Self>()?.iter())),
            new_empty: Some(new_default::<Self>),
            add: Some(|target, item| {
                add_with(target, item, |set: &mut BTreeSet<T>, item: T| {
                    set.insert(item);
                })
            }),
            from_elements: None,
        }));
}

/// Fixed size: decoding requires exactly `N` elements.
impl<T: Describe, const N: usize> Describe for [T; N] {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Sequence(SequenceDef {
            element: descriptor_of::<T>,
            fixed_size: true,
            iter: |value| Some(erase(value.downcast_ref::<Self>()?.iter())),
            new_empty: None,
            add: None,
            from_elements: Some(|elements| {
                let items = elements_into::<T>(elements)?;
                let array: [T; N] = items.try_into().ok()?;
                Some(Box::new(array))
            }),
        }));
}

/// Borrowed slices can be encoded but never built.
impl<T: Describe> Describe for &'static [T] {
    const DESCRIPTOR: &'static TypeDescriptor =
        &TypeDescriptor::new::<Self>(Def::Sequence(SequenceDef {
            element: descriptor_of::<T>,
            fixed_size: true,
            iter: |value| Some(erase(value.downcast_ref::<Self>()?.iter())),
            new_empty: None,
            add: None,
            from_elements: None,
        }));
}

impl<K, V> Describe for HashMap<K, V>
where
    K: Describe + Eq + Hash,
    V: Describe,
{
    const DESCRIPTOR: &'static TypeDescriptor = &TypeDescriptor::new::<Self>(Def::Map(MapDef {
        key: descriptor_of::<K>,
        value: descriptor_of::<V>,
        entries: |value| Some(erase_entries(value.downcast_ref::<Self>()?.iter())),
        new_empty: Some(new_default::<Self>),
        insert: Some(|target, key, value| {
            insert_with(target, key, value, |map: &mut HashMap<K, V>, k: K, v: V| {
                map.insert(k, v);
            })
        }),
    }));
}

impl<K, V> Describe for BTreeMap<K, V>
where
    K: Describe + Ord,
    V: Describe,
{
    const DESCRIPTOR: &'static TypeDescriptor = &TypeDescriptor::new::<Self>(Def::Map(MapDef {
        key: descriptor_of::<K>,
        value: descriptor_of::<V>,
        entries: |value| Some(erase_entries(value.downcast_ref::<Self>()?.iter())),
        new_empty: Some(new_default::<Self>),
        insert: Some(|target, key, value| {
            insert_with(target, key, value, |map: &mut BTreeMap<K, V>, k: K, v: V| {
                map.insert(k, v);
            })
        }),
    }));
}

/// Insertion-ordered map: encodes entries in the order they were added.
impl<K, V> Describe for IndexMap<K, V>
where
    K: Describe + Eq + Hash,
    V: Describe,
{
    const DESCRIPTOR: &'static TypeDescriptor = &TypeDescriptor::new::<Self>(Def::Map(MapDef {
        key: descriptor_of::<K>,
        value: descriptor_of::<V>,
        entries: |value| Some(erase_entries(value.downcast_ref::<Self>()?.iter())),
        new_empty: Some(new_default::<Self>),
        insert: Some(|target, key, value| {
            insert_with(target, key, value, |map: &mut IndexMap<K, V>, k: K, v: V| {
                map.insert(k, v);
            })
        }),
    }));
}
