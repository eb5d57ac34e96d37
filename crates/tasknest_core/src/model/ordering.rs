//! Ordering policy for categories and tasks.
//!
//! # Responsibility
//! - Describe sort keys in a storage-neutral way (`SortDescriptor`).
//! - Provide total, deterministic comparators and stable sorting.
//! - Assign display positions.
//!
//! # Invariants
//! - Every comparison ends with `created_at ASC, id ASC`, so no two distinct
//!   entities ever compare equal.
//! - Sorting is stable: repeated sorts of the same input yield the same output.

use std::cmp::Ordering;
use uuid::Uuid;

/// Entity fields the ordering policy can compare.
pub trait Sortable {
    fn sort_order(&self) -> i32;
    fn created_at_ms(&self) -> i64;
    fn sort_id(&self) -> Uuid;
}

/// Entities whose display position can be rewritten.
pub trait Positioned: Sortable {
    fn set_sort_order(&mut self, position: i32);
}

/// Field compared by one sort descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Order,
    CreatedAt,
}

/// One sort criterion: key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortDescriptor {
    pub key: SortKey,
    pub ascending: bool,
}

impl SortDescriptor {
    pub const fn by_order(ascending: bool) -> Self {
        Self {
            key: SortKey::Order,
            ascending,
        }
    }

    pub const fn by_created_at(ascending: bool) -> Self {
        Self {
            key: SortKey::CreatedAt,
            ascending,
        }
    }

    /// Canonical ordering used for "first/default" lookups.
    pub const fn default_ordering() -> Self {
        Self::by_order(true)
    }

    /// Compares only the key of this descriptor.
    pub fn compare_key<T: Sortable + ?Sized>(&self, a: &T, b: &T) -> Ordering {
        let ordering = match self.key {
            SortKey::Order => a.sort_order().cmp(&b.sort_order()),
            SortKey::CreatedAt => a.created_at_ms().cmp(&b.created_at_ms()),
        };
        if self.ascending {
            ordering
        } else {
            ordering.reverse()
        }
    }

    /// Total comparator: this key, then the deterministic tie-breakers.
    pub fn comparator<T: Sortable>(self) -> impl Fn(&T, &T) -> Ordering {
        move |a, b| compare_with(&[self], a, b)
    }
}

impl Default for SortDescriptor {
    fn default() -> Self {
        Self::default_ordering()
    }
}

/// Compares two entities by `descriptors`, then `created_at ASC, id ASC`.
pub fn compare_with<T: Sortable + ?Sized>(
    descriptors: &[SortDescriptor],
    a: &T,
    b: &T,
) -> Ordering {
    descriptors
        .iter()
        .map(|descriptor| descriptor.compare_key(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.created_at_ms().cmp(&b.created_at_ms()))
        .then_with(|| a.sort_id().cmp(&b.sort_id()))
}

/// Stable in-place sort. Empty `descriptors` falls back to the default ordering.
pub fn sort_entities<T: Sortable>(items: &mut [T], descriptors: &[SortDescriptor]) {
    if descriptors.is_empty() {
        items.sort_by(|a, b| compare_with(&[SortDescriptor::default_ordering()], a, b));
    } else {
        items.sort_by(|a, b| compare_with(descriptors, a, b));
    }
}

/// Position that places a new entity after all `existing` ones.
pub fn next_order<'a, T, I>(existing: I) -> i32
where
    T: Sortable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    existing
        .into_iter()
        .map(Sortable::sort_order)
        .max()
        .map_or(0, |max| max.saturating_add(1))
}

/// Rewrites positions to match slice indices (`0..len`).
pub fn assign_positions<T: Positioned>(items: &mut [T]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_sort_order(i32::try_from(index).unwrap_or(i32::MAX));
    }
}

#[cfg(test)]
mod tests {
    use super::{
        assign_positions, compare_with, next_order, sort_entities, Positioned, SortDescriptor,
        Sortable,
    };
    use std::cmp::Ordering;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item {
        id: Uuid,
        order: i32,
        created_at: i64,
    }

    impl Sortable for Item {
        fn sort_order(&self) -> i32 {
            self.order
        }
        fn created_at_ms(&self) -> i64 {
            self.created_at
        }
        fn sort_id(&self) -> Uuid {
            self.id
        }
    }

    impl Positioned for Item {
        fn set_sort_order(&mut self, position: i32) {
            self.order = position;
        }
    }

    fn item(order: i32, created_at: i64) -> Item {
        Item {
            id: Uuid::new_v4(),
            order,
            created_at,
        }
    }

    #[test]
    fn order_ties_break_by_created_at() {
        let items = vec![item(2, 10), item(1, 30), item(1, 20)];
        let mut sorted = items.clone();
        sort_entities(&mut sorted, &[SortDescriptor::default_ordering()]);

        let keys: Vec<(i32, i64)> = sorted.iter().map(|i| (i.order, i.created_at)).collect();
        assert_eq!(keys, vec![(1, 20), (1, 30), (2, 10)]);
    }

    #[test]
    fn descending_order_reverses_primary_key_only() {
        let mut items = vec![item(0, 5), item(3, 2), item(3, 1)];
        sort_entities(&mut items, &[SortDescriptor::by_order(false)]);

        let keys: Vec<(i32, i64)> = items.iter().map(|i| (i.order, i.created_at)).collect();
        assert_eq!(keys, vec![(3, 1), (3, 2), (0, 5)]);
    }

    #[test]
    fn created_at_descriptor_sorts_newest_first() {
        let mut items = vec![item(0, 1), item(0, 3), item(0, 2)];
        sort_entities(&mut items, &[SortDescriptor::by_created_at(false)]);

        let created: Vec<i64> = items.iter().map(|i| i.created_at).collect();
        assert_eq!(created, vec![3, 2, 1]);
    }

    #[test]
    fn comparator_is_total_for_identical_keys() {
        let a = item(1, 1);
        let mut b = item(1, 1);
        b.id = a.id;
        assert_eq!(compare_with(&[], &a, &b), Ordering::Equal);

        let c = item(1, 1);
        assert_ne!(compare_with(&[], &a, &c), Ordering::Equal);
        let compare = SortDescriptor::default_ordering().comparator::<Item>();
        assert_eq!(compare(&a, &c), compare(&c, &a).reverse());
    }

    #[test]
    fn next_order_appends_after_max() {
        assert_eq!(next_order::<Item, _>(&[]), 0);
        assert_eq!(next_order(&[item(4, 0), item(-1, 0)]), 5);
        assert_eq!(next_order(&[item(i32::MAX, 0)]), i32::MAX);
    }

    #[test]
    fn assign_positions_matches_indices() {
        let mut items = vec![item(9, 0), item(3, 0), item(7, 0)];
        assign_positions(&mut items);
        let orders: Vec<i32> = items.iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }
}
