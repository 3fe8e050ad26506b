//! Invalidation sets.
//!
//! An invalidation set describes which elements must have their style
//! recomputed when a feature (a class, id, tag name, attribute or
//! pseudo-class) changes on some element. Descendant sets name elements in
//! the changed element's subtree; sibling sets name later siblings, and may
//! carry descendant sets of their own.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::element::Element;

/// `max_direct_adjacent_selectors` value meaning "any number of siblings",
/// produced by the `~` combinator.
pub const DIRECT_ADJACENT_MAX: u32 = u32::MAX;

static SELF_INVALIDATION_SET: Lazy<Arc<InvalidationSet>> = Lazy::new(|| {
    let mut set = InvalidationSet::new_descendant();
    set.invalidates_self = true;
    set.is_self_invalidation_set = true;
    Arc::new(set)
});

/// Storage for one kind of feature (classes, ids, tag names or attribute
/// names). Most sets hold zero or one entry, so a hash set is only
/// allocated for the second distinct value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Backing {
    /// No entries.
    #[default]
    Empty,
    /// Exactly one entry.
    Single(String),
    /// Two or more entries.
    Set(HashSet<String>),
}

impl Backing {
    /// Add `value`. Adding a value already held is a no-op.
    pub fn add(&mut self, value: &str) {
        match self {
            Self::Empty => *self = Self::Single(value.to_owned()),
            Self::Single(existing) if existing == value => {}
            Self::Single(existing) => {
                let set = HashSet::from([core::mem::take(existing), value.to_owned()]);
                *self = Self::Set(set);
            }
            Self::Set(set) => {
                let _ = set.insert(value.to_owned());
            }
        }
    }

    /// Whether `value` is held.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        match self {
            Self::Empty => false,
            Self::Single(existing) => existing == value,
            Self::Set(set) => set.contains(value),
        }
    }

    /// Drop every entry, releasing the hash set if there was one.
    pub fn clear(&mut self) {
        *self = Self::Empty;
    }

    /// Whether nothing is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Whether the entries live in a hash set.
    #[must_use]
    pub const fn is_hash_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// The single entry, when there is exactly one.
    #[must_use]
    pub fn string_impl(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Empty | Self::Set(_) => None,
        }
    }

    /// The hash set, when there are two or more entries.
    #[must_use]
    pub const fn hash_set(&self) -> Option<&HashSet<String>> {
        match self {
            Self::Set(set) => Some(set),
            Self::Empty | Self::Single(_) => None,
        }
    }

    /// Iterate over the entries, in no particular order.
    pub fn items(&self) -> impl Iterator<Item = &str> + '_ {
        self.string_impl()
            .into_iter()
            .chain(self.hash_set().into_iter().flatten().map(String::as_str))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(_) => 1,
            Self::Set(set) => set.len(),
        }
    }
}

/// What an invalidation set invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidationType {
    /// Elements in the subtree of the changed element.
    InvalidateDescendants,
    /// Later siblings of the changed element.
    InvalidateSiblings,
}

#[derive(Debug, Clone)]
enum SetKind {
    Descendants,
    Siblings {
        max_direct_adjacent_selectors: u32,
        /// Invalidated in the changed element's own subtree.
        descendants: Option<Arc<InvalidationSet>>,
        /// Invalidated in the subtrees of the matching siblings.
        sibling_descendants: Option<Arc<InvalidationSet>>,
    },
}

/// One invalidation set.
///
/// Sets are shared through [`Arc`] between the maps that own them and the
/// [`InvalidationLists`](super::InvalidationLists) handed out by queries;
/// mutation goes through [`Arc::make_mut`].
#[derive(Debug, Clone)]
pub struct InvalidationSet {
    kind: SetKind,
    classes: Backing,
    ids: Backing,
    tag_names: Backing,
    attributes: Backing,
    invalidates_self: bool,
    whole_subtree_invalid: bool,
    is_self_invalidation_set: bool,
}

impl InvalidationSet {
    fn with_kind(kind: SetKind) -> Self {
        Self {
            kind,
            classes: Backing::Empty,
            ids: Backing::Empty,
            tag_names: Backing::Empty,
            attributes: Backing::Empty,
            invalidates_self: false,
            whole_subtree_invalid: false,
            is_self_invalidation_set: false,
        }
    }

    /// An empty descendant set.
    #[must_use]
    pub fn new_descendant() -> Self {
        Self::with_kind(SetKind::Descendants)
    }

    /// An empty sibling set reaching one sibling, with `descendants` to
    /// invalidate in the changed element's own subtree.
    #[must_use]
    pub fn new_sibling(descendants: Option<Arc<Self>>) -> Self {
        Self::with_kind(SetKind::Siblings {
            max_direct_adjacent_selectors: 1,
            descendants,
            sibling_descendants: None,
        })
    }

    /// An empty set of the given type.
    #[must_use]
    pub fn new(invalidation_type: InvalidationType) -> Self {
        match invalidation_type {
            InvalidationType::InvalidateDescendants => Self::new_descendant(),
            InvalidationType::InvalidateSiblings => Self::new_sibling(None),
        }
    }

    /// The shared set that invalidates only the element it is collected
    /// for. Every call returns the same allocation.
    #[must_use]
    pub fn self_invalidation_set() -> Arc<Self> {
        Arc::clone(&SELF_INVALIDATION_SET)
    }

    /// Whether this is the shared self-invalidation set (or a copy of it).
    #[must_use]
    pub const fn is_self_invalidation_set(&self) -> bool {
        self.is_self_invalidation_set
    }

    /// Descendant or sibling.
    #[must_use]
    pub const fn invalidation_type(&self) -> InvalidationType {
        match self.kind {
            SetKind::Descendants => InvalidationType::InvalidateDescendants,
            SetKind::Siblings { .. } => InvalidationType::InvalidateSiblings,
        }
    }

    /// Whether this is a descendant set.
    #[must_use]
    pub const fn is_descendant_invalidation_set(&self) -> bool {
        matches!(self.kind, SetKind::Descendants)
    }

    /// Whether this is a sibling set.
    #[must_use]
    pub const fn is_sibling_invalidation_set(&self) -> bool {
        matches!(self.kind, SetKind::Siblings { .. })
    }

    /// Whether the element the set is collected for must itself be
    /// restyled.
    #[must_use]
    pub const fn invalidates_self(&self) -> bool {
        self.invalidates_self
    }

    /// Mark the set as invalidating the element it is collected for.
    pub const fn set_invalidates_self(&mut self) {
        self.invalidates_self = true;
    }

    /// Whether every element the set reaches must be restyled.
    #[must_use]
    pub const fn whole_subtree_invalid(&self) -> bool {
        self.whole_subtree_invalid
    }

    /// Invalidate everything the set reaches. Individual features become
    /// redundant and are dropped.
    pub fn set_whole_subtree_invalid(&mut self) {
        self.whole_subtree_invalid = true;
        self.classes.clear();
        self.ids.clear();
        self.tag_names.clear();
        self.attributes.clear();
    }

    /// Whether no individual feature is recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.classes.is_empty()
            && self.ids.is_empty()
            && self.tag_names.is_empty()
            && self.attributes.is_empty()
    }

    /// Recorded class names.
    #[must_use]
    pub const fn classes(&self) -> &Backing {
        &self.classes
    }

    /// Recorded ids.
    #[must_use]
    pub const fn ids(&self) -> &Backing {
        &self.ids
    }

    /// Recorded tag names.
    #[must_use]
    pub const fn tag_names(&self) -> &Backing {
        &self.tag_names
    }

    /// Recorded attribute names.
    #[must_use]
    pub const fn attributes(&self) -> &Backing {
        &self.attributes
    }

    /// Record a class name.
    pub fn add_class(&mut self, class_name: &str) {
        if !self.whole_subtree_invalid {
            self.classes.add(class_name);
        }
    }

    /// Record an id.
    pub fn add_id(&mut self, id: &str) {
        if !self.whole_subtree_invalid {
            self.ids.add(id);
        }
    }

    /// Record a tag name.
    pub fn add_tag_name(&mut self, tag_name: &str) {
        if !self.whole_subtree_invalid {
            self.tag_names.add(tag_name);
        }
    }

    /// Record an attribute name.
    pub fn add_attribute(&mut self, attribute: &str) {
        if !self.whole_subtree_invalid {
            self.attributes.add(attribute);
        }
    }

    /// How many siblings a sibling set reaches. Zero for descendant sets.
    #[must_use]
    pub const fn max_direct_adjacent_selectors(&self) -> u32 {
        match self.kind {
            SetKind::Descendants => 0,
            SetKind::Siblings {
                max_direct_adjacent_selectors,
                ..
            } => max_direct_adjacent_selectors,
        }
    }

    /// Widen a sibling set's reach to at least `value`.
    pub fn update_max_direct_adjacent_selectors(&mut self, value: u32) {
        if let SetKind::Siblings {
            max_direct_adjacent_selectors,
            ..
        } = &mut self.kind
        {
            *max_direct_adjacent_selectors = (*max_direct_adjacent_selectors).max(value);
        }
    }

    /// For a sibling set, what to invalidate in the changed element's own
    /// subtree.
    #[must_use]
    pub const fn descendants(&self) -> Option<&Arc<Self>> {
        match &self.kind {
            SetKind::Siblings { descendants, .. } => descendants.as_ref(),
            SetKind::Descendants => None,
        }
    }

    /// For a sibling set, what to invalidate in the subtrees of the
    /// siblings it reaches.
    #[must_use]
    pub const fn sibling_descendants(&self) -> Option<&Arc<Self>> {
        match &self.kind {
            SetKind::Siblings {
                sibling_descendants,
                ..
            } => sibling_descendants.as_ref(),
            SetKind::Descendants => None,
        }
    }

    /// A sibling set's `descendants`, created empty if missing. `None` for
    /// descendant sets.
    pub fn ensure_descendants(&mut self) -> Option<&mut Self> {
        match &mut self.kind {
            SetKind::Siblings { descendants, .. } => Some(make_mut_or_insert(descendants)),
            SetKind::Descendants => None,
        }
    }

    /// A sibling set's `sibling_descendants`, created empty if missing.
    /// `None` for descendant sets.
    pub fn ensure_sibling_descendants(&mut self) -> Option<&mut Self> {
        match &mut self.kind {
            SetKind::Siblings {
                sibling_descendants,
                ..
            } => Some(make_mut_or_insert(sibling_descendants)),
            SetKind::Descendants => None,
        }
    }

    /// Whether a change reaching `element` through this set requires
    /// restyling it.
    #[must_use]
    pub fn invalidates_element<E: Element>(&self, element: &E) -> bool {
        if self.whole_subtree_invalid {
            return true;
        }
        let tag_name = element.tag_name();
        if self
            .tag_names
            .items()
            .any(|name| name.eq_ignore_ascii_case(tag_name))
        {
            return true;
        }
        if element.id().is_some_and(|id| self.ids.contains(id)) {
            return true;
        }
        if !self.classes.is_empty() {
            let mut found = false;
            element.each_class(&mut |class_name| found |= self.classes.contains(class_name));
            if found {
                return true;
            }
        }
        self.attributes
            .items()
            .any(|name| element.attribute(name).is_some())
    }

    /// Fold `other` into this set. Sets of different types are not
    /// combined; the shared self-invalidation set is never modified.
    pub fn combine(&mut self, other: &Self) {
        if self.is_self_invalidation_set {
            return;
        }

        let (ours, theirs) = (self.invalidation_type(), other.invalidation_type());
        match (&mut self.kind, &other.kind) {
            (
                SetKind::Siblings {
                    max_direct_adjacent_selectors,
                    descendants,
                    sibling_descendants,
                },
                SetKind::Siblings {
                    max_direct_adjacent_selectors: other_max,
                    descendants: other_descendants,
                    sibling_descendants: other_sibling_descendants,
                },
            ) => {
                *max_direct_adjacent_selectors = (*max_direct_adjacent_selectors).max(*other_max);
                if let Some(other_sibling_descendants) = other_sibling_descendants {
                    make_mut_or_insert(sibling_descendants).combine(other_sibling_descendants);
                }
                if let Some(other_descendants) = other_descendants {
                    make_mut_or_insert(descendants).combine(other_descendants);
                }
            }
            (SetKind::Descendants, SetKind::Descendants) => {}
            _ => {
                log::debug!("not combining {ours:?} set with {theirs:?} set");
                return;
            }
        }

        if other.invalidates_self {
            self.invalidates_self = true;
            if other.is_self_invalidation_set {
                return;
            }
        }

        if self.whole_subtree_invalid {
            return;
        }
        if other.whole_subtree_invalid {
            self.set_whole_subtree_invalid();
            return;
        }

        for class_name in other.classes.items() {
            self.classes.add(class_name);
        }
        for id in other.ids.items() {
            self.ids.add(id);
        }
        for tag_name in other.tag_names.items() {
            self.tag_names.add(tag_name);
        }
        for attribute in other.attributes.items() {
            self.attributes.add(attribute);
        }
    }
}

fn make_mut_or_insert(slot: &mut Option<Arc<InvalidationSet>>) -> &mut InvalidationSet {
    Arc::make_mut(slot.get_or_insert_with(|| Arc::new(InvalidationSet::new_descendant())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_invalidation_set_is_shared() {
        let first = InvalidationSet::self_invalidation_set();
        let second = InvalidationSet::self_invalidation_set();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.is_self_invalidation_set());
        assert!(first.invalidates_self());
        assert!(first.is_descendant_invalidation_set());
    }

    #[test]
    fn test_combine_mismatched_types_is_ignored() {
        let mut descendant = InvalidationSet::new_descendant();
        let mut sibling = InvalidationSet::new_sibling(None);
        sibling.add_class("a");
        descendant.combine(&sibling);
        assert!(descendant.is_empty());
    }

    #[test]
    fn test_combine_siblings_merges_nested_sets() {
        let mut nested = InvalidationSet::new_descendant();
        nested.add_id("x");

        let mut first = InvalidationSet::new_sibling(None);
        let mut second = InvalidationSet::new_sibling(Some(Arc::new(nested)));
        second.update_max_direct_adjacent_selectors(3);
        if let Some(sibling_descendants) = second.ensure_sibling_descendants() {
            sibling_descendants.add_class("y");
        }

        first.combine(&second);
        assert_eq!(first.max_direct_adjacent_selectors(), 3);
        assert!(first.descendants().is_some_and(|d| d.ids().contains("x")));
        assert!(
            first
                .sibling_descendants()
                .is_some_and(|d| d.classes().contains("y"))
        );
    }
}
