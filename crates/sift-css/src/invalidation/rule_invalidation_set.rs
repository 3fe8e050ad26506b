//! Feature-to-invalidation-set maps built from style rules.
//!
//! For every selector added, the features of the subject (rightmost)
//! compound are recorded in the invalidation sets of every feature found
//! further left, so that when a feature changes on an element the sets
//! collected for it name exactly the elements whose style may change.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::sync::Arc;

use super::invalidation_set::{DIRECT_ADJACENT_MAX, InvalidationSet, InvalidationType};
use crate::selector::{CSSSelector, MatchType, PseudoType, RelationType, SelectorRef};
use crate::style_rule::StyleRule;

/// Sets collected for a feature change, deduplicated by identity.
#[derive(Debug, Clone, Default)]
pub struct InvalidationLists {
    /// Sets to apply to the changed element's subtree.
    pub descendants: Vec<Arc<InvalidationSet>>,
    /// Sets to apply to the changed element's later siblings.
    pub siblings: Vec<Arc<InvalidationSet>>,
}

impl InvalidationLists {
    /// Empty lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descendants.is_empty() && self.siblings.is_empty()
    }

    /// Forget everything collected so far.
    pub fn clear(&mut self) {
        self.descendants.clear();
        self.siblings.clear();
    }

    /// Add `set` to the list matching its type. A sibling set also
    /// contributes its own-subtree set to the descendant list.
    fn collect(&mut self, set: &Arc<InvalidationSet>) {
        match set.invalidation_type() {
            InvalidationType::InvalidateDescendants => push_unique(&mut self.descendants, set),
            InvalidationType::InvalidateSiblings => {
                push_unique(&mut self.siblings, set);
                if let Some(descendants) = set.descendants() {
                    push_unique(&mut self.descendants, descendants);
                }
            }
        }
    }
}

fn push_unique(list: &mut Vec<Arc<InvalidationSet>>, set: &Arc<InvalidationSet>) {
    if !list.iter().any(|existing| Arc::ptr_eq(existing, set)) {
        list.push(Arc::clone(set));
    }
}

/// Where the compound being analyzed sits in its complex selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PositionType {
    /// The rightmost compound: the element the rule styles.
    Subject,
    /// Any compound to its left.
    Ancestor,
}

/// Features gathered from one compound (or a run of compounds), to be
/// recorded in other features' invalidation sets.
#[derive(Debug, Clone, Default)]
struct InvalidationSetFeatures {
    classes: Vec<String>,
    ids: Vec<String>,
    tag_names: Vec<String>,
    attributes: Vec<String>,
    max_direct_adjacent_selectors: u32,
    force_subtree: bool,
}

impl InvalidationSetFeatures {
    fn size(&self) -> usize {
        self.classes.len() + self.ids.len() + self.tag_names.len() + self.attributes.len()
    }

    fn has_features(&self) -> bool {
        self.size() > 0
    }

    fn clear_features(&mut self) {
        self.classes.clear();
        self.ids.clear();
        self.tag_names.clear();
        self.attributes.clear();
    }

    fn add(&mut self, other: &Self) {
        self.classes.extend_from_slice(&other.classes);
        self.ids.extend_from_slice(&other.ids);
        self.tag_names.extend_from_slice(&other.tag_names);
        self.attributes.extend_from_slice(&other.attributes);
        self.force_subtree |= other.force_subtree;
    }

    // A single feature is enough to identify the subject, so a compound is
    // narrowed to its most specific one: id, then class, then attribute,
    // then tag name.

    fn narrow_to_id(&mut self, id: &str) {
        if self.size() == 1 && !self.ids.is_empty() {
            return;
        }
        self.clear_features();
        self.ids.push(id.to_owned());
    }

    fn narrow_to_class(&mut self, class_name: &str) {
        if self.size() == 1 && (!self.ids.is_empty() || !self.classes.is_empty()) {
            return;
        }
        self.clear_features();
        self.classes.push(class_name.to_owned());
    }

    fn narrow_to_attribute(&mut self, attribute: &str) {
        if self.size() == 1
            && (!self.ids.is_empty() || !self.classes.is_empty() || !self.attributes.is_empty())
        {
            return;
        }
        self.clear_features();
        self.attributes.push(attribute.to_owned());
    }

    fn narrow_to_tag(&mut self, tag_name: &str) {
        if self.size() == 1 {
            return;
        }
        self.clear_features();
        self.tag_names.push(tag_name.to_ascii_lowercase());
    }

    fn extract_from_simple(&mut self, selector: &CSSSelector) {
        match selector.match_type() {
            MatchType::Tag if !selector.is_universal() => self.narrow_to_tag(selector.value()),
            MatchType::Id => self.narrow_to_id(selector.value()),
            MatchType::Class => self.narrow_to_class(selector.value()),
            match_type if match_type.is_attribute() => {
                if let Some(name) = selector.attribute_name() {
                    self.narrow_to_attribute(name);
                }
            }
            _ => {}
        }
    }

    fn update_max_direct_adjacent_selectors(&mut self, relation: RelationType) {
        if self.max_direct_adjacent_selectors == DIRECT_ADJACENT_MAX {
            return;
        }
        if relation == RelationType::DirectAdjacent {
            self.max_direct_adjacent_selectors += 1;
        } else {
            self.max_direct_adjacent_selectors = DIRECT_ADJACENT_MAX;
        }
    }

    fn add_to(&self, set: &mut InvalidationSet) {
        if self.force_subtree {
            set.set_whole_subtree_invalid();
            return;
        }
        for class_name in &self.classes {
            set.add_class(class_name);
        }
        for id in &self.ids {
            set.add_id(id);
        }
        for tag_name in &self.tag_names {
            set.add_tag_name(tag_name);
        }
        for attribute in &self.attributes {
            set.add_attribute(attribute);
        }
    }
}

/// Which features a sibling combinator chain records, if one is being
/// walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SiblingChain {
    /// No sibling combinator between here and the last descendant one.
    None,
    /// The chain starts at the subject: siblings record the subject's own
    /// features.
    Subject,
    /// The chain starts at an ancestor compound: siblings record that
    /// compound's features.
    LastCompound,
}

#[derive(Debug, Clone, Copy)]
struct SiblingFeatures<'f> {
    features: &'f InvalidationSetFeatures,
    /// Whether `features` are the descendant features themselves.
    is_subject: bool,
}

/// Invalidation sets keyed by feature.
///
/// Only a universal *sibling* set is kept. A featureless subject under a
/// feature (`:hover *`, `.a > *`) marks that feature's descendant set as
/// whole-subtree invalid, so a universal descendant list would never hold
/// anything the keyed sets do not already cover.
#[derive(Debug, Clone, Default)]
pub struct RuleInvalidationSet {
    class_invalidation_sets: HashMap<String, Arc<InvalidationSet>>,
    id_invalidation_sets: HashMap<String, Arc<InvalidationSet>>,
    tag_name_invalidation_sets: HashMap<String, Arc<InvalidationSet>>,
    attribute_invalidation_sets: HashMap<String, Arc<InvalidationSet>>,
    pseudo_invalidation_sets: HashMap<PseudoType, Arc<InvalidationSet>>,
    universal_sibling_invalidation_set: Option<Arc<InvalidationSet>>,
}

impl RuleInvalidationSet {
    /// No rules recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no feature has an invalidation set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.class_invalidation_sets.is_empty()
            && self.id_invalidation_sets.is_empty()
            && self.tag_name_invalidation_sets.is_empty()
            && self.attribute_invalidation_sets.is_empty()
            && self.pseudo_invalidation_sets.is_empty()
            && self.universal_sibling_invalidation_set.is_none()
    }

    /// Record every alternative of `rule`.
    pub fn add_style_rule(&mut self, rule: &StyleRule) {
        for selector in rule.selector_list() {
            self.add_selector(selector);
        }
    }

    /// Record one complex selector.
    pub fn add_selector(&mut self, selector: SelectorRef<'_>) {
        log::trace!("adding invalidation features for {}", selector.selector_text());
        self.update_invalidation_sets(selector);
    }

    /// Fold `other`'s sets into this one, feature by feature. Sets only
    /// present in `other` are shared, not copied.
    pub fn merge(&mut self, other: &Self) {
        merge_map(&mut self.class_invalidation_sets, &other.class_invalidation_sets);
        merge_map(&mut self.id_invalidation_sets, &other.id_invalidation_sets);
        merge_map(
            &mut self.tag_name_invalidation_sets,
            &other.tag_name_invalidation_sets,
        );
        merge_map(
            &mut self.attribute_invalidation_sets,
            &other.attribute_invalidation_sets,
        );
        merge_map(&mut self.pseudo_invalidation_sets, &other.pseudo_invalidation_sets);

        if let Some(theirs) = &other.universal_sibling_invalidation_set {
            match &mut self.universal_sibling_invalidation_set {
                Some(ours) => Arc::make_mut(ours).combine(theirs),
                None => self.universal_sibling_invalidation_set = Some(Arc::clone(theirs)),
            }
        }
    }

    /// Drop every set. Sets already handed out through
    /// [`InvalidationLists`] stay valid.
    pub fn clear(&mut self) {
        self.class_invalidation_sets.clear();
        self.id_invalidation_sets.clear();
        self.tag_name_invalidation_sets.clear();
        self.attribute_invalidation_sets.clear();
        self.pseudo_invalidation_sets.clear();
        self.universal_sibling_invalidation_set = None;
    }

    /// Sets for a change of class `class_name`.
    pub fn collect_class(&self, lists: &mut InvalidationLists, class_name: &str) {
        if let Some(set) = self.class_invalidation_sets.get(class_name) {
            lists.collect(set);
        }
    }

    /// Sets for a change of id `id`.
    pub fn collect_id(&self, lists: &mut InvalidationLists, id: &str) {
        if let Some(set) = self.id_invalidation_sets.get(id) {
            lists.collect(set);
        }
    }

    /// Sets for an element of tag `tag_name` being inserted or removed.
    pub fn collect_tag_name(&self, lists: &mut InvalidationLists, tag_name: &str) {
        if let Some(set) = self
            .tag_name_invalidation_sets
            .get(&tag_name.to_ascii_lowercase())
        {
            lists.collect(set);
        }
    }

    /// Sets for a change of attribute `name`.
    pub fn collect_attribute(&self, lists: &mut InvalidationLists, name: &str) {
        if let Some(set) = self.attribute_invalidation_sets.get(name) {
            lists.collect(set);
        }
    }

    /// Sets for a change of the state behind `pseudo_type`.
    pub fn collect_pseudo_class(&self, lists: &mut InvalidationLists, pseudo_type: PseudoType) {
        if let Some(set) = self.pseudo_invalidation_sets.get(&pseudo_type) {
            lists.collect(set);
        }
    }

    /// The sibling set for compounds with no id, class or attribute, when
    /// it reaches at least `min_direct_adjacent` siblings.
    pub fn collect_universal_sibling(&self, lists: &mut InvalidationLists, min_direct_adjacent: u32) {
        if let Some(set) = &self.universal_sibling_invalidation_set
            && set.max_direct_adjacent_selectors() >= min_direct_adjacent
        {
            push_unique(&mut lists.siblings, set);
        }
    }

    fn update_invalidation_sets(&mut self, selector: SelectorRef<'_>) {
        // STEP 1: Gather the subject's features. The subject's own keys get
        // self-invalidation sets on the way.
        let mut features = InvalidationSetFeatures::default();
        let last_in_compound = self.extract_features_from_compound(
            selector,
            &mut features,
            PositionType::Subject,
            PseudoType::Unknown,
        );
        if !features.force_subtree && !features.has_features() {
            features.force_subtree = true;
        }
        if features.force_subtree {
            log::trace!("subject has no usable feature, invalidating whole subtrees");
        }

        // STEP 2: Everything left of the subject records those features.
        let next_compound = match last_in_compound {
            Some(last) => last.tag_history(),
            None => Some(selector),
        };
        let Some(next_compound) = next_compound else {
            return;
        };

        let mut chain = SiblingChain::None;
        if let Some(last) = last_in_compound
            && last.relation().is_adjacent()
        {
            chain = SiblingChain::Subject;
            features.update_max_direct_adjacent_selectors(last.relation());
        }
        self.add_features_to_invalidation_sets(next_compound, chain, &mut features);
    }

    /// Walk the compound starting at `compound`, adding its features to
    /// `features` (unless inside `:not()`) and making sure every key in it
    /// has a descendant set. Returns the compound's last simple selector, or
    /// `None` when the compound can only be invalidated as a whole subtree.
    fn extract_features_from_compound<'a>(
        &mut self,
        compound: SelectorRef<'a>,
        features: &mut InvalidationSetFeatures,
        position: PositionType,
        enclosing_pseudo: PseudoType,
    ) -> Option<SelectorRef<'a>> {
        let mut current = compound;
        loop {
            if position == PositionType::Subject
                && matches!(
                    current.pseudo_type(),
                    PseudoType::FirstLine | PseudoType::FirstLetter
                )
            {
                features.force_subtree = true;
                return None;
            }

            if enclosing_pseudo != PseudoType::Not {
                features.extract_from_simple(current.selector());
            }

            let set = self.invalidation_set_for_simple(
                current.selector(),
                InvalidationType::InvalidateDescendants,
                position,
            );
            if let Some(set) = set
                && position == PositionType::Subject
            {
                set.set_invalidates_self();
            }

            self.extract_features_from_selector_list(current, features, position);

            if current.relation() != RelationType::SubSelector {
                return Some(current);
            }
            match current.tag_history() {
                Some(next) => current = next,
                None => return Some(current),
            }
        }
    }

    fn extract_features_from_selector_list(
        &mut self,
        simple: SelectorRef<'_>,
        features: &mut InvalidationSetFeatures,
        position: PositionType,
    ) {
        let Some(list) = simple.selector().selector_list() else {
            return;
        };
        let pseudo_type = simple.pseudo_type();

        let mut all_have_features = true;
        let mut any_features = InvalidationSetFeatures::default();
        for sub_selector in list {
            let mut compound_features = InvalidationSetFeatures::default();
            if self
                .extract_features_from_compound(
                    sub_selector,
                    &mut compound_features,
                    position,
                    pseudo_type,
                )
                .is_none()
            {
                features.force_subtree = true;
                return;
            }
            if !all_have_features {
                continue;
            }
            if compound_features.has_features() {
                any_features.add(&compound_features);
            } else {
                all_have_features = false;
            }
        }

        // `:is(*, .a)` says nothing narrower than the rest of the compound,
        // and an element matching `:not(.a)` has no `.a` to key on.
        if all_have_features && pseudo_type != PseudoType::Not {
            features.add(&any_features);
        }
    }

    fn add_features_to_invalidation_sets(
        &mut self,
        selector: SelectorRef<'_>,
        mut chain: SiblingChain,
        descendant_features: &mut InvalidationSetFeatures,
    ) {
        let mut last_compound_features = InvalidationSetFeatures::default();
        let mut compound = Some(selector);

        while let Some(current) = compound {
            let sibling = match chain {
                SiblingChain::None => None,
                SiblingChain::Subject => Some(SiblingFeatures {
                    features: descendant_features,
                    is_subject: true,
                }),
                SiblingChain::LastCompound => Some(SiblingFeatures {
                    features: &last_compound_features,
                    is_subject: false,
                }),
            };
            let last_in_compound =
                self.add_features_to_invalidation_sets_for_compound(current, sibling, descendant_features);

            let relation = last_in_compound.relation();
            if relation.is_adjacent() {
                if chain == SiblingChain::None {
                    chain = SiblingChain::LastCompound;
                    let _ = self.extract_features_from_compound(
                        current,
                        &mut last_compound_features,
                        PositionType::Ancestor,
                        PseudoType::Unknown,
                    );
                    if !last_compound_features.has_features() {
                        last_compound_features.force_subtree = true;
                    }
                }
                match chain {
                    SiblingChain::Subject => {
                        descendant_features.update_max_direct_adjacent_selectors(relation);
                    }
                    SiblingChain::LastCompound => {
                        last_compound_features.update_max_direct_adjacent_selectors(relation);
                    }
                    SiblingChain::None => {}
                }
            } else {
                if chain != SiblingChain::None && last_compound_features.max_direct_adjacent_selectors != 0 {
                    last_compound_features = InvalidationSetFeatures::default();
                }
                chain = SiblingChain::None;
            }

            compound = last_in_compound.tag_history();
        }
    }

    fn add_features_to_invalidation_sets_for_compound<'a>(
        &mut self,
        compound: SelectorRef<'a>,
        sibling: Option<SiblingFeatures<'_>>,
        descendant_features: &InvalidationSetFeatures,
    ) -> SelectorRef<'a> {
        let mut has_id_class_or_attribute = false;
        let mut current = compound;
        loop {
            self.add_features_to_invalidation_sets_for_simple(current, sibling, descendant_features);
            has_id_class_or_attribute |= current.is_id_class_or_attribute();
            if current.relation() != RelationType::SubSelector {
                break;
            }
            match current.tag_history() {
                Some(next) => current = next,
                None => break,
            }
        }

        if !has_id_class_or_attribute
            && let Some(sibling) = sibling
        {
            self.add_features_to_universal_sibling_invalidation_set(sibling, descendant_features);
        }
        current
    }

    fn add_features_to_invalidation_sets_for_simple(
        &mut self,
        simple: SelectorRef<'_>,
        sibling: Option<SiblingFeatures<'_>>,
        descendant_features: &InvalidationSetFeatures,
    ) {
        let invalidation_type = if sibling.is_some() {
            InvalidationType::InvalidateSiblings
        } else {
            InvalidationType::InvalidateDescendants
        };

        if let Some(set) =
            self.invalidation_set_for_simple(simple.selector(), invalidation_type, PositionType::Ancestor)
        {
            match sibling {
                None => descendant_features.add_to(set),
                Some(sibling) => {
                    set.update_max_direct_adjacent_selectors(
                        sibling.features.max_direct_adjacent_selectors,
                    );
                    sibling.features.add_to(set);
                    if sibling.is_subject {
                        set.set_invalidates_self();
                    } else if let Some(sibling_descendants) = set.ensure_sibling_descendants() {
                        descendant_features.add_to(sibling_descendants);
                    }
                }
            }
            return;
        }

        if let Some(list) = simple.selector().selector_list() {
            for sub_selector in list {
                let _ = self.add_features_to_invalidation_sets_for_compound(
                    sub_selector,
                    sibling,
                    descendant_features,
                );
            }
        }
    }

    fn add_features_to_universal_sibling_invalidation_set(
        &mut self,
        sibling: SiblingFeatures<'_>,
        descendant_features: &InvalidationSetFeatures,
    ) {
        let slot = self
            .universal_sibling_invalidation_set
            .get_or_insert_with(|| Arc::new(InvalidationSet::new_sibling(None)));
        let set = Arc::make_mut(slot);
        sibling.features.add_to(set);
        set.update_max_direct_adjacent_selectors(sibling.features.max_direct_adjacent_selectors);
        if sibling.is_subject {
            set.set_invalidates_self();
        } else if let Some(sibling_descendants) = set.ensure_sibling_descendants() {
            descendant_features.add_to(sibling_descendants);
        }
    }

    /// The set keyed by `selector`'s feature, made ready for mutation.
    /// `None` when the selector is not a key, or when the key only needs the
    /// shared self-invalidation set.
    fn invalidation_set_for_simple(
        &mut self,
        selector: &CSSSelector,
        invalidation_type: InvalidationType,
        position: PositionType,
    ) -> Option<&mut InvalidationSet> {
        match selector.match_type() {
            MatchType::Class => ensure_mutable_invalidation_set(
                &mut self.class_invalidation_sets,
                selector.value().to_owned(),
                invalidation_type,
                position,
            ),
            MatchType::Id => ensure_mutable_invalidation_set(
                &mut self.id_invalidation_sets,
                selector.value().to_owned(),
                invalidation_type,
                position,
            ),
            MatchType::Tag if !selector.is_universal() => ensure_mutable_invalidation_set(
                &mut self.tag_name_invalidation_sets,
                selector.value().to_ascii_lowercase(),
                invalidation_type,
                position,
            ),
            MatchType::PseudoClass if is_invalidation_key(selector.pseudo_type()) => {
                ensure_mutable_invalidation_set(
                    &mut self.pseudo_invalidation_sets,
                    selector.pseudo_type(),
                    invalidation_type,
                    position,
                )
            }
            match_type if match_type.is_attribute() => {
                let name = selector.attribute_name()?;
                ensure_mutable_invalidation_set(
                    &mut self.attribute_invalidation_sets,
                    name.to_owned(),
                    invalidation_type,
                    position,
                )
            }
            _ => None,
        }
    }
}

/// Pseudo-classes that take selector lists are analyzed through their
/// arguments instead of being keys themselves.
const fn is_invalidation_key(pseudo_type: PseudoType) -> bool {
    !matches!(
        pseudo_type,
        PseudoType::Unknown | PseudoType::Not | PseudoType::Is | PseudoType::Where | PseudoType::Has
    )
}

fn ensure_mutable_invalidation_set<K: Eq + Hash>(
    map: &mut HashMap<K, Arc<InvalidationSet>>,
    key: K,
    invalidation_type: InvalidationType,
    position: PositionType,
) -> Option<&mut InvalidationSet> {
    let slot = match map.entry(key) {
        Entry::Vacant(entry) => {
            if invalidation_type == InvalidationType::InvalidateDescendants
                && position == PositionType::Subject
            {
                let _ = entry.insert(InvalidationSet::self_invalidation_set());
                return None;
            }
            entry.insert(Arc::new(InvalidationSet::new(invalidation_type)))
        }
        Entry::Occupied(entry) => entry.into_mut(),
    };
    ensure_mutable_slot(slot, invalidation_type, position)
}

/// Make the set in `slot` unshared and of `invalidation_type`.
///
/// The shared self-invalidation set is replaced by a fresh descendant set
/// that invalidates self, unless it is all that is needed. A sibling set
/// asked for descendants hands out its own-subtree set; a descendant set
/// asked for siblings becomes the own-subtree set of a new sibling set.
fn ensure_mutable_slot(
    slot: &mut Arc<InvalidationSet>,
    invalidation_type: InvalidationType,
    position: PositionType,
) -> Option<&mut InvalidationSet> {
    if slot.is_self_invalidation_set() {
        if invalidation_type == InvalidationType::InvalidateDescendants
            && position == PositionType::Subject
        {
            return None;
        }
        let mut replacement = InvalidationSet::new_descendant();
        replacement.set_invalidates_self();
        *slot = Arc::new(replacement);
    }

    if Arc::strong_count(slot) > 1 {
        log::trace!("copying shared {invalidation_type:?} set before mutation");
    }
    let set = Arc::make_mut(slot);
    if set.invalidation_type() == invalidation_type {
        return Some(set);
    }

    match invalidation_type {
        InvalidationType::InvalidateDescendants => set.ensure_descendants(),
        InvalidationType::InvalidateSiblings => {
            let descendants = core::mem::replace(set, InvalidationSet::new_sibling(None));
            *set = InvalidationSet::new_sibling(Some(Arc::new(descendants)));
            Some(set)
        }
    }
}

fn merge_map<K: Clone + Eq + Hash>(
    ours: &mut HashMap<K, Arc<InvalidationSet>>,
    theirs: &HashMap<K, Arc<InvalidationSet>>,
) {
    for (key, set) in theirs {
        match ours.entry(key.clone()) {
            Entry::Vacant(entry) => {
                let _ = entry.insert(Arc::clone(set));
            }
            Entry::Occupied(entry) => {
                let position = if set.is_self_invalidation_set() {
                    PositionType::Subject
                } else {
                    PositionType::Ancestor
                };
                if let Some(target) =
                    ensure_mutable_slot(entry.into_mut(), set.invalidation_type(), position)
                {
                    target.combine(set);
                }
            }
        }
    }
}
