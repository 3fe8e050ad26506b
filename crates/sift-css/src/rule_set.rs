//! Rule indexing.
//!
//! Every alternative of every rule is filed under the single most selective
//! feature of its subject (rightmost) compound, so that candidate rules for
//! an element can be fetched by the element's id, classes, attributes and
//! tag name instead of testing every rule.

use std::collections::HashMap;
use std::sync::Arc;

use crate::selector::{MatchType, SelectorRef};
use crate::style_rule::StyleRule;

/// One alternative of a rule, as filed in a bucket.
#[derive(Debug, Clone)]
pub struct RuleData {
    rule: Arc<StyleRule>,
    selector_index: usize,
    position: usize,
}

impl RuleData {
    /// The rule this alternative belongs to.
    #[must_use]
    pub const fn rule(&self) -> &Arc<StyleRule> {
        &self.rule
    }

    /// Flattened index of the alternative within the rule's selector list.
    #[must_use]
    pub const fn selector_index(&self) -> usize {
        self.selector_index
    }

    /// The alternative itself.
    #[must_use]
    pub fn selector(&self) -> Option<SelectorRef<'_>> {
        self.rule.selector_list().get(self.selector_index)
    }

    /// Source order across the whole rule set.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }
}

/// The bucket an alternative is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BucketKey {
    Id(String),
    Class(String),
    Attribute(String),
    Tag(String),
    Universal,
}

/// Rules indexed by their most selective feature.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    id_rules: HashMap<String, Vec<RuleData>>,
    class_rules: HashMap<String, Vec<RuleData>>,
    attribute_rules: HashMap<String, Vec<RuleData>>,
    tag_rules: HashMap<String, Vec<RuleData>>,
    pseudo_rules: Vec<RuleData>,
    universal_rules: Vec<RuleData>,
    rule_count: usize,
}

impl RuleSet {
    /// An empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File every alternative of `rule`. Rules whose selector list is empty
    /// (invalid) are ignored.
    pub fn add_style_rule(&mut self, rule: Arc<StyleRule>) {
        if !rule.selector_list().is_valid() {
            log::debug!("ignoring style rule with an empty selector list");
            return;
        }
        let alternatives: Vec<(usize, BucketKey, bool)> = rule
            .selector_list()
            .iter()
            .map(|selector| {
                let (key, has_pseudo_class) = find_best_bucket(selector);
                (selector.index(), key, has_pseudo_class)
            })
            .collect();

        for (selector_index, key, has_pseudo_class) in alternatives {
            let data = RuleData {
                rule: Arc::clone(&rule),
                selector_index,
                position: self.rule_count,
            };
            self.rule_count += 1;
            log::trace!("filing selector #{selector_index} under {key:?}");
            if has_pseudo_class {
                self.pseudo_rules.push(data.clone());
            }
            match key {
                BucketKey::Id(id) => self.id_rules.entry(id).or_default().push(data),
                BucketKey::Class(class) => self.class_rules.entry(class).or_default().push(data),
                BucketKey::Attribute(name) => {
                    self.attribute_rules.entry(name).or_default().push(data);
                }
                BucketKey::Tag(tag) => self.tag_rules.entry(tag).or_default().push(data),
                BucketKey::Universal => self.universal_rules.push(data),
            }
        }
    }

    /// Rules keyed by id.
    #[must_use]
    pub fn id_rules(&self, id: &str) -> &[RuleData] {
        self.id_rules.get(id).map_or(&[], Vec::as_slice)
    }

    /// Rules keyed by class name.
    #[must_use]
    pub fn class_rules(&self, class_name: &str) -> &[RuleData] {
        self.class_rules.get(class_name).map_or(&[], Vec::as_slice)
    }

    /// Rules keyed by attribute name.
    #[must_use]
    pub fn attribute_rules(&self, name: &str) -> &[RuleData] {
        self.attribute_rules.get(name).map_or(&[], Vec::as_slice)
    }

    /// Rules keyed by (lowercase) tag name.
    #[must_use]
    pub fn tag_rules(&self, tag_name: &str) -> &[RuleData] {
        self.tag_rules.get(tag_name).map_or(&[], Vec::as_slice)
    }

    /// Rules whose subject compound has a pseudo-class in any position, in
    /// addition to their own bucket.
    #[must_use]
    pub fn pseudo_rules(&self) -> &[RuleData] {
        &self.pseudo_rules
    }

    /// Rules with no id, class, attribute or type selector in their subject.
    #[must_use]
    pub fn universal_rules(&self) -> &[RuleData] {
        &self.universal_rules
    }

    /// Number of alternatives filed so far.
    #[must_use]
    pub const fn rule_count(&self) -> usize {
        self.rule_count
    }
}

/// Scan the subject compound for its most selective feature, in priority
/// id > class > attribute > tag > universal. Within one priority the last
/// feature seen wins.
///
/// The returned flag is set when a pseudo-class appears anywhere in the
/// subject compound, not only as its rightmost simple selector, so
/// `:hover.a` lands in the pseudo bucket just like `.a:hover`.
fn find_best_bucket(selector: SelectorRef<'_>) -> (BucketKey, bool) {
    let mut id = None;
    let mut class_name = None;
    let mut attribute = None;
    let mut tag = None;
    let mut has_pseudo_class = false;

    for simple in selector.compound() {
        let simple = simple.selector();
        match simple.match_type() {
            MatchType::Id => id = Some(simple.value()),
            MatchType::Class => class_name = Some(simple.value()),
            MatchType::Tag if !simple.is_universal() => tag = Some(simple.value()),
            MatchType::PseudoClass => has_pseudo_class = true,
            match_type if match_type.is_attribute() => attribute = simple.attribute_name(),
            _ => {}
        }
    }

    let key = if let Some(id) = id {
        BucketKey::Id(id.to_owned())
    } else if let Some(class_name) = class_name {
        BucketKey::Class(class_name.to_owned())
    } else if let Some(attribute) = attribute {
        BucketKey::Attribute(attribute.to_owned())
    } else if let Some(tag) = tag {
        BucketKey::Tag(tag.to_owned())
    } else {
        BucketKey::Universal
    };
    (key, has_pseudo_class)
}
