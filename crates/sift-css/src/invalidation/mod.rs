//! Style invalidation.
//!
//! Rules are analyzed once, when added, into [`RuleInvalidationSet`]. When a
//! class, id, attribute or pseudo-class state changes on an element, the
//! sets collected for that feature say which elements around it need their
//! style recomputed, without matching any selector.

pub mod invalidation_set;
pub mod rule_invalidation_set;

pub use invalidation_set::{Backing, DIRECT_ADJACENT_MAX, InvalidationSet, InvalidationType};
pub use rule_invalidation_set::{InvalidationLists, RuleInvalidationSet};
