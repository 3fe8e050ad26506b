//! The element capabilities selector matching and invalidation need.
//!
//! The matcher never sees a concrete tree. Anything that can answer these
//! queries (the [`sift_dom`] arena tree, a host's own node type, a test
//! double) can be matched against.

use core::fmt::Debug;

use sift_common::PseudoState;
use sift_dom::ElementRef;

/// A handle to one element of a host tree.
///
/// Handles are cheap to clone; navigation returns new handles.
pub trait Element: Clone + Debug {
    /// The tag name as stored by the tree. Compared ASCII case-insensitively.
    fn tag_name(&self) -> &str;

    /// The `id` attribute.
    fn id(&self) -> Option<&str>;

    /// Whether `name` is one of the element's classes.
    fn has_class(&self, name: &str) -> bool;

    /// Call `callback` once per class name.
    fn each_class(&self, callback: &mut dyn FnMut(&str));

    /// The value of attribute `name` (lowercase).
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Dynamic state and pseudo-element kind.
    fn pseudo_state(&self) -> PseudoState;

    /// Parent element.
    fn parent_element(&self) -> Option<Self>;

    /// Closest preceding sibling element.
    fn prev_sibling_element(&self) -> Option<Self>;

    /// Closest following sibling element.
    fn next_sibling_element(&self) -> Option<Self>;

    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    fn is_empty(&self) -> bool;

    /// For a pseudo-element node, the element it belongs to.
    fn pseudo_element_owner(&self) -> Option<Self>;

    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    fn is_root(&self) -> bool {
        self.parent_element().is_none()
    }
}

impl Element for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        &self.data().tag_name
    }

    fn id(&self) -> Option<&str> {
        self.data().id()
    }

    fn has_class(&self, name: &str) -> bool {
        self.data().has_class(name)
    }

    fn each_class(&self, callback: &mut dyn FnMut(&str)) {
        self.data().classes().for_each(callback);
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.data().attrs.get(name).map(String::as_str)
    }

    fn pseudo_state(&self) -> PseudoState {
        self.data().pseudo_state
    }

    fn parent_element(&self) -> Option<Self> {
        ElementRef::parent_element(self)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        ElementRef::prev_sibling_element(self)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        ElementRef::next_sibling_element(self)
    }

    fn is_empty(&self) -> bool {
        ElementRef::is_empty(self)
    }

    fn pseudo_element_owner(&self) -> Option<Self> {
        ElementRef::pseudo_element_owner(self)
    }
}
