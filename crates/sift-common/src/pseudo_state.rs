//! Dynamic element state shared by the tree and the matcher.

use bitflags::bitflags;

bitflags! {
    /// Dynamic state of an element as seen by selector matching.
    ///
    /// The interactive bits (`HOVER`, `ACTIVE`, `FOCUS`, ...) back the
    /// corresponding pseudo-classes. The pseudo-element bits mark an element
    /// that stands in for a pseudo-element of its owner (the node a
    /// `::placeholder` or `::selection` rule styles).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PseudoState: u32 {
        /// `:hover`
        const HOVER = 1 << 0;
        /// `:active`
        const ACTIVE = 1 << 1;
        /// `:focus`
        const FOCUS = 1 << 2;
        /// `:checked`
        const CHECKED = 1 << 3;
        /// `:disabled` (`:enabled` is its absence)
        const DISABLED = 1 << 4;
        /// `:default`
        const DEFAULT = 1 << 5;
        /// The element renders its owner's `::placeholder`.
        const PLACEHOLDER = 1 << 8;
        /// The element renders its owner's `::selection`.
        const SELECTION = 1 << 9;
        /// The element renders its owner's `::before`.
        const BEFORE = 1 << 10;
        /// The element renders its owner's `::after`.
        const AFTER = 1 << 11;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_element_bits_are_separate_from_interaction() {
        let interaction = PseudoState::HOVER
            | PseudoState::ACTIVE
            | PseudoState::FOCUS
            | PseudoState::CHECKED
            | PseudoState::DISABLED
            | PseudoState::DEFAULT;
        let pseudo_elements = PseudoState::PLACEHOLDER
            | PseudoState::SELECTION
            | PseudoState::BEFORE
            | PseudoState::AFTER;
        assert!(!interaction.intersects(pseudo_elements));
        assert_eq!(interaction | pseudo_elements, PseudoState::all());
        assert!(PseudoState::default().is_empty());
    }
}
