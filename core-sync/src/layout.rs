//! Legacy placement hints
//!
//! The presentation collaborator expects fixed pixel offsets per recency
//! rank. Placement is policy of the response boundary, not of the sync
//! pipeline, so the formulas live here and are applied only while building
//! the wire response.

use crate::response::SizeClass;

/// Placement hints for one recency rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutHints {
    pub position: u32,
    pub x: u32,
    pub y: u32,
    pub size: SizeClass,
}

/// Fixed legacy formula: ranks slot in after the three reserved local cards.
pub fn layout_for_rank(rank: usize) -> LayoutHints {
    let rank = rank as u32;
    LayoutHints {
        position: 4 + rank,
        x: 300 + rank * 100,
        y: 200 + rank * 50,
        size: SizeClass::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_formulas() {
        let first = layout_for_rank(0);
        assert_eq!(first.position, 4);
        assert_eq!(first.x, 300);
        assert_eq!(first.y, 200);
        assert_eq!(first.size, SizeClass::Medium);

        let second = layout_for_rank(1);
        assert_eq!(second.position, 5);
        assert_eq!(second.x, 400);
        assert_eq!(second.y, 250);
    }
}
