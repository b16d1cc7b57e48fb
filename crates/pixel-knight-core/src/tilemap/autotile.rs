use glam::IVec2;

const RIGHT: u8 = 1;
const LEFT: u8 = 1 << 1;
const UP: u8 = 1 << 2;
const DOWN: u8 = 1 << 3;

/// Variant for each neighbour mask; corners and edges of a tile blob
const AUTOTILE_MAP: [(u8, u32); 9] = [
    (RIGHT | DOWN, 0),
    (RIGHT | DOWN | LEFT, 1),
    (LEFT | DOWN, 2),
    (LEFT | UP | DOWN, 3),
    (LEFT | UP, 4),
    (LEFT | UP | RIGHT, 5),
    (RIGHT | UP, 6),
    (RIGHT | UP | DOWN, 7),
    (RIGHT | LEFT | UP | DOWN, 8),
];

/// Pick a variant from which of the four neighbours are the same kind.
///
/// Returns `None` for masks without an entry (lone tiles, thin strips), in
/// which case the tile keeps its current variant.
pub fn autotile_variant(same_kind: impl Fn(IVec2) -> bool) -> Option<u32> {
    let mut mask = 0;
    for (offset, bit) in [
        (IVec2::X, RIGHT),
        (IVec2::NEG_X, LEFT),
        (IVec2::NEG_Y, UP),
        (IVec2::Y, DOWN),
    ] {
        if same_kind(offset) {
            mask |= bit;
        }
    }
    AUTOTILE_MAP
        .iter()
        .find(|(m, _)| *m == mask)
        .map(|(_, variant)| *variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant_for(neighbours: &[IVec2]) -> Option<u32> {
        autotile_variant(|offset| neighbours.contains(&offset))
    }

    #[test]
    fn test_corners() {
        assert_eq!(variant_for(&[IVec2::X, IVec2::Y]), Some(0));
        assert_eq!(variant_for(&[IVec2::NEG_X, IVec2::Y]), Some(2));
        assert_eq!(variant_for(&[IVec2::NEG_X, IVec2::NEG_Y]), Some(4));
        assert_eq!(variant_for(&[IVec2::X, IVec2::NEG_Y]), Some(6));
    }

    #[test]
    fn test_fully_surrounded() {
        let all = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];
        assert_eq!(variant_for(&all), Some(8));
    }

    #[test]
    fn test_unmapped_masks() {
        assert_eq!(variant_for(&[]), None);
        assert_eq!(variant_for(&[IVec2::X, IVec2::NEG_X]), None);
    }
}
