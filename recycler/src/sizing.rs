/// Extra slots beyond what fits in the viewport, covering partially visible items at both
/// edges while scrolling.
pub const SLOT_BUFFER: usize = 2;

/// Returns how many recyclable slots a viewport needs.
///
/// This is `ceil(viewport / (min_item + spacing)) + SLOT_BUFFER`, clamped to
/// `total_item_count`. A zero viewport or zero step is degenerate geometry and yields 0
/// (nothing visible).
pub fn slots_needed(
    viewport_extent: u32,
    min_item_extent: u32,
    spacing: u32,
    total_item_count: usize,
) -> usize {
    let step = min_item_extent as u64 + spacing as u64;
    if viewport_extent == 0 || step == 0 || total_item_count == 0 {
        rtrace!(
            viewport_extent,
            min_item_extent,
            spacing,
            "slots_needed: degenerate geometry"
        );
        return 0;
    }
    let fit = (viewport_extent as u64).div_ceil(step);
    let fit = usize::try_from(fit).unwrap_or(usize::MAX);
    fit.saturating_add(SLOT_BUFFER).min(total_item_count)
}

/// Resolves the minimum item extent used for sizing.
///
/// A slot that reports no minimum but stretches to fill the viewport along the axis is as
/// large as the viewport itself.
pub fn effective_min_extent(min_item_extent: u32, fills_viewport: bool, viewport_extent: u32) -> u32 {
    if min_item_extent == 0 && fills_viewport {
        viewport_extent
    } else {
        min_item_extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_buffer_to_ceiling() {
        assert_eq!(slots_needed(120, 50, 0, 100), 5);
        assert_eq!(slots_needed(100, 50, 0, 100), 4);
        // Spacing counts towards the step.
        assert_eq!(slots_needed(100, 45, 5, 100), 4);
    }

    #[test]
    fn clamps_to_item_count() {
        assert_eq!(slots_needed(120, 50, 0, 3), 3);
        assert_eq!(slots_needed(120, 50, 0, 1), 1);
    }

    #[test]
    fn degenerate_geometry_needs_nothing() {
        assert_eq!(slots_needed(0, 50, 0, 10), 0);
        assert_eq!(slots_needed(120, 0, 0, 10), 0);
        assert_eq!(slots_needed(120, 50, 0, 0), 0);
    }

    #[test]
    fn stretched_slots_use_viewport() {
        assert_eq!(effective_min_extent(0, true, 300), 300);
        assert_eq!(effective_min_extent(0, false, 300), 0);
        assert_eq!(effective_min_extent(40, true, 300), 40);
        assert_eq!(slots_needed(300, effective_min_extent(0, true, 300), 0, 10), 3);
    }
}
