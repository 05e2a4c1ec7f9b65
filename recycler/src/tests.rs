use crate::*;

use alloc::vec::Vec;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }
}

fn table(extents: &[u32], spacing: u32) -> LayoutTable {
    let mut t = LayoutTable::new(spacing);
    t.rebuild(extents.len(), DimensionMode::Variable, |i| extents[i]);
    t
}

fn uniform_table(count: usize, extent: u32, spacing: u32) -> LayoutTable {
    let mut t = LayoutTable::new(spacing);
    t.rebuild(count, DimensionMode::Fixed, |_| extent);
    t
}

fn resolve(
    r: &mut WindowResolver,
    t: &LayoutTable,
    order: LayoutOrder,
    offset: u64,
    viewport: u32,
    slots: usize,
) -> Resolution {
    r.resolve(t, WindowRequest::new(offset, viewport, order, slots), None)
}

/// Indexes whose placed extent intersects `[offset, offset + viewport)`.
fn expected_visible(t: &LayoutTable, order: LayoutOrder, offset: u64, viewport: u32) -> Vec<usize> {
    let end = offset + viewport as u64;
    let mut out: Vec<usize> = (0..t.len())
        .filter(|&i| {
            let start = t.placement(order, i);
            let item_end = start + t.extent_of(i) as u64;
            start < end && item_end > offset
        })
        .collect();
    out.sort_unstable();
    out
}

#[test]
fn fixed_list_scrolls_and_restores_window() {
    let t = uniform_table(10, 50, 0);
    let slots = slots_needed(120, 50, 0, 10);
    assert_eq!(slots, 5);

    let mut r = WindowResolver::new();
    let res = resolve(&mut r, &t, LayoutOrder::Forward, 0, 120, slots);
    assert!(res.changed);
    assert_eq!(res.window.bounds(), Some((0, 4)));

    let res = resolve(&mut r, &t, LayoutOrder::Forward, 250, 120, slots);
    assert!(res.changed);
    assert_eq!(res.window.bounds(), Some((4, 9)));

    let res = resolve(&mut r, &t, LayoutOrder::Forward, 0, 120, slots);
    assert!(res.changed);
    assert_eq!(res.window.bounds(), Some((0, 4)));
}

#[test]
fn unchanged_window_is_not_reported_unless_forced() {
    let t = uniform_table(10, 50, 0);
    let mut r = WindowResolver::new();
    assert!(resolve(&mut r, &t, LayoutOrder::Forward, 0, 120, 5).changed);
    // Scrolling within the first item keeps the same bounds.
    assert!(!resolve(&mut r, &t, LayoutOrder::Forward, 10, 120, 5).changed);

    let forced = r.resolve(
        &t,
        WindowRequest::new(10, 120, LayoutOrder::Forward, 5).with_force(true),
        None,
    );
    assert!(forced.changed);
    assert_eq!(forced.window.bounds(), Some((0, 4)));
}

#[test]
fn single_item_window_ignores_offset() {
    let t = uniform_table(1, 40, 6);
    assert_eq!(t.positions(), &[0]);
    let slots = slots_needed(100, 40, 6, 1);
    assert_eq!(slots, 1);

    let mut r = WindowResolver::new();
    for offset in [0u64, 5, 39, 1_000] {
        for order in [LayoutOrder::Forward, LayoutOrder::Reverse] {
            let res = resolve(&mut r, &t, order, offset, 100, slots);
            assert_eq!(res.window.bounds(), Some((0, 0)));
        }
    }
}

#[test]
fn empty_and_degenerate_inputs_yield_empty_window() {
    let mut r = WindowResolver::new();

    let empty = uniform_table(0, 10, 0);
    let res = resolve(&mut r, &empty, LayoutOrder::Forward, 0, 100, 0);
    assert!(res.window.is_empty());
    assert_eq!(res.window.as_signed(), (-1, -1));

    let t = uniform_table(10, 10, 0);
    assert!(resolve(&mut r, &t, LayoutOrder::Forward, 0, 0, 5).window.is_empty());
    assert!(resolve(&mut r, &t, LayoutOrder::Forward, 0, 30, 0).window.is_empty());

    let collapsed = uniform_table(10, 0, 0);
    assert!(resolve(&mut r, &collapsed, LayoutOrder::Forward, 0, 30, 5).window.is_empty());
}

#[test]
fn going_empty_is_a_change() {
    let t = uniform_table(10, 50, 0);
    let mut r = WindowResolver::new();
    assert!(resolve(&mut r, &t, LayoutOrder::Forward, 0, 120, 5).changed);
    let res = resolve(&mut r, &t, LayoutOrder::Forward, 0, 0, 5);
    assert!(res.changed);
    assert!(res.window.is_empty());
    assert!(!resolve(&mut r, &t, LayoutOrder::Forward, 0, 0, 5).changed);
}

#[test]
fn all_items_fitting_take_the_whole_list() {
    let t = uniform_table(4, 10, 0);
    let slots = slots_needed(100, 10, 0, 4);
    assert_eq!(slots, 4);
    let mut r = WindowResolver::new();
    let res = resolve(&mut r, &t, LayoutOrder::Forward, 0, 100, slots);
    assert_eq!(res.window.bounds(), Some((0, 3)));
    let res = resolve(&mut r, &t, LayoutOrder::Reverse, 0, 100, slots);
    assert_eq!(res.window.bounds(), Some((0, 3)));
}

#[test]
fn offsets_past_the_end_clamp_to_the_last_page() {
    let t = uniform_table(10, 50, 0);
    let mut r = WindowResolver::new();
    let at_max = resolve(&mut r, &t, LayoutOrder::Forward, 380, 120, 5).window;
    let past = resolve(&mut WindowResolver::new(), &t, LayoutOrder::Forward, 9_999, 120, 5).window;
    assert_eq!(at_max, past);
    assert_eq!(past.last(), Some(9));
}

#[test]
fn reverse_fixed_list_mirrors_forward() {
    let t = uniform_table(10, 50, 0);
    let mut r = WindowResolver::new();
    let res = resolve(&mut r, &t, LayoutOrder::Reverse, 0, 120, 5);
    assert_eq!(res.window.bounds(), Some((5, 9)));
    let screen: Vec<usize> = res.window.iter_in(LayoutOrder::Reverse).collect();
    assert_eq!(screen, [9, 8, 7, 6, 5]);

    let res = resolve(&mut r, &t, LayoutOrder::Reverse, 250, 120, 5);
    assert_eq!(res.window.bounds(), Some((0, 5)));
}

#[test]
fn table_positions_are_monotonic() {
    let mut rng = Lcg::new(7);
    for _ in 0..50 {
        let n = rng.gen_range_usize(0, 200);
        let spacing = rng.gen_range_u32(0, 6);
        let extents: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(0, 40)).collect();
        let t = table(&extents, spacing);

        let positions = t.positions();
        for w in positions.windows(2) {
            assert!(w[0] <= w[1]);
        }
        if n > 0 {
            assert_eq!(positions[0], 0);
            assert_eq!(t.total(), positions[n - 1] + extents[n - 1] as u64);
        } else {
            assert_eq!(t.total(), 0);
        }
    }
}

#[test]
fn extend_keeps_existing_positions() {
    let mut rng = Lcg::new(11);
    for _ in 0..50 {
        let n = rng.gen_range_usize(1, 100);
        let more = rng.gen_range_usize(0, 50);
        let spacing = rng.gen_range_u32(0, 6);
        let extents: Vec<u32> = (0..n + more).map(|_| rng.gen_range_u32(1, 40)).collect();

        let mut t = LayoutTable::new(spacing);
        t.rebuild(n, DimensionMode::Variable, |i| extents[i]);
        let before: Vec<u64> = t.positions().to_vec();

        t.extend(n + more, DimensionMode::Variable, |i| extents[i]);
        assert_eq!(&t.positions()[..n], &before[..]);

        let full = table(&extents, spacing);
        assert_eq!(t.positions(), full.positions());
        assert_eq!(t.total(), full.total());
    }
}

#[test]
fn bound_slots_cover_the_viewport() {
    let mut rng = Lcg::new(42);
    for _ in 0..40 {
        let n = rng.gen_range_usize(1, 120);
        let spacing = rng.gen_range_u32(0, 5);
        let min_extent = rng.gen_range_u32(1, 20);
        let extents: Vec<u32> = (0..n)
            .map(|_| rng.gen_range_u32(min_extent, min_extent + 30))
            .collect();
        let viewport = rng.gen_range_u32(1, 300);
        let order = if rng.gen_range_u32(0, 2) == 0 {
            LayoutOrder::Forward
        } else {
            LayoutOrder::Reverse
        };
        let t = table(&extents, spacing);
        let slots = slots_needed(viewport, min_extent, spacing, n);
        let max_offset = t.total().saturating_sub(viewport as u64);

        let mut r = WindowResolver::new();
        let mut offsets: Vec<u64> = (0..30).map(|_| rng.gen_range_u64(0, max_offset + 1)).collect();
        offsets.push(0);
        offsets.push(max_offset);

        for offset in offsets {
            let window = resolve(&mut r, &t, order, offset, viewport, slots).window;
            // Resolution does not depend on where the previous window was.
            let fresh = resolve(&mut WindowResolver::new(), &t, order, offset, viewport, slots).window;
            assert_eq!(window, fresh);

            // Only the first `slots` indexes in screen order get a slot.
            let bound: Vec<usize> = window.iter_in(order).take(slots).collect();
            assert!(!bound.is_empty());
            assert!(t.placement(order, bound[0]) <= offset);
            for i in expected_visible(&t, order, offset, viewport) {
                assert!(
                    bound.contains(&i),
                    "index {i} visible but unbound (offset={offset}, window={window:?})"
                );
            }

            // Bound items are contiguous in screen order.
            for w in bound.windows(2) {
                let a = t.placement(order, w[0]);
                let b = t.placement(order, w[1]);
                assert!(a <= b);
            }
        }
    }
}

#[test]
fn reverse_is_the_complement_of_forward_over_reversed_extents() {
    let mut rng = Lcg::new(99);
    for _ in 0..40 {
        let n = rng.gen_range_usize(1, 80);
        let spacing = rng.gen_range_u32(0, 5);
        let extents: Vec<u32> = (0..n).map(|_| rng.gen_range_u32(5, 40)).collect();
        let reversed: Vec<u32> = extents.iter().rev().copied().collect();
        let viewport = rng.gen_range_u32(1, 200);
        let slots = slots_needed(viewport, 5, spacing, n);

        let t = table(&extents, spacing);
        let t_rev = table(&reversed, spacing);
        assert_eq!(t.total(), t_rev.total());

        let mut rev = WindowResolver::new();
        let mut fwd = WindowResolver::new();
        for _ in 0..20 {
            let offset = rng.gen_range_u64(0, t.total() + 1);
            let a = resolve(&mut rev, &t, LayoutOrder::Reverse, offset, viewport, slots).window;
            let b = resolve(&mut fwd, &t_rev, LayoutOrder::Forward, offset, viewport, slots).window;
            assert_eq!(a, b.complement(n));
        }
    }
}

#[test]
fn reverse_uniform_window_is_the_complement_of_forward() {
    let t = uniform_table(37, 12, 3);
    let slots = slots_needed(100, 12, 3, 37);
    let mut rev = WindowResolver::new();
    let mut fwd = WindowResolver::new();
    let max_offset = t.total() - 100;
    for offset in (0..=max_offset).step_by(7) {
        let a = resolve(&mut rev, &t, LayoutOrder::Reverse, offset, 100, slots).window;
        let b = resolve(&mut fwd, &t, LayoutOrder::Forward, offset, 100, slots).window;
        assert_eq!(a, b.complement(37));
    }
}

#[test]
fn reverse_shows_forward_items_at_mirrored_offset() {
    let extents = [10u32, 35, 20, 5, 50, 15, 25];
    let t = table(&extents, 2);
    let viewport = 40u32;
    let max_offset = t.total() - viewport as u64;
    for offset in 0..=max_offset {
        let mirrored = t.total() - offset - viewport as u64;
        assert_eq!(
            expected_visible(&t, LayoutOrder::Reverse, offset, viewport),
            expected_visible(&t, LayoutOrder::Forward, mirrored, viewport),
        );
    }
}

#[test]
fn visible_items_are_inside_the_window() {
    let extents = [10u32, 35, 20, 5, 50, 15, 25, 8, 12, 40];
    let t = table(&extents, 1);
    let viewport = 45u32;
    let slots = slots_needed(viewport, 5, 1, extents.len());
    let max_offset = t.total() - viewport as u64;
    for order in [LayoutOrder::Forward, LayoutOrder::Reverse] {
        let mut r = WindowResolver::new();
        for offset in 0..=max_offset {
            let window = resolve(&mut r, &t, order, offset, viewport, slots).window;
            for i in expected_visible(&t, order, offset, viewport) {
                assert!(window.contains(i), "index {i} missing at offset {offset}");
            }
        }
    }
}

#[test]
fn lazy_extent_is_consulted_for_the_final_item() {
    let t = uniform_table(10, 50, 0);
    let mut calls = Vec::new();
    let mut measure = |i: usize| {
        calls.push(i);
        50
    };
    let mut r = WindowResolver::new();
    let res = r.resolve(
        &t,
        WindowRequest::new(380, 120, LayoutOrder::Forward, 5),
        Some(&mut measure),
    );
    assert_eq!(res.window.last(), Some(9));
    assert_eq!(calls, [9]);

    calls.clear();
    let mut measure = |i: usize| {
        calls.push(i);
        50
    };
    let mut r = WindowResolver::new();
    r.resolve(
        &t,
        WindowRequest::new(380, 120, LayoutOrder::Reverse, 5),
        Some(&mut measure),
    );
    // In reverse the final rank is index 0.
    assert_eq!(calls, [0]);
}

#[test]
fn switching_order_rescans_from_the_start() {
    let t = uniform_table(50, 10, 0);
    let slots = slots_needed(30, 10, 0, 50);
    let mut r = WindowResolver::new();
    resolve(&mut r, &t, LayoutOrder::Forward, 300, 30, slots);
    let switched = resolve(&mut r, &t, LayoutOrder::Reverse, 300, 30, slots).window;
    let fresh = resolve(&mut WindowResolver::new(), &t, LayoutOrder::Reverse, 300, 30, slots).window;
    assert_eq!(switched, fresh);
}

#[test]
fn window_iterates_in_screen_order() {
    let w = ViewportWindow::new(3, 6);
    assert_eq!(w.len(), 4);
    assert!(w.contains(3) && w.contains(6) && !w.contains(7));
    let fwd: Vec<usize> = w.iter_in(LayoutOrder::Forward).collect();
    let rev: Vec<usize> = w.iter_in(LayoutOrder::Reverse).collect();
    assert_eq!(fwd, [3, 4, 5, 6]);
    assert_eq!(rev, [6, 5, 4, 3]);
    assert_eq!(ViewportWindow::EMPTY.iter_in(LayoutOrder::Reverse).count(), 0);
    assert_eq!(w.complement(10).bounds(), Some((3, 6)));
    assert_eq!(ViewportWindow::new(0, 0).iter_in(LayoutOrder::Reverse).count(), 1);
}
