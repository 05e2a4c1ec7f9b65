// Example: variable item extents, appending, and spacing.
use recycler::{DimensionMode, LayoutOrder, LayoutTable, WindowRequest, WindowResolver, slots_needed};

fn extent(i: usize) -> u32 {
    20 + (i as u32 * 7) % 40
}

fn main() {
    let mut table = LayoutTable::new(4);
    table.rebuild(100, DimensionMode::Variable, extent);
    println!("100 items: total={}", table.total());

    // Appending only measures the new items.
    table.extend(150, DimensionMode::Variable, extent);
    println!("150 items: total={}", table.total());

    let slots = slots_needed(200, 20, 4, table.len());
    let mut resolver = WindowResolver::new();
    let mut offset = 0u64;
    while offset < table.total() {
        let res = resolver.resolve(
            &table,
            WindowRequest::new(offset, 200, LayoutOrder::Forward, slots),
            None,
        );
        if res.changed {
            println!("offset={offset:>5} window={:?}", res.window.bounds());
        }
        offset += 333;
    }
}
