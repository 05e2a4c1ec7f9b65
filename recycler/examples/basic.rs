// Example: size a pool and resolve windows while scrolling.
use recycler::{
    DimensionMode, LayoutOrder, LayoutTable, WindowRequest, WindowResolver, slots_needed,
};

fn main() {
    let mut table = LayoutTable::new(0);
    table.rebuild(10_000, DimensionMode::Fixed, |_| 50);

    let slots = slots_needed(120, 50, 0, table.len());
    println!("total={} slots={slots}", table.total());

    let mut resolver = WindowResolver::new();
    for offset in [0u64, 250, 123_456, 0] {
        let res = resolver.resolve(
            &table,
            WindowRequest::new(offset, 120, LayoutOrder::Forward, slots),
            None,
        );
        println!(
            "offset={offset} window={:?} changed={}",
            res.window.bounds(),
            res.changed
        );
    }

    let res = resolver.resolve(
        &table,
        WindowRequest::new(0, 120, LayoutOrder::Reverse, slots),
        None,
    );
    let screen: Vec<usize> = res.window.iter_in(LayoutOrder::Reverse).collect();
    println!("reverse at 0: {screen:?}");
}
