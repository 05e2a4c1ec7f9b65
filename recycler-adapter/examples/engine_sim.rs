// Example: drive an engine with simulated host events and dwell-gated updates.
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use recycler::{Axis, DimensionMode, ViewportSize};
use recycler_adapter::{
    CancellationToken, DataProvider, DeferredOptions, Engine, EngineOptions, HostOffset, Slot,
    SlotResolver,
};

#[derive(Debug, Default)]
struct Row {
    text: String,
    detail: Option<String>,
    active: bool,
    y: u64,
    selected: bool,
}

impl Slot for Row {
    fn extent(&self, _axis: Axis) -> u32 {
        40
    }

    fn min_extent(&self, _axis: Axis) -> u32 {
        40
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn set_position(&mut self, _axis: Axis, position: u64) {
        self.y = position;
    }

    fn bind_selection_visual(&mut self, selected: bool) {
        self.selected = selected;
    }
}

struct Contacts {
    names: Vec<String>,
    selected: Vec<bool>,
}

impl DataProvider for Contacts {
    type Slot = Row;

    fn item_count(&self) -> usize {
        self.names.len()
    }

    fn bind_item(&mut self, index: usize, slot: &mut Row) {
        slot.text.clone_from(&self.names[index]);
        slot.detail = None;
    }

    fn is_selected(&self, index: usize) -> bool {
        self.selected[index]
    }

    fn set_selected(&mut self, index: usize, selected: bool) {
        self.selected[index] = selected;
    }

    fn on_item_activated(&mut self, index: usize, slot: &mut Row) {
        println!("clicked {index}: {}", slot.text);
    }

    fn run_deferred_update(
        &mut self,
        index: usize,
        slots: SlotResolver<Row>,
        cancel: CancellationToken,
    ) -> LocalBoxFuture<'static, ()> {
        async move {
            if cancel.is_cancelled() {
                return;
            }
            if let Some(slot) = slots.resolve(index) {
                slot.borrow_mut().detail = Some(format!("details for #{index}"));
            }
        }
        .boxed_local()
    }
}

fn main() {
    let provider = Contacts {
        names: (0..500).map(|i| format!("contact {i}")).collect(),
        selected: vec![false; 500],
    };
    let options = EngineOptions::new(Axis::Vertical)
        .with_dimension_mode(DimensionMode::Fixed)
        .with_spacing(2)
        .with_deferred(DeferredOptions::enabled(300));
    let mut engine = Engine::new(provider, options, Row::default);

    engine.notify_viewport_resized(ViewportSize::new(320, 200));
    engine.initialize(500, true);
    println!(
        "content={} slots={} window={:?}",
        engine.content_extent(),
        engine.slots_needed(),
        engine.window().bounds()
    );

    // A fling: frames every 16ms, scroll offset advancing 90px per frame.
    let mut now_ms = 0;
    for frame in 0..20u64 {
        now_ms = frame * 16;
        engine.tick(now_ms);
        engine.notify_scroll_offset(HostOffset::Pixels(frame * 90));
    }
    println!("after fling: window={:?}", engine.window().bounds());

    // Rest long enough for the visible rows to load details.
    for _ in 0..30 {
        now_ms += 16;
        engine.tick(now_ms);
    }
    for &index in engine.bound_indexes() {
        if let Some(slot) = engine.slot_for(index) {
            let row = slot.borrow();
            println!("y={:>6} {} {:?}", row.y, row.text, row.detail);
        }
    }

    if let Some(id) = engine.bound_indexes().first().and_then(|&i| engine.slot_id_for(i)) {
        engine.activate_slot(id);
    }
    engine.teardown();
}
