use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use recycler::{
    Axis, DimensionMode, LayoutOrder, LayoutTable, ViewportSize, ViewportWindow, WindowRequest,
    WindowResolver, effective_min_extent, slots_needed,
};

use crate::{
    DataProvider, DeferredScheduler, DeferredState, EngineOptions, HostOffset, ScrollBridge, Slot,
    SlotId, SlotPool, SlotRef,
};

/// A framework-neutral recycling list.
///
/// The engine owns the slot pool, the layout table and the deferred-update executor. It holds
/// no UI objects beyond the slots its factory creates. Hosts drive it by calling:
/// - `notify_viewport_resized` / `notify_scroll_offset` when UI events occur
/// - `initialize` whenever the data set changes
/// - `tick(now_ms)` each frame or timer tick (for lazy pool trimming and dwell-gated updates)
///
/// Everything except deferred updates happens synchronously inside these calls. Deferred
/// updates only make progress inside `tick` and `run_until_stalled`.
pub struct Engine<P: DataProvider> {
    provider: P,
    options: EngineOptions,
    table: LayoutTable,
    resolver: WindowResolver,
    pool: SlotPool<P::Slot>,
    measure_slot: Option<P::Slot>,
    scheduler: DeferredScheduler,
    executor: LocalPool,
    bridge: ScrollBridge,
    viewport: ViewportSize,
    offset: u64,
    item_count: usize,
    slots_needed: usize,
    bound: Vec<usize>,
    due: Vec<usize>,
    now_ms: u64,
    initialized: bool,
    torn_down: bool,
}

impl<P: DataProvider> Engine<P> {
    pub fn new(
        provider: P,
        options: EngineOptions,
        slot_factory: impl FnMut() -> P::Slot + 'static,
    ) -> Self {
        Self {
            provider,
            table: LayoutTable::new(options.layout.spacing),
            resolver: WindowResolver::new(),
            pool: SlotPool::new(slot_factory),
            measure_slot: None,
            scheduler: DeferredScheduler::new(options.deferred.dwell_ms),
            executor: LocalPool::new(),
            bridge: ScrollBridge::new(options.normalized_origin),
            viewport: ViewportSize::default(),
            offset: 0,
            item_count: 0,
            slots_needed: 0,
            bound: Vec::new(),
            due: Vec::new(),
            now_ms: 0,
            initialized: false,
            torn_down: false,
            options,
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn pool(&self) -> &SlotPool<P::Slot> {
        &self.pool
    }

    pub fn table(&self) -> &LayoutTable {
        &self.table
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Total content extent along the scroll axis, for sizing the host's scroll content.
    pub fn content_extent(&self) -> u64 {
        self.table.total()
    }

    /// Current scroll offset in content space.
    pub fn scroll_offset(&self) -> u64 {
        self.offset
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn window(&self) -> ViewportWindow {
        self.resolver.window()
    }

    pub fn slots_needed(&self) -> usize {
        self.slots_needed
    }

    /// Indexes that currently have a slot, in screen order.
    pub fn bound_indexes(&self) -> &[usize] {
        &self.bound
    }

    pub fn slot_id_for(&self, index: usize) -> Option<SlotId> {
        self.pool.bound_id(index)
    }

    pub fn slot_for(&self, index: usize) -> Option<SlotRef<P::Slot>> {
        self.pool.bound_slot(index)
    }

    /// Start offset of `index` under the current layout order.
    pub fn placement_of(&self, index: usize) -> u64 {
        ScrollBridge::placement_of(&self.table, self.options.layout.order, index)
    }

    pub fn is_outside_window(&self, index: usize) -> bool {
        ScrollBridge::is_outside_window(self.resolver.window(), index)
    }

    pub fn deferred_state(&self, index: usize) -> DeferredState {
        self.scheduler.state(index)
    }

    /// Loads `item_count` items and presents the window at the current offset.
    ///
    /// With `recalculate_layout == false` the layout is extended for appended items only;
    /// a smaller count still rebuilds it.
    pub fn initialize(&mut self, item_count: usize, recalculate_layout: bool) {
        debug_assert_eq!(
            item_count,
            self.provider.item_count(),
            "Engine::initialize: count does not match the provider"
        );
        rdebug!(item_count, recalculate_layout, "Engine::initialize");
        self.initialized = true;
        self.torn_down = false;
        self.scheduler.cancel_all();
        self.pool.release_all();
        self.bound.clear();
        self.item_count = item_count;
        self.relayout(recalculate_layout);
    }

    /// Applies a host scroll event. Returns whether the window changed.
    pub fn notify_scroll_offset(&mut self, offset: HostOffset) -> bool {
        if !self.initialized {
            return false;
        }
        let Some(axis) = self.options.layout.axis else {
            return false;
        };
        self.offset =
            self.bridge
                .content_offset(offset, self.table.total(), self.viewport.extent(axis));
        self.refresh(false)
    }

    /// Applies a viewport size change. Variable-dimension lists are re-measured.
    pub fn notify_viewport_resized(&mut self, size: ViewportSize) {
        if size == self.viewport {
            return;
        }
        rdebug!(width = size.width, height = size.height, "Engine: viewport resized");
        self.viewport = size;
        if self.initialized {
            let remeasure = self.options.layout.dimension_mode == DimensionMode::Variable;
            self.relayout(remeasure);
        }
    }

    pub fn set_layout_order(&mut self, order: LayoutOrder) {
        if self.options.layout.order == order {
            return;
        }
        self.options.layout.order = order;
        if self.initialized {
            self.resolver.reset();
            self.refresh(true);
        }
    }

    /// Changes the scroll axis. The scroll offset returns to the content start.
    pub fn set_axis(&mut self, axis: Option<Axis>) {
        if self.options.layout.axis == axis {
            return;
        }
        self.options.layout.axis = axis;
        self.offset = 0;
        if self.initialized {
            self.relayout(true);
        }
    }

    /// Turns dwell-gated updates on or off. Disabling cancels everything in flight.
    pub fn set_deferred_enabled(&mut self, enabled: bool) {
        self.options.deferred.enabled = enabled;
        if !enabled {
            self.scheduler.cancel_all();
        } else if self.initialized {
            for &index in &self.bound {
                self.scheduler.arm(index, self.now_ms);
            }
        }
    }

    /// Advances the engine clock.
    ///
    /// Trims surplus slots, starts deferred updates whose dwell has elapsed and polls them
    /// until they stall.
    pub fn tick(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
        if !self.initialized {
            return;
        }
        self.pool.trim();
        self.fire_due();
        self.executor.run_until_stalled();
    }

    /// Polls in-flight deferred updates without advancing the clock.
    pub fn run_until_stalled(&mut self) {
        self.executor.run_until_stalled();
    }

    /// Routes a click on slot `id` to the provider. Returns `false` if the slot is not bound.
    pub fn activate_slot(&mut self, id: SlotId) -> bool {
        if !self.initialized {
            return false;
        }
        let (Some(index), Some(slot)) = (self.pool.bound_index(id), self.pool.slot(id)) else {
            return false;
        };
        rtrace!(index, slot = id.0, "Engine: item activated");
        self.provider.on_item_activated(index, &mut slot.borrow_mut());
        true
    }

    pub fn set_selected(&mut self, index: usize, selected: bool) {
        if !self.initialized {
            return;
        }
        self.provider.set_selected(index, selected);
        if let Some(slot) = self.pool.bound_slot(index) {
            slot.borrow_mut().bind_selection_visual(selected);
        }
    }

    /// Flips the selection of `index` and returns the new state.
    pub fn toggle_selected(&mut self, index: usize) -> bool {
        let selected = !self.provider.is_selected(index);
        self.set_selected(index, selected);
        selected
    }

    /// Cancels all work, disposes every slot and releases the provider.
    ///
    /// Calling it again is a no-op. The engine is inert until the next `initialize`.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        rdebug!(live_slots = self.pool.live_count(), "Engine::teardown");
        self.torn_down = true;
        self.initialized = false;
        self.scheduler.cancel_all();
        // Let in-flight updates observe cancellation before they are dropped.
        self.executor.run_until_stalled();
        self.executor = LocalPool::new();
        self.pool.teardown();
        if let Some(mut slot) = self.measure_slot.take() {
            slot.dispose();
        }
        self.provider.dispose();
        self.table.clear();
        self.resolver.reset();
        self.bound.clear();
        self.offset = 0;
        self.item_count = 0;
        self.slots_needed = 0;
    }

    fn relayout(&mut self, full: bool) {
        let Some(axis) = self.options.layout.axis else {
            self.clear_presentation();
            return;
        };
        let mode = self.options.layout.dimension_mode;
        let spacing = self.options.layout.spacing;
        let count = self.item_count;

        let pool = &mut self.pool;
        let measure_slot = self
            .measure_slot
            .get_or_insert_with(|| pool.construct_detached());
        let provider = &mut self.provider;
        let size_of = |index| measure_extent(provider, measure_slot, index, axis);
        if full || self.table.spacing() != spacing {
            self.table.set_spacing(spacing);
            self.table.rebuild(count, mode, size_of);
        } else {
            self.table.extend(count, mode, size_of);
        }

        self.resize_pool(axis);
        let max_offset = self
            .table
            .total()
            .saturating_sub(self.viewport.extent(axis) as u64);
        self.offset = self.offset.min(max_offset);
        self.resolver.reset();
        self.refresh(true);
    }

    fn clear_presentation(&mut self) {
        self.scheduler.cancel_all();
        self.pool.release_all();
        self.pool.set_capacity(0);
        self.table.clear();
        self.resolver.reset();
        self.bound.clear();
        self.slots_needed = 0;
    }

    fn resize_pool(&mut self, axis: Axis) {
        let viewport = self.viewport.extent(axis);
        let min_extent = match &self.measure_slot {
            Some(slot) => {
                effective_min_extent(slot.min_extent(axis), slot.fills_viewport(axis), viewport)
            }
            None => 0,
        };
        let min_extent = match (min_extent, self.table.uniform_extent()) {
            (0, Some(uniform)) => uniform,
            (min_extent, _) => min_extent,
        };
        let needed = slots_needed(
            viewport,
            min_extent,
            self.options.layout.spacing,
            self.item_count,
        );
        if needed == 0 && self.item_count > 0 && viewport > 0 {
            rwarn!(
                item_count = self.item_count,
                viewport,
                "Engine: slots report no minimum extent; nothing will be presented"
            );
        }
        self.slots_needed = needed;
        self.pool.set_capacity(needed);
    }

    fn refresh(&mut self, force: bool) -> bool {
        let Some(axis) = self.options.layout.axis else {
            return false;
        };
        let order = self.options.layout.order;
        let request = WindowRequest::new(
            self.offset,
            self.viewport.extent(axis),
            order,
            self.slots_needed,
        )
        .with_force(force);

        let resolution = match (self.options.layout.dimension_mode, self.measure_slot.as_mut()) {
            (DimensionMode::Variable, Some(measure_slot)) => {
                let provider = &mut self.provider;
                let mut lazy = |index| measure_extent(provider, measure_slot, index, axis);
                self.resolver.resolve(&self.table, request, Some(&mut lazy))
            }
            _ => self.resolver.resolve(&self.table, request, None),
        };
        if !resolution.changed {
            return false;
        }

        self.bridge.present(
            &mut self.pool,
            &mut self.provider,
            &self.table,
            resolution.window,
            order,
            axis,
            &mut self.bound,
        );
        let bound = &self.bound;
        self.scheduler.retain(|index| bound.contains(&index));
        if self.options.deferred.enabled {
            for &index in &self.bound {
                self.scheduler.arm(index, self.now_ms);
            }
        }
        true
    }

    fn fire_due(&mut self) {
        let mut due = std::mem::take(&mut self.due);
        self.scheduler.collect_due(self.now_ms, &mut due);
        let window = self.resolver.window();
        for &index in &due {
            if ScrollBridge::is_outside_window(window, index) || self.pool.bound_slot(index).is_none()
            {
                rtrace!(index, "Engine: deferred update lost its slot");
                self.scheduler.cancel(index);
                continue;
            }
            let ticket = self.scheduler.start(index);
            let update =
                self.provider
                    .run_deferred_update(index, self.pool.resolver(), ticket.token.clone());
            let done = ticket.done;
            let spawned = self.executor.spawner().spawn_local(async move {
                update.await;
                done.set(true);
            });
            if spawned.is_err() {
                rwarn!(index, "Engine: failed to spawn deferred update");
                self.scheduler.cancel(index);
            }
        }
        self.due = due;
    }
}

fn measure_extent<P: DataProvider>(
    provider: &mut P,
    measure_slot: &mut P::Slot,
    index: usize,
    axis: Axis,
) -> u32 {
    match provider.measure_item(index, axis) {
        Some(extent) => extent,
        None => {
            provider.bind_item(index, measure_slot);
            measure_slot.extent(axis)
        }
    }
}
