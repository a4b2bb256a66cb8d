//! Inventory page: one card per supply line.

use tracing::{debug, warn};

use super::stock_fill;
use crate::app::AppContext;
use crate::model::SupplyItem;
use crate::render::{ids, Card, RenderTarget};

/// Stock bar fill. The reorder threshold sits at the middle of the bar.
#[must_use]
pub fn stock_percent(item: &SupplyItem) -> f64 {
    let full = f64::from(item.min_threshold.max(1)) * 2.0;
    (f64::from(item.current_stock) / full * 100.0).min(100.0)
}

/// Card for one supply line.
#[must_use]
pub fn supply_card(item: &SupplyItem) -> Card {
    let key = item.item_id.clone().unwrap_or_else(|| item.name.clone());
    let mut card = Card::new(key, &item.name)
        .with_class(stock_fill(&item.quality_status))
        .with_field("stock", format!("{} {}", item.current_stock, item.unit_label))
        .with_field("minimum", format!("{} {}", item.min_threshold, item.unit_label))
        .with_field("quality", &item.quality_status);
    if item.current_stock < item.min_threshold {
        card = card.with_field("reorder", "Below threshold");
    }
    if let Some(category) = &item.category {
        card = card.with_field("category", category);
    }
    if let Some(priority) = &item.priority {
        card = card.with_field("priority", priority);
    }
    card.with_progress(stock_percent(item))
}

/// Rebuild the inventory list.
pub fn render(target: &dyn RenderTarget, inventory: &[SupplyItem]) {
    target.clear(ids::INVENTORY_LIST);
    for item in inventory {
        target.append_card(ids::INVENTORY_LIST, supply_card(item));
    }
}

/// Fetch the inventory and render it, or render the cached one on failure.
pub async fn initialize(ctx: &AppContext) {
    let epoch = ctx.epoch().await;
    let result = ctx.api().inventory().await;

    let mut store = ctx.store().lock().await;
    if !store.is_current(epoch) {
        debug!(epoch, "discarding stale inventory load");
        return;
    }
    match result {
        Ok(inventory) => store.set_inventory(inventory),
        Err(e) => warn!(error = %e, "inventory fetch failed, rendering cached inventory"),
    }
    render(ctx.target().as_ref(), store.inventory_mut());
}
