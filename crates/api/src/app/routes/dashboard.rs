use std::sync::Arc;

use axum::{Json, extract::Extension, response::IntoResponse};

use stockroom_inventory::analytics;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// One fetch, analyzed into every view the dashboard renders.
pub async fn dashboard(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let policy = services.policy();

    let items = match services.list_items(policy.default_sort).await {
        Ok(items) => items,
        Err(e) => return errors::store_error_to_response(e),
    };

    let analysis = analytics::analyze(&items, policy);

    Json(dto::DashboardResponse {
        total_value_display: dto::format_inr(analysis.total_value),
        low_stock_items: analysis.low_stock,
        total_value: analysis.total_value,
        category_distribution: analysis.category_distribution,
        items,
    })
    .into_response()
}
