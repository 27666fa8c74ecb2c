use crate::app::auth::StaffUser;
use crate::app::SharedState;
use crate::core::Storage;
use crate::domain::model::{AdminNodeDetail, AdminNodeRow, AdminProductRow, NodeId};
use crate::domain::requests::{AdminNodeQuery, AdminProductQuery, ClearDebtRequest, DebtUpdate};
use crate::utils::error::TradeError;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};

type ApiResult<T> = Result<T, TradeError>;

/// GET /admin/node?city=&search=
pub async fn node_rows<S: Storage>(
    State(state): State<SharedState<S>>,
    _staff: StaffUser,
    Query(query): Query<AdminNodeQuery>,
) -> Json<Vec<AdminNodeRow>> {
    Json(state.network.admin_node_rows(&query).await)
}

/// GET /admin/node/:id
pub async fn node_detail<S: Storage>(
    State(state): State<SharedState<S>>,
    _staff: StaffUser,
    Path(id): Path<NodeId>,
) -> ApiResult<Json<AdminNodeDetail>> {
    Ok(Json(state.network.admin_node_detail(id).await?))
}

/// PATCH /admin/node/:id/debt
pub async fn set_debt<S: Storage>(
    State(state): State<SharedState<S>>,
    StaffUser(staff): StaffUser,
    Path(id): Path<NodeId>,
    Json(update): Json<DebtUpdate>,
) -> ApiResult<Json<AdminNodeRow>> {
    tracing::debug!("Staff '{}' edits debt of node {}", staff.username, id);
    Ok(Json(state.network.set_debt(id, update).await?))
}

/// POST /admin/node/clear_debt
pub async fn clear_debt<S: Storage>(
    State(state): State<SharedState<S>>,
    StaffUser(staff): StaffUser,
    Json(request): Json<ClearDebtRequest>,
) -> ApiResult<Json<Value>> {
    tracing::debug!(
        "Staff '{}' clears debt for {} selected node(s)",
        staff.username,
        request.ids.len()
    );
    let cleared = state.network.clear_debt(&request.ids).await?;
    Ok(Json(json!({ "cleared": cleared })))
}

/// GET /admin/product?search=
pub async fn product_rows<S: Storage>(
    State(state): State<SharedState<S>>,
    _staff: StaffUser,
    Query(query): Query<AdminProductQuery>,
) -> Json<Vec<AdminProductRow>> {
    Json(state.network.admin_product_rows(&query).await)
}
