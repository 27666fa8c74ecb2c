use crate::app::SharedState;
use crate::core::Storage;
use crate::domain::model::{Contact, NodeId, NodeView, Product, ProductId};
use crate::domain::requests::{
    NodeCreate, NodeListQuery, NodeUpdate, ProductCreate, ProductListQuery, ProductUpdate,
};
use crate::utils::error::TradeError;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

type ApiResult<T> = Result<T, TradeError>;

/// POST /network/node
pub async fn create_node<S: Storage>(
    State(state): State<SharedState<S>>,
    Json(payload): Json<NodeCreate>,
) -> ApiResult<(StatusCode, Json<NodeView>)> {
    let node = state.network.create_node(payload).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

/// GET /network/node/list?country=
pub async fn list_nodes<S: Storage>(
    State(state): State<SharedState<S>>,
    Query(query): Query<NodeListQuery>,
) -> Json<Vec<NodeView>> {
    Json(state.network.list_nodes(&query).await)
}

/// GET /network/node/:id
pub async fn get_node<S: Storage>(
    State(state): State<SharedState<S>>,
    Path(id): Path<NodeId>,
) -> ApiResult<Json<NodeView>> {
    Ok(Json(state.network.get_node(id).await?))
}

/// PUT /network/node/:id
pub async fn replace_node<S: Storage>(
    State(state): State<SharedState<S>>,
    Path(id): Path<NodeId>,
    Json(payload): Json<NodeUpdate>,
) -> ApiResult<Json<NodeView>> {
    Ok(Json(state.network.update_node(id, payload, false).await?))
}

/// PATCH /network/node/:id
pub async fn patch_node<S: Storage>(
    State(state): State<SharedState<S>>,
    Path(id): Path<NodeId>,
    Json(payload): Json<NodeUpdate>,
) -> ApiResult<Json<NodeView>> {
    Ok(Json(state.network.update_node(id, payload, true).await?))
}

/// DELETE /network/node/:id
pub async fn delete_node<S: Storage>(
    State(state): State<SharedState<S>>,
    Path(id): Path<NodeId>,
) -> ApiResult<StatusCode> {
    state.network.delete_node(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /network/node/:id/contact
pub async fn update_contact<S: Storage>(
    State(state): State<SharedState<S>>,
    Path(id): Path<NodeId>,
    Json(contact): Json<Contact>,
) -> ApiResult<Json<Contact>> {
    Ok(Json(state.network.update_contact(id, contact).await?))
}

/// POST /network/product
pub async fn create_product<S: Storage>(
    State(state): State<SharedState<S>>,
    Json(payload): Json<ProductCreate>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product = state.network.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /network/product/list?owner=
pub async fn list_products<S: Storage>(
    State(state): State<SharedState<S>>,
    Query(query): Query<ProductListQuery>,
) -> Json<Vec<Product>> {
    Json(state.network.list_products(&query).await)
}

pub async fn get_product<S: Storage>(
    State(state): State<SharedState<S>>,
    Path(id): Path<ProductId>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.network.get_product(id).await?))
}

pub async fn patch_product<S: Storage>(
    State(state): State<SharedState<S>>,
    Path(id): Path<ProductId>,
    Json(payload): Json<ProductUpdate>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.network.update_product(id, payload).await?))
}

pub async fn delete_product<S: Storage>(
    State(state): State<SharedState<S>>,
    Path(id): Path<ProductId>,
) -> ApiResult<StatusCode> {
    state.network.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
