//! Category navigation handlers. Upstream error codes come back inside the
//! envelope with a 200; only transport and HTTP failures map to errors.

use axum::{
    extract::{Query, State},
    Json,
};
use otlist_otapi::listing::require;
use otlist_otapi::CategoryEnvelope;
use serde::Deserialize;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct NavigationQuery {
    pub instance_key: Option<String>,
    pub language: Option<String>,
    pub parent_category_id: Option<String>,
    pub category_id: Option<String>,
    pub item_id: Option<String>,
    #[serde(rename = "taoBaoCategoryId")]
    pub taobao_category_id: Option<String>,
}

type EnvelopeResult = Result<Json<CategoryEnvelope>, ApiError>;

pub(super) async fn list_root_categories(
    State(state): State<AppState>,
    Query(query): Query<NavigationQuery>,
) -> EnvelopeResult {
    let key = state.instance_key(query.instance_key.as_deref())?;
    let language = state.language(query.language.as_deref());
    let envelope = state.otapi.session(&key, &language).root_categories().await?;
    Ok(Json(envelope))
}

pub(super) async fn list_subcategories(
    State(state): State<AppState>,
    Query(query): Query<NavigationQuery>,
) -> EnvelopeResult {
    let key = state.instance_key(query.instance_key.as_deref())?;
    let parent_id = require(query.parent_category_id.as_deref(), "parentCategoryId")?;
    let language = state.language(query.language.as_deref());
    let envelope = state
        .otapi
        .session(&key, &language)
        .subcategories(&parent_id)
        .await?;
    Ok(Json(envelope))
}

pub(super) async fn get_categories_tree(
    State(state): State<AppState>,
    Query(query): Query<NavigationQuery>,
) -> EnvelopeResult {
    let key = state.instance_key(query.instance_key.as_deref())?;
    let language = state.language(query.language.as_deref());
    let envelope = state.otapi.session(&key, &language).category_tree().await?;
    Ok(Json(envelope))
}

pub(super) async fn get_category_root_path(
    State(state): State<AppState>,
    Query(query): Query<NavigationQuery>,
) -> EnvelopeResult {
    let key = state.instance_key(query.instance_key.as_deref())?;
    let category_id = require(query.category_id.as_deref(), "categoryId")?;
    let language = state.language(query.language.as_deref());
    let envelope = state
        .otapi
        .session(&key, &language)
        .category_root_path(&category_id)
        .await?;
    Ok(Json(envelope))
}

pub(super) async fn get_item_root_path(
    State(state): State<AppState>,
    Query(query): Query<NavigationQuery>,
) -> EnvelopeResult {
    let key = state.instance_key(query.instance_key.as_deref())?;
    let item_id = require(query.item_id.as_deref(), "itemId")?;
    let taobao_category = query
        .taobao_category_id
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let language = state.language(query.language.as_deref());
    let envelope = state
        .otapi
        .session(&key, &language)
        .item_root_path(&item_id, taobao_category)
        .await?;
    Ok(Json(envelope))
}
