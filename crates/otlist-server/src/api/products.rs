use axum::{
    extract::{Query, State},
    Extension, Json,
};
use otlist_core::{CanonicalProduct, ListingEnvelope};
use otlist_otapi::{get_single_item_detail, ListingParams};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CategoryProductsQuery {
    pub instance_key: Option<String>,
    pub category_id: Option<String>,
    pub sort_type: Option<String>,
    /// Kept as text: an unparseable size falls back to the default.
    pub frame_size: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ItemQuery {
    pub instance_key: Option<String>,
    pub item_id: Option<String>,
    pub language: Option<String>,
}

fn parse_frame_size(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse().ok())
}

pub(super) async fn list_category_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CategoryProductsQuery>,
) -> Result<Json<ListingEnvelope>, ApiError> {
    let params = ListingParams {
        category_id: query.category_id,
        access_key: state.instance_key(query.instance_key.as_deref()).ok(),
        sort_type: query.sort_type,
        page_size: parse_frame_size(query.frame_size.as_deref()),
        language: query.language,
    };
    let request = params.validate(&state.default_language)?;

    let session = state.otapi.session(&request.access_key, &request.language);
    let envelope = otlist_otapi::list_category_products(
        &session,
        state.rates.as_ref(),
        &state.orchestrator,
        &request,
        req_id.0,
    )
    .await?;
    Ok(Json(envelope))
}

pub(super) async fn get_item_full_info(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<CanonicalProduct>, ApiError> {
    let instance_key = state.instance_key(query.instance_key.as_deref())?;
    let item_id = otlist_otapi::listing::require(query.item_id.as_deref(), "itemId")?;
    let language = state.language(query.language.as_deref());

    let session = state.otapi.session(&instance_key, &language);
    get_single_item_detail(&session, state.rates.as_ref(), &item_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Item not found or failed to fetch full info"))
}

#[cfg(test)]
mod tests {
    use super::parse_frame_size;

    #[test]
    fn frame_size_is_parsed_leniently() {
        assert_eq!(parse_frame_size(Some(" 40 ")), Some(40));
        assert_eq!(parse_frame_size(Some("forty")), None);
        assert_eq!(parse_frame_size(Some("-5")), None);
        assert_eq!(parse_frame_size(None), None);
    }
}
