use std::time::Duration;

use otlist_core::RateTable;
use serde_json::json;

use super::*;
use crate::search::SearchBatch;
use crate::types::{ErrorCode, RawProduct};

struct FixedRates;

impl RateSource for FixedRates {
    async fn current_rates(&self) -> RateTable {
        RateTable {
            usd: 0.14,
            cop: 530.0,
            as_of: Utc::now(),
        }
    }
}

enum SearchBehaviour {
    Items(Vec<RawProduct>),
    Unreachable,
    ErrorCode,
}

struct StubCatalog {
    search: SearchBehaviour,
    total_count: u64,
}

fn record(id: &str, sales: u64, price: f64) -> RawProduct {
    RawProduct::from_value(json!({
        "Id": id,
        "Title": format!("Item {id}"),
        "SalesCount": sales,
        "Price": {"OriginalPrice": price}
    }))
    .expect("object")
}

fn unavailable() -> OtapiError {
    OtapiError::UnexpectedStatus {
        operation: "SearchItemsFrame".to_owned(),
        status: 502,
        description: "Bad Gateway".to_owned(),
    }
}

impl CatalogSource for StubCatalog {
    async fn search_category_batch(
        &self,
        _category_id: &str,
        _order_by: &str,
        offset: usize,
        batch_size: usize,
    ) -> Result<SearchBatch, OtapiError> {
        match &self.search {
            SearchBehaviour::Items(items) => {
                let end = (offset + batch_size).min(items.len());
                Ok(SearchBatch {
                    items: items.get(offset..end).unwrap_or_default().to_vec(),
                    total_count: self.total_count,
                    error_code: ErrorCode::Numeric(0),
                })
            }
            SearchBehaviour::Unreachable => Err(unavailable()),
            SearchBehaviour::ErrorCode => Ok(SearchBatch {
                items: Vec::new(),
                total_count: 0,
                error_code: ErrorCode::Text("InvalidInstanceKey".to_owned()),
            }),
        }
    }

    async fn fetch_item_detail(&self, item_id: &str) -> Result<Option<RawProduct>, OtapiError> {
        match &self.search {
            SearchBehaviour::Items(items) => Ok(items
                .iter()
                .find(|p| p.id().as_deref() == Some(item_id))
                .cloned()),
            _ => Ok(None),
        }
    }
}

fn catalog(items: Vec<RawProduct>) -> StubCatalog {
    StubCatalog {
        search: SearchBehaviour::Items(items),
        total_count: 4_321,
    }
}

fn request(sort: SortMode, page_size: usize) -> ListingRequest {
    ListingRequest {
        category_id: "otc-3035".to_owned(),
        access_key: "key".to_owned(),
        sort_mode: sort,
        page_size,
        language: "es".to_owned(),
    }
}

fn orchestrator() -> SearchOrchestrator {
    SearchOrchestrator::new(Duration::from_secs(1))
}

fn ids(envelope: &ListingEnvelope) -> Vec<&str> {
    envelope.content.iter().map(|p| p.item_id.as_str()).collect()
}

#[test]
fn validate_requires_key_and_category() {
    let missing_key = ListingParams {
        category_id: Some("otc-1".to_owned()),
        ..ListingParams::default()
    };
    assert!(matches!(
        missing_key.validate("es"),
        Err(ListingError::MissingParameter("instanceKey"))
    ));

    let blank_category = ListingParams {
        access_key: Some("key".to_owned()),
        category_id: Some("   ".to_owned()),
        ..ListingParams::default()
    };
    assert!(matches!(
        blank_category.validate("es"),
        Err(ListingError::MissingParameter("categoryId"))
    ));
}

#[test]
fn validate_applies_defaults_and_clamps() {
    let params = ListingParams {
        access_key: Some(" key ".to_owned()),
        category_id: Some("otc-1".to_owned()),
        page_size: Some(5_000),
        ..ListingParams::default()
    };
    let request = params.validate("es").unwrap();
    assert_eq!(request.access_key, "key");
    assert_eq!(request.sort_mode, SortMode::BestSellers);
    assert_eq!(request.page_size, MAX_PAGE_SIZE);
    assert_eq!(request.language, "es");

    let zero = ListingParams {
        access_key: Some("key".to_owned()),
        category_id: Some("otc-1".to_owned()),
        page_size: Some(0),
        sort_type: Some("Rankprice_desc".to_owned()),
        language: Some("en".to_owned()),
    };
    let request = zero.validate("es").unwrap();
    assert_eq!(request.page_size, 1);
    assert_eq!(request.sort_mode, SortMode::PriceDesc);
    assert_eq!(request.language, "en");
}

#[tokio::test]
async fn best_sellers_are_resorted_by_sales() {
    let source = catalog(vec![
        record("a", 5, 10.0),
        record("b", 50, 10.0),
        record("c", 20, 10.0),
        record("d", 50, 10.0),
    ]);
    let envelope = list_category_products(
        &source,
        &FixedRates,
        &orchestrator(),
        &request(SortMode::BestSellers, 3),
        "req-1".to_owned(),
    )
    .await
    .unwrap();
    assert_eq!(ids(&envelope), ["b", "d", "c"]);
    assert_eq!(envelope.error_code, "Ok");
    assert_eq!(envelope.total_count, 4_321);
    assert_eq!(envelope.request_id, "req-1");
    assert!(envelope.request_time > 0);
}

#[tokio::test]
async fn other_sorts_trust_upstream_order() {
    let source = catalog(vec![
        record("a", 5, 30.0),
        record("b", 50, 10.0),
        record("c", 20, 20.0),
    ]);
    for mode in [SortMode::PriceAsc, SortMode::Newest, SortMode::Unrecognized] {
        let envelope = list_category_products(
            &source,
            &FixedRates,
            &orchestrator(),
            &request(mode, 20),
            "req".to_owned(),
        )
        .await
        .unwrap();
        assert_eq!(ids(&envelope), ["a", "b", "c"]);
    }
}

#[tokio::test]
async fn prices_are_converted_with_current_rates() {
    let source = catalog(vec![record("a", 1, 100.0)]);
    let envelope = list_category_products(
        &source,
        &FixedRates,
        &orchestrator(),
        &request(SortMode::BestSellers, 20),
        "req".to_owned(),
    )
    .await
    .unwrap();
    let product = &envelope.content[0];
    assert!((product.price_usd - 14.0).abs() < 1e-9);
    assert!((product.price_cop - 53_000.0).abs() < 1e-9);
}

#[tokio::test]
async fn empty_category_is_a_successful_empty_envelope() {
    let source = catalog(Vec::new());
    let envelope = list_category_products(
        &source,
        &FixedRates,
        &orchestrator(),
        &request(SortMode::BestSellers, 20),
        "req".to_owned(),
    )
    .await
    .unwrap();
    assert!(envelope.content.is_empty());
    assert_eq!(envelope.total_count, 0);
    assert_eq!(envelope.error_code, SUCCESS_CODE);
}

#[tokio::test]
async fn upstream_error_code_is_an_empty_success() {
    let source = StubCatalog {
        search: SearchBehaviour::ErrorCode,
        total_count: 0,
    };
    let envelope = list_category_products(
        &source,
        &FixedRates,
        &orchestrator(),
        &request(SortMode::BestSellers, 20),
        "req".to_owned(),
    )
    .await
    .unwrap();
    assert!(envelope.content.is_empty());
}

#[tokio::test]
async fn unreachable_upstream_surfaces_as_error() {
    let source = StubCatalog {
        search: SearchBehaviour::Unreachable,
        total_count: 0,
    };
    let result = list_category_products(
        &source,
        &FixedRates,
        &orchestrator(),
        &request(SortMode::BestSellers, 20),
        "req".to_owned(),
    )
    .await;
    assert!(matches!(
        result,
        Err(ListingError::Upstream { status: 502, .. })
    ));
}

#[tokio::test]
async fn single_item_detail_is_normalized() {
    let source = catalog(vec![record("abb-9", 7, 12.0)]);
    let product = get_single_item_detail(&source, &FixedRates, "abb-9")
        .await
        .unwrap()
        .expect("item present");
    assert_eq!(product.item_id, "abb-9");
    assert_eq!(product.sales_count, 7);

    let missing = get_single_item_detail(&source, &FixedRates, "nope")
        .await
        .unwrap();
    assert!(missing.is_none());

    let blank = get_single_item_detail(&source, &FixedRates, "  ").await;
    assert!(matches!(blank, Err(ListingError::MissingParameter("itemId"))));
}

#[test]
fn otapi_errors_are_classified() {
    let err: ListingError = OtapiError::Deserialize {
        context: "GetItemFullInfo".to_owned(),
        source: serde_json::from_str::<u32>("{").expect_err("not a number"),
    }
    .into();
    assert!(matches!(err, ListingError::InvalidResponse(_)));

    let err: ListingError = OtapiError::UnexpectedStatus {
        operation: "SearchItemsFrame".to_owned(),
        status: 403,
        description: "Key blocked".to_owned(),
    }
    .into();
    assert!(matches!(
        err,
        ListingError::Upstream { status: 403, ref message } if message == "Key blocked"
    ));
}
