//! Assembly of [`CanonicalProduct`] from a raw upstream record.
//!
//! Field resolution lives in [`crate::extract`]; this module only wires the
//! extractors together and fills the display fallbacks.

use otlist_core::products::BASE_CURRENCY;
use otlist_core::{CanonicalProduct, Dimensions, RateTable};

use crate::convert::{convert_currency, volumetric_weight_kg};
use crate::extract::{
    extract_dimensions, extract_price, extract_publish_date, extract_rating,
    extract_review_count, extract_sales_count, extract_seller_rating, extract_variant_count,
    extract_weight,
};
use crate::types::{objects, text_field, RawProduct};

/// Title used when the upstream sends none.
pub const UNTITLED: &str = "Sin título";

const ITEM_URL_PREFIX: &str = "https://item.taobao.com/item.htm?id=";

/// Normalizes one raw record. Never fails; every field has a fallback.
#[must_use]
pub fn normalize_product(product: &RawProduct, rates: &RateTable) -> CanonicalProduct {
    let record = product.fields();
    let item_id = product.id().unwrap_or_default();

    let title = ["Title", "OriginalTitle"]
        .iter()
        .find_map(|key| text_field(record, key))
        .unwrap_or(UNTITLED)
        .to_owned();

    let image_url = text_field(record, "MainPictureUrl")
        .or_else(|| objects(record, "Pictures").next().and_then(|pic| text_field(pic, "Url")))
        .unwrap_or_default()
        .to_owned();

    let item_url = text_field(record, "ExternalItemUrl")
        .map_or_else(|| format!("{ITEM_URL_PREFIX}{item_id}"), str::to_owned);

    let shop_name = ["VendorDisplayName", "VendorName", "BrandName"]
        .iter()
        .find_map(|key| text_field(record, key))
        .map(str::to_owned);

    let price = extract_price(product);
    let converted = convert_currency(price, rates);
    let weight = extract_weight(product);
    let dims = extract_dimensions(product).unwrap_or_default();
    let has_dims = !dims.is_empty();

    CanonicalProduct {
        item_id,
        title,
        image_url,
        item_url,
        price,
        price_rmb: price,
        price_usd: converted.usd,
        price_cop: converted.cop,
        currency: BASE_CURRENCY.to_owned(),
        sales_count: extract_sales_count(product),
        rating: extract_rating(product),
        review_count: extract_review_count(product),
        shop_name,
        provider_type: text_field(record, "ProviderType").map(str::to_owned),
        publish_date: extract_publish_date(product),
        weight: weight.map(|w| w.value),
        weight_unit: weight.map(|w| w.unit),
        length: dims.length,
        width: dims.width,
        height: dims.height,
        dimension_unit: has_dims.then(|| Dimensions::UNIT.to_owned()),
        volumetric_weight: volumetric_weight_kg(&dims),
        seller_rating: extract_seller_rating(product),
        variant_count: extract_variant_count(product),
    }
}

/// Normalizes a whole batch in order.
#[must_use]
pub fn normalize_all(products: &[RawProduct], rates: &RateTable) -> Vec<CanonicalProduct> {
    products.iter().map(|p| normalize_product(p, rates)).collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
