use crate::parse_helpers::{count_from_value, digits_to_count};
use crate::types::{configurations, featured_values, field, scalar_text, RawProduct};

const REVIEW_FIELDS: [&str; 4] = ["ReviewCount", "ReviewsCount", "CommentCount", "TotalReviews"];
const DATE_FIELDS: [&str; 4] = ["PublishDate", "PublishTime", "ListTime", "CreatedTime"];
const DATE_FEATURED_NAMES: [&str; 4] = ["listTime", "publishTime", "createdTime", "listingTime"];

/// Number of reviews, from a direct count field or a featured value whose
/// name mentions reviews or comments.
#[must_use]
pub fn extract_review_count(product: &RawProduct) -> Option<u64> {
    let record = product.fields();
    REVIEW_FIELDS
        .iter()
        .find_map(|key| field(record, key).and_then(count_from_value))
        .or_else(|| {
            featured_values(record)
                .iter()
                .find(|fv| {
                    let name = fv.name_lower();
                    name.contains("review") || name.contains("comment")
                })
                .and_then(|fv| digits_to_count(&fv.value))
        })
}

/// Listing date as the upstream formats it. Never parsed.
#[must_use]
pub fn extract_publish_date(product: &RawProduct) -> Option<String> {
    let record = product.fields();
    let non_empty = |s: String| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    };
    DATE_FIELDS
        .iter()
        .find_map(|key| field(record, key).and_then(scalar_text).and_then(non_empty))
        .or_else(|| {
            let fvs = featured_values(record);
            DATE_FEATURED_NAMES.iter().find_map(|name| {
                fvs.iter()
                    .find(|fv| fv.name == *name)
                    .and_then(|fv| non_empty(fv.value.clone()))
            })
        })
}

/// Number of purchasable variants; `None` when the record lists none.
#[must_use]
pub fn extract_variant_count(product: &RawProduct) -> Option<usize> {
    let count = configurations(product.fields()).len();
    (count > 0).then_some(count)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn product(value: Value) -> RawProduct {
        RawProduct::from_value(value).expect("object")
    }

    #[test]
    fn review_count_prefers_direct_fields() {
        let p = product(json!({
            "CommentCount": 17,
            "FeaturedValues": [{"Name": "reviews", "Value": "900"}]
        }));
        assert_eq!(extract_review_count(&p), Some(17));
    }

    #[test]
    fn review_count_from_featured_value() {
        let p = product(json!({"FeaturedValues": [{"Name": "TotalComments", "Value": "1,024 条"}]}));
        assert_eq!(extract_review_count(&p), Some(1024));
        assert_eq!(extract_review_count(&product(json!({}))), None);
    }

    #[test]
    fn publish_date_is_kept_verbatim() {
        let p = product(json!({"ListTime": "2024-03-01T10:00:00", "CreatedTime": "ignored"}));
        assert_eq!(extract_publish_date(&p).as_deref(), Some("2024-03-01T10:00:00"));
    }

    #[test]
    fn publish_date_featured_names_in_order() {
        let p = product(json!({
            "PublishDate": "  ",
            "FeaturedValues": [
                {"Name": "createdTime", "Value": "2023-01-01"},
                {"Name": "publishTime", "Value": "2023-06-01"}
            ]
        }));
        assert_eq!(extract_publish_date(&p).as_deref(), Some("2023-06-01"));
    }

    #[test]
    fn variant_count_only_when_positive() {
        let p = product(json!({"ConfiguredItems": [{"Id": "a"}, {"Id": "b"}]}));
        assert_eq!(extract_variant_count(&p), Some(2));
        assert_eq!(extract_variant_count(&product(json!({"ConfiguredItems": []}))), None);
    }
}
