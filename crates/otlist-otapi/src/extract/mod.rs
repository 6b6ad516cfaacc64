//! Field extractors over raw upstream product records.
//!
//! Each extractor is a pure function of one [`RawProduct`](crate::RawProduct)
//! that walks an ordered list of candidate locations and returns the first
//! valid reading. None of them fail: missing data is `None` (or `0` for
//! price and sales count).

mod dimensions;
mod meta;
mod price;
mod rating;
mod sales;
mod weight;

pub use dimensions::extract_dimensions;
pub use meta::{extract_publish_date, extract_review_count, extract_variant_count};
pub use price::extract_price;
pub use rating::{extract_rating, extract_seller_rating};
pub use sales::extract_sales_count;
pub use weight::extract_weight;
