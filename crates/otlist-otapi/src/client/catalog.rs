use crate::error::OtapiError;
use crate::search::{CatalogSource, SearchBatch};
use crate::types::{ItemFullInfoResponse, RawProduct, SearchItemsFrameResponse};

use super::{decode, OtapiSession};

/// Escapes the five XML special characters.
fn xml_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// The `xmlParameters` document of a category search.
fn search_parameters_xml(category_id: &str, order_by: &str) -> String {
    format!(
        "<SearchItemsParameters><CategoryId>{}</CategoryId><OrderBy>{}</OrderBy><OutputMode>Full</OutputMode></SearchItemsParameters>",
        xml_escape(category_id),
        xml_escape(order_by)
    )
}

impl OtapiSession<'_> {
    /// Fetches one frame of category search results.
    ///
    /// An application-level error code is not an `Err`: it comes back in
    /// [`SearchBatch::error_code`] with no items so the caller decides how
    /// to treat a partial listing.
    ///
    /// # Errors
    ///
    /// - [`OtapiError::Http`] when no response arrives (after retries).
    /// - [`OtapiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`OtapiError::Deserialize`] if the body is not a search envelope.
    pub async fn search_items_frame(
        &self,
        category_id: &str,
        order_by: &str,
        frame_position: usize,
        frame_size: usize,
    ) -> Result<SearchBatch, OtapiError> {
        const OPERATION: &str = "SearchItemsFrame";
        let xml = search_parameters_xml(category_id, order_by);
        let position = frame_position.to_string();
        let size = frame_size.to_string();
        let url = self.client.build_url(
            OPERATION,
            self,
            &[
                ("xmlParameters", xml.as_str()),
                ("framePosition", position.as_str()),
                ("frameSize", size.as_str()),
            ],
        )?;

        let body = self
            .client
            .request_json_with_retry(OPERATION, &url, self.client.timeouts.search)
            .await?;
        let response: SearchItemsFrameResponse = decode(OPERATION, body)?;

        if !response.error_code.is_success() {
            return Ok(SearchBatch {
                items: Vec::new(),
                total_count: 0,
                error_code: response.error_code,
            });
        }

        let frame = response.result.and_then(|r| r.items);
        let (items, total_count) = frame.map_or_else(
            || (Vec::new(), 0),
            |f| (f.content, f.total_count.unwrap_or(0)),
        );
        Ok(SearchBatch {
            items,
            total_count,
            error_code: response.error_code,
        })
    }

    /// Fetches the full-detail record of one item. Never retried.
    ///
    /// Returns `Ok(None)` when the upstream answers with an error code
    /// (unknown item, delisted item).
    ///
    /// # Errors
    ///
    /// - [`OtapiError::Http`] when no response arrives within the detail timeout.
    /// - [`OtapiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`OtapiError::Deserialize`] if the body is not a detail envelope.
    pub async fn item_full_info(&self, item_id: &str) -> Result<Option<RawProduct>, OtapiError> {
        const OPERATION: &str = "GetItemFullInfo";
        let url = self
            .client
            .build_url(OPERATION, self, &[("itemId", item_id)])?;
        let body = self
            .client
            .request_json(OPERATION, &url, self.client.timeouts.detail)
            .await?;
        let response: ItemFullInfoResponse = decode(OPERATION, body)?;

        if !response.error_code.is_success() {
            tracing::debug!(
                item_id,
                error_code = %response.error_code,
                "item detail returned an error code"
            );
            return Ok(None);
        }
        Ok(response.item)
    }
}

impl CatalogSource for OtapiSession<'_> {
    async fn search_category_batch(
        &self,
        category_id: &str,
        order_by: &str,
        offset: usize,
        batch_size: usize,
    ) -> Result<SearchBatch, OtapiError> {
        self.search_items_frame(category_id, order_by, offset, batch_size)
            .await
    }

    async fn fetch_item_detail(&self, item_id: &str) -> Result<Option<RawProduct>, OtapiError> {
        self.item_full_info(item_id).await
    }
}
