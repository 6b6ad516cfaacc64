use std::time::Duration;

use crate::categories::{CategoryEnvelope, CategoryShape};
use crate::error::OtapiError;
use crate::types::CategoryListResponse;

use super::{decode, OtapiSession};

impl OtapiSession<'_> {
    /// Top-level categories, hidden ones removed.
    ///
    /// # Errors
    ///
    /// Transport, status, and decoding failures; an upstream error code is
    /// reported inside the envelope instead.
    pub async fn root_categories(&self) -> Result<CategoryEnvelope, OtapiError> {
        self.category_call(
            "GetRootCategoryInfoList",
            &[],
            self.client.timeouts.search,
            CategoryShape::Visible,
        )
        .await
    }

    /// Direct children of `parent_id`, hidden ones removed.
    ///
    /// # Errors
    ///
    /// See [`OtapiSession::root_categories`].
    pub async fn subcategories(&self, parent_id: &str) -> Result<CategoryEnvelope, OtapiError> {
        self.category_call(
            "GetCategorySubcategoryInfoList",
            &[("parentCategoryId", parent_id)],
            self.client.timeouts.search,
            CategoryShape::Visible,
        )
        .await
    }

    /// Roots and their first level of children in one call.
    ///
    /// # Errors
    ///
    /// See [`OtapiSession::root_categories`].
    pub async fn category_tree(&self) -> Result<CategoryEnvelope, OtapiError> {
        self.category_call(
            "GetTwoLevelRootCategoryInfoList",
            &[],
            self.client.timeouts.search,
            CategoryShape::Tree,
        )
        .await
    }

    /// Breadcrumb from the root down to `category_id`.
    ///
    /// # Errors
    ///
    /// See [`OtapiSession::root_categories`].
    pub async fn category_root_path(
        &self,
        category_id: &str,
    ) -> Result<CategoryEnvelope, OtapiError> {
        self.category_call(
            "GetCategoryRootPath",
            &[("categoryId", category_id)],
            self.client.timeouts.path,
            CategoryShape::Path,
        )
        .await
    }

    /// Breadcrumb of the category an item is listed under.
    ///
    /// # Errors
    ///
    /// See [`OtapiSession::root_categories`].
    pub async fn item_root_path(
        &self,
        item_id: &str,
        taobao_category_id: Option<&str>,
    ) -> Result<CategoryEnvelope, OtapiError> {
        let mut params = vec![("itemId", item_id)];
        if let Some(category) = taobao_category_id {
            params.push(("taoBaoCategoryId", category));
        }
        self.category_call(
            "GetItemRootPath",
            &params,
            self.client.timeouts.path,
            CategoryShape::Path,
        )
        .await
    }

    async fn category_call(
        &self,
        operation: &str,
        params: &[(&str, &str)],
        timeout: Duration,
        shape: CategoryShape,
    ) -> Result<CategoryEnvelope, OtapiError> {
        let url = self.client.build_url(operation, self, params)?;
        let body = self
            .client
            .request_json_with_retry(operation, &url, timeout)
            .await?;
        let response: CategoryListResponse = decode(operation, body)?;
        if !response.error_code.is_success() {
            tracing::warn!(
                operation,
                error_code = %response.error_code,
                "category call returned an error code"
            );
        }
        Ok(CategoryEnvelope::from_response(response, shape))
    }
}
