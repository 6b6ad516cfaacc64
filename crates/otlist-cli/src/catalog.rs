//! Listing, item, and navigation commands. Each one runs the same library
//! operation the HTTP server exposes and prints the JSON body it would
//! return.

use anyhow::Context;
use otlist_core::AppConfig;
use otlist_otapi::{
    get_single_item_detail, list_category_products, ListingParams, OtapiClient,
    SearchOrchestrator,
};
use otlist_rates::RateCache;
use serde::Serialize;
use uuid::Uuid;

/// Access key and language resolved from flags and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Access {
    instance_key: Option<String>,
    language: String,
}

impl Access {
    /// Flags win over configuration; blank flags count as absent.
    pub(crate) fn resolve(
        config: &AppConfig,
        instance_key: Option<String>,
        language: Option<String>,
    ) -> Self {
        Self::with_defaults(
            instance_key,
            language,
            config.otapi_instance_key.as_deref(),
            &config.otapi_default_language,
        )
    }

    fn with_defaults(
        instance_key: Option<String>,
        language: Option<String>,
        default_key: Option<&str>,
        default_language: &str,
    ) -> Self {
        let instance_key = instance_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| default_key.map(str::to_owned));
        let language = language
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| default_language.to_owned());
        Self {
            instance_key,
            language,
        }
    }

    fn key(&self) -> anyhow::Result<&str> {
        self.instance_key
            .as_deref()
            .context("an instance key is required: pass --instance-key or set OTAPI_INSTANCE_KEY")
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_client(config: &AppConfig) -> anyhow::Result<OtapiClient> {
    OtapiClient::from_config(config).context("failed to build OTAPI client")
}

pub(crate) async fn run_list(
    config: &AppConfig,
    access: Access,
    category: &str,
    sort: &str,
    page_size: usize,
) -> anyhow::Result<()> {
    let request = ListingParams {
        category_id: Some(category.to_owned()),
        access_key: access.instance_key.clone(),
        sort_type: Some(sort.to_owned()),
        page_size: Some(page_size),
        language: Some(access.language.clone()),
    }
    .validate(&config.otapi_default_language)?;

    let client = build_client(config)?;
    let rates = RateCache::from_config(config)?;
    let orchestrator = SearchOrchestrator::new(client.timeouts().detail);
    let session = client.session(&request.access_key, &request.language);

    let envelope = list_category_products(
        &session,
        &rates,
        &orchestrator,
        &request,
        Uuid::new_v4().to_string(),
    )
    .await?;
    tracing::info!(
        returned = envelope.content.len(),
        total_count = envelope.total_count,
        "listing complete"
    );
    print_json(&envelope)
}

pub(crate) async fn run_item(config: &AppConfig, access: Access, id: &str) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let rates = RateCache::from_config(config)?;
    let session = client.session(access.key()?, &access.language);

    match get_single_item_detail(&session, &rates, id).await? {
        Some(product) => print_json(&product),
        None => anyhow::bail!("item {id} not found"),
    }
}

pub(crate) async fn run_tree(
    config: &AppConfig,
    access: Access,
    parent: Option<&str>,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let session = client.session(access.key()?, &access.language);

    let envelope = match parent {
        Some(parent_id) => session.subcategories(parent_id).await?,
        None => session.category_tree().await?,
    };
    if !envelope.error_code.is_success() {
        tracing::warn!(
            error_code = %envelope.error_code,
            description = envelope.error_description.as_deref().unwrap_or_default(),
            "category lookup returned an error code"
        );
    }
    print_json(&envelope)
}
