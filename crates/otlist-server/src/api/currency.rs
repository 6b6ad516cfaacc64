use axum::{extract::State, Json};
use otlist_rates::CurrencyRates;

use super::AppState;

/// Current CNY rates. Always 200: a dead feed yields the fallback table.
pub(super) async fn get_currency_rates(State(state): State<AppState>) -> Json<CurrencyRates> {
    let table = state.rates.rates().await;
    Json(CurrencyRates::from(&table))
}
