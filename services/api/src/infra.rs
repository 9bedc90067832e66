use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use wheel_of_life::assessment::{Category, Rating};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Parse a `category=rating` pair such as `health=7`.
pub(crate) fn parse_rating_pair(raw: &str) -> Result<(Category, Rating), String> {
    let (category, rating) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=RATING, got '{raw}'"))?;

    let category: Category = category.parse().map_err(|err| format!("{err}"))?;
    let rating: Rating = rating.parse().map_err(|err| format!("{err}"))?;
    Ok((category, rating))
}
