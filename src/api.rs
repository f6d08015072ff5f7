//! HTTP API over the engine, nested under `/api` by [`crate::web`].

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::aggregate::Selection;
use crate::catalog::{CatalogEntry, DEFAULT_COORDINATES};
use crate::config::DisplayOptions;
use crate::dashboard::Dashboard;
use crate::engine::Engine;
use crate::models::{Coordinates, DailyRisk, EnvironmentalProfile, ForecastSeries, RegionClass};

pub type AppState = Arc<Engine>;

#[derive(Debug, Default, Deserialize)]
pub struct RiskQuery {
    pub region: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastQuery {
    pub region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub region: Option<String>,
    pub date: Option<NaiveDate>,
    /// Overrides the configured historical fire layer
    pub historical_fires: Option<bool>,
    /// Overrides the configured NDVI layer
    pub ndvi_layer: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiRegion {
    pub name: String,
    pub class: RegionClass,
    pub coordinates: Option<Coordinates>,
}

impl From<&CatalogEntry> for ApiRegion {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            name: entry.name.clone(),
            class: entry.class,
            coordinates: entry.coordinates,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiRisk {
    pub subject: String,
    pub target_date: NaiveDate,
    pub risk: DailyRisk,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiProfile {
    pub region: String,
    pub coordinates: Coordinates,
    pub profile: EnvironmentalProfile,
}

pub fn router(engine: AppState) -> Router {
    Router::new()
        .route("/regions", get(get_regions))
        .route("/risk", get(get_risk))
        .route("/forecast", get(get_forecast))
        .route("/profile/{region}", get(get_profile))
        .route("/dashboard", get(get_dashboard))
        .with_state(engine)
}

fn resolve(engine: &Engine, region: Option<&str>) -> Result<Selection, StatusCode> {
    engine.selection(region).map_err(|e| {
        warn!("Cannot resolve region {:?}: {}", region, e);
        StatusCode::NOT_FOUND
    })
}

async fn get_regions(State(engine): State<AppState>) -> Json<Vec<ApiRegion>> {
    Json(engine.catalog().entries().map(ApiRegion::from).collect())
}

async fn get_risk(
    State(engine): State<AppState>,
    Query(query): Query<RiskQuery>,
) -> Result<Json<ApiRisk>, StatusCode> {
    let selection = resolve(&engine, query.region.as_deref())?;
    let target_date = query.date.unwrap_or_else(|| engine.aggregator().today());
    let risk = engine.aggregator().risk(&selection, target_date).await;

    Ok(Json(ApiRisk {
        subject: selection.name().to_string(),
        target_date,
        risk,
    }))
}

async fn get_forecast(
    State(engine): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastSeries>, StatusCode> {
    let selection = resolve(&engine, query.region.as_deref())?;
    Ok(Json(engine.aggregator().forecast(&selection).await))
}

async fn get_profile(
    State(engine): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<ApiProfile>, StatusCode> {
    let region = match resolve(&engine, Some(region.as_str()))? {
        Selection::Region(region) => region,
        Selection::Set(_) => return Err(StatusCode::BAD_REQUEST),
    };
    let profile = engine.aggregator().environment().profile(&region).await;

    Ok(Json(ApiProfile {
        coordinates: region.coordinates.unwrap_or(DEFAULT_COORDINATES),
        region: region.name,
        profile,
    }))
}

async fn get_dashboard(
    State(engine): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, StatusCode> {
    let selection = resolve(&engine, query.region.as_deref())?;
    let target_date = query.date.unwrap_or_else(|| engine.aggregator().today());

    let configured = engine.display();
    let options = DisplayOptions {
        show_historical_fires: query.historical_fires.unwrap_or(configured.show_historical_fires),
        show_ndvi_layer: query.ndvi_layer.unwrap_or(configured.show_ndvi_layer),
    };

    Ok(Json(
        Dashboard::build(engine.aggregator(), &selection, target_date, options).await,
    ))
}
