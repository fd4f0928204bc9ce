use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use engine::clock::SystemClock;
use engine::extract::{ingest_posts, RawPost};
use engine::graph::{build_co_occurrence_graph, finance_subgraph_stats, prune_graph_edges};
use engine::knowledge::seed::{finance_entity_stats, initialize_finance_entities};
use engine::knowledge::FinanceKnowledgeBase;
use engine::scoring::EngagementConfig;
use engine::sentiment::{aggregate_index_sentiment, aggregate_ticker_sentiment, plan_batch_aggregation};
use engine::store::DbStore;
use engine::EngineError;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::{get_db_connection, Config};
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

struct AppState {
    store: DbStore,
    kb: FinanceKnowledgeBase,
    clock: SystemClock,
    engagement: EngagementConfig,
    kb_version: i32,
}

type SharedState = Arc<AppState>;
type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<Json<T>, ApiError>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting TickerPulse API server...");

    let config = Config::from_env()?;
    let db = get_db_connection(&config.database_url).await?;
    info!("Connected to database");

    let state = Arc::new(AppState {
        store: DbStore::new(Arc::new(db)),
        kb: FinanceKnowledgeBase::with_nasdaq_defaults(),
        clock: SystemClock,
        engagement: EngagementConfig::default(),
        kb_version: config.kb_version,
    });

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/entities/initialize", post(initialize_entities))
        .route("/api/entities/stats", get(entity_stats))
        .route("/api/ingest/posts", post(ingest))
        .route("/api/sentiment/ticker", post(ticker_sentiment))
        .route("/api/sentiment/index", post(index_sentiment))
        .route("/api/sentiment/batch", post(batch_sentiment))
        .route("/api/graph/build", post(graph_build))
        .route("/api/graph/prune", post(graph_prune))
        .route("/api/graph/finance-stats", get(graph_finance_stats))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.api_bind_addr).await?;
    info!("API server listening on http://{}", config.api_bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn api_error(err: EngineError) -> ApiError {
    let status = match err {
        EngineError::InvalidGranularity(_) | EngineError::InvalidWindow(_) => {
            StatusCode::BAD_REQUEST
        }
        EngineError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

fn parse_granularity(s: &str) -> Result<shared::models::Granularity, ApiError> {
    shared::models::Granularity::from_str(s)
        .map_err(|e| api_error(EngineError::InvalidGranularity(e)))
}

#[derive(Deserialize)]
struct InitializeRequest {
    #[serde(default)]
    overwrite: bool,
}

async fn initialize_entities(
    State(state): State<SharedState>,
    Json(req): Json<InitializeRequest>,
) -> ApiResult<shared::models::SeedResult> {
    let result = initialize_finance_entities(
        &state.store,
        &state.clock,
        &state.kb,
        state.kb_version,
        req.overwrite,
    )
    .await
    .map_err(api_error)?;
    Ok(Json(result))
}

async fn entity_stats(State(state): State<SharedState>) -> ApiResult<shared::models::EntityStats> {
    let stats = finance_entity_stats(&state.store).await.map_err(api_error)?;
    Ok(Json(stats))
}

#[derive(Deserialize)]
struct IngestRequest {
    posts: Vec<RawPost>,
}

async fn ingest(
    State(state): State<SharedState>,
    Json(req): Json<IngestRequest>,
) -> ApiResult<shared::models::IngestResult> {
    let result = ingest_posts(&state.store, &state.kb, &state.engagement, &req.posts)
        .await
        .map_err(api_error)?;
    Ok(Json(result))
}

#[derive(Deserialize)]
struct TickerRequest {
    ticker: String,
    interval_start: i64,
    granularity: String,
}

async fn ticker_sentiment(
    State(state): State<SharedState>,
    Json(req): Json<TickerRequest>,
) -> ApiResult<shared::models::TickerAggregation> {
    let granularity = parse_granularity(&req.granularity)?;
    let result = aggregate_ticker_sentiment(
        &state.store,
        &state.clock,
        &req.ticker,
        req.interval_start,
        granularity,
    )
    .await
    .map_err(api_error)?;
    Ok(Json(result))
}

#[derive(Deserialize)]
struct IndexRequest {
    timestamp: i64,
    granularity: String,
    tickers: Option<Vec<String>>,
}

async fn index_sentiment(
    State(state): State<SharedState>,
    Json(req): Json<IndexRequest>,
) -> ApiResult<shared::models::IndexAggregation> {
    let granularity = parse_granularity(&req.granularity)?;
    let result = aggregate_index_sentiment(
        &state.store,
        &state.clock,
        &state.kb,
        req.timestamp,
        granularity,
        req.tickers.as_deref(),
    )
    .await
    .map_err(api_error)?;
    Ok(Json(result))
}

#[derive(Deserialize)]
struct BatchRequest {
    tickers: Vec<String>,
    start_time: i64,
    end_time: i64,
    granularity: String,
}

async fn batch_sentiment(
    State(_state): State<SharedState>,
    Json(req): Json<BatchRequest>,
) -> ApiResult<shared::models::BatchPlan> {
    let granularity = parse_granularity(&req.granularity)?;
    let plan = plan_batch_aggregation(&req.tickers, req.start_time, req.end_time, granularity)
        .map_err(api_error)?;
    Ok(Json(plan))
}

#[derive(Deserialize)]
struct GraphBuildRequest {
    window_start: i64,
    window_length_ms: i64,
    min_co_occurrence: Option<u64>,
    max_edges_per_node: Option<usize>,
}

async fn graph_build(
    State(state): State<SharedState>,
    Json(req): Json<GraphBuildRequest>,
) -> ApiResult<shared::models::GraphBuildResult> {
    let result = build_co_occurrence_graph(
        &state.store,
        &state.clock,
        req.window_start,
        req.window_length_ms,
        req.min_co_occurrence,
        req.max_edges_per_node,
    )
    .await
    .map_err(api_error)?;
    Ok(Json(result))
}

#[derive(Deserialize)]
struct PruneRequest {
    min_strength: f64,
    min_co_occurrence: u64,
    older_than_ms: Option<i64>,
}

async fn graph_prune(
    State(state): State<SharedState>,
    Json(req): Json<PruneRequest>,
) -> ApiResult<shared::models::PruneResult> {
    let result = prune_graph_edges(
        &state.store,
        req.min_strength,
        req.min_co_occurrence,
        req.older_than_ms,
    )
    .await
    .map_err(api_error)?;
    Ok(Json(result))
}

#[derive(Deserialize)]
struct FinanceStatsQuery {
    window_start: i64,
    min_finance_relevance: Option<f64>,
}

async fn graph_finance_stats(
    State(state): State<SharedState>,
    Query(query): Query<FinanceStatsQuery>,
) -> ApiResult<shared::models::FinanceSubgraphStats> {
    let stats = finance_subgraph_stats(
        &state.store,
        query.window_start,
        query.min_finance_relevance.unwrap_or(0.5),
    )
    .await
    .map_err(api_error)?;
    Ok(Json(stats))
}
