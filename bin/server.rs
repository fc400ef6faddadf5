// Rose Report - Web Server
// Serves the analysis report as JSON plus a browser dashboard

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use rose_report::{
    load_contestants, AnalysisReport, BucketStat, CensusClient, EnrichedRecord, Pipeline,
    StateIncomeRecord, DEFAULT_ACS_YEAR,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

const DEFAULT_CSV_PATH: &str = "data/bachelorette-contestants.csv";

/// Shared application state - the report is an immutable per-run snapshot
#[derive(Clone)]
struct AppState {
    report: Arc<AnalysisReport>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(data: T, message: &str) -> Self {
        Self {
            success: false,
            data,
            error: Some(message.to_string()),
        }
    }
}

/// Summary response
#[derive(Serialize)]
struct SummaryResponse {
    total_contestants: usize,
    week1_count: usize,
    seasons: usize,
    states_with_income: usize,
    generated_at: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/contestants - All contestants with joined income
async fn get_contestants(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.contestants.clone()))
}

/// GET /api/week1 - Contestants eliminated in week 1
async fn get_week1(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.report.week1_eliminations.clone()))
}

/// GET /api/rates/:scheme - Bucket stats for one scheme (state|age|income)
async fn get_rates(
    State(state): State<AppState>,
    Path(scheme): Path<String>,
) -> impl IntoResponse {
    let stats: Option<&Vec<BucketStat>> = match scheme.as_str() {
        "state" => Some(&state.report.by_state),
        "age" => Some(&state.report.by_age),
        "income" => Some(&state.report.by_income),
        _ => None,
    };

    match stats {
        Some(stats) => (StatusCode::OK, Json(ApiResponse::ok(stats.clone()))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(
                Vec::<BucketStat>::new(),
                "unknown scheme: expected state, age or income",
            )),
        )
            .into_response(),
    }
}

/// GET /api/state/:name - Contestants from one home state
async fn get_state_contestants(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    // Decode URL-encoded state names ("New%20York")
    let decoded_name = urlencoding::decode(&name)
        .unwrap_or_else(|_| name.clone().into())
        .into_owned();

    let matching: Vec<EnrichedRecord> = state
        .report
        .contestants
        .iter()
        .filter(|r| r.state() == Some(decoded_name.as_str()))
        .cloned()
        .collect();

    Json(ApiResponse::ok(matching))
}

/// GET /api/summary - Headline numbers for the dashboard
async fn get_summary(State(state): State<AppState>) -> impl IntoResponse {
    let report = &state.report;

    let seasons: HashSet<u32> = report.contestants.iter().map(|r| r.contestant.season).collect();
    let states_with_income = report
        .contestants
        .iter()
        .filter_map(|r| r.state().filter(|_| r.median_household_income.is_some()))
        .collect::<HashSet<_>>()
        .len();

    Json(ApiResponse::ok(SummaryResponse {
        total_contestants: report.contestants.len(),
        week1_count: report.week1_eliminations.len(),
        seasons: seasons.len(),
        states_with_income,
        generated_at: report.generated_at.to_rfc3339(),
    }))
}

/// GET / - Serve the dashboard page
async fn serve_index() -> impl IntoResponse {
    Html(include_str!("../web/index.html"))
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    println!("🌹 Rose Report - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let csv_path = std::env::var("CONTESTANTS_CSV")
        .unwrap_or_else(|_| DEFAULT_CSV_PATH.to_string());
    let csv_path = std::path::PathBuf::from(csv_path);

    if !csv_path.exists() {
        eprintln!("❌ Contestant CSV not found: {}", csv_path.display());
        eprintln!("   Set CONTESTANTS_CSV to point at the dataset.");
        std::process::exit(1);
    }

    let contestants = load_contestants(&csv_path).expect("Failed to load contestant CSV");
    println!("✓ Loaded {} contestants from {}", contestants.len(), csv_path.display());

    // The census client is blocking; keep it off the async runtime.
    let incomes = tokio::task::spawn_blocking(fetch_income_table)
        .await
        .expect("Income fetch task panicked");

    let pipeline = Pipeline::new().expect("Default bucket specs are invalid");
    let report = pipeline
        .run(&contestants, &incomes)
        .expect("Analysis pipeline failed");

    let state = AppState {
        report: Arc::new(report),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/contestants", get(get_contestants))
        .route("/week1", get(get_week1))
        .route("/rates/:scheme", get(get_rates))
        .route("/state/:name", get(get_state_contestants))
        .route("/summary", get(get_summary))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .nest_service("/static", ServeDir::new("web"))
        .layer(CorsLayer::permissive());

    // Start server
    let addr = "0.0.0.0:3000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:3000");
    println!("   API: http://localhost:3000/api/summary");
    println!("   UI:  http://localhost:3000");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

/// One Census API call at startup; without a key the dashboard runs
/// without income data.
fn fetch_income_table() -> Vec<StateIncomeRecord> {
    match std::env::var("CENSUS_API_KEY") {
        Ok(key) if !key.is_empty() => {
            let year = std::env::var("CENSUS_YEAR")
                .ok()
                .and_then(|y| y.parse().ok())
                .unwrap_or(DEFAULT_ACS_YEAR);

            println!("🌐 Fetching median household income (ACS5 {})...", year);
            match CensusClient::new(&key).fetch_state_incomes(year) {
                Ok(snapshot) => {
                    println!("✓ Income data for {} states", snapshot.records.len());
                    snapshot.records
                }
                Err(e) => {
                    eprintln!("⚠️  Census fetch failed: {} - continuing without income", e);
                    Vec::new()
                }
            }
        }
        _ => {
            eprintln!("⚠️  CENSUS_API_KEY not set - skipping income enrichment");
            Vec::new()
        }
    }
}
