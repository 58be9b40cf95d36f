//! AWS Lambda handler for scoring financial profiles
//!
//! Accepts a profile snapshot plus scoring options via JSON and returns the
//! full health report with the projection summary.
//!
//! Deployed behind an API Gateway proxy integration.

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::http::{HeaderMap, HeaderValue, Method};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

use retirement_planner::assumptions::InflationScenario;
use retirement_planner::scoring::{HealthReport, ScoreOptions};
use retirement_planner::{FinancialProfile, ScenarioRunner};

/// Input for one scoring call
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    /// The financial profile snapshot to score
    #[serde(default)]
    pub profile: FinancialProfile,

    /// Safe withdrawal rate, percent (default: 4%)
    #[serde(default = "default_withdrawal_rate")]
    pub withdrawal_rate_pct: f64,

    /// Inflation scenario for real-value figures (default: moderate)
    #[serde(default)]
    pub inflation_scenario: InflationScenario,

    /// Include the peer comparison block (default: true)
    #[serde(default = "default_peer_comparison")]
    pub peer_comparison: bool,

    /// Override the profile's country key
    #[serde(default)]
    pub country: Option<String>,
}

fn default_withdrawal_rate() -> f64 {
    4.0
}

fn default_peer_comparison() -> bool {
    true
}

/// Output from one scoring call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub report: HealthReport,
    pub execution_time_ms: u64,
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", HeaderValue::from_static("application/json"));
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type"),
    );
    headers
}

fn error_response(status: i64, message: &str) -> ApiGatewayProxyResponse {
    ApiGatewayProxyResponse {
        status_code: status,
        headers: cors_headers(),
        multi_value_headers: HeaderMap::new(),
        body: Some(Body::Text(format!(r#"{{"error":"{}"}}"#, message))),
        is_base64_encoded: false,
    }
}

fn json_response(body: &ScoreResponse) -> ApiGatewayProxyResponse {
    match serde_json::to_string(body) {
        Ok(json) => ApiGatewayProxyResponse {
            status_code: 200,
            headers: cors_headers(),
            multi_value_headers: HeaderMap::new(),
            body: Some(Body::Text(json)),
            is_base64_encoded: false,
        },
        Err(e) => error_response(500, &format!("Failed to serialize report: {}", e)),
    }
}

/// Lambda handler function
async fn handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let start = std::time::Instant::now();
    let (request, _context) = event.into_parts();

    // Handle CORS preflight
    if request.http_method == Method::OPTIONS {
        return Ok(ApiGatewayProxyResponse {
            status_code: 200,
            headers: cors_headers(),
            multi_value_headers: HeaderMap::new(),
            body: None,
            is_base64_encoded: false,
        });
    }

    // Parse request body; an empty body scores the default (empty) profile
    let body = request.body.unwrap_or_else(|| "{}".to_string());
    let score_request: ScoreRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => {
            return Ok(error_response(400, &format!("Invalid JSON: {}", e)));
        }
    };

    let mut profile = score_request.profile;
    if let Some(country) = score_request.country {
        profile.country = Some(country);
    }

    let runner = ScenarioRunner::new();
    let report = runner.score(
        &profile,
        ScoreOptions {
            peer_comparison: score_request.peer_comparison,
            withdrawal_rate_pct: score_request.withdrawal_rate_pct,
            inflation_scenario: score_request.inflation_scenario,
        },
    );

    let response = ScoreResponse {
        report,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    Ok(json_response(&response))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
