/*
 * REST API module for the swap quote service
 */

mod rate_limit;

pub use rate_limit::RateLimiter;

use crate::models::{ErrorBody, ErrorResponse, QuoteError};
use crate::service::EstimateService;
use num_bigint::BigUint;
use rocket::figment::Figment;
use rocket::http::{ContentType, Status};
use rocket::request::{self, FromRequest, Outcome, Request};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{catch, catchers, get, routes, State};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub struct ApiState {
    pub estimate_service: Arc<EstimateService>,
    pub rate_limiter: RateLimiter,
}

/// Error wrapper mapping each error kind onto an HTTP status.
#[derive(Debug)]
pub struct ApiError(pub QuoteError);

impl From<QuoteError> for ApiError {
    fn from(e: QuoteError) -> Self {
        ApiError(e)
    }
}

#[must_use]
pub fn status_for(error: &QuoteError) -> Status {
    match error {
        QuoteError::Validation(_)
        | QuoteError::InsufficientLiquidity(_)
        | QuoteError::TokenPairMismatch { .. } => Status::BadRequest,
        QuoteError::NotFound(_) => Status::NotFound,
        QuoteError::ExternalService(_) => Status::BadGateway,
        QuoteError::Config(_) => Status::InternalServerError,
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = status_for(&self.0);
        let server_fault = status.code >= 500;

        if server_fault {
            error!(error = %self.0, path = %req.uri().path(), code = self.0.code(), "Request error");
        } else {
            debug!(error = %self.0, code = self.0.code(), "Request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.0.code().to_string(),
                message: self.0.message().to_string(),
                details: (!server_fault).then(|| self.0.to_string()),
            },
        };
        (status, Json(body)).respond_to(req)
    }
}

/// Request guard charging one request to the caller's rate limit budget.
pub struct RateLimitedClient(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RateLimitedClient {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let client = req
            .headers()
            .get_one("X-Forwarded-For")
            .map(|forwarded| forwarded.split(',').next().unwrap_or(forwarded).trim().to_string())
            .or_else(|| req.client_ip().map(|ip| ip.to_string()))
            .unwrap_or_else(|| "unknown".to_string());

        let Some(state) = req.rocket().state::<ApiState>() else {
            return Outcome::Success(RateLimitedClient(client));
        };

        if state.rate_limiter.check(&client) {
            Outcome::Success(RateLimitedClient(client))
        } else {
            warn!(client_ip = %client, path = %req.uri().path(), "Rate limit exceeded");
            Outcome::Error((Status::TooManyRequests, ()))
        }
    }
}

fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, QuoteError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| QuoteError::Validation(format!("{name} parameter is required")))
}

fn parse_amount(raw: &str) -> Result<BigUint, QuoteError> {
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QuoteError::Validation(
            "source amount must be a valid non-negative integer".to_string(),
        ));
    }
    raw.parse::<BigUint>().map_err(|e| {
        QuoteError::Validation(format!("source amount must be a valid number: {e}"))
    })
}

#[get("/estimate?<pool>&<src>&<dst>&<src_amount>")]
pub async fn estimate(
    pool: Option<&str>,
    src: Option<&str>,
    dst: Option<&str>,
    src_amount: Option<&str>,
    _client: RateLimitedClient,
    state: &State<ApiState>,
) -> Result<(ContentType, String), ApiError> {
    let started = Instant::now();

    let pool = required(pool, "pool")?;
    let src = required(src, "source token")?;
    let dst = required(dst, "destination token")?;
    let amount_in = parse_amount(required(src_amount, "source amount")?)?;

    let amount_out = state
        .estimate_service
        .estimate(pool, src, dst, &amount_in)
        .await?;

    info!(duration = ?started.elapsed(), "Estimate completed");
    Ok((ContentType::Plain, amount_out.to_string()))
}

#[get("/health")]
pub async fn health_check() -> &'static str {
    "OK"
}

#[catch(429)]
pub fn too_many_requests() -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: ErrorBody {
            code: "RATE_LIMIT_EXCEEDED".to_string(),
            message: "Rate limit exceeded".to_string(),
            details: None,
        },
    })
}

#[must_use]
pub fn create_rocket(state: ApiState, figment: Figment) -> rocket::Rocket<rocket::Build> {
    rocket::custom(figment)
        .manage(state)
        .mount("/", routes![estimate, health_check])
        .register("/", catchers![too_many_requests])
}
