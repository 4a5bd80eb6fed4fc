//! Route handlers of the internal API.

use axum::{
    body::Bytes,
    extract::State,
    Extension, Json,
};
use serde::de::DeserializeOwned;

use super::models::{AddressesResponse, GeocodeRequest, SearchRequest, TokenResponse, UserRequest};
use super::ApiState;
use crate::auth::Claims;
use crate::error::{ApiError, ApiResult};
use crate::geocoding::GeocodeQuery;

/// Liveness probe.
pub async fn hello() -> &'static str {
    "Hello from API"
}

pub async fn search(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    body: Bytes,
) -> ApiResult<Json<AddressesResponse>> {
    let request: SearchRequest = read_body(&body, "Search")?;
    tracing::debug!(subject = %claims.sub, "Address search");
    lookup(&state, request.into()).await
}

pub async fn geocode(
    State(state): State<ApiState>,
    Extension(claims): Extension<Claims>,
    body: Bytes,
) -> ApiResult<Json<AddressesResponse>> {
    let request: GeocodeRequest = read_body(&body, "geoCode")?;
    tracing::debug!(subject = %claims.sub, "Reverse geocode");
    lookup(&state, request.into()).await
}

pub async fn login(State(state): State<ApiState>, body: Bytes) -> ApiResult<Json<TokenResponse>> {
    let request: UserRequest = read_body(&body, "userRequest")?;
    let credential = state.users.verify(&request.login, &request.password).await?;
    issue_token(&state, &credential.login)
}

pub async fn register(State(state): State<ApiState>, body: Bytes) -> ApiResult<Json<TokenResponse>> {
    let request: UserRequest = read_body(&body, "userRequest")?;
    let credential = state.users.register(&request.login, &request.password).await?;
    issue_token(&state, &credential.login)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

async fn lookup(state: &ApiState, query: GeocodeQuery) -> ApiResult<Json<AddressesResponse>> {
    let addresses = state.geocoder.lookup(&query).await?;
    Ok(Json(AddressesResponse { addresses }))
}

fn issue_token(state: &ApiState, login: &str) -> ApiResult<Json<TokenResponse>> {
    let token = state.tokens.issue(login)?;
    Ok(Json(TokenResponse::bearer(&token)))
}

/// Decode the first JSON value of a body, naming the body kind in the error.
/// Anything after that value is ignored.
fn read_body<T: DeserializeOwned>(body: &[u8], kind: &str) -> ApiResult<T> {
    let bad_request = |detail: String| ApiError::BadRequest(format!("error read body {kind}: {detail}"));
    match serde_json::Deserializer::from_slice(body).into_iter::<T>().next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(bad_request(e.to_string())),
        None => Err(bad_request("EOF".to_string())),
    }
}
