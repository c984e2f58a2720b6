use crate::error::app_error::AppError;
use crate::error::json::JsonBody;
use crate::models::session::{IdentityRequest, IdentityResponse, LoginRequest, LoginResponse};
use crate::service::auth::{LoginOutcome, SessionGate};
use crate::state::AppState;
use rocket::serde::json::Json;
use rocket::{State, get, post, put};
use rocket_okapi::openapi;

/// Submit the login form.
///
/// Any well-formed email and non-empty password is accepted; there is no credential store.
#[openapi(tag = "Session")]
#[post("/login", data = "<payload>")]
pub async fn post_login(state: &State<AppState>, payload: JsonBody<LoginRequest>) -> Result<Json<LoginResponse>, AppError> {
    let LoginOutcome::Authenticated { redirect_to } = SessionGate::new(state.expenses_path()).submit(&payload)?;
    Ok(Json(LoginResponse {
        authenticated: true,
        redirect_to,
    }))
}

#[openapi(tag = "Session")]
#[get("/identity")]
pub async fn get_identity(state: &State<AppState>) -> Result<Json<IdentityResponse>, AppError> {
    let manager = state.manager()?;
    Ok(Json(IdentityResponse {
        identity: manager.current_user().to_string(),
    }))
}

/// Replace the session identity; it is written to durable storage immediately.
#[openapi(tag = "Session")]
#[put("/identity", data = "<payload>")]
pub async fn put_identity(state: &State<AppState>, payload: JsonBody<IdentityRequest>) -> Result<Json<IdentityResponse>, AppError> {
    let mut manager = state.manager()?;
    manager.set_identity(&payload.identity)?;
    Ok(Json(IdentityResponse {
        identity: manager.current_user().to_string(),
    }))
}

pub fn routes() -> (Vec<rocket::Route>, okapi::openapi3::OpenApi) {
    rocket_okapi::openapi_get_routes_spec![post_login, get_identity, put_identity]
}
