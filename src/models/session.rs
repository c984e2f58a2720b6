use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use validator::Validate;

#[derive(Deserialize, Debug, Validate, JsonSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct LoginResponse {
    pub authenticated: bool,
    /// Where the client should go next.
    pub redirect_to: String,
}

#[derive(Deserialize, Debug, JsonSchema)]
pub struct IdentityRequest {
    pub identity: String,
}

#[derive(Serialize, Debug, JsonSchema)]
pub struct IdentityResponse {
    pub identity: String,
}
