// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::error::{ApiError, ErrorResponse};
use crate::models::MessageResponse;
use crate::validation::ValidatedJson;
use crate::AppState;

/// Register a new user
/// POST /register
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse, example = json!({"message": "user registered"})),
        (status = 400, description = "Invalid body or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.auth.register(&request.email, &request.password).await?;

    tracing::info!("user registered: {}", request.email);
    Ok((StatusCode::CREATED, Json(MessageResponse::new("user registered"))))
}

/// Login a user
/// POST /login
#[utoipa::path(
    post,
    path = "/login",
    request_body(content = RegisterRequest, description = "Same credentials body as /register"),
    responses(
        (status = 200, description = "Signed access token", body = LoginResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse, example = json!({"code": "INVALID_CREDENTIALS", "message": "invalid credentials"}))
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let access_token = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(LoginResponse { access_token }))
}
