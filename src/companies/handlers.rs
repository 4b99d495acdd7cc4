// HTTP handlers for company endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::companies::models::{Company, CompanyInput, CompanyRequest};
use crate::companies::service::parse_id;
use crate::error::{ApiError, ErrorResponse};
use crate::events::models::{Event, EventType};
use crate::models::MessageResponse;
use crate::validation::{decode, ValidatedJson};
use crate::AppState;

/// Handler for GET /company/{id}
#[utoipa::path(
    get,
    path = "/company/{id}",
    params(
        ("id" = String, Path, description = "Company UUID")
    ),
    responses(
        (status = 200, description = "Company found", body = Company),
        (status = 400, description = "Invalid id or company not found", body = ErrorResponse, example = json!({"code": "INVALID_UUID", "message": "invalid UUID 'abc'"})),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "companies"
)]
pub async fn get_company_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Company>, ApiError> {
    let company = state.companies.get_by_id(&id).await?;
    Ok(Json(company))
}

/// Handler for POST /company/create
/// Creates a company and schedules a `company.created` event
#[utoipa::path(
    post,
    path = "/company/create",
    request_body = CompanyRequest,
    responses(
        (status = 200, description = "Company created", body = Company),
        (status = 400, description = "Invalid body or missing token", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn create_company_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<CompanyRequest>,
) -> Result<Json<Company>, ApiError> {
    let input = CompanyInput::try_from(request)?;
    let company = state.companies.create(input).await?;

    tracing::info!("company created: {} by user {}", company.id, user.user_id);
    state
        .dispatcher
        .spawn(Event::new(EventType::CompanyCreated, company.id));

    Ok(Json(company))
}

/// Handler for PUT /company/{id}
/// Replaces every field of the company
#[utoipa::path(
    put,
    path = "/company/{id}",
    params(
        ("id" = String, Path, description = "Company UUID")
    ),
    request_body = CompanyRequest,
    responses(
        (status = 200, description = "Company updated", body = MessageResponse, example = json!({"message": "company updated"})),
        (status = 400, description = "Invalid id, invalid body or company not found", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn update_company_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<MessageResponse>, ApiError> {
    // The id is checked before the body is bound
    parse_id(&id)?;
    let input = CompanyInput::try_from(decode::<CompanyRequest>(&body)?)?;
    let company = state.companies.update(&id, input).await?;

    tracing::info!("company updated: {}", company.id);
    state
        .dispatcher
        .spawn(Event::new(EventType::CompanyUpdated, company.id));

    Ok(Json(MessageResponse::new("company updated")))
}

/// Handler for DELETE /company/{id}
#[utoipa::path(
    delete,
    path = "/company/{id}",
    params(
        ("id" = String, Path, description = "Company UUID")
    ),
    responses(
        (status = 200, description = "Company deleted", body = MessageResponse, example = json!({"message": "company deleted"})),
        (status = 400, description = "Invalid id or company not found", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "companies"
)]
pub async fn delete_company_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = state.companies.delete(&id).await?;

    tracing::info!("company deleted: {}", id);
    state
        .dispatcher
        .spawn(Event::new(EventType::CompanyDeleted, id));

    Ok(Json(MessageResponse::new("company deleted")))
}

/// Fallback for `/company/` with the id segment left out
pub async fn missing_company_id_handler() -> ApiError {
    ApiError::CompanyIdRequired
}
