use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::Result,
    models::profile::ProfileResponse,
    services::account as account_service,
    state::AppState,
    validation::lookup::{parse_lookup_request, validate_lookup_request},
};

/// Looks up the phone number and profile behind a session string.
///
/// The body is taken as raw bytes so that malformed or oversized bodies still
/// get the JSON failure envelope.
#[axum::debug_handler]
pub async fn get_phone_number(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let request_id = Uuid::new_v4();

    lookup(state, body)
        .instrument(tracing::info_span!("phone_lookup", %request_id))
        .await
}

async fn lookup(
    state: AppState,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Response> {
    let body = body?;
    let payload = parse_lookup_request(&body)?;
    let credentials = validate_lookup_request(payload)?;
    tracing::info!("📞 Lookup requested (api_id: {})", credentials.api_id());

    let profile =
        account_service::fetch_own_profile(state.accounts.as_ref(), &credentials).await?;

    tracing::info!("✅ Lookup completed for account: {}", profile.id);

    Ok((StatusCode::OK, Json(ProfileResponse::from(profile))).into_response())
}
