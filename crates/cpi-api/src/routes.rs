//! # Wizard Session Routes
//!
//! Session lifecycle endpoints. Handlers hold no business logic: every
//! operation delegates to the wizard, and the wizard's errors map to
//! HTTP responses through [`crate::error::AppError`].

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cpi_core::{CompanyId, UserRole};
use cpi_form::{FieldValue, FormState, ListSection};
use cpi_submit::rows::CompanyRow;
use cpi_submit::{submit_profile, SubmitMode};
use cpi_wizard::Wizard;

use crate::error::AppError;
use crate::state::{AppState, Session};

/// Role header checked when opening a session.
const ROLE_HEADER: &str = "x-intake-role";

// ─── Request / Response Types ────────────────────────────────────────

/// Session-open request.
#[derive(Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OpenSessionRequest {
    /// New company intake.
    Create,
    /// Edit an existing company. When no initial state is supplied the
    /// company row's scalar attributes are prefilled and the lists
    /// start from seeded defaults.
    Edit {
        company_id: Uuid,
        initial_state: Option<FormState>,
    },
}

/// Field update on the scalar company attributes.
#[derive(Debug, Deserialize)]
pub struct CompanyFieldRequest {
    pub field: String,
    pub value: FieldValue,
}

/// Field update on one row of a list section.
#[derive(Debug, Deserialize)]
pub struct ListFieldRequest {
    pub section: ListSection,
    pub index: usize,
    pub field: String,
    pub value: FieldValue,
}

/// Field update on one investor row of a funding round.
#[derive(Debug, Deserialize)]
pub struct InvestorFieldRequest {
    pub round: usize,
    pub index: usize,
    pub field: String,
    pub value: FieldValue,
}

/// Row-level list operation.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RowRequest {
    Add { section: ListSection },
    Remove { section: ListSection, index: usize },
}

/// Investor-row operation within a funding round.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InvestorRowRequest {
    Add { round: usize },
    Remove { round: usize, index: usize },
}

/// Full session view returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub mode: &'static str,
    pub company_id: Option<Uuid>,
    pub step: u8,
    pub step_name: String,
    pub phase: String,
    pub field_errors: BTreeMap<String, String>,
    pub submission_error: Option<String>,
    pub state: FormState,
}

impl SessionView {
    fn of(session: &Session) -> Self {
        Self {
            mode: if session.company_id().is_some() {
                "edit"
            } else {
                "create"
            },
            company_id: session.company_id().map(|id| *id.as_uuid()),
            step: session.step().number(),
            step_name: session.step().to_string(),
            phase: session.phase().to_string(),
            field_errors: session.field_errors().clone(),
            submission_error: session.submission_error().map(str::to_string),
            state: session.state().clone(),
        }
    }
}

/// Session-open response.
#[derive(Debug, Serialize)]
pub struct OpenSessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub view: SessionView,
}

/// Navigation response.
#[derive(Debug, Serialize)]
pub struct NavigateResponse {
    pub advanced: bool,
    #[serde(flatten)]
    pub view: SessionView,
}

/// Submission response.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub company_id: Uuid,
    pub child_rows: usize,
    #[serde(flatten)]
    pub view: SessionView,
}

// ─── Handlers ────────────────────────────────────────────────────────

/// POST /v1/profiles/sessions — open a wizard session (role-gated).
pub async fn open_session(
    State(app): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<OpenSessionRequest>,
) -> Result<Json<OpenSessionResponse>, AppError> {
    require_modify_role(&headers)?;

    let session = match request {
        OpenSessionRequest::Create => Wizard::create(Arc::clone(&app.drafts))?,
        OpenSessionRequest::Edit {
            company_id,
            initial_state,
        } => {
            let company_id = CompanyId(company_id);
            let initial = match initial_state {
                Some(state) => state,
                None => {
                    let row = app
                        .store
                        .fetch_company(company_id)
                        .await
                        .map_err(|e| AppError::Internal(e.to_string()))?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("company {company_id} not found"))
                        })?;
                    prefill_from_row(&row)
                }
            };
            Wizard::edit(company_id, initial, Arc::clone(&app.drafts))?
        }
    };

    let session_id = Uuid::new_v4();
    let view = SessionView::of(&session);
    app.sessions.write().await.insert(session_id, session);
    tracing::info!(%session_id, "wizard session opened");
    Ok(Json(OpenSessionResponse { session_id, view }))
}

/// GET /v1/profiles/sessions/{id} — inspect a session.
pub async fn get_session(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let sessions = app.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))?;
    Ok(Json(SessionView::of(session)))
}

/// DELETE /v1/profiles/sessions/{id} — abandon a session and its draft.
pub async fn close_session(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut sessions = app.sessions.write().await;
    let mut session = sessions
        .remove(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))?;
    session.discard()?;
    Ok(Json(serde_json::json!({ "closed": true })))
}

/// POST /v1/profiles/sessions/{id}/company-fields
pub async fn set_company_field(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompanyFieldRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut sessions = app.sessions.write().await;
    let session = lookup(&mut sessions, id)?;
    session.set_company_field(&request.field, &request.value)?;
    Ok(Json(SessionView::of(session)))
}

/// POST /v1/profiles/sessions/{id}/list-fields
pub async fn set_list_field(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ListFieldRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut sessions = app.sessions.write().await;
    let session = lookup(&mut sessions, id)?;
    session.set_list_field(request.section, request.index, &request.field, &request.value)?;
    Ok(Json(SessionView::of(session)))
}

/// POST /v1/profiles/sessions/{id}/investor-fields
pub async fn set_investor_field(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<InvestorFieldRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut sessions = app.sessions.write().await;
    let session = lookup(&mut sessions, id)?;
    session.set_investor_field(request.round, request.index, &request.field, &request.value)?;
    Ok(Json(SessionView::of(session)))
}

/// POST /v1/profiles/sessions/{id}/rows
pub async fn modify_rows(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RowRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut sessions = app.sessions.write().await;
    let session = lookup(&mut sessions, id)?;
    match request {
        RowRequest::Add { section } => session.add_row(section)?,
        RowRequest::Remove { section, index } => session.remove_row(section, index)?,
    }
    Ok(Json(SessionView::of(session)))
}

/// POST /v1/profiles/sessions/{id}/investors
pub async fn modify_investors(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<InvestorRowRequest>,
) -> Result<Json<SessionView>, AppError> {
    let mut sessions = app.sessions.write().await;
    let session = lookup(&mut sessions, id)?;
    match request {
        InvestorRowRequest::Add { round } => session.add_investor(round)?,
        InvestorRowRequest::Remove { round, index } => session.remove_investor(round, index)?,
    }
    Ok(Json(SessionView::of(session)))
}

/// POST /v1/profiles/sessions/{id}/next
pub async fn next_step(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NavigateResponse>, AppError> {
    let mut sessions = app.sessions.write().await;
    let session = lookup(&mut sessions, id)?;
    let advanced = session.next()?;
    Ok(Json(NavigateResponse {
        advanced,
        view: SessionView::of(session),
    }))
}

/// POST /v1/profiles/sessions/{id}/previous
pub async fn previous_step(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NavigateResponse>, AppError> {
    let mut sessions = app.sessions.write().await;
    let session = lookup(&mut sessions, id)?;
    session.previous()?;
    Ok(Json(NavigateResponse {
        advanced: true,
        view: SessionView::of(session),
    }))
}

/// POST /v1/profiles/sessions/{id}/submit
pub async fn submit(
    State(app): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitResponse>, AppError> {
    let mut sessions = app.sessions.write().await;
    let session = lookup(&mut sessions, id)?;
    let mode = match session.company_id() {
        Some(company) => SubmitMode::Edit(company),
        None => SubmitMode::Create,
    };
    let store = Arc::clone(&app.store);
    let assets = Arc::clone(&app.assets);
    let outcome = session
        .submit(|state| async move {
            submit_profile(store.as_ref(), assets.as_ref(), mode, &state).await
        })
        .await?;
    Ok(Json(SubmitResponse {
        company_id: *outcome.company_id.as_uuid(),
        child_rows: outcome.child_rows,
        view: SessionView::of(session),
    }))
}

// ─── Helpers ─────────────────────────────────────────────────────────

fn lookup(
    sessions: &mut std::collections::HashMap<Uuid, Session>,
    id: Uuid,
) -> Result<&mut Session, AppError> {
    sessions
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))
}

/// The wizard's very first gate: only a role granted create, update,
/// and delete may open a session at all.
fn require_modify_role(headers: &HeaderMap) -> Result<UserRole, AppError> {
    let raw = headers
        .get(ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized(format!("missing {ROLE_HEADER} header")))?;
    let role = UserRole::from_name(raw)
        .ok_or_else(|| AppError::Unauthorized(format!("unknown role {raw:?}")))?;
    if !role.can_modify() {
        return Err(AppError::Forbidden(format!(
            "role {role} is not permitted to modify company profiles"
        )));
    }
    Ok(role)
}

/// Edit-mode bootstrap from a bare company row: scalar attributes are
/// prefilled, lists start from seeded defaults.
fn prefill_from_row(row: &CompanyRow) -> FormState {
    let mut state = FormState::new();
    let company = &mut state.company;
    company.name = row.name.clone();
    company.registration_number = row.registration_number.clone().unwrap_or_default();
    company.tax_number = row.tax_number.clone().unwrap_or_default();
    company.sector = row.sector.clone().unwrap_or_default();
    company.industry = row.industry.clone().unwrap_or_default();
    company.company_status = row.company_status.clone().unwrap_or_default();
    company.founded_date = row
        .founded_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    company.website = row.website.clone().unwrap_or_default();
    company.email = row.email.clone().unwrap_or_default();
    company.phone = row.phone.clone().unwrap_or_default();
    company.description = row.description.clone().unwrap_or_default();
    company.is_listed = row.is_listed;
    company.stock_exchange = row.stock_exchange.clone().unwrap_or_default();
    company.ticker_symbol = row.ticker_symbol.clone().unwrap_or_default();
    company.employee_count = row
        .employee_count
        .map(|n| n.to_string())
        .unwrap_or_default();
    state
}
