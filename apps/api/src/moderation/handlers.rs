use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::identity::resolve_actor;
use crate::models::flag::{FlagKind, FlagRow, FlagStatus};
use crate::models::report::{ReportRow, ReportStatus, ReportTargetType};
use crate::moderation::flags::{
    list_flags, resolve_flag, submit_flag, FlagFilter, FlagSubmission,
};
use crate::moderation::reports::{
    list_reports, resolve_report, submit_report, ReportFilter, ReportSubmission,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitFlagRequest {
    pub actor_id: Uuid,
    pub kind: FlagKind,
    pub target_ref: String,
    pub reason: String,
    pub description: String,
    pub evidence_ref: Option<String>,
}

/// POST /api/v1/flags
pub async fn handle_submit_flag(
    State(state): State<AppState>,
    Json(req): Json<SubmitFlagRequest>,
) -> Result<Json<FlagRow>, AppError> {
    let actor = resolve_actor(&state.db, req.actor_id).await?;
    let flag = submit_flag(
        &state.db,
        &actor,
        FlagSubmission {
            kind: req.kind,
            target_ref: req.target_ref,
            reason: req.reason,
            description: req.description,
            evidence_ref: req.evidence_ref,
        },
        Utc::now(),
    )
    .await?;
    Ok(Json(flag))
}

/// Flag outcomes a moderator may select. Deserialization rules out `Pending`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagResolution {
    Approved,
    Rejected,
}

impl FlagResolution {
    fn status(self) -> FlagStatus {
        match self {
            FlagResolution::Approved => FlagStatus::Approved,
            FlagResolution::Rejected => FlagStatus::Rejected,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveFlagRequest {
    pub actor_id: Uuid,
    pub outcome: FlagResolution,
    pub note: Option<String>,
}

/// POST /api/v1/flags/:id/resolve
pub async fn handle_resolve_flag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResolveFlagRequest>,
) -> Result<Json<FlagRow>, AppError> {
    let actor = resolve_actor(&state.db, req.actor_id).await?;
    let flag = resolve_flag(
        &state.db,
        &actor,
        id,
        req.outcome.status(),
        req.note,
        Utc::now(),
    )
    .await?;
    Ok(Json(flag))
}

#[derive(Debug, Deserialize)]
pub struct FlagListQuery {
    pub status: Option<String>,
    pub kind: Option<String>,
    pub target_ref: Option<String>,
}

/// GET /api/v1/flags
pub async fn handle_list_flags(
    State(state): State<AppState>,
    Query(params): Query<FlagListQuery>,
) -> Result<Json<Vec<FlagRow>>, AppError> {
    let status = params
        .status
        .map(|s| {
            FlagStatus::parse(&s)
                .ok_or_else(|| AppError::Validation(format!("Unknown flag status '{s}'")))
        })
        .transpose()?;
    let kind = params
        .kind
        .map(|k| {
            FlagKind::parse(&k)
                .ok_or_else(|| AppError::Validation(format!("Unknown flag kind '{k}'")))
        })
        .transpose()?;

    let flags = list_flags(
        &state.db,
        &FlagFilter {
            status,
            kind,
            target_ref: params.target_ref,
        },
    )
    .await?;
    Ok(Json(flags))
}

#[derive(Debug, Deserialize)]
pub struct SubmitReportRequest {
    pub actor_id: Uuid,
    pub target_type: ReportTargetType,
    pub target_id: String,
    pub reason: String,
}

/// POST /api/v1/reports
pub async fn handle_submit_report(
    State(state): State<AppState>,
    Json(req): Json<SubmitReportRequest>,
) -> Result<Json<ReportRow>, AppError> {
    let actor = resolve_actor(&state.db, req.actor_id).await?;
    let report = submit_report(
        &state.db,
        &actor,
        ReportSubmission {
            target_type: req.target_type,
            target_id: req.target_id,
            reason: req.reason,
        },
        Utc::now(),
    )
    .await?;
    Ok(Json(report))
}

/// Report outcomes a moderator may select.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportResolution {
    Resolved,
    Dismissed,
}

impl ReportResolution {
    fn status(self) -> ReportStatus {
        match self {
            ReportResolution::Resolved => ReportStatus::Resolved,
            ReportResolution::Dismissed => ReportStatus::Dismissed,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveReportRequest {
    pub actor_id: Uuid,
    pub outcome: ReportResolution,
    pub note: Option<String>,
}

/// POST /api/v1/reports/:id/resolve
pub async fn handle_resolve_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResolveReportRequest>,
) -> Result<Json<ReportRow>, AppError> {
    let actor = resolve_actor(&state.db, req.actor_id).await?;
    let report = resolve_report(
        &state.db,
        &actor,
        id,
        req.outcome.status(),
        req.note,
        Utc::now(),
        state.config.takedown_threshold,
        state.notifier.clone(),
    )
    .await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct ReportListQuery {
    pub status: Option<String>,
    pub target_type: Option<String>,
    pub target_id: Option<String>,
}

/// GET /api/v1/reports
pub async fn handle_list_reports(
    State(state): State<AppState>,
    Query(params): Query<ReportListQuery>,
) -> Result<Json<Vec<ReportRow>>, AppError> {
    let status = params
        .status
        .map(|s| {
            ReportStatus::parse(&s)
                .ok_or_else(|| AppError::Validation(format!("Unknown report status '{s}'")))
        })
        .transpose()?;
    let target_type = params
        .target_type
        .map(|t| {
            ReportTargetType::parse(&t)
                .ok_or_else(|| AppError::Validation(format!("Unknown target type '{t}'")))
        })
        .transpose()?;

    let reports = list_reports(
        &state.db,
        &ReportFilter {
            status,
            target_type,
            target_id: params.target_id,
        },
    )
    .await?;
    Ok(Json(reports))
}
