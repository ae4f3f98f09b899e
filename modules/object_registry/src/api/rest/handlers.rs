//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::ReferenceKind;
use crate::domain::Service;
use axum::{
    body::Bytes,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

// ===== Reference Handlers =====

pub async fn list_references(
    service: Arc<Service>,
    kind: ReferenceKind,
) -> Result<Json<ReferenceListResponse>, Problem> {
    let items: Vec<ReferenceDto> = service
        .list_references(kind)
        .await
        .map_err(map_domain_error)?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();

    Ok(Json(ReferenceListResponse { items, total }))
}

pub async fn get_reference(
    service: Arc<Service>,
    kind: ReferenceKind,
    Path(id): Path<i32>,
) -> Result<Json<ReferenceDto>, Problem> {
    let item = service
        .get_reference(kind, id)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(item.into()))
}

pub async fn create_reference(
    service: Arc<Service>,
    kind: ReferenceKind,
    Json(req): Json<ReferenceRequest>,
) -> Result<(StatusCode, Json<ReferenceDto>), Problem> {
    let item = service
        .create_reference(kind, &req.name)
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

pub async fn rename_reference(
    service: Arc<Service>,
    kind: ReferenceKind,
    Path(id): Path<i32>,
    Json(req): Json<ReferenceRequest>,
) -> Result<Json<ReferenceDto>, Problem> {
    let item = service
        .rename_reference(kind, id, &req.name)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(item.into()))
}

/// Delete a reference entity and, through cascade, every object using it
pub async fn delete_reference(
    service: Arc<Service>,
    kind: ReferenceKind,
    Path(id): Path<i32>,
) -> Result<StatusCode, Problem> {
    service
        .delete_reference(kind, id)
        .await
        .map_err(map_domain_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ===== Object Handlers =====

pub async fn list_objects(service: Arc<Service>) -> Result<Json<ObjectListResponse>, Problem> {
    let items: Vec<ObjectDto> = service
        .list_objects()
        .await
        .map_err(map_domain_error)?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();

    Ok(Json(ObjectListResponse { items, total }))
}

pub async fn get_object(
    service: Arc<Service>,
    Path(id): Path<i32>,
) -> Result<Json<ObjectDto>, Problem> {
    let object = service.get_object(id).await.map_err(map_domain_error)?;
    Ok(Json(object.into()))
}

pub async fn create_object(
    service: Arc<Service>,
    Json(req): Json<ObjectRequest>,
) -> Result<(StatusCode, Json<ObjectDto>), Problem> {
    let object = service
        .create_object(req.into())
        .await
        .map_err(map_domain_error)?;

    Ok((StatusCode::CREATED, Json(object.into())))
}

pub async fn update_object(
    service: Arc<Service>,
    Path(id): Path<i32>,
    Json(req): Json<ObjectRequest>,
) -> Result<Json<ObjectDto>, Problem> {
    let object = service
        .update_object(id, req.into())
        .await
        .map_err(map_domain_error)?;

    Ok(Json(object.into()))
}

pub async fn delete_object(
    service: Arc<Service>,
    Path(id): Path<i32>,
) -> Result<StatusCode, Problem> {
    service.delete_object(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Priority Handlers =====

pub async fn get_priority(
    service: Arc<Service>,
    Path(id): Path<i32>,
) -> Result<Json<PriorityRecordDto>, Problem> {
    let record = service.get_priority(id).await.map_err(map_domain_error)?;
    Ok(Json(record.into()))
}

pub async fn list_priorities(
    service: Arc<Service>,
) -> Result<Json<PriorityListResponse>, Problem> {
    let items: Vec<PriorityRecordDto> = service
        .list_priorities()
        .await
        .map_err(map_domain_error)?
        .into_iter()
        .map(Into::into)
        .collect();
    let total = items.len();

    Ok(Json(PriorityListResponse { items, total }))
}

pub async fn recompute_priority(
    service: Arc<Service>,
    Path(id): Path<i32>,
) -> Result<Json<RecomputeResponse>, Problem> {
    let outcome = service.recompute_by_id(id).await.map_err(map_domain_error)?;
    Ok(Json(outcome.into()))
}

// ===== Bulk Transfer Handlers =====

/// Download every object as a spreadsheet attachment
pub async fn export_objects(service: Arc<Service>) -> Result<Response, Problem> {
    let export = service.export_all().await.map_err(map_domain_error)?;

    let headers = [
        (header::CONTENT_TYPE, export.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.file_name),
        ),
    ];
    Ok((headers, export.bytes).into_response())
}

/// Import a spreadsheet sent as the raw request body
pub async fn import_objects(
    service: Arc<Service>,
    body: Bytes,
) -> Result<Json<ImportResultDto>, Problem> {
    if body.is_empty() {
        return Err(map_domain_error(crate::contract::RegistryError::InvalidPayload {
            message: "request body is empty".to_string(),
        }));
    }

    let report = service.import_batch(&body).await.map_err(map_domain_error)?;
    Ok(Json(report.into()))
}
