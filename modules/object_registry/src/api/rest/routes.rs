//! Route registration and OpenAPI document

use super::{dto::*, error::Problem, handlers};
use crate::contract::ReferenceKind;
use crate::domain::Service;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "GidroAtlas object registry"),
    paths(
        list_objects_handler,
        create_object_handler,
        get_object_handler,
        update_object_handler,
        delete_object_handler,
        get_priority_handler,
        recompute_priority_handler,
        list_priorities_handler,
        export_objects_handler,
        import_objects_handler,
    ),
    components(schemas(
        ReferenceDto,
        ReferenceRequest,
        ReferenceListResponse,
        ObjectDto,
        ObjectRequest,
        ObjectListResponse,
        PriorityRecordDto,
        PriorityListResponse,
        RecomputeResponse,
        RowErrorDto,
        ImportResultDto,
        Problem,
    )),
    tags((name = "objects"), (name = "priority"), (name = "transfer"))
)]
pub struct ApiDoc;

/// Register all REST routes; uploads larger than `max_upload_bytes` get 413
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    max_upload_bytes: usize,
) -> anyhow::Result<Router> {
    let router = router
        // Object endpoints
        .route(
            "/objects",
            get(list_objects_handler).post(create_object_handler),
        )
        .route("/objects/export", get(export_objects_handler))
        .route(
            "/objects/import",
            post(import_objects_handler).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/objects/{id}",
            get(get_object_handler)
                .put(update_object_handler)
                .delete(delete_object_handler),
        )
        .route("/objects/{id}/priority", get(get_priority_handler))
        .route(
            "/objects/{id}/recompute-priority",
            post(recompute_priority_handler),
        )
        .route("/priority-scores", get(list_priorities_handler))
        .route("/openapi.json", get(openapi_handler));

    let router = reference_routes(router, "/regions", ReferenceKind::Region);
    let router = reference_routes(router, "/resource-types", ReferenceKind::ResourceType);
    let router = reference_routes(router, "/water-types", ReferenceKind::WaterType);

    Ok(router.layer(Extension(service)))
}

/// CRUD routes for one lookup table
fn reference_routes(router: Router, base: &str, kind: ReferenceKind) -> Router {
    router
        .route(
            base,
            get(move |Extension(service): Extension<Arc<Service>>| {
                handlers::list_references(service, kind)
            })
            .post(
                move |Extension(service): Extension<Arc<Service>>,
                      json: Json<ReferenceRequest>| {
                    handlers::create_reference(service, kind, json)
                },
            ),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(
                move |Extension(service): Extension<Arc<Service>>, path: Path<i32>| {
                    handlers::get_reference(service, kind, path)
                },
            )
            .put(
                move |Extension(service): Extension<Arc<Service>>,
                      path: Path<i32>,
                      json: Json<ReferenceRequest>| {
                    handlers::rename_reference(service, kind, path, json)
                },
            )
            .delete(
                move |Extension(service): Extension<Arc<Service>>, path: Path<i32>| {
                    handlers::delete_reference(service, kind, path)
                },
            ),
        )
}

// ===== Handler wrappers that extract service from Extension =====

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[utoipa::path(get, path = "/objects", tag = "objects",
    responses((status = 200, body = ObjectListResponse)))]
async fn list_objects_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<ObjectListResponse>, Problem> {
    handlers::list_objects(service).await
}

#[utoipa::path(post, path = "/objects", tag = "objects", request_body = ObjectRequest,
    responses((status = 201, body = ObjectDto), (status = 400, body = Problem)))]
async fn create_object_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<ObjectRequest>,
) -> Result<(StatusCode, Json<ObjectDto>), Problem> {
    handlers::create_object(service, json).await
}

#[utoipa::path(get, path = "/objects/{id}", tag = "objects",
    params(("id" = i32, Path, description = "Object id")),
    responses((status = 200, body = ObjectDto), (status = 404, body = Problem)))]
async fn get_object_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<ObjectDto>, Problem> {
    handlers::get_object(service, path).await
}

#[utoipa::path(put, path = "/objects/{id}", tag = "objects", request_body = ObjectRequest,
    params(("id" = i32, Path, description = "Object id")),
    responses((status = 200, body = ObjectDto), (status = 400, body = Problem), (status = 404, body = Problem)))]
async fn update_object_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
    json: Json<ObjectRequest>,
) -> Result<Json<ObjectDto>, Problem> {
    handlers::update_object(service, path, json).await
}

#[utoipa::path(delete, path = "/objects/{id}", tag = "objects",
    params(("id" = i32, Path, description = "Object id")),
    responses((status = 204), (status = 404, body = Problem)))]
async fn delete_object_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<StatusCode, Problem> {
    handlers::delete_object(service, path).await
}

#[utoipa::path(get, path = "/objects/{id}/priority", tag = "priority",
    params(("id" = i32, Path, description = "Object id")),
    responses((status = 200, body = PriorityRecordDto), (status = 404, body = Problem)))]
async fn get_priority_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<PriorityRecordDto>, Problem> {
    handlers::get_priority(service, path).await
}

#[utoipa::path(post, path = "/objects/{id}/recompute-priority", tag = "priority",
    params(("id" = i32, Path, description = "Object id")),
    responses((status = 200, body = RecomputeResponse), (status = 404, body = Problem)))]
async fn recompute_priority_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<i32>,
) -> Result<Json<RecomputeResponse>, Problem> {
    handlers::recompute_priority(service, path).await
}

#[utoipa::path(get, path = "/priority-scores", tag = "priority",
    responses((status = 200, body = PriorityListResponse)))]
async fn list_priorities_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<PriorityListResponse>, Problem> {
    handlers::list_priorities(service).await
}

#[utoipa::path(get, path = "/objects/export", tag = "transfer",
    responses((status = 200, description = "Spreadsheet attachment")))]
async fn export_objects_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Response, Problem> {
    handlers::export_objects(service).await
}

#[utoipa::path(post, path = "/objects/import", tag = "transfer",
    request_body(content = String, content_type = "application/octet-stream", description = "XLSX or CSV file"),
    responses((status = 200, body = ImportResultDto), (status = 400, body = Problem)))]
async fn import_objects_handler(
    Extension(service): Extension<Arc<Service>>,
    body: Bytes,
) -> Result<Json<ImportResultDto>, Problem> {
    handlers::import_objects(service, body).await
}
