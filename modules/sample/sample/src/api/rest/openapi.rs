use axum::Json;
use utoipa::OpenApi;

use super::dto::{AddedSampleDto, EditedSampleDto, PagedSamplesDto, SampleDto};
use super::handlers;
use super::problem::{ParamViolation, Problem};

#[derive(OpenApi)]
#[openapi(
    info(title = "Sample API", description = "Soft-deletable sample records"),
    paths(
        handlers::get_sample,
        handlers::search_samples,
        handlers::add_sample,
        handlers::edit_sample,
        handlers::delete_sample,
    ),
    components(schemas(
        SampleDto,
        PagedSamplesDto,
        AddedSampleDto,
        EditedSampleDto,
        Problem,
        ParamViolation,
    )),
    tags((name = "sample", description = "Sample records"))
)]
pub struct SampleApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(SampleApiDoc::openapi())
}
