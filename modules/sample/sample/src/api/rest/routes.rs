use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use crate::domain::service::SampleService;

use super::handlers::{self, SAMPLE_PATH, SAMPLES_PATH};
use super::openapi;

/// Routes for the sample resource plus its OpenAPI document.
#[must_use]
pub fn router(service: Arc<SampleService>) -> Router {
    Router::new()
        .route(
            SAMPLE_PATH,
            get(handlers::get_sample)
                .put(handlers::add_sample)
                .post(handlers::edit_sample)
                .delete(handlers::delete_sample),
        )
        .route(SAMPLES_PATH, get(handlers::search_samples))
        .route("/openapi.json", get(openapi::openapi_json))
        .layer(Extension(service))
}
