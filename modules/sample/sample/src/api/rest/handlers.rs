use std::sync::Arc;

use axum::extract::{Extension, RawQuery};
use axum::Json;
use http::StatusCode;
use query_parser::{coerce, CoercerExt, QueryError, QueryParams};
use sample_sdk::{AddQuery, SearchQuery, UpdateQuery};
use uuid::Uuid;

use crate::domain::service::SampleService;

use super::dto::{AddedSampleDto, EditedSampleDto, PagedSamplesDto, SampleDto};
use super::error::{domain_error_to_problem, query_error_to_problem, ApiResult};
use super::problem::Problem;

pub const SAMPLE_PATH: &str = "/sample";
pub const SAMPLES_PATH: &str = "/samples";

fn params(query: Option<&str>) -> QueryParams {
    QueryParams::parse(query.unwrap_or_default())
}

/// Get one visible sample by id.
#[utoipa::path(
    get,
    path = "/sample",
    tag = "sample",
    params(("id" = Uuid, Query, description = "Sample id")),
    responses(
        (status = 200, description = "The sample", body = SampleDto),
        (status = 400, description = "Missing or malformed id", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Not found or storage failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_sample(
    Extension(svc): Extension<Arc<SampleService>>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<SampleDto>> {
    let params = params(query.as_deref());
    let invalid = |e: QueryError| query_error_to_problem(&e, SAMPLE_PATH);

    let id: Uuid = coerce::uuid().required().key("id").parse(&params).map_err(invalid)?;

    let sample = svc
        .get(id)
        .await
        .map_err(|e| domain_error_to_problem(&e, SAMPLE_PATH))?;
    Ok(Json(sample.into()))
}

/// Page through visible samples whose name contains `name`.
#[utoipa::path(
    get,
    path = "/samples",
    tag = "sample",
    params(
        ("name" = Option<String>, Query, description = "Substring to match; absent matches everything"),
        ("limit" = Option<u64>, Query, description = "Page size, default 20"),
        ("offset" = Option<u64>, Query, description = "Page start, default 0"),
    ),
    responses(
        (status = 200, description = "One page of matches", body = PagedSamplesDto),
        (status = 400, description = "Malformed limit or offset", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Storage failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn search_samples(
    Extension(svc): Extension<Arc<SampleService>>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<PagedSamplesDto>> {
    let params = params(query.as_deref());
    let invalid = |e: QueryError| query_error_to_problem(&e, SAMPLES_PATH);

    let query = SearchQuery {
        name: coerce::string()
            .or_nil()
            .key("name")
            .parse(&params)
            .map_err(invalid)?
            .unwrap_or_default(),
        limit: coerce::int::<u64>().or_nil().key("limit").parse(&params).map_err(invalid)?,
        offset: coerce::int::<u64>().or_nil().key("offset").parse(&params).map_err(invalid)?,
    };

    let page = svc
        .search(query)
        .await
        .map_err(|e| domain_error_to_problem(&e, SAMPLES_PATH))?;
    Ok(Json(page.into()))
}

/// Create a sample with a fresh id.
#[utoipa::path(
    put,
    path = "/sample",
    tag = "sample",
    params(
        ("name" = String, Query, description = "Name, may be empty"),
        ("birthday" = String, Query, description = "Birth date as YYYY-MM-DD"),
        ("is_japanese" = bool, Query, description = "`true` or `false`"),
    ),
    responses(
        (status = 200, description = "Id of the new sample", body = AddedSampleDto),
        (status = 400, description = "Missing or malformed field", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Storage failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn add_sample(
    Extension(svc): Extension<Arc<SampleService>>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<AddedSampleDto>> {
    let params = params(query.as_deref());
    let invalid = |e: QueryError| query_error_to_problem(&e, SAMPLE_PATH);

    let query = AddQuery {
        name: coerce::string().required().key("name").parse(&params).map_err(invalid)?,
        birthday: coerce::date(svc.zone())
            .required()
            .key("birthday")
            .parse(&params)
            .map_err(invalid)?,
        is_japanese: coerce::boolean()
            .required()
            .key("is_japanese")
            .parse(&params)
            .map_err(invalid)?,
    };

    let id = svc
        .add(query)
        .await
        .map_err(|e| domain_error_to_problem(&e, SAMPLE_PATH))?;
    Ok(Json(AddedSampleDto { id }))
}

/// Replace the supplied fields of a sample. Unknown ids succeed silently.
#[utoipa::path(
    post,
    path = "/sample",
    tag = "sample",
    params(
        ("id" = Uuid, Query, description = "Sample id"),
        ("name" = Option<String>, Query, description = "New name"),
        ("birthday" = Option<String>, Query, description = "New birth date as YYYY-MM-DD"),
        ("is_japanese" = Option<bool>, Query, description = "New flag"),
    ),
    responses(
        (status = 200, description = "Id that was edited", body = EditedSampleDto),
        (status = 400, description = "Missing or malformed field", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Storage failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn edit_sample(
    Extension(svc): Extension<Arc<SampleService>>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<EditedSampleDto>> {
    let params = params(query.as_deref());
    let invalid = |e: QueryError| query_error_to_problem(&e, SAMPLE_PATH);

    let update = UpdateQuery {
        id: coerce::uuid().required().key("id").parse(&params).map_err(invalid)?,
        name: coerce::string()
            .or_nil()
            .key("name")
            .parse(&params)
            .map_err(invalid)?
            .into(),
        birthday: coerce::date(svc.zone())
            .or_nil()
            .key("birthday")
            .parse(&params)
            .map_err(invalid)?
            .into(),
        is_japanese: coerce::boolean()
            .or_nil()
            .key("is_japanese")
            .parse(&params)
            .map_err(invalid)?
            .into(),
    };

    let id = svc
        .edit(update)
        .await
        .map_err(|e| domain_error_to_problem(&e, SAMPLE_PATH))?;
    Ok(Json(EditedSampleDto { id }))
}

/// Soft-delete a sample. Unknown or already deleted ids succeed silently.
#[utoipa::path(
    delete,
    path = "/sample",
    tag = "sample",
    params(("id" = Uuid, Query, description = "Sample id")),
    responses(
        (status = 200, description = "Deleted; empty body"),
        (status = 400, description = "Missing or malformed id", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Storage failure", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_sample(
    Extension(svc): Extension<Arc<SampleService>>,
    RawQuery(query): RawQuery,
) -> ApiResult<StatusCode> {
    let params = params(query.as_deref());

    let id: Uuid = coerce::uuid()
        .required()
        .key("id")
        .parse(&params)
        .map_err(|e| query_error_to_problem(&e, SAMPLE_PATH))?;

    svc.delete(id)
        .await
        .map_err(|e| domain_error_to_problem(&e, SAMPLE_PATH))?;
    Ok(StatusCode::OK)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::rest::routes;
    use crate::domain::service::ServiceConfig;
    use crate::infra::storage::InMemorySampleRepository;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use chrono::FixedOffset;
    use serde_json::Value;
    use tower::ServiceExt as _;
    use tracing_test::traced_test;

    fn app() -> (Router, Arc<InMemorySampleRepository>) {
        let repo = Arc::new(InMemorySampleRepository::new());
        let service = Arc::new(SampleService::new(
            repo.clone(),
            ServiceConfig {
                zone: FixedOffset::east_opt(9 * 3600).unwrap(),
                ..ServiceConfig::default()
            },
        ));
        (routes::router(service), repo)
    }

    async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, String, String) {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let content_type = resp
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn add(app: &Router, query: &str) -> Uuid {
        let (status, _, body) = call(app, "PUT", &format!("/sample?{query}")).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        let v: Value = serde_json::from_str(&body).unwrap();
        v["ID"].as_str().unwrap().parse().unwrap()
    }

    #[tokio::test]
    async fn test_add_then_get_round_trips() {
        let (app, _) = app();
        let id = add(&app, "name=&birthday=1994-09-14&is_japanese=true").await;

        let (status, content_type, body) = call(&app, "GET", &format!("/sample?id={id}")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(
            body,
            format!(
                r#"{{"ID":"{id}","Name":"","Birthday":"1994-09-14T00:00:00+09:00","IsJapanese":true}}"#
            )
        );
    }

    #[tokio::test]
    #[traced_test]
    async fn test_get_without_id_is_bad_request() {
        let (app, _) = app();

        let (status, content_type, body) = call(&app, "GET", "/sample").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type, "application/problem+json");
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["code"], "SAMPLE_MISSING_PARAMETER");
        assert_eq!(v["errors"][0]["field"], "id");
        assert!(logs_contain("Rejected query parameter"));
    }

    #[tokio::test]
    async fn test_get_with_malformed_id_is_bad_request() {
        let (app, _) = app();
        let (status, _, body) = call(&app, "GET", "/sample?id=not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["code"], "SAMPLE_INVALID_PARAMETER");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_internal_error() {
        let (app, _) = app();
        let (status, _, body) = call(&app, "GET", &format!("/sample?id={}", Uuid::nil())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["code"], "SAMPLE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_add_rejects_first_bad_field_and_writes_nothing() {
        let (app, repo) = app();

        let (status, _, body) = call(&app, "PUT", "/sample?birthday=1994-9-14&is_japanese=yes").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let v: Value = serde_json::from_str(&body).unwrap();
        // name is checked first
        assert_eq!(v["errors"][0]["field"], "name");
        assert_eq!(v["errors"].as_array().unwrap().len(), 1);
        assert_eq!(repo.stored_len(), 0);
    }

    #[tokio::test]
    async fn test_search_defaults_and_paging() {
        let (app, _) = app();
        for name in ["test-japanese", "test-foreiner", "test-ninja"] {
            add(&app, &format!("name={name}&birthday=1994-09-14&is_japanese=true")).await;
        }

        let (status, _, body) = call(&app, "GET", "/samples").await;
        assert_eq!(status, StatusCode::OK);
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["Total"], 3);
        assert_eq!(v["Samples"].as_array().unwrap().len(), 3);

        let (_, _, body) = call(&app, "GET", "/samples?limit=1&offset=2").await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["Total"], 3);
        assert_eq!(v["Samples"][0]["Name"], "test-ninja");

        let (_, _, body) = call(&app, "GET", "/samples?name=foreiner").await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["Total"], 1);
        assert_eq!(v["Samples"][0]["Name"], "test-foreiner");
    }

    #[tokio::test]
    async fn test_search_rejects_malformed_paging() {
        let (app, _) = app();
        for uri in ["/samples?limit=abc", "/samples?limit=-1", "/samples?offset=1.5"] {
            let (status, _, _) = call(&app, "GET", uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_edit_changes_only_supplied_fields() {
        let (app, _) = app();
        let id = add(&app, "name=before&birthday=1994-09-14&is_japanese=true").await;

        let (status, _, body) = call(&app, "POST", &format!("/sample?id={id}&is_japanese=false")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!(r#"{{"id":"{id}"}}"#));

        let (_, _, body) = call(&app, "GET", &format!("/sample?id={id}")).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["Name"], "before");
        assert_eq!(v["Birthday"], "1994-09-14T00:00:00+09:00");
        assert_eq!(v["IsJapanese"], false);
    }

    #[tokio::test]
    async fn test_noop_edit_leaves_output_identical() {
        let (app, _) = app();
        let id = add(&app, "name=same&birthday=2000-02-29&is_japanese=false").await;
        let uri = format!("/sample?id={id}");
        let (_, _, before) = call(&app, "GET", &uri).await;

        let (status, _, _) = call(&app, "POST", &uri).await;
        assert_eq!(status, StatusCode::OK);

        let (_, _, after) = call(&app, "GET", &uri).await;
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_edit_malformed_field_writes_nothing() {
        let (app, _) = app();
        let id = add(&app, "name=keep&birthday=1994-09-14&is_japanese=true").await;

        let (status, _, _) =
            call(&app, "POST", &format!("/sample?id={id}&name=changed&is_japanese=maybe")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, _, body) = call(&app, "GET", &format!("/sample?id={id}")).await;
        let v: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["Name"], "keep");
    }

    #[tokio::test]
    async fn test_edit_unknown_id_succeeds() {
        let (app, _) = app();
        let ghost = Uuid::from_u128(42);
        let (status, _, body) = call(&app, "POST", &format!("/sample?id={ghost}&name=x")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, format!(r#"{{"id":"{ghost}"}}"#));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent_and_hides_sample() {
        let (app, repo) = app();
        let id = add(&app, "name=gone&birthday=1994-09-14&is_japanese=true").await;
        let uri = format!("/sample?id={id}");

        for _ in 0..2 {
            let (status, _, body) = call(&app, "DELETE", &uri).await;
            assert_eq!(status, StatusCode::OK);
            assert!(body.is_empty());
        }

        let (status, _, _) = call(&app, "GET", &uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let (_, _, body) = call(&app, "GET", "/samples").await;
        assert_eq!(body, r#"{"Total":0,"Samples":[]}"#);
        assert_eq!(repo.stored_len(), 1);
    }

    #[tokio::test]
    async fn test_delete_without_id_is_bad_request() {
        let (app, _) = app();
        let (status, _, _) = call(&app, "DELETE", "/sample").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
