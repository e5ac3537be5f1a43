use query_parser::QueryError;

use crate::domain::error::DomainError;

use super::problem::{ParamViolation, Problem};

pub type ApiResult<T> = Result<T, Problem>;

fn current_trace_id() -> Option<String> {
    tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string())
}

/// Map a rejected query parameter to a 400 Problem.
///
/// Client mistakes are logged at `warn`, never as system faults.
pub fn query_error_to_problem(e: &QueryError, instance: &str) -> Problem {
    tracing::warn!(param = e.key(), error = %e, "Rejected query parameter");

    let code = if e.is_key_not_found() {
        "SAMPLE_MISSING_PARAMETER"
    } else {
        "SAMPLE_INVALID_PARAMETER"
    };
    Problem::bad_request(e.to_string())
        .with_code(code)
        .with_instance(instance)
        .with_trace_id(current_trace_id())
        .with_errors(vec![ParamViolation {
            field: e.key().to_owned(),
            message: e.to_string(),
        }])
}

/// Map a domain failure to a Problem.
///
/// Every domain failure, not-found included, is reported as 500.
pub fn domain_error_to_problem(e: &DomainError, instance: &str) -> Problem {
    let problem = match e {
        DomainError::NotFound { .. } => {
            tracing::error!(error = %e, "Sample lookup missed");
            Problem::internal_error(e.to_string()).with_code("SAMPLE_NOT_FOUND")
        }
        DomainError::InvalidPage(_) => {
            tracing::error!(error = %e, "Search produced an invalid page");
            Problem::internal_error(e.to_string()).with_code("SAMPLE_INVALID_PAGE")
        }
        DomainError::Database(_) => {
            tracing::error!(error = ?e, "Database error occurred");
            Problem::internal_error("An internal database error occurred")
                .with_code("SAMPLE_DATABASE")
        }
    };
    problem
        .with_instance(instance)
        .with_trace_id(current_trace_id())
}
