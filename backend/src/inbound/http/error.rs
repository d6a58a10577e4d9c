//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent HTML error partials and
//! status codes. Each [`ErrorCode`] owns one error view; internal messages are
//! redacted before anything reaches a client.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use fragments::{Fault, FragmentData, FragmentResponse, RenderFragment, ViewName, escape_html};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Content type stamped on every fragment and error partial response.
pub(crate) const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn code_label(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::InvalidRequest => "invalid_request",
        ErrorCode::Unauthorized => "unauthorized",
        ErrorCode::Forbidden => "forbidden",
        ErrorCode::NotFound => "not_found",
        ErrorCode::InternalError => "internal_error",
    }
}

fn error_view(code: ErrorCode) -> ViewName {
    ViewName::from(match code {
        ErrorCode::InvalidRequest => "errors.error400",
        ErrorCode::Unauthorized => "errors.error401",
        ErrorCode::Forbidden => "errors.error403",
        ErrorCode::NotFound => "errors.error404",
        ErrorCode::InternalError => "errors.error500",
    })
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

/// Minimal error partial used when no template renderer is reachable.
fn inline_error_html(error: &Error) -> String {
    let trace_attr = error
        .trace_id()
        .map(|id| format!(" data-trace-id=\"{}\"", escape_html(id)))
        .unwrap_or_default();
    format!(
        "<section class=\"error-fragment\" data-error-code=\"{code}\"{trace_attr}><p>{message}</p></section>",
        code = code_label(error.code()),
        message = escape_html(error.message()),
    )
}

/// Render `error` as its matching HTML error partial with the mapped status.
///
/// Internal messages are redacted before the template sees them. When the
/// error template itself fails to render, the response falls back to the
/// inline partial so the client still receives well-formed HTML.
pub(crate) fn error_fragment(renderer: &dyn RenderFragment, error: &Error) -> FragmentResponse {
    let redacted = redact_if_internal(error);
    let status = status_for(redacted.code());
    let mut data = FragmentData::new();
    data.assign("code", json!(code_label(redacted.code())));
    data.assign("message", json!(redacted.message()));
    if let Some(id) = redacted.trace_id() {
        data.assign("traceId", json!(id));
    }
    let html = match renderer.render(&error_view(redacted.code()), &data) {
        Ok(rendered) => rendered.html().to_owned(),
        Err(fault) => {
            error!(error = %fault, "error template failed; answering with inline partial");
            inline_error_html(&redacted)
        }
    };
    FragmentResponse::with_status(status.as_u16(), html)
}

/// Promote a domain failure the fragment lifecycle cannot recover from.
pub(crate) fn fault_from(error: Error) -> Fault {
    Fault::internal(error.message())
}

/// The domain error an aborted fragment lifecycle answers with.
///
/// Dispatch failures are the client's fault; everything else is ours.
pub(crate) fn error_from_fault(fault: &Fault) -> Error {
    match fault {
        Fault::Dispatch(err) => Error::invalid_request(err.to_string()),
        Fault::Configuration { .. } | Fault::Render(_) | Fault::Internal { .. } => {
            Error::internal(fault.to_string())
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let redacted = redact_if_internal(self);
        let mut builder = HttpResponse::build(self.status_code());
        builder.content_type(HTML_CONTENT_TYPE);
        if let Some(id) = redacted.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.body(inline_error_html(&redacted))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
