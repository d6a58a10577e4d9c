//! HTMX fragment dispatch.
//!
//! `GET|POST /fragments/{controller}` resolves the registered controller,
//! merges query and form parameters into a [`FragmentRequest`] and drives
//! the shared [`FragmentPipeline`](fragments::FragmentPipeline). Faults are
//! offered to the report registry, then answered with a rendered error
//! partial so the swap target always receives usable HTML.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{route, web, HttpResponse};
use fragments::{Fault, FragmentRequest, FragmentResponse};
use tracing::{error, warn};

use crate::domain::Error;

use super::error::{error_fragment, error_from_fault, HTML_CONTENT_TYPE};
use super::session::SessionContext;
use super::state::HttpState;

/// Dispatch one fragment request to the controller named in the path.
///
/// Query parameters win over form fields of the same name, so a form can be
/// pointed at another action without rewriting its body. The cookie session
/// is snapshotted for the pipeline and written back whether the lifecycle
/// completed or aborted; notifications staged before a failure survive into
/// the next request.
#[route("/fragments/{controller}", method = "GET", method = "POST")]
pub async fn dispatch_fragment(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<BTreeMap<String, String>>,
    form: Option<web::Form<BTreeMap<String, String>>>,
    session: SessionContext,
) -> HttpResponse {
    let name = path.into_inner();
    let Some(controller) = state.controller(&name) else {
        warn!(controller = %name, "unknown fragment controller");
        let error = Error::not_found(format!("no fragment controller named {name}"));
        return to_http_response(&error_fragment(state.renderer.as_ref(), &error));
    };

    let form_pairs = form.map(web::Form::into_inner).unwrap_or_default();
    let request = FragmentRequest::from_pairs(form_pairs.into_iter().chain(query.into_inner()));

    let mut store = session.fragment_session();
    let result = state
        .pipeline
        .handle(controller.as_ref(), &request, &mut store)
        .await;
    session.apply_fragment_session(&store);

    match result {
        Ok(response) => to_http_response(&response),
        Err(fault) => {
            if state.reports.dispatch(&fault) {
                match &fault {
                    Fault::Dispatch(_) => {
                        warn!(controller = %name, %fault, "fragment request rejected");
                    }
                    _ => error!(controller = %name, %fault, "fragment lifecycle aborted"),
                }
            }
            let answer = error_from_fault(&fault);
            to_http_response(&error_fragment(state.renderer.as_ref(), &answer))
        }
    }
}

fn to_http_response(response: &FragmentResponse) -> HttpResponse {
    let status =
        StatusCode::from_u16(response.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HttpResponse::build(status);
    builder.content_type(HTML_CONTENT_TYPE);
    for (header, value) in response.headers() {
        builder.append_header((header, value));
    }
    builder.body(response.html().to_owned())
}
