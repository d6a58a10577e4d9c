//! Built-in HTML fragment renderer.
//!
//! Implements the `RenderFragment` port over a compiled-in view table, so
//! the backend serves usable markup without a template-engine dependency.
//! Templates interpolate `{{key}}` placeholders from the assigned fragment
//! data; dotted keys (`ticket.headline`) descend into objects. Every
//! interpolated value is HTML-escaped; structured values are embedded as
//! escaped JSON so client code can pick them up verbatim.

use fragments::{
    FragmentData, RenderFault, RenderFragment, RenderedFragment, ViewName, escape_html,
};
use serde_json::Value;

const TICKET_MODAL: &str = r#"<article class="ticket-modal" data-ticket-id="{{ticket.id}}">
<header><h2>{{ticket.headline}}</h2><span class="ticket-status">{{ticket.status}}</span><span class="ticket-priority">{{ticket.priority}}</span></header>
<ul class="notifications">{{notifications}}</ul>
<p class="ticket-description">{{ticket.description}}</p>
<section class="ticket-subtasks" data-count="{{numSubTasks}}">{{allSubTasks}}</section>
<section class="ticket-comments" data-count="{{numComments}}">{{comments}}</section>
<section class="ticket-files" data-count="{{numFiles}}">{{files}}</section>
<footer class="ticket-hours" data-logged="{{timesheetsAllHours}}" data-remaining="{{remainingHours}}" data-clocked="{{onTheClock}}"></footer>
<a class="ticket-back" href="{{lastPage}}">Back to {{projectData.name}}</a>
</article>"#;

const EVENT_PANEL: &str = r#"<section class="calendar-panel">
<ul class="notifications">{{notifications}}</ul>
<ol class="calendar-events">{{events}}</ol>
</section>"#;

const ERROR_PARTIAL: &str = r#"<section class="error-fragment" data-error-code="{{code}}" data-trace-id="{{traceId}}"><p>{{message}}</p></section>"#;

const VIEWS: &[(&str, &str)] = &[
    ("tickets.ticketModal", TICKET_MODAL),
    ("calendar.eventPanel", EVENT_PANEL),
    ("errors.error400", ERROR_PARTIAL),
    ("errors.error401", ERROR_PARTIAL),
    ("errors.error403", ERROR_PARTIAL),
    ("errors.error404", ERROR_PARTIAL),
    ("errors.error500", ERROR_PARTIAL),
];

/// Renderer over the compiled-in view table.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn template_for(view: &ViewName) -> Option<&'static str> {
        VIEWS
            .iter()
            .find(|(name, _)| *name == view.as_str())
            .map(|(_, template)| *template)
    }
}

/// Resolve a possibly dotted placeholder key against the assigned data.
fn lookup<'a>(data: &'a FragmentData, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let first = segments.next()?;
    let mut value = data.get(first)?;
    for segment in segments {
        value = value.get(segment)?;
    }
    Some(value)
}

/// Render a placeholder value as escaped text.
///
/// Missing keys and nulls collapse to the empty string so optional data
/// never renders as the word `null`.
fn placeholder_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => escape_html(text),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(structured) => escape_html(&structured.to_string()),
    }
}

fn interpolate(template: &str, data: &FragmentData) -> Result<String, String> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let (head, tail) = rest.split_at(start);
        rendered.push_str(head);
        let tail = tail.get(2..).unwrap_or_default();
        let Some(end) = tail.find("}}") else {
            return Err("unterminated placeholder".to_owned());
        };
        let (key, after) = tail.split_at(end);
        rendered.push_str(&placeholder_text(lookup(data, key.trim())));
        rest = after.get(2..).unwrap_or_default();
    }
    rendered.push_str(rest);
    Ok(rendered)
}

impl RenderFragment for HtmlRenderer {
    fn render(&self, view: &ViewName, data: &FragmentData) -> Result<RenderedFragment, RenderFault> {
        let template = Self::template_for(view).ok_or_else(|| RenderFault::UnknownView {
            view: view.to_string(),
        })?;
        let body = interpolate(template, data).map_err(|message| RenderFault::Template {
            view: view.to_string(),
            message,
        })?;
        Ok(RenderedFragment::new(format!(
            "<div class=\"fragment\" data-view=\"{view}\">{body}</div>"
        )))
    }
}
