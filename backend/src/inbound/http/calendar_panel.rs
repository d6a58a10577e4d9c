//! Calendar panel fragment controller.
//!
//! Renders the actor's personal calendar and handles the event editor form.
//! Ownership is enforced by the calendar service; the panel only decides how
//! each outcome reaches the client. Denied and vanished events answer with
//! error fragments, rejected form values become flash notifications on the
//! re-rendered panel.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use fragments::{
    ActionName, ActionOutcome, Blueprint, FALLBACK_ACTION, Fault, FragmentContext,
    FragmentController, FragmentData, FragmentRequest, RenderFragment,
};
use serde_json::json;

use crate::domain::ports::CalendarService;
use crate::domain::{Actor, Error, ErrorCode, EventEdit, EventId, checkbox_checked};

use super::error::{error_fragment, fault_from};
use super::session::{Notification, current_actor, drain_notifications, push_notification};

/// Path segment the dispatcher routes to this controller.
const CONTROLLER_NAME: &str = "calendar-panel";

/// Query parameter naming the event an action targets.
const EVENT_PARAM: &str = "event";

/// Client event fired whenever the panel re-renders.
const CALENDAR_UPDATE_EVENT: &str = "calendarUpdate";

/// Controller behind `/fragments/calendar-panel`.
pub struct CalendarPanelController {
    calendars: Arc<dyn CalendarService>,
    renderer: Arc<dyn RenderFragment>,
}

impl CalendarPanelController {
    #[must_use]
    pub fn new(calendars: Arc<dyn CalendarService>, renderer: Arc<dyn RenderFragment>) -> Self {
        Self {
            calendars,
            renderer,
        }
    }

    /// Finish the lifecycle with a rendered error fragment.
    fn deny(&self, error: &Error) -> ActionOutcome {
        ActionOutcome::Finish(error_fragment(self.renderer.as_ref(), error))
    }

    /// Route a mutation result to its response shape.
    ///
    /// Success and rejected form values re-render the panel with a flash
    /// notification; denial and missing events escalate to error fragments;
    /// infrastructure failures abort the lifecycle.
    fn settle(
        &self,
        ctx: &mut FragmentContext<'_>,
        result: Result<(), Error>,
        success: &str,
    ) -> Result<Option<ActionOutcome>, Fault> {
        match result {
            Ok(()) => {
                push_notification(ctx.session(), Notification::success(success));
                Ok(None)
            }
            Err(error) => match error.code() {
                ErrorCode::Forbidden | ErrorCode::NotFound => Ok(Some(self.deny(&error))),
                ErrorCode::InternalError => Err(Fault::internal(error.message())),
                _ => {
                    push_notification(ctx.session(), Notification::error(error.message()));
                    Ok(None)
                }
            },
        }
    }

    async fn panel_data(
        &self,
        actor: &Actor,
        ctx: &mut FragmentContext<'_>,
    ) -> Result<FragmentData, Fault> {
        let user_id = actor.id();
        let events = self
            .calendars
            .events_for(&user_id)
            .await
            .map_err(fault_from)?;
        let notifications = drain_notifications(ctx.session());

        let mut data = FragmentData::new();
        data.assign("events", json!(events));
        data.assign("notifications", json!(notifications));
        Ok(data)
    }
}

#[async_trait]
impl FragmentController for CalendarPanelController {
    fn blueprint(&self) -> Blueprint {
        Blueprint::new(CONTROLLER_NAME)
            .view("calendar.eventPanel")
            .actions([FALLBACK_ACTION, "saveEvent", "deleteEvent"])
    }

    async fn invoke(
        &self,
        action: &ActionName,
        ctx: &mut FragmentContext<'_>,
    ) -> Result<ActionOutcome, Fault> {
        let Some(actor) = current_actor(ctx.session()) else {
            return Ok(self.deny(&Error::unauthorized("login required")));
        };

        match action.as_str() {
            "saveEvent" => {
                let edit = parse_event_edit(ctx.request());
                let result = self.calendars.edit_event(&actor, edit).await.map(|_| ());
                if let Some(outcome) = self.settle(ctx, result, "Event saved")? {
                    return Ok(outcome);
                }
            }
            "deleteEvent" => {
                let result = match requested_event(ctx.request()) {
                    Ok(id) => self.calendars.delete_event(&actor, id).await,
                    Err(error) => Err(error),
                };
                if let Some(outcome) = self.settle(ctx, result, "Event deleted")? {
                    return Ok(outcome);
                }
            }
            _ => {}
        }

        let data = self.panel_data(&actor, ctx).await?;
        ctx.trigger(CALENDAR_UPDATE_EVENT);
        Ok(ActionOutcome::Render(data))
    }
}

fn requested_event(request: &FragmentRequest) -> Result<EventId, Error> {
    let raw = request
        .param(EVENT_PARAM)
        .ok_or_else(|| Error::invalid_request("event parameter is required"))?;
    raw.trim()
        .parse()
        .map(EventId::new)
        .map_err(|_| Error::invalid_request(format!("invalid event: {raw}")))
}

/// Read the event editor form.
///
/// Date and time halves are independent; unparseable halves count as
/// absent, matching how the service combines them. A missing event id is
/// carried through so the service can refuse the edit.
fn parse_event_edit(request: &FragmentRequest) -> EventEdit {
    EventEdit {
        id: request
            .param(EVENT_PARAM)
            .and_then(|raw| raw.trim().parse().ok())
            .map(EventId::new),
        description: request.param_or("description", "").to_owned(),
        from_date: parse_date(request.param("fromDate")),
        from_time: parse_time(request.param("fromTime")),
        to_date: parse_date(request.param("toDate")),
        to_time: parse_time(request.param("toTime")),
        all_day: checkbox_checked(request.param("allDay")),
    }
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
}

fn parse_time(raw: Option<&str>) -> Option<NaiveTime> {
    raw.and_then(|raw| NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok())
}
