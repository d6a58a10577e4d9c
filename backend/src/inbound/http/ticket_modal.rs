//! Ticket modal fragment controller.
//!
//! Serves the detail modal for a single ticket together with the form
//! actions posted from it: ticket edits, comments, attachments, subtasks and
//! logged hours. Every action re-renders the full modal so the client can
//! swap it in place; save-and-close and cross-project jumps finish early
//! with an `HX-Redirect` instead.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use fragments::{
    ActionName, ActionOutcome, Blueprint, FALLBACK_ACTION, Fault, FragmentContext,
    FragmentController, FragmentData, FragmentRequest, FragmentResponse, RenderFragment,
};
use mockable::Clock;
use serde_json::{Value, json};

use crate::domain::ports::{
    CommentService, FileService, ProjectService, TicketService, TimeLog, TimesheetService,
    UsersQuery,
};
use crate::domain::{
    Actor, CommentId, EFFORT_LABELS, Error, ErrorCode, FileId, IMAGE_EXTENSIONS, Module, Priority,
    ProjectId, SubtaskForm, Ticket, TicketId, TicketStatus, TicketType, TicketUpdate, UserId,
    parse_hours,
};

use super::error::{error_fragment, fault_from};
use super::session::{
    Notification, current_actor, current_project, drain_notifications, last_page_or_default,
    push_notification, switch_project,
};

/// Path segment the dispatcher routes to this controller.
const CONTROLLER_NAME: &str = "ticket-modal";

/// Query parameter naming the ticket the modal operates on.
const TICKET_PARAM: &str = "ticket";

/// Client event fired whenever the modal re-renders after an action.
const TICKET_UPDATE_EVENT: &str = "ticketUpdate";

/// Collaborators the ticket modal needs, bundled so construction stays
/// readable at the wiring site.
pub struct TicketModalDeps {
    pub tickets: Arc<dyn TicketService>,
    pub comments: Arc<dyn CommentService>,
    pub files: Arc<dyn FileService>,
    pub timesheets: Arc<dyn TimesheetService>,
    pub projects: Arc<dyn ProjectService>,
    pub users: Arc<dyn UsersQuery>,
    pub renderer: Arc<dyn RenderFragment>,
    pub clock: Arc<dyn Clock>,
}

/// Controller behind `/fragments/ticket-modal`.
///
/// The fallback action renders the modal; the declared actions mutate the
/// ticket or one of its satellites and then re-render. Validation and
/// recoverable service failures become flash notifications on the rendered
/// modal rather than error pages, so a rejected form never dead-ends the
/// user.
pub struct TicketModalController {
    tickets: Arc<dyn TicketService>,
    comments: Arc<dyn CommentService>,
    files: Arc<dyn FileService>,
    timesheets: Arc<dyn TimesheetService>,
    projects: Arc<dyn ProjectService>,
    users: Arc<dyn UsersQuery>,
    renderer: Arc<dyn RenderFragment>,
    clock: Arc<dyn Clock>,
    default_project: ProjectId,
}

impl TicketModalController {
    #[must_use]
    pub fn new(deps: TicketModalDeps, default_project: ProjectId) -> Self {
        let TicketModalDeps {
            tickets,
            comments,
            files,
            timesheets,
            projects,
            users,
            renderer,
            clock,
        } = deps;
        Self {
            tickets,
            comments,
            files,
            timesheets,
            projects,
            users,
            renderer,
            clock,
            default_project,
        }
    }

    /// Finish the lifecycle with a rendered error fragment.
    fn deny(&self, error: &Error) -> ActionOutcome {
        ActionOutcome::Finish(error_fragment(self.renderer.as_ref(), error))
    }

    /// Run one of the declared mutations against `ticket`.
    ///
    /// Returns a response only when the action short-circuits the modal
    /// render (save-and-close redirects back to the recorded page).
    async fn mutate(
        &self,
        action: &ActionName,
        ticket: &Ticket,
        actor: &Actor,
        ctx: &mut FragmentContext<'_>,
    ) -> Result<Option<FragmentResponse>, Fault> {
        let ticket_id = ticket.id();
        let entity_id = ticket_id.value();
        match action.as_str() {
            "saveTicket" => {
                let result = match parse_ticket_update(ctx.request()) {
                    Ok(update) => self
                        .tickets
                        .update_ticket(ticket_id, update)
                        .await
                        .map(|_| ()),
                    Err(error) => Err(error),
                };
                flash(ctx, result, "Ticket saved")?;
            }
            "saveAndCloseTicket" => {
                let result = match parse_ticket_update(ctx.request()) {
                    Ok(mut update) => {
                        update.status = Some(TicketStatus::Done);
                        self.tickets
                            .update_ticket(ticket_id, update)
                            .await
                            .map(|_| ())
                    }
                    Err(error) => Err(error),
                };
                flash(ctx, result, "Ticket saved and closed")?;
                // The notification stays staged for the page we redirect to.
                let last_page = last_page_or_default(ctx.session());
                return Ok(Some(FragmentResponse::hx_redirect(format!(
                    "{last_page}?closeModal=1"
                ))));
            }
            "addComment" => {
                let text = ctx.request().param_or("text", "").to_owned();
                let result = self
                    .comments
                    .add_comment(Module::Ticket, entity_id, *actor.id(), &text)
                    .await
                    .map(|_| ());
                flash(ctx, result, "Comment added")?;
            }
            "delComment" => {
                let result = match numeric_param(ctx.request(), "commentId") {
                    Ok(id) => self.comments.delete_comment(CommentId::new(id)).await,
                    Err(error) => Err(error),
                };
                flash(ctx, result, "Comment deleted")?;
            }
            "uploadFile" => {
                let file_name = ctx.request().param_or("file", "").to_owned();
                let result = self
                    .files
                    .attach(Module::Ticket, entity_id, *actor.id(), &file_name)
                    .await
                    .map(|_| ());
                flash(ctx, result, "File attached")?;
            }
            "delFile" => {
                let result = match numeric_param(ctx.request(), "fileId") {
                    Ok(id) => self.files.delete_file(FileId::new(id)).await,
                    Err(error) => Err(error),
                };
                flash(ctx, result, "File deleted")?;
            }
            "saveSubtask" => {
                let result = match parse_subtask_form(ctx.request()) {
                    Ok(form) => self
                        .tickets
                        .upsert_subtask(ticket.project_id(), ticket_id, form)
                        .await
                        .map(|_| ()),
                    Err(error) => Err(error),
                };
                flash(ctx, result, "Subtask saved")?;
            }
            "delSubtask" => {
                let result = match numeric_param(ctx.request(), "subtaskId") {
                    Ok(id) => self.tickets.delete(TicketId::new(id)).await,
                    Err(error) => Err(error),
                };
                flash(ctx, result, "Subtask deleted")?;
            }
            "logTime" => {
                let result = match parse_time_log(ctx.request(), ticket_id, *actor.id()) {
                    Ok(log) => self.timesheets.log_time(log).await.map(|_| ()),
                    Err(error) => Err(error),
                };
                flash(ctx, result, "Hours logged")?;
            }
            _ => {}
        }
        Ok(None)
    }

    /// Assemble everything the modal template renders.
    async fn modal_data(
        &self,
        actor: &Actor,
        ticket: &Ticket,
        ctx: &mut FragmentContext<'_>,
    ) -> Result<FragmentData, Fault> {
        let ticket_id = ticket.id();
        let project_id = ticket.project_id();
        let user_id = actor.id();

        let parents = self
            .tickets
            .possible_parents(project_id, ticket_id)
            .await
            .map_err(fault_from)?;
        let subtasks = self
            .tickets
            .subtasks_of(ticket_id)
            .await
            .map_err(fault_from)?;
        let milestones = self
            .tickets
            .milestones_for(project_id)
            .await
            .map_err(fault_from)?;
        let comments = self
            .comments
            .comments_for(Module::Ticket, ticket_id.value())
            .await
            .map_err(fault_from)?;
        let files = self
            .files
            .files_for(Module::Ticket, ticket_id.value())
            .await
            .map_err(fault_from)?;
        let ticket_hours: BTreeMap<String, f64> = self
            .timesheets
            .hours_for_ticket_by_date(ticket_id)
            .await
            .map_err(fault_from)?
            .into_iter()
            .map(|(date, hours)| (date.to_string(), hours))
            .collect();
        let user_hours = self
            .timesheets
            .user_hours_on_ticket(ticket_id, &user_id)
            .await
            .map_err(fault_from)?;
        let all_hours = self
            .timesheets
            .sum_hours_for_ticket(ticket_id)
            .await
            .map_err(fault_from)?;
        let remaining_hours = self
            .timesheets
            .remaining_hours(ticket)
            .await
            .map_err(fault_from)?;
        let on_the_clock = self
            .timesheets
            .is_clocked(&user_id)
            .await
            .map_err(fault_from)?;
        let user_info = self.users.user(&user_id).await.map_err(fault_from)?;
        let users = self
            .projects
            .users_assigned(project_id)
            .await
            .map_err(fault_from)?;
        let project = self.projects.project(project_id).await.map_err(fault_from)?;
        let last_page = last_page_or_default(ctx.session());
        let notifications = drain_notifications(ctx.session());
        let today = self.clock.utc().date_naive();

        let mut data = FragmentData::new();
        data.assign("ticket", json!(ticket));
        data.assign("ticketParents", json!(parents));
        data.assign("milestones", json!(milestones));
        data.assign(
            "statusLabels",
            label_map(
                TicketStatus::ALL
                    .iter()
                    .map(|status| (status.as_str().to_owned(), status.label())),
            ),
        );
        data.assign(
            "ticketTypes",
            label_map(
                TicketType::ALL
                    .iter()
                    .map(|kind| (kind.as_str().to_owned(), kind.label())),
            ),
        );
        data.assign(
            "ticketTypeIcons",
            label_map(
                TicketType::ALL
                    .iter()
                    .map(|kind| (kind.as_str().to_owned(), kind.icon())),
            ),
        );
        data.assign(
            "efforts",
            label_map(
                EFFORT_LABELS
                    .iter()
                    .map(|(points, label)| (points.to_string(), *label)),
            ),
        );
        data.assign(
            "priorities",
            label_map(
                Priority::ALL
                    .iter()
                    .map(|priority| (priority.key().to_string(), priority.label())),
            ),
        );
        data.assign(
            "kind",
            label_map(
                self.timesheets
                    .loggable_hour_kinds()
                    .iter()
                    .map(|kind| (kind.as_str().to_owned(), kind.label())),
            ),
        );
        data.assign("ticketHours", json!(ticket_hours));
        data.assign("userHours", json!(user_hours));
        data.assign("timesheetsAllHours", json!(all_hours));
        data.assign("remainingHours", json!(remaining_hours));
        data.assign("onTheClock", json!(on_the_clock));
        data.assign(
            "timesheetValues",
            json!({
                "kind": "",
                "date": today.to_string(),
                "hours": "",
                "description": "",
            }),
        );
        data.assign("userInfo", json!(user_info));
        data.assign("users", json!(users));
        data.assign("projectData", json!(project));
        data.assign("numComments", json!(comments.len()));
        data.assign("comments", json!(comments));
        data.assign("numSubTasks", json!(subtasks.len()));
        data.assign("allSubTasks", json!(subtasks));
        data.assign("numFiles", json!(files.len()));
        data.assign("files", json!(files));
        data.assign("imgExtensions", json!(IMAGE_EXTENSIONS));
        data.assign("lastPage", json!(last_page));
        data.assign("notifications", json!(notifications));
        Ok(data)
    }
}

#[async_trait]
impl FragmentController for TicketModalController {
    fn blueprint(&self) -> Blueprint {
        Blueprint::new(CONTROLLER_NAME)
            .view("tickets.ticketModal")
            .actions([
                FALLBACK_ACTION,
                "saveTicket",
                "saveAndCloseTicket",
                "addComment",
                "delComment",
                "uploadFile",
                "delFile",
                "saveSubtask",
                "delSubtask",
                "logTime",
            ])
    }

    async fn invoke(
        &self,
        action: &ActionName,
        ctx: &mut FragmentContext<'_>,
    ) -> Result<ActionOutcome, Fault> {
        let Some(actor) = current_actor(ctx.session()) else {
            return Ok(self.deny(&Error::unauthorized("login required")));
        };
        let ticket_id = match requested_ticket(ctx.request()) {
            Ok(id) => id,
            Err(error) => return Ok(self.deny(&error)),
        };
        let ticket = match self.tickets.get_ticket(ticket_id).await {
            Ok(ticket) => ticket,
            Err(error) if error.code() == ErrorCode::NotFound => {
                return Ok(self.deny(&error));
            }
            Err(error) => return Err(fault_from(error)),
        };

        let ticket = if action.as_str() == FALLBACK_ACTION {
            // Opening a ticket from another project moves the session there
            // first so the board behind the modal matches the ticket.
            let current = current_project(ctx.session(), self.default_project);
            if let Some(target) = self.projects.switch_target(Some(current), &ticket) {
                switch_project(ctx.session(), target);
                return Ok(ActionOutcome::Finish(FragmentResponse::hx_redirect(
                    format!("/fragments/{CONTROLLER_NAME}?{TICKET_PARAM}={ticket_id}"),
                )));
            }
            ticket
        } else {
            if let Some(response) = self.mutate(action, &ticket, &actor, ctx).await? {
                return Ok(ActionOutcome::Finish(response));
            }
            // Mutations may have changed the ticket itself; render fresh state.
            self.tickets
                .get_ticket(ticket_id)
                .await
                .map_err(fault_from)?
        };

        let data = self.modal_data(&actor, &ticket, ctx).await?;
        ctx.trigger(TICKET_UPDATE_EVENT);
        Ok(ActionOutcome::Render(data))
    }
}

/// The ticket id every modal action requires.
fn requested_ticket(request: &FragmentRequest) -> Result<TicketId, Error> {
    numeric_param(request, TICKET_PARAM).map(TicketId::new)
}

fn numeric_param(request: &FragmentRequest, name: &str) -> Result<u64, Error> {
    let raw = request
        .param(name)
        .ok_or_else(|| Error::invalid_request(format!("{name} parameter is required")))?;
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_request(format!("invalid {name}: {raw}")))
}

/// Read a partial ticket edit out of the submitted form.
///
/// Absent fields stay untouched. `due` and `parent` distinguish "leave as
/// is" (absent) from "clear" (empty string, or `0` for the parent).
fn parse_ticket_update(request: &FragmentRequest) -> Result<TicketUpdate, Error> {
    let mut update = TicketUpdate::default();
    if let Some(headline) = request.param("headline") {
        update.headline = Some(headline.to_owned());
    }
    if let Some(description) = request.param("description") {
        update.description = Some(description.to_owned());
    }
    if let Some(raw) = request.param("status") {
        update.status = Some(
            raw.parse()
                .map_err(|err| Error::invalid_request(format!("{err}")))?,
        );
    }
    if let Some(raw) = request.param("type") {
        update.ticket_type = Some(
            raw.parse()
                .map_err(|err| Error::invalid_request(format!("{err}")))?,
        );
    }
    if let Some(raw) = request.param("priority") {
        let key: u8 = raw
            .trim()
            .parse()
            .map_err(|_| Error::invalid_request(format!("invalid priority: {raw}")))?;
        update.priority = Some(
            Priority::from_key(key)
                .ok_or_else(|| Error::invalid_request(format!("invalid priority: {raw}")))?,
        );
    }
    match request.param("effort") {
        None | Some("") => {}
        Some(raw) => {
            let points: u8 = raw
                .trim()
                .parse()
                .map_err(|_| Error::invalid_request(format!("invalid effort: {raw}")))?;
            update.effort = Some(points);
        }
    }
    if let Some(raw) = request.param("plannedHours") {
        let hours: f64 = raw
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| Error::invalid_request(format!("invalid planned hours: {raw}")))?;
        update.planned_hours = Some(hours);
    }
    update.due = match request.param("due") {
        None => None,
        Some("") => Some(None),
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| Error::invalid_request(format!("invalid due date: {raw}")))?;
            Some(Some(date.and_time(NaiveTime::MIN)))
        }
    };
    update.parent = match request.param("parent") {
        None => None,
        Some("" | "0") => Some(None),
        Some(raw) => {
            let id: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::invalid_request(format!("invalid parent: {raw}")))?;
            Some(Some(TicketId::new(id)))
        }
    };
    Ok(update)
}

/// Read the subtask editor form; an absent `subtaskId` means create.
fn parse_subtask_form(request: &FragmentRequest) -> Result<SubtaskForm, Error> {
    let id = match request.param("subtaskId") {
        None | Some("") => None,
        Some(raw) => {
            let id: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::invalid_request(format!("invalid subtaskId: {raw}")))?;
            Some(TicketId::new(id))
        }
    };
    let status = match request.param("status") {
        None | Some("") => TicketStatus::New,
        Some(raw) => raw
            .parse()
            .map_err(|err| Error::invalid_request(format!("{err}")))?,
    };
    Ok(SubtaskForm {
        id,
        headline: request.param_or("headline", "").to_owned(),
        description: request.param_or("description", "").to_owned(),
        status,
    })
}

/// Read the hour-booking form. The date defaults to today when left blank.
fn parse_time_log(request: &FragmentRequest, ticket: TicketId, user: UserId) -> Result<TimeLog, Error> {
    let kind = request
        .param("kind")
        .ok_or_else(|| Error::invalid_request("kind parameter is required"))?
        .parse()
        .map_err(|err| Error::invalid_request(format!("{err}")))?;
    let hours = parse_hours(request.param_or("hours", ""))
        .map_err(|err| Error::invalid_request(format!("{err}")))?;
    let date = match request.param("date") {
        None | Some("") => None,
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| Error::invalid_request(format!("invalid date: {raw}")))?,
        ),
    };
    Ok(TimeLog {
        ticket,
        user,
        kind,
        date,
        hours,
        description: request.param_or("description", "").to_owned(),
    })
}

/// Turn a mutation result into a flash notification on the next render.
///
/// Infrastructure failures abort the lifecycle instead; the registry and the
/// error fragment handle those.
fn flash(
    ctx: &mut FragmentContext<'_>,
    result: Result<(), Error>,
    success: &str,
) -> Result<(), Fault> {
    match result {
        Ok(()) => {
            push_notification(ctx.session(), Notification::success(success));
            Ok(())
        }
        Err(error) if error.code() == ErrorCode::InternalError => {
            Err(Fault::internal(error.message()))
        }
        Err(error) => {
            push_notification(ctx.session(), Notification::error(error.message()));
            Ok(())
        }
    }
}

/// Key/label pairs as a JSON object, in iteration order.
fn label_map<'a>(pairs: impl IntoIterator<Item = (String, &'a str)>) -> Value {
    Value::Object(
        pairs
            .into_iter()
            .map(|(key, label)| (key, Value::from(label)))
            .collect(),
    )
}
