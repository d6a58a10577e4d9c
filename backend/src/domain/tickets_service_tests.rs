//! Tests for the ticket service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::MockTicketRepository;
use crate::domain::{ErrorCode, Priority, TicketStatus, TicketType};

fn make_service(repo: MockTicketRepository) -> RepositoryTicketService<MockTicketRepository> {
    RepositoryTicketService::new(Arc::new(repo))
}

fn ticket(id: u64, parent: Option<u64>) -> Ticket {
    Ticket::try_new(
        TicketId::new(id),
        ProjectId::new(1),
        parent.map(TicketId::new),
        format!("ticket {id}"),
        "",
        TicketStatus::New,
        TicketType::Task,
        Priority::Medium,
        None,
        0.0,
        None,
    )
    .expect("valid ticket")
}

fn milestone(id: u64, headline: &str) -> Ticket {
    Ticket::try_new(
        TicketId::new(id),
        ProjectId::new(1),
        None,
        headline,
        "",
        TicketStatus::New,
        TicketType::Milestone,
        Priority::Medium,
        None,
        0.0,
        None,
    )
    .expect("valid milestone")
}

#[tokio::test]
async fn get_ticket_surfaces_missing_tickets_as_not_found() {
    let mut repo = MockTicketRepository::new();
    repo.expect_find().times(1).return_once(|_| Ok(None));

    let service = make_service(repo);
    let err = service
        .get_ticket(TicketId::new(7))
        .await
        .expect_err("missing ticket");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_persists_valid_changes() {
    let mut repo = MockTicketRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_| Ok(Some(ticket(7, None))));
    repo.expect_save()
        .withf(|saved: &Ticket| {
            saved.headline() == "Ship it" && saved.status() == TicketStatus::InProgress
        })
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(repo);
    let updated = service
        .update_ticket(
            TicketId::new(7),
            TicketUpdate {
                headline: Some("Ship it".into()),
                status: Some(TicketStatus::InProgress),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect("valid update");
    assert_eq!(updated.headline(), "Ship it");
}

#[tokio::test]
async fn update_rejects_invalid_patches_without_saving() {
    let mut repo = MockTicketRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_| Ok(Some(ticket(7, None))));
    repo.expect_save().times(0);

    let service = make_service(repo);
    let err = service
        .update_ticket(
            TicketId::new(7),
            TicketUpdate {
                headline: Some("   ".into()),
                ..TicketUpdate::default()
            },
        )
        .await
        .expect_err("blank headline");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn possible_parents_exclude_the_ticket_and_its_descendants() {
    let mut repo = MockTicketRepository::new();
    repo.expect_list_for_project().times(1).return_once(|_| {
        Ok(vec![
            ticket(1, None),
            ticket(2, Some(1)),
            ticket(3, Some(2)),
            ticket(4, None),
        ])
    });

    let service = make_service(repo);
    let parents = service
        .possible_parents(ProjectId::new(1), TicketId::new(1))
        .await
        .expect("candidate list");

    let ids: Vec<TicketId> = parents.iter().map(Ticket::id).collect();
    assert_eq!(ids, vec![TicketId::new(4)]);
}

#[tokio::test]
async fn milestones_keep_only_milestone_tickets() {
    let mut repo = MockTicketRepository::new();
    repo.expect_list_for_project().times(1).return_once(|_| {
        Ok(vec![
            ticket(1, None),
            milestone(2, "Beta cut"),
            ticket(3, Some(1)),
            milestone(4, "Launch"),
        ])
    });

    let service = make_service(repo);
    let milestones = service
        .milestones_for(ProjectId::new(1))
        .await
        .expect("milestone list");

    let ids: Vec<TicketId> = milestones.iter().map(Ticket::id).collect();
    assert_eq!(ids, vec![TicketId::new(2), TicketId::new(4)]);
}

#[tokio::test]
async fn upsert_inserts_when_the_form_has_no_id() {
    let mut repo = MockTicketRepository::new();
    repo.expect_insert_subtask()
        .withf(|project, parent, form| {
            *project == ProjectId::new(1)
                && *parent == TicketId::new(7)
                && form.headline == "Write docs"
        })
        .times(1)
        .return_once(|_, parent, form| {
            Ticket::try_new(
                TicketId::new(8),
                ProjectId::new(1),
                Some(parent),
                form.headline,
                form.description,
                form.status,
                TicketType::Task,
                Priority::Medium,
                None,
                0.0,
                None,
            )
            .map_err(|err| TicketRepositoryError::query(err.to_string()))
        });

    let service = make_service(repo);
    let created = service
        .upsert_subtask(
            ProjectId::new(1),
            TicketId::new(7),
            SubtaskForm {
                id: None,
                headline: "Write docs".into(),
                description: "".into(),
                status: TicketStatus::New,
            },
        )
        .await
        .expect("created subtask");
    assert_eq!(created.id(), TicketId::new(8));
    assert_eq!(created.parent(), Some(TicketId::new(7)));
}

#[tokio::test]
async fn upsert_updates_when_the_form_names_a_subtask() {
    let mut repo = MockTicketRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_| Ok(Some(ticket(8, Some(7)))));
    repo.expect_insert_subtask().times(0);
    repo.expect_save()
        .withf(|saved: &Ticket| saved.status() == TicketStatus::Done)
        .times(1)
        .return_once(|_| Ok(()));

    let service = make_service(repo);
    let updated = service
        .upsert_subtask(
            ProjectId::new(1),
            TicketId::new(7),
            SubtaskForm {
                id: Some(TicketId::new(8)),
                headline: "ticket 8".into(),
                description: "".into(),
                status: TicketStatus::Done,
            },
        )
        .await
        .expect("updated subtask");
    assert_eq!(updated.status(), TicketStatus::Done);
}

#[tokio::test]
async fn connection_faults_map_to_internal_errors() {
    let mut repo = MockTicketRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(|_| Err(TicketRepositoryError::connection("socket closed")));

    let service = make_service(repo);
    let err = service
        .get_ticket(TicketId::new(7))
        .await
        .expect_err("infra fault");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
