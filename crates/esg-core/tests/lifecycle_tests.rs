mod support;

use esg_core::{CoreError, EsgStore, FormInput, FormValue, InMemoryEsgStore, MappedPayload, NewSubmission,
               SubmissionIntent, SubmissionLifecycle, SubmissionRequest};
use esg_domain::{DetailRecord, EsgType, NewSite, ReportingPeriod, SubmissionStatus};
use uuid::Uuid;

fn request(site_id: Uuid, intent: SubmissionIntent) -> SubmissionRequest {
    SubmissionRequest { site_id,
                        period: ReportingPeriod::for_month(2024, 2).unwrap(),
                        submitted_by: "ana@plant.io".into(),
                        intent }
}

fn form(s: &support::Seeded) -> FormInput {
    let mut form = FormInput::new();
    form.insert(s.param("Total Electricity").id, FormValue::from("1500"));
    form.insert(s.param("Renewable PPA").id, FormValue::from("300"));
    form.insert(s.param("Total Employees").id, FormValue::from("120"));
    form.insert(s.param("Board Members").id, FormValue::from("9"));
    form
}

#[test]
fn pending_then_approve() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    let id = lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SubmitForApproval), &form(&s))
                      .unwrap();

    let created = lifecycle.details(id).unwrap();
    assert_eq!(created.submission.status, SubmissionStatus::Pending);
    assert!(created.submission.reviewed_at.is_none());
    assert_eq!(created.submission.period_start.to_string(), "2024-02-01");
    assert_eq!(created.submission.period_end.to_string(), "2024-02-29");
    assert_eq!(created.environmental.get("total_electricity"), 1500.0);
    assert_eq!(created.social.get("total_employees"), 120.0);
    assert_eq!(created.governance.get("board_members"), 9.0);

    let approved = lifecycle.approve(id, "reviewer@esg.local").unwrap();
    assert_eq!(approved.status, SubmissionStatus::Approved);
    assert!(approved.reviewed_at.is_some());
    assert_eq!(approved.review_comment, None);
    assert_eq!(approved.reviewer.as_deref(), Some("reviewer@esg.local"));
}

#[test]
fn reject_requires_comment_and_leaves_state_untouched() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    let id = lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SubmitForApproval), &form(&s))
                      .unwrap();

    let err = lifecycle.reject(id, "reviewer@esg.local", "  ").unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
    let unchanged = s.store.find_submission(id).unwrap().unwrap();
    assert_eq!(unchanged.status, SubmissionStatus::Pending);
    assert!(unchanged.reviewed_at.is_none());

    let rejected = lifecycle.reject(id, "reviewer@esg.local", "faltan facturas de energía").unwrap();
    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(rejected.review_comment.as_deref(), Some("faltan facturas de energía"));
    assert!(rejected.reviewed_at.is_some());
}

#[test]
fn terminal_and_draft_submissions_cannot_be_reviewed() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    let pending = lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SubmitForApproval), &form(&s))
                           .unwrap();
    lifecycle.approve(pending, "reviewer@esg.local").unwrap();
    let again = lifecycle.reject(pending, "reviewer@esg.local", "cambio de opinión").unwrap_err();
    assert_eq!(again,
               CoreError::InvalidTransition { from: SubmissionStatus::Approved,
                                              to: SubmissionStatus::Rejected });

    let draft = lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SaveDraft), &form(&s)).unwrap();
    let err = lifecycle.approve(draft, "reviewer@esg.local").unwrap_err();
    assert_eq!(err,
               CoreError::InvalidTransition { from: SubmissionStatus::Draft,
                                              to: SubmissionStatus::Approved });
}

#[test]
fn store_update_status_timestamps_every_call() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    let id = lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SubmitForApproval), &form(&s))
                      .unwrap();
    let first = s.store.update_status(id, SubmissionStatus::Approved, "a", None).unwrap();
    let second = s.store.update_status(id, SubmissionStatus::Approved, "b", None).unwrap();
    assert!(second.reviewed_at.unwrap() >= first.reviewed_at.unwrap());
    assert_eq!(second.reviewer.as_deref(), Some("b"));
}

#[test]
fn unknown_submission_is_not_found() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    assert!(matches!(lifecycle.approve(Uuid::new_v4(), "r"), Err(CoreError::NotFound(_))));
    assert!(matches!(lifecycle.details(Uuid::new_v4()), Err(CoreError::NotFound(_))));
}

#[test]
fn list_is_most_recently_updated_first_and_pending_queue_filters() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    let a = lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SubmitForApproval), &form(&s)).unwrap();
    let b = lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SubmitForApproval), &form(&s)).unwrap();
    let ids: Vec<Uuid> = lifecycle.list().unwrap().iter().map(|x| x.submission.id).collect();
    assert_eq!(ids, vec![b, a]);

    lifecycle.approve(a, "reviewer@esg.local").unwrap();
    let listed = lifecycle.list().unwrap();
    assert_eq!(listed[0].submission.id, a);
    assert_eq!(listed[0].site_name, "Pune Plant");

    let pending: Vec<Uuid> = lifecycle.pending().unwrap().iter().map(|x| x.submission.id).collect();
    assert_eq!(pending, vec![b]);
}

#[test]
fn missing_site_or_submitter_is_rejected_before_writing() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    let err = lifecycle.submit_form(&request(Uuid::new_v4(), SubmissionIntent::SaveDraft), &form(&s))
                       .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let mut anonymous = request(s.site.id, SubmissionIntent::SaveDraft);
    anonymous.submitted_by = " ".into();
    assert!(matches!(lifecycle.submit_form(&anonymous, &form(&s)), Err(CoreError::Validation(_))));
    assert!(lifecycle.list().unwrap().is_empty());
}

#[test]
fn unknown_column_in_payload_writes_nothing() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    let mut payload = MappedPayload::default();
    payload.environmental.insert("total_electricity", 10.0);
    payload.social.insert("solar_thermal", 1.0);
    let err = lifecycle.submit(&request(s.site.id, SubmissionIntent::SubmitForApproval), payload)
                       .unwrap_err();
    assert_eq!(err,
               CoreError::UnknownColumn { esg_type: EsgType::Social,
                                          column: "solar_thermal".into() });
    assert!(s.store.fetch_submissions().unwrap().is_empty());
}

#[test]
fn store_rejects_non_initial_status_on_create() {
    let store = InMemoryEsgStore::new();
    let site = store.insert_site(NewSite { name: "Chennai DC".into(), location: None, site_type: None }).unwrap();
    let new = NewSubmission { site_id: site.id,
                              period: ReportingPeriod::for_month(2024, 1).unwrap(),
                              submitted_by: "ana@plant.io".into(),
                              status: SubmissionStatus::Approved,
                              environmental: DetailRecord::new(),
                              social: DetailRecord::new(),
                              governance: DetailRecord::new() };
    assert!(matches!(store.create_submission(new), Err(CoreError::Validation(_))));
}

#[test]
fn missing_detail_row_reads_as_empty_record() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    let id = lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SubmitForApproval), &form(&s))
                      .unwrap();
    s.store.remove_detail_row(id, EsgType::Social).unwrap();
    let details = lifecycle.details(id).unwrap();
    assert!(details.social.is_empty());
    assert_eq!(details.social.get("total_employees"), 0.0);
    assert_eq!(details.environmental.get("total_electricity"), 1500.0);
}

#[test]
fn site_with_submissions_cannot_be_deleted() {
    let s = support::seeded();
    let lifecycle = SubmissionLifecycle::new(&s.store);
    lifecycle.submit_form(&request(s.site.id, SubmissionIntent::SaveDraft), &form(&s)).unwrap();
    assert!(matches!(s.store.delete_site(s.site.id), Err(CoreError::Conflict(_))));
    assert!(s.store.find_site(s.site.id).unwrap().is_some());
}
