mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, access_token_for, create_account, get, send, setup_test_app};
use scholaris_core::Role;
use scholaris_models::{Account, StudentProfile};

struct Family {
    student_account: Account,
    student: StudentProfile,
    other_student: StudentProfile,
    parent_account: Account,
    parent_id: Uuid,
    teacher_account: Account,
    teacher_id: Uuid,
    class_id: Uuid,
}

fn seed_family(app: &TestApp) -> Family {
    let class_id = Uuid::new_v4();
    let other_class = Uuid::new_v4();

    let student_account = create_account(&app.store, "ada@school.com", "student123", Role::Student);
    let student = app
        .store
        .insert_student(student_account.id, "Ada", "Obi", Some(class_id))
        .unwrap();

    let other_account = create_account(&app.store, "bola@school.com", "student123", Role::Student);
    let other_student = app
        .store
        .insert_student(other_account.id, "Bola", "Ade", Some(other_class))
        .unwrap();

    let parent_account = create_account(&app.store, "ngozi@school.com", "parent123", Role::Parent);
    let parent = app
        .store
        .insert_parent(parent_account.id, "Ngozi", "Obi")
        .unwrap();

    let teacher_account = create_account(&app.store, "mr.eze@school.com", "teach123", Role::Teacher);
    let teacher = app
        .store
        .insert_teacher(teacher_account.id, "Chidi", "Eze")
        .unwrap();
    app.store.assign_teacher(teacher.id, class_id).unwrap();

    Family {
        student_account,
        student,
        other_student,
        parent_account,
        parent_id: parent.id,
        teacher_account,
        teacher_id: teacher.id,
        class_id,
    }
}

fn student_uri(id: Uuid) -> String {
    format!("/api/students/{}", id)
}

#[tokio::test]
async fn test_parent_needs_active_link() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.parent_account);
    let uri = student_uri(family.student.id);

    let (status, body) = send(&app, get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({ "error": "Access denied - resource not found or not owned" })
    );

    app.store
        .link_parent(family.parent_id, family.student.id, false)
        .unwrap();
    let (status, _) = send(&app, get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.store
        .link_parent(family.parent_id, family.student.id, true)
        .unwrap();
    let (status, body) = send(&app, get(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], family.student.id.to_string());
}

#[tokio::test]
async fn test_student_sees_only_own_record() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.student_account);

    let (status, body) = send(&app, get(&student_uri(family.student.id), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Ada");

    let (status, _) = send(
        &app,
        get(&student_uri(family.other_student.id), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_teacher_sees_students_of_assigned_class() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.teacher_account);

    let (status, body) = send(&app, get(&student_uri(family.student.id), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_class_id"], family.class_id.to_string());

    let (status, _) = send(
        &app,
        get(&student_uri(family.other_student.id), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_bypasses_ownership() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &app.admin);

    let (status, _) = send(
        &app,
        get(&student_uri(family.other_student.id), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get(&student_uri(Uuid::new_v4()), Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");
    assert_eq!(app.store.relationship_queries(), 0);
}

#[tokio::test]
async fn test_unknown_record_is_indistinguishable_from_unowned() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.student_account);

    let (missing_status, missing) =
        send(&app, get(&student_uri(Uuid::new_v4()), Some(&token))).await;
    let (unowned_status, unowned) = send(
        &app,
        get(&student_uri(family.other_student.id), Some(&token)),
    )
    .await;

    assert_eq!(missing_status, StatusCode::FORBIDDEN);
    assert_eq!(missing_status, unowned_status);
    assert_eq!(missing, unowned);
}

#[tokio::test]
async fn test_malformed_resource_id() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.parent_account);

    let (status, body) = send(&app, get("/api/students/not-a-uuid", Some(&token))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid resource id");
    assert_eq!(app.store.relationship_queries(), 0);
}

#[tokio::test]
async fn test_teacher_record_ownership() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.teacher_account);

    let colleague_account =
        create_account(&app.store, "mrs.okafor@school.com", "teach123", Role::Teacher);
    let colleague = app
        .store
        .insert_teacher(colleague_account.id, "Amaka", "Okafor")
        .unwrap();

    let (status, body) = send(
        &app,
        get(&format!("/api/teachers/{}", family.teacher_id), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["last_name"], "Eze");

    let (status, _) = send(
        &app,
        get(&format!("/api/teachers/{}", colleague.id), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_role_gate_runs_before_ownership() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.student_account);

    let (status, body) = send(
        &app,
        get(&format!("/api/teachers/{}", family.teacher_id), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Insufficient permissions");
    assert_eq!(app.store.relationship_queries(), 0);
}

#[tokio::test]
async fn test_parent_sees_own_parent_record() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.parent_account);

    let (status, body) = send(
        &app,
        get(&format!("/api/parents/{}", family.parent_id), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], family.parent_account.id.to_string());
}

#[tokio::test]
async fn test_one_relationship_query_per_request() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.student_account);

    for expected in 1..=3 {
        send(&app, get(&student_uri(family.student.id), Some(&token))).await;
        assert_eq!(app.store.relationship_queries(), expected);
    }
}

#[tokio::test]
async fn test_ownership_store_outage() {
    let app = setup_test_app();
    let family = seed_family(&app);
    let token = access_token_for(&app, &family.parent_account);

    let (status, _) = send(&app, get(&student_uri(family.student.id), Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.store.set_unavailable(true);
    let (status, body) = send(&app, get(&student_uri(family.student.id), Some(&token))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Authorization check failed");
}
