/// Integration tests for the Taskhive API
///
/// These verify the full request path end-to-end: routing, token auth, the
/// authorization evaluator, transactional mutations, and the response
/// envelope. They need a running Postgres and are `#[ignore]`d by default:
///
/// ```bash
/// DATABASE_URL=postgresql://localhost/taskhive_test cargo test -p taskhive-api -- --ignored
/// ```

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_register_login_logout_flow() {
    let mut ctx = TestContext::new().await.unwrap();

    // The registration token authenticates
    let (status, body) = ctx.send("GET", "/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
    assert_eq!(body["data"]["id"], ctx.user_id.to_string());
    // The password hash must never appear in responses
    assert!(body["data"].get("password_hash").is_none());

    // Logout revokes the token
    let (status, _) = ctx.send("POST", "/logout", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx.send("GET", "/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_login_with_bad_password_is_unauthorized() {
    let mut ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send(
            "POST",
            "/login",
            Some(json!({"email": "nobody@example.com", "password": "wrong-password"})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], false);
}

/// User A creates project X; B joins as collaborator and creates task T;
/// A removes B's membership; T remains but B can no longer GET it.
#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_membership_removal_revokes_task_access() {
    let mut ctx = TestContext::new().await.unwrap();
    let (b_id, b_token) = ctx.register_user("Bella").await;

    // A creates project X
    let (status, body) = ctx
        .send("POST", "/projects", Some(json!({"name": "Project X"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    // A adds B as collaborator
    let (status, _) = ctx
        .send(
            "POST",
            &format!("/projects/{project_id}/members"),
            Some(json!({"user_id": b_id, "role": "collaborator"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // B creates task T in X
    let (status, body) = ctx
        .send_as(
            &b_token,
            "POST",
            "/tasks",
            Some(json!({"project_id": project_id, "title": "T"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    // B can read T while a member
    let (status, _) = ctx
        .send_as(&b_token, "GET", &format!("/tasks/{task_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // A removes B's membership
    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/projects/{project_id}/members/{b_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // T remains, A still sees it
    let (status, _) = ctx.send("GET", &format!("/tasks/{task_id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    // But B is locked out now
    let (status, body) = ctx
        .send_as(&b_token, "GET", &format!("/tasks/{task_id}"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], false);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_duplicate_member_is_conflict_not_forbidden() {
    let mut ctx = TestContext::new().await.unwrap();
    let (b_id, _) = ctx.register_user("Bella").await;

    let (_, body) = ctx
        .send("POST", "/projects", Some(json!({"name": "Project X"})))
        .await;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    let member = json!({"user_id": b_id, "role": "member"});

    let (status, _) = ctx
        .send(
            "POST",
            &format!("/projects/{project_id}/members"),
            Some(member.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Second attempt: 422 conflict, not 403
    let (status, body) = ctx
        .send(
            "POST",
            &format!("/projects/{project_id}/members"),
            Some(member),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "User already in project");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_owner_cannot_be_removed() {
    let mut ctx = TestContext::new().await.unwrap();

    let (_, body) = ctx
        .send("POST", "/projects", Some(json!({"name": "Project X"})))
        .await;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();
    let owner_id = ctx.user_id;

    // Even the owner, with full management rights, cannot remove themselves
    let (status, _) = ctx
        .send(
            "DELETE",
            &format!("/projects/{project_id}/members/{owner_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_only_owner_id_holder_deletes_project() {
    let mut ctx = TestContext::new().await.unwrap();
    let (b_id, b_token) = ctx.register_user("Bella").await;

    let (_, body) = ctx
        .send("POST", "/projects", Some(json!({"name": "Project X"})))
        .await;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    // B is made co_owner: pivot role alone must not grant deletion
    ctx.send(
        "POST",
        &format!("/projects/{project_id}/members"),
        Some(json!({"user_id": b_id, "role": "co_owner"})),
    )
    .await;

    let (status, _) = ctx
        .send_as(&b_token, "DELETE", &format!("/projects/{project_id}"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner_id holder can
    let (status, _) = ctx
        .send("DELETE", &format!("/projects/{project_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_personal_task_is_private_and_creator_sticky() {
    let mut ctx = TestContext::new().await.unwrap();
    let (_, b_token) = ctx.register_user("Bella").await;
    let creator_id = ctx.user_id;

    // C creates a personal task
    let (status, body) = ctx
        .send("POST", "/tasks", Some(json!({"title": "Personal errand"})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    // Creator was auto-assigned
    let assignees = body["data"]["assignees"].as_array().unwrap();
    assert_eq!(assignees.len(), 1);
    assert_eq!(assignees[0]["id"], creator_id.to_string());

    // Other users cannot see it
    let (status, _) = ctx
        .send_as(&b_token, "GET", &format!("/tasks/{task_id}"), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The creator cannot self-unassign from a personal task
    let (status, body) = ctx
        .send(
            "DELETE",
            &format!("/tasks/{task_id}/assign/{creator_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot remove the creator from a personal task");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_duplicate_assignment_is_conflict() {
    let mut ctx = TestContext::new().await.unwrap();
    let creator_id = ctx.user_id;

    let (_, body) = ctx
        .send("POST", "/tasks", Some(json!({"title": "Solo task"})))
        .await;
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    // The creator is already assigned from creation
    let (status, body) = ctx
        .send(
            "POST",
            &format!("/tasks/{task_id}/assign"),
            Some(json!({"user_id": creator_id})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "User already assigned");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_comment_task_mismatch_is_validation_error() {
    let mut ctx = TestContext::new().await.unwrap();

    // Two projects; a task in the second
    let (_, body) = ctx
        .send("POST", "/projects", Some(json!({"name": "Project A"})))
        .await;
    let project_a = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = ctx
        .send("POST", "/projects", Some(json!({"name": "Project B"})))
        .await;
    let project_b = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = ctx
        .send(
            "POST",
            "/tasks",
            Some(json!({"project_id": project_b, "title": "B task"})),
        )
        .await;
    let task_b = body["data"]["id"].as_str().unwrap().to_string();

    // Commenting on project A naming B's task: 422 validation, not 403
    let (status, body) = ctx
        .send(
            "POST",
            "/comments",
            Some(json!({
                "project_id": project_a,
                "task_id": task_b,
                "content": "misfiled",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "task_id");
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_comment_notifies_privileged_members_except_author() {
    let mut ctx = TestContext::new().await.unwrap();
    let (b_id, b_token) = ctx.register_user("Bella").await;
    let (c_id, _) = ctx.register_user("Carol").await;

    let (_, body) = ctx
        .send("POST", "/projects", Some(json!({"name": "Project X"})))
        .await;
    let project_id = body["data"]["id"].as_str().unwrap().to_string();

    // B collaborates (notified), C is a plain member (not notified)
    ctx.send(
        "POST",
        &format!("/projects/{project_id}/members"),
        Some(json!({"user_id": b_id, "role": "collaborator"})),
    )
    .await;
    ctx.send(
        "POST",
        &format!("/projects/{project_id}/members"),
        Some(json!({"user_id": c_id, "role": "member"})),
    )
    .await;

    // B comments: the owner should be notified, B (author) and C should not
    let (status, _) = ctx
        .send_as(
            &b_token,
            "POST",
            "/comments",
            Some(json!({"project_id": project_id, "content": "First!"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Dispatch is asynchronous; give the drain task a moment
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let owner_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(ctx.user_id)
            .fetch_one(&ctx.db)
            .await
            .unwrap();
    assert_eq!(owner_count, 1);

    for silent in [b_id, c_id] {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(silent)
                .fetch_one(&ctx.db)
                .await
                .unwrap();
        assert_eq!(count, 0);
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn test_dashboard_overdue_boundary() {
    let mut ctx = TestContext::new().await.unwrap();

    let today = chrono::Utc::now().date_naive();
    let yesterday = today.pred_opt().unwrap();

    // One task overdue, one due today (not overdue), one completed-overdue
    for (due, status) in [
        (yesterday, "pending"),
        (today, "pending"),
        (yesterday, "completed"),
    ] {
        let (code, _) = ctx
            .send(
                "POST",
                "/tasks",
                Some(json!({"title": "t", "due_date": due.to_string(), "status": status})),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (status, body) = ctx.send("GET", "/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_tasks"], 3);
    assert_eq!(body["data"]["completed"], 1);
    assert_eq!(body["data"]["pending"], 2);
    // Only the pending task due yesterday counts
    assert_eq!(body["data"]["overdue"], 1);
}
