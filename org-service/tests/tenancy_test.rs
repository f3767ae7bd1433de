//! Tenant-boundary and role enforcement tests. Everything here exercises the
//! single ownership rule: the target's company must be the caller's company,
//! and mutations additionally need an admin role.

mod common;

use common::spawn_app;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
#[ignore] // Requires database
async fn cross_tenant_access_is_forbidden() {
    let app = spawn_app().await;
    let (_, token_a) = app.register_and_login().await;
    let (_, token_b) = app.register_and_login().await;

    let group_id = app.create_group(&token_a, "Sales").await;

    // Tenant B can decode nothing about tenant A's group: read, update, and
    // delete all come back 403.
    let read = app
        .client
        .get(app.url(&format!("/groups/{}/services", group_id)))
        .bearer_auth(&token_b)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(read.status(), 403);

    let update = app
        .client
        .put(app.url(&format!("/groups/{}", group_id)))
        .bearer_auth(&token_b)
        .json(&json!({ "group_name": "Hijacked" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(update.status(), 403);

    let delete = app
        .client
        .delete(app.url(&format!("/groups/{}", group_id)))
        .bearer_auth(&token_b)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(delete.status(), 403);
}

#[tokio::test]
#[ignore] // Requires database
async fn nonexistent_resource_is_indistinguishable_from_cross_tenant() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login().await;
    let group_id = app.create_group(&token, "Sales").await;

    // Delete it, then hit it again: still 403, never 404.
    let delete = app
        .client
        .delete(app.url(&format!("/groups/{}", group_id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(delete.status(), 204);

    let again = app
        .client
        .delete(app.url(&format!("/groups/{}", group_id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(again.status(), 403);
}

#[tokio::test]
#[ignore] // Requires database
async fn garbage_path_id_is_a_bad_request() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login().await;

    for bad_id in ["1", "zzzz", "AAAAAAAAAAAAAAAA"] {
        let response = app
            .client
            .delete(app.url(&format!("/groups/{}", bad_id)))
            .bearer_auth(&token)
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 400, "id {:?} should be rejected", bad_id);
    }
}

#[tokio::test]
#[ignore] // Requires database
async fn plain_members_can_read_but_not_mutate() {
    let app = spawn_app().await;
    let (_, admin_token) = app.register_and_login().await;
    let group_id = app.create_group(&admin_token, "Sales").await;

    // Mint a plain user in the same company and login as them.
    let member_email = format!("member-{}@example.com", Uuid::new_v4());
    let created = app
        .client
        .post(app.url("/users"))
        .bearer_auth(&admin_token)
        .json(&json!({
            "email": member_email,
            "password": "member password 1",
            "first_name": "Plain",
            "last_name": "Member",
            "role": "user",
        }))
        .send()
        .await
        .expect("Failed to create member");
    assert_eq!(created.status(), 201);
    let member_token = app.login(&member_email, "member password 1").await;

    // Reads inside the company succeed.
    let read = app
        .client
        .get(app.url(&format!("/groups/{}/services", group_id)))
        .bearer_auth(&member_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(read.status(), 200);

    // Mutations need an admin role.
    let create = app
        .client
        .post(app.url("/groups"))
        .bearer_auth(&member_token)
        .json(&json!({ "group_name": "Rogue" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(create.status(), 403);

    let update = app
        .client
        .put(app.url(&format!("/groups/{}", group_id)))
        .bearer_auth(&member_token)
        .json(&json!({ "group_name": "Rogue" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(update.status(), 403);
}

#[tokio::test]
#[ignore] // Requires database
async fn superadmins_cannot_be_minted_through_user_creation() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login().await;

    let response = app
        .client
        .post(app.url("/users"))
        .bearer_auth(&token)
        .json(&json!({
            "email": format!("evil-{}@example.com", Uuid::new_v4()),
            "password": "superadmin wannabe",
            "first_name": "Evil",
            "last_name": "Twin",
            "role": "superadmin",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);
}

#[tokio::test]
#[ignore] // Requires database
async fn snippets_dispatch_on_their_owner_kind() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login().await;
    let group_id = app.create_group(&token, "Sales").await;

    // Snippet on the group.
    let created = app
        .client
        .post(app.url("/snippets"))
        .bearer_auth(&token)
        .json(&json!({
            "snippet_name": "greeting",
            "markdown": "# Hello",
            "owner_kind": "group",
            "owner_id": group_id,
        }))
        .send()
        .await
        .expect("Failed to create snippet");
    assert_eq!(created.status(), 201);
    let snippet: Value = created.json().await.expect("Snippet response is not JSON");
    assert_eq!(snippet["owner_kind"], "group");
    assert_eq!(snippet["owner_id"], Value::String(group_id.clone()));
    let snippet_id = snippet["id"].as_str().expect("Snippet has no id");

    // Updating echoes the snippet with its owner intact.
    let updated = app
        .client
        .put(app.url(&format!("/snippets/{}", snippet_id)))
        .bearer_auth(&token)
        .json(&json!({ "snippet_name": "greeting", "markdown": "# Hello again" }))
        .send()
        .await
        .expect("Failed to update snippet");
    assert_eq!(updated.status(), 200);
    let updated: Value = updated.json().await.expect("Update response is not JSON");
    assert_eq!(updated["id"], Value::String(snippet_id.to_string()));
    assert_eq!(updated["owner_kind"], "group");
    assert_eq!(updated["owner_id"], Value::String(group_id.clone()));
    assert_eq!(updated["markdown"], "# Hello again");

    // Listing is scoped to one owner.
    let listed = app
        .client
        .get(app.url("/snippets"))
        .query(&[("owner_kind", "group"), ("owner_id", group_id.as_str())])
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list snippets");
    assert_eq!(listed.status(), 200);
    let body: Value = listed.json().await.expect("List response is not JSON");
    assert_eq!(body["snippets"].as_array().map(Vec::len), Some(1));

    // An unknown owner kind never reaches the database.
    let rejected = app
        .client
        .post(app.url("/snippets"))
        .bearer_auth(&token)
        .json(&json!({
            "snippet_name": "greeting",
            "markdown": "# Hello",
            "owner_kind": "prompt",
            "owner_id": group_id,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(rejected.status(), 400);
}

#[tokio::test]
#[ignore] // Requires database
async fn actions_check_every_referenced_resource() {
    let app = spawn_app().await;
    let (_, token_a) = app.register_and_login().await;
    let (_, token_b) = app.register_and_login().await;

    let group_a = app.create_group(&token_a, "Sales").await;
    let group_b = app.create_group(&token_b, "Intruders").await;

    let snippet = app
        .client
        .post(app.url("/snippets"))
        .bearer_auth(&token_a)
        .json(&json!({
            "snippet_name": "greeting",
            "markdown": "# Hello",
            "owner_kind": "group",
            "owner_id": group_a,
        }))
        .send()
        .await
        .expect("Failed to create snippet");
    assert_eq!(snippet.status(), 201);
    let snippet: Value = snippet.json().await.expect("Snippet response is not JSON");
    let snippet_id = snippet["id"].as_str().expect("Snippet has no id");

    // Same tenant: allowed.
    let action = app
        .client
        .post(app.url("/actions"))
        .bearer_auth(&token_a)
        .json(&json!({
            "action_kind": "show",
            "owner_kind": "group",
            "owner_id": group_a,
            "snippet_id": snippet_id,
        }))
        .send()
        .await
        .expect("Failed to create action");
    assert_eq!(action.status(), 201);

    // Tenant B cannot attach tenant A's snippet to its own group.
    let stolen = app
        .client
        .post(app.url("/actions"))
        .bearer_auth(&token_b)
        .json(&json!({
            "action_kind": "show",
            "owner_kind": "group",
            "owner_id": group_b,
            "snippet_id": snippet_id,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(stolen.status(), 403);
}

#[tokio::test]
#[ignore] // Requires database
async fn validation_failures_are_bad_requests() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login().await;

    // An empty group name fails the length constraint.
    let response = app
        .client
        .post(app.url("/groups"))
        .bearer_auth(&token)
        .json(&json!({ "group_name": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // A short registration password fails before any database work.
    let response = app
        .client
        .post(app.url("/orgs/register"))
        .json(&json!({
            "email": format!("short-{}@example.com", Uuid::new_v4()),
            "password": "short",
            "first_name": "Too",
            "last_name": "Short",
            "company_name": "Short Co",
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}
