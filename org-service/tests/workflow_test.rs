//! End-to-end walk through the resource tree: register, login, then build
//! groups, services, prompts, and answers top to bottom.

mod common;

use common::spawn_app;
use serde_json::{json, Value};

#[tokio::test]
#[ignore] // Requires database
async fn full_resource_tree_walkthrough() {
    let app = spawn_app().await;
    let (_, token) = app.register_and_login().await;

    // Fresh tenants start empty.
    let listed = app
        .client
        .get(app.url("/groups"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list groups");
    assert_eq!(listed.status(), 200);
    let body: Value = listed.json().await.expect("List response is not JSON");
    assert_eq!(body["groups"].as_array().map(Vec::len), Some(0));

    // Group.
    let group_id = app.create_group(&token, "Sales").await;
    assert!(
        group_id.parse::<i64>().is_err(),
        "boundary ids must be opaque, got {:?}",
        group_id
    );

    // Renaming echoes the updated group with its opaque id.
    let renamed = app
        .client
        .put(app.url(&format!("/groups/{}", group_id)))
        .bearer_auth(&token)
        .json(&json!({ "group_name": "Field Sales" }))
        .send()
        .await
        .expect("Failed to rename group");
    assert_eq!(renamed.status(), 200);
    let renamed: Value = renamed.json().await.expect("Rename response is not JSON");
    assert_eq!(renamed["id"], Value::String(group_id.clone()));
    assert_eq!(renamed["group_name"], "Field Sales");

    // Service under the group.
    let service = app
        .client
        .post(app.url(&format!("/groups/{}/services", group_id)))
        .bearer_auth(&token)
        .json(&json!({ "service_name": "Onboarding" }))
        .send()
        .await
        .expect("Failed to create service");
    assert_eq!(service.status(), 201);
    let service: Value = service.json().await.expect("Service response is not JSON");
    let service_id = service["id"].as_str().expect("Service has no id");
    assert_eq!(service["group_id"], Value::String(group_id.clone()));

    // Prompts under the service, inserted out of order.
    for (name, position) in [("Second", 1), ("First", 0)] {
        let prompt = app
            .client
            .post(app.url(&format!("/services/{}/prompts", service_id)))
            .bearer_auth(&token)
            .json(&json!({
                "prompt_name": name,
                "prompt_text": format!("{} question?", name),
                "position": position,
            }))
            .send()
            .await
            .expect("Failed to create prompt");
        assert_eq!(prompt.status(), 201);
    }

    // Listing comes back in position order.
    let prompts = app
        .client
        .get(app.url(&format!("/services/{}/prompts", service_id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list prompts");
    assert_eq!(prompts.status(), 200);
    let prompts: Value = prompts.json().await.expect("Prompt list is not JSON");
    let prompts = prompts["prompts"].as_array().expect("No prompt array");
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0]["prompt_name"], "First");
    assert_eq!(prompts[1]["prompt_name"], "Second");
    let first_prompt_id = prompts[0]["id"].as_str().expect("Prompt has no id");

    // Answers under the first prompt.
    let answer = app
        .client
        .post(app.url(&format!("/prompts/{}/answers", first_prompt_id)))
        .bearer_auth(&token)
        .json(&json!({ "answer_text": "Yes", "color": "green" }))
        .send()
        .await
        .expect("Failed to create answer");
    assert_eq!(answer.status(), 201);
    let answer: Value = answer.json().await.expect("Answer response is not JSON");
    let answer_id = answer["id"].as_str().expect("Answer has no id");

    // Updates echo the updated resource; a re-read agrees with the echo.
    let updated = app
        .client
        .put(app.url(&format!("/answers/{}", answer_id)))
        .bearer_auth(&token)
        .json(&json!({ "answer_text": "Absolutely", "color": "blue" }))
        .send()
        .await
        .expect("Failed to update answer");
    assert_eq!(updated.status(), 200);
    let updated: Value = updated.json().await.expect("Update response is not JSON");
    assert_eq!(updated["id"], Value::String(answer_id.to_string()));
    assert_eq!(updated["prompt_id"], Value::String(first_prompt_id.to_string()));
    assert_eq!(updated["answer_text"], "Absolutely");
    assert_eq!(updated["color"], "blue");

    let answers = app
        .client
        .get(app.url(&format!("/prompts/{}/answers", first_prompt_id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list answers");
    let answers: Value = answers.json().await.expect("Answer list is not JSON");
    assert_eq!(answers["answers"][0]["answer_text"], "Absolutely");
    assert_eq!(answers["answers"][0]["color"], "blue");

    // Deleting the group cascades through the whole subtree; the prompt
    // lookup afterwards resolves nothing and reads as 403.
    let deleted = app
        .client
        .delete(app.url(&format!("/groups/{}", group_id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete group");
    assert_eq!(deleted.status(), 204);

    let gone = app
        .client
        .get(app.url(&format!("/prompts/{}/answers", first_prompt_id)))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(gone.status(), 403);
}

#[tokio::test]
#[ignore] // Requires database
async fn health_endpoint_reports_service_identity() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to check health");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Health response is not JSON");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "org-service-test");
}
