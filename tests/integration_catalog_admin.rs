mod common;

use common::{TestContext, location};
use serde_json::{Value, json};

fn titles(catalog: &Value) -> Vec<String> {
    catalog["simulations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap().to_string())
        .collect()
}

fn simulation_form(title: &str) -> Value {
    json!({
        "title": title,
        "category": "cloud",
        "level": "beginner",
        "duration": "1.5 hours",
        "description": "Provision serverless functions end to end"
    })
}

#[tokio::test]
async fn catalog_lists_seed_in_order() {
    let context = TestContext::spawn().await;

    let catalog = context.get_json("/simulations").await;
    assert_eq!(catalog["view"], "simulations");
    assert_eq!(catalog["count"], 6);
    assert_eq!(catalog["empty"], false);
    assert_eq!(catalog["empty_message"], Value::Null);
    assert_eq!(titles(&catalog)[0], "Neural Network Fundamentals");
    assert_eq!(catalog["criteria"]["category"], "all");
    assert_eq!(catalog["categories"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn catalog_filters_by_category_and_level() {
    let context = TestContext::spawn().await;

    let security = context.get_json("/simulations?category=cybersecurity").await;
    assert_eq!(
        titles(&security),
        vec!["SQL Injection Defense", "API Security Best Practices"]
    );

    let narrowed = context
        .get_json("/simulations?category=cybersecurity&level=beginner")
        .await;
    assert_eq!(titles(&narrowed), vec!["API Security Best Practices"]);

    let search = context.get_json("/simulations?search=SMART%20contracts").await;
    assert_eq!(titles(&search), vec!["Blockchain Smart Contracts"]);

    let by_description = context.get_json("/simulations?search=orchestration").await;
    assert_eq!(titles(&by_description), vec!["Kubernetes Deployment"]);
}

#[tokio::test]
async fn catalog_reports_empty_state() {
    let context = TestContext::spawn().await;

    let catalog = context.get_json("/simulations?search=quantum").await;
    assert_eq!(catalog["count"], 0);
    assert_eq!(catalog["empty"], true);
    assert_eq!(
        catalog["empty_message"],
        "No simulations found matching your criteria."
    );
}

#[tokio::test]
async fn unknown_category_is_rejected() {
    let context = TestContext::spawn().await;

    let response = context.get("/simulations?category=robotics").await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn admin_api_requires_csrf_header() {
    let context = TestContext::spawn().await;
    context.login_admin().await;

    let response = context
        .client
        .post(context.url("/api/admin/simulations"))
        .json(&simulation_form("Serverless Basics"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(context.state.catalog.len().await, 6);
}

#[tokio::test]
async fn admin_api_denies_learners() {
    let context = TestContext::spawn().await;
    let csrf = context.login("learner@example.com", "hunter22").await;

    let response = context
        .client
        .post(context.url("/api/admin/simulations"))
        .header("x-csrf-token", csrf)
        .json(&simulation_form("Serverless Basics"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response).as_deref(), Some("/login"));
    assert_eq!(context.state.catalog.len().await, 6);
}

#[tokio::test]
async fn admin_creates_updates_and_deletes() {
    let context = TestContext::spawn().await;
    let csrf = context.login_admin().await;

    let created = context
        .client
        .post(context.url("/api/admin/simulations"))
        .header("x-csrf-token", &csrf)
        .json(&simulation_form("  Serverless Basics  "))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status().as_u16(), 201, "Create failed");
    let body: Value = created.json().await.unwrap();
    assert_eq!(body["simulation"]["title"], "Serverless Basics");
    assert_eq!(body["simulation"]["enrolled_count"], 0);
    assert_eq!(body["toast"]["description"], "Simulation added successfully");
    let id = body["simulation"]["id"].as_str().unwrap().to_string();

    // Shared with the public catalog.
    let catalog = context.get_json("/simulations?category=cloud").await;
    assert_eq!(
        titles(&catalog),
        vec!["Kubernetes Deployment", "Serverless Basics"]
    );

    let mut edit = simulation_form("Serverless in Practice");
    edit["level"] = json!("intermediate");
    let updated = context
        .client
        .put(context.url(&format!("/api/admin/simulations/{}", id)))
        .header("x-csrf-token", &csrf)
        .json(&edit)
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status().as_u16(), 200);
    let body: Value = updated.json().await.unwrap();
    assert_eq!(body["simulation"]["id"], id.as_str());
    assert_eq!(body["simulation"]["level"], "intermediate");
    assert_eq!(body["simulation"]["enrolled_count"], 0);

    let deleted = context
        .client
        .delete(context.url(&format!("/api/admin/simulations/{}", id)))
        .header("x-csrf-token", &csrf)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 200);
    let body: Value = deleted.json().await.unwrap();
    assert_eq!(body["deleted"], true);
    assert_eq!(context.state.catalog.len().await, 6);
}

#[tokio::test]
async fn unknown_ids_on_update_and_delete() {
    let context = TestContext::spawn().await;
    let csrf = context.login_admin().await;
    let missing = uuid::Uuid::new_v4();

    let updated = context
        .client
        .put(context.url(&format!("/api/admin/simulations/{}", missing)))
        .header("x-csrf-token", &csrf)
        .json(&simulation_form("Ghost"))
        .send()
        .await
        .unwrap();
    assert_eq!(updated.status().as_u16(), 404);

    let deleted = context
        .client
        .delete(context.url(&format!("/api/admin/simulations/{}", missing)))
        .header("x-csrf-token", &csrf)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 200);
    let body: Value = deleted.json().await.unwrap();
    assert_eq!(body["deleted"], false);
    assert_eq!(context.state.catalog.len().await, 6);
}

#[tokio::test]
async fn invalid_simulation_form_is_rejected() {
    let context = TestContext::spawn().await;
    let csrf = context.login_admin().await;

    let mut form = simulation_form("Serverless Basics");
    form["category"] = json!("robotics");
    let response = context
        .client
        .post(context.url("/api/admin/simulations"))
        .header("x-csrf-token", &csrf)
        .json(&form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(context.state.catalog.len().await, 6);
}

#[tokio::test]
async fn learner_enrolls_and_completes() {
    let context = TestContext::spawn().await;
    let csrf = context.login("learner@example.com", "hunter22").await;

    let catalog = context.get_json("/simulations?category=web3").await;
    let simulation = &catalog["simulations"][0];
    let simulation_id = simulation["id"].as_str().unwrap().to_string();
    let before = simulation["enrolled_count"].as_u64().unwrap();

    let enrolled = context
        .client
        .post(context.url("/api/enrollments"))
        .header("x-csrf-token", &csrf)
        .json(&json!({ "simulation_id": simulation_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(enrolled.status().as_u16(), 201);
    let body: Value = enrolled.json().await.unwrap();
    assert_eq!(body["enrollment"]["status"], "enrolled");
    let enrollment_id = body["enrollment"]["id"].as_str().unwrap().to_string();

    let again = context
        .client
        .post(context.url("/api/enrollments"))
        .header("x-csrf-token", &csrf)
        .json(&json!({ "simulation_id": simulation_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 200);

    let catalog = context.get_json("/simulations?category=web3").await;
    assert_eq!(catalog["simulations"][0]["enrolled_count"], before + 1);

    let progress_url = context.url(&format!("/api/enrollments/{}/progress", enrollment_id));
    let too_far = context
        .client
        .put(&progress_url)
        .header("x-csrf-token", &csrf)
        .json(&json!({ "progress": 150 }))
        .send()
        .await
        .unwrap();
    assert_eq!(too_far.status().as_u16(), 400);

    let halfway = context
        .client
        .put(&progress_url)
        .header("x-csrf-token", &csrf)
        .json(&json!({ "progress": 50 }))
        .send()
        .await
        .unwrap();
    assert_eq!(halfway.status().as_u16(), 200);

    let in_progress = context.get_json("/dashboard?tab=in-progress").await;
    assert_eq!(in_progress["enrollments"].as_array().unwrap().len(), 1);
    assert_eq!(in_progress["enrollments"][0]["action"], "Continue Learning");
    assert_eq!(in_progress["enrollments"][0]["title"], "Blockchain Smart Contracts");

    let done = context
        .client
        .put(&progress_url)
        .header("x-csrf-token", &csrf)
        .json(&json!({ "progress": 100 }))
        .send()
        .await
        .unwrap();
    assert_eq!(done.status().as_u16(), 200);
    let body: Value = done.json().await.unwrap();
    assert_eq!(body["enrollment"]["status"], "completed");

    let dashboard = context.get_json("/dashboard?tab=completed").await;
    assert_eq!(dashboard["tab"], "completed");
    assert_eq!(dashboard["stats"]["total_enrolled"], 1);
    assert_eq!(dashboard["stats"]["completed"], 1);
    assert_eq!(dashboard["stats"]["total_hours"], 3.5);
    assert_eq!(dashboard["enrollments"][0]["action"], "Completed");
}

#[tokio::test]
async fn enrollment_requires_sign_in() {
    let context = TestContext::spawn().await;

    let response = context
        .client
        .post(context.url("/api/enrollments"))
        .json(&json!({ "simulation_id": uuid::Uuid::new_v4() }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}

#[tokio::test]
async fn out_of_range_progress_is_a_json_validation_error() {
    let context = TestContext::spawn().await;
    let csrf = context.login("learner@example.com", "hunter22").await;

    let catalog = context.get_json("/simulations?category=ai").await;
    let simulation_id = catalog["simulations"][0]["id"].as_str().unwrap().to_string();
    let enrolled: Value = context
        .client
        .post(context.url("/api/enrollments"))
        .header("x-csrf-token", &csrf)
        .json(&json!({ "simulation_id": simulation_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let enrollment_id = enrolled["enrollment"]["id"].as_str().unwrap();
    let progress_url = context.url(&format!("/api/enrollments/{}/progress", enrollment_id));

    for progress in [json!(300), json!(-1), json!("half")] {
        let response = context
            .client
            .put(&progress_url)
            .header("x-csrf-token", &csrf)
            .json(&json!({ "progress": progress }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "progress {}", progress);
        let body: Value = response.json().await.unwrap();
        assert!(body["error"].is_string());
        assert_eq!(body["toast"]["variant"], "destructive");
    }

    let dashboard = context.get_json("/dashboard").await;
    assert_eq!(dashboard["enrollments"][0]["progress"], 0);
}

#[tokio::test]
async fn simulation_form_missing_field_is_rejected() {
    let context = TestContext::spawn().await;
    let csrf = context.login_admin().await;

    let mut form = simulation_form("Serverless Basics");
    form.as_object_mut().unwrap().remove("level");
    let response = context
        .client
        .post(context.url("/api/admin/simulations"))
        .header("x-csrf-token", &csrf)
        .json(&form)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("level"));
    assert_eq!(context.state.catalog.len().await, 6);
}

#[tokio::test]
async fn deleting_a_simulation_drops_its_enrollments() {
    let context = TestContext::spawn().await;
    let learner_csrf = context.login("learner@example.com", "hunter22").await;

    let catalog = context.get_json("/simulations?category=cloud").await;
    let simulation_id = catalog["simulations"][0]["id"].as_str().unwrap().to_string();
    let enrolled = context
        .client
        .post(context.url("/api/enrollments"))
        .header("x-csrf-token", &learner_csrf)
        .json(&json!({ "simulation_id": simulation_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(enrolled.status().as_u16(), 201);
    assert_eq!(context.state.enrollments.totals().await, (1, 0));

    let admin = TestContext::new_client();
    let login = admin
        .post(context.url("/api/auth/login"))
        .json(&json!({ "email": common::ADMIN_EMAIL, "password": common::ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap();
    let admin_csrf = common::csrf_from(&login);

    let deleted = admin
        .delete(context.url(&format!("/api/admin/simulations/{}", simulation_id)))
        .header("x-csrf-token", &admin_csrf)
        .send()
        .await
        .unwrap();
    assert_eq!(deleted.status().as_u16(), 200);

    assert_eq!(context.state.enrollments.totals().await, (0, 0));
    let console: Value = admin
        .get(context.url("/admin"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(console["stats"]["active_enrollments"], 0);

    let again = context
        .client
        .post(context.url("/api/enrollments"))
        .header("x-csrf-token", &learner_csrf)
        .json(&json!({ "simulation_id": simulation_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(again.status().as_u16(), 404);
    assert_eq!(context.state.enrollments.totals().await, (0, 0));
}
