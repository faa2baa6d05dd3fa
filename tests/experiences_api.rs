
use serde_json::json;
use test_utils::TestApp;

#[actix_rt::test]
async fn lists_experiences_with_derived_fields() {
    let app = TestApp::spawn().await;
    app.create_experience(json!({})).await;

    let (status, body) = app.get_json("/api/v1/experiences").await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Work experiences retrieved successfully");
    let experience = &body["data"][0];
    assert_eq!(experience["company_name"], "Acme Corp");
    assert_eq!(experience["employment_type_label"], "Full Time");
    assert_eq!(experience["duration_text"], "2 years 6 months");
    assert_eq!(experience["technologies_list"], json!(["Rust", "Kafka"]));
}

#[actix_rt::test]
async fn filters_current_positions_and_technology() {
    let app = TestApp::spawn().await;
    app.create_experience(json!({ "company_name": "Past Inc" })).await;
    app.create_experience(json!({
        "company_name": "Now Ltd",
        "end_date": null,
        "current": true,
        "technologies": "Go, Kubernetes"
    }))
    .await;

    let (_, current) = app.get_json("/api/v1/experiences?current=true").await;
    let current = current["data"].as_array().unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0]["company_name"], "Now Ltd");
    assert!(current[0]["end_date"].is_null());

    let (_, rust) = app.get_json("/api/v1/experiences?technology=rust").await;
    let rust = rust["data"].as_array().unwrap();
    assert_eq!(rust.len(), 1);
    assert_eq!(rust[0]["company_name"], "Past Inc");
}

#[actix_rt::test]
async fn sorts_by_company_name() {
    let app = TestApp::spawn().await;
    app.create_experience(json!({ "company_name": "Zeta" })).await;
    app.create_experience(json!({ "company_name": "Alpha" })).await;

    let (_, body) = app.get_json("/api/v1/experiences?sort_by=company_name").await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["company_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
}
