
use serde_json::json;
use test_utils::TestApp;

#[actix_rt::test]
async fn lists_skills_by_proficiency_then_sort_order() {
    let app = TestApp::spawn().await;
    app.create_skill(json!({ "name": "Go", "category": "languages", "proficiency_level": 6, "sort_order": 0 })).await;
    app.create_skill(json!({ "name": "Rust", "category": "languages", "proficiency_level": 9, "sort_order": 2 })).await;
    app.create_skill(json!({ "name": "React", "category": "frontend", "proficiency_level": 9, "sort_order": 1 })).await;

    let (status, body) = app.get_json("/api/v1/skills").await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Skills retrieved successfully");
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["React", "Rust", "Go"]);
    assert_eq!(body["data"][0]["proficiency_percentage"], 90);
    assert_eq!(body["data"][0]["proficiency_label"], "Expert");
    assert_eq!(body["data"][0]["icon_name"], "react");
}

#[actix_rt::test]
async fn grouped_listing_counts_each_category() {
    let app = TestApp::spawn().await;
    app.create_skill(json!({ "name": "React", "category": "frontend" })).await;
    app.create_skill(json!({ "name": "Vue", "category": "frontend" })).await;
    app.create_skill(json!({ "name": "PostgreSQL", "category": "database" })).await;

    let (status, body) = app.get_json("/api/v1/skills?grouped=true").await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Skills retrieved and grouped successfully");
    assert_eq!(body["data"]["frontend"]["count"], 2);
    assert_eq!(body["data"]["frontend"]["category_name"], "Frontend");
    assert_eq!(body["data"]["database"]["count"], 1);
    assert!(body["data"].get("backend").is_none());
}

#[actix_rt::test]
async fn filters_by_category_and_minimum_proficiency() {
    let app = TestApp::spawn().await;
    app.create_skill(json!({ "name": "Rails", "category": "backend", "proficiency_level": 9 })).await;
    app.create_skill(json!({ "name": "Django", "category": "backend", "proficiency_level": 5 })).await;
    app.create_skill(json!({ "name": "Figma", "category": "design", "proficiency_level": 9 })).await;

    let (_, body) = app.get_json("/api/v1/skills?category=backend&min_proficiency=7").await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["name"], "Rails");

    let (_, ignored) = app.get_json("/api/v1/skills?min_proficiency=42").await;
    assert_eq!(ignored["data"].as_array().unwrap().len(), 3);
}
