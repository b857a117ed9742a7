use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn category_can_be_created() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(routes::CATEGORIES, &json!({"name": "tech"}))
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["name"], "tech");
    assert!(res.body["id"].is_number());
}

#[tokio::test]
async fn duplicate_category_name_is_unprocessable() {
    let app = TestApp::spawn().await;
    app.create_category("tech").await;

    let res = app
        .post_json(routes::CATEGORIES, &json!({"name": "tech"}))
        .await;

    assert_eq!(res.status, 422);
    assert_eq!(res.body["code"], "UNPROCESSABLE_ENTITY");
}

#[tokio::test]
async fn blank_category_name_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let res = app
        .post_json(routes::CATEGORIES, &json!({"name": "   "}))
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn posts_are_listed_per_category_in_creation_order() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_author("alice1").await;
    let tech = app.create_category("tech").await;
    let life = app.create_category("life").await;

    let first = app.create_post(&token, "one", tech, &[], Vec::new()).await;
    let other = app.create_post(&token, "two", life, &[], Vec::new()).await;
    let second = app.create_post(&token, "three", tech, &[], Vec::new()).await;

    let res = app.get(&routes::category_posts(tech)).await;
    assert_eq!(res.status, 200);
    assert_eq!(
        res.body,
        json!([first.to_string(), second.to_string()])
    );

    let res = app.get(&routes::category_posts(life)).await;
    assert_eq!(res.body, json!([other.to_string()]));
}

#[tokio::test]
async fn unknown_category_has_no_posts() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::category_posts(999)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!([]));
}
