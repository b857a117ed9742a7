use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use server::entity::author;
use server::store::EntityStore;
use server::utils::jwt::TokenKeys;

use crate::common::{JWT_SECRET, TestApp, TestFile, routes};

fn registration(username: &str, email: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": email,
        "name": "Alice Liddell",
        "password": "password123",
    })
}

mod registration {
    use super::*;

    #[tokio::test]
    async fn new_author_can_register_with_valid_details() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::AUTHORS, &registration("alice1", "alice@example.com"))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["username"], "alice1");
        assert_eq!(res.body["email"], "alice@example.com");
        assert_eq!(res.body["name"], "Alice Liddell");
        assert!(res.body["id"].as_str().is_some());
        assert!(res.body.get("hashed_password").is_none());
        assert!(res.body.get("password").is_none());
    }

    #[tokio::test]
    async fn second_registration_with_same_username_conflicts() {
        let app = TestApp::spawn().await;
        app.register("alice1", "alice@example.com").await;

        let res = app
            .post_json(routes::AUTHORS, &registration("alice1", "other@example.com"))
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
        let count = EntityStore::new(&app.db)
            .count::<author::Entity>()
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn second_registration_with_same_email_conflicts() {
        let app = TestApp::spawn().await;
        app.register("alice1", "alice@example.com").await;

        let res = app
            .post_json(routes::AUTHORS, &registration("alice22", "alice@example.com"))
            .await;

        assert_eq!(res.status, 409);
        let count = EntityStore::new(&app.db)
            .count::<author::Entity>()
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn cannot_register_with_a_short_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::AUTHORS, &registration("alice", "alice@example.com"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_register_with_an_invalid_email() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::AUTHORS, &registration("alice1", "not-an-email"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::AUTHORS, &json!({"username": "alice1"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod lookup {
    use super::*;

    #[tokio::test]
    async fn registered_author_can_be_fetched_by_id() {
        let app = TestApp::spawn().await;
        let created = app.register("alice1", "alice@example.com").await;
        let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

        let res = app.get(&routes::author(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, created);
    }

    #[tokio::test]
    async fn unknown_author_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::author(Uuid::now_v7())).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn login_by_username_returns_bearer_token() {
        let app = TestApp::spawn().await;
        app.register("alice1", "alice@example.com").await;

        let res = app
            .post_form(
                routes::LOGIN,
                &[("username", "alice1"), ("password", "password123")],
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["token_type"], "bearer");
        assert!(res.body["access_token"].as_str().is_some());
    }

    #[tokio::test]
    async fn login_by_email_returns_bearer_token() {
        let app = TestApp::spawn().await;
        app.register("alice1", "alice@example.com").await;

        let res = app
            .post_form(
                routes::LOGIN,
                &[("identifier", "alice@example.com"), ("password", "password123")],
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["token_type"], "bearer");
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = TestApp::spawn().await;
        app.register("alice1", "alice@example.com").await;

        let res = app
            .post_form(
                routes::LOGIN,
                &[("username", "alice1"), ("password", "wrongpassword")],
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_identifier_is_unauthorized() {
        let app = TestApp::spawn().await;

        let res = app
            .post_form(
                routes::LOGIN,
                &[("username", "nobody1"), ("password", "password123")],
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod tokens {
    use super::*;

    async fn publish_with(app: &TestApp, token: Option<&str>) -> u16 {
        let category_id = app.create_category("tech").await;
        app.create_post_raw(token, "hello", category_id, &[], Vec::<TestFile>::new())
            .await
            .status
    }

    #[tokio::test]
    async fn missing_token_is_rejected() {
        let app = TestApp::spawn().await;
        let category_id = app.create_category("tech").await;

        let res = app
            .create_post_raw(None, "hello", category_id, &[], Vec::new())
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbled_token_is_rejected() {
        let app = TestApp::spawn().await;
        assert_eq!(publish_with(&app, Some("not-a-jwt")).await, 401);
    }

    #[tokio::test]
    async fn token_signed_with_another_secret_is_rejected() {
        let app = TestApp::spawn().await;
        let created = app.register("alice1", "alice@example.com").await;
        let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

        let forged = TokenKeys::new("some-other-secret", Duration::minutes(60))
            .sign_at(id, "alice1", Utc::now())
            .unwrap();

        assert_eq!(publish_with(&app, Some(&forged)).await, 401);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let app = TestApp::spawn().await;
        let created = app.register("alice1", "alice@example.com").await;
        let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

        let expired = TokenKeys::new(JWT_SECRET, Duration::minutes(60))
            .sign_at(id, "alice1", Utc::now() - Duration::minutes(61))
            .unwrap();

        assert_eq!(publish_with(&app, Some(&expired)).await, 401);
    }

    #[tokio::test]
    async fn token_from_login_is_accepted() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;

        assert_eq!(publish_with(&app, Some(&token)).await, 201);
    }
}
