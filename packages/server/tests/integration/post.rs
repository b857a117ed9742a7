use ::common::storage::BlobStore;
use serde_json::json;
use uuid::Uuid;

use sea_orm::EntityTrait;

use server::entity::{author, media, post, post_tag, tag};
use server::store::EntityStore;

use crate::common::{TestApp, TestFile, routes};

async fn count<E>(app: &TestApp) -> u64
where
    E: sea_orm::EntityTrait,
    E::Model: Sync,
{
    EntityStore::new(&app.db).count::<E>().await.unwrap()
}

mod scenario {
    use super::*;

    #[tokio::test]
    async fn register_login_publish_and_read_back() {
        let app = TestApp::spawn().await;
        let author = app.register("alice1", "alice@example.com").await;
        let token = app.login("alice1").await;
        let category_id = app.create_category("tech").await;
        assert_eq!(category_id, 1);

        let id = app
            .create_post(&token, "hello", 1, &["intro"], Vec::new())
            .await;

        let res = app.get(&routes::post(id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id.to_string());
        assert_eq!(res.body["text"], "hello");
        assert_eq!(res.body["category_id"], 1);
        assert_eq!(res.body["author_id"], author["id"]);
        assert_eq!(res.body["tags"], json!(["intro"]));
        assert_eq!(res.body["medias"], json!([]));
        assert!(res.body["date_created"].as_str().is_some());
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::post(Uuid::now_v7())).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn unknown_category_is_unprocessable_and_writes_nothing() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;

        let res = app
            .create_post_raw(
                Some(&token),
                "hello",
                42,
                &["intro"],
                vec![TestFile {
                    name: "cat.png",
                    bytes: vec![1, 2, 3],
                }],
            )
            .await;

        assert_eq!(res.status, 422, "{}", res.text);
        assert_eq!(res.body["code"], "UNPROCESSABLE_ENTITY");
        assert_eq!(res.body["message"], "Category 42 does not exist");
        assert_eq!(count::<post::Entity>(&app).await, 0);
        assert_eq!(count::<tag::Entity>(&app).await, 0);
        assert_eq!(count::<media::Entity>(&app).await, 0);
        assert_eq!(app.blobs.calls(), 0);
    }

    #[tokio::test]
    async fn duplicate_tag_names_create_one_association_each() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;
        let category_id = app.create_category("tech").await;

        let id = app
            .create_post(&token, "hello", category_id, &["go", "go", "rust"], Vec::new())
            .await;

        assert_eq!(count::<post_tag::Entity>(&app).await, 2);
        assert_eq!(count::<tag::Entity>(&app).await, 2);
        let res = app.get(&routes::post(id)).await;
        assert_eq!(res.body["tags"], json!(["go", "rust"]));
    }

    #[tokio::test]
    async fn existing_tags_are_reused_across_posts() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;
        let category_id = app.create_category("tech").await;

        let first = app
            .create_post(&token, "one", category_id, &["rust"], Vec::new())
            .await;
        let second = app
            .create_post(&token, "two", category_id, &["rust", "async"], Vec::new())
            .await;

        assert_eq!(count::<tag::Entity>(&app).await, 2);
        assert_eq!(count::<post_tag::Entity>(&app).await, 3);

        let res = app.get(&routes::tag_posts("rust")).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([first.to_string(), second.to_string()]));

        let res = app.get(&routes::tag_posts("async")).await;
        assert_eq!(res.body, json!([second.to_string()]));
    }

    #[tokio::test]
    async fn concurrent_posts_with_the_same_new_tag_share_it() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;
        let category_id = app.create_category("tech").await;

        let (a, b) = tokio::join!(
            app.create_post_raw(Some(&token), "one", category_id, &["fresh"], Vec::new()),
            app.create_post_raw(Some(&token), "two", category_id, &["fresh"], Vec::new()),
        );

        assert_eq!(a.status, 201, "{}", a.text);
        assert_eq!(b.status, 201, "{}", b.text);
        assert_eq!(count::<tag::Entity>(&app).await, 1);
        assert_eq!(count::<post_tag::Entity>(&app).await, 2);
    }

    #[tokio::test]
    async fn concurrent_posts_with_new_tags_in_opposite_orders_both_succeed() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;
        let category_id = app.create_category("tech").await;

        for i in 0..20 {
            let first = format!("first-{i}");
            let second = format!("second-{i}");
            let forward = [first.as_str(), second.as_str()];
            let backward = [second.as_str(), first.as_str()];
            let (a, b) = tokio::join!(
                app.create_post_raw(Some(&token), "one", category_id, &forward, Vec::new()),
                app.create_post_raw(Some(&token), "two", category_id, &backward, Vec::new()),
            );

            assert_eq!(a.status, 201, "round {i}: {}", a.text);
            assert_eq!(b.status, 201, "round {i}: {}", b.text);
        }

        assert_eq!(count::<tag::Entity>(&app).await, 40);
        assert_eq!(count::<post_tag::Entity>(&app).await, 80);
    }

    #[tokio::test]
    async fn token_of_deleted_author_is_unprocessable() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;
        let category_id = app.create_category("tech").await;
        author::Entity::delete_many().exec(&app.db).await.unwrap();

        let res = app
            .create_post_raw(Some(&token), "hello", category_id, &[], Vec::new())
            .await;

        assert_eq!(res.status, 422, "{}", res.text);
        assert!(
            res.body["message"].as_str().unwrap().starts_with("Author "),
            "{}",
            res.text
        );
        assert_eq!(count::<post::Entity>(&app).await, 0);
    }

    #[tokio::test]
    async fn unknown_tag_has_no_posts() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::tag_posts("nothing")).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn post_without_media_makes_no_blob_calls() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;
        let category_id = app.create_category("tech").await;

        app.create_post(&token, "hello", category_id, &[], Vec::new())
            .await;

        assert_eq!(app.blobs.calls(), 0);
        assert_eq!(count::<media::Entity>(&app).await, 0);
    }

    #[tokio::test]
    async fn missing_text_field_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;

        let form = reqwest::multipart::Form::new().text("category_id", "1");
        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::POSTS))
            .header("Authorization", format!("Bearer {token}"))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
    }
}

mod upload_failure {
    use super::*;

    #[tokio::test]
    async fn failed_upload_rolls_back_and_removes_uploaded_blobs() {
        let app = TestApp::spawn().await;
        let token = app.create_authenticated_author("alice1").await;
        let category_id = app.create_category("tech").await;
        app.blobs.fail_uploads_with_extension("bin");

        let res = app
            .create_post_raw(
                Some(&token),
                "hello",
                category_id,
                &["intro"],
                vec![
                    TestFile {
                        name: "ok.png",
                        bytes: b"png bytes".to_vec(),
                    },
                    TestFile {
                        name: "broken.bin",
                        bytes: b"bin bytes".to_vec(),
                    },
                ],
            )
            .await;

        assert_eq!(res.status, 500, "{}", res.text);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
        assert_eq!(count::<post::Entity>(&app).await, 0);
        assert_eq!(count::<media::Entity>(&app).await, 0);
        assert_eq!(count::<tag::Entity>(&app).await, 0);

        let stored = app.blobs.stored_keys();
        assert_eq!(stored.len(), 1);
        assert!(!app.blobs.exists(&stored[0]).await.unwrap());
        assert!(app.blobs.deletes.load(std::sync::atomic::Ordering::SeqCst) >= 1);
    }
}
