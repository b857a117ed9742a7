use uuid::Uuid;

use crate::common::{TestApp, TestFile, routes};

#[tokio::test]
async fn uploaded_media_round_trips_with_content_type() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_author("alice1").await;
    let category_id = app.create_category("tech").await;
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 1, 2];

    let id = app
        .create_post(
            &token,
            "with picture",
            category_id,
            &[],
            vec![TestFile {
                name: "Cat.PNG",
                bytes: png.clone(),
            }],
        )
        .await;

    let post = app.get(&routes::post(id)).await;
    let medias = post.body["medias"].as_array().unwrap();
    assert_eq!(medias.len(), 1);
    let media_id: Uuid = medias[0].as_str().unwrap().parse().unwrap();

    let (status, content_type, bytes) = app.get_bytes(&routes::media(media_id)).await;
    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(bytes, png);
}

#[tokio::test]
async fn several_media_files_are_all_stored() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_author("alice1").await;
    let category_id = app.create_category("tech").await;

    let id = app
        .create_post(
            &token,
            "gallery",
            category_id,
            &[],
            vec![
                TestFile {
                    name: "a.txt",
                    bytes: b"first".to_vec(),
                },
                TestFile {
                    name: "b.txt",
                    bytes: b"second".to_vec(),
                },
                TestFile {
                    name: "README",
                    bytes: b"third".to_vec(),
                },
            ],
        )
        .await;

    let post = app.get(&routes::post(id)).await;
    let medias = post.body["medias"].as_array().unwrap();
    assert_eq!(medias.len(), 3);

    let mut payloads = Vec::new();
    for media in medias {
        let media_id: Uuid = media.as_str().unwrap().parse().unwrap();
        let (status, content_type, bytes) = app.get_bytes(&routes::media(media_id)).await;
        assert_eq!(status, 200);
        assert!(content_type.is_some());
        payloads.push(String::from_utf8(bytes).unwrap());
    }
    payloads.sort();
    assert_eq!(payloads, ["first", "second", "third"]);
}

#[tokio::test]
async fn unknown_media_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(&routes::media(Uuid::now_v7())).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn media_with_unusable_extension_is_unprocessable() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_author("alice1").await;
    let category_id = app.create_category("tech").await;

    let res = app
        .create_post_raw(
            Some(&token),
            "odd file",
            category_id,
            &[],
            vec![TestFile {
                name: "cat.p-n-g",
                bytes: b"x".to_vec(),
            }],
        )
        .await;

    assert_eq!(res.status, 422, "{}", res.text);
    assert_eq!(app.blobs.calls(), 0);
}
