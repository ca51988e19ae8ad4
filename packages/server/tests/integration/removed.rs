use serde_json::json;

use crate::common::{TestApp, hash, routes};

mod post_removal {
    use super::*;

    #[tokio::test]
    async fn removal_flags_the_post_and_logs_the_reason() {
        let app = TestApp::spawn().await;
        let (mod_id, token) = app.create_user("mod").await;
        let id = app.create_post(&token, &hash(1), &[]).await;

        let res = app
            .delete_with_body(&routes::post(id), &json!({ "reason": "  duplicate upload " }), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["entity_type"], "post");
        assert_eq!(res.body["entity_id"], id);
        assert_eq!(res.body["removed_by"], mod_id);
        assert_eq!(res.body["reason"], "duplicate upload");

        let post = app.get(&routes::post(id)).await;
        assert_eq!(post.body["removed"], true);
    }

    #[tokio::test]
    async fn long_reasons_are_truncated() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("mod").await;
        let id = app.create_post(&token, &hash(1), &[]).await;

        let res = app
            .delete_with_body(&routes::post(id), &json!({ "reason": "x".repeat(400) }), &token)
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["reason"].as_str().unwrap().len(), 150);
    }

    #[tokio::test]
    async fn removing_twice_is_a_conflict() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("mod").await;
        let id = app.create_post(&token, &hash(1), &[]).await;

        let body = json!({ "reason": "spam" });
        assert_eq!(app.delete_with_body(&routes::post(id), &body, &token).await.status, 200);

        let res = app.delete_with_body(&routes::post(id), &body, &token).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "CONFLICT");
    }

    #[tokio::test]
    async fn restore_clears_the_flag_and_the_log_entry() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("mod").await;
        let id = app.create_post(&token, &hash(1), &[]).await;
        app.delete_with_body(&routes::post(id), &json!({ "reason": "oops" }), &token)
            .await;

        let res = app
            .post_with_token(&routes::post_restore(id), &json!({}), &token)
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        let post = app.get(&routes::post(id)).await;
        assert_eq!(post.body["removed"], false);

        let log = app.get_query(routes::REMOVED, &[("page", "1")]).await;
        assert_eq!(log.body["pagination"]["total"], 0);

        let again = app
            .post_with_token(&routes::post_restore(id), &json!({}), &token)
            .await;
        assert_eq!(again.status, 409);
    }

    #[tokio::test]
    async fn removing_a_missing_post_is_not_found() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("mod").await;

        let res = app
            .delete_with_body(&routes::post(31337), &json!({ "reason": "x" }), &token)
            .await;
        assert_eq!(res.status, 404);
    }
}

mod removed_log {
    use super::*;

    #[tokio::test]
    async fn log_can_be_filtered_by_kind() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("mod").await;
        let post_id = app.create_post(&token, &hash(1), &[]).await;
        let other_post = app.create_post(&token, &hash(2), &[]).await;

        let comment = app
            .post_with_token(
                &routes::post_comments(other_post),
                &json!({ "content": "buy cheap watches" }),
                &token,
            )
            .await;
        let comment_id = comment.id();

        app.delete_with_body(&routes::post(post_id), &json!({ "reason": "a" }), &token)
            .await;
        app.delete_with_body(&routes::comment(comment_id), &json!({ "reason": "b" }), &token)
            .await;

        let all = app.get_query(routes::REMOVED, &[("page", "1")]).await;
        assert_eq!(all.status, 200, "{}", all.text);
        assert_eq!(all.body["pagination"]["total"], 2);

        let comments = app
            .get_query(routes::REMOVED, &[("page", "1"), ("kind", "comment")])
            .await;
        assert_eq!(comments.body["pagination"]["total"], 1);
        assert_eq!(comments.body["data"][0]["entity_id"], comment_id);
        assert_eq!(comments.body["data"][0]["entity_type"], "comment");
    }

    #[tokio::test]
    async fn unknown_kind_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .get_query(routes::REMOVED, &[("page", "1"), ("kind", "thumbnail")])
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }
}
