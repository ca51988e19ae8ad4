use serde_json::json;

use mediaboard::config::CatalogConfig;

use crate::common::{TestApp, hash, routes};

mod post_creation {
    use super::*;

    #[tokio::test]
    async fn creating_a_post_normalizes_tags_and_records_a_baseline() {
        let app = TestApp::spawn().await;
        let (user_id, token) = app.create_user("alice").await;

        let res = app
            .post_with_token(
                routes::POSTS,
                &json!({
                    "hash": hash(1).to_uppercase(),
                    "ext": ".PNG",
                    "mime": "image/png",
                    "size": 2048,
                    "width": 1920,
                    "height": 1080,
                    "caption": "  Blue sky over the bay ",
                    "tags": ["Sky", "bay", "sky"],
                }),
                &token,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["hash"], hash(1));
        assert_eq!(res.body["ext"], "png");
        assert_eq!(res.body["caption"], "Blue sky over the bay");
        assert_eq!(res.body["author_id"], user_id);
        assert_eq!(res.body["score"], 0);
        assert_eq!(res.body["removed"], false);
        assert_eq!(res.strings("tags"), vec!["bay", "sky"]);

        let history = app
            .get_query(&routes::post_snapshots(res.id()), &[("page", "1")])
            .await;
        assert_eq!(history.status, 200);
        assert_eq!(history.body["pagination"]["total"], 1);
        assert_eq!(history.body["data"][0]["tags"], json!(["bay", "sky"]));
    }

    #[tokio::test]
    async fn space_separated_tags_are_split() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let id = app.create_post(&token, &hash(5), &["cat dog", "bird"]).await;

        let res = app.get(&routes::post(id)).await;
        assert_eq!(res.body["tags"], json!(["bird", "cat", "dog"]));
    }

    #[tokio::test]
    async fn duplicate_hash_is_a_conflict() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        app.create_post(&token, &hash(7), &[]).await;

        let res = app
            .post_with_token(
                routes::POSTS,
                &json!({ "hash": hash(7), "ext": "jpg", "mime": "image/jpeg", "size": 1 }),
                &token,
            )
            .await;
        assert_eq!(res.status, 409);
        assert_eq!(res.code(), "CONFLICT");
    }

    #[tokio::test]
    async fn invalid_initial_tag_rejects_the_post() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;

        let res = app
            .post_with_token(
                routes::POSTS,
                &json!({
                    "hash": hash(2),
                    "ext": "png",
                    "mime": "image/png",
                    "size": 1,
                    "tags": ["ok", "!!!"],
                }),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "INVALID_TAG_NAME");

        let tag = app.get(&routes::tag("ok")).await;
        assert_eq!(tag.status, 404, "creation should have rolled back");
    }

    #[tokio::test]
    async fn malformed_hash_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;

        let res = app
            .post_with_token(
                routes::POSTS,
                &json!({ "hash": "not-a-hash", "ext": "png", "mime": "image/png", "size": 1 }),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn creating_without_a_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::POSTS,
                &json!({ "hash": hash(3), "ext": "png", "mime": "image/png", "size": 1 }),
            )
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.code(), "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn sensitive_directory_flags_the_post() {
        let app = TestApp::spawn_with(CatalogConfig {
            sensitive_dirs: vec!["private".into()],
            ..CatalogConfig::default()
        })
        .await;
        let (_, token) = app.create_user("alice").await;

        let id = app
            .create_post_with(&token, &hash(4), &[], json!({ "directory": "/private/2024/" }))
            .await;

        let res = app.get(&routes::post(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["directory"], "private/2024");
        assert_eq!(res.body["nsfw"], true);
    }
}

mod post_lookup {
    use super::*;

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::post(9999)).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn attribute_edit_clears_and_sets_fields() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let id = app
            .create_post_with(&token, &hash(1), &[], json!({ "caption": "old", "op": "bob" }))
            .await;

        let res = app
            .patch_with_token(
                &routes::post(id),
                &json!({ "caption": "new caption", "op": null }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["caption"], "new caption");
        assert!(res.body["op"].is_null());
        assert!(res.body["modified_at"].is_string());
    }
}

mod tag_edits {
    use super::*;

    #[tokio::test]
    async fn add_and_remove_modify_the_set() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let id = app.create_post(&token, &hash(1), &["a", "b"]).await;

        let res = app
            .patch_with_token(
                &routes::post_tags(id),
                &json!({ "add": ["C"], "remove": ["a", "never_attached"] }),
                &token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["post"]["tags"], json!(["b", "c"]));
        assert!(res.body["snapshot_id"].is_i64());
    }

    #[tokio::test]
    async fn unchanged_set_records_no_snapshot() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let id = app.create_post(&token, &hash(1), &["a", "b"]).await;

        let res = app.set_tags(id, &["B", "a", "a"], &token).await;
        assert!(res.body["snapshot_id"].is_null());

        let history = app
            .get_query(&routes::post_snapshots(id), &[("page", "1")])
            .await;
        assert_eq!(history.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn replace_cannot_be_combined_with_add() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let id = app.create_post(&token, &hash(1), &[]).await;

        let res = app
            .patch_with_token(
                &routes::post_tags(id),
                &json!({ "tags": ["a"], "add": ["b"] }),
                &token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn invalid_tag_leaves_the_post_unchanged() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let id = app.create_post(&token, &hash(1), &["a"]).await;

        let res = app
            .patch_with_token(&routes::post_tags(id), &json!({ "add": ["b", "@@"] }), &token)
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "INVALID_TAG_NAME");

        let post = app.get(&routes::post(id)).await;
        assert_eq!(post.body["tags"], json!(["a"]));
    }

    #[tokio::test]
    async fn sensitive_tag_toggles_the_nsfw_flag() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let id = app.create_post(&token, &hash(1), &["cat"]).await;

        let res = app.set_tags(id, &["cat", "NSFW"], &token).await;
        assert_eq!(res.body["post"]["nsfw"], true);

        let res = app.set_tags(id, &["cat"], &token).await;
        assert_eq!(res.body["post"]["nsfw"], false);
    }
}

mod browsing {
    use super::*;

    /// Three posts: a landscape, a portrait and an untagged file.
    async fn seed(app: &TestApp, token: &str) -> (i32, i32, i32) {
        let landscape = app
            .create_post_with(
                token,
                &hash(1),
                &["landscape", "sky"],
                json!({ "caption": "Blue Sky at dawn", "width": 1920, "height": 1080, "ext": "jpg" }),
            )
            .await;
        let portrait = app
            .create_post_with(
                token,
                &hash(2),
                &["portrait", "sky"],
                json!({ "caption": "grey sky", "width": 600, "height": 900 }),
            )
            .await;
        let untagged = app
            .create_post_with(token, &hash(3), &[], json!({ "width": 300, "height": 300 }))
            .await;
        (landscape, portrait, untagged)
    }

    #[tokio::test]
    async fn empty_query_lists_everything_newest_first() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let (a, b, c) = seed(&app, &token).await;

        assert_eq!(app.search_ids("").await, vec![c, b, a]);
    }

    #[tokio::test]
    async fn tags_are_conjunctive_and_negatable() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let (landscape, portrait, _) = seed(&app, &token).await;

        assert_eq!(app.search_ids("sky").await, vec![portrait, landscape]);
        assert_eq!(app.search_ids("Sky LANDSCAPE").await, vec![landscape]);
        assert_eq!(app.search_ids("sky -portrait").await, vec![landscape]);
        assert!(app.search_ids("sky unknown_tag").await.is_empty());
    }

    #[tokio::test]
    async fn attributes_compare_typed_values() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let (landscape, portrait, untagged) = seed(&app, &token).await;

        assert_eq!(app.search_ids("width:>1000").await, vec![landscape]);
        assert_eq!(app.search_ids("height:<1000").await, vec![untagged, portrait]);
        assert_eq!(app.search_ids("ext:jpg").await, vec![landscape]);
        assert_eq!(app.search_ids("md5:").await.len(), 0);
        assert_eq!(
            app.search_ids("width:abc nonsense_field:3 sky").await,
            vec![portrait, landscape],
            "unparseable attributes are ignored"
        );
    }

    #[tokio::test]
    async fn quoted_caption_matches_case_insensitively() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let (landscape, _, _) = seed(&app, &token).await;

        assert_eq!(app.search_ids("\"blue sky\"").await, vec![landscape]);
    }

    #[tokio::test]
    async fn no_tags_finds_untagged_posts() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let (landscape, portrait, untagged) = seed(&app, &token).await;

        assert_eq!(app.search_ids("no_tags").await, vec![untagged]);
        assert_eq!(app.search_ids("no_tags sky").await, vec![untagged]);
        assert_eq!(app.search_ids("-no_tags").await, vec![portrait, landscape]);
    }

    #[tokio::test]
    async fn sensitive_posts_are_hidden_unless_mentioned() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let safe = app.create_post(&token, &hash(1), &["cat"]).await;
        let sensitive = app.create_post(&token, &hash(2), &["cat", "nsfw"]).await;

        assert_eq!(app.search_ids("cat").await, vec![safe]);
        assert_eq!(app.search_ids("cat nsfw").await, vec![sensitive]);
        assert_eq!(app.search_ids("cat -nsfw").await, vec![safe]);
    }

    #[tokio::test]
    async fn removed_posts_only_appear_for_the_removed_keyword() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("mod").await;
        let kept = app.create_post(&token, &hash(1), &["cat"]).await;
        let gone = app.create_post(&token, &hash(2), &["cat"]).await;

        let res = app
            .delete_with_body(&routes::post(gone), &json!({ "reason": "dupe" }), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);

        assert_eq!(app.search_ids("cat").await, vec![kept]);
        assert_eq!(app.search_ids("cat removed").await, vec![gone]);
    }

    #[tokio::test]
    async fn sorting_by_a_field_with_direction() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        let (landscape, portrait, untagged) = seed(&app, &token).await;

        let res = app
            .get_query(
                routes::POSTS,
                &[("page", "1"), ("sort", "width"), ("direction", "asc")],
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.ids(), vec![untagged, portrait, landscape]);

        let res = app
            .get_query(routes::POSTS, &[("page", "1"), ("sort", "bogus")])
            .await;
        assert_eq!(res.ids(), vec![untagged, portrait, landscape]);
    }
}

mod pagination {
    use super::*;

    #[tokio::test]
    async fn page_is_required() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::POSTS).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.code(), "VALIDATION_ERROR");

        let res = app.get_query(routes::POSTS, &[("page", "0")]).await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn limit_is_clamped_and_pages_are_counted() {
        let app = TestApp::spawn().await;
        let (_, token) = app.create_user("alice").await;
        for n in 0..3 {
            app.create_post(&token, &hash(n + 1), &[]).await;
        }

        let res = app
            .get_query(routes::POSTS, &[("page", "1"), ("limit", "1000")])
            .await;
        assert_eq!(res.body["pagination"]["per_page"], 100);

        let res = app
            .get_query(routes::POSTS, &[("page", "2"), ("limit", "2")])
            .await;
        assert_eq!(res.body["pagination"]["total"], 3);
        assert_eq!(res.body["pagination"]["total_pages"], 2);
        assert_eq!(res.ids().len(), 1);

        let res = app
            .get_query(routes::POSTS, &[("page", "9"), ("limit", "2")])
            .await;
        assert_eq!(res.status, 200);
        assert!(res.ids().is_empty());
    }
}
