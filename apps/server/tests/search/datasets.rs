use crate::support::*;
use axum::http::{Method, StatusCode};
use axum::body::Bytes;
use serde_json::{json, Value};

const DATASETS: &str = "/api/v1/advsearch/datasets";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn empty_options_rank_corpus_by_namespace() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            DatasetBuilder::new(1, "derived_sessions")
                .urn("hdfs://data/derived/sessions")
                .insert(pool)
                .await?;
            DatasetBuilder::new(2, "dwh_members")
                .urn("teradata://DWH/members")
                .insert(pool)
                .await?;
            DatasetBuilder::new(3, "page_view")
                .urn("hdfs://data/tracking/PageViewEvent")
                .insert(pool)
                .await?;
            DatasetBuilder::new(4, "orders")
                .urn("mysql://shop/orders")
                .insert(pool)
                .await?;
            DatasetBuilder::new(5, "stg_members")
                .urn("teradata://DWH_STG/members")
                .insert(pool)
                .await?;
            // `_` in a namespace prefix is literal, so this is not a DWH_ urn.
            DatasetBuilder::new(6, "lookalike")
                .urn("teradata://DWHXSTG/lookalike")
                .insert(pool)
                .await?;

            let page = app.post_json(&format!("{DATASETS}?page=1&size=10"), &json!({})).await?;
            assert_envelope(&page, 6, 1, 10, 1);
            assert_eq!(dataset_ids(&page)?, vec![3, 5, 2, 1, 4, 6]);

            let first = app.post_json(&format!("{DATASETS}?page=1&size=3"), &json!({})).await?;
            assert_envelope(&first, 6, 1, 3, 2);
            assert_eq!(dataset_ids(&first)?, vec![3, 5, 2]);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn exclude_only_table_facet_drops_every_excluded_term() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            DatasetBuilder::new(1, "member_profile").insert(pool).await?;
            DatasetBuilder::new(2, "member_TMP").insert(pool).await?;
            DatasetBuilder::new(3, "page_view").insert(pool).await?;
            DatasetBuilder::new(4, "page_view_bak").insert(pool).await?;

            let page = app
                .post_json(DATASETS, &json!({"table": {"not": "tmp, bak"}}))
                .await?;
            assert_eq!(page["count"], 2);
            let names = dataset_names(&page)?;
            assert!(names.iter().all(|n| {
                let lower = n.to_lowercase();
                !lower.contains("tmp") && !lower.contains("bak")
            }));
            assert_eq!(names.len(), 2);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn fields_all_is_exact_intersection() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            DatasetBuilder::new(1, "x_all_three")
                .fields(&["member_id", "region_code", "event_time"])
                .insert(pool)
                .await?;
            DatasetBuilder::new(2, "y_two_of_three")
                .fields(&["member_id", "region_code", "other"])
                .insert(pool)
                .await?;
            DatasetBuilder::new(3, "z_none")
                .fields(&["alpha", "beta"])
                .insert(pool)
                .await?;

            let page = app
                .post_json(
                    DATASETS,
                    &json!({"fields": {"all": "member_id,region_code,event_time"}}),
                )
                .await?;
            assert_eq!(page["count"], 1);
            assert_eq!(dataset_names(&page)?, strings(&["x_all_three"]));

            // One term matched twice by the same dataset still counts once.
            let page = app
                .post_json(DATASETS, &json!({"fields": {"all": "member,member_id"}}))
                .await?;
            assert_eq!(page["count"], 2);

            // Nobody has this combination: the facet still constrains.
            let page = app
                .post_json(DATASETS, &json!({"fields": {"all": "alpha,member_id"}}))
                .await?;
            assert_empty_envelope(&page);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn fields_any_and_not_compose() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            DatasetBuilder::new(1, "members")
                .fields(&["member_id", "ssn"])
                .insert(pool)
                .await?;
            DatasetBuilder::new(2, "members_clean")
                .fields(&["member_id", "country"])
                .insert(pool)
                .await?;
            DatasetBuilder::new(3, "pages")
                .fields(&["page_key"])
                .insert(pool)
                .await?;

            let page = app
                .post_json(DATASETS, &json!({"fields": {"any": "member_id,page_key"}}))
                .await?;
            assert_eq!(page["count"], 3);

            let page = app
                .post_json(
                    DATASETS,
                    &json!({"fields": {"any": "member_id,page_key", "not": "ssn"}}),
                )
                .await?;
            let mut names = dataset_names(&page)?;
            names.sort();
            assert_eq!(names, strings(&["members_clean", "pages"]));
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn scope_and_sources_are_exact() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            DatasetBuilder::new(1, "a").scope("prod").source("HDFS").insert(pool).await?;
            DatasetBuilder::new(2, "b").scope("prod_tmp").source("HDFS").insert(pool).await?;
            DatasetBuilder::new(3, "c").scope("tracking").source("Teradata").insert(pool).await?;

            let page = app.post_json(DATASETS, &json!({"scope": {"in": "prod"}})).await?;
            assert_eq!(dataset_names(&page)?, strings(&["a"]));

            let page = app
                .post_json(DATASETS, &json!({"scope": {"not": "prod"}, "sources": "HDFS"}))
                .await?;
            assert_eq!(dataset_names(&page)?, strings(&["b"]));
            Ok(())
        })
    })
    .await
}

async fn seed_commented(app: &TestApp) -> anyhow::Result<()> {
    let pool = app.pool();
    // A, B, C match "revenue"; B, C, D match the table facet "orders".
    DatasetBuilder::new(1, "a_ledger")
        .field_comment("Recognized revenue in USD")
        .insert(pool)
        .await?;
    DatasetBuilder::new(2, "b_orders")
        .comment("Daily revenue per order")
        .insert(pool)
        .await?;
    DatasetBuilder::new(3, "c_orders_eu")
        .comment("EU revenue snapshot")
        .field_comment("net revenue")
        .insert(pool)
        .await?;
    DatasetBuilder::new(4, "d_orders_archive")
        .comment("Archived order lines")
        .insert(pool)
        .await?;
    Ok(())
}

#[tokio::test]
async fn comments_alone_search_both_corpora() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            seed_commented(app).await?;

            let page = app.post_json(DATASETS, &json!({"comments": "revenue"})).await?;
            assert_envelope(&page, 3, 1, 10, 1);
            assert_eq!(
                dataset_names(&page)?,
                strings(&["a_ledger", "b_orders", "c_orders_eu"])
            );
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn comments_with_table_facet_intersect() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            seed_commented(app).await?;

            let page = app
                .post_json(
                    DATASETS,
                    &json!({"comments": "revenue", "table": {"in": "orders"}}),
                )
                .await?;
            assert_eq!(page["count"], 2);
            let mut ids = dataset_ids(&page)?;
            ids.sort();
            assert_eq!(ids, vec![2, 3]);

            let page = app
                .post_json(
                    DATASETS,
                    &json!({"comments": "revenue", "table": {"in": "no_such_table"}}),
                )
                .await?;
            assert_empty_envelope(&page);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn comment_words_match_as_prefixes_and_any_word_suffices() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            DatasetBuilder::new(1, "ledger")
                .field_comment("Recognized revenue in USD")
                .insert(pool)
                .await?;
            DatasetBuilder::new(2, "order_lines")
                .comment("Archived order lines")
                .insert(pool)
                .await?;
            DatasetBuilder::new(3, "sessions")
                .comment("Web sessions")
                .insert(pool)
                .await?;

            let page = app.post_json(DATASETS, &json!({"comments": "reven"})).await?;
            assert_eq!(page["count"], 1);
            assert_eq!(dataset_names(&page)?, strings(&["ledger"]));

            let page = app
                .post_json(DATASETS, &json!({"comments": "revenue archived"}))
                .await?;
            assert_eq!(page["count"], 2);
            assert_eq!(dataset_names(&page)?, strings(&["ledger", "order_lines"]));

            // Only a word's start counts.
            let page = app.post_json(DATASETS, &json!({"comments": "venue"})).await?;
            assert_empty_envelope(&page);

            let page = app.post_json(DATASETS, &json!({"comments": "-- *"})).await?;
            assert_empty_envelope(&page);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn prefix_comment_words_narrow_with_facets() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            seed_commented(app).await?;

            let page = app.post_json(DATASETS, &json!({"comments": "REVEN archiv"})).await?;
            assert_eq!(page["count"], 4);

            let page = app
                .post_json(
                    DATASETS,
                    &json!({"comments": "reven archiv", "table": {"in": "orders"}}),
                )
                .await?;
            assert_eq!(page["count"], 3);
            let mut ids = dataset_ids(&page)?;
            ids.sort();
            assert_eq!(ids, vec![2, 3, 4]);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn name_tiers_rank_exact_then_prefix_suffix_substring() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            DatasetBuilder::new(1, "x_member_y").insert(pool).await?;
            DatasetBuilder::new(2, "old_member").insert(pool).await?;
            DatasetBuilder::new(3, "member_events").insert(pool).await?;
            DatasetBuilder::new(4, "Member").insert(pool).await?;

            let page = app.post_json(DATASETS, &json!({"table": {"in": "member"}})).await?;
            assert_eq!(
                dataset_names(&page)?,
                strings(&["Member", "member_events", "old_member", "x_member_y"])
            );
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn equal_tiers_order_by_identifier_every_time() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            for (id, urn) in [
                (7, "hdfs://data/databases/m2"),
                (3, "hdfs://data/databases/m1"),
                (5, "hdfs://data/databases/m1"),
                (1, "hdfs://data/databases/m3"),
            ] {
                DatasetBuilder::new(id, "members_snapshot").urn(urn).insert(pool).await?;
            }

            let options = json!({"table": {"in": "members"}});
            let first = dataset_ids(&app.post_json(DATASETS, &options).await?)?;
            assert_eq!(first, vec![3, 5, 7, 1]);
            for _ in 0..3 {
                assert_eq!(dataset_ids(&app.post_json(DATASETS, &options).await?)?, first);
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn non_object_or_invalid_options_return_empty_envelope() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            DatasetBuilder::new(1, "anything").insert(app.pool()).await?;

            for body in [json!(null), json!([1, 2]), json!("table")] {
                let page = app.post_json(DATASETS, &body).await?;
                assert_empty_envelope(&page);
                assert_eq!(page["page"], 1);
            }

            let (status, headers, bytes) = app
                .request(Method::POST, DATASETS, Some(Bytes::from_static(b"{oops")))
                .await?;
            assert_status(status, StatusCode::OK, "invalid JSON body");
            assert!(headers.contains_key("x-request-id"));
            let page: Value = serde_json::from_slice(&bytes)?;
            assert_empty_envelope(&page);
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn hostile_values_are_matched_literally() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let pool = app.pool();
            DatasetBuilder::new(1, "members").scope("prod").insert(pool).await?;
            DatasetBuilder::new(2, "100%_done").insert(pool).await?;

            let page = app
                .post_json(
                    DATASETS,
                    &json!({
                        "table": {"in": "x' OR '1'='1"},
                        "scope": {"in": "prod') OR 1=1 --"},
                        "comments": "'; DROP TABLE dict_dataset; --"
                    }),
                )
                .await?;
            assert_empty_envelope(&page);

            // `%` and `_` only match themselves.
            let page = app.post_json(DATASETS, &json!({"table": {"in": "%_"}})).await?;
            assert_eq!(dataset_names(&page)?, strings(&["100%_done"]));

            let all = app.post_json(DATASETS, &json!({})).await?;
            assert_eq!(all["count"], 2);
            Ok(())
        })
    })
    .await
}
