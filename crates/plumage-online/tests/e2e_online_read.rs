//! E2E tests for the Redis online read path
//!
//! These tests require Redis to be running.
//! Run with: `cargo test -p plumage-online --test e2e_online_read -- --ignored`
//!
//! Records are written with raw Redis commands, byte-identical to what
//! an external writer produces, then read back through the store.

use plumage_online::{
    build_lookup_key, feature_field_id, timestamp_field, EntityKey, RedisOnlineStore, TypedValue,
};
use std::collections::HashMap;

fn options() -> HashMap<String, String> {
    let mut options = HashMap::new();
    options.insert(
        "connection_string".to_string(),
        "localhost:6379".to_string(),
    );
    options
}

async fn raw_connection() -> Option<redis::aio::MultiplexedConnection> {
    let client = redis::Client::open("redis://localhost:6379").ok()?;
    client.get_multiplexed_async_connection().await.ok()
}

/// Writes one record the way an external materializer would
async fn write_record(
    conn: &mut redis::aio::MultiplexedConnection,
    project: &str,
    entity: &EntityKey,
    view: &str,
    cells: &[(&str, TypedValue)],
) {
    let key = build_lookup_key(project, entity).unwrap();
    let mut cmd = redis::cmd("HSET");
    cmd.arg(key.as_slice());
    for (name, value) in cells {
        cmd.arg(feature_field_id(view, name).as_slice())
            .arg(serde_json::to_vec(value).unwrap());
    }
    cmd.arg(timestamp_field(view))
        .arg(serde_json::to_vec(&chrono::Utc::now()).unwrap());
    cmd.query_async::<_, ()>(conn).await.unwrap();
}

async fn delete_record(
    conn: &mut redis::aio::MultiplexedConnection,
    project: &str,
    entity: &EntityKey,
) {
    let key = build_lookup_key(project, entity).unwrap();
    redis::cmd("DEL")
        .arg(key.as_slice())
        .query_async::<_, ()>(conn)
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "Requires Redis to be running"]
async fn test_health_check() {
    let store = RedisOnlineStore::new("proj", &options())
        .await
        .expect("Redis connection required");
    assert!(store.health_check().await.is_ok());
}

#[tokio::test]
#[ignore = "Requires Redis to be running"]
async fn test_read_single_entity() {
    let mut conn = raw_connection().await.expect("Redis connection required");
    let entity = EntityKey::single("customer_id", TypedValue::Int64(42));

    write_record(
        &mut conn,
        "e2e_proj",
        &entity,
        "txn_stats",
        &[
            ("amount", TypedValue::Int64(100)),
            ("count", TypedValue::Int32(3)),
        ],
    )
    .await;

    let store = RedisOnlineStore::new("e2e_proj", &options()).await.unwrap();
    let results = store
        .read(
            std::slice::from_ref(&entity),
            "txn_stats",
            &["amount".to_string(), "count".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0][0].as_ref().unwrap().value,
        TypedValue::Int64(100)
    );
    assert_eq!(results[0][1].as_ref().unwrap().value, TypedValue::Int32(3));

    delete_record(&mut conn, "e2e_proj", &entity).await;
}

#[tokio::test]
#[ignore = "Requires Redis to be running"]
async fn test_missing_feature_comes_back_absent() {
    let mut conn = raw_connection().await.expect("Redis connection required");
    let entity = EntityKey::single("customer_id", TypedValue::Int64(7));

    write_record(
        &mut conn,
        "e2e_proj",
        &entity,
        "txn_stats",
        &[("amount", TypedValue::Int64(55))],
    )
    .await;

    let store = RedisOnlineStore::new("e2e_proj", &options()).await.unwrap();
    let results = store
        .read(
            std::slice::from_ref(&entity),
            "txn_stats",
            &["amount".to_string(), "count".to_string()],
        )
        .await
        .unwrap();

    assert!(results[0][0].is_some());
    assert!(results[0][1].is_none());

    delete_record(&mut conn, "e2e_proj", &entity).await;
}

#[tokio::test]
#[ignore = "Requires Redis to be running"]
async fn test_pipelined_read_matches_sequential() {
    let mut conn = raw_connection().await.expect("Redis connection required");
    let entities: Vec<EntityKey> = (0..10)
        .map(|i| EntityKey::single("customer_id", TypedValue::Int64(1000 + i)))
        .collect();

    for (i, entity) in entities.iter().enumerate() {
        write_record(
            &mut conn,
            "e2e_proj",
            entity,
            "txn_stats",
            &[("amount", TypedValue::Int64(i as i64))],
        )
        .await;
    }

    let store = RedisOnlineStore::new("e2e_proj", &options()).await.unwrap();
    let features = ["amount".to_string()];

    let sequential = store
        .read(&entities, "txn_stats", &features)
        .await
        .unwrap();
    let pipelined = store
        .read_pipelined(&entities, "txn_stats", &features)
        .await
        .unwrap();

    assert_eq!(sequential.len(), pipelined.len());
    for (i, (s, p)) in sequential.iter().zip(&pipelined).enumerate() {
        assert_eq!(
            s[0].as_ref().unwrap().value,
            TypedValue::Int64(i as i64)
        );
        assert_eq!(s[0].as_ref().unwrap().value, p[0].as_ref().unwrap().value);
    }

    for entity in &entities {
        delete_record(&mut conn, "e2e_proj", entity).await;
    }
}
