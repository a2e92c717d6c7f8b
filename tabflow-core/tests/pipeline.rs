//! End-to-end engine behavior: ingest, process, read back, expire.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tabflow_core::{
    CacheKey, CacheStore, CacheValue, DatasetMeta, MemoryStore, NodeDescriptor, NodeType,
    PipelineExecutor, Row, Settings, StoreError, StoreResult, Table, TabflowError,
};

fn row(value: serde_json::Value) -> Row {
    serde_json::from_value(value).unwrap()
}

fn cities() -> Table {
    Table::from_rows(vec![
        row(json!({"city": "Oslo", "population": 717710})),
        row(json!({"city": "Bergen", "population": 291940})),
        row(json!({"city": "Trondheim", "population": 212660})),
        row(json!({"city": "Stavanger", "population": 149048})),
    ])
}

fn executor_with(settings: Settings) -> PipelineExecutor {
    let settings = Arc::new(settings);
    let store = Arc::new(MemoryStore::new(settings.store_max_capacity));
    PipelineExecutor::new(store, settings)
}

fn executor() -> PipelineExecutor {
    executor_with(Settings::default())
}

#[tokio::test]
async fn chain_of_transforms_flows_through_cache() {
    let executor = executor();
    executor
        .store_dataset("f1", cities(), DatasetMeta::default())
        .await
        .unwrap();

    // f1 -> head(3) -> population > 250000 -> project city
    executor
        .process(
            &NodeDescriptor::new("sampled", NodeType::Sampler)
                .with_source("f1")
                .with_parameter("method", json!("head"))
                .with_parameter("sampleSize", json!(3)),
        )
        .await
        .unwrap();

    executor
        .process(
            &NodeDescriptor::new("big", NodeType::FilterMore)
                .with_parents(["sampled"])
                .with_parameter("column", json!("population"))
                .with_parameter("operator", json!(">"))
                .with_parameter("value", json!(250000)),
        )
        .await
        .unwrap();

    let result = executor
        .process(
            &NodeDescriptor::new("names", NodeType::SelectColumns)
                .with_parents(["big"])
                .with_parameter("columns", json!("city")),
        )
        .await
        .unwrap();

    assert_eq!(result.row_count, 2);
    assert_eq!(result.columns, vec!["city"]);
    assert_eq!(result.sample[0], row(json!({"city": "Oslo"})));
    assert_eq!(result.sample[1], row(json!({"city": "Bergen"})));
}

#[tokio::test]
async fn missing_source_is_not_found_never_empty() {
    let executor = executor();
    let err = executor
        .process(&NodeDescriptor::new("n1", NodeType::Sampler).with_source("never-uploaded"))
        .await
        .unwrap_err();
    assert!(matches!(err, TabflowError::SourceNotFound { .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn two_parents_concatenate_in_parent_list_order() {
    let executor = executor();
    executor
        .store_dataset("f1", cities(), DatasetMeta::default())
        .await
        .unwrap();

    executor
        .process(
            &NodeDescriptor::new("p1", NodeType::SelectRows)
                .with_source("f1")
                .with_parameter("startRow", json!(0))
                .with_parameter("endRow", json!(2)),
        )
        .await
        .unwrap();
    executor
        .process(
            &NodeDescriptor::new("p2", NodeType::SelectRows)
                .with_source("f1")
                .with_parameter("startRow", json!(2))
                .with_parameter("endRow", json!(4)),
        )
        .await
        .unwrap();

    let merged = executor
        .process(&NodeDescriptor::new("merged", NodeType::File).with_parents(["p2", "p1"]))
        .await
        .unwrap();

    let order: Vec<String> = executor
        .read_node("merged", 100)
        .await
        .unwrap()
        .rows
        .iter()
        .map(|r| r.get("city").unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(merged.row_count, 4);
    assert_eq!(order, vec!["Trondheim", "Stavanger", "Oslo", "Bergen"]);
}

#[tokio::test]
async fn reprocessing_is_idempotent_for_stored_value() {
    let executor = executor();
    executor
        .store_dataset("f1", cities(), DatasetMeta::default())
        .await
        .unwrap();

    let descriptor = NodeDescriptor::new("n1", NodeType::Sampler)
        .with_source("f1")
        .with_parameter("sampleSize", json!(3))
        .with_parameter("seed", json!(7));

    let first = executor.process(&descriptor).await.unwrap();
    let first_read = executor.read_node("n1", 100).await.unwrap();

    let second = executor.process(&descriptor).await.unwrap();
    let second_read = executor.read_node("n1", 100).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first_read).unwrap(),
        serde_json::to_vec(&second_read).unwrap()
    );
}

#[tokio::test]
async fn expired_result_reads_as_miss_and_fails_downstream() {
    let executor = executor_with(
        Settings::builder()
            .node_result_ttl(Duration::from_millis(80))
            .build(),
    );
    executor
        .store_dataset("f1", cities(), DatasetMeta::default())
        .await
        .unwrap();
    executor
        .process(&NodeDescriptor::new("parent", NodeType::File).with_source("f1"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(160)).await;

    let read = executor.read_node("parent", 100).await.unwrap_err();
    assert!(matches!(read, TabflowError::NodeNotFound { .. }));

    let downstream = executor
        .process(&NodeDescriptor::new("child", NodeType::File).with_parents(["parent"]))
        .await
        .unwrap_err();
    assert!(
        matches!(downstream, TabflowError::UpstreamNotFound { ref node_id } if node_id == "parent")
    );
}

#[tokio::test]
async fn expired_dataset_fails_node_processing() {
    let executor = executor_with(
        Settings::builder()
            .dataset_ttl(Duration::from_millis(80))
            .build(),
    );
    executor
        .store_dataset("f1", cities(), DatasetMeta::default())
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(160)).await;

    let err = executor
        .process(&NodeDescriptor::new("n1", NodeType::File).with_source("f1"))
        .await
        .unwrap_err();
    assert!(matches!(err, TabflowError::SourceNotFound { .. }));
}

#[tokio::test]
async fn ancestry_deeper_than_limit_fails_fast() {
    let executor = executor_with(Settings::builder().max_resolve_depth(3).build());
    executor
        .store_dataset("f1", cities(), DatasetMeta::default())
        .await
        .unwrap();

    executor
        .process(&NodeDescriptor::new("n0", NodeType::File).with_source("f1"))
        .await
        .unwrap();
    for i in 1..=3 {
        executor
            .process(
                &NodeDescriptor::new(format!("n{i}"), NodeType::File)
                    .with_parents([format!("n{}", i - 1)]),
            )
            .await
            .unwrap();
    }

    let err = executor
        .process(&NodeDescriptor::new("n4", NodeType::File).with_parents(["n3"]))
        .await
        .unwrap_err();
    assert!(matches!(err, TabflowError::GraphTooDeep { limit: 3, .. }));
}

/// A store whose backing service is down: every operation fails, nothing is
/// ever a miss.
struct UnavailableStore;

#[async_trait::async_trait]
impl CacheStore for UnavailableStore {
    async fn put(&self, _key: CacheKey, _value: CacheValue, _ttl: Duration) -> StoreResult<()> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn get(&self, _key: &CacheKey) -> StoreResult<Option<Arc<CacheValue>>> {
        Err(StoreError::unavailable("connection refused"))
    }

    async fn delete(&self, _key: &CacheKey) -> StoreResult<bool> {
        Err(StoreError::unavailable("connection refused"))
    }
}

#[tokio::test]
async fn store_outage_is_distinct_from_not_found() {
    let executor = PipelineExecutor::new(Arc::new(UnavailableStore), Arc::new(Settings::default()));

    let err = executor
        .process(&NodeDescriptor::new("n1", NodeType::File).with_source("f1"))
        .await
        .unwrap_err();
    assert!(err.is_store_unavailable());
    assert!(!err.is_not_found());

    let err = executor.read_node("n1", 10).await.unwrap_err();
    assert!(err.is_store_unavailable());
}

#[tokio::test]
async fn concurrent_processing_of_same_node_last_write_wins() {
    let executor = Arc::new(executor());
    executor
        .store_dataset("f1", cities(), DatasetMeta::default())
        .await
        .unwrap();

    let descriptor = NodeDescriptor::new("n1", NodeType::Sampler)
        .with_source("f1")
        .with_parameter("method", json!("head"))
        .with_parameter("sampleSize", json!(2));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let executor = Arc::clone(&executor);
            let descriptor = descriptor.clone();
            tokio::spawn(async move { executor.process(&descriptor).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // All racers computed the same deterministic result, so whichever write
    // landed last, the stored value is coherent.
    assert_eq!(executor.read_node("n1", 100).await.unwrap().total_rows, 2);
}
