mod common;

use std::collections::HashSet;
use std::sync::Arc;

use shortly::domain::access_worker::run_access_worker;
use shortly::infrastructure::persistence::SqliteMappingRepository;
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_allocations_of_same_url_agree() {
    let dir = tempfile::tempdir().unwrap();
    let pool = common::file_pool(dir.path()).await;
    let service = Arc::new(common::create_link_service(pool.clone()));

    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let service = service.clone();
        tasks.spawn(async move { service.allocate("https://example.com/race").await });
    }

    let mut codes = HashSet::new();
    let mut created = 0;
    while let Some(result) = tasks.join_next().await {
        let allocation = result.unwrap().unwrap();
        if allocation.is_new {
            created += 1;
        }
        codes.insert(allocation.mapping.short_code);
    }

    assert_eq!(codes.len(), 1);
    assert_eq!(created, 1);
    assert_eq!(common::row_count(&pool).await, 1);

    pool.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_allocations_of_distinct_urls() {
    let dir = tempfile::tempdir().unwrap();
    let pool = common::file_pool(dir.path()).await;
    let service = Arc::new(common::create_link_service(pool.clone()));

    let mut tasks = JoinSet::new();
    for i in 0..32 {
        let service = service.clone();
        tasks.spawn(async move {
            service
                .allocate(&format!("https://example.com/page/{i}"))
                .await
        });
    }

    let mut codes = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        codes.insert(result.unwrap().unwrap().mapping.short_code);
    }

    assert_eq!(codes.len(), 32);
    assert_eq!(common::row_count(&pool).await, 32);

    pool.close().await;
}

#[tokio::test]
async fn test_shorten_and_resolve_scenario() {
    let pool = common::test_pool().await;
    let service = common::create_link_service(pool.clone());

    let first = service.allocate("https://example.com/a").await.unwrap();
    let code = first.mapping.short_code.clone();
    assert!(first.is_new);
    assert_eq!(code.len(), 6);

    let again = service.allocate("https://example.com/a").await.unwrap();
    assert!(!again.is_new);
    assert_eq!(again.mapping.short_code, code);

    let resolved = service.resolve(&code).await.unwrap();
    assert_eq!(resolved.original_url, "https://example.com/a");

    let other = service.allocate("https://example.com/b").await.unwrap();
    assert_ne!(other.mapping.short_code, code);
}

#[tokio::test]
async fn test_access_worker_applies_every_event() {
    let pool = common::test_pool().await;
    common::create_test_mapping(&pool, "count1", "https://example.com/count").await;
    let repository = Arc::new(SqliteMappingRepository::new(pool.clone()));

    let (tx, rx) = tokio::sync::mpsc::channel(64);
    let worker = tokio::spawn(run_access_worker(rx, repository, 4));

    for _ in 0..25 {
        tx.send(shortly::domain::access_event::AccessEvent::new("count1"))
            .await
            .unwrap();
    }
    drop(tx);
    worker.await.unwrap();

    assert_eq!(common::access_count(&pool, "count1").await, 25);
}
