use super::*;

#[traced_test]
#[tokio::test]
async fn test_unreachable_store_without_cache() -> TestResult<()> {
  let dir = create_test_dir();
  // Bind and drop to get a port nobody is listening on.
  let port = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();
  let config = Config::default()
    .with_base_url(format!("http://127.0.0.1:{port}"))
    .with_cache_path(dir.path().join("snapshot.json"))
    .with_timeout_secs(1);

  let coordinator = Coordinator::from_config(&config)?;
  assert_eq!(coordinator.acquire().await, Acquisition::Unavailable);
  assert!(!config.cache.path.exists());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_stalled_store_times_out_to_cache() -> TestResult<()> {
  let dir = create_test_dir();
  let store = StubStore::start(StoreReply::Stall).await;
  let config = test_config(&store, dir.path());

  let cache = FileCache::new(&config.cache.path);
  let cached = batchwatch::snapshot::from_slice(super::sync::STORE_BODY.as_bytes())?.unwrap();
  cache.save(&cached).await?;
  let before = std::fs::read(&config.cache.path)?;

  let started = std::time::Instant::now();
  let acquisition = Coordinator::from_config(&config)?.acquire().await;
  assert!(started.elapsed() < Duration::from_secs(10));
  assert_eq!(acquisition.provenance(), Some(Provenance::OfflineCache));
  assert_eq!(acquisition.snapshot(), Some(&cached));
  assert_eq!(std::fs::read(&config.cache.path)?, before);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_empty_store_keeps_previous_cache() -> TestResult<()> {
  let dir = create_test_dir();
  let full = StubStore::start(StoreReply::Respond(200, super::sync::STORE_BODY)).await;
  Coordinator::from_config(&test_config(&full, dir.path()))?.acquire().await;

  let empty = StubStore::start(StoreReply::Respond(200, "null")).await;
  let config = test_config(&empty, dir.path());
  let acquisition = Coordinator::from_config(&config)?.acquire().await;

  assert_eq!(empty.requests(), 1);
  assert_eq!(acquisition.provenance(), Some(Provenance::OfflineCache));
  assert_eq!(acquisition.snapshot().map(|s| s.len()), Some(2));
  Ok(())
}
