use super::*;

/// Two accounts as the store would send them.
pub const STORE_BODY: &str = r#"{
  "atelier": {
    "batches": {
      "-Nx1": {"end": "2030-05-01 18:00:00.123456", "original_name": "Spring Boards", "start": "2030-04-01 09:00:00"},
      "-Nx2": {"end": "2010-01-01 00:00:00"},
      "-Nx3": {"end": "whenever"}
    }
  },
  "studio": {"batches": {}}
}"#;

#[traced_test]
#[tokio::test]
async fn test_fetch_persists_and_resolves() -> TestResult<()> {
  let store = StubStore::start(StoreReply::Respond(200, STORE_BODY)).await;
  let dir = create_test_dir();
  let config = test_config(&store, dir.path());
  let coordinator = Coordinator::from_config(&config)?;

  let Acquisition::Available { snapshot, provenance } = coordinator.acquire().await else {
    panic!("expected a snapshot from the store");
  };
  assert_eq!(provenance, Provenance::Cloud);
  assert_eq!(store.requests(), 1);
  assert!(config.cache.path.exists());

  let now = chrono::NaiveDateTime::parse_from_str("2030-04-30 18:00:00", "%Y-%m-%d %H:%M:%S")?;
  let statuses = resolve(&snapshot, now);
  assert_eq!(statuses.len(), 2);

  let atelier = statuses.iter().find(|s| s.account_name == "atelier").unwrap();
  assert_eq!(atelier.current_batch_label, "Spring Boards");
  assert_eq!(atelier.time_message, "1d 0h Left");
  assert_eq!(atelier.urgency_tier, UrgencyTier::Warning);

  let studio = statuses.iter().find(|s| s.account_name == "studio").unwrap();
  assert_eq!(studio.current_batch_label, "All Batches Done");
  assert_eq!(studio.urgency_tier, UrgencyTier::Unknown);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_round_trip_through_cache() -> TestResult<()> {
  let dir = create_test_dir();

  let online = StubStore::start(StoreReply::Respond(200, STORE_BODY)).await;
  let fetched = Coordinator::from_config(&test_config(&online, dir.path()))?.acquire().await;
  assert_eq!(fetched.provenance(), Some(Provenance::Cloud));

  let offline = StubStore::start(StoreReply::Respond(503, "{\"error\": \"unavailable\"}")).await;
  let cached = Coordinator::from_config(&test_config(&offline, dir.path()))?.acquire().await;
  assert_eq!(cached.provenance(), Some(Provenance::OfflineCache));
  assert_eq!(cached.snapshot(), fetched.snapshot());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_http_source_statuses() -> TestResult<()> {
  let missing = StubStore::start(StoreReply::Respond(404, "")).await;
  let dir = create_test_dir();
  let source = HttpSource::new(&test_config(&missing, dir.path()).remote)?;
  assert!(source.endpoint().as_str().ends_with("/accounts.json"));
  assert!(matches!(source.fetch().await, Err(BatchwatchError::Status(code)) if code.as_u16() == 404));

  for body in ["null", "", "{}"] {
    let empty = StubStore::start(StoreReply::Respond(200, body)).await;
    let source = HttpSource::new(&test_config(&empty, dir.path()).remote)?;
    assert!(source.fetch().await?.is_none(), "{body:?} should mean no data");
  }

  let garbled = StubStore::start(StoreReply::Respond(200, "<html>maintenance</html>")).await;
  let source = HttpSource::new(&test_config(&garbled, dir.path()).remote)?;
  assert!(matches!(source.fetch().await, Err(BatchwatchError::Json(_))));
  Ok(())
}
