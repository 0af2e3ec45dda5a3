use dailylog_core::db::open_db;
use dailylog_core::{
    load_collection, reports_to_csv, save_collection, summarize, KeyValueStore, KnowledgeDraft,
    KnowledgeEntry, KnowledgeRepository, MemoryKvStore, RepoError, Report, ReportDraft,
    ReportRepository, SqliteKvStore, KNOWLEDGE_STORAGE_KEY, REPORTS_STORAGE_KEY,
};

const BROWSER_EXPORT: &str = r#"[
  {
    "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
    "date": "2024-01-01",
    "staff": "Ann",
    "place": "Mall",
    "contracts": 3,
    "details": "",
    "good": "smiled",
    "issue": "",
    "next": "",
    "createdAt": "2024-01-01T09:00:00.000Z"
  },
  {
    "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
    "date": "2024-01-02",
    "staff": "Bob",
    "contracts": null,
    "createdAt": "2024-01-02T09:00:00.000Z"
  },
  {
    "id": "6ba7b810-9dad-41d1-80b4-00c04fd430c8",
    "staff": "Cy",
    "contracts": "2"
  }
]"#;

#[test]
fn legacy_bare_array_loads_with_missing_fields_defaulted() {
    let store = MemoryKvStore::with_entry(REPORTS_STORAGE_KEY, BROWSER_EXPORT);
    let reports: Vec<Report> = load_collection(&store, REPORTS_STORAGE_KEY);

    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].contracts, 3.0);
    assert_eq!(reports[0].good, "smiled");
    assert_eq!(reports[1].contracts, 0.0);
    assert_eq!(reports[1].place, "");
    assert_eq!(reports[2].contracts, 2.0);
    assert_eq!(reports[2].created_at, "");
}

#[test]
fn legacy_data_is_rewritten_as_versioned_envelope_on_next_mutation() {
    let store = MemoryKvStore::with_entry(REPORTS_STORAGE_KEY, BROWSER_EXPORT);
    let mut repo = ReportRepository::load(&store);
    repo.add(ReportDraft::from_fields([("staff", "Dee")])).unwrap();

    let raw = store.get(REPORTS_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["schema_version"], 1);
    assert_eq!(value["items"].as_array().unwrap().len(), 4);
    assert_eq!(value["items"][0]["createdAt"], "2024-01-01T09:00:00.000Z");
}

#[test]
fn save_then_load_round_trips_through_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dailylog.db");
    let original: Vec<Report> = {
        let seed = MemoryKvStore::with_entry(REPORTS_STORAGE_KEY, BROWSER_EXPORT);
        load_collection(&seed, REPORTS_STORAGE_KEY)
    };

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteKvStore::try_new(&conn).unwrap();
        save_collection(&store, REPORTS_STORAGE_KEY, &original).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteKvStore::try_new(&conn).unwrap();
    let loaded: Vec<Report> = load_collection(&store, REPORTS_STORAGE_KEY);
    assert_eq!(loaded, original);

    save_collection(&store, REPORTS_STORAGE_KEY, &loaded).unwrap();
    let again: Vec<Report> = load_collection(&store, REPORTS_STORAGE_KEY);
    assert_eq!(again, original);
}

#[test]
fn corrupt_text_degrades_to_empty_collection() {
    for raw in ["", "not json", "{\"items\":", "42", "[{\"staff\":\"no id\"}]"] {
        let store = MemoryKvStore::with_entry(REPORTS_STORAGE_KEY, raw);
        let reports: Vec<Report> = load_collection(&store, REPORTS_STORAGE_KEY);
        assert!(reports.is_empty(), "expected empty collection for {raw:?}");
    }
}

#[test]
fn newer_schema_version_loads_as_empty() {
    let store = MemoryKvStore::with_entry(
        KNOWLEDGE_STORAGE_KEY,
        r#"{"schema_version":2,"items":[]}"#,
    );
    let entries: Vec<KnowledgeEntry> = load_collection(&store, KNOWLEDGE_STORAGE_KEY);
    assert!(entries.is_empty());
}

#[test]
fn keys_are_independent() {
    let store = MemoryKvStore::with_entry(KNOWLEDGE_STORAGE_KEY, "garbage");
    let mut reports = ReportRepository::load(&store);
    reports
        .add(ReportDraft::from_fields([("staff", "Ann")]))
        .unwrap();

    assert_eq!(
        store.get(KNOWLEDGE_STORAGE_KEY).unwrap().as_deref(),
        Some("garbage")
    );
}

#[test]
fn sqlite_store_rejects_unmigrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteKvStore::try_new(&conn).err().unwrap();
    assert!(err.to_string().contains("kv_entries"));
}

#[test]
fn fractional_legacy_counts_survive_summary_csv_and_resave() {
    let legacy = r#"[
      {"id":"0f8fad5b-d9cb-469f-a165-70867728950e","staff":"Ann","contracts":1.5,"createdAt":"t"},
      {"id":"7c9e6679-7425-40de-944b-e07fc1f90ae7","staff":"Ann","contracts":1.5,"createdAt":"t"}
    ]"#;
    let store = MemoryKvStore::with_entry(REPORTS_STORAGE_KEY, legacy);
    let mut repo = ReportRepository::load(&store);

    let counts = repo.list().iter().map(|r| r.contracts).collect::<Vec<_>>();
    assert_eq!(counts, vec![1.5, 1.5]);

    let summary = summarize(repo.list(), None);
    assert_eq!(summary.len(), 1);
    assert_eq!(summary[0].contracts, 3.0);

    let csv = reports_to_csv(repo.list());
    assert_eq!(csv.lines().nth(1), Some(",Ann,,1.5,,,,,t"));

    repo.add(ReportDraft::from_fields([("staff", "Bob"), ("contracts", "2")]))
        .unwrap();
    let raw = store.get(REPORTS_STORAGE_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["items"][0]["contracts"], 1.5);
    assert!(value["items"][2]["contracts"].is_i64());
    assert_eq!(value["items"][2]["contracts"], 2);
}

#[test]
fn newer_schema_data_is_never_overwritten() {
    let newer = r#"{"schema_version":2,"items":[{"id":"0f8fad5b-d9cb-469f-a165-70867728950e","staff":"Ann","region":"N"}]}"#;
    let store = MemoryKvStore::with_entry(REPORTS_STORAGE_KEY, newer);
    let mut repo = ReportRepository::load(&store);
    assert!(repo.is_empty());
    assert!(repo.is_read_only());

    let err = repo
        .add(ReportDraft::from_fields([("staff", "Bob")]))
        .unwrap_err();
    match err {
        RepoError::UnsupportedSchemaVersion {
            key,
            found,
            supported,
        } => {
            assert_eq!(key, REPORTS_STORAGE_KEY);
            assert_eq!(found, 2);
            assert_eq!(supported, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(repo.remove(uuid::Uuid::new_v4()).is_err());
    assert!(repo.clear().is_err());

    assert!(repo.is_empty());
    assert_eq!(
        store.get(REPORTS_STORAGE_KEY).unwrap().as_deref(),
        Some(newer)
    );
}

#[test]
fn newer_knowledge_data_does_not_block_the_report_collection() {
    let newer = r#"{"schema_version":3,"items":[]}"#;
    let store = MemoryKvStore::with_entry(KNOWLEDGE_STORAGE_KEY, newer);

    let mut knowledge = KnowledgeRepository::load(&store);
    assert!(knowledge.add(KnowledgeDraft::new("t", "b")).is_err());

    let mut reports = ReportRepository::load(&store);
    assert!(!reports.is_read_only());
    reports
        .add(ReportDraft::from_fields([("staff", "Ann")]))
        .unwrap();
    assert_eq!(
        store.get(KNOWLEDGE_STORAGE_KEY).unwrap().as_deref(),
        Some(newer)
    );
}

#[test]
fn legacy_record_without_id_is_skipped_alone() {
    let legacy = r#"[
      {"id":"0f8fad5b-d9cb-469f-a165-70867728950e","staff":"Ann","contracts":1},
      {"staff":"Ghost","contracts":9},
      {"id":"7c9e6679-7425-40de-944b-e07fc1f90ae7","staff":"Bob","contracts":2}
    ]"#;
    let store = MemoryKvStore::with_entry(REPORTS_STORAGE_KEY, legacy);
    let mut repo = ReportRepository::load(&store);

    let staff = repo
        .list()
        .iter()
        .map(|r| r.staff.as_str())
        .collect::<Vec<_>>();
    assert_eq!(staff, vec!["Ann", "Bob"]);

    repo.add(ReportDraft::from_fields([("staff", "Cy")])).unwrap();
    let reloaded = ReportRepository::load(&store);
    assert_eq!(reloaded.len(), 3);
}
