// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Full flow: orchestrator driving a live server over HTTP

use std::sync::Arc;

use altgen::api::auth::AllowAll;
use altgen::api::{collection_routes, AppState};
use altgen::config::{PluginOptions, ProviderConfig, SaveMode};
use altgen::orchestrator::BatchOrchestrator;
use altgen::store::{DocumentStore, ImageRecord, MemoryStore};
use altgen::suggestion::SuggestionStatus;
use altgen::HttpGenerationClient;

fn svg_record(id: &str, filename: &str) -> ImageRecord {
    ImageRecord {
        id: id.to_string(),
        filename: filename.to_string(),
        url: format!("/media/{}", filename),
        alt: None,
    }
}

async fn spawn_server(store: Arc<MemoryStore>) -> String {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let options = PluginOptions {
        provider: Some(ProviderConfig::Openai {
            api_key: Some("test-key".to_string()),
            model: None,
        }),
        ..Default::default()
    };
    let state = AppState::new(options, store, Arc::new(AllowAll)).unwrap();
    let app = collection_routes(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// SVG alt texts are derived server-side from the filename, so the whole
// loop runs without a vision backend.
#[tokio::test]
async fn test_generate_then_save_over_http() {
    let store = Arc::new(MemoryStore::new());
    let records = vec![
        svg_record("1", "Company-Logo.svg"),
        svg_record("2", "settings_icon.svg"),
        svg_record("3", "main-banner.svg"),
    ];
    for record in &records {
        store.insert("media", record.clone()).await;
    }

    let base_url = spawn_server(store.clone()).await;
    let client = HttpGenerationClient::new(base_url, "media").unwrap();
    let (orchestrator, _events) =
        BatchOrchestrator::new(Arc::new(client), 2, SaveMode::GenerateThenSave);

    orchestrator.run(&records).await;

    let suggestions = orchestrator.store();
    assert_eq!(suggestions.count_with_status(SuggestionStatus::Ready), 3);
    assert_eq!(suggestions.get("1").unwrap().suggested_alt, "company logo");
    assert_eq!(suggestions.get("2").unwrap().suggested_alt, "settings icon");
    assert_eq!(suggestions.get("3").unwrap().suggested_alt, "main banner");

    let outcome = orchestrator.save_all().await.unwrap();
    assert_eq!(outcome.success.len(), 3);
    assert!(outcome.failed.is_empty());
    assert_eq!(suggestions.count_with_status(SuggestionStatus::Saved), 3);

    // persisted values landed in the document store
    assert_eq!(
        store.get("media", "1").await.unwrap().alt.as_deref(),
        Some("company logo")
    );
    assert!(store
        .find_missing_alt("media", "alt", 500)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_auto_save_over_http() {
    let store = Arc::new(MemoryStore::new());
    let records = vec![svg_record("1", "checkout_icon.svg")];
    store.insert("media", records[0].clone()).await;

    let base_url = spawn_server(store.clone()).await;
    let client = HttpGenerationClient::new(base_url, "media").unwrap();
    let (orchestrator, _events) =
        BatchOrchestrator::new(Arc::new(client), 5, SaveMode::AutoSave);

    orchestrator.run(&records).await;

    let suggestions = orchestrator.store();
    assert_eq!(suggestions.count_with_status(SuggestionStatus::Saved), 1);
    assert_eq!(
        store.get("media", "1").await.unwrap().alt.as_deref(),
        Some("checkout icon")
    );
}

#[tokio::test]
async fn test_generation_error_is_isolated_over_http() {
    let store = Arc::new(MemoryStore::new());
    // "notes.txt" fails the extension check server-side
    let records = vec![
        svg_record("1", "Company-Logo.svg"),
        svg_record("2", "notes.txt"),
    ];
    for record in &records {
        store.insert("media", record.clone()).await;
    }

    let base_url = spawn_server(store).await;
    let client = HttpGenerationClient::new(base_url, "media").unwrap();
    let (orchestrator, _events) =
        BatchOrchestrator::new(Arc::new(client), 5, SaveMode::GenerateThenSave);

    orchestrator.run(&records).await;

    let suggestions = orchestrator.store();
    assert_eq!(suggestions.count_with_status(SuggestionStatus::Ready), 1);
    let failed = suggestions.get("2").unwrap();
    assert_eq!(failed.status, SuggestionStatus::Error);
    assert!(failed.error.as_deref().unwrap().contains("not supported"));
}
