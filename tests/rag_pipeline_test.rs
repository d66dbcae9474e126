//! End-to-end pipeline tests: chunking, indexing, retrieval and answering

mod common;

use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

use common::{temp_index_path, test_config, Behavior, ScriptedBackend};
use pdf_rag::domain::models::NO_CREDENTIALS_MESSAGE;
use pdf_rag::infrastructure::embeddings::HashEmbedder;
use pdf_rag::infrastructure::extraction::PlainTextExtractor;
use pdf_rag::{IndexMode, RagError, RagService, VectorIndex};

const DOCUMENT: &str = "The refund policy allows returns within thirty days of purchase. \
    Shipping is free for orders above fifty euros. \
    Support is available by email on weekdays.";

async fn service_with(
    keys: &[&str],
    backend: Arc<ScriptedBackend>,
) -> RagService {
    RagService::from_config_with_backend(&test_config(keys, None), backend)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_capital_of_france_top_1() {
    let index = VectorIndex::new(IndexMode::Internal(HashEmbedder::default()));
    assert_ok!(
        index
            .index(vec![
                "Paris is the capital of France.".to_string(),
                "Lyon is a city in France.".to_string(),
            ])
            .await
    );

    let results = index.query("What is the capital of France?", 1).await;
    assert_eq!(results, vec!["Paris is the capital of France."]);
}

#[tokio::test]
async fn test_content_question_sends_context_prompt() {
    let backend = Arc::new(ScriptedBackend::replying("  Returns are accepted for thirty days.  "));
    let service = service_with(&["key-1"], backend.clone()).await;

    let chunks = assert_ok!(service.index_document(DOCUMENT).await);
    assert!(chunks > 1);

    let answer = service.ask("What is the refund policy?").await;
    assert_eq!(answer, "Returns are accepted for thirty days.");

    let prompts = backend.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Answer the question based on the provided context"));
    assert!(prompts[0].contains("Question: What is the refund policy?"));
    assert!(prompts[0].contains("refund policy allows returns"));
}

#[tokio::test]
async fn test_greeting_skips_context() {
    let backend = Arc::new(ScriptedBackend::replying("Hello there!"));
    let service = service_with(&["key-1"], backend.clone()).await;
    assert_ok!(service.index_document(DOCUMENT).await);

    assert_eq!(service.ask("hello").await, "Hello there!");

    let prompts = backend.prompts();
    assert!(prompts[0].contains("Respond to this greeting"));
    assert!(!prompts[0].contains("refund"));
}

#[tokio::test]
async fn test_ask_without_keys_returns_message() {
    let backend = Arc::new(ScriptedBackend::replying("unused"));
    let service = service_with(&[], backend.clone()).await;
    assert_ok!(service.index_document(DOCUMENT).await);

    assert_eq!(service.ask("What is the refund policy?").await, NO_CREDENTIALS_MESSAGE);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_failover_is_invisible_to_the_user() {
    let backend = Arc::new(
        ScriptedBackend::replying("Thirty days.").with("key-1", Behavior::Fail("quota".into())),
    );
    let service = service_with(&["key-1", "key-2"], backend.clone()).await;
    assert_ok!(service.index_document(DOCUMENT).await);

    assert_eq!(service.ask("What is the refund policy?").await, "Thirty days.");
    assert_eq!(backend.calls(), vec!["key-1", "key-2"]);
}

#[tokio::test]
async fn test_empty_document_clears_index() {
    let service = service_with(&["key-1"], Arc::new(ScriptedBackend::replying("ok"))).await;
    assert_ok!(service.index_document(DOCUMENT).await);

    let chunks = assert_ok!(service.index_document("   \n\t ").await);

    assert_eq!(chunks, 0);
    assert_eq!(service.stats().await.chunk_count, 0);
    assert!(service.index().query("refund", 3).await.is_empty());
}

#[tokio::test]
async fn test_reindex_replaces_previous_document() {
    let service = service_with(&["key-1"], Arc::new(ScriptedBackend::replying("ok"))).await;
    assert_ok!(service.index_document("alpha bravo charlie delta echo").await);
    assert_ok!(service.index_document("zulu yankee xray whiskey").await);

    let results = service.index().query("alpha bravo", 10).await;
    assert_eq!(results, vec!["zulu yankee xray whiskey"]);
}

#[tokio::test]
async fn test_ask_with_sources_reports_ranked_chunks() {
    let service = service_with(&["key-1"], Arc::new(ScriptedBackend::replying("ok"))).await;
    assert_ok!(service.index_document(DOCUMENT).await);

    let answer = service.ask_with_sources("shipping free", Some(2)).await;

    assert_eq!(answer.text, "ok");
    assert_eq!(answer.sources.len(), 2);
    assert!(answer.sources[0].distance <= answer.sources[1].distance);
    assert!(answer.sources[0].text.contains("Shipping"));
}

#[tokio::test]
async fn test_index_file_through_extractor() {
    let dir = common::temp_dir();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, format!("{DOCUMENT}\u{c}Page two mentions warranty terms.\u{c}")).unwrap();

    let service = service_with(&["key-1"], Arc::new(ScriptedBackend::replying("ok"))).await;
    let chunks = assert_ok!(service.index_file(&path, &PlainTextExtractor::new()).await);
    assert!(chunks > 0);

    let top = service.index().query("warranty terms", 1).await;
    assert!(top[0].contains("warranty"));

    let missing = service
        .index_file(&dir.path().join("missing.txt"), &PlainTextExtractor::new())
        .await;
    assert!(matches!(assert_err!(missing), RagError::ExtractionFailed(_)));
}

#[tokio::test]
async fn test_persisted_index_survives_restart() {
    let (_dir, path) = temp_index_path();
    let config = test_config(&["key-1"], Some(&path));

    let first = RagService::from_config_with_backend(&config, Arc::new(ScriptedBackend::replying("ok")))
        .await
        .unwrap();
    let chunks = assert_ok!(first.index_document(DOCUMENT).await);
    let generation = first.stats().await.generation_id;
    drop(first);

    let second = RagService::from_config_with_backend(&config, Arc::new(ScriptedBackend::replying("ok")))
        .await
        .unwrap();
    let stats = second.stats().await;

    assert!(stats.persistent);
    assert_eq!(stats.chunk_count, chunks);
    assert_eq!(stats.generation_id, generation);
    assert_eq!(
        second.index().query("refund policy", 1).await.len(),
        1
    );
}

#[tokio::test]
async fn test_persisted_index_from_other_embedder_is_discarded() {
    let (_dir, path) = temp_index_path();
    let config = test_config(&["key-1"], Some(&path));

    let first = RagService::from_config_with_backend(&config, Arc::new(ScriptedBackend::replying("ok")))
        .await
        .unwrap();
    assert_ok!(first.index_document(DOCUMENT).await);
    drop(first);

    let mut resized = config.clone();
    resized.index.dimensions = 128;
    let second = RagService::from_config_with_backend(&resized, Arc::new(ScriptedBackend::replying("ok")))
        .await
        .unwrap();

    let stats = second.stats().await;
    assert_eq!(stats.chunk_count, 0);
    assert_eq!(stats.embedder, "hashing:128");
}

#[tokio::test]
async fn test_invalid_chunking_fails_fast() {
    let mut config = test_config(&["key-1"], None);
    config.chunking.chunk_overlap = config.chunking.chunk_size;

    let result =
        RagService::from_config_with_backend(&config, Arc::new(ScriptedBackend::replying("ok"))).await;
    assert!(matches!(result, Err(RagError::InvalidConfiguration(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_queries_never_see_mixed_generations() {
    let index = Arc::new(VectorIndex::new(IndexMode::Internal(HashEmbedder::default())));
    let alpha: Vec<String> = (0..20).map(|i| format!("alpha shared term {i}")).collect();
    let beta: Vec<String> = (0..20).map(|i| format!("beta shared term {i}")).collect();
    index.index(alpha.clone()).await.unwrap();

    let writer = {
        let index = Arc::clone(&index);
        tokio::spawn(async move {
            for round in 0..50 {
                let next = if round % 2 == 0 { beta.clone() } else { alpha.clone() };
                index.index(next).await.unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let index = Arc::clone(&index);
            tokio::spawn(async move {
                for _ in 0..100 {
                    let results = index.query("shared term", 20).await;
                    assert_eq!(results.len(), 20);
                    let all_alpha = results.iter().all(|r| r.starts_with("alpha"));
                    let all_beta = results.iter().all(|r| r.starts_with("beta"));
                    assert!(all_alpha || all_beta, "mixed generation: {results:?}");
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
}
