// Installs the global subscriber, so everything lives in one test

use pdf_rag::infrastructure::logging::{LogConfig, LogFormat, LoggerImpl, RotationPolicy};
use pdf_rag::CredentialPool;
use std::fs;
use tempfile::TempDir;
use tracing::{info, instrument, warn};

#[instrument]
fn instrumented_lookup(question: &str) -> usize {
    info!("looking up context");
    question.len()
}

#[test]
fn test_file_logging_scrubs_credentials() {
    let temp_dir = TempDir::new().unwrap();
    let config = LogConfig {
        level: "info".to_string(),
        format: LogFormat::Json,
        log_dir: Some(temp_dir.path().to_path_buf()),
        enable_console: false,
        rotation: RotationPolicy::Never,
    };

    let logger = LoggerImpl::init(&config).unwrap();

    info!(chunks = 4, "document indexed");
    warn!("generation failed with key AIzaSyA1b2C3d4E5f6G7h8I9j0KlMnOpQrStUv");
    warn!("retrying with Authorization: Bearer abc.def.ghi");
    assert_eq!(instrumented_lookup("what is the refund policy"), 25);

    let pool = CredentialPool::from_keys(["AIzaSyZ9y8X7w6V5u4T3s2R1q0PoNmLkJiHgFe"]);
    pool.mark_failed(&"AIzaSyZ9y8X7w6V5u4T3s2R1q0PoNmLkJiHgFe".into());

    // Dropping the logger flushes the non-blocking writer
    drop(logger);

    let contents = fs::read_to_string(temp_dir.path().join("pdf-rag.log")).unwrap();

    assert!(contents.contains("document indexed"));
    assert!(contents.contains("instrumented_lookup"));
    assert!(contents.contains("[API_KEY_REDACTED]"));
    assert!(contents.contains("Bearer [TOKEN_REDACTED]"));
    assert!(!contents.contains("AIzaSyA1b2C3d4E5f6G7h8I9j0KlMnOpQrStUv"));
    assert!(!contents.contains("AIzaSyZ9y8X7w6V5u4T3s2R1q0PoNmLkJiHgFe"));
    assert!(!contents.contains("abc.def.ghi"));

    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(parsed.get("level").is_some());
    }
}
