//! Integration tests for metadata removal.

use lopdf::Document;
use pdfmix::config::Config;
use pdfmix::inspect::inspect;
use pdfmix::io::PdfReader;
use pdfmix::ops::{Operations, SanitizeOutcome};

use crate::common::{expected, force_config, labels, rotations, write_pdf};

#[tokio::test]
async fn test_fixture_has_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 2);

    let report = inspect(&input).await.unwrap();
    assert!(report.has_info);
    assert!(report.has_xmp);
}

#[tokio::test]
async fn test_every_operation_output_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", "A", 3);
    let b = write_pdf(dir.path(), "b.pdf", "B", 3);
    let ops = Operations::new(force_config());

    let merged = dir.path().join("merged.pdf");
    let extracted = dir.path().join("extracted.pdf");
    let rotated = dir.path().join("rotated.pdf");

    ops.merge(&[a.clone(), b], &merged).await.unwrap();
    ops.extract(&a, "1", &extracted).await.unwrap();
    ops.rotate(&a, "1-2", 90, &rotated).await.unwrap();

    for output in [&merged, &extracted, &rotated] {
        let report = inspect(output).await.unwrap();
        assert!(report.is_clean(), "{} still has metadata", output.display());
    }
}

#[tokio::test]
async fn test_sanitize_file_keeps_pages_and_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 3);
    let rotated = dir.path().join("rotated.pdf");
    let clean = dir.path().join("clean.pdf");
    let ops = Operations::new(Config {
        sanitize: false,
        ..force_config()
    });

    ops.rotate(&input, "2", 90, &rotated).await.unwrap();
    ops.sanitize_file(&rotated, &clean).await.unwrap();

    assert_eq!(labels(&clean), expected("P", &[1, 2, 3]));
    assert_eq!(rotations(&clean), vec![0, 90, 0]);
    assert!(inspect(&clean).await.unwrap().is_clean());
}

#[tokio::test]
async fn test_sanitize_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 4);
    let once = dir.path().join("once.pdf");
    let twice = dir.path().join("twice.pdf");
    let ops = Operations::new(force_config());

    ops.sanitize_file(&input, &once).await.unwrap();
    ops.sanitize_file(&once, &twice).await.unwrap();

    assert_eq!(labels(&once), labels(&twice));
    assert_eq!(rotations(&once), rotations(&twice));

    let first = Document::load(&once).unwrap();
    let second = Document::load(&twice).unwrap();
    assert_eq!(first.objects.len(), second.objects.len());
}

#[tokio::test]
async fn test_sanitize_pass_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 1);
    let source = PdfReader::new().load(&input).await.unwrap();

    let enabled = Operations::new(force_config());
    let written = dir.path().join("written.pdf");
    let outcome = enabled
        .pipeline()
        .finalize(source.document().clone(), &written)
        .await
        .unwrap();
    assert_eq!(outcome, SanitizeOutcome::Sanitized);
    assert!(inspect(&written).await.unwrap().is_clean());

    let disabled = Operations::new(Config {
        sanitize: false,
        ..force_config()
    });
    let raw = dir.path().join("raw.pdf");
    let outcome = disabled
        .pipeline()
        .finalize(source.document().clone(), &raw)
        .await
        .unwrap();
    assert_eq!(outcome, SanitizeOutcome::Skipped);
    assert!(inspect(&raw).await.unwrap().has_info);
}

#[tokio::test]
async fn test_failed_sanitize_pass_keeps_content_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("garbage.pdf");
    std::fs::write(&output, b"not a pdf at all").unwrap();

    let ops = Operations::new(force_config());
    let outcome = ops.pipeline().sanitize_pass(&output).await;

    assert_eq!(outcome, SanitizeOutcome::Failed);
    assert_eq!(std::fs::read(&output).unwrap(), b"not a pdf at all");
}
