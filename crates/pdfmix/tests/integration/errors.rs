//! Integration tests for error handling and edge cases.

use pdfmix::assemble::InterleaveMode;
use pdfmix::config::{Config, OverwriteMode};
use pdfmix::error::PdfMixError;
use pdfmix::ops::Operations;
use std::path::PathBuf;

use crate::common::{force_config, labels, write_pdf};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.pdf");

    let err = Operations::new(force_config())
        .merge(&[PathBuf::from("/nonexistent/file.pdf")], &output)
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::FileNotFound { .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_error_empty_input_list() {
    let dir = tempfile::tempdir().unwrap();

    let err = Operations::new(force_config())
        .merge(&[], &dir.path().join("out.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::NoInputs));
}

#[tokio::test]
async fn test_error_not_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fake.pdf");
    std::fs::write(&input, b"hello").unwrap();

    let err = Operations::new(force_config())
        .reverse(&input, &dir.path().join("out.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::FailedToLoadPdf { .. }));
}

#[tokio::test]
async fn test_error_directory_as_input() {
    let dir = tempfile::tempdir().unwrap();

    let err = Operations::new(force_config())
        .reverse(dir.path(), &dir.path().join("out.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::NotAFile { .. }));
}

#[tokio::test]
async fn test_error_empty_selection_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 5);
    let output = dir.path().join("out.pdf");
    let ops = Operations::new(force_config());

    for expression in ["", "   ", "99", "abc,x-y", "0"] {
        let err = ops.extract(&input, expression, &output).await.unwrap_err();
        assert!(
            matches!(err, PdfMixError::EmptySelection { .. }),
            "{expression:?} gave {err:?}"
        );
    }

    let err = ops.delete(&input, "", &output).await.unwrap_err();
    assert!(matches!(err, PdfMixError::EmptySelection { .. }));

    let err = ops.rotate(&input, "42", 90, &output).await.unwrap_err();
    assert!(matches!(err, PdfMixError::EmptySelection { .. }));

    assert!(!output.exists());
}

#[tokio::test]
async fn test_error_delete_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 3);

    let err = Operations::new(force_config())
        .delete(&input, "1-3", &dir.path().join("out.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::EmptySelection { .. }));
}

#[tokio::test]
async fn test_error_invalid_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 2);

    let err = Operations::new(force_config())
        .rotate(&input, "1", 45, &dir.path().join("out.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::InvalidRotation { degrees: 45 }));
}

#[tokio::test]
async fn test_error_interleave_start_zero() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", "A", 2);
    let b = write_pdf(dir.path(), "b.pdf", "B", 2);

    let err = Operations::new(force_config())
        .interleave(&a, &b, InterleaveMode::Alternate, 0, &dir.path().join("out.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_error_interleave_nothing_selected() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", "A", 2);
    let b = write_pdf(dir.path(), "b.pdf", "B", 2);

    let err = Operations::new(force_config())
        .interleave(&a, &b, InterleaveMode::BEven, 5, &dir.path().join("out.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::EmptySelection { .. }));
}

#[tokio::test]
async fn test_error_split_zero() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 2);

    let err = Operations::new(force_config())
        .split_every(&input, 0, dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMixError::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_error_output_exists_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 2);
    let output = write_pdf(dir.path(), "existing.pdf", "E", 1);

    for mode in [OverwriteMode::NoClobber, OverwriteMode::Prompt] {
        let ops = Operations::new(Config {
            overwrite_mode: mode,
            ..Config::default()
        });
        let err = ops.reverse(&input, &output).await.unwrap_err();
        assert!(matches!(err, PdfMixError::OutputExists { .. }));
    }

    assert_eq!(labels(&output), ["E1"]);
}

#[tokio::test]
async fn test_error_split_refuses_before_writing_any_part() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "doc.pdf", "P", 4);
    let existing = write_pdf(dir.path(), "doc_part_3-4.pdf", "E", 1);

    let ops = Operations::new(Config {
        overwrite_mode: OverwriteMode::NoClobber,
        ..Config::default()
    });
    let err = ops.split_every(&input, 2, dir.path()).await.unwrap_err();

    assert!(matches!(err, PdfMixError::OutputExists { .. }));
    assert!(!dir.path().join("doc_part_1-2.pdf").exists());
    assert_eq!(labels(&existing), ["E1"]);
}

#[test]
fn test_exit_codes_are_distinct_from_success() {
    let errors = [
        PdfMixError::NoInputs,
        PdfMixError::empty_selection("extract"),
        PdfMixError::InvalidRotation { degrees: 45 },
        PdfMixError::output_exists(PathBuf::from("out.pdf")),
    ];

    for err in errors {
        assert_ne!(err.exit_code(), 0, "{err}");
    }
}
