//! Integration tests for page operations.

use pdfmix::assemble::InterleaveMode;
use pdfmix::ops::Operations;
use rstest::rstest;

use crate::common::{
    Orientation, expected, force_config, labels, rotations, write_pdf, write_pdf_with,
};

#[tokio::test]
async fn test_merge_keeps_file_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", "A", 2);
    let b = write_pdf(dir.path(), "b.pdf", "B", 3);
    let output = dir.path().join("merged.pdf");

    let summary = Operations::new(force_config())
        .merge(&[b, a], &output)
        .await
        .unwrap();

    assert_eq!(summary.pages_written, 5);
    assert_eq!(summary.outputs, vec![output.clone()]);
    assert_eq!(labels(&output), ["B1", "B2", "B3", "A1", "A2"]);
}

#[rstest]
#[case(InterleaveMode::Alternate, 1, &["A1", "B1", "A2", "B2", "A3"])]
#[case(InterleaveMode::Alternate, 2, &["A2", "B2", "A3"])]
#[case(InterleaveMode::AOddBEven, 1, &["A1", "B2", "A3"])]
#[case(InterleaveMode::AEvenBOdd, 1, &["B1", "A2"])]
#[case(InterleaveMode::AOdd, 1, &["A1", "A3"])]
#[case(InterleaveMode::BEven, 1, &["B2"])]
#[tokio::test]
async fn test_interleave_modes(
    #[case] mode: InterleaveMode,
    #[case] start_from: usize,
    #[case] order: &[&str],
) {
    let dir = tempfile::tempdir().unwrap();
    let a = write_pdf(dir.path(), "a.pdf", "A", 3);
    let b = write_pdf(dir.path(), "b.pdf", "B", 2);
    let output = dir.path().join("woven.pdf");

    Operations::new(force_config())
        .interleave(&a, &b, mode, start_from, &output)
        .await
        .unwrap();

    assert_eq!(labels(&output), order);
}

#[tokio::test]
async fn test_extract_follows_selection_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 10);
    let output = dir.path().join("out.pdf");

    Operations::new(force_config())
        .extract(&input, "5-3, 10, 3, 99", &output)
        .await
        .unwrap();

    assert_eq!(labels(&output), expected("P", &[5, 4, 3, 10]));
}

#[tokio::test]
async fn test_delete_keeps_complement_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 6);
    let output = dir.path().join("out.pdf");

    let summary = Operations::new(force_config())
        .delete(&input, "5,2-3", &output)
        .await
        .unwrap();

    assert_eq!(summary.pages_written, 3);
    assert_eq!(labels(&output), expected("P", &[1, 4, 6]));
}

#[tokio::test]
async fn test_rotate_selected_pages_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 4);
    let output = dir.path().join("out.pdf");

    Operations::new(force_config())
        .rotate(&input, "2,4", -90, &output)
        .await
        .unwrap();

    assert_eq!(labels(&output), expected("P", &[1, 2, 3, 4]));
    assert_eq!(rotations(&output), vec![0, 270, 0, 270]);
}

#[tokio::test]
async fn test_rotate_empty_range_means_all_pages() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 3);
    let once = dir.path().join("once.pdf");
    let twice = dir.path().join("twice.pdf");
    let ops = Operations::new(force_config());

    ops.rotate(&input, "  ", 180, &once).await.unwrap();
    assert_eq!(rotations(&once), vec![180, 180, 180]);

    ops.rotate(&once, "", 270, &twice).await.unwrap();
    assert_eq!(rotations(&twice), vec![90, 90, 90]);
}

#[tokio::test]
async fn test_reverse() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "in.pdf", "P", 4);
    let output = dir.path().join("out.pdf");

    Operations::new(force_config())
        .reverse(&input, &output)
        .await
        .unwrap();

    assert_eq!(labels(&output), expected("P", &[4, 3, 2, 1]));
}

#[tokio::test]
async fn test_split_every_names_and_sizes_parts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_pdf(dir.path(), "book.pdf", "P", 25);
    let out_dir = dir.path().join("parts");
    std::fs::create_dir(&out_dir).unwrap();

    let summary = Operations::new(force_config())
        .split_every(&input, 10, &out_dir)
        .await
        .unwrap();

    let names: Vec<String> = summary
        .outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        [
            "book_part_1-10.pdf",
            "book_part_11-20.pdf",
            "book_part_21-25.pdf"
        ]
    );
    assert_eq!(summary.pages_written, 25);

    let sizes: Vec<usize> = summary.outputs.iter().map(|p| labels(p).len()).collect();
    assert_eq!(sizes, vec![10, 10, 5]);

    let all: Vec<String> = summary.outputs.iter().flat_map(|p| labels(p)).collect();
    assert_eq!(all, expected("P", &(1..=25).collect::<Vec<_>>()));
}

#[tokio::test]
async fn test_landscape_rotates_portrait_pages_only() {
    let dir = tempfile::tempdir().unwrap();
    let portrait = write_pdf(dir.path(), "portrait.pdf", "P", 2);
    let wide = write_pdf_with(dir.path(), "wide.pdf", "W", 1, Orientation::Landscape);
    let merged = dir.path().join("merged.pdf");
    let output = dir.path().join("landscape.pdf");
    let ops = Operations::new(force_config());

    ops.merge(&[portrait, wide], &merged).await.unwrap();
    ops.landscape_file(&merged, &output).await.unwrap();

    assert_eq!(labels(&output), ["P1", "P2", "W1"]);
    assert_eq!(rotations(&output), vec![90, 90, 0]);
}
