//! End-to-end compression of files through the production contexts
//!
//! Every artifact is decoded with the reference zstd decoder and compared
//! against the original bytes.

mod common;

use common::{
    UNICODE_TEXT, assert_success, compressible_text, decode_file, join_within, noisy_bytes,
    tokio_pipeline, write_source,
};
use std::time::Duration;
use zstd_pipeline::{
    CompressionLevel, CompressionOutcome, CompressionRequest, Error, FailureKind, FileSource,
    FileTarget, TaskState, default_target_path,
};

const TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unicode_text_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "unicode.txt", UNICODE_TEXT);
    let target = default_target_path(&source, "zst").unwrap();
    let pipeline = tokio_pipeline();

    let handle = pipeline.submit(CompressionRequest::for_files(
        &source,
        &target,
        CompressionLevel::new(3).unwrap(),
    ));
    let outcome = join_within(&handle, TIMEOUT).await;

    let (original, compressed) = assert_success(&outcome);
    assert_eq!(original, UNICODE_TEXT.len() as u64);
    assert_eq!(compressed, std::fs::metadata(&target).unwrap().len());
    assert_eq!(decode_file(&target), UNICODE_TEXT.as_bytes());
    assert_eq!(handle.state(), TaskState::Succeeded);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn empty_file_produces_valid_frame() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "empty.txt", "");
    let target = dir.path().join("empty.txt.zst");
    let pipeline = tokio_pipeline();

    let handle = pipeline.submit(CompressionRequest::for_files(
        &source,
        &target,
        CompressionLevel::default(),
    ));
    let outcome = join_within(&handle, TIMEOUT).await;

    let (original, compressed) = assert_success(&outcome);
    assert_eq!(original, 0);
    assert!(compressed > 0);
    assert!(decode_file(&target).is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn repetitive_text_shrinks_at_every_level() {
    let dir = tempfile::tempdir().unwrap();
    let text = compressible_text();
    let source = write_source(dir.path(), "large.txt", &text);
    let pipeline = tokio_pipeline();

    for raw in [CompressionLevel::MIN, 3, 9, 19, CompressionLevel::MAX] {
        let target = dir.path().join(format!("large-{raw}.txt.zst"));
        let handle = pipeline.submit(CompressionRequest::for_files(
            &source,
            &target,
            CompressionLevel::new(raw).unwrap(),
        ));
        let outcome = join_within(&handle, TIMEOUT).await;

        let (original, compressed) = assert_success(&outcome);
        assert!(compressed < original, "level {raw}: {compressed} >= {original}");
        assert_eq!(decode_file(&target), text.as_bytes(), "level {raw}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn incompressible_input_still_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let bytes = noisy_bytes(64 * 1024);
    let source = write_source(dir.path(), "noise.bin", &bytes);
    let target = dir.path().join("noise.bin.zst");
    let pipeline = tokio_pipeline();

    let handle = pipeline.submit(CompressionRequest::for_files(
        &source,
        &target,
        CompressionLevel::new(19).unwrap(),
    ));
    let outcome = join_within(&handle, TIMEOUT).await;

    assert_success(&outcome);
    assert_eq!(decode_file(&target), bytes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_source_fails_without_creating_target() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("missing.txt.zst");
    let pipeline = tokio_pipeline();

    let handle = pipeline.submit(CompressionRequest::for_files(
        dir.path().join("missing.txt"),
        &target,
        CompressionLevel::default(),
    ));
    let outcome = join_within(&handle, TIMEOUT).await;

    assert!(matches!(
        outcome,
        CompressionOutcome::Failure {
            kind: FailureKind::ReadError,
            ..
        }
    ));
    assert!(!target.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_utf8_source_is_rejected_when_text_is_required() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "binary.txt", b"\xff\xfe\x00\x81");
    let target = dir.path().join("binary.txt.zst");
    let pipeline = tokio_pipeline();

    let request = CompressionRequest::new(
        FileSource::new(&source).require_utf8(true),
        FileTarget::new(&target),
        CompressionLevel::default(),
    );
    let outcome = join_within(&pipeline.submit(request), TIMEOUT).await;

    assert!(matches!(
        outcome,
        CompressionOutcome::Failure {
            kind: FailureKind::ReadError,
            ..
        }
    ));
    assert!(!target.exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn existing_target_requires_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "notes.txt", "fresh contents");
    let target = write_source(dir.path(), "notes.txt.zst", "stale artifact");
    let pipeline = tokio_pipeline();

    let request =
        CompressionRequest::for_files(&source, &target, CompressionLevel::default());
    let err = request.ensure_target_writable().unwrap_err();
    assert!(matches!(err, Error::TargetExists { .. }));
    assert_eq!(std::fs::read(&target).unwrap(), b"stale artifact");

    let request = request.with_overwrite_confirmed(true);
    request.ensure_target_writable().unwrap();
    let outcome = join_within(&pipeline.submit(request), TIMEOUT).await;

    assert_success(&outcome);
    assert_eq!(decode_file(&target), b"fresh contents");
}
