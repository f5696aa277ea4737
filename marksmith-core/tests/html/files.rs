//! File entrypoints

use marksmith_core::{RenderError, Renderer};
use std::io::Write;

#[tokio::test]
async fn test_render_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "# From disk\r\n\r\ntext").unwrap();

    let html = Renderer::default().render_file(file.path()).await.unwrap();
    assert_eq!(html, "<h1>From disk</h1>\n<p>text</p>\n");
}

#[tokio::test]
async fn test_render_file_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.md");
    let err = Renderer::default().render_file(&path).await.unwrap_err();
    match err {
        RenderError::Io { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_render_file_blocking() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "- [x] done").unwrap();
    let html = Renderer::default().render_file_blocking(file.path()).unwrap();
    assert!(html.contains("task-list-item"));
}

#[test]
fn test_invalid_utf8_is_an_io_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
    let err = Renderer::default()
        .render_file_blocking(file.path())
        .unwrap_err();
    assert!(err.to_string().contains(&file.path().display().to_string()));
}
