//! Integration tests for per-file routing programs

use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use upload_router::{
    BoxError, CancellationToken, FileSpec, MemoryDirectory, Peer, PeerKind, RouteProgram,
    RoutingEnv, UploadError, UploadIter, UploadOptions,
};

fn directory() -> MemoryDirectory {
    MemoryDirectory::new(Peer::new(1, PeerKind::User).username("me"))
        .with_peer(Peer::new(2, PeerKind::User).username("alice"))
        .with_peer(Peer::new(-300, PeerKind::Group).username("group"))
}

fn program<F>(f: F) -> Option<Box<dyn RouteProgram + Send>>
where
    F: Fn(&RoutingEnv) -> Result<Value, BoxError> + Send + 'static,
{
    Some(Box::new(f))
}

fn one_file() -> (tempfile::TempDir, Vec<FileSpec>) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, b"not really a video").unwrap();
    (dir, vec![FileSpec::new(path)])
}

#[test]
fn test_plain_string_routes_without_thread() {
    let _ = env_logger::try_init();

    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(
        files,
        UploadOptions::new(),
        program(|_| Ok(json!("@alice"))),
        &directory,
    );
    assert!(!iter.is_static());

    assert!(iter.advance(&CancellationToken::new()));
    let element = iter.current().unwrap();
    assert!(element.peer().has_username("alice"));
    assert_eq!(element.thread(), 0);
}

#[test]
fn test_map_routes_with_thread() {
    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(
        files,
        UploadOptions::new(),
        program(|_| Ok(json!({"peer": "@group", "thread": 42}))),
        &directory,
    );

    let element = iter.next().unwrap();
    assert!(element.peer().has_username("group"));
    assert_eq!(element.thread(), 42);
}

#[test]
fn test_numeric_string_thread_is_coerced() {
    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(
        files,
        UploadOptions::new(),
        program(|_| Ok(json!({"Peer": "-300", "Thread": "7"}))),
        &directory,
    );

    let element = iter.next().unwrap();
    assert_eq!(element.peer().id, -300);
    assert_eq!(element.thread(), 7);
}

#[test]
fn test_empty_string_routes_to_self() {
    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(files, UploadOptions::new(), program(|_| Ok(json!(""))), &directory);

    let element = iter.next().unwrap();
    assert!(element.peer().has_username("me"));
}

#[test]
fn test_unexpected_result_type_fails() {
    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(files, UploadOptions::new(), program(|_| Ok(json!(12))), &directory);

    assert!(!iter.advance(&CancellationToken::new()));
    let err = iter.error().unwrap();
    assert!(matches!(err, UploadError::RoutingResultType { type_name: "number" }));
    assert!(err.to_string().contains("number"));
}

#[test]
fn test_undecodable_map_reports_raw_result() {
    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(
        files,
        UploadOptions::new(),
        program(|_| Ok(json!({"peer": "@group", "thread": "later"}))),
        &directory,
    );

    assert!(iter.next().is_none());
    match iter.error() {
        Some(UploadError::DestinationDecode { raw, .. }) => {
            assert_eq!(raw, &json!({"peer": "@group", "thread": "later"}))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_routed_peer_resolution_failure_is_fatal() {
    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(
        files,
        UploadOptions::new(),
        program(|_| Ok(json!({"peer": "@stranger", "thread": 1}))),
        &directory,
    );

    assert!(iter.next().is_none());
    assert!(matches!(
        iter.error(),
        Some(UploadError::PeerResolution { .. })
    ));
}

#[test]
fn test_evaluation_error_is_fatal() {
    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(
        files,
        UploadOptions::new(),
        program(|_| Err("undefined variable: chat".into())),
        &directory,
    );

    assert!(iter.next().is_none());
    let err = iter.error().unwrap();
    assert!(matches!(err, UploadError::RoutingEvaluation { .. }));
    assert_eq!(err.to_string(), "message routing: undefined variable: chat");
}

#[test]
fn test_program_sees_each_file_once_in_order() {
    let dir = tempdir().unwrap();
    let mut files = Vec::new();
    for name in ["a.jpg", "b.mp4", "c.txt"] {
        let path = dir.path().join(name);
        std::fs::write(&path, name).unwrap();
        files.push(FileSpec::new(path));
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = Arc::clone(&seen);
    let route = program(move |env: &RoutingEnv| {
        let name = env
            .file
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        recorder.lock().unwrap().push(name.clone());

        if name.ends_with(".mp4") {
            Ok(json!({"peer": "@group", "thread": 5}))
        } else {
            Ok(json!("@alice"))
        }
    });

    let directory = directory();
    let elements: Vec<_> = UploadIter::new(files, UploadOptions::new(), route, &directory).collect();

    let routed: Vec<_> = elements
        .iter()
        .map(|e| (e.peer().id, e.thread()))
        .collect();
    assert_eq!(routed, vec![(2, 0), (-300, 5), (2, 0)]);
    assert_eq!(*seen.lock().unwrap(), vec!["a.jpg", "b.mp4", "c.txt"]);
}

#[test]
fn test_static_chat_overrides_program() {
    let (_dir, files) = one_file();
    let directory = directory();
    let mut iter = UploadIter::new(
        files,
        UploadOptions::new().chat("@alice").thread(3),
        program(|_| Err("must not run".into())),
        &directory,
    );
    assert!(iter.is_static());

    let element = iter.next().unwrap();
    assert_eq!(element.peer().id, 2);
    assert_eq!(element.thread(), 3);
}
