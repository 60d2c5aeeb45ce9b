//! Integration tests for unique path reservation.

use forkguard::Error;
use forkguard::paths::{UniquePathAllocator, unique_path, unique_path_in};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Barrier;
use tempfile::TempDir;

#[test]
fn test_sequential_reservations_have_no_gaps() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let dir = temp_dir.path();

    let mut paths = Vec::new();
    for _ in 0..10 {
        let path = unique_path(|i| dir.join(format!("file_{i}.txt"))).expect("reserve path");
        std::fs::write(&path, "test").expect("write payload");
        paths.push(path);
    }

    let expected: Vec<PathBuf> = (0..10).map(|i| dir.join(format!("file_{i}.txt"))).collect();
    assert_eq!(paths, expected);

    let on_disk = std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "txt"))
        .count();
    assert_eq!(on_disk, 10);
}

#[test]
fn test_concurrent_reservations_never_collide() {
    const CALLERS: usize = 16;
    const PER_CALLER: usize = 8;

    let temp_dir = TempDir::new().expect("create temp dir");
    let dir = temp_dir.path();
    let barrier = Barrier::new(CALLERS);

    let results: Vec<PathBuf> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    (0..PER_CALLER)
                        .map(|_| unique_path_in(dir, "worker", ".lock").expect("reserve path"))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|h| h.join().expect("caller thread panicked"))
            .collect()
    });

    let distinct: HashSet<_> = results.iter().collect();
    assert_eq!(results.len(), CALLERS * PER_CALLER);
    assert_eq!(distinct.len(), results.len(), "duplicate path handed out");

    let on_disk = std::fs::read_dir(dir).expect("read dir").count();
    assert_eq!(on_disk, CALLERS * PER_CALLER);
}

#[test]
fn test_missing_directory_fails_immediately() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let allocator = UniquePathAllocator::new(temp_dir.path().join("absent"), "worker", ".lock");

    let result = allocator.allocate();

    assert!(matches!(result, Err(Error::PathReserve { .. })));
    assert!(!temp_dir.path().join("absent").exists());
}
