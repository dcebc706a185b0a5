use std::fs;
use synced_fs::{NormalizedPath, io};
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.txt"));

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_write_atomic_to_nonexistent_parent_creates_directories() {
    let dir = TempDir::new().unwrap();
    let path = NormalizedPath::new(dir.path().join("a").join("b").join("file.txt"));

    io::write_atomic(&path, b"deep content").unwrap();

    assert_eq!(io::read_text(&path).unwrap(), "deep content");
}

#[test]
fn test_write_atomic_cleans_up_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = NormalizedPath::new(dir.path().join("target.txt"));

    io::write_atomic(&path, b"content").unwrap();

    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "found temp files: {:?}", leftovers);
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/file.txt");
    assert!(io::read_text(&path).is_err());
}

#[test]
fn test_copy_file_creates_parents() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source.bin");
    fs::write(&source, [0u8, 159, 146, 150]).unwrap();

    let target = temp.path().join("deep").join("nested").join("copy.bin");
    io::copy_file(&source, &target).unwrap();

    assert_eq!(fs::read(&target).unwrap(), vec![0u8, 159, 146, 150]);
}

#[test]
fn test_copy_dir_all_merges_into_existing_target() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    let target = temp.path().join("dst");
    fs::create_dir_all(source.join("nested")).unwrap();
    fs::write(source.join("a.md"), "new a").unwrap();
    fs::write(source.join("nested").join("b.md"), "b").unwrap();
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("a.md"), "old a").unwrap();
    fs::write(target.join("local-only.md"), "keep").unwrap();

    io::copy_dir_all(&source, &target).unwrap();

    assert_eq!(fs::read_to_string(target.join("a.md")).unwrap(), "new a");
    assert_eq!(fs::read_to_string(target.join("nested/b.md")).unwrap(), "b");
    assert_eq!(fs::read_to_string(target.join("local-only.md")).unwrap(), "keep");
}

#[test]
fn test_remove_path_handles_files_dirs_and_missing() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("f.txt");
    let dir = temp.path().join("d");
    fs::write(&file, "x").unwrap();
    fs::create_dir_all(dir.join("inner")).unwrap();

    io::remove_path(&file).unwrap();
    io::remove_path(&dir).unwrap();
    io::remove_path(&temp.path().join("missing")).unwrap();

    assert!(!file.exists());
    assert!(!dir.exists());
}
