use transcriber_engine::write_result_atomic;

#[test]
fn result_file_is_written_with_content() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("a.md");

    let written = write_result_atomic(&target, "# a.mp3\n\nC G Am F\n").expect("write ok");
    assert_eq!(written, target);
    assert_eq!(
        std::fs::read_to_string(&target).expect("read back"),
        "# a.mp3\n\nC G Am F\n"
    );
}

#[test]
fn existing_file_is_replaced() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("a.md");
    std::fs::write(&target, "old run").expect("seed file");

    write_result_atomic(&target, "new run").expect("write ok");
    assert_eq!(
        std::fs::read_to_string(&target).expect("read back"),
        "new run"
    );
}

#[test]
fn missing_parent_directories_are_created() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("results").join("a.md");

    write_result_atomic(&target, "nested").expect("write ok");
    assert_eq!(
        std::fs::read_to_string(&target).expect("read back"),
        "nested"
    );
}
