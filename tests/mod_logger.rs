use tempfile::tempdir;

#[test]
fn logger_initializes_into_a_directory() {
    let dir = tempdir().unwrap();
    foliodb::logger::init(Some(dir.path()), Some("debug")).unwrap();
    log::info!("logger smoke test");
    assert!(dir.path().join("foliodb.log").exists());
    // a second init is tolerated and leaves the first configuration in place
    foliodb::logger::init(Some(dir.path()), None).unwrap();
}
