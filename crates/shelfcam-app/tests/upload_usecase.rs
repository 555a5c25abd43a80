mod support;

use shelfcam_app::{App, CaptureSession, CatalogEntry, UploadFailureKind};
use shelfcam_core::config::Settings;
use support::{FakeStore, QueueRunner, tiny_png};

fn entry(label: &str, model: &str, row_number: u32) -> CatalogEntry {
    CatalogEntry {
        label: label.to_string(),
        model: model.to_string(),
        row_number,
    }
}

#[test]
fn upload_all_writes_under_spreadsheet_folder_and_clears_on_success() {
    let store = FakeStore::new();
    let runner = QueueRunner::default();
    let app = App::new(&store, &runner, Settings::default());

    let mut session = CaptureSession::new();
    session.add_image("X (Color: Red)", tiny_png(), 5, "X");
    session.add_image("X (Color: Red)", tiny_png(), 5, "X");
    session.add_image("Y Z", tiny_png(), 9, "Y Z");

    let report = app.upload_all(&mut session, "/Stock/Models.xlsx");

    assert_eq!(report.root, "/Stock/Models");
    assert!(report.all_succeeded());
    assert_eq!(report.summary(), "3 uploaded, 0 failed");
    assert_eq!(
        store.uploaded_paths(),
        vec![
            "/Stock/Models/5/X_1.jpg".to_string(),
            "/Stock/Models/5/X_2.jpg".to_string(),
            "/Stock/Models/9/Y_Z_1.jpg".to_string(),
        ]
    );
    assert!(!session.has_any_images());
}

#[test]
fn upload_all_keeps_only_failed_images_and_continues_after_failure() {
    let store = FakeStore::new().failing_upload("/Models/5/X_2.jpg");
    let runner = QueueRunner::default();
    let app = App::new(&store, &runner, Settings::default());

    let mut session = CaptureSession::new();
    for _ in 0..3 {
        session.add_image("X", tiny_png(), 5, "X");
    }

    let report = app.upload_all(&mut session, "/Models.xlsx");

    assert_eq!(report.succeeded_count(), 2);
    assert_eq!(report.failed_count(), 1);
    let failed = report
        .outcomes
        .iter()
        .find(|outcome| !outcome.succeeded())
        .expect("failed outcome");
    assert_eq!(failed.filename, "X_2.jpg");
    let failure = failed.failure.as_ref().expect("failure");
    assert_eq!(failure.kind, UploadFailureKind::Api);
    assert!(failure.message.contains("insufficient_space"));

    assert_eq!(
        store.uploaded_paths(),
        vec!["/Models/5/X_1.jpg".to_string(), "/Models/5/X_3.jpg".to_string()]
    );
    let remaining = session
        .images("X")
        .iter()
        .map(|image| image.filename.clone())
        .collect::<Vec<_>>();
    assert_eq!(remaining, vec!["X_2.jpg".to_string()]);
}

#[test]
fn upload_all_reports_missing_image_data() {
    let store = FakeStore::new();
    let runner = QueueRunner::default();
    let app = App::new(&store, &runner, Settings::default());

    let mut session = CaptureSession::new();
    session.add_image("X", Vec::new(), 2, "X");

    let report = app.upload_all(&mut session, "/Models.xlsx");

    let failure = report.outcomes[0].failure.as_ref().expect("failure");
    assert_eq!(failure.kind, UploadFailureKind::MissingSource);
    assert!(store.uploaded_paths().is_empty());
    assert_eq!(session.image_count(), 1);
}

#[test]
fn upload_all_with_empty_session_is_a_successful_no_op() {
    let store = FakeStore::new();
    let runner = QueueRunner::default();
    let app = App::new(&store, &runner, Settings::default());
    let mut session = CaptureSession::new();

    let report = app.upload_all(&mut session, "/Models.xlsx");

    assert!(report.outcomes.is_empty());
    assert!(report.all_succeeded());
    assert!(store.uploaded_paths().is_empty());
}

#[test]
fn capture_queues_camera_output_under_entry_label() {
    let store = FakeStore::new();
    let runner = QueueRunner::new(vec![(0, Some(tiny_png())), (0, Some(tiny_png()))]);
    let app = App::new(&store, &runner, Settings::default());
    let product = entry("A-1 (Color: Red)", "A-1", 7);

    let mut session = CaptureSession::new();
    let first = app.capture(&mut session, &product).expect("first capture");
    let second = app.capture(&mut session, &product).expect("second capture");

    assert_eq!(first, "A-1_1.jpg");
    assert_eq!(second, "A-1_2.jpg");
    assert_eq!(session.images("A-1 (Color: Red)").len(), 2);
    assert_eq!(session.images("A-1 (Color: Red)")[0].row_number, 7);

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].program, "fswebcam");
    assert!(calls[0].args.last().expect("output arg").ends_with("capture.jpg"));
}

#[test]
fn capture_failure_leaves_session_unchanged() {
    let store = FakeStore::new();
    let runner = QueueRunner::new(vec![(1, None)]);
    let app = App::new(&store, &runner, Settings::default());

    let mut session = CaptureSession::new();
    let error = app
        .capture(&mut session, &entry("A", "A", 2))
        .expect_err("capture should fail");

    assert!(format!("{error:#}").contains("failed to capture an image for A"));
    assert!(!session.has_any_images());
}

#[test]
fn import_reads_local_file_and_rejects_missing_one() {
    let temp = tempfile::tempdir().expect("temp dir");
    let image_path = temp.path().join("photo.png");
    std::fs::write(&image_path, tiny_png()).expect("write image");

    let store = FakeStore::new();
    let runner = QueueRunner::default();
    let app = App::new(&store, &runner, Settings::default());
    let product = entry("B", "B", 3);

    let mut session = CaptureSession::new();
    let filename = app
        .import(&mut session, &product, &image_path)
        .expect("import");
    assert_eq!(filename, "B_1.jpg");

    let error = app
        .import(&mut session, &product, &temp.path().join("missing.png"))
        .expect_err("missing file");
    assert!(format!("{error:#}").contains("local file not found"));
    assert_eq!(session.image_count(), 1);
}
