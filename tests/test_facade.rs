//! ConversionFacade 的請求驗證與單一工作限制

use std::io;
use std::path::Path;
use std::sync::Arc;

use image_converter::config::config::ImageFormat;
use image_converter::error::ValidationError;
use image_converter::facade::conversion_facade::ConversionFacade;
use image_converter::facade::traits::i_conversion::ConversionFacadeTrait;
use image_converter::models::conversion::{ConversionInput, JobEvent};
use image_converter::service::file::FileService;
use image_converter::service::job_runner::JobRunner;
use tempfile::TempDir;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn facade(runner: JobRunner) -> ConversionFacade {
    ConversionFacade::new(Box::new(FileService::new()), runner)
}

fn input(folder: &Path, from: ImageFormat, to: ImageFormat, replace: bool) -> ConversionInput {
    ConversionInput {
        folder: folder.to_path_buf(),
        source_format: from,
        target_format: to,
        replace_originals: replace,
    }
}

fn validation_error(err: io::Error) -> ValidationError {
    *err.into_inner()
        .expect("validation errors carry a typed source")
        .downcast::<ValidationError>()
        .expect("inner error is a ValidationError")
}

#[test]
fn test_same_format_is_rejected_before_touching_files() {
    let dir = TempDir::new().unwrap();
    write_rgb_png(dir.path(), "a.png");

    let result = facade(raster_only_runner()).start_conversion(input(dir.path(), ImageFormat::Png, ImageFormat::Png, true));
    let err = result.err().expect("same format must be rejected");

    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    assert!(matches!(validation_error(err), ValidationError::SameFormat(ImageFormat::Png)));
    assert!(dir.path().join("a.png").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_invalid_folder_is_rejected() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");

    let err = facade(raster_only_runner())
        .start_conversion(input(&missing, ImageFormat::Png, ImageFormat::Jpg, false))
        .err()
        .unwrap();

    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    assert!(matches!(validation_error(err), ValidationError::InvalidFolder(_)));
}

#[test]
fn test_empty_candidate_list_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_rgb_png(dir.path(), "a.png");

    let err = facade(raster_only_runner())
        .start_conversion(input(dir.path(), ImageFormat::Bmp, ImageFormat::Png, false))
        .err()
        .unwrap();

    assert!(matches!(validation_error(err), ValidationError::NoCandidates { format: ImageFormat::Bmp, .. }));
}

#[test]
fn test_heic_request_without_backend_is_rejected_up_front() {
    let dir = TempDir::new().unwrap();
    write_rgb_png(dir.path(), "a.png");

    let err = facade(raster_only_runner())
        .start_conversion(input(dir.path(), ImageFormat::Png, ImageFormat::Heic, false))
        .err()
        .unwrap();

    assert!(matches!(validation_error(err), ValidationError::BackendUnavailable));
    assert!(!dir.path().join("a.HEIC").exists());
}

#[test]
fn test_prepare_request_lists_sorted_case_insensitive_candidates() {
    let dir = TempDir::new().unwrap();
    write_rgb_png(dir.path(), "b.PNG");
    write_rgb_png(dir.path(), "a.png");
    std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let request = facade(raster_only_runner())
        .prepare_request(input(dir.path(), ImageFormat::Png, ImageFormat::Jpg, true))
        .unwrap();

    assert_eq!(request.candidate_files, vec!["a.png", "b.PNG"]);
    assert!(request.replace_originals);
}

#[test]
fn test_hand_built_request_with_wrong_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_rgb_png(dir.path(), "a.png");

    let req = request(dir.path(), ImageFormat::Bmp, ImageFormat::Jpg, false, &["a.png"]);
    let err = facade(raster_only_runner()).start_job(req).err().unwrap();
    assert!(matches!(validation_error(err), ValidationError::ExtensionMismatch { .. }));
}

#[test]
fn test_hand_built_request_with_missing_file_is_rejected() {
    let dir = TempDir::new().unwrap();

    let req = request(dir.path(), ImageFormat::Png, ImageFormat::Jpg, false, &["ghost.png"]);
    let err = facade(raster_only_runner()).start_job(req).err().unwrap();
    assert!(matches!(validation_error(err), ValidationError::MissingFile(name) if name == "ghost.png"));
}

#[test]
fn test_end_to_end_png_to_jpg() {
    let dir = TempDir::new().unwrap();
    write_rgb_png(dir.path(), "a.png");
    write_rgb_png(dir.path(), "b.png");

    let handle = facade(raster_only_runner())
        .start_conversion(input(dir.path(), ImageFormat::Png, ImageFormat::Jpg, false))
        .unwrap();
    let outcome = handle.wait().unwrap();

    assert!(outcome.errors.is_empty());
    assert!(dir.path().join("a.JPG").exists());
    assert!(dir.path().join("b.JPG").exists());
    assert!(dir.path().join("a.png").exists());
    assert!(dir.path().join("b.png").exists());
}

#[test]
fn test_second_job_is_rejected_while_first_runs() {
    let dir = TempDir::new().unwrap();
    write_rgb_png(dir.path(), "a.png");

    let (raster, release, _entered) = GatedRaster::new();
    let facade = facade(JobRunner::new(Arc::new(raster), None));

    let first = facade
        .start_conversion(input(dir.path(), ImageFormat::Png, ImageFormat::Bmp, false))
        .unwrap();

    let err = facade
        .start_conversion(input(dir.path(), ImageFormat::Png, ImageFormat::Jpg, false))
        .err()
        .expect("a second job must not start while the first is running");
    assert!(matches!(validation_error(err), ValidationError::JobInFlight));

    release.send(()).unwrap();
    let outcome = first.wait().unwrap();
    assert!(outcome.is_success());

    // 第一個工作結束後可以再次啟動
    release.send(()).unwrap();
    let second = facade
        .start_conversion(input(dir.path(), ImageFormat::Png, ImageFormat::Jpg, false))
        .unwrap();
    assert!(second.wait().unwrap().is_success());
}

#[test]
fn test_cancel_stops_between_files() {
    let dir = TempDir::new().unwrap();
    write_rgb_png(dir.path(), "a.png");
    write_rgb_png(dir.path(), "b.png");
    write_rgb_png(dir.path(), "c.png");

    let (raster, release, entered) = GatedRaster::new();
    let facade = facade(JobRunner::new(Arc::new(raster), None));

    let handle = facade
        .start_conversion(input(dir.path(), ImageFormat::Png, ImageFormat::Bmp, false))
        .unwrap();

    // 第一個檔案仍在解碼時要求取消
    entered.recv().unwrap();
    handle.cancel();
    release.send(()).unwrap();

    let events: Vec<JobEvent> = handle.events().collect();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], JobEvent::Progress(p) if p.index == 1 && p.filename == "a.png"));
    match &events[1] {
        JobEvent::Finished(outcome) => {
            assert!(outcome.cancelled);
            assert_eq!(outcome.processed_count, 1);
        }
        JobEvent::Progress(_) => panic!("expected terminal event"),
    }
    assert!(dir.path().join("a.BMP").exists());
    assert!(!dir.path().join("b.BMP").exists());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_name_does_not_reject_the_batch() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    if std::fs::write(dir.path().join(OsStr::from_bytes(b"caf\xe9.png")), b"x").is_err() {
        return;
    }
    write_rgb_png(dir.path(), "ok.png");

    let handle = facade(raster_only_runner())
        .start_conversion(input(dir.path(), ImageFormat::Png, ImageFormat::Jpg, false))
        .unwrap();
    let outcome = handle.wait().unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.processed_count, 1);
    assert!(dir.path().join("ok.JPG").exists());
}
