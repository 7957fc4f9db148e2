//! End-to-end tests through the public library API and the `squish` binary.
//!
//! Sources are generated in memory with the `image` crate so the suite needs
//! no fixture files.

use image::{ImageFormat, Rgb, RgbImage};
use squish::config::Config;
use squish::imaging::{self, MediaType, Quality, ResizeFilter, RustBackend};
use squish::output::{format_compressed_size, format_file_size};
use squish::session::{Session, SessionEvent, SessionOptions};
use squish::types::SourceImage;
use std::io::{Cursor, Write};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Pseudo-random RGB noise as PNG. Same output for the same size.
fn noise_png(width: u32, height: u32) -> Vec<u8> {
    let mut state: u32 = 0x9e37_79b9;
    let img = RgbImage::from_fn(width, height, |_, _| {
        let mut next = || {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        };
        Rgb([next(), next(), next()])
    });
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

fn one_decimal(text: &str) -> bool {
    let number = text
        .split('(')
        .nth(1)
        .and_then(|rest| rest.split('%').next())
        .unwrap_or("");
    matches!(number.split_once('.'), Some((_, frac)) if frac.len() == 1)
}

#[test]
fn half_quality_png_becomes_smaller_jpeg() {
    let backend = RustBackend::new();
    let source =
        SourceImage::from_bytes(&backend, "holiday.png", noise_png(1000, 1000), u64::MAX).unwrap();

    let image =
        imaging::compress(&backend, &source, Quality::new(0.5), ResizeFilter::Lanczos3).unwrap();

    assert_eq!(image.media_type, MediaType::Jpeg);
    assert_eq!(image.dimensions(), (707, 707));
    assert!(image.size() < source.size());
    assert_eq!(image.file_name(&source), "holiday_compressed.jpg");

    let decoded = image::load_from_memory(&image.data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (707, 707));

    let ratio = image.ratio(&source);
    assert!(ratio > 0.0 && ratio < 100.0);
    assert_eq!((ratio * 10.0).round() / 10.0, ratio);

    let line = format_compressed_size(&image, &source);
    assert!(line.starts_with(&format_file_size(image.size())));
    assert!(line.ends_with("% smaller)"));
    assert!(one_decimal(&line), "ratio not shown to one decimal: {line}");
}

#[test]
fn full_quality_png_is_untouched_in_size_and_type() {
    let backend = RustBackend::new();
    let source =
        SourceImage::from_bytes(&backend, "icon.png", noise_png(64, 48), u64::MAX).unwrap();

    let image = imaging::compress(&backend, &source, Quality::new(1.0), ResizeFilter::default())
        .unwrap();

    assert_eq!(image.media_type, MediaType::Png);
    assert_eq!(image.dimensions(), (64, 48));
    assert_eq!(image.file_name(&source), "icon_compressed.png");
}

#[test]
fn same_source_and_quality_give_identical_bytes() {
    let backend = RustBackend::new();
    let source =
        SourceImage::from_bytes(&backend, "a.png", noise_png(100, 80), u64::MAX).unwrap();
    let q = Quality::new(0.37);

    let first = imaging::compress(&backend, &source, q, ResizeFilter::Lanczos3).unwrap();
    let second = imaging::compress(&backend, &source, q, ResizeFilter::Lanczos3).unwrap();
    assert_eq!(first.data, second.data);
}

#[tokio::test]
async fn session_settles_on_final_quality() {
    let backend = Arc::new(RustBackend::new());
    let source =
        SourceImage::from_bytes(backend.as_ref(), "tune.png", noise_png(200, 200), u64::MAX)
            .unwrap();
    let options = SessionOptions {
        debounce: Duration::from_millis(50),
        ..SessionOptions::from_config(&Config::default())
    };
    let (mut session, mut events) = Session::new(backend, options);

    session.load(source);
    for percent in [90, 70, 40, 25] {
        session.set_quality(Quality::from_percent(percent));
    }
    let last = session.latest_request().unwrap();

    let settled = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            let event = events.recv().await.unwrap();
            if event.request() == last {
                return event;
            }
        }
    })
    .await
    .unwrap();

    let SessionEvent::Updated { image, .. } = settled else {
        panic!("final request did not install");
    };
    assert_eq!(image.quality, Quality::from_percent(25));
    assert_eq!(image.dimensions(), (100, 100));
    assert_eq!(image.media_type, MediaType::Jpeg);
    assert!(Arc::ptr_eq(&session.current().unwrap(), &image));
}

// =========================================================================
// Binary
// =========================================================================

fn squish() -> Command {
    Command::new(env!("CARGO_BIN_EXE_squish"))
}

#[test]
fn cli_compress_writes_file_and_json_report() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("holiday.png");
    std::fs::write(&input, noise_png(120, 80)).unwrap();
    let out_dir = tmp.path().join("out");

    let out = squish()
        .args(["--config-dir"])
        .arg(tmp.path())
        .args(["compress", "-q", "50", "--json", "-o"])
        .arg(&out_dir)
        .arg(&input)
        .output()
        .unwrap();
    assert!(
        out.status.success(),
        "squish failed: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["output"]["name"], "holiday_compressed.jpg");
    assert_eq!(report["output"]["media_type"], "jpeg");
    assert_eq!(report["output"]["width"], 84);
    assert_eq!(report["output"]["height"], 56);
    assert!(out_dir.join("holiday_compressed.jpg").exists());
}

/// Start `squish tune` on `input`, feed it `lines`, let the session go idle,
/// then close stdin and wait for the process to exit.
fn run_tune(tmp: &TempDir, input: &std::path::Path, lines: &str) -> std::process::ExitStatus {
    let mut child = squish()
        .arg("--config-dir")
        .arg(tmp.path())
        .args(["tune", "-o"])
        .arg(tmp.path().join("out"))
        .arg(input)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(lines.as_bytes()).unwrap();
    stdin.flush().unwrap();
    // Long enough for the debounce and the compression to finish before EOF.
    std::thread::sleep(Duration::from_millis(1500));
    drop(stdin);

    let deadline = Instant::now() + Duration::from_secs(20);
    loop {
        if let Some(status) = child.try_wait().unwrap() {
            return status;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("tune did not exit after stdin closed");
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

#[test]
fn cli_tune_exits_and_saves_after_idle_eof() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("a.png");
    std::fs::write(&input, noise_png(40, 40)).unwrap();

    let status = run_tune(&tmp, &input, "50\n");

    assert!(status.success());
    let saved = tmp.path().join("out/a_compressed.jpg");
    let decoded = image::open(&saved).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (28, 28));
}

#[test]
fn cli_tune_without_input_saves_initial_result() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("a.png");
    std::fs::write(&input, noise_png(40, 40)).unwrap();

    let status = run_tune(&tmp, &input, "");

    assert!(status.success());
    // Default quality is 80%, which keeps PNG.
    assert!(tmp.path().join("out/a_compressed.png").exists());
}

#[test]
fn cli_rejects_unsupported_type() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("notes.txt");
    std::fs::write(&input, "hello").unwrap();

    let out = squish()
        .arg("--config-dir")
        .arg(tmp.path())
        .arg("inspect")
        .arg(&input)
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn cli_gen_config_is_loadable() {
    let out = squish().arg("gen-config").output().unwrap();
    assert!(out.status.success());

    let parsed: Config = toml::from_str(&String::from_utf8(out.stdout).unwrap()).unwrap();
    assert_eq!(parsed, Config::default());
}
