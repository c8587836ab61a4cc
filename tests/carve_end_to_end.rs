//! End-to-end carving over synthetic dump buffers.

mod common;

use common::{build_dds_header, build_script, build_wave};
use scatha::{CancelToken, Carver, FormatId};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// The canonical mixed buffer: a valid wave at 0, an image with an
/// impossible width mid-buffer, a valid script near the end.
fn mixed_buffer() -> Vec<u8> {
    let mut buf = vec![0u8; 1024 * 1024];

    let wave = build_wave(4096);
    buf[..wave.len()].copy_from_slice(&wave);

    let bad_dds = build_dds_header(20000, 64, 1, b"DXT1");
    buf[600_000..600_000 + bad_dds.len()].copy_from_slice(&bad_dds);

    let script = build_script("QuestTimerScript");
    buf[900_000..900_000 + script.len()].copy_from_slice(&script);
    // keep the region bounded by non-printable bytes
    buf[900_000 + script.len()] = 0xFF;

    buf
}

#[test]
fn mixed_buffer_carves_two_regions_and_rejects_one() {
    let buf = mixed_buffer();
    let report = Carver::default().carve(&buf, &CancelToken::new(), None);

    assert_eq!(report.regions.len(), 2);
    assert_eq!(report.regions[0].offset, 0);
    assert_eq!(report.regions[0].format, FormatId::Wave);
    assert_eq!(report.regions[1].offset, 900_000);
    assert_eq!(report.regions[1].format, FormatId::ScriptSource);

    assert_eq!(report.stats.counters(FormatId::Wave).accepted, 1);
    assert_eq!(report.stats.counters(FormatId::ScriptSource).accepted, 1);
    assert_eq!(report.stats.counters(FormatId::Dds).rejected, 1);
    assert_eq!(report.stats.total_accepted(), 2);
    assert_eq!(report.stats.total_rejected(), 1);
}

#[test]
fn carving_the_same_buffer_twice_is_identical() {
    let buf = mixed_buffer();
    let carver = Carver::default();
    let a = carver.carve(&buf, &CancelToken::new(), None);
    let b = carver.carve(&buf, &CancelToken::new(), None);
    assert_eq!(a.regions, b.regions);
    assert_eq!(a.stats.per_format, b.stats.per_format);
    assert_eq!(a.stats.candidates, b.stats.candidates);
}

#[test]
fn progress_is_monotonic_and_not_per_candidate() {
    // Many candidates: a field of waves.
    let mut buf = Vec::new();
    for _ in 0..600 {
        buf.extend_from_slice(&build_wave(16));
        buf.extend_from_slice(&[0u8; 8]);
    }

    let fractions: Mutex<Vec<f32>> = Mutex::new(Vec::new());
    let calls = AtomicUsize::new(0);
    let cb = |f: f32, _phase: Option<&str>| {
        calls.fetch_add(1, Ordering::Relaxed);
        fractions.lock().unwrap().push(f);
    };

    let report = Carver::default().carve(&buf, &CancelToken::new(), Some(&cb));
    assert_eq!(report.stats.counters(FormatId::Wave).accepted, 600);

    let fractions = fractions.into_inner().unwrap();
    assert!(fractions.windows(2).all(|w| w[0] <= w[1]), "fractions regressed");
    assert_eq!(*fractions.last().unwrap(), 1.0);
    // throttled: far fewer callbacks than candidates
    assert!(calls.load(Ordering::Relaxed) < 600);
}

#[test]
fn report_serializes_for_the_pipeline() -> anyhow::Result<()> {
    let buf = mixed_buffer();
    let report = Carver::default().carve(&buf, &CancelToken::new(), None);
    let json = report.to_json_string()?;
    assert!(json.contains("\"schema_version\""));
    assert!(json.contains("QuestTimerScript"));

    let back: scatha::CarveReport = serde_json::from_str(&json)?;
    assert_eq!(back.regions, report.regions);
    Ok(())
}

#[test]
fn empty_buffer_completes_with_zero_results() {
    let report = Carver::default().carve(&[], &CancelToken::new(), None);
    assert!(report.regions.is_empty());
    assert_eq!(report.stats.candidates, 0);
    assert!(!report.stats.cancelled);
}
