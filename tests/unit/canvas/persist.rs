use super::*;
use crate::dynamics::state::SessionSnapshot;

fn size() -> CanvasSize {
    CanvasSize::default()
}

fn populated() -> Canvas {
    let mut c = Canvas::new(size(), 20, "gestural");
    for i in 0..60 {
        assert!(c.draw_pixel(i * 3, 10 + i, Rgb8::new(i as u8, 40, 200)));
    }
    let snap = SessionSnapshot {
        attention: Attention {
            curiosity: 0.42,
            engagement: 0.61,
            fatigue: 0.13,
        },
        arc_phase: ArcPhase::Developing,
        coherence_history: vec![0.5, 0.55, 0.6],
        coherence_velocity: 0.012,
        intentionality_momentum: 0.47,
        eisv: Eisv {
            e: 0.7,
            i: 0.4,
            s: 0.05,
            v: 0.3,
        },
    };
    c.mirror_session(61, snap);
    c.record_save(1_000.0);
    c.set_pending_era_switch(Some("pointillist".to_string()));
    c
}

#[test]
fn save_then_load_restores_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("canvas.json");
    let mut c = populated();
    c.save_to_disk(&path).expect("save");
    assert!(!c.is_dirty());

    let (back, report) = Canvas::load_from_disk(&path, size(), 20, "gestural");
    assert_eq!(report.status, LoadStatus::Loaded);
    assert!(report.issues.is_empty(), "{:?}", report.issues);

    assert_eq!(back.pixel_count(), 60);
    assert_eq!(back.pixel(0, 10), Some(Rgb8::new(0, 40, 200)));
    assert_eq!(back.recent(), c.recent());
    assert_eq!(back.mark_count(), 61);
    assert_eq!(back.drawings_saved(), 1);
    assert_eq!(back.last_save_time(), 1_000.0);
    assert_eq!(back.era(), "gestural");
    assert_eq!(back.pending_era_switch(), Some("pointillist"));
    assert_eq!(back.phase(), ArcPhase::Developing);
    assert_eq!(back.session(), c.session());
    assert!(!back.is_dirty());
}

#[test]
fn pixel_keys_are_deterministic() {
    let c = populated();
    let a = c.to_json_bytes().unwrap();
    let b = c.clone().to_json_bytes().unwrap();
    assert_eq!(a, b);
    let v: serde_json::Value = serde_json::from_slice(&a).unwrap();
    assert_eq!(v["version"], FORMAT_VERSION);
    assert_eq!(v["pixels"]["3,11"], serde_json::json!([1, 40, 200]));
}

#[test]
fn missing_file_is_fresh() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (c, report) = Canvas::load_from_disk(&dir.path().join("none.json"), size(), 20, "gestural");
    assert_eq!(report.status, LoadStatus::Missing);
    assert_eq!(c.pixel_count(), 0);
    assert_eq!(c.era(), "gestural");
}

#[test]
fn truncated_file_is_discarded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("canvas.json");
    let bytes = populated().to_json_bytes().unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    let (c, report) = Canvas::load_from_disk(&path, size(), 20, "gestural");
    assert_eq!(report.status, LoadStatus::Discarded);
    assert_eq!(c.pixel_count(), 0);
    assert_eq!(c.phase(), ArcPhase::Opening);
}

#[test]
fn non_object_document_is_discarded() {
    let (_, report) = Canvas::from_json_slice(b"[1, 2, 3]", size(), 20, "gestural");
    assert_eq!(report.status, LoadStatus::Discarded);
}

#[test]
fn bad_pixels_are_skipped_individually() {
    let doc = serde_json::json!({
        "pixels": {
            "1,2": [10, 20, 30],
            "-1,2": [10, 20, 30],
            "240,0": [1, 1, 1],
            "x,y": [1, 1, 1],
            "5,5": [256, 0, 0],
            "6,6": [1, 2],
            "7,7": [1, 2, 3]
        }
    });
    let bytes = serde_json::to_vec(&doc).unwrap();
    let (c, report) = Canvas::from_json_slice(&bytes, size(), 20, "gestural");
    assert_eq!(report.status, LoadStatus::Loaded);
    assert_eq!(c.pixel_count(), 2);
    assert_eq!(c.pixel(1, 2), Some(Rgb8::new(10, 20, 30)));
    assert_eq!(c.pixel(7, 7), Some(Rgb8::new(1, 2, 3)));
    assert_eq!(report.issues.len(), 5);
    assert!(report.issues.iter().all(|i| i.path.starts_with("pixels[")));
}

#[test]
fn invalid_scalars_fall_back_to_defaults() {
    let doc = serde_json::json!({
        "curiosity": 3.5,
        "engagement": "high",
        "fatigue": 0.2,
        "arc_phase": "finale",
        "mark_count": -4,
        "era": "",
        "coherence_history": [0.5, 2.0, null, 0.7],
        "eisv": { "e": 0.5, "i": 0.5, "s": 0.0, "v": 0.0 }
    });
    let bytes = serde_json::to_vec(&doc).unwrap();
    let (c, report) = Canvas::from_json_slice(&bytes, size(), 20, "gestural");

    let s = c.session();
    assert_eq!(s.attention.curiosity, 1.0);
    assert_eq!(s.attention.engagement, 0.5);
    assert_eq!(s.attention.fatigue, 0.2);
    assert_eq!(s.arc_phase, ArcPhase::Opening);
    assert_eq!(s.coherence_history, vec![0.5, 0.7]);
    assert_eq!(s.eisv, Eisv::default());
    assert_eq!(c.mark_count(), 0);
    assert_eq!(c.era(), "gestural");

    let paths: Vec<&str> = report.issues.iter().map(|i| i.path.as_str()).collect();
    for expected in [
        "curiosity",
        "engagement",
        "arc_phase",
        "mark_count",
        "era",
        "coherence_history[1]",
        "coherence_history[2]",
        "eisv",
    ] {
        assert!(paths.contains(&expected), "missing issue for {expected}: {paths:?}");
    }
}

#[test]
fn issue_display_is_path_prefixed() {
    let issue = LoadIssue {
        path: "pixels[\"a\"]".to_string(),
        message: "bad".to_string(),
    };
    assert_eq!(issue.to_string(), "$.pixels[\"a\"]: bad");
}
