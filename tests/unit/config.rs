use super::*;

#[test]
fn defaults_validate() {
    EngineConfig::default().validate().unwrap();
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: EngineConfig =
        serde_json::from_str(r#"{"draw": {"base_rate": 0.9}, "seed": 7}"#).unwrap();
    assert_eq!(cfg.draw.base_rate, 0.9);
    assert_eq!(cfg.draw.max_pixels, 15_000);
    assert_eq!(cfg.seed, Some(7));
    assert_eq!(cfg.autonomy.min_save_interval_secs, 60.0);
    assert_eq!(cfg.default_era, "gestural");
}

#[test]
fn rejects_bad_values() {
    let mut cfg = EngineConfig::default();
    cfg.eisv.dt = 0.0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.canvas.width = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.light.dark_lux = 500.0;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.narrative.settled_window = 50;
    assert!(cfg.validate().is_err());

    let mut cfg = EngineConfig::default();
    cfg.draw.base_rate = f64::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn from_json_file_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cfg.json");
    std::fs::write(&path, r#"{"autonomy": {"min_save_interval_secs": 90}}"#).unwrap();
    let cfg = EngineConfig::from_json_file(&path).unwrap();
    assert_eq!(cfg.autonomy.min_save_interval_secs, 90.0);

    std::fs::write(&path, r#"{"eisv": {"c_max": 3.0}}"#).unwrap();
    assert!(EngineConfig::from_json_file(&path).is_err());
}
