use super::*;

#[test]
fn sanitizes_scalars() {
    let f = FeltState::new(f64::NAN, 2.0, -1.0, 0.3).with_light(Some(f64::INFINITY), f64::NAN);
    assert_eq!(f.warmth, 0.5);
    assert_eq!(f.clarity, 1.0);
    assert_eq!(f.stability, 0.0);
    assert_eq!(f.presence, 0.3);
    assert_eq!(f.ambient_lux, None);
    assert_eq!(f.self_glow, 0.5);
}

#[test]
fn expression_intensity_spans_half_to_one() {
    assert_eq!(FeltState::new(0.0, 0.5, 0.5, 0.0).expression_intensity(), 0.5);
    assert_eq!(FeltState::new(1.0, 0.5, 0.5, 1.0).expression_intensity(), 1.0);
}

#[test]
fn no_reading_is_dim() {
    let p = LightParams::default();
    assert_eq!(LightRegime::from_reading(None, 1.0, &p), LightRegime::Dim);
}

#[test]
fn self_glow_is_subtracted_before_thresholding() {
    let p = LightParams::default();
    // 300 lux raw reads bright, but most of it is the device's own output at full glow.
    assert_eq!(LightRegime::from_reading(Some(300.0), 0.0, &p), LightRegime::Bright);
    assert_eq!(LightRegime::from_reading(Some(300.0), 1.0, &p), LightRegime::Dark);
    assert_eq!(LightRegime::from_reading(Some(300.0), 0.5, &p), LightRegime::Dim);
}

#[test]
fn regime_uses_sanitized_felt_state() {
    let p = LightParams::default();
    let f = FeltState::default().with_light(Some(5.0), 0.0);
    assert_eq!(f.light_regime(&p), LightRegime::Dark);
    assert_eq!(LightRegime::Bright.to_string(), "bright");
}
