use super::*;

#[test]
fn builtin_registers_gestural() {
    let reg = StrategyRegistry::with_builtin();
    assert!(reg.contains(gestural::NAME));
    assert_eq!(reg.names().collect::<Vec<_>>(), vec!["gestural"]);
    let s = reg.get("gestural").expect("registered");
    assert_eq!(s.name(), "gestural");
}

#[test]
fn unknown_name_is_a_validation_error() {
    let reg = StrategyRegistry::new();
    assert!(reg.is_empty());
    let err = reg.get("cubist").err().expect("missing");
    assert!(matches!(err, EaselError::Validation(_)));
    assert!(err.to_string().contains("cubist"));
}

#[test]
fn states_are_independent_per_session() {
    let reg = StrategyRegistry::with_builtin();
    let s = reg.get("gestural").unwrap();
    let a = s.create_state(CanvasSize::default());
    let b = s.create_state(CanvasSize::default());
    assert_eq!(a.gesture(), b.gesture());
    assert_eq!(a.intentionality(), b.intentionality());
}

#[test]
fn hue_categories() {
    assert_eq!(HueCategory::classify(20.0, 0.8), HueCategory::Warm);
    assert_eq!(HueCategory::classify(350.0, 0.8), HueCategory::Warm);
    assert_eq!(HueCategory::classify(-10.0, 0.8), HueCategory::Warm);
    assert_eq!(HueCategory::classify(210.0, 0.8), HueCategory::Cool);
    assert_eq!(HueCategory::classify(110.0, 0.8), HueCategory::Neutral);
    assert_eq!(HueCategory::classify(210.0, 0.05), HueCategory::Neutral);
}
