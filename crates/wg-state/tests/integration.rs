use wg_core::{Phase, PhaseUsage};
use wg_schedule::{InjectionCMode, ProductionCMode};
use wg_state::*;

#[test]
fn snapshot_records_from_yaml() {
    let yaml = r#"
surface_rates: [0.0, -100.0, -20.0]
reservoir_rates: [0.0, -110.0, -5.0]
producer_control: GRUP
alq: 3.5
"#;
    let record: WellRecord = serde_yaml::from_str(yaml).unwrap();
    assert!(record.is_owned());
    assert_eq!(record.injector_control(), InjectorControl::Undefined);

    let mut ws = WellState::new(PhaseUsage::three_phase());
    ws.insert_well("P1", record).unwrap();
    assert!(ws.is_production_grup("P1"));
    assert_eq!(ws.alq("P1"), 3.5);
}

#[test]
fn snapshot_is_independent_of_current_state() {
    let mut current = WellState::new(PhaseUsage::three_phase());
    current
        .insert_well("P1", WellRecord::new(vec![0.0, -10.0, 0.0]))
        .unwrap();
    current.set_production_control("G1", ProductionCMode::Orat);
    let frozen = current.clone();

    current
        .set_surface_rates("P1", vec![0.0, -99.0, 0.0])
        .unwrap();
    current.set_injection_control(Phase::Water, "G1", InjectionCMode::Vrep);

    assert_eq!(frozen.surface_rates("P1").unwrap(), &[0.0, -10.0, 0.0]);
    assert!(!frozen.has_injection_control(Phase::Water, "G1"));
    assert_eq!(frozen.production_control("G1"), ProductionCMode::Orat);
}

#[test]
fn guide_rate_targets_parse_uppercase() {
    let t: GuideRateTarget = serde_yaml::from_str("LIQUID").unwrap();
    assert_eq!(t, GuideRateTarget::Liquid);
}

mod proptests {
    use proptest::prelude::*;
    use wg_state::{GuideRate, GuideRateTarget, RateVector};

    proptest! {
        #[test]
        fn converted_guide_rates_are_finite_and_non_negative(
            value in 0.0f64..1e4,
            oil in 0.0f64..1e4,
            gas in 0.0f64..1e6,
            water in 0.0f64..1e4,
        ) {
            let mut gr = GuideRate::new();
            gr.set_production("W", value, GuideRateTarget::Oil);
            let rates = RateVector::new(oil, gas, water);
            for target in [GuideRateTarget::Gas, GuideRateTarget::Water, GuideRateTarget::Liquid] {
                let v = gr.get("W", target, &rates);
                prop_assert!(v.is_finite());
                prop_assert!(v >= 0.0);
            }
        }
    }
}
