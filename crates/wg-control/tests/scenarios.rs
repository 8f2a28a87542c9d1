use wg_control::{
    ConstraintChecker, ControlContext, ControlError, ControlResult, GroupConstraintCheck, VfpProduction,
    compute_network_pressures, group_chain_top_bot, update_group_controls,
};
use wg_core::{Phase, PhaseUsage, Pressure, bar, to_bar};
use wg_network::{NO_PRESSURE_LOSS_TABLE, NetworkBuilder};
use wg_schedule::{
    FIELD, InjectionCMode, InjectionDeclaration, ProductionCMode, ProductionDeclaration, ScheduleStep,
    ScheduleStepBuilder, SummaryState, UdaValue, Well, WellRole,
};
use wg_state::{GuideRate, GuideRateTarget, InjectorControl, ProducerControl, WellRecord, WellState};

fn orat(target: f64) -> ProductionDeclaration {
    let mut decl = ProductionDeclaration::new(ProductionCMode::Orat);
    decl.oil_target = UdaValue::Numeric(target);
    decl
}

fn producer(oil: f64, control: ProducerControl) -> WellRecord {
    WellRecord::new(vec![0.0, -oil, 0.0]).with_producer_control(control)
}

/// FIELD -> G1 -> {W1, W2}, G1 under ORAT 100, guide rates 3 and 1.
fn two_level(w1_rate: f64) -> (ScheduleStep, WellState, GuideRate) {
    two_level_with(w1_rate, ProducerControl::Orat)
}

fn two_level_with(w1_rate: f64, w1_control: ProducerControl) -> (ScheduleStep, WellState, GuideRate) {
    let mut b = ScheduleStepBuilder::new();
    b.add_group("G1", FIELD)
        .set_production("G1", orat(100.0))
        .add_well(Well::new("W1", "G1", WellRole::Producer))
        .add_well(Well::new("W2", "G1", WellRole::Producer));
    let step = b.build().unwrap();

    let mut ws = WellState::new(PhaseUsage::three_phase());
    ws.insert_well("W1", producer(w1_rate, w1_control)).unwrap();
    ws.insert_well("W2", producer(30.0, ProducerControl::Grup)).unwrap();

    let mut gr = GuideRate::new();
    gr.set_production("W1", 3.0, GuideRateTarget::Oil);
    gr.set_production("W2", 1.0, GuideRateTarget::Oil);
    (step, ws, gr)
}

fn run_updates(step: &ScheduleStep, ws: &mut WellState, gr: &mut GuideRate) {
    let pu = *ws.phase_usage();
    let summary = SummaryState::new();
    let ctx = ControlContext::new(step, &summary, &pu);
    let nupcol = ws.clone();
    update_group_controls(&ctx, gr, &nupcol, ws).unwrap();
}

fn check_well(step: &ScheduleStep, ws: &WellState, gr: &GuideRate, well: &str) -> GroupConstraintCheck {
    let pu = *ws.phase_usage();
    let summary = SummaryState::new();
    let ctx = ControlContext::new(step, &summary, &pu);
    let checker = ConstraintChecker::new(ctx, ws, gr, &[1.0, 1.0, 1.0]);
    let w = step.well(well).unwrap();
    let group = step.group(&w.group).unwrap();
    checker
        .check_production(well, group, ws.surface_rates(well).unwrap(), w.efficiency_factor)
        .unwrap()
}

#[test]
fn guide_rate_share_of_group_target() {
    let (step, mut ws, mut gr) = two_level(20.0);
    run_updates(&step, &mut ws, &mut gr);
    assert_eq!(ws.production_reduction("G1"), &[0.0, 20.0, 0.0]);

    let check = check_well(&step, &ws, &gr, "W1");
    let binding = check.binding.as_ref().unwrap();
    assert_eq!(binding.group, "G1");
    assert!((binding.target_rate - 75.0).abs() < 1e-9);
    assert!((binding.current_rate - 20.0).abs() < 1e-12);
    assert!(!check.violated);
    assert!((check.scale - 3.75).abs() < 1e-9);
}

#[test]
fn both_group_controlled_without_reduction() {
    let (step, mut ws, mut gr) = two_level_with(0.0, ProducerControl::Grup);
    run_updates(&step, &mut ws, &mut gr);
    assert_eq!(ws.production_reduction("G1"), &[0.0, 0.0, 0.0]);

    let check = check_well(&step, &ws, &gr, "W1");
    assert!((check.target_rate().unwrap() - 75.0).abs() < 1e-9);
    assert!(!check.violated);
    // Nothing produced yet, so there is nothing to scale.
    assert_eq!(check.scale, 1.0);
}

#[test]
fn exceeding_the_share_is_a_violation() {
    let (step, mut ws, mut gr) = two_level(90.0);
    run_updates(&step, &mut ws, &mut gr);
    let check = check_well(&step, &ws, &gr, "W1");
    assert!(check.violated);
    assert!((check.target_rate().unwrap() - 75.0).abs() < 1e-9);
    assert!((check.scale - 75.0 / 90.0).abs() < 1e-9);
}

#[test]
fn none_chain_up_to_field_is_unconstrained() {
    let mut b = ScheduleStepBuilder::new();
    b.add_group("G1", FIELD)
        .add_group("G2", "G1")
        .add_well(Well::new("W1", "G2", WellRole::Producer));
    let step = b.build().unwrap();
    let mut ws = WellState::new(PhaseUsage::three_phase());
    ws.insert_well("W1", producer(50.0, ProducerControl::Grup)).unwrap();
    let mut gr = GuideRate::new();
    run_updates(&step, &mut ws, &mut gr);

    let check = check_well(&step, &ws, &gr, "W1");
    assert_eq!(check, GroupConstraintCheck::unconstrained());
    assert!(!check.violated);
    assert_eq!(check.scale, 1.0);
}

#[test]
fn unavailable_group_stops_the_climb() {
    let mut b = ScheduleStepBuilder::new();
    let mut fld = ProductionDeclaration::new(ProductionCMode::Fld);
    fld.available_for_group_control = false;
    b.add_group("G1", FIELD)
        .set_production(FIELD, orat(10.0))
        .set_production("G1", fld)
        .add_well(Well::new("W1", "G1", WellRole::Producer));
    let step = b.build().unwrap();
    let mut ws = WellState::new(PhaseUsage::three_phase());
    ws.insert_well("W1", producer(50.0, ProducerControl::Grup)).unwrap();
    let mut gr = GuideRate::new();
    run_updates(&step, &mut ws, &mut gr);

    assert_eq!(check_well(&step, &ws, &gr, "W1"), GroupConstraintCheck::unconstrained());
}

#[test]
fn field_control_reaches_through_transparent_groups() {
    let mut b = ScheduleStepBuilder::new();
    b.add_group("G1", FIELD)
        .add_group("G2", FIELD)
        .set_production(FIELD, orat(300.0))
        .add_well(Well::new("W1", "G1", WellRole::Producer))
        .add_well(Well::new("W2", "G1", WellRole::Producer))
        .add_well(Well::new("W3", "G2", WellRole::Producer));
    let step = b.build().unwrap();

    let mut ws = WellState::new(PhaseUsage::three_phase());
    ws.insert_well("W1", producer(10.0, ProducerControl::Grup)).unwrap();
    ws.insert_well("W2", producer(10.0, ProducerControl::Grup)).unwrap();
    ws.insert_well("W3", producer(10.0, ProducerControl::Grup)).unwrap();
    let mut gr = GuideRate::new();
    gr.set_production("W1", 2.0, GuideRateTarget::Oil);
    gr.set_production("W2", 2.0, GuideRateTarget::Oil);
    gr.set_production("W3", 4.0, GuideRateTarget::Oil);
    run_updates(&step, &mut ws, &mut gr);

    // (300 + 10) * 4/8 * 2/4
    let check = check_well(&step, &ws, &gr, "W1");
    assert_eq!(check.binding.as_ref().unwrap().group, FIELD);
    assert!((check.target_rate().unwrap() - 77.5).abs() < 1e-9);
}

/// FIELD(ORAT 300) -> G0 -> {G1 -> {W1, W2}, G2 -> {W3}}, with a guide
/// rate registered on G1 and W1 under individual control.
fn nested_with_group_guide_rate(w2_control: ProducerControl) -> (ScheduleStep, WellState, GuideRate) {
    let mut b = ScheduleStepBuilder::new();
    b.add_group("G0", FIELD)
        .add_group("G1", "G0")
        .add_group("G2", "G0")
        .set_production(FIELD, orat(300.0))
        .add_well(Well::new("W1", "G1", WellRole::Producer))
        .add_well(Well::new("W2", "G1", WellRole::Producer))
        .add_well(Well::new("W3", "G2", WellRole::Producer));
    let step = b.build().unwrap();

    let mut ws = WellState::new(PhaseUsage::three_phase());
    ws.insert_well("W1", producer(20.0, ProducerControl::Orat)).unwrap();
    ws.insert_well("W2", producer(30.0, w2_control)).unwrap();
    ws.insert_well("W3", producer(40.0, ProducerControl::Grup)).unwrap();

    let mut gr = GuideRate::new();
    gr.set_production("G1", 1.0, GuideRateTarget::Oil);
    gr.set_production("W1", 3.0, GuideRateTarget::Oil);
    gr.set_production("W2", 1.0, GuideRateTarget::Oil);
    gr.set_production("W3", 1.0, GuideRateTarget::Oil);
    (step, ws, gr)
}

#[test]
fn own_rate_returns_at_the_deepest_guided_level() {
    let (step, mut ws, mut gr) = nested_with_group_guide_rate(ProducerControl::Grup);
    run_updates(&step, &mut ws, &mut gr);
    assert_eq!(ws.production_reduction("G1"), &[0.0, 20.0, 0.0]);
    // G1 has its own guide rate, so its reduction stays there.
    assert_eq!(ws.production_reduction("G0"), &[0.0, 0.0, 0.0]);
    assert_eq!(ws.production_reduction(FIELD), &[0.0, 0.0, 0.0]);

    // FIELD: 300, G0 takes all of it, G1 gets 1/2 = 150.
    // At G1: 150 - 20 + 30 = 160, and W2 is the only share there.
    let check = check_well(&step, &ws, &gr, "W2");
    assert_eq!(check.binding.as_ref().unwrap().group, FIELD);
    assert!((check.target_rate().unwrap() - 160.0).abs() < 1e-9);
    assert!(!check.violated);
    assert!((check.scale - 160.0 / 30.0).abs() < 1e-9);
}

#[test]
fn guided_group_without_controlled_wells_gets_its_reduction_back() {
    let (step, mut ws, mut gr) = nested_with_group_guide_rate(ProducerControl::Orat);
    run_updates(&step, &mut ws, &mut gr);
    assert_eq!(ws.production_reduction("G1"), &[0.0, 50.0, 0.0]);
    assert_eq!(ws.production_reduction("G0"), &[0.0, 50.0, 0.0]);
    assert_eq!(ws.production_reduction(FIELD), &[0.0, 50.0, 0.0]);

    // FIELD: 300 - 50 = 250. Below G0 the G1 reduction is handed back
    // (300) before the 1/2 split, then taken again at G1 with W2's own
    // rate returned: 150 - 50 + 30 = 130.
    let check = check_well(&step, &ws, &gr, "W2");
    assert!((check.target_rate().unwrap() - 130.0).abs() < 1e-9);
    assert!(!check.violated);
}

#[test]
fn target_is_floored_when_reductions_exceed_it() {
    let mut b = ScheduleStepBuilder::new();
    b.add_group("G1", FIELD)
        .set_production("G1", orat(100.0))
        .add_well(Well::new("W1", "G1", WellRole::Producer))
        .add_well(Well::new("W2", "G1", WellRole::Producer));
    let step = b.build().unwrap();
    let mut ws = WellState::new(PhaseUsage::three_phase());
    ws.insert_well("W1", producer(10.0, ProducerControl::Grup)).unwrap();
    ws.insert_well("W2", producer(500.0, ProducerControl::Orat)).unwrap();
    let mut gr = GuideRate::new();
    gr.set_production("W1", 1.0, GuideRateTarget::Oil);
    run_updates(&step, &mut ws, &mut gr);

    let check = check_well(&step, &ws, &gr, "W1");
    assert_eq!(check.target_rate().unwrap(), 1e-12);
    assert!(check.violated);
}

#[test]
fn vrep_injection_check() {
    let mut b = ScheduleStepBuilder::new();
    let mut vrep = InjectionDeclaration::new(Phase::Water, InjectionCMode::Vrep);
    vrep.target_void_fraction = UdaValue::Numeric(1.0);
    vrep.voidage_group = Some(FIELD.to_string());
    b.add_group("PROD", FIELD)
        .add_group("INJ", FIELD)
        .set_injection("INJ", vrep)
        .add_well(Well::new("P1", "PROD", WellRole::Producer))
        .add_well(Well::new("I1", "INJ", WellRole::Injector))
        .add_well(Well::new("I2", "INJ", WellRole::Injector));
    let step = b.build().unwrap();

    let mut ws = WellState::new(PhaseUsage::three_phase());
    ws.insert_well(
        "P1",
        WellRecord::new(vec![-10.0, -100.0, -50.0]).with_reservoir_rates(vec![-10.0, -120.0, -30.0]),
    )
    .unwrap();
    for name in ["I1", "I2"] {
        ws.insert_well(
            name,
            WellRecord::new(vec![40.0, 0.0, 0.0])
                .with_reservoir_rates(vec![40.0, 0.0, 0.0])
                .with_injector_control(InjectorControl::Grup),
        )
        .unwrap();
    }
    let mut gr = GuideRate::new();
    gr.set_production("I1", 1.0, GuideRateTarget::Water);
    gr.set_production("I2", 1.0, GuideRateTarget::Water);
    run_updates(&step, &mut ws, &mut gr);
    assert_eq!(ws.vrep(FIELD), 160.0);
    assert_eq!(ws.injection_control(Phase::Water, "INJ"), InjectionCMode::Vrep);

    let pu = PhaseUsage::three_phase();
    let summary = SummaryState::new();
    let ctx = ControlContext::new(&step, &summary, &pu);
    let checker = ConstraintChecker::new(ctx, &ws, &gr, &[1.0, 1.0, 1.0]);
    let inj = step.group("INJ").unwrap();
    let check = checker
        .check_injection("I1", inj, ws.surface_rates("I1").unwrap(), Phase::Water, 1.0)
        .unwrap();
    // (160 + 40) / 2
    assert!((check.target_rate().unwrap() - 100.0).abs() < 1e-9);
    assert!(!check.violated);
}

#[test]
fn repeated_updates_are_idempotent() {
    let (step, mut ws, mut gr) = two_level(20.0);
    run_updates(&step, &mut ws, &mut gr);
    let snapshot = |ws: &WellState| {
        step.groups()
            .map(|g| {
                let n = g.name();
                (
                    ws.production_control(n),
                    ws.production_reduction(n).to_vec(),
                    ws.injection_reduction(n).to_vec(),
                    ws.rein(n).to_vec(),
                    ws.vrep(n),
                    ws.production_group_rates(n).to_vec(),
                )
            })
            .collect::<Vec<_>>()
    };
    let first = snapshot(&ws);
    let first_check = check_well(&step, &ws, &gr, "W1");
    run_updates(&step, &mut ws, &mut gr);
    assert_eq!(first, snapshot(&ws));
    assert_eq!(first_check, check_well(&step, &ws, &gr, "W1"));
}

struct LinearVfp {
    bar_per_gas: f64,
}

impl VfpProduction for LinearVfp {
    fn bhp(&self, table: u32, _water: f64, _oil: f64, gas: f64, thp: Pressure, _alq: f64) -> ControlResult<Pressure> {
        if table != 3 {
            return Err(ControlError::Vfp {
                table,
                what: "unknown table".into(),
            });
        }
        Ok(thp + bar(self.bar_per_gas * -gas))
    }
}

fn network_step(builder: NetworkBuilder) -> ScheduleStep {
    let mut b = ScheduleStepBuilder::new();
    b.add_group("G1", FIELD)
        .add_group("G2", FIELD)
        .add_well(Well::new("W1", "G2", WellRole::Producer))
        .set_network(builder.build().unwrap());
    b.build().unwrap()
}

#[test]
fn branch_without_table_passes_pressure_through() {
    let mut nb = NetworkBuilder::new();
    nb.add_branch("PLAT", "G1", Some(NO_PRESSURE_LOSS_TABLE))
        .set_terminal_pressure("PLAT", bar(50.0));
    let step = network_step(nb);

    let pu = PhaseUsage::three_phase();
    let mut ws = WellState::new(pu);
    ws.set_production_group_rates("G1", vec![0.0, 0.0, 10.0]).unwrap();
    let summary = SummaryState::new();
    let ctx = ControlContext::new(&step, &summary, &pu);

    let pressures = compute_network_pressures(&ctx, &ws, &LinearVfp { bar_per_gas: 1.0 }).unwrap();
    assert_eq!(pressures["G1"], bar(50.0));
    assert_eq!(to_bar(pressures["G1"]), 50.0);
}

#[test]
fn tables_see_accumulated_inflow_and_gas_lift() {
    let mut nb = NetworkBuilder::new();
    nb.add_branch("PLAT", "M", Some(3))
        .add_branch("M", "G1", None)
        .add_branch("M", "G2", None)
        .set_terminal_pressure("PLAT", bar(50.0))
        .set_add_gas_lift_gas("G2", true);
    let step = network_step(nb);

    let pu = PhaseUsage::three_phase();
    let mut ws = WellState::new(pu);
    ws.insert_well("W1", WellRecord::new(vec![0.0, -1.0, -5.0]).with_alq(2.0))
        .unwrap();
    ws.set_production_group_rates("G1", vec![0.0, 0.0, 10.0]).unwrap();
    ws.set_production_group_rates("G2", vec![0.0, 1.0, 5.0]).unwrap();
    let summary = SummaryState::new();
    let ctx = ControlContext::new(&step, &summary, &pu);

    let pressures = compute_network_pressures(&ctx, &ws, &LinearVfp { bar_per_gas: 0.5 }).unwrap();
    // 50 + 0.5 * (10 + 5 + 2)
    assert!((to_bar(pressures["M"]) - 58.5).abs() < 1e-9);
    assert_eq!(pressures["G1"], pressures["M"]);
    assert_eq!(pressures["G2"], pressures["M"]);
    assert_eq!(pressures.len(), 4);
}

#[test]
fn state_with_other_phase_layout_is_rejected() {
    let mut nb = NetworkBuilder::new();
    nb.add_branch("PLAT", "G1", Some(3))
        .set_terminal_pressure("PLAT", bar(50.0))
        .set_add_gas_lift_gas("G1", true);
    let step = network_step(nb);

    let pu = PhaseUsage::three_phase();
    let ws = WellState::new(PhaseUsage::new(true, true, false).unwrap());
    let summary = SummaryState::new();
    let ctx = ControlContext::new(&step, &summary, &pu);

    let err = compute_network_pressures(&ctx, &ws, &LinearVfp { bar_per_gas: 1.0 }).unwrap_err();
    assert!(matches!(err, ControlError::PhaseLayout { expected: 3, found: 2 }));
}

#[test]
fn inactive_network_has_no_pressures() {
    let (step, ws, _) = two_level(20.0);
    let pu = PhaseUsage::three_phase();
    let summary = SummaryState::new();
    let ctx = ControlContext::new(&step, &summary, &pu);
    let pressures = compute_network_pressures(&ctx, &ws, &LinearVfp { bar_per_gas: 1.0 }).unwrap();
    assert!(pressures.is_empty());
}

#[test]
fn chain_round_trips_through_parents() {
    let mut b = ScheduleStepBuilder::new();
    b.add_group("A", FIELD)
        .add_group("B", "A")
        .add_group("C", "B")
        .add_well(Well::new("W", "C", WellRole::Producer));
    let step = b.build().unwrap();

    let chain = group_chain_top_bot(&step, "W", FIELD).unwrap();
    assert_eq!(chain, vec!["FIELD", "A", "B", "C", "W"]);
    for pair in chain.windows(2) {
        assert_eq!(step.parent_of(&pair[1]).unwrap(), Some(pair[0].as_str()));
    }
    let upward: Vec<_> = chain.iter().rev().cloned().collect();
    assert_eq!(upward.first().map(String::as_str), Some("W"));
    assert_eq!(upward.last().map(String::as_str), Some(FIELD));
}
