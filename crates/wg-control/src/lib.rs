//! wg-control: group-control reconciliation for wells and groups.
//!
//! Contains:
//! - context (read-only inputs shared by every operation)
//! - aggregate (efficiency-weighted rate sums over the group tree)
//! - target (production and injection target calculators)
//! - fraction (guide-rate allocation fractions)
//! - reduction (group target reductions)
//! - update (per-iteration refresh of group state)
//! - constraints (group constraint checks for a well or group)
//! - network (extended network node pressures)
//! - driver (the per-iteration update sequence)
//!
//! Every update reads rates from the snapshot taken at the start of the
//! update column and writes into the current state; the constraint checks
//! only read.

pub mod aggregate;
pub mod constraints;
pub mod context;
pub mod driver;
pub mod error;
pub mod fraction;
pub mod network;
pub mod reduction;
pub mod target;
pub mod update;

pub use aggregate::{
    accumulate_group_efficiency_factor, group_controlled_wells, sum_solvent_rates,
    sum_well_phase_rates, sum_well_rates, sum_well_res_rates, RateKind,
};
pub use constraints::{BindingTarget, ConstraintChecker, GroupConstraintCheck};
pub use context::{ControlContext, ControlSide};
pub use driver::update_group_controls;
pub use error::{ControlError, ControlResult};
pub use fraction::{
    get_guide_rate, get_guide_rate_inj, group_chain_top_bot, production_group_rate_vector,
    well_rate_vector, FractionCalculator,
};
pub use network::{compute_network_pressures, VfpProduction};
pub use reduction::update_group_target_reduction;
pub use target::{InjectionTargetCalculator, TargetCalculator};
pub use update::{
    set_cmode_group, update_group_production_rates, update_guide_rates_for_injection_groups,
    update_rein_for_groups, update_reservoir_rates_injection_groups, update_vrep_for_groups,
    update_well_rates,
};
