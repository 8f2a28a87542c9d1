//! wg-schedule: the static, per-report-step view of the group tree.
//!
//! Groups, wells, control declarations, gas consumption and sales, group
//! events and the extended network, plus the YAML deck format they load from.
//! A [`ScheduleStep`] can only be obtained through [`ScheduleStepBuilder`],
//! which validates that the group tree is a proper tree rooted at `FIELD`.

pub mod builder;
pub mod controls;
pub mod deck;
pub mod error;
pub mod events;
pub mod gas;
pub mod group;
pub mod step;
pub mod summary;
pub(crate) mod validate;
pub mod well;

pub use builder::ScheduleStepBuilder;
pub use controls::{
    GuideRateInjTarget, InjectionCMode, InjectionControls, InjectionDeclaration, ProductionCMode,
    ProductionControls, ProductionDeclaration,
};
pub use deck::{
    BranchDef, DeckDef, GasConsumptionDef, GasSalesDef, GroupDef, NetworkDef, NetworkNodeDef,
    StepDef, from_yaml_str, load_yaml, read_deck, save_yaml,
};
pub use error::{ScheduleError, ScheduleResult};
pub use events::GroupEvent;
pub use gas::{GasConsumption, GasConsumptionDeclaration, GasSales, GasSalesDeclaration};
pub use group::{FIELD, Group};
pub use step::{Schedule, ScheduleStep};
pub use summary::{SummaryState, UdaValue};
pub use well::{Well, WellRole, WellStatus};
