//! Pasos del wizard: el trait común y las cuatro implementaciones.
pub mod method_step;
pub mod resources_step;
pub mod results_step;
pub mod structure_step;
pub mod trait_step;

pub use method_step::MethodStep;
pub use resources_step::ResourcesStep;
pub use results_step::ResultsStep;
pub use structure_step::StructureStep;
pub use trait_step::{StepState, WizardStep};
