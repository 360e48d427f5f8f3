//! Modelos de datos de cada paso del wizard.
//!
//! Cada modelo es una bolsa de campos observables (`Field<T>`) con
//! predicados derivados de sólo lectura. Los modelos no hacen E/S.
pub mod resources;
pub mod results;
pub mod structure;
pub mod workflow;

pub use resources::ComputationalResourcesModel;
pub use results::{ProcessModel, ResultsModel};
pub use structure::StructureStepModel;
pub use workflow::{parse_qm_region, ChemShellWorkflowModel};
