//! chem-workflow: wizard de configuración y envío de cálculos ChemShell
//!
//! El wizard tiene cuatro pasos (estructura, método, recursos y
//! resultados). Cada paso edita un modelo de campos observables; al enviar
//! el paso de recursos se validan todos los modelos y se despacha el
//! cálculo al backend (`flow::FlowBackend`).
//!
//! ```
//! use chem_workflow::{parse_qm_region, WizardConfig};
//!
//! assert_eq!(parse_qm_region("1,2,3"), Some(vec![1, 2, 3]));
//! assert_eq!(WizardConfig::default().max_cpus, 128);
//! ```

pub mod app;
pub mod capability;
pub mod config;
pub mod database;
pub mod errors;
pub mod field;
pub mod host;
pub mod models;
pub mod navigation;
pub mod preview;
pub mod step;
pub mod submission;
pub mod view;
pub mod wizard;

pub use app::{MainApp, MainAppModel, SubmitOutcome};
pub use capability::{BackendPluginCapability, Capability, StaticCapability};
pub use config::WizardConfig;
pub use errors::{ValidationFailure, WorkflowError};
pub use field::Field;
pub use host::{NotebookHost, RecordingHost};
pub use models::{parse_qm_region, ChemShellWorkflowModel, ComputationalResourcesModel, ResultsModel, StructureStepModel};
pub use preview::{StructurePreviewer, XyzPreviewer};
pub use step::{StepState, WizardStep};
pub use submission::{SubmissionBuilder, SubmissionRequest};
pub use wizard::Wizard;
