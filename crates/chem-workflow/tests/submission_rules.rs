use chem_domain::{BasisQuality, MmTheory, QmTheory, SinglefileData, StructureData, Task};
use chem_workflow::{ChemShellWorkflowModel, ComputationalResourcesModel, ResultsModel, StructureStepModel,
                    SubmissionBuilder, ValidationFailure, WorkflowError};
use flow::domain::StructureRef;
use flow::stubs::InMemoryFlowBackend;
use serde_json::json;

struct Models {
  structure: StructureStepModel,
  workflow: ChemShellWorkflowModel,
  resources: ComputationalResourcesModel,
}

impl Models {
  fn new() -> Self {
    Self { structure: StructureStepModel::new(),
           workflow: ChemShellWorkflowModel::new(),
           resources: ComputationalResourcesModel::default() }
  }

  fn builder(&self) -> SubmissionBuilder<'_> {
    SubmissionBuilder::new(&self.structure, &self.workflow, &self.resources)
  }

  /// Estructura y código: lo mínimo para un cálculo QM.
  fn ready() -> Self {
    let m = Self::new();
    m.structure.structure.set(Some(water()));
    m.resources.code.set(Some("pw-7.0".into()));
    m
  }
}

fn water() -> StructureData {
  StructureData::molecule(vec!["O".into(), "H".into(), "H".into()],
                          vec![[0.0, 0.0, 0.0], [0.76, 0.59, 0.0], [-0.76, 0.59, 0.0]]).unwrap()
}

fn force_field() -> SinglefileData {
  SinglefileData::from_upload("FIELD", b"units kcal".to_vec(), "").unwrap()
}

#[test]
fn structure_and_code_are_required() {
  let m = Models::new();
  assert_eq!(m.builder().check(), Err(ValidationFailure::MissingStructure));
  m.structure.structure_file.set(Some(SinglefileData::from_upload("water.xyz", vec![1], "").unwrap()));
  assert_eq!(m.builder().check(), Err(ValidationFailure::MissingCode));
  m.resources.code.set(Some("pw-7.0".into()));
  assert!(m.builder().validate());
}

#[test]
fn combined_mode_needs_force_field_and_region() {
  let m = Models::ready();
  assert!(m.builder().validate());

  m.workflow.use_qmmm.set(true);
  assert!(!m.builder().validate());
  assert_eq!(m.builder().check(), Err(ValidationFailure::MissingForceField));

  m.workflow.force_field.set(Some(force_field()));
  assert_eq!(m.builder().check(), Err(ValidationFailure::EmptyQmRegion));

  m.workflow.update_qm_region("1,2");
  assert!(m.builder().validate());

  // región vaciada por un texto inválido
  m.workflow.update_qm_region("x");
  assert!(!m.builder().validate());
}

#[test]
fn qm_request_has_no_mm_sections() -> Result<(), WorkflowError> {
  let m = Models::ready();
  m.workflow.qm_theory.set(QmTheory::Orca);
  m.workflow.basis_quality.set(BasisQuality::Accurate);
  m.workflow.task.set(Task::GeometryOptimisation);
  // sin modo combinado el campo de fuerza se ignora
  m.workflow.force_field.set(Some(force_field()));

  let req = m.builder().build_request()?;
  assert_eq!(req.code_label, "pw-7.0");
  assert_eq!(req.task, "opt");
  assert_eq!(req.qm_parameters["theory"], json!("ORCA"));
  assert_eq!(req.qm_parameters["basis"], json!("cc-pVTZ"));
  assert!(req.mm_parameters.is_none());
  assert!(req.qmmm_parameters.is_none());
  assert!(req.force_field.is_none());
  assert_eq!(req.calculation_parameters["gradients"], json!(true));
  assert!(req.optimisation_parameters.is_empty());
  assert!(matches!(req.structure, StructureRef::Geometry(_)));
  Ok(())
}

#[test]
fn qmmm_request_carries_coupling_and_force_field() -> Result<(), WorkflowError> {
  let m = Models::ready();
  m.workflow.use_qmmm.set(true);
  m.workflow.mm_theory.set(MmTheory::Gulp);
  m.workflow.force_field.set(Some(force_field()));
  m.workflow.update_qm_region("0, 1");
  m.resources.set_num_cpus(8);
  m.resources.label.set("water qmmm".into());

  let req = m.builder().build_request()?;
  assert_eq!(req.qm_parameters["basis"], json!("3-21G"));
  assert_eq!(req.mm_parameters.as_ref().unwrap()["theory"], json!("GULP"));
  assert_eq!(req.qmmm_parameters.as_ref().unwrap()["qm_region"], json!([0, 1]));
  assert_eq!(req.force_field.as_ref().map(|f| f.filename.as_str()), Some("FIELD"));
  assert_eq!(req.metadata.num_cpus, 8);
  assert_eq!(req.metadata.label, "water qmmm");
  Ok(())
}

#[test]
fn invalid_models_never_reach_the_backend() {
  let backend = InMemoryFlowBackend::new();
  backend.register_code("pw-7.0", "localhost", "chemshell").unwrap();
  let results = ResultsModel::new();
  let m = Models::new();
  assert!(matches!(m.builder().submit(&backend, &results),
                   Err(WorkflowError::Validation(ValidationFailure::MissingStructure))));
  assert!(backend.submissions().is_empty());
  assert!(results.is_blocked());
}

#[test]
fn submit_records_job_and_refuses_a_second_one() -> Result<(), WorkflowError> {
  let backend = InMemoryFlowBackend::new();
  backend.register_code("pw-7.0", "localhost", "chemshell").unwrap();
  let results = ResultsModel::new();
  let m = Models::ready();

  let job = m.builder().submit(&backend, &results)?;
  assert_eq!(results.process_uuid.get(), Some(job));
  assert!(!results.is_blocked());

  let subs = backend.submissions();
  assert_eq!(subs.len(), 1);
  let inputs = &subs[0].1.inputs;
  assert_eq!(inputs["task"], json!("sp"));
  assert_eq!(inputs["calculation_parameters"]["gradients"], json!(true));
  assert_eq!(inputs["optimisation_parameters"], json!({}));

  assert!(matches!(m.builder().submit(&backend, &results), Err(WorkflowError::AlreadySubmitted)));
  assert_eq!(backend.submissions().len(), 1);
  Ok(())
}

#[test]
fn unknown_code_is_a_backend_error() {
  let backend = InMemoryFlowBackend::new();
  let results = ResultsModel::new();
  let m = Models::ready();
  assert!(matches!(m.builder().submit(&backend, &results),
                   Err(WorkflowError::Flow(flow::FlowError::NotFound(_)))));
  assert!(results.is_blocked());
}
