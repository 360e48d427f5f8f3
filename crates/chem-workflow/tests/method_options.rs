use chem_domain::{BasisQuality, QmMethod, QmTheory, Task};
use chem_workflow::step::method_step::{BASIS, FORCE_FIELD, HESSIAN, QM_METHOD, QM_REGION, QM_THEORY, TASK, THEORY};
use chem_workflow::step::{MethodStep, StepState};
use chem_workflow::view::UploadedFile;
use chem_workflow::{ChemShellWorkflowModel, ValidationFailure, WizardStep, WorkflowError};

fn rendered() -> (MethodStep, ChemShellWorkflowModel) {
  let model = ChemShellWorkflowModel::new();
  let step = MethodStep::new(model.clone());
  step.render().unwrap();
  (step, model)
}

#[test]
fn qm_region_text_is_parsed_on_every_change() -> Result<(), WorkflowError> {
  let (step, model) = rendered();

  assert!(step.set_qm_region_text("1,2,3")?);
  assert_eq!(model.qm_region.get(), vec![1, 2, 3]);
  assert_eq!(step.view().text_value(QM_REGION).as_deref(), Some("1,2,3"));

  assert!(!step.set_qm_region_text("a,b")?);
  assert!(model.qm_region.get().is_empty());
  assert_eq!(step.view().text_value(QM_REGION).as_deref(), Some(""));

  assert!(step.set_qm_region_text("")?);
  assert!(model.qm_region.get().is_empty());
  Ok(())
}

#[test]
fn widget_values_reach_the_model_only_on_submit() -> Result<(), WorkflowError> {
  let (step, model) = rendered();
  let view = step.view();
  view.select_tab(TASK, 1)?;
  view.select(QM_THEORY, "PySCF")?;
  view.select(QM_METHOD, "DFT")?;
  view.select(BASIS, "Accurate")?;
  view.set_checked(HESSIAN, true)?;
  assert_eq!(model.task.get(), Task::SinglePoint);

  step.submit()?;
  assert_eq!(model.task.get(), Task::GeometryOptimisation);
  assert_eq!(model.qm_theory.get(), QmTheory::PySCF);
  assert_eq!(model.qm_method.get(), QmMethod::Dft);
  assert_eq!(model.basis_quality.get(), BasisQuality::Accurate);
  assert!(model.hessian.get());
  assert!(!model.is_qmmm());
  assert!(model.submitted.get());
  assert_eq!(step.state(), StepState::Success);
  Ok(())
}

#[test]
fn combined_mode_blocks_until_force_field_and_region() -> Result<(), WorkflowError> {
  let (step, model) = rendered();
  step.view().select(THEORY, "QM/MM")?;

  assert!(matches!(step.submit(), Err(WorkflowError::Validation(ValidationFailure::MissingForceField))));
  assert!(model.is_qmmm());
  assert!(!model.submitted.get());
  assert_eq!(step.state(), StepState::Failed);

  step.upload_force_field(UploadedFile { name: "FIELD".into(), content: b"units kcal".to_vec() })?;
  assert!(matches!(step.submit(), Err(WorkflowError::Validation(ValidationFailure::EmptyQmRegion))));

  step.set_qm_region_text("0,1,2")?;
  step.submit()?;
  assert!(model.submitted.get());
  assert!(model.has_force_field());

  // bloqueado tras el envío
  assert!(matches!(step.view().select(THEORY, "QM"), Err(WorkflowError::ControlDisabled(_))));
  assert!(matches!(step.set_qm_region_text("5"), Err(WorkflowError::ControlDisabled(_))));
  assert!(step.view().control(FORCE_FIELD).unwrap().is_disabled());
  Ok(())
}
