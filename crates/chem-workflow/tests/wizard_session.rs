use chem_workflow::app::{METHOD_STEP, RESOURCES_STEP, RESULTS_STEP, STRUCTURE_STEP};
use chem_workflow::step::{method_step, resources_step, structure_step};
use chem_workflow::view::{BannerLevel, Control, UploadedFile};
use chem_workflow::{MainApp, RecordingHost, StaticCapability, StepState, SubmitOutcome, ValidationFailure, WizardConfig,
                    WizardStep, WorkflowError, XyzPreviewer};
use flow::domain::StructureRef;
use flow::stubs::InMemoryFlowBackend;
use std::rc::Rc;
use std::sync::Arc;

const WATER: &str = "3\nwater\nO 0.0 0.0 0.0\nH 0.76 0.59 0.0\nH -0.76 0.59 0.0\n";

fn backend() -> Arc<InMemoryFlowBackend> {
  let backend = Arc::new(InMemoryFlowBackend::new());
  backend.register_code("pw-7.0", "localhost", "chemshell").unwrap();
  backend.install_plugin("chemshell").unwrap();
  backend
}

fn new_app(backend: &Arc<InMemoryFlowBackend>) -> (MainApp, Arc<RecordingHost>) {
  let host = Arc::new(RecordingHost::new());
  let app = MainApp::new(&WizardConfig::default(), backend.clone(), host.clone(), Rc::new(XyzPreviewer));
  (app, host)
}

fn water() -> UploadedFile {
  UploadedFile { name: "water.xyz".into(), content: WATER.as_bytes().to_vec() }
}

#[test]
fn wizard_starts_with_nothing_selected_or_built() {
  let backend = backend();
  let (app, _) = new_app(&backend);
  assert_eq!(app.wizard().selected(), None);
  assert_eq!(app.wizard().titles(),
             vec!["Select Structure", "Configure Workflow", "Configure Computational Resources", "Results"]);
  for i in 0..app.wizard().len() {
    let step = app.wizard().step(i).unwrap();
    assert!(!step.view().is_built());
    assert_eq!(step.state(), StepState::Init);
  }
}

#[test]
fn selecting_out_of_range_fails() {
  let backend = backend();
  let (mut app, _) = new_app(&backend);
  assert!(matches!(app.select_step(7), Err(WorkflowError::InvalidStep(7))));
  assert_eq!(app.wizard().selected(), None);
}

#[test]
fn qm_calculation_is_submitted_exactly_once() -> Result<(), WorkflowError> {
  let backend = backend();
  let (mut app, _) = new_app(&backend);

  app.select_step(STRUCTURE_STEP)?;
  app.structure_step().upload(water())?;
  app.submit_structure()?;
  // el método por defecto es QM, sin MM
  app.submit_method()?;
  assert_eq!(app.wizard().selected(), Some(RESOURCES_STEP));

  app.resources_step().view().select(resources_step::CODE, "pw-7.0")?;
  let job = match app.submit_resources()? {
    SubmitOutcome::Submitted(job) => job,
    other => panic!("expected submission, got {:?}", other),
  };

  assert!(app.model().submission().validate());
  let subs = backend.submissions();
  assert_eq!(subs.len(), 1);
  assert_eq!(subs[0].0, job);
  assert_eq!(app.model().results.process_uuid.get(), Some(job));
  assert!(!app.model().results.is_blocked());
  assert_eq!(app.wizard().selected(), Some(RESULTS_STEP));
  assert!(app.results_step().view().is_built());

  let builder = &subs[0].1;
  assert_eq!(builder.code.label, "pw-7.0");
  assert!(matches!(builder.structure, Some(StructureRef::File(ref f)) if f.filename == "water.xyz"));
  assert!(!builder.inputs.contains_key("mm_parameters"));

  // el paso de recursos queda bloqueado: no hay segundo envío
  assert!(matches!(app.submit_resources(), Err(WorkflowError::AlreadySubmitted)));
  assert_eq!(backend.submissions().len(), 1);
  Ok(())
}

#[test]
fn step_submits_select_the_following_step() -> Result<(), WorkflowError> {
  let backend = backend();
  let (mut app, _) = new_app(&backend);

  app.select_step(STRUCTURE_STEP)?;
  app.structure_step().upload(water())?;
  // el usuario mira otro paso antes de enviar la estructura
  app.select_step(RESOURCES_STEP)?;
  app.submit_structure()?;
  assert_eq!(app.wizard().selected(), Some(METHOD_STEP));

  app.select_step(RESULTS_STEP)?;
  app.submit_method()?;
  assert_eq!(app.wizard().selected(), Some(RESOURCES_STEP));
  Ok(())
}

#[test]
fn rejected_submission_reopens_resources_step() -> Result<(), WorkflowError> {
  let backend = backend();
  let (mut app, _) = new_app(&backend);

  // sin pasar por el paso de estructura
  app.select_step(RESOURCES_STEP)?;
  app.resources_step().view().select(resources_step::CODE, "pw-7.0")?;
  let outcome = app.submit_resources()?;
  assert_eq!(outcome, SubmitOutcome::Rejected(ValidationFailure::MissingStructure));

  let resources = &app.model().resources;
  assert!(!resources.submitted.get());
  assert_eq!(resources.submission_error.get().as_deref(), Some("No structure provided."));
  assert_eq!(app.resources_step().state(), StepState::Failed);
  assert!(matches!(app.resources_step().view().control("message"),
                   Some(Control::Banner { level: BannerLevel::Error, .. })));
  // sigue editable
  app.resources_step().view().set_text(resources_step::LABEL, "retry")?;
  assert!(backend.submissions().is_empty());
  assert!(app.model().results.is_blocked());
  Ok(())
}

#[test]
fn missing_code_is_reported_by_the_resources_step() -> Result<(), WorkflowError> {
  let backend = backend();
  let (mut app, _) = new_app(&backend);
  app.select_step(RESOURCES_STEP)?;
  assert_eq!(app.submit_resources()?, SubmitOutcome::Rejected(ValidationFailure::MissingCode));
  assert!(backend.submissions().is_empty());
  Ok(())
}

#[test]
fn missing_plugin_disables_submission() -> Result<(), WorkflowError> {
  let backend = Arc::new(InMemoryFlowBackend::new());
  backend.register_code("pw-7.0", "localhost", "chemshell").unwrap();
  let (mut app, _) = new_app(&backend);

  let warning = app.model().plugin_warning().expect("warning");
  assert!(warning.contains("chemshell"));
  assert!(matches!(app.header().control("warning"), Some(Control::Banner { level: BannerLevel::Warning, .. })));

  app.select_step(RESOURCES_STEP)?;
  assert!(app.resources_step().view().control("submit").unwrap().is_disabled());
  assert_eq!(app.submit_resources()?,
             SubmitOutcome::Rejected(ValidationFailure::PluginUnavailable("chemshell".into())));
  assert!(backend.submissions().is_empty());
  Ok(())
}

#[test]
fn static_capability_overrides_backend_probe() {
  let backend = backend();
  let host = Arc::new(RecordingHost::new());
  let app = MainApp::with_capability(&WizardConfig::default(),
                                     backend.clone(),
                                     host,
                                     Rc::new(XyzPreviewer),
                                     &StaticCapability::new("chemshell", false));
  assert!(!app.model().plugin_available());
}

#[test]
fn backend_failure_propagates() -> Result<(), WorkflowError> {
  let backend = backend();
  let (mut app, _) = new_app(&backend);
  app.select_step(STRUCTURE_STEP)?;
  app.structure_step().upload(water())?;
  app.submit_structure()?;
  app.submit_method()?;
  app.resources_step().view().select(resources_step::CODE, "pw-7.0")?;

  backend.set_offline(Some("daemon not running")).unwrap();
  assert!(matches!(app.submit_resources(), Err(WorkflowError::Flow(flow::FlowError::Storage(_)))));
  assert!(app.model().results.is_blocked());
  assert_eq!(app.model().results.process_uuid.get(), None);
  Ok(())
}

#[test]
fn render_is_idempotent_and_keeps_user_edits() -> Result<(), WorkflowError> {
  let backend = backend();
  let (mut app, _) = new_app(&backend);
  app.select_step(1)?;
  let view = app.method_step().view().clone();
  view.select(method_step::QM_THEORY, "ORCA")?;
  let before = view.snapshot();

  app.select_step(0)?;
  app.select_step(1)?;
  assert_eq!(view.snapshot(), before);
  assert_eq!(view.build_count(), 1);
  assert_eq!(view.selected(method_step::QM_THEORY).as_deref(), Some("ORCA"));

  // lo mismo para el paso de estructura
  app.structure_step().upload(water())?;
  let structure_view = app.structure_step().view().clone();
  let before = structure_view.snapshot();
  app.select_step(0)?;
  assert_eq!(structure_view.snapshot(), before);
  assert!(structure_view.file(structure_step::UPLOAD).is_some());
  Ok(())
}

#[test]
fn quick_links_open_in_new_tabs() {
  let backend = backend();
  let (app, host) = new_app(&backend);
  for description in ["New Calculation", "History", "Setup Resources", "Documentation"] {
    app.navigation().click(description).unwrap();
  }
  assert_eq!(host.opened(),
             vec!["../alc-ux/main.ipynb",
                  "../alc-ux/history.ipynb",
                  "../home/code_setup.ipynb",
                  "https://github.com/stfc/alc-ux"]);
  assert!(matches!(app.navigation().click("Logout"), Err(WorkflowError::UnknownControl(_))));
  assert_eq!(app.navigation().view().keys().len(), 4);
}
