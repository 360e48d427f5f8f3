//! Aplicación principal: modelos, pasos, wizard y navegación de una sesión.
use crate::capability::{BackendPluginCapability, Capability};
use crate::config::WizardConfig;
use crate::errors::{ValidationFailure, WorkflowError};
use crate::host::NotebookHost;
use crate::models::{ChemShellWorkflowModel, ComputationalResourcesModel, ResultsModel, StructureStepModel};
use crate::navigation::QuickAccessButtons;
use crate::preview::StructurePreviewer;
use crate::step::{MethodStep, ResourcesStep, ResultsStep, StructureStep, WizardStep};
use crate::submission::SubmissionBuilder;
use crate::view::{BannerLevel, Control, View};
use crate::wizard::Wizard;
use chrono::{Datelike, Utc};
use flow::repository::FlowBackend;
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

/// Resultado de pedir el envío del cálculo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
  /// El backend aceptó el proceso; contiene su job handle.
  Submitted(Uuid),
  /// No se envió nada; la precondición incumplida se muestra al usuario.
  Rejected(ValidationFailure),
}

/// Modelos de la sesión más el backend y el sondeo del plugin requerido.
pub struct MainAppModel {
  pub structure: StructureStepModel,
  pub workflow: ChemShellWorkflowModel,
  pub resources: ComputationalResourcesModel,
  pub results: ResultsModel,
  backend: Arc<dyn FlowBackend>,
  required_plugin: String,
  plugin_available: bool,
}

impl MainAppModel {
  pub fn new(config: &WizardConfig, backend: Arc<dyn FlowBackend>, capability: &dyn Capability) -> Self {
    let plugin_available = capability.is_available();
    if plugin_available {
      log::info!("plugin '{}' disponible", capability.name());
    } else {
      log::warn!("plugin '{}' no instalado; el envio queda deshabilitado", capability.name());
    }
    Self { structure: StructureStepModel::new(),
           workflow: ChemShellWorkflowModel::new(),
           resources: ComputationalResourcesModel::new(config),
           results: ResultsModel::new(),
           backend,
           required_plugin: capability.name().to_string(),
           plugin_available }
  }

  pub fn backend(&self) -> &Arc<dyn FlowBackend> {
    &self.backend
  }

  pub fn plugin_available(&self) -> bool {
    self.plugin_available
  }

  /// Aviso a mostrar cuando falta el plugin requerido.
  pub fn plugin_warning(&self) -> Option<String> {
    if self.plugin_available {
      None
    } else {
      Some(ValidationFailure::PluginUnavailable(self.required_plugin.clone()).to_string())
    }
  }

  pub fn submission(&self) -> SubmissionBuilder<'_> {
    SubmissionBuilder::new(&self.structure, &self.workflow, &self.resources)
  }

  /// Valida y, si todo está en orden, envía el cálculo una única vez.
  pub fn submit(&self) -> Result<SubmitOutcome, WorkflowError> {
    if self.results.process_uuid.with(Option::is_some) {
      return Err(WorkflowError::AlreadySubmitted);
    }
    if !self.plugin_available {
      return Ok(SubmitOutcome::Rejected(ValidationFailure::PluginUnavailable(self.required_plugin.clone())));
    }
    let builder = self.submission();
    if let Err(failure) = builder.check() {
      log::warn!("envio rechazado: {}", failure);
      self.resources.submission_error.set(Some(failure.to_string()));
      return Ok(SubmitOutcome::Rejected(failure));
    }
    let uuid = builder.submit(self.backend.as_ref(), &self.results)?;
    Ok(SubmitOutcome::Submitted(uuid))
  }
}

/// Índices de los pasos dentro del wizard.
pub const STRUCTURE_STEP: usize = 0;
pub const METHOD_STEP: usize = 1;
pub const RESOURCES_STEP: usize = 2;
pub const RESULTS_STEP: usize = 3;

pub struct MainApp {
  model: MainAppModel,
  header: View,
  navigation: QuickAccessButtons,
  wizard: Wizard,
  structure_step: Rc<StructureStep>,
  method_step: Rc<MethodStep>,
  resources_step: Rc<ResourcesStep>,
  results_step: Rc<ResultsStep>,
}

impl MainApp {
  /// Sesión contra `backend`, sondeando el plugin requerido en el propio
  /// backend.
  pub fn new(config: &WizardConfig,
             backend: Arc<dyn FlowBackend>,
             host: Arc<dyn NotebookHost>,
             previewer: Rc<dyn StructurePreviewer>)
             -> Self {
    let capability = BackendPluginCapability::new(backend.clone(), &config.required_plugin);
    Self::with_capability(config, backend, host, previewer, &capability)
  }

  pub fn with_capability(config: &WizardConfig,
                         backend: Arc<dyn FlowBackend>,
                         host: Arc<dyn NotebookHost>,
                         previewer: Rc<dyn StructurePreviewer>,
                         capability: &dyn Capability)
                         -> Self {
    let model = MainAppModel::new(config, backend.clone(), capability);

    let structure_step = Rc::new(StructureStep::new(model.structure.clone(), backend.clone(), previewer));
    let method_step = Rc::new(MethodStep::new(model.workflow.clone()));
    let resources_step =
      Rc::new(ResourcesStep::new(model.resources.clone(), backend.clone(), model.plugin_warning()));
    let results_step = Rc::new(ResultsStep::new(model.results.clone(), backend));

    let steps: Vec<Rc<dyn WizardStep>> = vec![structure_step.clone() as Rc<dyn WizardStep>,
                                              method_step.clone() as Rc<dyn WizardStep>,
                                              resources_step.clone() as Rc<dyn WizardStep>,
                                              results_step.clone() as Rc<dyn WizardStep>];
    let wizard = Wizard::new(steps);

    let header = View::new();
    let warning = match model.plugin_warning() {
      Some(text) => Control::Banner { text, level: BannerLevel::Warning },
      None => Control::html(""),
    };
    header.build(vec![("subtitle", Control::html("<h2 id='subtitle'>Welcome to the Ada Lovelace Center AiiDAlab App</h2>")),
                      ("warning", warning),
                      ("footer",
                       Control::Html(format!("<footer>Copyright (c) {} Ada Lovelace Centre (STFC)</footer>",
                                             Utc::now().year()))),]);

    let navigation = QuickAccessButtons::new(config.quick_links.clone(), host);

    Self { model, header, navigation, wizard, structure_step, method_step, resources_step, results_step }
  }

  pub fn model(&self) -> &MainAppModel {
    &self.model
  }

  pub fn header(&self) -> &View {
    &self.header
  }

  pub fn navigation(&self) -> &QuickAccessButtons {
    &self.navigation
  }

  pub fn wizard(&self) -> &Wizard {
    &self.wizard
  }

  pub fn structure_step(&self) -> &StructureStep {
    &self.structure_step
  }

  pub fn method_step(&self) -> &MethodStep {
    &self.method_step
  }

  pub fn resources_step(&self) -> &ResourcesStep {
    &self.resources_step
  }

  pub fn results_step(&self) -> &ResultsStep {
    &self.results_step
  }

  /// Selección explícita de un paso por el usuario.
  pub fn select_step(&mut self, index: usize) -> Result<(), WorkflowError> {
    self.wizard.select(index)
  }

  pub fn submit_structure(&mut self) -> Result<(), WorkflowError> {
    self.structure_step.submit()?;
    self.wizard.select(METHOD_STEP)?;
    Ok(())
  }

  pub fn submit_method(&mut self) -> Result<(), WorkflowError> {
    self.method_step.submit()?;
    self.wizard.select(RESOURCES_STEP)?;
    Ok(())
  }

  /// Envía el paso de recursos y, con él, el cálculo completo. Una vez
  /// enviado el proceso, cualquier llamada posterior falla con
  /// `AlreadySubmitted`.
  ///
  /// Un rechazo (validación o plugin ausente) deja el paso de recursos
  /// editable con el motivo a la vista y no es un error. Los fallos del
  /// backend al despachar sí lo son y se propagan.
  pub fn submit_resources(&mut self) -> Result<SubmitOutcome, WorkflowError> {
    if self.model.results.process_uuid.with(Option::is_some) {
      return Err(WorkflowError::AlreadySubmitted);
    }
    if !self.model.plugin_available() {
      return self.model.submit();
    }
    match self.resources_step.submit() {
      Ok(()) => {}
      Err(WorkflowError::Validation(failure)) => return Ok(SubmitOutcome::Rejected(failure)),
      Err(e) => return Err(e),
    }
    let outcome = self.model.submit()?;
    match &outcome {
      SubmitOutcome::Submitted(_) => {
        self.wizard.select(RESULTS_STEP)?;
      }
      SubmitOutcome::Rejected(failure) => self.resources_step.reject(failure),
    }
    Ok(outcome)
  }
}
