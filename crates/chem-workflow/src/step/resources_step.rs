use super::trait_step::{ensure_rendered, ensure_submittable, lock, show_failure, StepState, WizardStep, MESSAGE, SUBMIT};
use crate::errors::{ValidationFailure, WorkflowError};
use crate::models::ComputationalResourcesModel;
use crate::view::{BannerLevel, Control, View};
use flow::repository::FlowBackend;
use std::cell::Cell;
use std::sync::Arc;

pub const CODE: &str = "code";
pub const CPUS: &str = "num_cpus";
pub const LABEL: &str = "label";
pub const DESCRIPTION: &str = "description";
pub const WARNING: &str = "warning";

const SUBMIT_LABEL: &str = "Submit Resources";

/// Paso 3: código del backend, CPUs y etiquetas del proceso.
pub struct ResourcesStep {
  model: ComputationalResourcesModel,
  backend: Arc<dyn FlowBackend>,
  /// Aviso del sondeo de plugins; si existe el envío queda deshabilitado.
  plugin_warning: Option<String>,
  view: View,
  state: Cell<StepState>,
}

impl ResourcesStep {
  pub fn new(model: ComputationalResourcesModel, backend: Arc<dyn FlowBackend>, plugin_warning: Option<String>) -> Self {
    Self { model, backend, plugin_warning, view: View::new(), state: Cell::new(StepState::Init) }
  }

  pub fn model(&self) -> &ComputationalResourcesModel {
    &self.model
  }

  /// Copia los controles al modelo. Sin código seleccionado el paso queda
  /// editable.
  pub fn submit(&self) -> Result<(), WorkflowError> {
    ensure_rendered(self)?;
    ensure_submittable(&self.view)?;

    let (min, _) = self.model.cpu_bounds();
    self.model.code.set(self.view.selected(CODE));
    self.model.set_num_cpus(self.view.int_value(CPUS).unwrap_or(min));
    self.model.label.set(self.view.text_value(LABEL).unwrap_or_default());
    self.model.description.set(self.view.text_value(DESCRIPTION).unwrap_or_default());

    if !self.model.has_code() {
      self.reject(&ValidationFailure::MissingCode);
      return Err(ValidationFailure::MissingCode.into());
    }
    lock(&self.view);
    self.model.submission_error.set(None);
    self.model.submitted.set(true);
    self.state.set(StepState::Success);
    log::info!("recursos enviados: codigo={:?} cpus={}", self.model.code.get(), self.model.num_cpus.get());
    Ok(())
  }

  /// Reabre el paso tras un envío rechazado y muestra el motivo.
  pub fn reject(&self, failure: &ValidationFailure) {
    log::warn!("{}", failure);
    show_failure(&self.view, &failure.to_string(), SUBMIT_LABEL);
    self.model.submission_error.set(Some(failure.to_string()));
    self.model.submitted.set(false);
    self.state.set(StepState::Failed);
  }
}

impl WizardStep for ResourcesStep {
  fn title(&self) -> &str {
    "Configure Computational Resources"
  }

  fn render(&self) -> Result<(), WorkflowError> {
    if self.view.is_built() {
      return Ok(());
    }
    let codes: Vec<String> = self.backend.list_codes()?.into_iter().map(|c| c.label).collect();
    let selected = self.model.code.with(|c| c.as_ref().and_then(|c| codes.iter().position(|l| l == c)));
    self.model.available_codes.set(codes.clone());

    let (min, max) = self.model.cpu_bounds();
    let warning = match &self.plugin_warning {
      Some(text) => Control::Banner { text: text.clone(), level: BannerLevel::Warning },
      None => Control::html(""),
    };
    let mut submit = Control::button(SUBMIT_LABEL);
    submit.set_disabled(self.plugin_warning.is_some());

    self.view.build(vec![("header", Control::html("<h3> Computational Resources Setup </h3>")),
                         ("guide", Control::html(ComputationalResourcesModel::DEFAULT_GUIDE)),
                         (WARNING, warning),
                         (CODE, Control::dropdown("Code", codes.as_slice(), selected)),
                         (CPUS,
                          Control::IntSlider { description: "CPUs".to_string(),
                                               value: self.model.num_cpus.get(),
                                               min,
                                               max,
                                               disabled: false }),
                         (LABEL, Control::text("Label", &self.model.label.get())),
                         (DESCRIPTION, Control::text("Description", &self.model.description.get())),
                         (MESSAGE, Control::html("")),
                         (SUBMIT, submit),]);
    self.state.set(StepState::Ready);
    log::debug!("paso '{}' construido con {} codigos", self.title(), codes.len());
    Ok(())
  }

  fn view(&self) -> &View {
    &self.view
  }

  fn state(&self) -> StepState {
    self.state.get()
  }
}
