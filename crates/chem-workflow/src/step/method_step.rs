use super::trait_step::{ensure_rendered, ensure_submittable, lock, show_failure, StepState, WizardStep, MESSAGE, SUBMIT};
use crate::errors::{ValidationFailure, WorkflowError};
use crate::models::ChemShellWorkflowModel;
use crate::view::{Control, UploadedFile, View};
use chem_domain::{BasisQuality, Choice, MmTheory, QmMethod, QmTheory, SinglefileData, Task, Theory};
use std::cell::Cell;

pub const TASK: &str = "task";
pub const GRADIENTS: &str = "gradients";
pub const HESSIAN: &str = "hessian";
pub const THEORY: &str = "theory";
pub const QM_THEORY: &str = "qm_theory";
pub const QM_METHOD: &str = "qm_method";
pub const MM_THEORY: &str = "mm_theory";
pub const BASIS: &str = "basis";
pub const QM_REGION: &str = "qm_region";
pub const FORCE_FIELD: &str = "force_field";

const SUBMIT_LABEL: &str = "Submit Options";

/// Paso 2: tarea y teoría del cálculo ChemShell.
///
/// Los valores de los controles son transitorios y se copian al modelo al
/// enviar el paso. La región QM es la excepción: se parsea en cada cambio.
pub struct MethodStep {
  model: ChemShellWorkflowModel,
  view: View,
  state: Cell<StepState>,
}

impl MethodStep {
  pub fn new(model: ChemShellWorkflowModel) -> Self {
    Self { model, view: View::new(), state: Cell::new(StepState::Init) }
  }

  pub fn model(&self) -> &ChemShellWorkflowModel {
    &self.model
  }

  /// Texto de la región QM. Si no se puede parsear, la región del modelo
  /// queda vacía y el campo de texto se limpia. Devuelve si el texto era
  /// válido.
  pub fn set_qm_region_text(&self, text: &str) -> Result<bool, WorkflowError> {
    ensure_rendered(self)?;
    self.view.set_text(QM_REGION, text)?;
    let valid = self.model.update_qm_region(text);
    if !valid {
      self.view.set_text(QM_REGION, "")?;
    }
    Ok(valid)
  }

  pub fn upload_force_field(&self, file: UploadedFile) -> Result<(), WorkflowError> {
    ensure_rendered(self)?;
    self.view.set_file(FORCE_FIELD, file)
  }

  /// Copia los controles al modelo y valida el modo combinado: con QM/MM
  /// hacen falta campo de fuerza y región QM.
  pub fn submit(&self) -> Result<(), WorkflowError> {
    ensure_rendered(self)?;
    ensure_submittable(&self.view)?;

    let task = self.view.tab(TASK).and_then(|i| Task::ALL.get(i).copied()).unwrap_or_default();
    let theory: Theory = self.choice(THEORY)?;
    let force_field = self.view
                          .file(FORCE_FIELD)
                          .map(|f| SinglefileData::from_upload(&f.name, f.content, "Force field file: "))
                          .transpose()?;

    self.model.task.set(task);
    self.model.use_qmmm.set(theory.is_combined());
    self.model.qm_theory.set(self.choice::<QmTheory>(QM_THEORY)?);
    self.model.qm_method.set(self.choice::<QmMethod>(QM_METHOD)?);
    self.model.mm_theory.set(self.choice::<MmTheory>(MM_THEORY)?);
    self.model.basis_quality.set(self.choice::<BasisQuality>(BASIS)?);
    self.model.hessian.set(self.view.checked(HESSIAN).unwrap_or(false));
    self.model.force_field.set(force_field);

    let failure = if !self.model.is_qmmm() {
      None
    } else if !self.model.has_force_field() {
      Some(ValidationFailure::MissingForceField)
    } else if !self.model.has_qm_region() {
      Some(ValidationFailure::EmptyQmRegion)
    } else {
      None
    };

    match failure {
      None => {
        lock(&self.view);
        self.model.submitted.set(true);
        self.state.set(StepState::Success);
        log::info!("opciones enviadas: tarea={} teoria={}", task, theory);
        Ok(())
      }
      Some(failure) => {
        log::warn!("{}", failure);
        self.model.submitted.set(false);
        show_failure(&self.view, &failure.to_string(), SUBMIT_LABEL);
        self.state.set(StepState::Failed);
        Err(failure.into())
      }
    }
  }

  fn choice<C: Choice + Default>(&self, key: &str) -> Result<C, WorkflowError> {
    match self.view.selected(key) {
      Some(label) => Ok(C::from_label(&label)?),
      None => Ok(C::default()),
    }
  }
}

fn dropdown_for<C: Choice + PartialEq>(description: &str, current: C) -> Control {
  Control::dropdown(description, C::labels().as_slice(), C::ALL.iter().position(|c| *c == current))
}

impl WizardStep for MethodStep {
  fn title(&self) -> &str {
    "Configure Workflow"
  }

  fn render(&self) -> Result<(), WorkflowError> {
    if self.view.is_built() {
      return Ok(());
    }
    let m = &self.model;
    let task = Task::ALL.iter().position(|t| *t == m.task.get()).unwrap_or(0);
    let theory = if m.is_qmmm() { Theory::QmMm } else { Theory::Qm };
    let region = m.qm_region.with(|r| r.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(","));

    self.view.build(vec![("header", Control::html("<h3> ChemShell Workflow Setup </h3>")),
                         ("guide", Control::html(ChemShellWorkflowModel::DEFAULT_GUIDE)),
                         ("task_title", Control::html("<h4>Step 2.1: Task Setup</h4>")),
                         (TASK, Control::Tabs { titles: Task::labels().iter().map(|s| s.to_string()).collect(), selected: task }),
                         (GRADIENTS, Control::checkbox("Gradients", true)),
                         (HESSIAN, Control::checkbox("Hessian", m.hessian.get())),
                         ("theory_title", Control::html("<h4>Step 2.2: Theory Setup</h4>")),
                         (THEORY, dropdown_for("Theory", theory)),
                         (QM_THEORY, dropdown_for("QM Theory", m.qm_theory.get())),
                         (QM_METHOD, dropdown_for("QM Method", m.qm_method.get())),
                         (BASIS, dropdown_for("Basis Quality", m.basis_quality.get())),
                         (MM_THEORY, dropdown_for("MM Theory", m.mm_theory.get())),
                         (QM_REGION, Control::text("QM Region", &region)),
                         (FORCE_FIELD, Control::upload("Force field file: ")),
                         (MESSAGE, Control::html("")),
                         (SUBMIT, Control::button(SUBMIT_LABEL)),]);
    self.state.set(StepState::Ready);
    log::debug!("paso '{}' construido", self.title());
    Ok(())
  }

  fn view(&self) -> &View {
    &self.view
  }

  fn state(&self) -> StepState {
    self.state.get()
  }
}
