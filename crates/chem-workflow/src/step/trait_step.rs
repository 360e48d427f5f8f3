use crate::errors::WorkflowError;
use crate::view::{Control, View};
use serde::{Deserialize, Serialize};

/// Estado de un paso del wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepState {
  /// Aún no se ha activado (controles sin construir).
  #[default]
  Init,
  /// Construido y editable.
  Ready,
  /// Enviado con éxito; los controles quedan bloqueados.
  Success,
  /// El último envío no pasó la validación; sigue editable.
  Failed,
}

/// Trait que representa un paso del wizard.
pub trait WizardStep {
  /// Título visible del paso
  fn title(&self) -> &str;

  /// Construye los controles la primera vez que el paso se activa. Llamarlo
  /// de nuevo no cambia nada.
  fn render(&self) -> Result<(), WorkflowError>;

  /// Árbol de controles del paso.
  fn view(&self) -> &View;

  fn state(&self) -> StepState;
}

// Claves compartidas por todos los pasos.
pub const MESSAGE: &str = "message";
pub const SUBMIT: &str = "submit";

/// Falla con `NotRendered` si el paso aún no construyó sus controles.
pub(crate) fn ensure_rendered(step: &dyn WizardStep) -> Result<(), WorkflowError> {
  if step.view().is_built() {
    Ok(())
  } else {
    Err(WorkflowError::NotRendered(step.title().to_string()))
  }
}

/// Falla con `ControlDisabled` si el botón de envío está deshabilitado.
pub(crate) fn ensure_submittable(view: &View) -> Result<(), WorkflowError> {
  match view.control(SUBMIT) {
    Some(c) if c.is_disabled() => Err(WorkflowError::ControlDisabled(SUBMIT.to_string())),
    Some(_) => Ok(()),
    None => Err(WorkflowError::UnknownControl(SUBMIT.to_string())),
  }
}

/// Bloquea los controles tras un envío correcto.
pub(crate) fn lock(view: &View) {
  view.set_inputs_disabled(true);
  view.replace(SUBMIT, Control::Button { description: "Submitted".to_string(), disabled: true });
  view.replace(MESSAGE, Control::html(""));
}

/// Muestra el error en línea y deja el paso editable.
pub(crate) fn show_failure(view: &View, text: &str, submit_label: &str) {
  view.set_inputs_disabled(false);
  view.replace(SUBMIT, Control::button(submit_label));
  view.replace(MESSAGE, Control::Banner { text: text.to_string(), level: crate::view::BannerLevel::Error });
}
