//! Orquestador del wizard: secuencia ordenada de pasos con, a lo sumo, uno
//! activo.
use crate::errors::WorkflowError;
use crate::step::WizardStep;
use std::rc::Rc;

pub struct Wizard {
  steps: Vec<Rc<dyn WizardStep>>,
  selected: Option<usize>,
}

impl Wizard {
  /// Crea el wizard sin paso seleccionado; ningún paso se construye aún.
  pub fn new(steps: Vec<Rc<dyn WizardStep>>) -> Self {
    Self { steps, selected: None }
  }

  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  pub fn selected(&self) -> Option<usize> {
    self.selected
  }

  pub fn titles(&self) -> Vec<String> {
    self.steps.iter().map(|s| s.title().to_string()).collect()
  }

  pub fn step(&self, index: usize) -> Option<&Rc<dyn WizardStep>> {
    self.steps.get(index)
  }

  /// Activa el paso `index` y lo construye si hace falta.
  pub fn select(&mut self, index: usize) -> Result<(), WorkflowError> {
    let step = self.steps.get(index).ok_or(WorkflowError::InvalidStep(index))?;
    self.selected = Some(index);
    log::debug!("paso activo: {} ({})", index, step.title());
    step.render()
  }
}
