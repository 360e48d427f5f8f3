//! Árbol de controles de un paso del wizard.
//!
//! No hay toolkit gráfico: un paso se representa como una lista ordenada de
//! controles con nombre (`Control`), que guardan el valor transitorio de cada
//! widget. La vista se construye de forma perezosa la primera vez que el paso
//! se activa y, una vez construida, `build` ya no la toca.
use crate::errors::WorkflowError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Archivo elegido en un control de subida: nombre y contenido crudo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
  pub name: String,
  pub content: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerLevel {
  Info,
  Warning,
  Error,
}

/// Una fila del árbol de procesos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
  pub depth: usize,
  pub pk: i64,
  pub label: String,
  pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Control {
  Html(String),
  Banner { text: String, level: BannerLevel },
  Button { description: String, disabled: bool },
  FileUpload { description: String, file: Option<UploadedFile>, disabled: bool },
  Dropdown { description: String, options: Vec<String>, selected: Option<usize>, disabled: bool },
  Checkbox { description: String, value: bool, disabled: bool },
  Text { description: String, value: String, disabled: bool },
  IntSlider { description: String, value: u32, min: u32, max: u32, disabled: bool },
  Tabs { titles: Vec<String>, selected: usize },
  StructureViewer { formula: String, num_atoms: usize, periodic: bool },
  ProcessTree { entries: Vec<TreeEntry> },
  NodeView { title: String, inputs: Vec<String>, outputs: Vec<String> },
}

impl Control {
  pub fn html(text: &str) -> Self {
    Control::Html(text.to_string())
  }

  pub fn button(description: &str) -> Self {
    Control::Button { description: description.to_string(), disabled: false }
  }

  pub fn dropdown<S: AsRef<str>>(description: &str, options: &[S], selected: Option<usize>) -> Self {
    Control::Dropdown { description: description.to_string(),
                        options: options.iter().map(|o| o.as_ref().to_string()).collect(),
                        selected,
                        disabled: false }
  }

  pub fn text(description: &str, value: &str) -> Self {
    Control::Text { description: description.to_string(), value: value.to_string(), disabled: false }
  }

  pub fn checkbox(description: &str, value: bool) -> Self {
    Control::Checkbox { description: description.to_string(), value, disabled: false }
  }

  pub fn upload(description: &str) -> Self {
    Control::FileUpload { description: description.to_string(), file: None, disabled: false }
  }

  /// Controles que aceptan entrada del usuario y pueden deshabilitarse.
  pub fn is_input(&self) -> bool {
    matches!(self,
             Control::Button { .. }
             | Control::FileUpload { .. }
             | Control::Dropdown { .. }
             | Control::Checkbox { .. }
             | Control::Text { .. }
             | Control::IntSlider { .. })
  }

  pub fn is_disabled(&self) -> bool {
    match self {
      Control::Button { disabled, .. }
      | Control::FileUpload { disabled, .. }
      | Control::Dropdown { disabled, .. }
      | Control::Checkbox { disabled, .. }
      | Control::Text { disabled, .. }
      | Control::IntSlider { disabled, .. } => *disabled,
      _ => false,
    }
  }

  pub fn set_disabled(&mut self, value: bool) {
    match self {
      Control::Button { disabled, .. }
      | Control::FileUpload { disabled, .. }
      | Control::Dropdown { disabled, .. }
      | Control::Checkbox { disabled, .. }
      | Control::Text { disabled, .. }
      | Control::IntSlider { disabled, .. } => *disabled = value,
      _ => {}
    }
  }

  /// Opción elegida en un desplegable.
  pub fn selected_option(&self) -> Option<&str> {
    match self {
      Control::Dropdown { options, selected: Some(i), .. } => options.get(*i).map(String::as_str),
      _ => None,
    }
  }
}

/// Estado de construcción de la vista.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
  #[default]
  Unbuilt,
  Built,
}

#[derive(Default)]
struct ViewState {
  state: RenderState,
  controls: IndexMap<String, Control>,
  builds: usize,
}

/// Handle compartido sobre el árbol de controles de un paso. Los clones
/// apuntan a la misma vista, lo que permite a los observadores de los
/// modelos actualizarla.
#[derive(Clone, Default)]
pub struct View {
  inner: Rc<RefCell<ViewState>>,
}

impl View {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn render_state(&self) -> RenderState {
    self.inner.borrow().state
  }

  pub fn is_built(&self) -> bool {
    self.render_state() == RenderState::Built
  }

  /// Cuántas veces se construyó el árbol definitivo.
  pub fn build_count(&self) -> usize {
    self.inner.borrow().builds
  }

  /// Construye el árbol si aún no existe. Devuelve `false` (sin tocar nada)
  /// cuando la vista ya estaba construida.
  pub fn build(&self, controls: Vec<(&str, Control)>) -> bool {
    let mut st = self.inner.borrow_mut();
    if st.state == RenderState::Built {
      return false;
    }
    st.controls = controls.into_iter().map(|(k, c)| (k.to_string(), c)).collect();
    st.state = RenderState::Built;
    st.builds += 1;
    true
  }

  /// Muestra controles provisionales sin marcar la vista como construida.
  pub fn show_placeholder(&self, controls: Vec<(&str, Control)>) {
    let mut st = self.inner.borrow_mut();
    if st.state == RenderState::Built {
      return;
    }
    st.controls = controls.into_iter().map(|(k, c)| (k.to_string(), c)).collect();
  }

  /// Copia del control `key`.
  pub fn control(&self, key: &str) -> Option<Control> {
    self.inner.borrow().controls.get(key).cloned()
  }

  /// Copia completa del árbol, en orden.
  pub fn snapshot(&self) -> Vec<(String, Control)> {
    self.inner.borrow().controls.iter().map(|(k, c)| (k.clone(), c.clone())).collect()
  }

  pub fn keys(&self) -> Vec<String> {
    self.inner.borrow().controls.keys().cloned().collect()
  }

  /// Reemplaza el control `key` si existe.
  pub fn replace(&self, key: &str, control: Control) -> bool {
    match self.inner.borrow_mut().controls.get_mut(key) {
      Some(slot) => {
        *slot = control;
        true
      }
      None => false,
    }
  }

  /// Habilita o deshabilita todos los controles de entrada.
  pub fn set_inputs_disabled(&self, disabled: bool) {
    for c in self.inner.borrow_mut().controls.values_mut() {
      c.set_disabled(disabled);
    }
  }

  /// Aplica `f` sobre un control de entrada habilitado. Falla si el control
  /// no existe o está deshabilitado.
  fn edit<R>(&self, key: &str, f: impl FnOnce(&mut Control) -> Result<R, WorkflowError>) -> Result<R, WorkflowError> {
    let mut st = self.inner.borrow_mut();
    let control = st.controls.get_mut(key).ok_or_else(|| WorkflowError::UnknownControl(key.to_string()))?;
    if control.is_disabled() {
      return Err(WorkflowError::ControlDisabled(key.to_string()));
    }
    f(control)
  }

  fn invalid(key: &str, value: impl ToString) -> WorkflowError {
    WorkflowError::InvalidValue { control: key.to_string(), value: value.to_string() }
  }

  /// Selecciona por etiqueta una opción de un desplegable.
  pub fn select(&self, key: &str, option: &str) -> Result<(), WorkflowError> {
    self.edit(key, |c| match c {
          Control::Dropdown { options, selected, .. } => {
            let idx = options.iter().position(|o| o == option).ok_or_else(|| Self::invalid(key, option))?;
            *selected = Some(idx);
            Ok(())
          }
          _ => Err(Self::invalid(key, option)),
        })
  }

  /// Selecciona por índice una opción de un desplegable.
  pub fn select_index(&self, key: &str, index: usize) -> Result<(), WorkflowError> {
    self.edit(key, |c| match c {
          Control::Dropdown { options, selected, .. } if index < options.len() => {
            *selected = Some(index);
            Ok(())
          }
          _ => Err(Self::invalid(key, index)),
        })
  }

  pub fn set_text(&self, key: &str, text: &str) -> Result<(), WorkflowError> {
    self.edit(key, |c| match c {
          Control::Text { value, .. } => {
            *value = text.to_string();
            Ok(())
          }
          _ => Err(Self::invalid(key, text)),
        })
  }

  pub fn set_checked(&self, key: &str, checked: bool) -> Result<(), WorkflowError> {
    self.edit(key, |c| match c {
          Control::Checkbox { value, .. } => {
            *value = checked;
            Ok(())
          }
          _ => Err(Self::invalid(key, checked)),
        })
  }

  /// Fija el valor de un slider; valores fuera de rango se acotan.
  pub fn set_int(&self, key: &str, v: u32) -> Result<u32, WorkflowError> {
    self.edit(key, |c| match c {
          Control::IntSlider { value, min, max, .. } => {
            *value = v.clamp(*min, *max);
            Ok(*value)
          }
          _ => Err(Self::invalid(key, v)),
        })
  }

  pub fn set_file(&self, key: &str, upload: UploadedFile) -> Result<(), WorkflowError> {
    self.edit(key, |c| match c {
          Control::FileUpload { file, .. } => {
            *file = Some(upload);
            Ok(())
          }
          _ => Err(Self::invalid(key, &upload.name)),
        })
  }

  pub fn select_tab(&self, key: &str, index: usize) -> Result<(), WorkflowError> {
    let mut st = self.inner.borrow_mut();
    match st.controls.get_mut(key) {
      Some(Control::Tabs { titles, selected }) if index < titles.len() => {
        *selected = index;
        Ok(())
      }
      Some(_) => Err(Self::invalid(key, index)),
      None => Err(WorkflowError::UnknownControl(key.to_string())),
    }
  }

  // Lectores tipados: devuelven None si el control no existe o es de otro
  // tipo.

  pub fn selected(&self, key: &str) -> Option<String> {
    self.control(key).and_then(|c| c.selected_option().map(str::to_string))
  }

  pub fn text_value(&self, key: &str) -> Option<String> {
    match self.control(key) {
      Some(Control::Text { value, .. }) => Some(value),
      _ => None,
    }
  }

  pub fn checked(&self, key: &str) -> Option<bool> {
    match self.control(key) {
      Some(Control::Checkbox { value, .. }) => Some(value),
      _ => None,
    }
  }

  pub fn int_value(&self, key: &str) -> Option<u32> {
    match self.control(key) {
      Some(Control::IntSlider { value, .. }) => Some(value),
      _ => None,
    }
  }

  pub fn file(&self, key: &str) -> Option<UploadedFile> {
    match self.control(key) {
      Some(Control::FileUpload { file, .. }) => file,
      _ => None,
    }
  }

  pub fn tab(&self, key: &str) -> Option<usize> {
    match self.control(key) {
      Some(Control::Tabs { selected, .. }) => Some(selected),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn build_is_idempotent() {
    let view = View::new();
    assert!(view.build(vec![("a", Control::html("uno"))]));
    assert!(!view.build(vec![("a", Control::html("dos"))]));
    assert_eq!(view.control("a"), Some(Control::html("uno")));
    assert_eq!(view.build_count(), 1);
  }

  #[test]
  fn disabled_controls_reject_edits() {
    let view = View::new();
    view.build(vec![("t", Control::text("Label", ""))]);
    view.set_inputs_disabled(true);
    assert!(matches!(view.set_text("t", "x"), Err(WorkflowError::ControlDisabled(_))));
  }

  #[test]
  fn select_rejects_unknown_option() {
    let view = View::new();
    view.build(vec![("d", Control::dropdown("Code", &["a", "b"], None))]);
    assert!(view.select("d", "c").is_err());
    view.select("d", "b").unwrap();
    assert_eq!(view.selected("d").as_deref(), Some("b"));
  }
}
