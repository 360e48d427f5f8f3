//! Entorno notebook que aloja el wizard.
use std::sync::Mutex;

/// Operaciones que el wizard pide al entorno anfitrión.
pub trait NotebookHost {
  /// Abre `url` en una pestaña nueva. No devuelve nada ni informa errores.
  fn open_link_in_new_tab(&self, url: &str);
}

/// Anfitrión en memoria que recuerda los enlaces abiertos.
#[derive(Default)]
pub struct RecordingHost {
  opened: Mutex<Vec<String>>,
}

impl RecordingHost {
  pub fn new() -> Self {
    Self::default()
  }

  /// Enlaces abiertos hasta ahora, en orden.
  pub fn opened(&self) -> Vec<String> {
    self.opened.lock().map(|v| v.clone()).unwrap_or_default()
  }
}

impl NotebookHost for RecordingHost {
  fn open_link_in_new_tab(&self, url: &str) {
    if let Ok(mut opened) = self.opened.lock() {
      opened.push(url.to_string());
    }
  }
}
