//! Botones de acceso rápido de la cabecera.
use crate::config::QuickLinkConfig;
use crate::errors::WorkflowError;
use crate::host::NotebookHost;
use crate::view::{Control, View};
use std::sync::Arc;

/// Fila de botones que abren notebooks o la documentación en una pestaña
/// nueva del anfitrión.
pub struct QuickAccessButtons {
  links: Vec<QuickLinkConfig>,
  host: Arc<dyn NotebookHost>,
  view: View,
}

impl QuickAccessButtons {
  pub fn new(links: Vec<QuickLinkConfig>, host: Arc<dyn NotebookHost>) -> Self {
    let view = View::new();
    let buttons: Vec<(String, Control)> =
      links.iter().map(|l| (button_key(&l.description), Control::button(&l.description))).collect();
    view.build(buttons.iter().map(|(k, c)| (k.as_str(), c.clone())).collect());
    Self { links, host, view }
  }

  pub fn view(&self) -> &View {
    &self.view
  }

  pub fn links(&self) -> &[QuickLinkConfig] {
    &self.links
  }

  /// Pulsa el botón con la descripción dada.
  pub fn click(&self, description: &str) -> Result<(), WorkflowError> {
    let link = self.links
                   .iter()
                   .find(|l| l.description == description)
                   .ok_or_else(|| WorkflowError::UnknownControl(button_key(description)))?;
    log::debug!("abriendo {}", link.target);
    self.host.open_link_in_new_tab(&link.target);
    Ok(())
  }
}

fn button_key(description: &str) -> String {
  format!("link:{}", description.to_lowercase().replace(' ', "_"))
}
