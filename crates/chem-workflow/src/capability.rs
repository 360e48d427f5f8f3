//! Sondeo de capacidades opcionales del backend.
//!
//! El wizard no sabe cómo se detecta un plugin; sólo pregunta
//! `is_available()`. Si el plugin requerido falta se muestra un aviso y el
//! envío queda deshabilitado, pero el resto del wizard sigue funcionando.
use flow::repository::FlowBackend;
use std::sync::Arc;

pub trait Capability {
  /// Nombre del plugin o extensión que representa.
  fn name(&self) -> &str;

  fn is_available(&self) -> bool;
}

/// Capacidad con respuesta fija. Útil en pruebas y en la demo.
#[derive(Debug, Clone)]
pub struct StaticCapability {
  name: String,
  available: bool,
}

impl StaticCapability {
  pub fn new(name: &str, available: bool) -> Self {
    Self { name: name.to_string(), available }
  }
}

impl Capability for StaticCapability {
  fn name(&self) -> &str {
    &self.name
  }

  fn is_available(&self) -> bool {
    self.available
  }
}

/// Pregunta al backend si el plugin está instalado. El sondeo es de mejor
/// esfuerzo: un error del backend cuenta como "no disponible".
pub struct BackendPluginCapability {
  backend: Arc<dyn FlowBackend>,
  plugin: String,
}

impl BackendPluginCapability {
  pub fn new(backend: Arc<dyn FlowBackend>, plugin: &str) -> Self {
    Self { backend, plugin: plugin.to_string() }
  }
}

impl Capability for BackendPluginCapability {
  fn name(&self) -> &str {
    &self.plugin
  }

  fn is_available(&self) -> bool {
    match self.backend.installed_plugins() {
      Ok(plugins) => plugins.iter().any(|p| p == &self.plugin),
      Err(e) => {
        log::warn!("no se pudo consultar los plugins instalados: {}", e);
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use flow::stubs::InMemoryFlowBackend;

  #[test]
  fn backend_probe_follows_installed_plugins() {
    let backend = Arc::new(InMemoryFlowBackend::new());
    let cap = BackendPluginCapability::new(backend.clone(), "chemshell");
    assert!(!cap.is_available());
    backend.install_plugin("chemshell").unwrap();
    assert!(cap.is_available());
    assert_eq!(cap.name(), "chemshell");
  }
}
