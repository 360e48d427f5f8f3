use crate::config::WizardConfig;
use crate::field::Field;

/// Modelo del paso de recursos computacionales.
#[derive(Clone, Debug)]
pub struct ComputationalResourcesModel {
  /// Etiqueta del código registrado en el backend.
  pub code: Field<Option<String>>,
  /// Códigos disponibles para elegir.
  pub available_codes: Field<Vec<String>>,
  pub num_cpus: Field<u32>,
  pub label: Field<String>,
  pub description: Field<String>,
  /// Mensaje del último rechazo de envío, si lo hubo.
  pub submission_error: Field<Option<String>>,
  pub submitted: Field<bool>,
  min_cpus: u32,
  max_cpus: u32,
}

impl ComputationalResourcesModel {
  pub const DEFAULT_GUIDE: &'static str = "<p>Configure the remote computational resources for the workflow.</p>";

  pub fn new(config: &WizardConfig) -> Self {
    Self { code: Field::new(None),
           available_codes: Field::new(Vec::new()),
           num_cpus: Field::new(config.default_cpus.clamp(config.min_cpus, config.max_cpus)),
           label: Field::new(String::new()),
           description: Field::new(String::new()),
           submission_error: Field::new(None),
           submitted: Field::new(false),
           min_cpus: config.min_cpus,
           max_cpus: config.max_cpus }
  }

  pub fn cpu_bounds(&self) -> (u32, u32) {
    (self.min_cpus, self.max_cpus)
  }

  /// Asigna el número de CPUs acotado a los límites configurados y
  /// devuelve el valor efectivo.
  pub fn set_num_cpus(&self, n: u32) -> u32 {
    let n = n.clamp(self.min_cpus, self.max_cpus);
    self.num_cpus.set(n);
    n
  }

  /// Verdadero si hay un código con etiqueta no vacía.
  pub fn has_code(&self) -> bool {
    self.code.with(|c| c.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false))
  }
}

impl Default for ComputationalResourcesModel {
  fn default() -> Self {
    Self::new(&WizardConfig::default())
  }
}
