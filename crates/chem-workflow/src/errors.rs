use thiserror::Error;

/// Precondición de envío que no se cumple. El texto de `Display` es el
/// mensaje que se muestra en línea al usuario.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
  #[error("No structure provided.")]
  MissingStructure,
  #[error("No force field provided.")]
  MissingForceField,
  #[error("No QM region provided.")]
  EmptyQmRegion,
  #[error("No code selected.")]
  MissingCode,
  #[error("The {0} plugin is not installed; submission is disabled.")]
  PluginUnavailable(String),
}

// Errores comunes del wizard.
//
// Este enum centraliza los errores que pueden ocurrir al operar el wizard:
// errores del backend (`FlowError`), del dominio quimico (`DomainError`),
// validaciones previas al envio e interacciones invalidas con los
// controles.
#[derive(Error, Debug)]
pub enum WorkflowError {
  /// Errores originados por el backend de procesos. No se reintentan.
  #[error("Error de flujo: {0}")]
  Flow(#[from] flow::errors::FlowError),

  /// Errores originados por operaciones del dominio quimico.
  #[error("Error de dominio: {0}")]
  Domain(#[from] chem_domain::DomainError),

  /// Precondicion de envio no cumplida.
  #[error("Error de validacion: {0}")]
  Validation(ValidationFailure),

  /// Errores de serializacion/deserializacion JSON.
  #[error("Error de serializacion: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Indice de paso fuera de rango.
  #[error("Paso invalido: {0}")]
  InvalidStep(usize),

  /// Interaccion con un paso cuyos controles aun no se construyeron.
  #[error("El paso '{0}' no se ha renderizado")]
  NotRendered(String),

  /// El control no existe en la vista.
  #[error("Control desconocido: {0}")]
  UnknownControl(String),

  /// El control existe pero esta deshabilitado (paso ya enviado).
  #[error("Control deshabilitado: {0}")]
  ControlDisabled(String),

  /// Valor no admitido por el control (opcion inexistente, tipo distinto).
  #[error("Valor invalido para {control}: {value}")]
  InvalidValue { control: String, value: String },

  /// Este wizard ya envio su proceso; sólo se envía una vez.
  #[error("El proceso ya fue enviado")]
  AlreadySubmitted,
}

impl From<ValidationFailure> for WorkflowError {
  fn from(f: ValidationFailure) -> Self {
    WorkflowError::Validation(f)
  }
}
