// Archivo: errors.rs
// Propósito: definir los errores del backend de procesos y el alias Result<T>
// usado por las APIs del crate.
use thiserror::Error;
/// Errores comunes del backend de flujos.
///
/// - `NotFound`: nodo, código o archivo inexistente.
/// - `InvalidInput`: el builder o la consulta no son aceptables.
/// - `Storage`: error al acceder al almacenamiento del backend.
/// - `Other`: cualquier otro error.
#[derive(Error, Debug)]
pub enum FlowError {
  /// Entidad no encontrada (por ejemplo, nodo de proceso o código).
  #[error("No encontrado: {0}")]
  NotFound(String),
  /// Entrada rechazada por el backend antes de crear el proceso.
  #[error("Entrada inválida: {0}")]
  InvalidInput(String),
  /// Error genérico de almacenamiento (BD, repositorio de archivos, etc.).
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  /// Otro tipo de error.
  #[error("Otro: {0}")]
  Other(String),
}
/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, FlowError>;
