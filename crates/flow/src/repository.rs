// Archivo: repository.rs
// Propósito: definir el trait `FlowBackend`, el contrato que debe cumplir el
// motor de workflows externo (AiiDA, un stub en memoria, etc.) para que el
// wizard pueda resolver códigos, enviar procesos y leer nodos persistidos.
use crate::domain::{CodeInfo, FileQuery, ProcessBuilder, ProcessNode, StoredFile};
use crate::errors::Result;
use uuid::Uuid;

/// Contrato mínimo del backend de procesos.
///
/// Las llamadas son opacas para el wizard: cualquier latencia de red o de
/// base de datos queda del lado de la implementación concreta.
pub trait FlowBackend: Send + Sync {
    /// Resuelve la etiqueta de un código registrado a un builder listo para
    /// completarse. Devuelve `NotFound` si el código no existe.
    fn get_builder(&self, code_label: &str) -> Result<ProcessBuilder>;

    /// Envía el proceso descrito por `builder` y devuelve su identificador
    /// (job handle).
    fn submit(&self, builder: ProcessBuilder) -> Result<Uuid>;

    /// Carga un nodo de proceso por uuid. Devuelve `NotFound` si no existe.
    fn load_node(&self, uuid: &Uuid) -> Result<ProcessNode>;

    /// Lista los códigos registrados (para el selector de recursos).
    fn list_codes(&self) -> Result<Vec<CodeInfo>>;

    /// Busca archivos almacenados que cumplan `query`.
    fn query_files(&self, query: &FileQuery) -> Result<Vec<StoredFile>>;

    /// Etiquetas de procesos existentes (para filtrar archivos calculados).
    fn process_labels(&self) -> Result<Vec<String>>;

    /// Nombres de los plugins de cálculo instalados en el backend.
    fn installed_plugins(&self) -> Result<Vec<String>>;
}
