// Archivo: domain.rs
// Propósito: tipos de dominio que intercambia el wizard con el backend de
// procesos: códigos registrados, builders de envío, nodos de proceso y
// archivos almacenados.
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Configuración ejecutable registrada en el backend (un "code").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInfo {
    /// Etiqueta completa, por ejemplo `chemshell@localhost`.
    pub label: String,
    /// Computadora donde está instalado el ejecutable.
    pub computer: String,
    /// Plugin de cálculo que consume el código (por ejemplo `chemshell`).
    pub plugin: String,
}

/// Blob de archivo tal como lo recibe el backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlob {
    pub filename: String,
    #[serde(with = "b64")]
    pub content: Vec<u8>,
}

impl FileBlob {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self { filename: filename.into(), content }
    }
}

/// Referencia a la estructura de entrada: geometría ya estructurada
/// (serializada por el dominio químico) o archivo crudo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StructureRef {
    Geometry(JsonValue),
    File(FileBlob),
}

/// Metadatos del proceso a enviar (opciones de scheduler y etiquetas).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessMetadata {
    pub label: String,
    pub description: String,
    pub num_cpus: u32,
}

impl Default for ProcessMetadata {
    fn default() -> Self {
        Self { label: String::new(), description: String::new(), num_cpus: 1 }
    }
}

/// Builder devuelto por el backend al resolver un código. El llamador lo
/// completa con entradas y lo devuelve a `FlowBackend::submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessBuilder {
    pub code: CodeInfo,
    pub inputs: IndexMap<String, JsonValue>,
    pub structure: Option<StructureRef>,
    pub files: IndexMap<String, FileBlob>,
    pub metadata: ProcessMetadata,
}

impl ProcessBuilder {
    pub fn new(code: CodeInfo) -> Self {
        Self { code,
               inputs: IndexMap::new(),
               structure: None,
               files: IndexMap::new(),
               metadata: ProcessMetadata::default() }
    }

    /// Asigna (o reemplaza) una entrada del proceso.
    pub fn set_input(&mut self, key: &str, value: impl Into<JsonValue>) -> &mut Self {
        self.inputs.insert(key.to_string(), value.into());
        self
    }

    pub fn set_structure(&mut self, structure: StructureRef) -> &mut Self {
        self.structure = Some(structure);
        self
    }

    /// Adjunta un archivo bajo el puerto de entrada `key`.
    pub fn attach_file(&mut self, key: &str, blob: FileBlob) -> &mut Self {
        self.files.insert(key.to_string(), blob);
        self
    }
}

/// Estado de ejecución de un proceso en el backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProcessState {
    Created,
    Waiting,
    Running,
    Finished { exit_status: i32 },
    Excepted,
    Killed,
}

impl ProcessState {
    /// Indica si el proceso ya no cambiará de estado.
    pub fn is_terminated(&self) -> bool {
        matches!(self, ProcessState::Finished { .. } | ProcessState::Excepted | ProcessState::Killed)
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::Created => write!(f, "created"),
            ProcessState::Waiting => write!(f, "waiting"),
            ProcessState::Running => write!(f, "running"),
            ProcessState::Finished { exit_status } => write!(f, "finished [{}]", exit_status),
            ProcessState::Excepted => write!(f, "excepted"),
            ProcessState::Killed => write!(f, "killed"),
        }
    }
}

/// Nodo de proceso persistido por el backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessNode {
    pub uuid: Uuid,
    pub pk: i64,
    pub label: String,
    pub description: String,
    pub process_type: String,
    pub state: ProcessState,
    pub ctime: DateTime<Utc>,
    /// Enlaces de entrada: etiqueta del enlace -> uuid del nodo.
    pub inputs: IndexMap<String, Uuid>,
    /// Enlaces de salida: etiqueta del enlace -> uuid del nodo.
    pub outputs: IndexMap<String, Uuid>,
    /// Subprocesos lanzados por este proceso, en orden de creación.
    pub children: Vec<Uuid>,
}

/// Archivo almacenado en la base de datos del backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    pub uuid: Uuid,
    pub pk: i64,
    pub ctime: DateTime<Utc>,
    pub label: String,
    pub description: String,
    pub node_type: String,
    /// Fórmula química guardada como extra, si se conoce.
    pub formula: Option<String>,
    /// Proceso que generó el archivo; `None` si fue subido por el usuario.
    pub created_by: Option<Uuid>,
    pub file: FileBlob,
}

/// Modo de búsqueda de archivos almacenados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    All,
    Uploaded,
    /// Archivos producidos por procesos; opcionalmente sólo los de
    /// procesos con la etiqueta dada.
    Calculated { process_label: Option<String> },
}

/// Filtro de consulta de archivos almacenados: modo y rango de fechas de
/// creación (`start` exclusivo, `end` inclusivo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileQuery {
    pub mode: QueryMode,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}
