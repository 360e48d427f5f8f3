// Archivo: stubs.rs
// Propósito: implementación en memoria del backend para pruebas y para la
// demo de terminal.
//
// `InMemoryFlowBackend` registra códigos, plugins y archivos, acepta envíos
// y permite a las pruebas simular la evolución de los procesos (estado,
// subprocesos, salidas). No es durable.
use crate::domain::{CodeInfo, FileBlob, FileQuery, ProcessBuilder, ProcessNode, ProcessState, QueryMode, StoredFile};
use crate::errors::{FlowError, Result};
use crate::repository::FlowBackend;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Tipo de nodo con el que se registran los archivos subidos.
pub const SINGLEFILE_NODE_TYPE: &str = "data.core.singlefile.SinglefileData.";

// Backend mínimo en memoria (no durable)
pub struct InMemoryFlowBackend {
    /// Códigos registrados indexados por etiqueta.
    codes: Mutex<IndexMap<String, CodeInfo>>,
    /// Plugins instalados.
    plugins: Mutex<Vec<String>>,
    /// Nodos de proceso por uuid.
    nodes: Mutex<HashMap<Uuid, ProcessNode>>,
    /// Archivos almacenados en orden de inserción.
    files: Mutex<Vec<StoredFile>>,
    /// Builders recibidos por `submit`, con el uuid asignado.
    submissions: Mutex<Vec<(Uuid, ProcessBuilder)>>,
    next_pk: Mutex<i64>,
    /// Si contiene un mensaje, `submit` falla con `Storage`.
    offline: Mutex<Option<String>>,
}

impl InMemoryFlowBackend {
    /// Crea un backend vacío.
    pub fn new() -> Self {
        Self { codes: Mutex::new(IndexMap::new()),
               plugins: Mutex::new(Vec::new()),
               nodes: Mutex::new(HashMap::new()),
               files: Mutex::new(Vec::new()),
               submissions: Mutex::new(Vec::new()),
               next_pk: Mutex::new(1),
               offline: Mutex::new(None) }
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `FlowError::Storage`.
    fn lock<'a, T>(&'a self, m: &'a Mutex<T>) -> std::result::Result<MutexGuard<'a, T>, FlowError> {
        m.lock().map_err(|e| FlowError::Storage(format!("mutex poisoned: {:?}", e)))
    }

    fn next_pk(&self) -> Result<i64> {
        let mut pk = self.lock(&self.next_pk)?;
        let current = *pk;
        *pk += 1;
        Ok(current)
    }

    /// Registra un código ejecutable y lo devuelve.
    pub fn register_code(&self, label: &str, computer: &str, plugin: &str) -> Result<CodeInfo> {
        let code = CodeInfo { label: label.to_string(), computer: computer.to_string(), plugin: plugin.to_string() };
        self.lock(&self.codes)?.insert(label.to_string(), code.clone());
        Ok(code)
    }

    /// Marca un plugin como instalado.
    pub fn install_plugin(&self, name: &str) -> Result<()> {
        let mut plugins = self.lock(&self.plugins)?;
        if !plugins.iter().any(|p| p == name) {
            plugins.push(name.to_string());
        }
        Ok(())
    }

    /// Hace que los envíos fallen (`Some(motivo)`) o vuelvan a funcionar
    /// (`None`).
    pub fn set_offline(&self, reason: Option<&str>) -> Result<()> {
        *self.lock(&self.offline)? = reason.map(str::to_string);
        Ok(())
    }

    /// Guarda un archivo en la "base de datos" y devuelve el registro.
    pub fn store_file(&self,
                      file: FileBlob,
                      description: &str,
                      formula: Option<&str>,
                      created_by: Option<Uuid>,
                      ctime: DateTime<Utc>)
                      -> Result<StoredFile> {
        let stored = StoredFile { uuid: Uuid::new_v4(),
                                  pk: self.next_pk()?,
                                  ctime,
                                  label: file.filename.clone(),
                                  description: description.to_string(),
                                  node_type: SINGLEFILE_NODE_TYPE.to_string(),
                                  formula: formula.map(str::to_string),
                                  created_by,
                                  file };
        self.lock(&self.files)?.push(stored.clone());
        Ok(stored)
    }

    /// Inserta un nodo de proceso arbitrario (por ejemplo un proceso
    /// anterior que etiqueta archivos calculados).
    pub fn insert_process(&self, label: &str, process_type: &str, state: ProcessState) -> Result<Uuid> {
        let node = ProcessNode { uuid: Uuid::new_v4(),
                                 pk: self.next_pk()?,
                                 label: label.to_string(),
                                 description: String::new(),
                                 process_type: process_type.to_string(),
                                 state,
                                 ctime: Utc::now(),
                                 inputs: IndexMap::new(),
                                 outputs: IndexMap::new(),
                                 children: Vec::new() };
        let id = node.uuid;
        self.lock(&self.nodes)?.insert(id, node);
        Ok(id)
    }

    /// Crea un subproceso bajo `parent` y devuelve su uuid.
    pub fn add_child_process(&self, parent: &Uuid, label: &str, process_type: &str) -> Result<Uuid> {
        if !self.lock(&self.nodes)?.contains_key(parent) {
            return Err(FlowError::NotFound(format!("process {}", parent)));
        }
        let child = self.insert_process(label, process_type, ProcessState::Created)?;
        let mut nodes = self.lock(&self.nodes)?;
        if let Some(p) = nodes.get_mut(parent) {
            p.children.push(child);
        }
        Ok(child)
    }

    /// Cambia el estado de un proceso existente.
    pub fn set_state(&self, uuid: &Uuid, state: ProcessState) -> Result<()> {
        let mut nodes = self.lock(&self.nodes)?;
        let node = nodes.get_mut(uuid).ok_or(FlowError::NotFound(format!("process {}", uuid)))?;
        node.state = state;
        Ok(())
    }

    /// Enlaza una salida `key` -> `target` en el proceso `uuid`.
    pub fn add_output(&self, uuid: &Uuid, key: &str, target: Uuid) -> Result<()> {
        let mut nodes = self.lock(&self.nodes)?;
        let node = nodes.get_mut(uuid).ok_or(FlowError::NotFound(format!("process {}", uuid)))?;
        node.outputs.insert(key.to_string(), target);
        Ok(())
    }

    /// Builders recibidos hasta ahora, en orden de envío.
    pub fn submissions(&self) -> Vec<(Uuid, ProcessBuilder)> {
        self.submissions.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for InMemoryFlowBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowBackend for InMemoryFlowBackend {
    /// Devuelve un builder vacío para el código, o `NotFound`.
    fn get_builder(&self, code_label: &str) -> Result<ProcessBuilder> {
        let codes = self.lock(&self.codes)?;
        codes.get(code_label)
             .cloned()
             .map(ProcessBuilder::new)
             .ok_or(FlowError::NotFound(format!("code {}", code_label)))
    }

    /// Registra el proceso en estado `Created` y devuelve su uuid. Las
    /// entradas quedan enlazadas como nodos con uuid propio.
    fn submit(&self, builder: ProcessBuilder) -> Result<Uuid> {
        if let Some(reason) = self.lock(&self.offline)?.clone() {
            return Err(FlowError::Storage(reason));
        }
        if !self.lock(&self.codes)?.contains_key(&builder.code.label) {
            return Err(FlowError::NotFound(format!("code {}", builder.code.label)));
        }
        if builder.metadata.num_cpus == 0 {
            return Err(FlowError::InvalidInput("num_cpus debe ser mayor que cero".into()));
        }

        let mut inputs = IndexMap::new();
        inputs.insert("code".to_string(), Uuid::new_v4());
        if builder.structure.is_some() {
            inputs.insert("structure".to_string(), Uuid::new_v4());
        }
        for key in builder.inputs.keys().chain(builder.files.keys()) {
            inputs.insert(key.clone(), Uuid::new_v4());
        }

        let node = ProcessNode { uuid: Uuid::new_v4(),
                                 pk: self.next_pk()?,
                                 label: builder.metadata.label.clone(),
                                 description: builder.metadata.description.clone(),
                                 process_type: format!("aiida.calculations:{}", builder.code.plugin),
                                 state: ProcessState::Created,
                                 ctime: Utc::now(),
                                 inputs,
                                 outputs: IndexMap::new(),
                                 children: Vec::new() };
        let id = node.uuid;
        self.lock(&self.nodes)?.insert(id, node);
        self.lock(&self.submissions)?.push((id, builder));
        log::info!("[stub] proceso {} creado", id);
        Ok(id)
    }

    fn load_node(&self, uuid: &Uuid) -> Result<ProcessNode> {
        let nodes = self.lock(&self.nodes)?;
        nodes.get(uuid).cloned().ok_or(FlowError::NotFound(format!("process {}", uuid)))
    }

    fn list_codes(&self) -> Result<Vec<CodeInfo>> {
        Ok(self.lock(&self.codes)?.values().cloned().collect())
    }

    /// Filtra por rango de fechas y modo; devuelve los más recientes
    /// primero.
    fn query_files(&self, query: &FileQuery) -> Result<Vec<StoredFile>> {
        let files = self.lock(&self.files)?;
        let nodes = self.lock(&self.nodes)?;
        let mut out: Vec<StoredFile> =
            files.iter()
                 .filter(|f| f.ctime > query.start && f.ctime <= query.end)
                 .filter(|f| match &query.mode {
                     QueryMode::All => true,
                     QueryMode::Uploaded => f.created_by.is_none(),
                     QueryMode::Calculated { process_label } => match (f.created_by, process_label) {
                         (None, _) => false,
                         (Some(_), None) => true,
                         (Some(p), Some(label)) => nodes.get(&p).map(|n| &n.label == label).unwrap_or(false),
                     },
                 })
                 .cloned()
                 .collect();
        out.sort_by(|a, b| b.ctime.cmp(&a.ctime));
        Ok(out)
    }

    fn process_labels(&self) -> Result<Vec<String>> {
        let nodes = self.lock(&self.nodes)?;
        let labels: BTreeSet<String> = nodes.values().map(|n| n.label.clone()).filter(|l| !l.is_empty()).collect();
        Ok(labels.into_iter().collect())
    }

    fn installed_plugins(&self) -> Result<Vec<String>> {
        Ok(self.lock(&self.plugins)?.clone())
    }
}
