use crate::errors::WorkflowError;
use crate::field::Field;
use flow::domain::ProcessNode;
use flow::errors::FlowError;
use flow::repository::FlowBackend;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Modelo del paso de resultados.
///
/// `blocked` empieza en `true` y pasa a `false` una única vez, cuando se
/// registra el job handle del proceso enviado.
#[derive(Clone, Debug)]
pub struct ResultsModel {
  pub process_uuid: Field<Option<Uuid>>,
  pub blocked: Field<bool>,
}

impl ResultsModel {
  pub fn new() -> Self {
    Self { process_uuid: Field::new(None), blocked: Field::new(true) }
  }

  /// Registra el proceso enviado y desbloquea la vista. El identificador es
  /// inmutable: un segundo registro falla con `AlreadySubmitted`.
  pub fn record_job(&self, uuid: Uuid) -> Result<(), WorkflowError> {
    if self.process_uuid.with(Option::is_some) {
      return Err(WorkflowError::AlreadySubmitted);
    }
    self.process_uuid.set(Some(uuid));
    self.blocked.set(false);
    Ok(())
  }

  pub fn is_blocked(&self) -> bool {
    self.blocked.get()
  }
}

impl Default for ResultsModel {
  fn default() -> Self {
    Self::new()
  }
}

/// Acceso de lectura al proceso asociado a un job handle.
///
/// Un uuid que el backend no conoce equivale a "sin proceso"; el resto de
/// errores del backend se propagan.
#[derive(Clone)]
pub struct ProcessModel {
  backend: Arc<dyn FlowBackend>,
  pub process_uuid: Field<Option<Uuid>>,
}

impl ProcessModel {
  pub fn new(backend: Arc<dyn FlowBackend>, process_uuid: Field<Option<Uuid>>) -> Self {
    Self { backend, process_uuid }
  }

  /// Nodo del proceso, o `None` si no hay uuid o el backend no lo tiene.
  pub fn process(&self) -> Result<Option<ProcessNode>, WorkflowError> {
    match self.process_uuid.get() {
      Some(uuid) => self.load(&uuid),
      None => Ok(None),
    }
  }

  pub fn has_process(&self) -> Result<bool, WorkflowError> {
    Ok(self.process()?.is_some())
  }

  /// Etiquetas de los enlaces de entrada del proceso.
  pub fn inputs(&self) -> Result<Vec<String>, WorkflowError> {
    Ok(self.process()?.map(|p| p.inputs.keys().cloned().collect()).unwrap_or_default())
  }

  /// Etiquetas de los enlaces de salida del proceso.
  pub fn outputs(&self) -> Result<Vec<String>, WorkflowError> {
    Ok(self.process()?.map(|p| p.outputs.keys().cloned().collect()).unwrap_or_default())
  }

  /// Árbol de ejecución en preorden: el proceso raíz a profundidad 0 y
  /// sus subprocesos debajo. Los hijos que el backend no encuentra se
  /// omiten.
  pub fn tree(&self) -> Result<Vec<(usize, ProcessNode)>, WorkflowError> {
    let mut out = Vec::new();
    let Some(root) = self.process()? else {
      return Ok(out);
    };
    let mut seen = HashSet::new();
    let mut stack = vec![(0usize, root)];
    while let Some((depth, node)) = stack.pop() {
      if !seen.insert(node.uuid) {
        continue;
      }
      for child in node.children.iter().rev() {
        if let Some(c) = self.load(child)? {
          stack.push((depth + 1, c));
        }
      }
      out.push((depth, node));
    }
    Ok(out)
  }

  fn load(&self, uuid: &Uuid) -> Result<Option<ProcessNode>, WorkflowError> {
    match self.backend.load_node(uuid) {
      Ok(node) => Ok(Some(node)),
      Err(FlowError::NotFound(_)) => Ok(None),
      Err(e) => Err(e.into()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use flow::domain::ProcessState;
  use flow::stubs::InMemoryFlowBackend;

  #[test]
  fn record_job_unblocks_once() {
    let m = ResultsModel::new();
    assert!(m.is_blocked());
    let id = Uuid::new_v4();
    m.record_job(id).unwrap();
    assert!(!m.is_blocked());
    assert_eq!(m.process_uuid.get(), Some(id));
    assert!(matches!(m.record_job(Uuid::new_v4()), Err(WorkflowError::AlreadySubmitted)));
    assert_eq!(m.process_uuid.get(), Some(id));
  }

  #[test]
  fn unknown_uuid_means_no_process() {
    let backend = Arc::new(InMemoryFlowBackend::new());
    let pm = ProcessModel::new(backend, Field::new(Some(Uuid::new_v4())));
    assert!(!pm.has_process().unwrap());
    assert!(pm.inputs().unwrap().is_empty());
    assert!(pm.tree().unwrap().is_empty());
  }

  #[test]
  fn tree_lists_children_in_preorder() {
    let backend = Arc::new(InMemoryFlowBackend::new());
    let root = backend.insert_process("root", "workflow", ProcessState::Running).unwrap();
    let a = backend.add_child_process(&root, "a", "calc").unwrap();
    backend.add_child_process(&a, "a1", "calc").unwrap();
    backend.add_child_process(&root, "b", "calc").unwrap();

    let pm = ProcessModel::new(backend, Field::new(Some(root)));
    let labels: Vec<(usize, String)> = pm.tree().unwrap().into_iter().map(|(d, n)| (d, n.label)).collect();
    assert_eq!(labels,
               vec![(0, "root".to_string()), (1, "a".to_string()), (2, "a1".to_string()), (1, "b".to_string())]);
  }
}
