use super::trait_step::{StepState, WizardStep};
use crate::errors::WorkflowError;
use crate::field::Field;
use crate::models::{ProcessModel, ResultsModel};
use crate::view::{Control, TreeEntry, View};
use flow::domain::ProcessNode;
use flow::repository::FlowBackend;
use std::sync::Arc;
use uuid::Uuid;

pub const PLACEHOLDER: &str = "placeholder";
pub const TREE: &str = "tree";
pub const NODE: &str = "node";
pub const REFRESH: &str = "refresh";

/// Paso 4: árbol de ejecución del proceso enviado.
///
/// Mientras el modelo está bloqueado sólo se muestra un aviso. La vista
/// definitiva se construye una única vez, en cuanto `blocked` pasa a
/// `false`.
pub struct ResultsStep {
  model: ResultsModel,
  process: ProcessModel,
  view: View,
  /// Nodo mostrado en el detalle; por defecto el proceso raíz.
  selected_node: Field<Option<Uuid>>,
}

impl ResultsStep {
  pub fn new(model: ResultsModel, backend: Arc<dyn FlowBackend>) -> Self {
    let process = ProcessModel::new(backend, model.process_uuid.clone());
    let view = View::new();
    let selected_node = Field::new(None);
    {
      let (view, process, selected_node) = (view.clone(), process.clone(), selected_node.clone());
      model.blocked.observe(move |blocked| {
                     if !*blocked {
                       if let Err(e) = build_live(&view, &process, &selected_node) {
                         log::error!("no se pudo construir la vista de resultados: {}", e);
                       }
                     }
                   });
    }
    Self { model, process, view, selected_node }
  }

  pub fn model(&self) -> &ResultsModel {
    &self.model
  }

  pub fn process(&self) -> &ProcessModel {
    &self.process
  }

  /// Vuelve a leer el árbol del backend. Sin proceso no hace nada.
  pub fn refresh(&self) -> Result<(), WorkflowError> {
    if self.model.is_blocked() || !self.view.is_built() {
      return Ok(());
    }
    let tree = self.process.tree()?;
    self.view.replace(TREE, tree_control(&tree));
    self.view.replace(NODE, node_control(&tree, self.selected_node.get()));
    log::debug!("arbol de procesos actualizado ({} nodos)", tree.len());
    Ok(())
  }

  /// Muestra el detalle del nodo `uuid`, que debe estar en el árbol.
  pub fn select_node(&self, uuid: Uuid) -> Result<(), WorkflowError> {
    if !self.view.is_built() {
      return Err(WorkflowError::NotRendered(self.title().to_string()));
    }
    let tree = self.process.tree()?;
    if !tree.iter().any(|(_, n)| n.uuid == uuid) {
      return Err(WorkflowError::InvalidValue { control: NODE.to_string(), value: uuid.to_string() });
    }
    self.selected_node.set(Some(uuid));
    self.view.replace(NODE, node_control(&tree, Some(uuid)));
    Ok(())
  }
}

impl WizardStep for ResultsStep {
  fn title(&self) -> &str {
    "Results"
  }

  fn render(&self) -> Result<(), WorkflowError> {
    if self.view.is_built() {
      return Ok(());
    }
    if self.model.is_blocked() {
      self.view.show_placeholder(vec![(PLACEHOLDER, Control::html("<p>No process has been configured...</p>"))]);
      return Ok(());
    }
    build_live(&self.view, &self.process, &self.selected_node)?;
    Ok(())
  }

  fn view(&self) -> &View {
    &self.view
  }

  fn state(&self) -> StepState {
    if self.view.is_built() {
      StepState::Ready
    } else {
      StepState::Init
    }
  }
}

fn build_live(view: &View, process: &ProcessModel, selected: &Field<Option<Uuid>>) -> Result<bool, WorkflowError> {
  if view.is_built() {
    return Ok(false);
  }
  let tree = process.tree()?;
  if selected.with(Option::is_none) {
    selected.set(tree.first().map(|(_, n)| n.uuid));
  }
  let built = view.build(vec![("info",
                               Control::html("<p>View the progress and results of the generated ChemShell \
                                              calculation process.</p>")),
                              (TREE, tree_control(&tree)),
                              (NODE, node_control(&tree, selected.get())),
                              (REFRESH, Control::button("Refresh")),]);
  log::debug!("vista de resultados construida");
  Ok(built)
}

fn tree_control(tree: &[(usize, ProcessNode)]) -> Control {
  Control::ProcessTree { entries: tree.iter()
                                      .map(|(depth, n)| TreeEntry { depth: *depth,
                                                                    pk: n.pk,
                                                                    label: n.label.clone(),
                                                                    state: n.state.to_string() })
                                      .collect() }
}

fn node_control(tree: &[(usize, ProcessNode)], selected: Option<Uuid>) -> Control {
  match tree.iter().map(|(_, n)| n).find(|n| Some(n.uuid) == selected) {
    Some(n) => Control::NodeView { title: format!("{} <{}> [{}]", n.process_type, n.pk, n.state),
                                   inputs: n.inputs.keys().cloned().collect(),
                                   outputs: n.outputs.keys().cloned().collect() },
    None => Control::NodeView { title: String::new(), inputs: Vec::new(), outputs: Vec::new() },
  }
}
