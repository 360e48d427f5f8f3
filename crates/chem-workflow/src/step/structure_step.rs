use super::trait_step::{ensure_rendered, ensure_submittable, lock, show_failure, StepState, WizardStep, MESSAGE, SUBMIT};
use crate::database::DatabaseBrowser;
use crate::errors::{ValidationFailure, WorkflowError};
use crate::models::StructureStepModel;
use crate::preview::StructurePreviewer;
use crate::view::{Control, UploadedFile, View};
use chem_domain::SinglefileData;
use flow::repository::FlowBackend;
use std::cell::{Cell, OnceCell};
use std::rc::Rc;
use std::sync::Arc;

pub const TABS: &str = "tabs";
pub const UPLOAD: &str = "upload";
pub const VIEWER: &str = "viewer";

const UPLOAD_DESCRIPTION: &str = "Structure file: ";
const SUBMIT_LABEL: &str = "Submit Structure";

/// Paso 1: elegir la estructura, subiendo un archivo o recuperándolo de la
/// base de datos del backend.
pub struct StructureStep {
  model: StructureStepModel,
  backend: Arc<dyn FlowBackend>,
  view: View,
  browser: OnceCell<DatabaseBrowser>,
  previewer: Rc<dyn StructurePreviewer>,
  state: Cell<StepState>,
}

impl StructureStep {
  pub fn new(model: StructureStepModel, backend: Arc<dyn FlowBackend>, previewer: Rc<dyn StructurePreviewer>) -> Self {
    let view = View::new();
    {
      // La vista previa sigue al archivo, venga de la subida o del buscador.
      let view = view.clone();
      let previewer = previewer.clone();
      model.structure_file.observe(move |file| {
                            view.replace(VIEWER, viewer_control(previewer.as_ref(), file.as_ref()));
                          });
    }
    Self { model, backend, view, browser: OnceCell::new(), previewer, state: Cell::new(StepState::Init) }
  }

  pub fn model(&self) -> &StructureStepModel {
    &self.model
  }

  /// Buscador de la base de datos; existe a partir del primer render.
  pub fn browser(&self) -> Option<&DatabaseBrowser> {
    self.browser.get()
  }

  /// El usuario eligió exactamente un archivo en el control de subida.
  pub fn upload(&self, file: UploadedFile) -> Result<(), WorkflowError> {
    ensure_rendered(self)?;
    let data = SinglefileData::from_upload(&file.name, file.content.clone(), UPLOAD_DESCRIPTION)?;
    self.view.set_file(UPLOAD, file)?;
    log::info!("archivo de estructura subido: {}", data.filename());
    self.model.structure_file.set(Some(data));
    Ok(())
  }

  /// Envía el paso. Sin estructura ni archivo el paso queda editable y
  /// `submitted` en `false`.
  pub fn submit(&self) -> Result<(), WorkflowError> {
    ensure_rendered(self)?;
    ensure_submittable(&self.view)?;
    if self.model.has_file() || self.model.has_structure() {
      lock(&self.view);
      if let Some(browser) = self.browser.get() {
        browser.disable(true);
      }
      self.model.submitted.set(true);
      self.state.set(StepState::Success);
      log::info!("paso de estructura enviado");
      Ok(())
    } else {
      let failure = ValidationFailure::MissingStructure;
      log::warn!("{}", failure);
      self.model.submitted.set(false);
      show_failure(&self.view, &failure.to_string(), SUBMIT_LABEL);
      self.state.set(StepState::Failed);
      Err(failure.into())
    }
  }
}

impl WizardStep for StructureStep {
  fn title(&self) -> &str {
    "Select Structure"
  }

  fn render(&self) -> Result<(), WorkflowError> {
    if self.view.is_built() {
      return Ok(());
    }
    let browser = DatabaseBrowser::new(self.backend.clone())?;
    let model = self.model.clone();
    browser.selected.observe(move |file| {
                      model.structure_file.set(file.clone());
                    });
    if self.browser.set(browser).is_err() {
      log::debug!("el buscador de '{}' ya existia", self.title());
    }

    let current = self.model.structure_file.get();
    self.view.build(vec![("guide", Control::html(StructureStepModel::DEFAULT_GUIDE)),
                         (TABS,
                          Control::Tabs { titles: vec!["Upload File".to_string(), "AiiDA Database".to_string()],
                                          selected: 0 }),
                         (UPLOAD, Control::upload(UPLOAD_DESCRIPTION)),
                         ("viewer_title", Control::html("<h2>Viewer:</h2>")),
                         (VIEWER, viewer_control(self.previewer.as_ref(), current.as_ref())),
                         (MESSAGE, Control::html("")),
                         (SUBMIT, Control::button(SUBMIT_LABEL)),]);
    self.state.set(StepState::Ready);
    log::debug!("paso '{}' construido", self.title());
    Ok(())
  }

  fn view(&self) -> &View {
    &self.view
  }

  fn state(&self) -> StepState {
    self.state.get()
  }
}

fn viewer_control(previewer: &dyn StructurePreviewer, file: Option<&SinglefileData>) -> Control {
  let Some(file) = file else {
    return Control::html("<p>No structure found...</p>");
  };
  match previewer.preview(file) {
    Ok(s) => Control::StructureViewer { formula: s.formula(), num_atoms: s.num_atoms(), periodic: s.is_periodic() },
    Err(e) => {
      log::debug!("sin vista previa para {}: {}", file.filename(), e);
      Control::html("<p>Could not visualise structure from file...</p>")
    }
  }
}
