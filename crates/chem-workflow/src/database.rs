//! Buscador de archivos almacenados en la base de datos del backend.
//!
//! Permite recuperar una estructura subida o calculada en una sesión
//! anterior. Filtra por fecha de creación y por origen del archivo
//! (`all`, `uploaded`, `calculated`); en modo `calculated` puede además
//! restringirse a los archivos de procesos con una etiqueta concreta.
use crate::errors::WorkflowError;
use crate::field::Field;
use crate::view::{Control, View};
use chem_domain::SinglefileData;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use flow::domain::{FileQuery, QueryMode, StoredFile};
use flow::repository::FlowBackend;
use std::cell::RefCell;
use std::sync::Arc;

pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";
pub const SEARCH: &str = "search";
pub const MODE: &str = "mode";
pub const PROCESS_LABEL: &str = "process_label";
pub const RESULTS: &str = "results";

pub const MODES: [&str; 3] = ["all", "uploaded", "calculated"];
const ALL_LABELS: &str = "All";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct DatabaseBrowser {
  backend: Arc<dyn FlowBackend>,
  view: View,
  matches: RefCell<Vec<StoredFile>>,
  /// Archivo elegido en la lista de resultados.
  pub selected: Field<Option<SinglefileData>>,
}

impl DatabaseBrowser {
  /// Construye los controles y lanza una primera búsqueda (últimos 7 días).
  pub fn new(backend: Arc<dyn FlowBackend>) -> Result<Self, WorkflowError> {
    Self::new_at(backend, Utc::now())
  }

  /// Igual que `new` con el instante actual fijado por el llamador.
  pub fn new_at(backend: Arc<dyn FlowBackend>, now: DateTime<Utc>) -> Result<Self, WorkflowError> {
    let mut labels = vec![ALL_LABELS.to_string()];
    labels.extend(backend.process_labels()?);

    let view = View::new();
    let mut label_dropdown = Control::dropdown("Process Label", labels.as_slice(), Some(0));
    label_dropdown.set_disabled(true);
    view.build(vec![("date_text", Control::html("<p>Select the date range:</p>")),
                    (START_DATE, Control::text("From: ", "")),
                    (END_DATE, Control::text("To: ", "")),
                    (SEARCH, Control::button("Search")),
                    (MODE, Control::dropdown("Mode", &MODES[..], Some(0))),
                    (PROCESS_LABEL, label_dropdown),
                    (RESULTS, Control::dropdown("", &[] as &[&str], None)),]);

    let browser = Self { backend, view, matches: RefCell::new(Vec::new()), selected: Field::new(None) };
    browser.search_at(now)?;
    Ok(browser)
  }

  pub fn view(&self) -> &View {
    &self.view
  }

  /// Cambia el modo de búsqueda y vuelve a buscar. La etiqueta de proceso
  /// sólo se puede elegir en modo `calculated`.
  pub fn set_mode(&self, mode: &str, now: DateTime<Utc>) -> Result<usize, WorkflowError> {
    self.view.select(MODE, mode)?;
    self.sync_label_dropdown();
    self.search_at(now)
  }

  pub fn set_process_label(&self, label: &str, now: DateTime<Utc>) -> Result<usize, WorkflowError> {
    self.view.select(PROCESS_LABEL, label)?;
    self.search_at(now)
  }

  pub fn set_date_range(&self, start: &str, end: &str) -> Result<(), WorkflowError> {
    self.view.set_text(START_DATE, start)?;
    self.view.set_text(END_DATE, end)
  }

  /// Botón "Search".
  pub fn search(&self) -> Result<usize, WorkflowError> {
    self.search_at(Utc::now())
  }

  /// Busca con el rango de fechas de los campos de texto. Si alguno no es
  /// una fecha `YYYY-MM-DD` válida se usan los últimos 7 días y se
  /// reescriben ambos campos. Devuelve el número de coincidencias.
  pub fn search_at(&self, now: DateTime<Utc>) -> Result<usize, WorkflowError> {
    if self.is_disabled() {
      return Err(WorkflowError::ControlDisabled(SEARCH.to_string()));
    }
    let start_text = self.view.text_value(START_DATE).unwrap_or_default();
    let end_text = self.view.text_value(END_DATE).unwrap_or_default();
    let (start, end) = match (parse_date(&start_text), parse_date(&end_text)) {
      (Some(s), Some(e)) => (s, e + Duration::hours(24)),
      _ => {
        let start = now - Duration::days(7);
        let end = now + Duration::hours(24);
        self.write_text(START_DATE, &start.format(DATE_FORMAT).to_string());
        self.write_text(END_DATE, &end.format(DATE_FORMAT).to_string());
        (start, end)
      }
    };

    let mode = match self.view.selected(MODE).as_deref() {
      Some("uploaded") => QueryMode::Uploaded,
      Some("calculated") => {
        let label = self.view.selected(PROCESS_LABEL).filter(|l| l != ALL_LABELS);
        QueryMode::Calculated { process_label: label }
      }
      _ => QueryMode::All,
    };
    let found = self.backend.query_files(&FileQuery { mode, start, end })?;
    log::debug!("busqueda en base de datos: {} archivos", found.len());

    let mut options = vec![format!("Select a Structure ({} found)", found.len())];
    options.extend(found.iter().map(option_label));
    self.view.replace(RESULTS, Control::dropdown("", options.as_slice(), Some(0)));

    let count = found.len();
    *self.matches.borrow_mut() = found;
    self.selected.set(None);
    Ok(count)
  }

  /// Elige la entrada `index` de la lista de resultados. La entrada 0 es el
  /// encabezado y deja la selección vacía.
  pub fn select_result(&self, index: usize) -> Result<(), WorkflowError> {
    self.view.select_index(RESULTS, index)?;
    let file = match index.checked_sub(1) {
      Some(i) => {
        let matches = self.matches.borrow();
        let stored = matches.get(i).ok_or_else(|| WorkflowError::InvalidValue { control: RESULTS.to_string(),
                                                                                   value: index.to_string() })?;
        Some(SinglefileData::from_stored(&stored.file.filename,
                                         stored.file.content.clone(),
                                         &stored.label,
                                         &stored.description)?)
      }
      None => None,
    };
    self.selected.set(file);
    Ok(())
  }

  pub fn options(&self) -> Vec<String> {
    match self.view.control(RESULTS) {
      Some(Control::Dropdown { options, .. }) => options,
      _ => Vec::new(),
    }
  }

  /// Deshabilita (o habilita) el buscador completo. Deshabilitado, ninguna
  /// búsqueda ni selección puede cambiar `selected`.
  pub fn disable(&self, disabled: bool) {
    self.view.set_inputs_disabled(disabled);
    if !disabled {
      self.sync_label_dropdown();
    }
  }

  pub fn is_disabled(&self) -> bool {
    self.view.control(SEARCH).map(|c| c.is_disabled()).unwrap_or(false)
  }

  /// La etiqueta de proceso sólo se puede elegir en modo `calculated`.
  fn sync_label_dropdown(&self) {
    let calculated = self.view.selected(MODE).as_deref() == Some("calculated");
    if let Some(mut c) = self.view.control(PROCESS_LABEL) {
      c.set_disabled(!calculated);
      self.view.replace(PROCESS_LABEL, c);
    }
  }

  fn write_text(&self, key: &str, value: &str) {
    if let Some(Control::Text { description, disabled, .. }) = self.view.control(key) {
      self.view.replace(key, Control::Text { description, value: value.to_string(), disabled });
    }
  }
}

fn parse_date(text: &str) -> Option<DateTime<Utc>> {
  let date = NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()?;
  Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// `PK: <pk> | <fecha> | <fórmula> | <tipo> | <label> | <descripción>`
fn option_label(f: &StoredFile) -> String {
  let parts: Vec<&str> = f.node_type.split('.').collect();
  let node_type = if parts.len() >= 2 { parts[parts.len() - 2] } else { f.node_type.as_str() };
  format!("PK: {} | {} | {} | {} | {} | {}",
          f.pk,
          f.ctime.format("%Y-%m-%d %H:%M"),
          f.formula.as_deref().unwrap_or(""),
          node_type,
          f.label,
          f.description)
}
