use crate::field::Field;
use chem_domain::{BasisQuality, MmTheory, QmMethod, QmTheory, SinglefileData, Task};

/// Modelo del paso de configuración del workflow ChemShell.
///
/// Si `use_qmmm` está activo, antes de enviar hacen falta un archivo de
/// campo de fuerza y una región QM no vacía.
#[derive(Clone, Debug, Default)]
pub struct ChemShellWorkflowModel {
  pub task: Field<Task>,
  pub qm_theory: Field<QmTheory>,
  pub qm_method: Field<QmMethod>,
  /// Teoría de la región MM; sólo se usa en modo combinado.
  pub mm_theory: Field<MmTheory>,
  pub use_qmmm: Field<bool>,
  /// Índices de átomos de la región QM.
  pub qm_region: Field<Vec<usize>>,
  pub basis_quality: Field<BasisQuality>,
  pub force_field: Field<Option<SinglefileData>>,
  /// Pide el hessiano además de los gradientes (que siempre se calculan).
  pub hessian: Field<bool>,
  pub submitted: Field<bool>,
}

impl ChemShellWorkflowModel {
  pub const DEFAULT_GUIDE: &'static str = "<p>ChemShell is a powerful tool for interfacing with both Quantum \
                                           Mechanical and Molecular Mechanics codes to perform calculations. At \
                                           its core you need to define a task and a theory (either QM or hybrid \
                                           QM/MM based).</p>";

  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_qmmm(&self) -> bool {
    self.use_qmmm.get()
  }

  pub fn has_force_field(&self) -> bool {
    self.force_field.with(|f| f.as_ref().map(|f| !f.is_empty()).unwrap_or(false))
  }

  pub fn has_qm_region(&self) -> bool {
    self.qm_region.with(|r| !r.is_empty())
  }

  /// Parsea `text` hacia `qm_region`. Si el texto es inválido deja la región
  /// vacía y devuelve `false` para que la vista limpie el campo de texto.
  pub fn update_qm_region(&self, text: &str) -> bool {
    match parse_qm_region(text) {
      Some(indices) => {
        self.qm_region.set(indices);
        true
      }
      None => {
        log::warn!("region QM invalida '{}', se descarta", text);
        self.qm_region.set(Vec::new());
        false
      }
    }
  }
}

/// Parsea una lista de índices separados por comas (`"1, 2,3"`). El texto
/// vacío es una lista vacía; cualquier elemento no numérico invalida todo.
pub fn parse_qm_region(text: &str) -> Option<Vec<usize>> {
  if text.trim().is_empty() {
    return Some(Vec::new());
  }
  text.split(',').map(|part| part.trim().parse::<usize>().ok()).collect()
}
