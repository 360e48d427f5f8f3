use crate::field::Field;
use chem_domain::{SinglefileData, StructureData};

/// Modelo del paso de estructura.
///
/// Guarda la geometría estructurada y/o el archivo crudo elegidos por el
/// usuario. Ambos son opcionales e independientes.
#[derive(Clone, Debug, Default)]
pub struct StructureStepModel {
  pub structure: Field<Option<StructureData>>,
  pub structure_file: Field<Option<SinglefileData>>,
  pub submitted: Field<bool>,
}

impl StructureStepModel {
  pub const DEFAULT_GUIDE: &'static str = "<p>Load in a structure to start the workflow.</p>";

  pub fn new() -> Self {
    Self::default()
  }

  /// Verdadero si se asignó una geometría estructurada, haya o no archivo.
  pub fn has_structure(&self) -> bool {
    self.structure.with(Option::is_some)
  }

  /// Verdadero si se adjuntó un archivo crudo de estructura.
  pub fn has_file(&self) -> bool {
    self.structure_file.with(Option::is_some)
  }

  /// Verdadero si la geometría tiene alguna bandera de periodicidad.
  pub fn is_periodic(&self) -> bool {
    self.structure.with(|s| s.as_ref().map(StructureData::is_periodic).unwrap_or(false))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn atom(pbc: [bool; 3]) -> StructureData {
    StructureData::new(vec!["Si".into()], vec![[0.0; 3]], [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]], pbc).unwrap()
  }

  #[test]
  fn has_structure_ignores_file() {
    let m = StructureStepModel::new();
    m.structure_file.set(Some(SinglefileData::from_upload("a.xyz", vec![1], "").unwrap()));
    assert!(m.has_file());
    assert!(!m.has_structure());
    m.structure.set(Some(atom([false; 3])));
    assert!(m.has_structure());
    m.structure_file.set(None);
    assert!(m.has_structure());
  }

  #[test]
  fn periodicity_follows_structure() {
    let m = StructureStepModel::new();
    assert!(!m.is_periodic());
    m.structure.set(Some(atom([true, false, false])));
    assert!(m.is_periodic());
    m.structure.set(Some(atom([false; 3])));
    assert!(!m.is_periodic());
  }
}
