//! Vista previa de archivos de estructura.
//!
//! Leer formatos de archivo químicos no es tarea del wizard: el paso de
//! estructura delega en un `StructurePreviewer`. `XyzPreviewer` entiende el
//! formato XYZ plano, suficiente para la demo y las pruebas.
use chem_domain::{DomainError, SinglefileData, StructureData};

pub trait StructurePreviewer {
  /// Intenta obtener una geometría a partir del archivo.
  fn preview(&self, file: &SinglefileData) -> Result<StructureData, DomainError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct XyzPreviewer;

impl StructurePreviewer for XyzPreviewer {
  fn preview(&self, file: &SinglefileData) -> Result<StructureData, DomainError> {
    if !file.suffixes().eq_ignore_ascii_case(".xyz") {
      return Err(DomainError::ValidationError(format!("Formato no soportado: '{}'", file.filename())));
    }
    let text = std::str::from_utf8(file.content())
      .map_err(|e| DomainError::ValidationError(format!("Archivo no es texto: {}", e)))?;
    parse_xyz(text)
  }
}

fn parse_xyz(text: &str) -> Result<StructureData, DomainError> {
  let mut lines = text.lines();
  let count: usize = lines.next()
                          .and_then(|l| l.trim().parse().ok())
                          .ok_or_else(|| DomainError::ValidationError("Cabecera XYZ inválida".to_string()))?;
  // línea de comentario
  lines.next();

  let mut symbols = Vec::with_capacity(count);
  let mut positions = Vec::with_capacity(count);
  for line in lines.take(count) {
    let cols: Vec<&str> = line.split_whitespace().collect();
    if cols.len() < 4 {
      return Err(DomainError::ValidationError(format!("Línea XYZ inválida: '{}'", line)));
    }
    let mut pos = [0.0; 3];
    for (slot, raw) in pos.iter_mut().zip(&cols[1..4]) {
      *slot = raw.parse()
                 .map_err(|_| DomainError::ValidationError(format!("Coordenada inválida: '{}'", raw)))?;
    }
    symbols.push(cols[0].to_string());
    positions.push(pos);
  }
  if symbols.len() != count {
    return Err(DomainError::ValidationError(format!("Se esperaban {} átomos, hay {}", count, symbols.len())));
  }
  StructureData::molecule(symbols, positions)
}

#[cfg(test)]
mod tests {
  use super::*;

  const WATER: &str = "3\nwater\nO 0.0 0.0 0.0\nH 0.76 0.59 0.0\nH -0.76 0.59 0.0\n";

  #[test]
  fn reads_plain_xyz() {
    let file = SinglefileData::from_upload("water.xyz", WATER.as_bytes().to_vec(), "").unwrap();
    let s = XyzPreviewer.preview(&file).unwrap();
    assert_eq!(s.num_atoms(), 3);
    assert_eq!(s.formula(), "H2O");
    assert!(!s.is_periodic());
  }

  #[test]
  fn rejects_other_formats_and_truncated_files() {
    let cif = SinglefileData::from_upload("x.cif", b"data_x".to_vec(), "").unwrap();
    assert!(XyzPreviewer.preview(&cif).is_err());
    let short = SinglefileData::from_upload("x.xyz", b"2\n\nO 0 0 0\n".to_vec(), "").unwrap();
    assert!(XyzPreviewer.preview(&short).is_err());
  }
}
