// file_data.rs
use crate::DomainError;
use sha2::{Digest, Sha256};
use std::fmt;

/// Archivo crudo subido por el usuario (estructura o campo de fuerza).
///
/// Guarda el nombre, el contenido completo y un hash SHA-256 del contenido
/// que permite comparar archivos sin mirar los bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglefileData {
  filename: String,
  content: Vec<u8>,
  label: String,
  description: String,
  content_hash: String,
}

impl SinglefileData {
  /// Construye el archivo a partir de una subida: exactamente un nombre y
  /// su contenido. El label por defecto es el nombre del archivo.
  pub fn from_upload(filename: &str, content: Vec<u8>, description: &str) -> Result<Self, DomainError> {
    let filename = filename.trim();
    if filename.is_empty() {
      return Err(DomainError::ValidationError("El nombre de archivo no puede estar vacío".to_string()));
    }
    if filename.contains('/') || filename.contains('\\') {
      return Err(DomainError::ValidationError(format!("Nombre de archivo inválido: {}", filename)));
    }
    let content_hash = Self::calculate_hash(&content);
    Ok(Self { filename: filename.to_string(),
              label: filename.to_string(),
              description: description.to_string(),
              content,
              content_hash })
  }

  /// Reconstruye un archivo ya guardado en el backend. El nombre puede
  /// incluir directorios (salidas de cálculos); sólo se exige que no esté
  /// vacío.
  pub fn from_stored(filename: &str, content: Vec<u8>, label: &str, description: &str) -> Result<Self, DomainError> {
    let filename = filename.trim();
    if filename.is_empty() {
      return Err(DomainError::ValidationError("El nombre de archivo no puede estar vacío".to_string()));
    }
    let content_hash = Self::calculate_hash(&content);
    Ok(Self { filename: filename.to_string(),
              label: label.to_string(),
              description: description.to_string(),
              content,
              content_hash })
  }

  fn calculate_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
  }

  pub fn filename(&self) -> &str {
    &self.filename
  }

  pub fn content(&self) -> &[u8] {
    &self.content
  }

  pub fn label(&self) -> &str {
    &self.label
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn content_hash(&self) -> &str {
    &self.content_hash
  }

  pub fn is_empty(&self) -> bool {
    self.content.is_empty()
  }

  /// Sufijos completos del nombre (`.pdb.gz` para `x.pdb.gz`), usados para
  /// elegir el lector al previsualizar.
  pub fn suffixes(&self) -> &str {
    let name = self.filename.rsplit(['/', '\\']).next().unwrap_or(&self.filename);
    match name.find('.') {
      Some(i) if i > 0 => &name[i..],
      _ => "",
    }
  }
}

impl fmt::Display for SinglefileData {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "SinglefileData({}, {} bytes)", self.filename, self.content.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_depends_only_on_content() {
    let a = SinglefileData::from_upload("a.xyz", b"1\n\nH 0 0 0".to_vec(), "").unwrap();
    let b = SinglefileData::from_upload("b.xyz", b"1\n\nH 0 0 0".to_vec(), "").unwrap();
    assert_eq!(a.content_hash(), b.content_hash());
    assert_eq!(a.content_hash().len(), 64);
  }

  #[test]
  fn rejects_empty_and_path_names() {
    assert!(SinglefileData::from_upload("  ", vec![1], "").is_err());
    assert!(SinglefileData::from_upload("../etc/passwd", vec![1], "").is_err());
  }

  #[test]
  fn stored_files_may_live_under_a_directory() {
    let f = SinglefileData::from_stored("out.d/relaxed.xyz", vec![1], "relaxed", "").unwrap();
    assert_eq!(f.filename(), "out.d/relaxed.xyz");
    assert_eq!(f.label(), "relaxed");
    assert_eq!(f.suffixes(), ".xyz");
    assert!(SinglefileData::from_stored(" ", vec![1], "", "").is_err());
  }

  #[test]
  fn suffixes_keep_compound_extensions() {
    let f = SinglefileData::from_upload("protein.pdb.gz", vec![0], "").unwrap();
    assert_eq!(f.suffixes(), ".pdb.gz");
    let g = SinglefileData::from_upload("FIELD", vec![0], "").unwrap();
    assert_eq!(g.suffixes(), "");
  }
}
