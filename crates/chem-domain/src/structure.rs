// structure.rs
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Geometría molecular estructurada: símbolos, posiciones cartesianas (Å),
/// celda y banderas de periodicidad por eje.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureData {
  symbols: Vec<String>,
  positions: Vec<[f64; 3]>,
  cell: [[f64; 3]; 3],
  pbc: [bool; 3],
}

impl StructureData {
  pub fn new(symbols: Vec<String>,
             positions: Vec<[f64; 3]>,
             cell: [[f64; 3]; 3],
             pbc: [bool; 3])
             -> Result<Self, DomainError> {
    if symbols.is_empty() {
      return Err(DomainError::ValidationError("Una estructura no puede estar vacía".to_string()));
    }
    if symbols.len() != positions.len() {
      return Err(DomainError::ValidationError(format!("{} símbolos pero {} posiciones",
                                                      symbols.len(),
                                                      positions.len())));
    }
    if let Some(bad) = symbols.iter().find(|s| !is_element_symbol(s)) {
      return Err(DomainError::ValidationError(format!("Símbolo químico inválido: '{}'", bad)));
    }
    if positions.iter().flatten().any(|x| !x.is_finite()) {
      return Err(DomainError::ValidationError("Las posiciones deben ser finitas".to_string()));
    }
    Ok(Self { symbols, positions, cell, pbc })
  }

  /// Estructura molecular aislada (sin celda ni periodicidad).
  pub fn molecule(symbols: Vec<String>, positions: Vec<[f64; 3]>) -> Result<Self, DomainError> {
    Self::new(symbols, positions, [[0.0; 3]; 3], [false; 3])
  }

  pub fn symbols(&self) -> &[String] {
    &self.symbols
  }

  pub fn positions(&self) -> &[[f64; 3]] {
    &self.positions
  }

  pub fn cell(&self) -> &[[f64; 3]; 3] {
    &self.cell
  }

  pub fn pbc(&self) -> [bool; 3] {
    self.pbc
  }

  pub fn num_atoms(&self) -> usize {
    self.symbols.len()
  }

  /// Verdadero si alguna de las tres banderas de periodicidad está activa.
  pub fn is_periodic(&self) -> bool {
    self.pbc.iter().any(|p| *p)
  }

  /// Fórmula en notación de Hill (C, H y luego orden alfabético; sin
  /// carbono todo alfabético).
  pub fn formula(&self) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for s in &self.symbols {
      *counts.entry(s.as_str()).or_default() += 1;
    }
    let mut out = String::new();
    let mut push = |sym: &str, n: usize| {
      out.push_str(sym);
      if n > 1 {
        out.push_str(&n.to_string());
      }
    };
    if let Some(c) = counts.remove("C") {
      push("C", c);
      if let Some(h) = counts.remove("H") {
        push("H", h);
      }
    }
    for (sym, n) in counts {
      push(sym, n);
    }
    out
  }
}

fn is_element_symbol(s: &str) -> bool {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) if first.is_ascii_uppercase() => chars.all(|c| c.is_ascii_lowercase()) && s.len() <= 3,
    _ => false,
  }
}

impl fmt::Display for StructureData {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Structure({}, {} átomos, pbc={:?})", self.formula(), self.num_atoms(), self.pbc)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn water() -> StructureData {
    StructureData::molecule(vec!["O".into(), "H".into(), "H".into()],
                            vec![[0.0, 0.0, 0.0], [0.76, 0.59, 0.0], [-0.76, 0.59, 0.0]]).unwrap()
  }

  #[test]
  fn molecule_is_not_periodic() {
    assert!(!water().is_periodic());
  }

  #[test]
  fn any_pbc_flag_makes_it_periodic() {
    let s = StructureData::new(vec!["Si".into()], vec![[0.0; 3]], [[5.4, 0.0, 0.0], [0.0, 5.4, 0.0], [0.0, 0.0, 5.4]],
                               [false, false, true]).unwrap();
    assert!(s.is_periodic());
  }

  #[test]
  fn hill_formula() {
    assert_eq!(water().formula(), "H2O");
    let ethanol = StructureData::molecule(["C", "C", "O", "H", "H", "H", "H", "H", "H"].iter()
                                                                                     .map(|s| s.to_string())
                                                                                     .collect(),
                                          vec![[0.0; 3]; 9]).unwrap();
    assert_eq!(ethanol.formula(), "C2H6O");
  }

  #[test]
  fn rejects_mismatched_lengths_and_bad_symbols() {
    assert!(StructureData::molecule(vec!["O".into()], vec![]).is_err());
    assert!(StructureData::molecule(vec!["o".into()], vec![[0.0; 3]]).is_err());
    assert!(StructureData::molecule(vec![], vec![]).is_err());
  }
}
