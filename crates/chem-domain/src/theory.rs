// theory.rs
//! Opciones de cálculo que el usuario elige en el wizard: tarea, teoría
//! (QM o híbrida QM/MM), código QM, método, teoría MM y calidad de la base.
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conjunto cerrado de opciones con etiqueta visible.
pub trait Choice: Sized + Copy + 'static {
  /// Todas las opciones, en el orden en que se presentan.
  const ALL: &'static [Self];

  fn label(&self) -> &'static str;

  /// Etiquetas visibles de todas las opciones.
  fn labels() -> Vec<&'static str> {
    Self::ALL.iter().map(|c| c.label()).collect()
  }

  /// Busca la opción por etiqueta (sin distinguir mayúsculas).
  fn from_label(s: &str) -> Result<Self, DomainError> {
    Self::ALL.iter()
             .copied()
             .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
             .ok_or_else(|| DomainError::ValidationError(format!("Opción desconocida: '{}'", s)))
  }
}

macro_rules! impl_choice {
  ($ty:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
    impl Choice for $ty {
      const ALL: &'static [Self] = &[$($ty::$variant),+];

      fn label(&self) -> &'static str {
        match self {
          $($ty::$variant => $label),+
        }
      }
    }

    impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
      }
    }

    impl FromStr for $ty {
      type Err = DomainError;

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        <$ty as Choice>::from_label(s)
      }
    }
  };
}

/// Tarea de ChemShell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
  #[default]
  SinglePoint,
  GeometryOptimisation,
}
impl_choice!(Task { SinglePoint => "Single Point", GeometryOptimisation => "Geometry Optimisation" });

impl Task {
  /// Clave corta usada por el plugin para la tarea.
  pub fn key(&self) -> &'static str {
    match self {
      Task::SinglePoint => "sp",
      Task::GeometryOptimisation => "opt",
    }
  }
}

/// Tratamiento del sistema: sólo cuántico o híbrido QM/MM. Un cálculo
/// puramente clásico no se puede enviar con las reglas de validación
/// actuales y no se ofrece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theory {
  #[default]
  Qm,
  QmMm,
}
impl_choice!(Theory { Qm => "QM", QmMm => "QM/MM" });

impl Theory {
  /// Verdadero sólo para el modo combinado QM/MM.
  pub fn is_combined(&self) -> bool {
    matches!(self, Theory::QmMm)
  }
}

/// Código cuántico que trata la región QM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QmTheory {
  #[default]
  NWChem,
  PySCF,
  Orca,
}
impl_choice!(QmTheory { NWChem => "NWChem", PySCF => "PySCF", Orca => "ORCA" });

/// Método electrónico de la región QM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QmMethod {
  #[default]
  Hf,
  Dft,
}
impl_choice!(QmMethod { Hf => "HF", Dft => "DFT" });

/// Código clásico que trata la región MM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MmTheory {
  #[default]
  DlPoly,
  Gulp,
}
impl_choice!(MmTheory { DlPoly => "DL_POLY", Gulp => "GULP" });

/// Calidad del conjunto base: rápido para pruebas, preciso para producción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisQuality {
  #[default]
  Fast,
  Accurate,
}
impl_choice!(BasisQuality { Fast => "Fast", Accurate => "Accurate" });

impl BasisQuality {
  /// Nombre del conjunto base que corresponde a la calidad.
  pub fn basis_set(&self) -> &'static str {
    match self {
      BasisQuality::Fast => "3-21G",
      BasisQuality::Accurate => "cc-pVTZ",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels_round_trip_through_from_str() {
    for t in Theory::ALL {
      assert_eq!(t.label().parse::<Theory>().unwrap(), *t);
    }
    assert_eq!("qm/mm".parse::<Theory>().unwrap(), Theory::QmMm);
    assert!("QMMM".parse::<Theory>().is_err());
  }

  #[test]
  fn option_lists_keep_presentation_order() {
    assert_eq!(Theory::labels(), vec!["QM", "QM/MM"]);
    assert_eq!(Task::labels(), vec!["Single Point", "Geometry Optimisation"]);
  }

  #[test]
  fn basis_depends_on_quality() {
    assert_eq!(BasisQuality::Fast.basis_set(), "3-21G");
    assert_eq!(BasisQuality::Accurate.basis_set(), "cc-pVTZ");
  }
}
