//! Crate `flow`: contrato con el motor de workflows externo
//!
//! Este crate define los tipos que el wizard intercambia con el backend de
//! procesos (`CodeInfo`, `ProcessBuilder`, `ProcessNode`, `StoredFile`), el
//! contrato `FlowBackend` y una implementación en memoria útil para pruebas
//! (`InMemoryFlowBackend`).
//!
//! Diseño resumido:
//! - El backend resuelve una etiqueta de código a un `ProcessBuilder`; el
//!   llamador lo completa y lo devuelve con `submit`, obteniendo un uuid.
//! - `load_node` falla con `FlowError::NotFound` cuando el uuid no existe.
//! - Ninguna operación reintenta: los errores se propagan tal cual.
//!
//! Ejemplo rápido:
//! ```rust
//! use flow::stubs::InMemoryFlowBackend;
//! use flow::FlowBackend;
//! let backend = InMemoryFlowBackend::new();
//! backend.register_code("chemshell@localhost", "localhost", "chemshell").unwrap();
//! let builder = backend.get_builder("chemshell@localhost").unwrap();
//! let job = backend.submit(builder).unwrap();
//! assert!(backend.load_node(&job).is_ok());
//! ```
pub mod domain;
pub mod errors;
pub mod repository;
pub mod stubs;

pub use domain::*;
pub use errors::*;
pub use repository::*;
pub use stubs::*;
