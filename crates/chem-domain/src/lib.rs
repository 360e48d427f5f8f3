mod errors;
mod file_data;
mod structure;
pub mod theory;

pub use errors::DomainError;
pub use file_data::SinglefileData;
pub use structure::StructureData;
pub use theory::{BasisQuality, Choice, MmTheory, QmMethod, QmTheory, Task, Theory};
