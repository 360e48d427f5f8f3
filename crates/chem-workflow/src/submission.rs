//! Construcción y envío de la petición de cálculo ChemShell.
//!
//! Lee los modelos de los tres primeros pasos, comprueba las
//! precondiciones de envío y traduce las opciones elegidas a los
//! diccionarios de parámetros que espera el plugin.
use crate::errors::{ValidationFailure, WorkflowError};
use crate::models::{ChemShellWorkflowModel, ComputationalResourcesModel, ResultsModel, StructureStepModel};
use chem_domain::{Choice, SinglefileData};
use flow::domain::{FileBlob, ProcessBuilder, ProcessMetadata, StructureRef};
use flow::repository::FlowBackend;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

pub type Parameters = IndexMap<String, JsonValue>;

/// Petición efímera: se construye, se entrega al backend y se descarta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRequest {
  pub code_label: String,
  pub task: String,
  pub structure: StructureRef,
  pub qm_parameters: Parameters,
  /// Sólo en modo combinado QM/MM.
  pub mm_parameters: Option<Parameters>,
  /// Sólo en modo combinado QM/MM.
  pub qmmm_parameters: Option<Parameters>,
  pub calculation_parameters: Parameters,
  pub optimisation_parameters: Parameters,
  pub force_field: Option<FileBlob>,
  pub metadata: ProcessMetadata,
}

impl SubmissionRequest {
  /// Vuelca la petición en el builder resuelto por el backend.
  pub fn apply_to(self, builder: &mut ProcessBuilder) {
    builder.set_input("task", self.task)
           .set_input("qm_parameters", params_value(self.qm_parameters))
           .set_input("calculation_parameters", params_value(self.calculation_parameters))
           .set_input("optimisation_parameters", params_value(self.optimisation_parameters))
           .set_structure(self.structure);
    if let Some(mm) = self.mm_parameters {
      builder.set_input("mm_parameters", params_value(mm));
    }
    if let Some(qmmm) = self.qmmm_parameters {
      builder.set_input("qmmm_parameters", params_value(qmmm));
    }
    if let Some(ff) = self.force_field {
      builder.attach_file("force_field_file", ff);
    }
    builder.metadata = self.metadata;
  }
}

fn params_value(p: Parameters) -> JsonValue {
  JsonValue::Object(p.into_iter().collect())
}

fn blob(file: &SinglefileData) -> FileBlob {
  FileBlob::new(file.filename(), file.content().to_vec())
}

/// Vista de sólo lectura sobre los modelos que alimentan el envío.
pub struct SubmissionBuilder<'a> {
  structure: &'a StructureStepModel,
  workflow: &'a ChemShellWorkflowModel,
  resources: &'a ComputationalResourcesModel,
}

impl<'a> SubmissionBuilder<'a> {
  pub fn new(structure: &'a StructureStepModel,
             workflow: &'a ChemShellWorkflowModel,
             resources: &'a ComputationalResourcesModel)
             -> Self {
    Self { structure, workflow, resources }
  }

  /// Primera precondición incumplida, en el orden en que se muestran.
  pub fn check(&self) -> Result<(), ValidationFailure> {
    if !self.structure.has_structure() && !self.structure.has_file() {
      return Err(ValidationFailure::MissingStructure);
    }
    if self.workflow.is_qmmm() {
      if !self.workflow.has_force_field() {
        return Err(ValidationFailure::MissingForceField);
      }
      if !self.workflow.has_qm_region() {
        return Err(ValidationFailure::EmptyQmRegion);
      }
    }
    if !self.resources.has_code() {
      return Err(ValidationFailure::MissingCode);
    }
    Ok(())
  }

  pub fn validate(&self) -> bool {
    match self.check() {
      Ok(()) => true,
      Err(failure) => {
        log::warn!("validacion fallida: {}", failure);
        false
      }
    }
  }

  pub fn build_request(&self) -> Result<SubmissionRequest, WorkflowError> {
    self.check()?;
    let w = self.workflow;

    let structure = match (self.structure.structure.get(), self.structure.structure_file.get()) {
      (Some(s), _) => StructureRef::Geometry(serde_json::to_value(&s)?),
      (None, Some(f)) => StructureRef::File(blob(&f)),
      (None, None) => return Err(ValidationFailure::MissingStructure.into()),
    };

    let mut qm = Parameters::new();
    qm.insert("theory".into(), json!(w.qm_theory.get().label()));
    qm.insert("method".into(), json!(w.qm_method.get().label()));
    qm.insert("basis".into(), json!(w.basis_quality.get().basis_set()));

    let (mm, qmmm, force_field) = if w.is_qmmm() {
      let mut mm = Parameters::new();
      mm.insert("theory".into(), json!(w.mm_theory.get().label()));
      let mut qmmm = Parameters::new();
      qmmm.insert("qm_region".into(), json!(w.qm_region.get()));
      (Some(mm), Some(qmmm), w.force_field.get().as_ref().map(blob))
    } else {
      (None, None, None)
    };

    let mut calc = Parameters::new();
    calc.insert("gradients".into(), json!(true));
    calc.insert("hessian".into(), json!(w.hessian.get()));

    Ok(SubmissionRequest { code_label: self.resources.code.get().unwrap_or_default(),
                           task: w.task.get().key().to_string(),
                           structure,
                           qm_parameters: qm,
                           mm_parameters: mm,
                           qmmm_parameters: qmmm,
                           calculation_parameters: calc,
                           optimisation_parameters: Parameters::new(),
                           force_field,
                           metadata: ProcessMetadata { label: self.resources.label.get(),
                                                       description: self.resources.description.get(),
                                                       num_cpus: self.resources.num_cpus.get() } })
  }

  /// Envía el cálculo y registra el job handle en `results`. Los errores del
  /// backend se propagan sin reintentos.
  pub fn submit(&self, backend: &dyn FlowBackend, results: &ResultsModel) -> Result<Uuid, WorkflowError> {
    if results.process_uuid.with(Option::is_some) {
      return Err(WorkflowError::AlreadySubmitted);
    }
    let request = self.build_request()?;
    let mut builder = backend.get_builder(&request.code_label)?;
    request.apply_to(&mut builder);
    let uuid = backend.submit(builder)?;
    log::info!("proceso ChemShell enviado: {}", uuid);
    results.record_job(uuid)?;
    Ok(uuid)
  }
}
