use chrono::{Duration, Utc};
use flow::domain::{FileBlob, FileQuery, ProcessState, QueryMode, StructureRef};
use flow::stubs::InMemoryFlowBackend;
use flow::{FlowBackend, FlowError};
use serde_json::json;
use uuid::Uuid;

#[test]
fn unknown_code_is_not_found() {
  let backend = InMemoryFlowBackend::new();
  match backend.get_builder("missing@nowhere") {
    Err(FlowError::NotFound(msg)) => assert!(msg.contains("missing@nowhere")),
    other => panic!("expected NotFound, got {:?}", other),
  }
}

#[test]
fn submit_records_builder_and_creates_node() {
  let backend = InMemoryFlowBackend::new();
  backend.register_code("pw-7.0", "localhost", "chemshell").unwrap();

  let mut builder = backend.get_builder("pw-7.0").unwrap();
  builder.set_input("qm_parameters", json!({"theory": "NWChem"}))
         .set_structure(StructureRef::File(FileBlob::new("water.xyz", b"3\n\nO 0 0 0".to_vec())));
  builder.metadata.label = "water sp".into();
  builder.metadata.num_cpus = 4;

  let job = backend.submit(builder).unwrap();
  let node = backend.load_node(&job).unwrap();
  assert_eq!(node.label, "water sp");
  assert_eq!(node.state, ProcessState::Created);
  assert_eq!(node.process_type, "aiida.calculations:chemshell");
  assert!(node.inputs.contains_key("structure"));
  assert!(node.inputs.contains_key("qm_parameters"));

  let subs = backend.submissions();
  assert_eq!(subs.len(), 1);
  assert_eq!(subs[0].0, job);
  assert_eq!(subs[0].1.metadata.num_cpus, 4);
}

#[test]
fn load_node_missing_is_not_found() {
  let backend = InMemoryFlowBackend::new();
  assert!(matches!(backend.load_node(&Uuid::new_v4()), Err(FlowError::NotFound(_))));
}

#[test]
fn offline_backend_fails_submission() {
  let backend = InMemoryFlowBackend::new();
  backend.register_code("pw-7.0", "localhost", "chemshell").unwrap();
  backend.set_offline(Some("daemon caído")).unwrap();
  let builder = backend.get_builder("pw-7.0").unwrap();
  assert!(matches!(backend.submit(builder), Err(FlowError::Storage(_))));
  assert!(backend.submissions().is_empty());
}

#[test]
fn children_and_state_are_visible_through_load_node() {
  let backend = InMemoryFlowBackend::new();
  let root = backend.insert_process("root", "aiida.workflows:chemshell", ProcessState::Running).unwrap();
  let child = backend.add_child_process(&root, "opt", "aiida.calculations:chemshell").unwrap();
  backend.set_state(&child, ProcessState::Finished { exit_status: 0 }).unwrap();

  let node = backend.load_node(&root).unwrap();
  assert_eq!(node.children, vec![child]);
  assert!(backend.load_node(&child).unwrap().state.is_terminated());
  assert!(!node.state.is_terminated());
}

#[test]
fn query_files_filters_by_mode_and_date() {
  let backend = InMemoryFlowBackend::new();
  let now = Utc::now();
  let producer = backend.insert_process("geo-opt", "aiida.calculations:chemshell", ProcessState::Created).unwrap();
  backend.store_file(FileBlob::new("old.xyz", vec![1]), "", None, None, now - Duration::days(30)).unwrap();
  let uploaded = backend.store_file(FileBlob::new("up.xyz", vec![2]), "", Some("H2O"), None, now - Duration::days(1))
                        .unwrap();
  let calculated =
    backend.store_file(FileBlob::new("calc.xyz", vec![3]), "", None, Some(producer), now - Duration::hours(2)).unwrap();

  let range = |mode| FileQuery { mode, start: now - Duration::days(7), end: now + Duration::hours(24) };

  let all = backend.query_files(&range(QueryMode::All)).unwrap();
  assert_eq!(all.iter().map(|f| f.pk).collect::<Vec<_>>(), vec![calculated.pk, uploaded.pk]);

  let up = backend.query_files(&range(QueryMode::Uploaded)).unwrap();
  assert_eq!(up.len(), 1);
  assert_eq!(up[0].uuid, uploaded.uuid);

  let calc = backend.query_files(&range(QueryMode::Calculated { process_label: Some("geo-opt".into()) })).unwrap();
  assert_eq!(calc.len(), 1);
  assert_eq!(calc[0].uuid, calculated.uuid);

  let none = backend.query_files(&range(QueryMode::Calculated { process_label: Some("other".into()) })).unwrap();
  assert!(none.is_empty());
  assert_eq!(backend.process_labels().unwrap(), vec!["geo-opt".to_string()]);
}

#[test]
fn file_blob_serializes_content_as_base64() {
  let blob = FileBlob::new("a.txt", b"hola".to_vec());
  let v = serde_json::to_value(&blob).unwrap();
  assert_eq!(v["content"], json!("aG9sYQ=="));
  let back: FileBlob = serde_json::from_value(v).unwrap();
  assert_eq!(back, blob);
}
