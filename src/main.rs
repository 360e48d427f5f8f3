use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use chem_workflow::app::{SubmitOutcome, METHOD_STEP, RESOURCES_STEP, RESULTS_STEP, STRUCTURE_STEP};
use chem_workflow::step::{method_step, resources_step};
use chem_workflow::view::{Control, UploadedFile};
use chem_workflow::{MainApp, NotebookHost, WizardConfig, WizardStep, WorkflowError, XyzPreviewer};
use chrono::{Duration, Utc};
use flow::domain::{FileBlob, ProcessState};
use flow::stubs::InMemoryFlowBackend;

/// Anfitrión de terminal: no hay navegador, así que sólo informa el enlace.
struct TerminalHost;

impl NotebookHost for TerminalHost {
    fn open_link_in_new_tab(&self, url: &str) {
        println!("(abrir en pestaña nueva) {}", url);
    }
}

/// Menú interactivo que recorre una sesión del wizard contra el backend en
/// memoria.
///
/// Opciones soportadas:
/// 1) Ver pasos
/// 2) Seleccionar paso
/// 3) Subir archivo de estructura
/// 4) Elegir estructura de la base de datos
/// 5) Configurar método
/// 6) Configurar recursos
/// 7) Enviar paso activo
/// 8) Refrescar resultados
/// 9) Enlaces rápidos
/// 10) Ver controles del paso activo
/// 0) Salir
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).format_timestamp_millis()
                                                                                      .init();

    let config = WizardConfig::from_env();
    log::info!("directorio de la app: {}", config.app_dir.display());

    let backend = Arc::new(InMemoryFlowBackend::new());
    seed_backend(&backend)?;

    let mut app = MainApp::new(&config, backend.clone(), Arc::new(TerminalHost), Rc::new(XyzPreviewer));
    for (_, control) in app.header().snapshot() {
        print_control("", &control);
    }

    loop {
        println!("\n== ALC wizard ==");
        println!("1) Ver pasos");
        println!("2) Seleccionar paso");
        println!("3) Subir archivo de estructura");
        println!("4) Elegir estructura de la base de datos");
        println!("5) Configurar método");
        println!("6) Configurar recursos");
        println!("7) Enviar paso activo");
        println!("8) Refrescar resultados");
        println!("9) Enlaces rápidos");
        println!("10) Ver controles del paso activo");
        println!("0) Salir");
        let choice = prompt("Elige una opción: ")?;
        let selected = app.wizard().selected();
        match choice.trim() {
            "1" => {
                for (i, title) in app.wizard().titles().iter().enumerate() {
                    let marker = if app.wizard().selected() == Some(i) { "*" } else { " " };
                    let state = app.wizard().step(i).map(|s| s.state());
                    println!("{} {}) {} {:?}", marker, i, title, state.unwrap_or_default());
                }
            }
            "2" => {
                let idx = prompt("Índice del paso: ")?;
                match idx.trim().parse::<usize>() {
                    Ok(i) => {
                        if let Err(e) = app.select_step(i) {
                            eprintln!("Error seleccionando paso: {}", e);
                        }
                    }
                    Err(_) => eprintln!("Índice inválido"),
                }
            }
            "3" => {
                let path = prompt("Ruta del archivo: ")?;
                let path = path.trim();
                let content = match std::fs::read(path) {
                    Ok(c) => c,
                    Err(e) => {
                        eprintln!("No se pudo leer {}: {}", path, e);
                        continue;
                    }
                };
                let name = std::path::Path::new(path).file_name()
                                                      .map(|n| n.to_string_lossy().to_string())
                                                      .unwrap_or_default();
                if let Err(e) = app.structure_step().upload(UploadedFile { name, content }) {
                    eprintln!("Error subiendo archivo: {}", e);
                }
            }
            "4" => {
                let Some(browser) = app.structure_step().browser() else {
                    eprintln!("Selecciona primero el paso {}", STRUCTURE_STEP);
                    continue;
                };
                let mode = prompt("Modo (all/uploaded/calculated): ")?;
                if let Err(e) = browser.set_mode(mode.trim(), Utc::now()) {
                    eprintln!("Error en la búsqueda: {}", e);
                    continue;
                }
                for (i, option) in browser.options().iter().enumerate() {
                    println!("{}) {}", i, option);
                }
                let idx = prompt("Entrada: ")?;
                match idx.trim().parse::<usize>() {
                    Ok(i) => {
                        if let Err(e) = browser.select_result(i) {
                            eprintln!("Error eligiendo estructura: {}", e);
                        }
                    }
                    Err(_) => eprintln!("Entrada inválida"),
                }
            }
            "5" => {
                if app.wizard().selected() != Some(METHOD_STEP) {
                    eprintln!("Selecciona primero el paso {}", METHOD_STEP);
                    continue;
                }
                if let Err(e) = configure_method(&app) {
                    eprintln!("Error configurando método: {}", e);
                }
            }
            "6" => {
                if app.wizard().selected() != Some(RESOURCES_STEP) {
                    eprintln!("Selecciona primero el paso {}", RESOURCES_STEP);
                    continue;
                }
                if let Err(e) = configure_resources(&app) {
                    eprintln!("Error configurando recursos: {}", e);
                }
            }
            "7" => match selected {
                Some(STRUCTURE_STEP) => match app.submit_structure() {
                    Ok(()) => println!("Estructura enviada"),
                    Err(e) => eprintln!("{}", e),
                },
                Some(METHOD_STEP) => match app.submit_method() {
                    Ok(()) => println!("Opciones enviadas"),
                    Err(e) => eprintln!("{}", e),
                },
                Some(RESOURCES_STEP) => match app.submit_resources() {
                    Ok(SubmitOutcome::Submitted(uuid)) => println!("Proceso enviado: {}", uuid),
                    Ok(SubmitOutcome::Rejected(failure)) => eprintln!("Envío rechazado: {}", failure),
                    Err(WorkflowError::Flow(e)) => {
                        eprintln!("Error del backend: {}", e);
                        return Err(e.into());
                    }
                    Err(e) => eprintln!("{}", e),
                },
                Some(RESULTS_STEP) => println!("El paso de resultados no se envía"),
                _ => eprintln!("No hay paso activo"),
            },
            "8" => {
                if let Err(e) = app.results_step().refresh() {
                    eprintln!("Error refrescando: {}", e);
                }
                for (_, control) in app.results_step().view().snapshot() {
                    print_control("", &control);
                }
            }
            "9" => {
                let links = app.navigation().links().to_vec();
                for (i, link) in links.iter().enumerate() {
                    println!("{}) {} - {}", i, link.description, link.tooltip);
                }
                let idx = prompt("Enlace: ")?;
                match idx.trim().parse::<usize>().ok().and_then(|i| links.get(i)) {
                    Some(link) => {
                        if let Err(e) = app.navigation().click(&link.description) {
                            eprintln!("{}", e);
                        }
                    }
                    None => eprintln!("Enlace inválido"),
                }
            }
            "10" => match app.wizard().selected().and_then(|i| app.wizard().step(i)) {
                Some(step) => {
                    println!("-- {} --", step.title());
                    for (key, control) in step.view().snapshot() {
                        print_control(&key, &control);
                    }
                }
                None => eprintln!("No hay paso activo"),
            },
            "0" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

/// Código, plugin y un par de archivos para que la demo tenga algo que
/// buscar.
fn seed_backend(backend: &InMemoryFlowBackend) -> anyhow::Result<()> {
    backend.register_code("chemshell@localhost", "localhost", "chemshell")?;
    backend.install_plugin("chemshell")?;
    let water = "3\nwater\nO 0.0 0.0 0.0\nH 0.76 0.59 0.0\nH -0.76 0.59 0.0\n";
    backend.store_file(FileBlob::new("water.xyz", water.as_bytes().to_vec()),
                       "Structure file: ",
                       Some("H2O"),
                       None,
                       Utc::now() - Duration::days(1))?;
    let previous = backend.insert_process("relax",
                                          "aiida.calculations:chemshell",
                                          ProcessState::Finished { exit_status: 0 })?;
    backend.store_file(FileBlob::new("relaxed.xyz", water.as_bytes().to_vec()),
                       "",
                       Some("H2O"),
                       Some(previous),
                       Utc::now() - Duration::hours(2))?;
    Ok(())
}

fn configure_method(app: &MainApp) -> anyhow::Result<()> {
    let step = app.method_step();
    let view = step.view();
    let task = prompt("Tarea (0 = Single Point, 1 = Geometry Optimisation): ")?;
    if let Ok(i) = task.trim().parse::<usize>() {
        view.select_tab(method_step::TASK, i)?;
    }
    let theory = prompt("Teoría (QM o QM/MM): ")?;
    if !theory.trim().is_empty() {
        view.select(method_step::THEORY, theory.trim())?;
    }
    let basis = prompt("Calidad de la base (Fast/Accurate, enter para mantener): ")?;
    if !basis.trim().is_empty() {
        view.select(method_step::BASIS, basis.trim())?;
    }
    if view.selected(method_step::THEORY).as_deref() == Some("QM/MM") {
        let region = prompt("Región QM (índices separados por comas): ")?;
        if !step.set_qm_region_text(region.trim())? {
            eprintln!("Región QM inválida, se limpió el campo");
        }
        let path = prompt("Archivo de campo de fuerza: ")?;
        let path = path.trim();
        if !path.is_empty() {
            let content = std::fs::read(path)?;
            let name = std::path::Path::new(path).file_name()
                                                  .map(|n| n.to_string_lossy().to_string())
                                                  .unwrap_or_default();
            step.upload_force_field(UploadedFile { name, content })?;
        }
    }
    Ok(())
}

fn configure_resources(app: &MainApp) -> anyhow::Result<()> {
    let view = app.resources_step().view();
    let codes = app.resources_step().model().available_codes.get();
    for (i, code) in codes.iter().enumerate() {
        println!("{}) {}", i, code);
    }
    let idx = prompt("Código: ")?;
    if let Ok(i) = idx.trim().parse::<usize>() {
        view.select_index(resources_step::CODE, i)?;
    }
    let cpus = prompt("CPUs: ")?;
    if let Ok(n) = cpus.trim().parse::<u32>() {
        let effective = view.set_int(resources_step::CPUS, n)?;
        println!("CPUs: {}", effective);
    }
    let label = prompt("Etiqueta: ")?;
    view.set_text(resources_step::LABEL, label.trim())?;
    let description = prompt("Descripción: ")?;
    view.set_text(resources_step::DESCRIPTION, description.trim())?;
    Ok(())
}

fn print_control(key: &str, control: &Control) {
    match control {
        Control::Html(text) if text.is_empty() => {}
        Control::Html(text) => println!("{}", text),
        Control::Banner { text, level } => println!("[{:?}] {}", level, text),
        Control::ProcessTree { entries } => {
            for e in entries {
                println!("{}{} <{}> {}", "  ".repeat(e.depth), e.label, e.pk, e.state);
            }
        }
        other => println!("{}: {:?}", key, other),
    }
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
