use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tope absoluto de CPUs que acepta el selector de recursos.
pub const MAX_CPUS: u32 = 128;

/// Botón de acceso rápido: texto, tooltip y destino.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickLinkConfig {
  pub description: String,
  pub tooltip: String,
  pub target: String,
}

impl QuickLinkConfig {
  fn new(description: &str, tooltip: &str, target: &str) -> Self {
    Self { description: description.to_string(), tooltip: tooltip.to_string(), target: target.to_string() }
  }
}

/// Configuracion del wizard.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WizardConfig {
  /// Nombre de la aplicacion dentro del directorio de apps.
  pub app_name: String,
  /// Directorio raiz de la aplicacion (donde viven los notebooks).
  pub app_dir: PathBuf,
  pub min_cpus: u32,
  pub max_cpus: u32,
  pub default_cpus: u32,
  /// Plugin del backend sin el cual no se puede enviar.
  pub required_plugin: String,
  pub quick_links: Vec<QuickLinkConfig>,
}

impl Default for WizardConfig {
  fn default() -> Self {
    let app_name = "alc-ux".to_string();
    WizardConfig { app_dir: PathBuf::from("apps").join(&app_name),
                   app_name,
                   min_cpus: 1,
                   max_cpus: MAX_CPUS,
                   default_cpus: 1,
                   required_plugin: "chemshell".to_string(),
                   quick_links: vec![QuickLinkConfig::new("New Calculation",
                                                          "Start a new calculation",
                                                          "../alc-ux/main.ipynb"),
                                     QuickLinkConfig::new("History",
                                                          "View Calculation History",
                                                          "../alc-ux/history.ipynb"),
                                     QuickLinkConfig::new("Setup Resources",
                                                          "Configure Computational Resources",
                                                          "../home/code_setup.ipynb"),
                                     QuickLinkConfig::new("Documentation",
                                                          "Open Documentation",
                                                          "https://github.com/stfc/alc-ux"),] }
  }
}

impl WizardConfig {
  /// Construye la configuracion desde el entorno. Carga `.env` si existe
  /// y lee `AIIDALAB_APPS`, `HOME` y `ALC_MAX_CPUS`.
  pub fn from_env() -> Self {
    dotenvy::dotenv().ok();
    let mut cfg = WizardConfig::default();
    cfg.app_dir = app_dir(std::env::var("AIIDALAB_APPS").ok().as_deref(),
                          std::env::var("HOME").ok().as_deref(),
                          &cfg.app_name);
    if let Ok(raw) = std::env::var("ALC_MAX_CPUS") {
      match raw.trim().parse::<u32>() {
        Ok(n) if n >= cfg.min_cpus => cfg.max_cpus = n.min(MAX_CPUS),
        _ => log::warn!("ALC_MAX_CPUS invalido ({}), se usa {}", raw, cfg.max_cpus),
      }
    }
    cfg.default_cpus = cfg.default_cpus.clamp(cfg.min_cpus, cfg.max_cpus);
    log::debug!("configuracion cargada: app_dir={}", cfg.app_dir.display());
    cfg
  }
}

/// Directorio raiz de la app: `$AIIDALAB_APPS/<app>` o, si no esta
/// definido, `$HOME/apps/<app>`.
pub fn app_dir(aiidalab_apps: Option<&str>, home: Option<&str>, app_name: &str) -> PathBuf {
  let base = match aiidalab_apps {
    Some(dir) if !dir.is_empty() => PathBuf::from(dir),
    _ => PathBuf::from(format!("{}/apps/", home.unwrap_or(""))),
  };
  base.join(app_name)
}
