//! Named app registry.

use super::{BackendApp, BackendError};
use crate::config::BackendConfig;
use std::collections::HashMap;
use std::sync::Mutex;

/// Owns the apps of one process (or one test). Each name can be initialized
/// once; later lookups return clones of the same connection.
#[derive(Debug, Default)]
pub struct AppRegistry {
    apps: Mutex<HashMap<String, BackendApp>>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializes the app named `cfg.app_name`, reading its credential.
    /// Fails with `AlreadyInitialized` without touching the credential file if
    /// the name is taken.
    pub fn initialize_app(&self, cfg: &BackendConfig) -> Result<BackendApp, BackendError> {
        let mut apps = self.apps.lock().unwrap_or_else(|e| e.into_inner());
        if apps.contains_key(&cfg.app_name) {
            return Err(BackendError::AlreadyInitialized(cfg.app_name.clone()));
        }
        let app = BackendApp::initialize(&cfg.app_name, cfg)?;
        apps.insert(cfg.app_name.clone(), app.clone());
        Ok(app)
    }

    /// Registers an app built elsewhere under its own name.
    pub fn register(&self, app: BackendApp) -> Result<BackendApp, BackendError> {
        let mut apps = self.apps.lock().unwrap_or_else(|e| e.into_inner());
        if apps.contains_key(app.name()) {
            return Err(BackendError::AlreadyInitialized(app.name().to_string()));
        }
        apps.insert(app.name().to_string(), app.clone());
        Ok(app)
    }

    pub fn get_app(&self, name: &str) -> Option<BackendApp> {
        let apps = self.apps.lock().unwrap_or_else(|e| e.into_inner());
        apps.get(name).cloned()
    }

    /// Removes the app so the name can be initialized again. Existing clones
    /// and handles keep working.
    pub fn delete_app(&self, name: &str) -> Option<BackendApp> {
        let mut apps = self.apps.lock().unwrap_or_else(|e| e.into_inner());
        apps.remove(name)
    }
}
