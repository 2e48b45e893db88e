// ============================================================
// Layer 6 — Shared Model Handle
// ============================================================
// The one piece of process-wide state that can change: which
// classifier is currently serving.
//
//   current: RwLock<Option<Arc<dyn Classifier>>>
//
// Readers take the read lock only long enough to clone the Arc,
// then predict with no lock held. `reload` builds the new model
// first and swaps the reference under the write lock, so an
// in-flight request keeps the model it started with and a failed
// reload changes nothing.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::traits::{Classifier, ModelLoader};
use crate::error::ModelUnavailableError;

pub struct SharedModel {
    loader:  Arc<dyn ModelLoader>,
    current: RwLock<Option<Arc<dyn Classifier>>>,
}

impl SharedModel {
    /// A handle that loads on first use.
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self { loader, current: RwLock::new(None) }
    }

    /// The serving classifier, if one has been loaded.
    pub fn current(&self) -> Option<Arc<dyn Classifier>> {
        self.current.read().clone()
    }

    /// The serving classifier, loading it if nothing is loaded yet.
    pub fn get_or_load(&self) -> Result<Arc<dyn Classifier>, ModelUnavailableError> {
        if let Some(model) = self.current() {
            return Ok(model);
        }

        let mut slot = self.current.write();
        // Another thread may have loaded it while we waited
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = self.loader.load_model()?;
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    /// Load a fresh classifier and swap it in.
    pub fn reload(&self) -> Result<Arc<dyn Classifier>, ModelUnavailableError> {
        let model = self.loader.load_model().map_err(|e| {
            tracing::warn!("Reload failed, keeping previous model: {}", e);
            e
        })?;

        *self.current.write() = Some(Arc::clone(&model));
        tracing::info!("Model reloaded: {}", model.describe());
        Ok(model)
    }
}
