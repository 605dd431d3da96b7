//! Provider Catalog
//!
//! Name-keyed collection of registered transcription providers.

use super::{GeminiProvider, OpenAiProvider, TranscriptionProvider};
use crate::config::ProvidersSettings;
use parking_lot::RwLock;
use std::sync::Arc;

/// Catalog errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Provider '{0}' is already registered")]
    DuplicateProvider(String),
}

/// Name-keyed provider collection.
///
/// Entries keep registration order. The map is guarded by a lock so the
/// catalog can be shared across concurrently executing jobs; the lock is
/// never held while a provider is called.
#[derive(Default)]
pub struct ProviderCatalog {
    entries: RwLock<Vec<(String, Arc<dyn TranscriptionProvider>)>>,
}

impl ProviderCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the built-in simulated providers
    pub fn with_builtin_providers(settings: &ProvidersSettings) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        catalog.register(Arc::new(OpenAiProvider::from_settings(&settings.openai)))?;
        catalog.register(Arc::new(GeminiProvider::from_settings(&settings.gemini)))?;
        Ok(catalog)
    }

    /// Register a provider under its own name
    pub fn register(&self, provider: Arc<dyn TranscriptionProvider>) -> Result<(), CatalogError> {
        let name = provider.name().to_string();
        let mut entries = self.entries.write();

        if entries.iter().any(|(existing, _)| *existing == name) {
            return Err(CatalogError::DuplicateProvider(name));
        }

        tracing::debug!("Registered provider {}", name);
        entries.push((name, provider));
        Ok(())
    }

    /// Remove a provider. Returns false if it was not registered.
    pub fn unregister(&self, name: &str) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|(existing, _)| existing != name);
        entries.len() != before
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn TranscriptionProvider>> {
        self.entries
            .read()
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, provider)| Arc::clone(provider))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().iter().any(|(existing, _)| existing == name)
    }

    /// All registered names, in registration order
    pub fn list_names(&self) -> Vec<String> {
        self.entries.read().iter().map(|(name, _)| name.clone()).collect()
    }

    /// Names of providers currently reporting themselves available
    pub fn list_available_names(&self) -> Vec<String> {
        self.snapshot()
            .into_iter()
            .filter(|(_, provider)| provider.is_available())
            .map(|(name, _)| name)
            .collect()
    }

    /// Providers that accept the given format tag, regardless of availability
    pub fn list_supporting_format(&self, format: &str) -> Vec<Arc<dyn TranscriptionProvider>> {
        self.snapshot()
            .into_iter()
            .filter(|(_, provider)| provider.supports_format(format))
            .map(|(_, provider)| provider)
            .collect()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    // Probes run on a copy so provider code never executes under the lock
    fn snapshot(&self) -> Vec<(String, Arc<dyn TranscriptionProvider>)> {
        self.entries.read().clone()
    }
}

impl std::fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCatalog")
            .field("providers", &self.list_names())
            .finish()
    }
}
