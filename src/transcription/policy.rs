//! Selection Policies
//!
//! Strategies that turn the plan's requested provider names into the ordered
//! list of providers the executor will try. Unknown names are dropped.

use super::{ProviderCatalog, TranscriptionProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Strategy for ordering and filtering candidate providers
pub trait SelectionPolicy: Send + Sync {
    /// Resolve requested names against the catalog
    fn resolve(&self, names: &[String], catalog: &ProviderCatalog) -> Vec<Arc<dyn TranscriptionProvider>>;

    /// Short identifier for logs
    fn name(&self) -> &'static str;
}

fn registered<'a>(
    names: &'a [String],
    catalog: &'a ProviderCatalog,
) -> impl Iterator<Item = Arc<dyn TranscriptionProvider>> + 'a {
    names.iter().filter_map(|name| catalog.lookup(name))
}

/// Available providers only, in requested order
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderPreservingPolicy;

impl SelectionPolicy for OrderPreservingPolicy {
    fn resolve(&self, names: &[String], catalog: &ProviderCatalog) -> Vec<Arc<dyn TranscriptionProvider>> {
        registered(names, catalog)
            .filter(|provider| provider.is_available())
            .collect()
    }

    fn name(&self) -> &'static str {
        "order-preserving"
    }
}

/// Every registered provider, available ones first.
///
/// Relative request order is kept inside each partition.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityFirstPolicy;

impl SelectionPolicy for AvailabilityFirstPolicy {
    fn resolve(&self, names: &[String], catalog: &ProviderCatalog) -> Vec<Arc<dyn TranscriptionProvider>> {
        let (mut available, unavailable): (Vec<_>, Vec<_>) =
            registered(names, catalog).partition(|provider| provider.is_available());
        available.extend(unavailable);
        available
    }

    fn name(&self) -> &'static str {
        "availability-first"
    }
}

/// Available providers that accept a fixed audio format, in requested order
#[derive(Debug, Clone)]
pub struct FormatAwarePolicy {
    format: String,
}

impl FormatAwarePolicy {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl SelectionPolicy for FormatAwarePolicy {
    fn resolve(&self, names: &[String], catalog: &ProviderCatalog) -> Vec<Arc<dyn TranscriptionProvider>> {
        registered(names, catalog)
            .filter(|provider| provider.is_available() && provider.supports_format(&self.format))
            .collect()
    }

    fn name(&self) -> &'static str {
        "format-aware"
    }
}

/// Policy selection as stored in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    OrderPreserving,
    AvailabilityFirst,
    FormatAware,
}

impl PolicyKind {
    /// Build the policy. `format` is only used by [`PolicyKind::FormatAware`].
    pub fn build(self, format: &str) -> Box<dyn SelectionPolicy> {
        match self {
            Self::OrderPreserving => Box::new(OrderPreservingPolicy),
            Self::AvailabilityFirst => Box::new(AvailabilityFirstPolicy),
            Self::FormatAware => Box::new(FormatAwarePolicy::new(format)),
        }
    }

    pub fn all() -> &'static [PolicyKind] {
        &[Self::OrderPreserving, Self::AvailabilityFirst, Self::FormatAware]
    }
}
