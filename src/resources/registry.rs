use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use super::collections::*;
use crate::filter::SortSpec;
use crate::store::Collection;

/// The generic operations a resource may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operations {
    pub list: bool,
    pub get: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

impl Operations {
    pub const ALL: Operations = Operations { list: true, get: true, create: true, update: true, delete: true };

    /// Read and edit only; records are provisioned elsewhere.
    pub const READ_UPDATE: Operations = Operations { list: true, get: true, create: false, update: true, delete: false };
}

/// Everything needed to serve one resource generically.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDescriptor {
    /// URL segment under `/api`.
    pub name: &'static str,
    #[serde(serialize_with = "collection_name")]
    pub collection: &'static Collection,
    /// Field used for external lookups; `_id` falls back to the store identity.
    pub id_field: &'static str,
    pub default_sort: Option<SortSpec>,
    /// Never returned and never writable through the generic path.
    pub hidden_fields: &'static [&'static str],
    pub operations: Operations,
}

fn collection_name<S: serde::Serializer>(collection: &&'static Collection, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(collection.name)
}

impl ResourceDescriptor {
    pub const fn new(name: &'static str, collection: &'static Collection, id_field: &'static str) -> Self {
        Self {
            name,
            collection,
            id_field,
            default_sort: None,
            hidden_fields: &[],
            operations: Operations::ALL,
        }
    }

    pub const fn sorted(self, spec: SortSpec) -> Self {
        Self { default_sort: Some(spec), ..self }
    }

    pub const fn hidden(self, hidden_fields: &'static [&'static str]) -> Self {
        Self { hidden_fields, ..self }
    }

    pub const fn operations(self, operations: Operations) -> Self {
        Self { operations, ..self }
    }

    pub fn path(&self) -> String {
        format!("/api/{}", self.name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Resource '{0}' is already registered with a different descriptor")]
    Duplicate(&'static str),
}

/// Name-keyed table of resource descriptors, built once at start-up.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<&'static str, Arc<ResourceDescriptor>>,
    order: Vec<&'static str>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-registering an identical descriptor is a no-op.
    pub fn register(&mut self, descriptor: ResourceDescriptor) -> Result<(), RegistryError> {
        if let Some(existing) = self.resources.get(descriptor.name) {
            if **existing == descriptor {
                return Ok(());
            }
            return Err(RegistryError::Duplicate(descriptor.name));
        }
        self.order.push(descriptor.name);
        self.resources.insert(descriptor.name, Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<ResourceDescriptor>> {
        self.resources.get(name).cloned()
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ResourceDescriptor>> {
        self.order.iter().filter_map(|name| self.resources.get(name))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The application's resource table.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for descriptor in STANDARD_RESOURCES {
            // names in the static table are distinct
            let _ = registry.register(descriptor.clone());
        }
        registry
    }
}

static STANDARD_RESOURCES: &[ResourceDescriptor] = &[
    ResourceDescriptor::new("clients", &CLIENTS, "clientId").sorted(SortSpec::desc("createdAt")),
    ResourceDescriptor::new("funds", &FUNDS, "fundId").sorted(SortSpec::desc("createdAt")),
    ResourceDescriptor::new("portfolios", &PORTFOLIOS, "portfolioId").sorted(SortSpec::desc("createdAt")),
    ResourceDescriptor::new("securities", &SECURITIES, "securityId").sorted(SortSpec::asc("ticker")),
    ResourceDescriptor::new("trades", &TRADES, "tradeId").sorted(SortSpec::desc("tradeDate")),
    ResourceDescriptor::new("settlements", &SETTLEMENTS, "settlementId").sorted(SortSpec::desc("settlementDate")),
    ResourceDescriptor::new("positions", &POSITIONS, "positionId"),
    ResourceDescriptor::new("reconciliation-breaks", &RECONCILIATION_BREAKS, "breakId").sorted(SortSpec::desc("date")),
    ResourceDescriptor::new("compliance-events", &COMPLIANCE_EVENTS, "eventId").sorted(SortSpec::desc("date")),
    ResourceDescriptor::new("regulatory-submissions", &REGULATORY_SUBMISSIONS, "submissionId")
        .sorted(SortSpec::desc("dueDate")),
    ResourceDescriptor::new("fees", &FEE_RECORDS, "feeId").sorted(SortSpec::desc("invoiceDate")),
    ResourceDescriptor::new("audit-logs", &AUDIT_LOGS, "logId").sorted(SortSpec::desc("timestamp")),
    ResourceDescriptor::new("notifications", &NOTIFICATIONS, "notificationId").sorted(SortSpec::desc("timestamp")),
    ResourceDescriptor::new("documents", &DOCUMENTS, "documentId").sorted(SortSpec::desc("uploadedDate")),
    ResourceDescriptor::new("corporate-actions", &CORPORATE_ACTIONS, "actionId"),
    ResourceDescriptor::new("journal-entries", &JOURNAL_ENTRIES, "entryId").sorted(SortSpec::desc("date")),
    ResourceDescriptor::new("trial-balance", &TRIAL_BALANCE, crate::types::ID_FIELD),
    ResourceDescriptor::new("performance", &PERFORMANCE_RECORDS, "portfolioId"),
    ResourceDescriptor::new("aum-trend", &AUM_TREND, "month"),
    ResourceDescriptor::new("recon-summary", &RECON_SUMMARY, "date"),
    ResourceDescriptor::new("users", &USERS, "userId")
        .sorted(SortSpec::asc("userId"))
        .hidden(&["passwordHash"])
        .operations(Operations::READ_UPDATE),
];
