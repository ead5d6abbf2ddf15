//! Partner collection persistence.
//!
//! The whole collection lives under one key of a [`KeyValueStore`] as a JSON
//! array, rewritten on every change. [`Repository`] keeps the in-memory copy
//! and only commits a change after the write succeeded.

mod memory;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Company, CompanyDraft, CompanyPatch, ContactHistoryEntry};
use crate::validate::{validate_draft, ValidationErrors};

pub use memory::MemoryStore;

/// Key under which the collection is stored.
pub const COLLECTION_KEY: &str = "partner_hub_v2_cos";

/// A string key-value store, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).put(key, value)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No partner with ID {0}")]
    NotFound(Uuid),
    #[error("Partner {0} already exists")]
    Duplicate(Uuid),
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error("Stored collection is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository interface over the partner collection.
pub trait CompanyStore {
    /// Rehydrate from the backing store, replacing the in-memory collection.
    fn load(&mut self) -> StoreResult<()>;
    /// Write the current collection to the backing store.
    fn save(&self) -> StoreResult<()>;
    fn list(&self) -> &[Company];
    /// Add a record at the front of the collection.
    fn insert(&mut self, company: Company) -> StoreResult<()>;
    /// Replace the record with the same ID.
    fn update(&mut self, company: Company) -> StoreResult<()>;
    fn delete(&mut self, id: Uuid) -> StoreResult<Company>;

    fn get(&self, id: Uuid) -> Option<&Company> {
        self.list().iter().find(|c| c.id == id)
    }

    /// Validate a form submission and store it as a new record.
    fn create(&mut self, draft: CompanyDraft, today: NaiveDate) -> StoreResult<Company> {
        validate_draft(&draft)?;
        let company = Company::from_draft(draft, today);
        self.insert(company.clone())?;
        Ok(company)
    }

    /// Merge submitted fields into an existing record. The merged record must
    /// still validate; otherwise nothing changes.
    fn edit(&mut self, id: Uuid, patch: CompanyPatch) -> StoreResult<Company> {
        let mut company = self.get(id).cloned().ok_or(StoreError::NotFound(id))?;
        company.merge(patch);
        validate_draft(&CompanyDraft::from(&company))?;
        self.update(company.clone())?;
        Ok(company)
    }

    fn duplicate(&mut self, id: Uuid) -> StoreResult<Company> {
        let copy = self.get(id).ok_or(StoreError::NotFound(id))?.duplicate();
        self.insert(copy.clone())?;
        Ok(copy)
    }

    /// Log an interaction on its parent record.
    fn add_interaction(&mut self, id: Uuid, entry: ContactHistoryEntry) -> StoreResult<Company> {
        let mut company = self.get(id).cloned().ok_or(StoreError::NotFound(id))?;
        company.record_interaction(entry);
        validate_draft(&CompanyDraft::from(&company))?;
        self.update(company.clone())?;
        Ok(company)
    }
}

pub struct Repository<S: KeyValueStore> {
    backend: S,
    companies: Vec<Company>,
}

impl<S: KeyValueStore> Repository<S> {
    /// Open and rehydrate from `backend`.
    pub fn open(backend: S) -> StoreResult<Self> {
        let mut repo = Self {
            backend,
            companies: Vec::new(),
        };
        repo.load()?;
        Ok(repo)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Replace the whole collection (used by imports).
    pub fn replace_all(&mut self, companies: Vec<Company>) -> StoreResult<()> {
        self.commit(companies)
    }

    /// Persist `next`, then adopt it. On failure the current collection stays.
    fn commit(&mut self, next: Vec<Company>) -> StoreResult<()> {
        let json = serde_json::to_string(&next)?;
        self.backend.put(COLLECTION_KEY, &json)?;
        debug!(count = next.len(), bytes = json.len(), "persisted partner collection");
        self.companies = next;
        Ok(())
    }

    fn position(&self, id: Uuid) -> StoreResult<usize> {
        self.companies
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

impl<S: KeyValueStore> CompanyStore for Repository<S> {
    fn load(&mut self) -> StoreResult<()> {
        self.companies = match self.backend.get(COLLECTION_KEY)? {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(&json)?,
            _ => Vec::new(),
        };
        debug!(count = self.companies.len(), "loaded partner collection");
        Ok(())
    }

    fn save(&self) -> StoreResult<()> {
        let json = serde_json::to_string(&self.companies)?;
        self.backend.put(COLLECTION_KEY, &json)?;
        Ok(())
    }

    fn list(&self) -> &[Company] {
        &self.companies
    }

    fn insert(&mut self, company: Company) -> StoreResult<()> {
        if self.companies.iter().any(|c| c.id == company.id) {
            return Err(StoreError::Duplicate(company.id));
        }
        let mut next = Vec::with_capacity(self.companies.len() + 1);
        next.push(company);
        next.extend(self.companies.iter().cloned());
        self.commit(next)
    }

    fn update(&mut self, company: Company) -> StoreResult<()> {
        let idx = self.position(company.id)?;
        let mut next = self.companies.clone();
        next[idx] = company;
        self.commit(next)
    }

    fn delete(&mut self, id: Uuid) -> StoreResult<Company> {
        let idx = self.position(id)?;
        let mut next = self.companies.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        Ok(removed)
    }
}
