//! # Promotion Store
//!
//! In-memory promotion records shared by every handler.
//!
//! ## Thread Safety
//! The records live in an `Arc<RwLock<Vec<Promotion>>>`:
//! 1. Eligibility checks only read, and may run concurrently
//! 2. Lifecycle changes and redemptions take the write lock
//! 3. Each handler copies what it needs under one lock acquisition, so an
//!    evaluation never sees a half-applied change
//!
//! A poisoned lock is recovered rather than propagated. Every mutation
//! below either completes or leaves the record untouched.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use pressroom_core::Promotion;
use thiserror::Error;
use uuid::Uuid;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Promotion not found: {0}")]
    NotFound(Uuid),

    #[error("Promotion already exists: {0}")]
    AlreadyExists(Uuid),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Shared promotion records, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct PromotionStore {
    promotions: Arc<RwLock<Vec<Promotion>>>,
}

impl PromotionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with existing records.
    pub fn from_promotions(promotions: Vec<Promotion>) -> Self {
        PromotionStore {
            promotions: Arc::new(RwLock::new(promotions)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Promotion>> {
        self.promotions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Promotion>> {
        self.promotions.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copies every record.
    pub fn snapshot(&self) -> Vec<Promotion> {
        self.read().clone()
    }

    /// Copies the records that can be offered at `now`.
    pub fn live_snapshot(&self, now: DateTime<Utc>) -> Vec<Promotion> {
        self.read()
            .iter()
            .filter(|promotion| promotion.is_live(now))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: Uuid) -> StoreResult<Promotion> {
        self.read()
            .iter()
            .find(|promotion| promotion.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    pub fn insert(&self, promotion: Promotion) -> StoreResult<()> {
        let mut promotions = self.write();
        if promotions.iter().any(|existing| existing.id == promotion.id) {
            return Err(StoreError::AlreadyExists(promotion.id));
        }
        promotions.push(promotion);
        Ok(())
    }

    /// Runs `f` on the record with `id` under the write lock.
    pub fn modify<R, E, F>(&self, id: Uuid, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut Promotion) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut promotions = self.write();
        let promotion = promotions
            .iter_mut()
            .find(|promotion| promotion.id == id)
            .ok_or(StoreError::NotFound(id))?;
        f(promotion)
    }

    /// Removes the record with `id` if `check` accepts it.
    pub fn remove_if<E, F>(&self, id: Uuid, check: F) -> Result<Promotion, E>
    where
        F: FnOnce(&Promotion) -> Result<(), E>,
        E: From<StoreError>,
    {
        let mut promotions = self.write();
        let index = promotions
            .iter()
            .position(|promotion| promotion.id == id)
            .ok_or(StoreError::NotFound(id))?;
        check(&promotions[index])?;
        Ok(promotions.remove(index))
    }
}
