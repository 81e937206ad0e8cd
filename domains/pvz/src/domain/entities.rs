//! Pickup-point domain entities
//!
//! Pickup points are immutable once registered. Receptions move from
//! in progress to closed once. Products belong to exactly one reception and
//! are only ever removed last-in first-out while that reception is open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pickup_common::{Error, Result};

use crate::domain::state::{ReceptionEvent, ReceptionState, ReceptionStateMachine, StateError};

/// Registered pickup point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pvz {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub city: String,
}

impl Pvz {
    /// Create a pickup point registered now. `city` must already be canonical.
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            registration_date: Utc::now(),
            city: city.into(),
        }
    }
}

/// Reception status as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "reception_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReceptionStatus {
    #[default]
    InProgress,
    Closed,
}

impl ReceptionStatus {
    /// Convert to state machine state
    pub fn to_state(&self) -> ReceptionState {
        match self {
            ReceptionStatus::InProgress => ReceptionState::InProgress,
            ReceptionStatus::Closed => ReceptionState::Closed,
        }
    }

    /// Convert from state machine state
    pub fn from_state(state: ReceptionState) -> Self {
        match state {
            ReceptionState::InProgress => ReceptionStatus::InProgress,
            ReceptionState::Closed => ReceptionStatus::Closed,
        }
    }
}

impl std::fmt::Display for ReceptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// Goods-intake session at a pickup point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reception {
    pub id: Uuid,
    pub pvz_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub status: ReceptionStatus,
}

impl Reception {
    /// Open a new reception for `pvz_id` at `date_time`
    pub fn open(pvz_id: Uuid, date_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pvz_id,
            date_time,
            status: ReceptionStatus::InProgress,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == ReceptionStatus::InProgress
    }

    /// Check the reception can accept a new product
    pub fn ensure_accepts_products(&self) -> Result<()> {
        self.apply_transition(ReceptionEvent::AddProduct)
            .map(|_| ())
            .map_err(|_| Error::NoOpenReception)
    }

    /// Check the reception can give back its last product
    pub fn ensure_releases_products(&self) -> Result<()> {
        self.apply_transition(ReceptionEvent::RemoveLastProduct)
            .map(|_| ())
            .map_err(|_| Error::NoProductsToDelete)
    }

    /// Close the reception
    pub fn close(&mut self) -> Result<()> {
        let new_state = self
            .apply_transition(ReceptionEvent::Close)
            .map_err(|e| match e {
                StateError::TerminalState(_) => Error::ReceptionNotFound,
                StateError::InvalidTransition { from, event, .. } => Error::Validation(format!(
                    "Invalid reception transition: cannot apply '{}' event from '{}' state",
                    event, from
                )),
            })?;
        self.status = ReceptionStatus::from_state(new_state);
        Ok(())
    }

    fn apply_transition(
        &self,
        event: ReceptionEvent,
    ) -> std::result::Result<ReceptionState, StateError> {
        ReceptionStateMachine::transition(self.status.to_state(), event)
    }
}

/// Item recorded against a reception
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub reception_id: Uuid,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub product_type: String,
}

impl Product {
    /// Create a product added now. `product_type` must already be canonical.
    pub fn new(reception_id: Uuid, product_type: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            reception_id,
            date_time: Utc::now(),
            product_type: product_type.into(),
        }
    }
}

/// Reception with its products in the order they were added
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceptionInfo {
    pub reception: Reception,
    pub products: Vec<Product>,
}

/// Pickup point with its receptions in the order they were opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvzInfo {
    pub pvz: Pvz,
    pub receptions: Vec<ReceptionInfo>,
}

/// Optional inclusive bounds on a reception's opened-at timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Build a range, rejecting a start after the end
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(Error::Validation(
                    "startDate must not be after endDate".to_string(),
                ));
            }
        }
        Ok(Self { start, end })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| at >= s) && self.end.is_none_or(|e| at <= e)
    }
}
