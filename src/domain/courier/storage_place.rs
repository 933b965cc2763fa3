use uuid::Uuid;

use crate::domain::shared::{against_blank, Volume};
use super::errors::StoragePlaceError;

// ============================================================================
// Storage Place - Single-slot compartment owned by a Courier
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct StoragePlace {
    id: Uuid,
    name: String,
    total_volume: Volume,
    order_id: Option<Uuid>,
}

impl StoragePlace {
    pub fn new(name: impl Into<String>, total_volume: Volume) -> Result<Self, StoragePlaceError> {
        let name = name.into();
        against_blank(&name, "name")?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            total_volume,
            order_id: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_volume(&self) -> Volume {
        self.total_volume
    }

    pub fn order_id(&self) -> Option<Uuid> {
        self.order_id
    }

    pub fn is_occupied(&self) -> bool {
        self.order_id.is_some()
    }

    pub fn can_store(&self, volume: Volume) -> bool {
        !self.is_occupied() && volume <= self.total_volume
    }

    pub fn store(&mut self, order_id: Uuid, volume: Volume) -> Result<(), StoragePlaceError> {
        if let Some(occupied_by) = self.order_id {
            return Err(StoragePlaceError::Occupied { occupied_by });
        }
        if volume > self.total_volume {
            return Err(StoragePlaceError::VolumeExceeded {
                total_volume: self.total_volume.value(),
            });
        }

        self.order_id = Some(order_id);
        Ok(())
    }

    /// The caller must name the order it expects to find here; clearing an
    /// empty place is an error too.
    pub fn clear(&mut self, order_id: Uuid) -> Result<(), StoragePlaceError> {
        if self.order_id != Some(order_id) {
            return Err(StoragePlaceError::WrongOrderId {
                stored: self.order_id,
            });
        }

        self.order_id = None;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
