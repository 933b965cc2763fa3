use uuid::Uuid;

use crate::domain::order::{Order, OrderStatus};
use crate::domain::shared::{against_blank, Location, Speed, Volume};
use crate::event_sourcing::{AggregateRoot, EventBuffer};
use super::errors::CourierError;
use super::events::*;
use super::storage_place::StoragePlace;

pub const DEFAULT_STORAGE_PLACE_NAME: &str = "bag";
pub const DEFAULT_STORAGE_PLACE_VOLUME: i32 = 10;

// ============================================================================
// Courier Aggregate - Capacity, Movement and Time Estimation
// ============================================================================
//
// Storage places keep insertion order: `take_order` is first-fit over it.
// There is always at least the default bag.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Courier {
    id: Uuid,
    name: String,
    speed: Speed,
    location: Location,
    storage_places: Vec<StoragePlace>,
    events: EventBuffer<CourierEvent>,
}

impl Courier {
    pub fn new(name: impl Into<String>, speed: Speed, location: Location) -> Result<Self, CourierError> {
        let name = name.into();
        against_blank(&name, "name")?;

        let bag = StoragePlace::new(
            DEFAULT_STORAGE_PLACE_NAME,
            Volume::new(DEFAULT_STORAGE_PLACE_VOLUME)?,
        )?;

        let id = Uuid::new_v4();
        let mut courier = Self {
            id,
            name: name.clone(),
            speed,
            location,
            storage_places: Vec::new(),
            events: EventBuffer::new(),
        };
        courier.events.record(CourierEvent::Registered(CourierRegistered {
            courier_id: id,
            name,
            speed,
            location,
        }));
        courier.push_storage_place(bag);
        Ok(courier)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn storage_places(&self) -> &[StoragePlace] {
        &self.storage_places
    }

    /// Ids of the orders currently held, in storage place order
    pub fn held_order_ids(&self) -> Vec<Uuid> {
        self.storage_places.iter().filter_map(StoragePlace::order_id).collect()
    }

    pub fn is_busy(&self) -> bool {
        self.storage_places.iter().any(StoragePlace::is_occupied)
    }

    /// Appends a compartment and returns its id
    pub fn add_storage_place(&mut self, name: impl Into<String>, volume: Volume) -> Result<Uuid, CourierError> {
        let place = StoragePlace::new(name, volume)?;
        let id = place.id();
        self.push_storage_place(place);
        Ok(id)
    }

    fn push_storage_place(&mut self, place: StoragePlace) {
        self.events.record(CourierEvent::StoragePlaceAdded(CourierStoragePlaceAdded {
            courier_id: self.id,
            storage_place_id: place.id(),
            name: place.name().to_string(),
            volume: place.total_volume(),
        }));
        self.storage_places.push(place);
    }

    /// Existence check only; which place gets the order is decided by
    /// `take_order`.
    pub fn can_take_order(&self, order: &Order) -> bool {
        self.storage_places.iter().any(|p| p.can_store(order.volume()))
    }

    fn find_suitable_place(&self, volume: Volume) -> Option<usize> {
        self.storage_places.iter().position(|p| p.can_store(volume))
    }

    /// Stores the order in the first suitable place and assigns the order to
    /// this courier. Either both aggregates change or neither does.
    pub fn take_order(&mut self, order: &mut Order) -> Result<(), CourierError> {
        order.ensure_assignable()?;

        let index = self
            .find_suitable_place(order.volume())
            .ok_or(CourierError::NoSuitableStoragePlace {
                volume: order.volume().value(),
            })?;

        self.storage_places[index].store(order.id(), order.volume())?;
        order.assign(self)?;

        let storage_place_id = self.storage_places[index].id();
        self.events.record(CourierEvent::OrderTaken(CourierOrderTaken {
            courier_id: self.id,
            order_id: order.id(),
            storage_place_id,
        }));
        Ok(())
    }

    /// Frees the place holding the order and marks the order completed.
    /// An order completed elsewhere still gets its place freed.
    pub fn complete_order(&mut self, order: &mut Order) -> Result<(), CourierError> {
        let index = self
            .storage_places
            .iter()
            .position(|p| p.order_id() == Some(order.id()))
            .ok_or_else(|| CourierError::NoSuchOrder {
                order_id: order.id(),
                held: self.held_order_ids(),
            })?;

        if order.status() == OrderStatus::Completed {
            self.storage_places[index].clear(order.id())?;
        } else {
            order.ensure_completable()?;
            self.storage_places[index].clear(order.id())?;
            order.complete()?;
        }

        self.events.record(CourierEvent::OrderDelivered(CourierOrderDelivered {
            courier_id: self.id,
            order_id: order.id(),
        }));
        Ok(())
    }

    /// Time units to reach `location`; a partial step still costs a full unit
    pub fn calculate_time_to_location(&self, location: &Location) -> f64 {
        let distance = self.location.distance_to(location) as f64;
        (distance / self.speed.value() as f64).ceil()
    }

    /// One movement step toward `target`, at most `speed` grid units.
    /// The X axis consumes the range first, Y gets what is left.
    pub fn move_towards(&mut self, target: &Location) -> Result<(), CourierError> {
        let dx = target.x() - self.location.x();
        let dy = target.y() - self.location.y();
        let mut range = self.speed.value();

        let move_x = dx.clamp(-range, range);
        range -= move_x.abs();
        let move_y = dy.clamp(-range, range);

        let next = Location::new(self.location.x() + move_x, self.location.y() + move_y)?;
        if next != self.location {
            self.events.record(CourierEvent::Moved(CourierMoved {
                courier_id: self.id,
                from: self.location,
                to: next,
            }));
            self.location = next;
        }
        Ok(())
    }
}

impl AggregateRoot for Courier {
    type Event = CourierEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn event_buffer(&self) -> &EventBuffer<Self::Event> {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer<Self::Event> {
        &mut self.events
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
