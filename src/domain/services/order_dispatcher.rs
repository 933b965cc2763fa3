use crate::domain::courier::Courier;
use crate::domain::order::Order;
use crate::domain::shared::GeneralError;
use super::errors::DispatchError;

// ============================================================================
// Order Dispatcher - Nearest Available Courier
// ============================================================================
//
// Stateless. Picks, among couriers able to store the order, the one that
// reaches the order location soonest. Ties go to the courier listed first.
// The assignment is all-or-nothing across the order and the courier.
//
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct OrderDispatcher;

impl OrderDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Assigns `order` to the fastest eligible courier and returns it.
    /// On error neither the order nor any courier has been modified.
    pub fn dispatch<'a>(
        &self,
        order: &mut Order,
        couriers: &'a mut [Courier],
    ) -> Result<&'a Courier, DispatchError> {
        if couriers.is_empty() {
            return Err(GeneralError::ValueIsRequired("couriers").into());
        }
        order.ensure_assignable()?;

        let index = Self::select_fastest(order, couriers).ok_or(DispatchError::NobodyCanTakeOrder {
            order_id: order.id(),
        })?;

        couriers[index].take_order(order)?;

        let courier = &couriers[index];
        tracing::debug!(
            order_id = %order.id(),
            courier_id = %courier.id(),
            courier = courier.name(),
            "Order dispatched"
        );
        Ok(courier)
    }

    /// Index of the eligible courier with the smallest time to the order.
    /// Only a strictly smaller time replaces the current best.
    fn select_fastest(order: &Order, couriers: &[Courier]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;

        for (index, courier) in couriers.iter().enumerate() {
            if !courier.can_take_order(order) {
                tracing::debug!(courier_id = %courier.id(), "Courier has no suitable storage place");
                continue;
            }

            let time = courier.calculate_time_to_location(order.location());
            tracing::debug!(courier_id = %courier.id(), time, "Courier is eligible");

            match best {
                Some((_, best_time)) if time >= best_time => {}
                _ => best = Some((index, time)),
            }
        }

        best.map(|(index, _)| index)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
