use crate::core::model::Checkout;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How a store's spawner picks a lane for an arriving customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingPolicy {
    /// A floor manager sends the customer to the eligible lane with the
    /// lowest current depth. Ties go to the lowest checkout id.
    ShortestQueue,
    /// Without a floor manager the customer picks an eligible lane at random
    RandomEligible,
}

impl RoutingPolicy {
    pub fn for_store(has_floor_manager: bool) -> Self {
        if has_floor_manager {
            RoutingPolicy::ShortestQueue
        } else {
            RoutingPolicy::RandomEligible
        }
    }

    /// Index into `checkouts` of the chosen lane, or `None` if no lane accepts
    /// a basket of `items`.
    ///
    /// `checkouts` must be in a stable order (the store keeps them sorted by
    /// id); shortest-queue ties resolve to the first eligible lane in that order.
    pub fn select<R: Rng + ?Sized>(
        &self,
        checkouts: &[Checkout],
        items: usize,
        rng: &mut R,
    ) -> Option<usize> {
        let eligible = checkouts
            .iter()
            .enumerate()
            .filter(|(_, checkout)| checkout.accepts(items));

        match self {
            RoutingPolicy::ShortestQueue => {
                let mut best: Option<(usize, i64)> = None;
                for (index, checkout) in eligible {
                    let depth = checkout.depth();
                    if best.map_or(true, |(_, lowest)| depth < lowest) {
                        best = Some((index, depth));
                    }
                }
                best.map(|(index, _)| index)
            }
            RoutingPolicy::RandomEligible => {
                let candidates: Vec<usize> = eligible.map(|(index, _)| index).collect();
                candidates.choose(rng).copied()
            }
        }
    }
}
