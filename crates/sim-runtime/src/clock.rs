//! Fixed-step simulation clock and its terminal conditions.

use sim_core::{EndCause, Ledger, Scene, SimConfig};
use tracing::info;

/// Advances the ledger once per tick while the scene is [`Scene::Playing`].
#[derive(Clone, Debug)]
pub struct SimClock {
    cfg: SimConfig,
}

impl SimClock {
    pub fn new(cfg: SimConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &SimConfig {
        &self.cfg
    }

    /// Run one tick. Outside `Playing` the inputs come back unchanged.
    pub fn tick(&self, ledger: &Ledger, scene: Scene) -> (Ledger, Scene) {
        if !scene.is_playing() {
            return (ledger.clone(), scene);
        }
        let next = sim_econ::advance(ledger, &self.cfg);
        match self.terminal_condition(&next) {
            Some(cause) => {
                info!(
                    ?cause,
                    cash = next.cash,
                    price_per_share = next.price_per_share,
                    "run ended"
                );
                (next, Scene::Ended(cause))
            }
            None => (next, Scene::Playing),
        }
    }

    /// First matching terminal condition: the cash cap, then a negative
    /// share price.
    pub fn terminal_condition(&self, ledger: &Ledger) -> Option<EndCause> {
        if ledger.cash > self.cfg.cash_cap {
            Some(EndCause::CrushedBySuccess)
        } else if ledger.price_per_share < 0 {
            Some(EndCause::Collapse)
        } else {
            None
        }
    }
}
