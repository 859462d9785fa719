#![deny(warnings)]

//! Event-driven runtime for the simulation: the tick clock, the particle
//! animator, the scene state machine and the dashboard readouts.

pub mod animator;
pub mod app;
pub mod clock;
pub mod readout;

pub use animator::Animator;
pub use app::{run_seconds, Action, App, AppState, Canvas, Control, Event};
pub use clock::SimClock;
pub use readout::{readouts, RateCell, Readout, Row};

use serde::Serialize;
use sim_core::{Ledger, Scene};

/// Serializable summary of a run, for headless output.
#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub seconds: u32,
    pub scene: Scene,
    pub ledger: Ledger,
}

/// Start a run with the given staff and drive it for up to `seconds` ticks.
pub fn run_headless(app: &App, devs: i64, qa: i64, marketers: i64, seconds: u32) -> Snapshot {
    let (mut state, _) = app.update(&app.initial_state(), &Event::Key(None));
    state.ledger = state
        .ledger
        .with_staff(sim_core::Role::Dev, devs)
        .with_staff(sim_core::Role::Qa, qa)
        .with_staff(sim_core::Role::Marketer, marketers);

    let mut elapsed = 0;
    while elapsed < seconds && state.scene.is_playing() {
        state = run_seconds(app, state, 1);
        elapsed += 1;
    }
    Snapshot {
        seconds: elapsed,
        scene: state.scene,
        ledger: state.ledger,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::SimConfig;

    #[test]
    fn headless_idle_company_earns_nothing() {
        let app = App::new(SimConfig::default());
        let snap = run_headless(&app, 0, 0, 0, 30);
        assert_eq!(snap.seconds, 30);
        assert_eq!(snap.scene, Scene::Playing);
        assert_eq!(snap.ledger.cash, 0);
        assert_eq!(snap.ledger.users, 1);
    }

    #[test]
    fn headless_stops_at_the_end_scene() {
        let app = App::new(SimConfig::default());
        let snap = run_headless(&app, 60, 0, 0, 100_000);
        assert!(matches!(snap.scene, Scene::Ended(_)));
        assert!(snap.seconds < 100_000);
    }

    #[test]
    fn snapshot_serializes() {
        let app = App::new(SimConfig::default());
        let snap = run_headless(&app, 1, 1, 1, 5);
        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v["seconds"], 5);
        assert_eq!(v["scene"], "Playing");
        assert_eq!(v["ledger"]["devs"], 1);
    }
}
