//! Scene state machine and event dispatch.
//!
//! [`App::update`] takes the previous [`AppState`] and one [`Event`] and
//! returns a fresh state. Nothing is mutated in place, so events can be
//! replayed deterministically from the same seed.

use crate::animator::Animator;
use crate::clock::SimClock;
use sim_core::{CanvasLimits, Ledger, Role, Scene, SimConfig};
use tracing::{debug, info};

/// Highest value of the dev focus dial.
pub const FOCUS_MAX: u8 = 10;

/// Player intents produced by the key map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Hire(Role),
    Fire(Role),
    FocusBugs,
    FocusFeatures,
    ToggleHelp,
    /// Fill the feature accumulator so the next tick ships a feature.
    MakeProgress,
    FixBug,
    Quit,
}

/// Everything the event queue can deliver.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Simulation clock fired.
    SimTick,
    /// Animation clock fired.
    FrameTick,
    /// A key press; `None` when the key has no binding.
    Key(Option<Action>),
    Resize { width: u16, height: u16 },
    /// Anything else the terminal reports. Ignored.
    Other,
}

/// Whether the event loop should keep running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Logical canvas size plus the raw terminal size it was clamped from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Canvas {
    pub width: u16,
    pub height: u16,
    pub window_width: u16,
    pub window_height: u16,
}

/// Complete application state for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub scene: Scene,
    pub ledger: Ledger,
    pub animator: Animator,
    /// Dial in `0..=FOCUS_MAX`.
    pub dev_focus: u8,
    pub help_visible: bool,
    pub canvas: Canvas,
}

/// Immutable wiring: the clock and the canvas limits.
#[derive(Clone, Debug)]
pub struct App {
    clock: SimClock,
    limits: CanvasLimits,
    seed: u64,
}

impl App {
    pub fn new(cfg: SimConfig) -> Self {
        Self {
            limits: cfg.canvas.clone(),
            seed: cfg.rng_seed,
            clock: SimClock::new(cfg),
        }
    }

    pub fn config(&self) -> &SimConfig {
        self.clock.config()
    }

    pub fn initial_state(&self) -> AppState {
        AppState {
            scene: Scene::Start,
            ledger: Ledger::new(),
            animator: Animator::new(self.seed),
            dev_focus: FOCUS_MAX,
            help_visible: false,
            canvas: Canvas::default(),
        }
    }

    /// Apply one event.
    pub fn update(&self, state: &AppState, event: &Event) -> (AppState, Control) {
        match event {
            Event::SimTick => {
                let (ledger, scene) = self.clock.tick(&state.ledger, state.scene);
                let next = AppState {
                    ledger,
                    scene,
                    ..state.clone()
                };
                (next, Control::Continue)
            }
            Event::FrameTick => {
                if !state.scene.is_playing() {
                    return (state.clone(), Control::Continue);
                }
                let next = AppState {
                    animator: state.animator.step(),
                    ..state.clone()
                };
                (next, Control::Continue)
            }
            Event::Key(Some(Action::Quit)) => {
                info!("quit requested");
                (state.clone(), Control::Quit)
            }
            Event::Key(action) => {
                let mut next = state.clone();
                if next.scene == Scene::Start {
                    info!("game started");
                    next.scene = Scene::Playing;
                }
                if let (Some(action), Scene::Playing) = (action, next.scene) {
                    next = apply_action(next, *action);
                }
                (next, Control::Continue)
            }
            Event::Resize { width, height } => {
                let canvas = Canvas {
                    width: (*width).min(self.limits.max_width),
                    height: (*height).min(self.limits.max_height),
                    window_width: *width,
                    window_height: *height,
                };
                debug!(?canvas, "resized");
                let next = AppState {
                    canvas,
                    ..state.clone()
                };
                (next, Control::Continue)
            }
            Event::Other => (state.clone(), Control::Continue),
        }
    }
}

fn apply_action(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::Hire(role) => {
            state.ledger = state.ledger.with_staff(role, 1);
            debug!(?role, count = state.ledger.staff(role), "hired");
        }
        Action::Fire(role) => {
            state.ledger = state.ledger.with_staff(role, -1);
            debug!(?role, count = state.ledger.staff(role), "fired");
        }
        Action::FocusBugs => state.dev_focus = state.dev_focus.saturating_sub(1),
        Action::FocusFeatures => state.dev_focus = (state.dev_focus + 1).min(FOCUS_MAX),
        Action::ToggleHelp => state.help_visible = !state.help_visible,
        Action::MakeProgress => state.ledger.progress.feature = 1.0,
        Action::FixBug => state.ledger.bugs = (state.ledger.bugs - 1).max(0),
        Action::Quit => {}
    }
    state
}

/// Drive `seconds` simulation ticks with one animation frame per tick.
pub fn run_seconds(app: &App, mut state: AppState, seconds: u32) -> AppState {
    for _ in 0..seconds {
        if !state.scene.is_playing() {
            break;
        }
        state = app.update(&state, &Event::SimTick).0;
        state = app.update(&state, &Event::FrameTick).0;
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::EndCause;

    fn app() -> App {
        App::new(SimConfig::default())
    }

    fn press(app: &App, state: &AppState, action: Action) -> AppState {
        app.update(state, &Event::Key(Some(action))).0
    }

    #[test]
    fn start_scene_does_not_tick() {
        let app = app();
        let mut s = app.initial_state();
        s.ledger.devs = 60;
        let (next, _) = app.update(&s, &Event::SimTick);
        assert_eq!(next, s);
        let (next, _) = app.update(&s, &Event::FrameTick);
        assert_eq!(next, s);
    }

    #[test]
    fn any_key_starts_then_clock_advances() {
        let app = app();
        let s = app.initial_state();
        let s = press(&app, &s, Action::MakeProgress);
        assert_eq!(s.scene, Scene::Playing);
        assert_eq!(s.ledger.features, 0, "key alone must not ship a feature");

        let (s, _) = app.update(&s, &Event::SimTick);
        assert_eq!(s.ledger.features, 1);
    }

    #[test]
    fn unbound_key_also_starts() {
        let app = app();
        let (s, ctl) = app.update(&app.initial_state(), &Event::Key(None));
        assert_eq!(s.scene, Scene::Playing);
        assert_eq!(ctl, Control::Continue);
    }

    #[test]
    fn quit_wins_in_every_scene() {
        let app = app();
        let start = app.initial_state();
        let (s, ctl) = app.update(&start, &Event::Key(Some(Action::Quit)));
        assert_eq!(ctl, Control::Quit);
        assert_eq!(s.scene, Scene::Start);

        let ended = AppState {
            scene: Scene::Ended(EndCause::Collapse),
            ..start
        };
        let (_, ctl) = app.update(&ended, &Event::Key(Some(Action::Quit)));
        assert_eq!(ctl, Control::Quit);
    }

    #[test]
    fn staff_actions_floor_at_zero() {
        let app = app();
        let s = press(&app, &app.initial_state(), Action::Fire(Role::Dev));
        assert_eq!(s.ledger.devs, 0);
        let s = press(&app, &s, Action::Hire(Role::Qa));
        let s = press(&app, &s, Action::Hire(Role::Qa));
        let s = press(&app, &s, Action::Fire(Role::Qa));
        assert_eq!(s.ledger.qa, 1);
        let s = press(&app, &s, Action::Hire(Role::Marketer));
        assert_eq!(s.ledger.marketers, 1);
    }

    #[test]
    fn focus_dial_is_bounded() {
        let app = app();
        let mut s = app.initial_state();
        s = press(&app, &s, Action::FocusFeatures);
        assert_eq!(s.dev_focus, FOCUS_MAX);
        for _ in 0..15 {
            s = press(&app, &s, Action::FocusBugs);
        }
        assert_eq!(s.dev_focus, 0);
    }

    #[test]
    fn fix_bug_and_help_toggle() {
        let app = app();
        let mut s = app.initial_state();
        s.ledger.bugs = 1;
        let s = press(&app, &s, Action::FixBug);
        let s = press(&app, &s, Action::FixBug);
        assert_eq!(s.ledger.bugs, 0);
        let s = press(&app, &s, Action::ToggleHelp);
        assert!(s.help_visible);
        let s = press(&app, &s, Action::ToggleHelp);
        assert!(!s.help_visible);
    }

    #[test]
    fn ended_ignores_actions() {
        let app = app();
        let s = AppState {
            scene: Scene::Ended(EndCause::CrushedBySuccess),
            ..app.initial_state()
        };
        let next = press(&app, &s, Action::Hire(Role::Dev));
        assert_eq!(next, s);
        let (next, _) = app.update(&s, &Event::FrameTick);
        assert_eq!(next, s);
    }

    #[test]
    fn resize_clamps_canvas() {
        let app = app();
        let (s, _) = app.update(
            &app.initial_state(),
            &Event::Resize {
                width: 300,
                height: 50,
            },
        );
        assert_eq!(
            s.canvas,
            Canvas {
                width: 200,
                height: 20,
                window_width: 300,
                window_height: 50
            }
        );
        let (s, _) = app.update(&s, &Event::Resize { width: 80, height: 10 });
        assert_eq!((s.canvas.width, s.canvas.height), (80, 10));
    }

    #[test]
    fn other_events_are_no_ops() {
        let app = app();
        let s = app.initial_state();
        let (next, ctl) = app.update(&s, &Event::Other);
        assert_eq!(next, s);
        assert_eq!(ctl, Control::Continue);
    }

    #[test]
    fn busy_company_eventually_ends() {
        let app = app();
        let mut s = app.update(&app.initial_state(), &Event::Key(None)).0;
        s.ledger.devs = 60;
        let s = run_seconds(&app, s, 10_000);
        assert!(matches!(s.scene, Scene::Ended(_)));
    }
}
