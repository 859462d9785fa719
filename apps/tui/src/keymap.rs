//! Key bindings: one binding per action, each with one or more keys.

use crossterm::event::KeyCode;
use sim_core::Role;
use sim_runtime::Action;

/// Keys that trigger an action, plus their help text.
#[derive(Clone, Copy, Debug)]
pub struct Binding {
    pub keys: &'static [KeyCode],
    /// Key legend shown in the help box.
    pub legend: &'static str,
    pub help: &'static str,
    pub action: Action,
}

pub const BINDINGS: &[Binding] = &[
    Binding {
        keys: &[KeyCode::Char('h')],
        legend: "h",
        help: "hire dev",
        action: Action::Hire(Role::Dev),
    },
    Binding {
        keys: &[KeyCode::Char('f')],
        legend: "f",
        help: "fire dev",
        action: Action::Fire(Role::Dev),
    },
    Binding {
        keys: &[KeyCode::Char('y')],
        legend: "y",
        help: "hire qa",
        action: Action::Hire(Role::Qa),
    },
    Binding {
        keys: &[KeyCode::Char('r')],
        legend: "r",
        help: "fire qa",
        action: Action::Fire(Role::Qa),
    },
    Binding {
        keys: &[KeyCode::Char('t')],
        legend: "t",
        help: "hire marketing",
        action: Action::Hire(Role::Marketer),
    },
    Binding {
        keys: &[KeyCode::Char('e')],
        legend: "e",
        help: "fire marketing",
        action: Action::Fire(Role::Marketer),
    },
    Binding {
        keys: &[KeyCode::Char('b')],
        legend: "b",
        help: "focus bugs",
        action: Action::FocusBugs,
    },
    Binding {
        keys: &[KeyCode::Char('n')],
        legend: "n",
        help: "focus new features",
        action: Action::FocusFeatures,
    },
    Binding {
        keys: &[
            KeyCode::Char('j'),
            KeyCode::Char('k'),
            KeyCode::Char('['),
            KeyCode::Char(']'),
            KeyCode::Char('{'),
            KeyCode::Char('}'),
        ],
        legend: "jk[]{}",
        help: "make features",
        action: Action::MakeProgress,
    },
    Binding {
        keys: &[
            KeyCode::Char('1'),
            KeyCode::Char('2'),
            KeyCode::Char('3'),
            KeyCode::Char('4'),
        ],
        legend: "1234",
        help: "fix bugs",
        action: Action::FixBug,
    },
    Binding {
        keys: &[KeyCode::Char('?')],
        legend: "?",
        help: "help",
        action: Action::ToggleHelp,
    },
    Binding {
        keys: &[KeyCode::Esc],
        legend: "esc",
        help: "quit",
        action: Action::Quit,
    },
];

/// Action bound to `code`, if any.
pub fn action_for(code: KeyCode) -> Option<Action> {
    BINDINGS
        .iter()
        .find(|b| b.keys.contains(&code))
        .map(|b| b.action)
}

/// Binding for an action.
pub fn binding(action: Action) -> Option<&'static Binding> {
    BINDINGS.iter().find(|b| b.action == action)
}
