//! Views: pure projections of [`AppState`] into one text frame.

use compositor::{center_offset, display_width, max_width, overlay};
use crossterm::style::{Color, Stylize};
use sim_core::{Scene, SimConfig};
use sim_runtime::{app::FOCUS_MAX, readouts, Action, AppState, Row};

use crate::keymap::{binding, BINDINGS};

const BORDER: Color = Color::AnsiValue(240);
const HELP_BORDER: Color = Color::AnsiValue(63);
const HELP_FILL: Color = Color::AnsiValue(235);
const CASH: Color = Color::AnsiValue(35);
const BUILDING: Color = Color::AnsiValue(7);
const ALARM: Color = Color::AnsiValue(1);
const GAUGE: Color = Color::AnsiValue(4);

const COLUMNS: [usize; 5] = [13, 8, 16, 16, 16];
const LEGEND_WIDTH: usize = 6;

const BANNER: &str = "\
╔════════════════════════════════════╗
║                                    ║
║    T H E   S T A R T U P  (TM)     ║
║                                    ║
╚════════════════════════════════════╝

        press any key to begin";

const CASH_TUBE: &str = "   |           |
  .─────────────.
 /    Cash       \\
/.───────────────.\\
(                 )
 `───────────────'";

const BUILDING_ART: &str = "   ┌──────────┐
┌─┬┴──────────┴┬─┐
│ │  STaRtupTM │ │
│ └────────────┘ │
│◫ ◫ ◫ ◫  ◫ ◫ ◫ ◫│
│◫ ◫ ◫ ◫  ◫ ◫ ◫ ◫│
└──────┮◚◚┭──────┘";

const PARTICLE_GLYPHS: [char; 8] = ['◜', '\'', ',', '◝', '◃', '"', '◟', '◞'];

/// Render the whole terminal frame, centered in the window.
///
/// `blink` drives the building alarm once cash nears the cap.
pub fn frame(state: &AppState, cfg: &SimConfig, blink: bool) -> String {
    let body = match state.scene {
        Scene::Start => start_view(state),
        Scene::Playing => game_view(state, cfg, blink),
        Scene::Ended(cause) => end_view(state, cause.narrative()),
    };
    let window = blank(
        usize::from(state.canvas.window_width),
        usize::from(state.canvas.window_height),
    );
    let lines: Vec<&str> = body.split('\n').collect();
    overlay(
        center_offset(usize::from(state.canvas.window_width), max_width(&body)),
        center_offset(usize::from(state.canvas.window_height), lines.len()),
        &body,
        &window,
        false,
    )
}

fn blank(width: usize, height: usize) -> String {
    vec![" ".repeat(width); height.max(1)].join("\n")
}

/// A bordered box of the given outer size with `body` clipped inside.
fn boxed(body: &str, width: usize, height: usize, color: Color) -> String {
    let inner_w = width.saturating_sub(2);
    let inner_h = height.saturating_sub(2);
    let inner = overlay(0, 0, body, &blank(inner_w, inner_h), false);
    let edge = "│".with(color).to_string();
    let mut out = vec![format!("┌{}┐", "─".repeat(inner_w)).with(color).to_string()];
    out.extend(inner.split('\n').map(|l| format!("{edge}{l}{edge}")));
    out.push(format!("└{}┘", "─".repeat(inner_w)).with(color).to_string());
    out.join("\n")
}

fn canvas_size(state: &AppState) -> (usize, usize) {
    (
        usize::from(state.canvas.width),
        usize::from(state.canvas.height),
    )
}

fn start_view(state: &AppState) -> String {
    let (w, h) = canvas_size(state);
    let base = boxed("", w, h, BORDER);
    let rows = BANNER.lines().count();
    overlay(
        center_offset(w, max_width(BANNER)),
        center_offset(h, rows),
        BANNER,
        &base,
        true,
    )
}

fn end_view(state: &AppState, narrative: &str) -> String {
    let (w, h) = canvas_size(state);
    let base = boxed("", w, h, BORDER);
    let rows = narrative.lines().count();
    overlay(
        center_offset(w, max_width(narrative)),
        center_offset(h, rows),
        narrative,
        &base,
        true,
    )
}

fn pad(cell: &str, width: usize) -> String {
    let used = display_width(cell);
    format!("{cell}{}", " ".repeat(width.saturating_sub(used)))
}

/// The readout table, one line per row.
pub fn table(state: &AppState, cfg: &SimConfig) -> String {
    readouts(&state.ledger, &cfg.rates)
        .iter()
        .map(|row| match row {
            Row::Spacer => String::new(),
            Row::Readout(r) => {
                let mut cells = vec![r.label.to_string(), r.value.to_string()];
                cells.extend(r.rates.iter().map(ToString::to_string));
                cells
                    .iter()
                    .zip(COLUMNS)
                    .map(|(c, w)| pad(c, w))
                    .collect::<Vec<_>>()
                    .join(" ")
                    .trim_end()
                    .to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pile height for the cash tube, from 0 to 4.
fn pile_level(cash: i64, cap: i64) -> usize {
    if cash <= 1 || cap <= 1 {
        return 0;
    }
    let frac = (cash as f64).ln() / (cap as f64).ln();
    ((frac * 4.0).floor() as usize + 1).min(4)
}

fn cash_pile(level: usize) -> String {
    (0..level)
        .map(|row| {
            let width = 2 * row + 1;
            let margin = level - 1 - row;
            format!("{}{}", " ".repeat(margin), "$".repeat(width))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cash_window(state: &AppState, cfg: &SimConfig, blink: bool) -> String {
    let (_, h) = canvas_size(state);
    let gap = "\n".repeat(h.saturating_sub(16));
    let tube = CASH_TUBE.with(CASH).to_string();
    let alarm = blink && state.ledger.cash > cfg.cash_cap / 10 * 9;
    let building = BUILDING_ART
        .with(if alarm { ALARM } else { BUILDING })
        .to_string();
    let mut view = format!("{tube}\n{gap}\n{building}");

    let level = pile_level(state.ledger.cash, cfg.cash_cap);
    if level > 0 {
        let pile = cash_pile(level).with(CASH).to_string();
        view = overlay(10 - level as i32, 5 - level as i32, &pile, &view, true);
    }

    for (i, p) in state.animator.visible(&state.ledger).iter().enumerate() {
        let seed = i + p.x.unsigned_abs() as usize + p.y.unsigned_abs() as usize;
        let glyph = PARTICLE_GLYPHS[seed % PARTICLE_GLYPHS.len()];
        let glyph = glyph.to_string().with(CASH).to_string();
        view = overlay(p.x, 3 + p.y, &glyph, &view, false);
    }
    view
}

/// Key legend in a rounded box. The interior is filled so it stays solid
/// when composited transparently.
pub fn help_box() -> String {
    let lines: Vec<String> = BINDINGS
        .iter()
        .map(|b| format!(" {} {} ", pad(b.legend, LEGEND_WIDTH), b.help))
        .collect();
    let w = max_width(&lines.join("\n"));
    let top = format!("╭{}╮", "─".repeat(w)).with(HELP_BORDER).to_string();
    let bottom = format!("╰{}╯", "─".repeat(w)).with(HELP_BORDER).to_string();
    let edge = "│".with(HELP_BORDER).to_string();
    let mut out = vec![top];
    out.extend(
        lines
            .iter()
            .map(|l| format!("{edge}{}{edge}", pad(l, w).on(HELP_FILL))),
    );
    out.push(bottom);
    out.join("\n")
}

/// Center the help box over `base`, transparently.
fn with_help(base: &str, w: usize, h: usize) -> String {
    let help = help_box();
    let rows = help.lines().count();
    overlay(
        center_offset(w, max_width(&help)),
        center_offset(h, rows),
        &help,
        base,
        true,
    )
}

fn focus_gauge(focus: u8) -> String {
    let filled = usize::from(focus.min(FOCUS_MAX));
    let empty = usize::from(FOCUS_MAX) - filled;
    format!(
        "bugs {}{} features",
        "█".repeat(filled).with(GAUGE),
        "░".repeat(empty)
    )
}

fn game_view(state: &AppState, cfg: &SimConfig, blink: bool) -> String {
    let (w, h) = canvas_size(state);
    let mut base = boxed(&table(state, cfg), w, h, BORDER);

    let cash = cash_window(state, cfg, blink);
    let cash_w = max_width(&cash) as i32;
    base = overlay(w as i32 - cash_w - 1, 1, &cash, &base, false);

    if state.help_visible {
        base = with_help(&base, w, h);
    }

    let short_help = binding(Action::ToggleHelp)
        .map(|b| format!("{} {}", b.legend, b.help))
        .unwrap_or_default();
    format!("{base}\n{short_help}    {}", focus_gauge(state.dev_focus))
}
