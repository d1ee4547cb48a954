//! Therapist Finder: interactive Ratatui browser
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  Therapist Finder   9 therapists   sort: Distance   40.7580, ...   │
//!   ├─── filters ─────────────┬─── results ───────────────────────────────┤
//!   │  Radius, session type,  │  Provider cards (list or compact)         │
//!   │  specializations        │                                           │
//!   ├─────────────────────────┴───────────────────────────────────────────┤
//!   │  toast                                                              │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘
//!
//! The profile and hotlines panels are drawn as popups over the body; the
//! hotlines popup always sits on top. Esc dismisses the topmost one.

use std::{io, time::Duration};

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};

use finder_contracts::{
    error::FinderResult,
    filter::{PRICE_STEP, RADIUS_PRESETS_KM, SPECIALIZATIONS},
    location::Coordinate,
    notify::{Toast, ToastLevel},
    provider::Provider,
    view::Overlay,
};
use finder_core::DirectorySession;
use finder_ref_nyc::{
    capabilities::LocatorMode,
    mock_data::{reference_directory, reference_session, ReferenceHost},
};

/// Where the simulated device reports itself: the Empire State Building.
const SIMULATED_FIX: Coordinate = Coordinate {
    lat: 40.7484,
    lng: -73.9857,
};

/// How long the simulated device takes to answer a location request.
const LOCATION_DELAY: Duration = Duration::from_millis(1200);

/// Radius step for the +/- keys, km.
const RADIUS_STEP_KM: f64 = 5.0;

/// How long a non-loading toast stays on screen, seconds.
const TOAST_SECS: i64 = 4;

// ── App state ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Results,
    Filters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardLayout {
    /// Two lines per provider with tags and availability.
    List,
    /// One line per provider.
    Compact,
}

struct App {
    session: DirectorySession,
    host: ReferenceHost,
    focus: Focus,
    layout: CardLayout,
    /// Highlighted row in the results list.
    cursor: usize,
    /// Highlighted row in the specialization list.
    tag_cursor: usize,
    quit: bool,
}

impl App {
    fn new(session: DirectorySession, host: ReferenceHost) -> Self {
        Self {
            session,
            host,
            focus: Focus::Results,
            layout: CardLayout::List,
            cursor: 0,
            tag_cursor: 0,
            quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.quit = true;
                return;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
                return;
            }
            KeyCode::Esc => {
                self.session.handle_escape();
                return;
            }
            _ => {}
        }

        match self.session.topmost_overlay() {
            // Nothing behind the hotlines panel is reachable while it is open.
            Some(Overlay::Hotlines) => {}
            Some(Overlay::Profile) => self.handle_profile_key(key),
            None => self.handle_browse_key(key),
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        // The session has already raised an error toast for a failed write.
        let _ = match key.code {
            KeyCode::Char('h') | KeyCode::Char('!') => {
                self.session.open_hotlines();
                Ok(())
            }
            KeyCode::Char('c') => self.session.copy_contact(),
            KeyCode::Char('x') => self.session.share_profile(),
            _ => Ok(()),
        };
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Char('!') => self.session.open_hotlines(),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Results => Focus::Filters,
                    Focus::Filters => Focus::Results,
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Enter => match self.focus {
                Focus::Results => self.open_highlighted(),
                Focus::Filters => self.toggle_highlighted_tag(),
            },
            KeyCode::Char(' ') if self.focus == Focus::Filters => self.toggle_highlighted_tag(),
            KeyCode::Char('s') => {
                let next = self.session.state().sort_key.toggled();
                self.session.set_sort_key(next);
            }
            KeyCode::Char(c @ '1'..='3') => {
                let idx = (c as usize) - ('1' as usize);
                let radius = RADIUS_PRESETS_KM[idx];
                self.session.update_filters(|f| f.radius_km = radius);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.session.update_filters(|f| f.radius_km += RADIUS_STEP_KM);
            }
            KeyCode::Char('-') => {
                self.session.update_filters(|f| f.radius_km -= RADIUS_STEP_KM);
            }
            KeyCode::Char('[') => self.session.update_filters(|f| {
                f.price_range.min = f.price_range.min.saturating_sub(PRICE_STEP)
            }),
            KeyCode::Char(']') => self.session.update_filters(|f| {
                f.price_range.min = f.price_range.min.saturating_add(PRICE_STEP)
            }),
            KeyCode::Char('{') => self.session.update_filters(|f| {
                f.price_range.max = f.price_range.max.saturating_sub(PRICE_STEP)
            }),
            KeyCode::Char('}') => self.session.update_filters(|f| {
                f.price_range.max = f.price_range.max.saturating_add(PRICE_STEP)
            }),
            KeyCode::Char('i') => self.session.update_filters(|f| f.in_person = !f.in_person),
            KeyCode::Char('t') => self.session.update_filters(|f| f.telehealth = !f.telehealth),
            KeyCode::Char('a') => {
                self.session.update_filters(|f| f.accepting_new = !f.accepting_new)
            }
            KeyCode::Char('r') => self.session.reset_filters(),
            KeyCode::Char('l') => {
                self.session.request_location();
            }
            KeyCode::Char('v') => {
                self.layout = match self.layout {
                    CardLayout::List => CardLayout::Compact,
                    CardLayout::Compact => CardLayout::List,
                }
            }
            _ => {}
        }
        self.clamp_cursor();
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.focus {
            Focus::Results => {
                let len = self.session.results_count();
                self.cursor = step(self.cursor, delta, len);
            }
            Focus::Filters => {
                self.tag_cursor = step(self.tag_cursor, delta, SPECIALIZATIONS.len());
            }
        }
    }

    fn open_highlighted(&mut self) {
        let id = self
            .session
            .filtered_and_sorted()
            .get(self.cursor)
            .map(|p| p.id.clone());
        if let Some(id) = id {
            self.session.select_provider(Some(id));
        }
    }

    fn toggle_highlighted_tag(&mut self) {
        if let Some(tag) = SPECIALIZATIONS.get(self.tag_cursor) {
            self.session.toggle_specialization(tag);
        }
    }

    /// Keep the highlight on a row that still exists after the results change.
    fn clamp_cursor(&mut self) {
        let len = self.session.results_count();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Feed any location fixes that arrived since the last frame.
    fn drain_location_fixes(&mut self) {
        while let Ok(fix) = self.host.location_fixes.try_recv() {
            self.session.resolve_location(fix.ticket, fix.outcome);
        }
    }

    /// The toast to show now, if any. Loading toasts stay until replaced.
    fn visible_toast(&self) -> Option<Toast> {
        let toast = self.host.notifier.latest()?;
        let age = Utc::now().signed_duration_since(toast.issued_at);
        if toast.level == ToastLevel::Loading || age.num_seconds() < TOAST_SECS {
            Some(toast)
        } else {
            None
        }
    }
}

/// Move `index` by `delta` within `0..len`, saturating at both ends.
fn step(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    index.saturating_add_signed(delta).min(len - 1)
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    let full = f.area();

    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(10),   // filters + results
            Constraint::Length(1), // toast
            Constraint::Length(3), // footer
        ])
        .split(full);

    render_header(f, outer_chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(outer_chunks[1]);

    render_filters(f, body[0], app);
    render_results(f, body[1], app);
    render_toast(f, outer_chunks[2], app);
    render_footer(f, outer_chunks[3], app);

    if let Some(provider) = app.session.selected_provider() {
        render_profile(f, centered_rect(70, 80, outer_chunks[1]), provider);
    }
    if app.session.state().hotlines_visible {
        render_hotlines(f, centered_rect(60, 70, outer_chunks[1]), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let state = app.session.state();

    let mut spans: Vec<Span> = vec![
        Span::styled("Therapist Finder    ", title_style),
        Span::styled(
            format!("{} therapists  ", app.session.results_count()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("sort: {}  ", state.sort_key)),
        Span::styled(
            format!("near {}  ", state.user_location),
            Style::default().fg(Color::Gray),
        ),
    ];

    if app.session.sos_visible() {
        spans.push(Span::styled(
            " SOS [h] ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn on_off(on: bool) -> Span<'static> {
    if on {
        Span::styled("ON ", Style::default().fg(Color::Green))
    } else {
        Span::styled("OFF", Style::default().fg(Color::Red))
    }
}

fn render_filters(f: &mut Frame, area: Rect, app: &App) {
    let filters = &app.session.state().filters;
    let key = Style::default().fg(Color::Cyan);

    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::raw("Radius      "),
            Span::styled(
                format!("{:.0} km", filters.radius_km),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(
            RADIUS_PRESETS_KM
                .iter()
                .enumerate()
                .flat_map(|(i, km)| {
                    let style = if *km == filters.radius_km {
                        Style::default().fg(Color::Black).bg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    [
                        Span::styled(format!("[{}]", i + 1), key),
                        Span::styled(format!("{:.0}km", km), style),
                        Span::raw(" "),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
        Line::from(vec![
            Span::raw("Price       "),
            Span::styled(
                format!("${} - ${}", filters.price_range.min, filters.price_range.max),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("[[ ]] ", key),
            Span::raw("min  "),
            Span::styled("[{ }] ", key),
            Span::raw("max"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("[i] ", key), Span::raw("In-person  "), on_off(filters.in_person)]),
        Line::from(vec![Span::styled("[t] ", key), Span::raw("Telehealth "), on_off(filters.telehealth)]),
        Line::from(vec![Span::styled("[a] ", key), Span::raw("New only   "), on_off(filters.accepting_new)]),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} active filter(s)", filters.active_count()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    let focused = app.focus == Focus::Filters;
    for (i, tag) in SPECIALIZATIONS.iter().enumerate() {
        let checked = filters.specializations.contains(*tag);
        let mark = if checked { "[x]" } else { "[ ]" };
        let mut style = if checked {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        if focused && i == app.tag_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(format!("{} {}", mark, tag), style)));
    }

    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(" Filters ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_results(f: &mut Frame, area: Rect, app: &App) {
    let results = app.session.filtered_and_sorted();
    let focused = app.focus == Focus::Results;
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(format!(" Results ({}) ", results.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    if results.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from("No therapists match these filters."),
            Line::from(Span::styled(
                "Widen the radius with [+] or reset with [r].",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|p| match app.layout {
            CardLayout::List => list_card(p),
            CardLayout::Compact => compact_card(p),
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(focused.then_some(app.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn list_card(p: &Provider) -> ListItem<'static> {
    let availability = if p.accepting_new {
        Span::styled("Accepting new clients", Style::default().fg(Color::Green))
    } else {
        Span::styled("Waitlist", Style::default().fg(Color::Yellow))
    };
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                format!("{:<4}", p.initials()),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", p.credentials), Style::default().fg(Color::Gray)),
            Span::raw(format!(
                "  {:.1} km  {:.1} ({})",
                p.distance_km, p.rating, p.review_count
            )),
        ]),
        Line::from(vec![
            Span::raw("    "),
            Span::styled(
                truncate(&p.headline_specializations().join(", "), 40),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw(format!("  {}  ", p.session_labels().join(" + "))),
            availability,
        ]),
    ])
}

fn compact_card(p: &Provider) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::raw(format!("{:<24}", truncate(&p.name, 23))),
        Span::raw(format!("{:>6.1} km  {:.1}", p.distance_km, p.rating)),
        Span::styled(
            if p.accepting_new { "  open" } else { "  full" },
            Style::default().fg(if p.accepting_new { Color::Green } else { Color::Yellow }),
        ),
    ]))
}

fn render_profile(f: &mut Frame, area: Rect, p: &Provider) {
    let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled(p.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {}", p.credentials)),
            if p.verified {
                Span::styled("  Verified", Style::default().fg(Color::Green))
            } else {
                Span::raw("")
            },
        ]),
        Line::from(format!(
            "{:.1} ({} reviews)  {:.1} km  {} years  {}",
            p.rating, p.review_count, p.distance_km, p.years_experience, p.fee_range
        )),
        Line::from(format!("Sessions: {}", p.session_labels().join(", "))),
    ];
    if let Some(next) = &p.next_available {
        lines.push(Line::from(format!("Next available: {}", next)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("About", heading)));
    lines.push(Line::from(p.bio.clone()));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Specializations", heading)));
    lines.push(Line::from(p.specializations.join(", ")));
    lines.push(Line::from(Span::styled("Approaches", heading)));
    lines.push(Line::from(p.modalities.join(", ")));
    lines.push(Line::from(Span::styled("Languages / Insurance", heading)));
    lines.push(Line::from(format!(
        "{}  |  {}",
        p.languages.join(", "),
        p.insurance.join(", ")
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Hours", heading)));
    for (day, hours) in p.weekly_schedule() {
        lines.push(Line::from(format!("  {:<10} {}", day, hours)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Contact", heading)));
    lines.push(Line::from(format!("{}  {}", p.phone, p.email)));
    if let Some(site) = &p.website {
        lines.push(Line::from(site.clone()));
    }
    lines.push(Line::from(p.address.clone()));

    let block = Block::default()
        .title(" Profile  [c] copy contact  [x] share  [Esc] close ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_hotlines(f: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "If you are in immediate danger, call 911.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for hotline in app.session.hotlines() {
        lines.push(Line::from(Span::styled(
            hotline.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            hotline.description.clone(),
            Style::default().fg(Color::Gray),
        )));
        let mut action = vec![Span::styled(
            hotline.action_label(),
            Style::default().fg(Color::Green),
        )];
        if let Some(hint) = hotline.dial_hint() {
            action.push(Span::raw(format!(" ({})", hint)));
        }
        action.push(Span::styled(
            format!("  {}", hotline.hours),
            Style::default().fg(Color::DarkGray),
        ));
        lines.push(Line::from(action));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(" Crisis Hotlines  [Esc] close ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_toast(f: &mut Frame, area: Rect, app: &App) {
    let Some(toast) = app.visible_toast() else {
        return;
    };
    let color = match toast.level {
        ToastLevel::Loading => Color::Yellow,
        ToastLevel::Success => Color::Green,
        ToastLevel::Error => Color::Red,
        ToastLevel::Info => Color::Cyan,
    };
    f.render_widget(
        Paragraph::new(Span::styled(format!(" {}", toast.message), Style::default().fg(color))),
        area,
    );
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = Style::default().fg(Color::Cyan);
    let bindings: &[(&str, &str)] = match app.session.topmost_overlay() {
        Some(Overlay::Hotlines) => &[("[Esc] ", "Close")],
        Some(Overlay::Profile) => &[
            ("[c] ", "Copy contact  "),
            ("[x] ", "Share  "),
            ("[h] ", "Hotlines  "),
            ("[Esc] ", "Close"),
        ],
        None => &[
            ("[↑↓] ", "Move  "),
            ("[Enter] ", "Open  "),
            ("[Tab] ", "Focus  "),
            ("[1-3/+-] ", "Radius  "),
            ("[[]{}] ", "Price  "),
            ("[s] ", "Sort  "),
            ("[r] ", "Reset  "),
            ("[l] ", "Locate  "),
            ("[v] ", "Layout  "),
            ("[h] ", "Hotlines"),
        ],
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (k, label) in bindings {
        spans.push(Span::styled(*k, key));
        spans.push(Span::raw(*label));
    }
    spans.push(Span::styled("  [q] ", key));
    spans.push(Span::raw("Quit"));

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Truncate a string to at most `max` chars, appending "…" if truncated.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// A rectangle of the given percentage size centred in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

/// Raw mode and the alternate screen, held for the guard's lifetime.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn build_app() -> FinderResult<App> {
    let (session, host) = reference_session(
        reference_directory()?,
        LocatorMode::Fix(SIMULATED_FIX),
        LOCATION_DELAY,
    );
    Ok(App::new(session, host))
}

fn main() -> io::Result<()> {
    let mut app = match build_app() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to load directory: {}", e);
            std::process::exit(1);
        }
    };

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut guard = TerminalGuard::acquire()?;

    while !app.quit {
        app.drain_location_fixes();
        guard.terminal.draw(|f| ui(f, &app))?;

        // Short poll so location fixes and toast expiry show up promptly.
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
