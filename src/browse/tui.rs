use super::BrowseState;
use crate::loader::{DocumentSource, FeedLoader};
use crate::present::PostView;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use feed_core::ThreadRandom;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::stdout;
use std::time::Duration;

/// Run the live feed dashboard until the user quits.
pub fn run<S: DocumentSource>(
    loader: &FeedLoader<S>,
    mut state: BrowseState,
    source_label: &str,
) -> Result<()> {
    enable_raw_mode()?;
    let _raw_mode = OnDrop(|| {
        let _ = disable_raw_mode();
    });
    stdout().execute(EnterAlternateScreen)?;
    let _alternate_screen = OnDrop(|| {
        let _ = stdout().execute(LeaveAlternateScreen);
    });

    let backend = ratatui::backend::CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    run_loop(&mut terminal, loader, &mut state, source_label)
}

/// Runs its closure when dropped, so terminal state is restored on every
/// exit path including a failed setup step.
struct OnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        (self.0)()
    }
}

fn run_loop<S: DocumentSource>(
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    loader: &FeedLoader<S>,
    state: &mut BrowseState,
    source_label: &str,
) -> Result<()> {
    let mut rng = ThreadRandom;
    let poll_interval = Duration::from_millis(250);

    state.load(loader);
    state.rebuild(&mut rng);

    loop {
        terminal.draw(|frame| draw(frame, state, source_label))?;

        if !event::poll(poll_interval)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
            KeyCode::Down | KeyCode::Char('j') => {
                state.scroll = state.scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                state.scroll = state.scroll.saturating_sub(1);
            }
            KeyCode::PageDown => state.scroll = state.scroll.saturating_add(10),
            KeyCode::PageUp => state.scroll = state.scroll.saturating_sub(10),
            code => {
                if apply_control(state, code, loader) {
                    state.rebuild(&mut rng);
                }
            }
        }
    }
}

/// Handle a control key. Returns whether the feed needs rebuilding.
///
/// Every control reloads through the loader, so an expired cache entry is
/// fetched again on the next interaction and a live one is reused.
fn apply_control<S: DocumentSource>(
    state: &mut BrowseState,
    code: KeyCode,
    loader: &FeedLoader<S>,
) -> bool {
    match code {
        KeyCode::Char('p') => state.next_preset(),
        KeyCode::Char('t') => state.tag.next(),
        KeyCode::Char('T') => state.tag.prev(),
        KeyCode::Char('i') => state.imprint.next(),
        KeyCode::Char('I') => state.imprint.prev(),
        KeyCode::Char('a') => state.persona.next(),
        KeyCode::Char('A') => state.persona.prev(),
        KeyCode::Char('c') => state.clear_filters(),
        KeyCode::Char('r') => {
            loader.refresh();
            state.notices.clear();
        }
        _ => return false,
    }
    state.load(loader);
    true
}

fn draw(frame: &mut Frame, state: &BrowseState, source_label: &str) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats
            Constraint::Length(3), // Controls
            Constraint::Min(8),    // Feed
            Constraint::Length(3), // Footer
        ])
        .split(area);

    draw_header(frame, chunks[0], state);
    draw_controls(frame, chunks[1], state);
    draw_feed(frame, chunks[2], state);
    draw_footer(frame, chunks[3], state, source_label);
}

fn draw_header(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let summary = state.summary();
    let header_text = format!(
        " Posts: {}    Personas: {}    Preset: {}",
        summary.posts,
        summary.personas,
        summary.preset.title()
    );

    let block = Block::default()
        .title(" 📚 Agentic Social Feed ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        header_text,
        Style::default().fg(Color::White),
    )]))
    .block(block);

    frame.render_widget(paragraph, area);
}

fn control_span(key: &str, label: &str, value: &str) -> Vec<Span<'static>> {
    vec![
        Span::styled(format!(" [{key}] "), Style::default().fg(Color::Yellow)),
        Span::raw(format!("{label}: ")),
        Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]
}

fn draw_controls(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let mut spans = control_span("p", "Preset", state.preset.as_str());
    spans.extend(control_span("t", "Tag", state.tag.selected()));
    spans.extend(control_span("i", "Imprint", state.imprint.selected()));
    spans.extend(control_span("a", "Persona", state.persona.selected()));

    let block = Block::default()
        .title(" Feed Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn post_lines(view: &PostView) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} {}", view.glyph, view.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {}", view.handle), Style::default().fg(Color::Cyan)),
    ])];

    if !view.specialty.is_empty() {
        lines.push(Line::styled(
            view.specialty.clone(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    lines.extend(view.content.lines().map(|l| Line::raw(l.to_string())));

    if !view.hashtags.is_empty() {
        lines.push(Line::styled(
            view.hashtags.join(" "),
            Style::default().fg(Color::Blue),
        ));
    }

    for (title, author) in &view.books {
        lines.push(Line::styled(
            format!("📖 {title} by {author}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    lines.push(Line::styled(
        format!(
            "📊 {}  💬 {}  ⚡ {}  😊 {}",
            view.learning, view.engagement, view.breakthrough, view.mood
        ),
        Style::default().fg(Color::Green),
    ));

    if let Some(ref ts) = view.timestamp {
        lines.push(Line::styled(
            format!("🕐 {ts}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    lines.push(Line::raw(""));
    lines
}

fn draw_feed(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let block = Block::default()
        .title(" Feed ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if state.ranked.is_empty() {
        let message = if state.posts.is_empty() {
            "No posts available. Check your connection."
        } else {
            "No posts match the current filters."
        };
        let paragraph = Paragraph::new(Span::styled(message, Style::default().fg(Color::Yellow)))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let lines: Vec<Line> = state
        .ranked
        .iter()
        .flat_map(|post| post_lines(&PostView::build(post, &state.personas)))
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.scroll, 0));

    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowseState, source_label: &str) {
    let line = match state.notices.last() {
        Some(notice) => Line::from(vec![Span::styled(
            format!(" ⚠ {notice}"),
            Style::default().fg(Color::Yellow),
        )]),
        None => Line::from(vec![Span::styled(
            format!(
                " 📡 {source_label}   [c] clear  [r] refresh  [j/k] scroll  [q] quit"
            ),
            Style::default().fg(Color::Gray),
        )]),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::FetchError;
    use feed_core::{FixedRandom, Preset};
    use serde_json::{json, Value};
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingFeed {
        calls: Cell<usize>,
    }

    impl DocumentSource for CountingFeed {
        fn fetch(&self, path: &str) -> Result<Value, FetchError> {
            self.calls.set(self.calls.get() + 1);
            Ok(if path.ends_with("posts.json") {
                json!({
                    "posts": [
                        { "persona_id": "ada", "tags": ["AI"], "imprint": "Nimble" },
                        { "persona_id": "bo", "tags": ["ML"] }
                    ]
                })
            } else {
                json!({ "personas": { "ada": {}, "bo": {} } })
            })
        }
    }

    fn started(loader: &FeedLoader<CountingFeed>) -> BrowseState {
        let mut state = BrowseState::new(Preset::Balanced, false);
        state.load(loader);
        state.rebuild(&mut FixedRandom(0.0));
        state
    }

    fn press(state: &mut BrowseState, loader: &FeedLoader<CountingFeed>, key: char) -> bool {
        let changed = apply_control(state, KeyCode::Char(key), loader);
        if changed {
            state.rebuild(&mut FixedRandom(0.0));
        }
        changed
    }

    #[test]
    fn controls_refetch_once_the_cache_expires() {
        let loader = FeedLoader::new(CountingFeed::default(), Duration::ZERO);
        let mut state = started(&loader);
        assert_eq!(loader.source().calls.get(), 2);

        for key in ['t', 'p', 'i', 'c'] {
            assert!(press(&mut state, &loader, key));
        }
        assert_eq!(loader.source().calls.get(), 10);
    }

    #[test]
    fn controls_reuse_a_live_cache() {
        let loader = FeedLoader::new(CountingFeed::default(), Duration::from_secs(3600));
        let mut state = started(&loader);

        assert!(press(&mut state, &loader, 't'));
        assert_eq!(state.tag.selected(), "AI");
        assert_eq!(state.ranked.len(), 1);
        assert!(press(&mut state, &loader, 'a'));
        assert_eq!(loader.source().calls.get(), 2);
    }

    #[test]
    fn refresh_bypasses_a_live_cache() {
        let loader = FeedLoader::new(CountingFeed::default(), Duration::from_secs(3600));
        let mut state = started(&loader);
        assert!(press(&mut state, &loader, 'r'));
        assert_eq!(loader.source().calls.get(), 4);
    }

    #[test]
    fn unbound_keys_leave_the_feed_alone() {
        let loader = FeedLoader::new(CountingFeed::default(), Duration::ZERO);
        let mut state = started(&loader);
        assert!(!press(&mut state, &loader, 'z'));
        assert_eq!(loader.source().calls.get(), 2);
    }

    #[test]
    fn cleanup_runs_when_setup_fails_midway() {
        let restored = Cell::new(false);
        let setup = || -> Result<()> {
            let _raw_mode = OnDrop(|| restored.set(true));
            anyhow::bail!("alternate screen unavailable");
        };
        assert!(setup().is_err());
        assert!(restored.get());
    }
}
