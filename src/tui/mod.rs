//! Terminal user interface for photodeck.

mod app;
mod components;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
};

use crate::config::Config;
use crate::core::{self, Deck, Route};

pub use app::App;
use components::{render_disabled, render_footer, render_gallery};

/// Run the TUI application.
///
/// # Errors
///
/// Returns an error if terminal initialization fails or the event loop encounters an error.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let (source, store) = core::open(&config)?;
    let mut app = App::new(Deck::new(source, store));
    app.start();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    if config.tui.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    if config.tui.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.sync();
        terminal.draw(|f| draw(f, app))?;

        tokio::select! {
            () = tokio::time::sleep(Duration::from_millis(10)) => {
                while event::poll(Duration::from_millis(0))? {
                    match event::read()? {
                        // Some terminals (e.g. Termux) may not report KeyEventKind correctly
                        Event::Key(key) if key.kind != KeyEventKind::Release => {
                            if handle_key(app, key.code, key.modifiers) {
                                return Ok(());
                            }
                        }
                        Event::Paste(text) => handle_paste(app, &text),
                        Event::Mouse(mouse) => match mouse.kind {
                            MouseEventKind::ScrollDown => select_next(app),
                            MouseEventKind::ScrollUp => select_previous(app),
                            _ => {}
                        },
                        _ => {}
                    }
                }
            }

            _ = app.next_load() => {}
        }

        // Pick up anything else that finished in the meantime.
        app.drain_loads();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn draw(frame: &mut Frame, app: &App) {
    let full_area = frame.area();
    let area = Rect::new(
        full_area.x + 1,
        full_area.y,
        full_area.width.saturating_sub(2),
        full_area.height,
    );
    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

    match app.deck.route() {
        Route::Home { .. } => render_gallery(frame, chunks[0], app.deck.gallery()),
        Route::Disabled => render_disabled(frame, chunks[0], app.deck.review()),
    }
    render_footer(frame, chunks[1], app.deck.route(), app.status.as_deref());
}

fn select_next(app: &mut App) {
    match app.deck.route() {
        Route::Home { .. } => app.deck.gallery_mut().select_next(),
        Route::Disabled => app.deck.review_mut().select_next(),
    }
}

fn select_previous(app: &mut App) {
    match app.deck.route() {
        Route::Home { .. } => app.deck.gallery_mut().select_previous(),
        Route::Disabled => app.deck.review_mut().select_previous(),
    }
}

fn handle_paste(app: &mut App, text: &str) {
    if !matches!(app.deck.route(), Route::Home { .. }) {
        return;
    }
    let gallery = app.deck.gallery_mut();
    for c in text.chars().filter(|c| !c.is_control()) {
        gallery.search_push(c);
    }
}

/// Handle a key press. Returns true if the app should exit.
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match code {
            KeyCode::Char('c') => return true,
            KeyCode::Char('r') => app.reload(),
            _ => {}
        }
        return false;
    }

    match code {
        KeyCode::Up => select_previous(app),
        KeyCode::Down => select_next(app),
        _ => match app.deck.route() {
            Route::Home { .. } => return handle_home_key(app, code),
            Route::Disabled => handle_disabled_key(app, code),
        },
    }
    false
}

fn handle_home_key(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Esc => {
            if app.deck.gallery().search().is_empty() {
                return true;
            }
            app.deck.gallery_mut().set_search("");
        }
        KeyCode::Enter => app.hide_selected(),
        KeyCode::Tab => app.open_disabled(),
        KeyCode::Backspace => app.deck.gallery_mut().search_pop(),
        KeyCode::Char(c) => {
            app.deck.gallery_mut().search_push(c);
            app.status = None;
        }
        _ => {}
    }
    false
}

fn handle_disabled_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Enter | KeyCode::Char(' ') => app.re_enable_selected(),
        KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => app.close_disabled(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::core::photo::photo;
    use crate::core::{DisabledStore, FixedPhotoSource, PhotoKey, Storage};

    async fn app(source: Arc<FixedPhotoSource>) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DisabledStore::open(Storage::with_root(
            dir.path().to_path_buf(),
        )));
        let mut app = App::new(Deck::new(source, store));
        app.start();
        assert!(app.next_load().await);
        (app, dir)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, code, KeyModifiers::NONE)
    }

    fn source() -> Arc<FixedPhotoSource> {
        Arc::new(FixedPhotoSource::new(vec![
            photo(1, 1, "Alpha"),
            photo(1, 2, "bravo"),
        ]))
    }

    #[tokio::test]
    async fn typing_filters_and_space_is_searchable() {
        let (mut app, _dir) = app(source()).await;
        for c in "al ".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.deck.gallery().search(), "al ");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.deck.gallery().visible().len(), 1);
    }

    #[tokio::test]
    async fn enter_hides_selected_photo() {
        let (mut app, _dir) = app(source()).await;
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        assert!(app.deck.store().snapshot().contains(&PhotoKey::new(1, 2)));
        assert_eq!(app.deck.gallery().visible().len(), 1);
        assert_eq!(app.status.as_deref(), Some("Disabled 1-2"));
    }

    #[tokio::test]
    async fn re_enable_returns_home_and_reloads() {
        let source = source();
        let (mut app, _dir) = app(Arc::clone(&source)).await;
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.deck.route(), &Route::Disabled);
        assert!(app.next_load().await);
        assert_eq!(app.deck.review().entries().len(), 1);

        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.deck.route(), &Route::home());
        assert_eq!(app.deck.navigator().depth(), 1);
        assert!(app.deck.store().snapshot().is_empty());

        // The reload signal triggers a fresh gallery fetch.
        assert!(app.next_load().await);
        assert_eq!(source.fetch_count(), 3);
        assert_eq!(app.deck.gallery().visible().len(), 2);
    }

    #[tokio::test]
    async fn esc_from_disabled_goes_back_without_fetch() {
        let source = source();
        let (mut app, _dir) = app(Arc::clone(&source)).await;
        press(&mut app, KeyCode::Tab);
        assert!(app.next_load().await);

        assert!(!press(&mut app, KeyCode::Esc));
        assert_eq!(app.deck.route(), &Route::home());
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn esc_clears_search_then_quits() {
        let (mut app, _dir) = app(source()).await;
        press(&mut app, KeyCode::Char('x'));
        assert!(!press(&mut app, KeyCode::Esc));
        assert!(app.deck.gallery().search().is_empty());
        assert!(press(&mut app, KeyCode::Esc));
    }

    #[tokio::test]
    async fn ctrl_c_quits_and_ctrl_r_reloads() {
        let source = source();
        let (mut app, _dir) = app(Arc::clone(&source)).await;

        assert!(!handle_key(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(app.deck.gallery().state().is_loading());
        assert!(app.next_load().await);
        assert_eq!(source.fetch_count(), 2);

        assert!(handle_key(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[tokio::test]
    async fn paste_appends_to_search() {
        let (mut app, _dir) = app(source()).await;
        handle_paste(&mut app, "bra\nvo");
        assert_eq!(app.deck.gallery().search(), "bravo");
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_photos() {
        let source = source();
        let (mut app, _dir) = app(Arc::clone(&source)).await;
        source.fail("offline");

        app.reload();
        assert!(app.next_load().await);
        assert!(app.deck.gallery().state().failure().is_some());
        assert_eq!(app.deck.gallery().visible().len(), 2);
    }
}
