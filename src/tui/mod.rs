// TUI module - Terminal User Interface
//
// This module owns the terminal. It handles:
// - Terminal initialization and cleanup
// - Signal registration (resize, termination)
// - The main loop: resize, input, clipboard poll, redraw, sleep
// - Handing the terminal over to editors and back (TerminalSurface)

pub mod ui;

use crate::app::{App, KeyChord, ResizeCoordinator};
use crate::transform::Surface;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Put the terminal in raw mode on the alternate screen
///
/// A failure part way through undoes the steps already taken.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    undo_on_error(execute!(stdout, EnterAlternateScreen), || {
        let _ = disable_raw_mode();
    })
    .context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    undo_on_error(Terminal::new(backend), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })
    .context("Failed to create terminal")
}

/// Run `undo` when `result` is an error, then pass the result on
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

/// Undo `init_terminal`
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// The real terminal as seen by transforms
///
/// Suspending hands the tty to the child (cooked mode, main screen);
/// resuming takes it back and forces a full repaint.
pub struct TerminalSurface<'a> {
    terminal: &'a mut Tui,
}

impl<'a> TerminalSurface<'a> {
    pub fn new(terminal: &'a mut Tui) -> Self {
        Self { terminal }
    }
}

impl Surface for TerminalSurface<'_> {
    fn suspend(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        enable_raw_mode().context("Failed to enable raw mode")?;
        self.terminal.clear().context("Failed to clear terminal")?;
        Ok(())
    }
}

/// Route termination signals and SIGWINCH to flags
///
/// Returns the quit flag. The handlers do nothing but store `true`.
fn register_signals(resize: &ResizeCoordinator) -> Result<Arc<AtomicBool>> {
    let quit = Arc::new(AtomicBool::new(false));
    for signal in signal_hook::consts::TERM_SIGNALS {
        signal_hook::flag::register(*signal, Arc::clone(&quit))
            .with_context(|| format!("Failed to register handler for signal {}", signal))?;
    }

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGHUP, SIGWINCH};
        signal_hook::flag::register(SIGHUP, Arc::clone(&quit))
            .context("Failed to register SIGHUP handler")?;
        signal_hook::flag::register(SIGWINCH, resize.signal_flag())
            .context("Failed to register SIGWINCH handler")?;
    }
    #[cfg(not(unix))]
    let _ = resize;

    Ok(quit)
}

/// Run the TUI until quit
///
/// Fails only if the terminal can't be set up; everything after that is
/// best effort.
pub fn run(app: &mut App, poll_interval: Duration) -> Result<()> {
    let mut resize = ResizeCoordinator::new();
    let quit = register_signals(&resize)?;

    let mut terminal = init_terminal()?;
    let size = terminal.size().context("Failed to query terminal size")?;
    app.resize(size.width, size.height);

    run_event_loop(&mut terminal, app, &mut resize, &quit, poll_interval);

    if let Err(e) = restore_terminal(&mut terminal) {
        tracing::warn!("Failed to restore terminal: {:#}", e);
    }
    Ok(())
}

/// Main event loop
///
/// One iteration: apply a signalled resize, drain pending input, poll the
/// clipboard once, redraw if anything changed, sleep. A terminal that can no
/// longer be drawn ends the session like a quit.
fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    resize: &mut ResizeCoordinator,
    quit: &AtomicBool,
    poll_interval: Duration,
) {
    loop {
        if let Some((width, height)) = resize.poll_signal(|| crossterm::terminal::size().ok()) {
            apply_resize(terminal, app, width, height);
        }

        while event::poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key_event)) if key_event.kind == KeyEventKind::Press => {
                    let key = KeyChord::from(key_event);
                    app.dispatch(&key, &mut TerminalSurface::new(terminal));
                }
                Ok(Event::Resize(width, height)) => {
                    if let Some((width, height)) = resize.on_resize_event(width, height) {
                        apply_resize(terminal, app, width, height);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read terminal event: {}", e);
                    break;
                }
            }
            if app.should_quit() {
                break;
            }
        }

        if quit.load(Ordering::SeqCst) || app.should_quit() {
            break;
        }

        app.poll_clipboard(&mut TerminalSurface::new(terminal));

        if !redraw_if_dirty(app, |app| terminal.draw(|f| ui::draw(f, app)).map(drop)) {
            break;
        }

        std::thread::sleep(poll_interval);
    }
}

/// Draw when the app asks for it. Returns false if drawing failed.
fn redraw_if_dirty(app: &mut App, draw: impl FnOnce(&App) -> io::Result<()>) -> bool {
    if !app.take_redraw() {
        return true;
    }
    match draw(app) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!("Failed to draw terminal: {}", e);
            false
        }
    }
}

/// Rebuild the drawing surface at the new size and re-anchor the view
fn apply_resize(terminal: &mut Tui, app: &mut App, width: u16, height: u16) {
    tracing::debug!("Resize to {}x{}", width, height);
    if let Err(e) = terminal.resize(Rect::new(0, 0, width, height)) {
        tracing::warn!("Failed to resize terminal: {}", e);
    }
    app.resize(width, height);
}
