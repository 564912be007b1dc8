//! Interactive upgrade selector
//!
//! Key presses map to [`Command`]s, which are applied to the
//! [`StrategyController`]. The loop returns the controller on commit so the
//! rewrite happens only after the terminal has been restored.

mod view;

use crate::controller::StrategyController;
use crate::domain::Direction;
use crate::logging;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A user intent, decoupled from the key that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SwitchGroup(Direction),
    MoveCursor(Direction),
    Toggle,
    CycleTier(Direction),
    CycleGroupTier(Direction),
    Equalize,
    SelectAll,
    ClearSelection,
    Commit,
    Quit,
}

/// What the loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Commit,
    Quit,
}

/// Key bindings
pub fn command_for(key: KeyEvent) -> Option<Command> {
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let command = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('w' | 'W') | KeyCode::BackTab => Command::SwitchGroup(Direction::Prev),
        KeyCode::Char('s' | 'S') | KeyCode::Tab => Command::SwitchGroup(Direction::Next),
        KeyCode::Up | KeyCode::Char('k') => Command::MoveCursor(Direction::Prev),
        KeyCode::Down | KeyCode::Char('j') => Command::MoveCursor(Direction::Next),
        KeyCode::Left if shift => Command::CycleGroupTier(Direction::Prev),
        KeyCode::Right if shift => Command::CycleGroupTier(Direction::Next),
        KeyCode::Char('[') => Command::CycleGroupTier(Direction::Prev),
        KeyCode::Char(']') => Command::CycleGroupTier(Direction::Next),
        KeyCode::Left | KeyCode::Char('h') => Command::CycleTier(Direction::Prev),
        KeyCode::Right | KeyCode::Char('l') => Command::CycleTier(Direction::Next),
        KeyCode::Char(' ') => Command::Toggle,
        KeyCode::Char('e' | 'E') => Command::Equalize,
        KeyCode::Char('a') => Command::SelectAll,
        KeyCode::Char('c') => Command::ClearSelection,
        KeyCode::Enter => Command::Commit,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Apply a command to the controller
///
/// `Commit` with nothing selected is ignored.
pub fn apply(controller: &mut StrategyController, command: Command) -> Flow {
    let cursor = controller.cursor();
    match command {
        Command::SwitchGroup(direction) => controller.switch_group(direction),
        Command::MoveCursor(direction) => controller.move_cursor(direction),
        Command::Toggle => controller.toggle_selected(cursor),
        Command::CycleTier(direction) => controller.cycle_tier(cursor, direction),
        Command::CycleGroupTier(direction) => controller.cycle_group_tier(direction),
        Command::Equalize => controller.equalize_across_locations(),
        Command::SelectAll => controller.select_all_in_group(),
        Command::ClearSelection => controller.clear_selection(),
        Command::Commit => {
            if controller.selected_snapshot().is_empty() {
                debug!("Commit ignored, nothing selected");
                return Flow::Continue;
            }
            return Flow::Commit;
        }
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

/// Raw mode plus alternate screen, restored on drop
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;

        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            teardown_terminal();
            return Err(err).context("enter alternate screen");
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                teardown_terminal();
                Err(err).context("create terminal")
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, LeaveAlternateScreen);
}

/// Run the selector until the user commits or quits
///
/// Returns the controller on commit and `None` on quit.
pub fn run(mut controller: StrategyController, root: &Path) -> Result<Option<StrategyController>> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("the interactive selector requires a terminal (use --json otherwise)");
    }

    // Diagnostics written to stderr would tear the frame
    let _logging = logging::pause();
    let mut session = TerminalSession::new()?;
    loop {
        session
            .terminal
            .draw(|frame| view::draw(frame, &controller, root))
            .context("draw")?;

        if !event::poll(POLL_INTERVAL).context("poll")? {
            continue;
        }
        let Event::Key(key) = event::read().context("read event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(command) = command_for(key) else {
            continue;
        };

        match apply(&mut controller, command) {
            Flow::Continue => {}
            Flow::Commit => return Ok(Some(controller)),
            Flow::Quit => return Ok(None),
        }
    }
}
