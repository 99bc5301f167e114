//! App: terminal init, main loop, frame timing and key handling.

use crate::game::{Command, GameState, Outcome};
use crate::input::{Action, key_to_action};
use crate::stack::STACK_COUNT;
use crate::theme::Theme;
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tachyonfx::Effect;
use tracing::{debug, info};

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Playing,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Good,
    Bad,
    LevelUp,
}

/// Feedback line for the last action.
#[derive(Debug, Clone)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
    pub at: Instant,
}

impl Status {
    fn for_outcome(outcome: Outcome, now: Instant) -> Option<Self> {
        let (text, kind) = match outcome {
            Outcome::Idle | Outcome::Pickup | Outcome::Place => return None,
            Outcome::Pop { points } => (format!("+{points}"), StatusKind::Good),
            Outcome::LevelUp { levels, points } if levels > 1 => {
                (format!("+{points}  Level up x{levels}!"), StatusKind::LevelUp)
            }
            Outcome::LevelUp { points, .. } => (format!("+{points}  Level up!"), StatusKind::LevelUp),
            Outcome::Misplace(reason) => (reason.to_string(), StatusKind::Bad),
            Outcome::GameOver => ("Game over".to_string(), StatusKind::Bad),
        };
        Some(Self { text, kind, at: now })
    }
}

/// Everything the UI needs besides the game state.
pub struct View<'a> {
    pub screen: Screen,
    pub paused: bool,
    pub cursor: usize,
    pub status: Option<&'a Status>,
    pub best_score: u32,
    pub no_animation: bool,
}

pub struct App {
    args: Args,
    config: GameConfig,
    theme: Theme,
    state: GameState,
    screen: Screen,
    paused: bool,
    /// Column targeted by the arrow-key controls.
    cursor: usize,
    pending: VecDeque<Command>,
    status: Option<Status>,
    last_frame: Instant,
    /// TachyonFX fade over the board once the game ends.
    game_over_effect: Option<Effect>,
    /// Last time we processed the game-over effect (for delta).
    game_over_effect_time: Option<Instant>,
    /// Best score this run of the program.
    best_score: u32,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Self {
        let state = GameState::new(&config);
        Self {
            args,
            config,
            theme,
            state,
            screen: Screen::Playing,
            paused: false,
            cursor: 0,
            pending: VecDeque::new(),
            status: None,
            last_frame: Instant::now(),
            game_over_effect: None,
            game_over_effect_time: None,
            best_score: 0,
        }
    }

    fn reset_game(&mut self) {
        info!(score = self.state.score(), "restart");
        self.state = GameState::new(&self.config);
        self.screen = Screen::Playing;
        self.paused = false;
        self.pending.clear();
        self.status = None;
        self.last_frame = Instant::now();
        self.game_over_effect = None;
        self.game_over_effect_time = None;
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = terminal.show_cursor();
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.args.frame_rate.max(1.0));
        loop {
            let now = Instant::now();
            if self
                .status
                .as_ref()
                .is_some_and(|s| now.duration_since(s.at) > STATUS_TTL)
            {
                self.status = None;
            }

            let view = View {
                screen: self.screen,
                paused: self.paused,
                cursor: self.cursor,
                status: self.status.as_ref(),
                best_score: self.best_score,
                no_animation: self.args.no_animation,
            };
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    &self.state,
                    &self.theme,
                    &view,
                    &mut self.game_over_effect,
                    &mut self.game_over_effect_time,
                    now,
                );
            })?;

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if !self.handle_action(key_to_action(key)) {
                        return Ok(());
                    }
                }
            }

            let now = Instant::now();
            let dt = now.duration_since(self.last_frame).as_secs_f32();
            self.last_frame = now;
            if self.screen == Screen::Playing && !self.paused {
                // One command per frame keeps transfers discrete.
                let commands: Vec<Command> = self.pending.pop_front().into_iter().collect();
                for outcome in self.state.step(dt, &commands) {
                    self.on_outcome(outcome, now);
                }
            }
        }
    }

    /// Returns false when the player asked to quit.
    fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                info!(score = self.state.score(), level = self.state.level(), "quit");
                return false;
            }
            Action::Restart if self.screen == Screen::GameOver => self.reset_game(),
            Action::Pause if self.screen == Screen::Playing => {
                self.paused = !self.paused;
                // Time spent paused does not grow the columns.
                self.last_frame = Instant::now();
            }
            _ if self.paused || self.screen != Screen::Playing => {}
            Action::Pickup(i) => self.queue(Command::Pickup(i)),
            Action::Place(i) => self.queue(Command::Place(i)),
            Action::Pop => self.queue(Command::Pop),
            Action::CursorLeft => self.cursor = (self.cursor + STACK_COUNT - 1) % STACK_COUNT,
            Action::CursorRight => self.cursor = (self.cursor + 1) % STACK_COUNT,
            Action::PickupAtCursor => self.queue(Command::Pickup(self.cursor)),
            Action::PlaceAtCursor => self.queue(Command::Place(self.cursor)),
            Action::Restart | Action::Pause | Action::None => {}
        }
        true
    }

    fn queue(&mut self, command: Command) {
        if let Command::Pickup(i) | Command::Place(i) = command {
            self.cursor = i;
        }
        self.pending.push_back(command);
    }

    fn on_outcome(&mut self, outcome: Outcome, now: Instant) {
        debug!(?outcome, "outcome");
        self.best_score = self.best_score.max(self.state.score());
        if let Some(status) = Status::for_outcome(outcome, now) {
            self.status = Some(status);
        }
        if outcome == Outcome::GameOver {
            self.screen = Screen::GameOver;
            self.pending.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::Misplace;

    #[test]
    fn test_status_for_outcomes() {
        let now = Instant::now();
        assert!(Status::for_outcome(Outcome::Pickup, now).is_none());
        let s = Status::for_outcome(Outcome::Pop { points: 99 }, now).unwrap();
        assert_eq!(s.text, "+99");
        assert_eq!(s.kind, StatusKind::Good);
        let s = Status::for_outcome(Outcome::Misplace(Misplace::ColumnEmpty), now).unwrap();
        assert_eq!(s.text, "column is empty");
        assert_eq!(s.kind, StatusKind::Bad);
        let s = Status::for_outcome(
            Outcome::LevelUp {
                levels: 2,
                points: 300,
            },
            now,
        )
        .unwrap();
        assert_eq!(s.text, "+300  Level up x2!");
    }
}
