use color_eyre::eyre::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::{
    action::{Action, GameAction},
    components::{
        help::Help,
        scene::{viewport, Scene},
    },
    config::Config,
    constants::{game::BEST_SCORE_FILE, MIN_VIEW_HEIGHT, MIN_VIEW_WIDTH},
    game::{
        storage::{BestScoreStore, FileStore},
        surface::{DrawList, Paint},
        Game,
    },
    tui,
};

pub struct App<S = FileStore> {
    config: Config,
    frame_rate: f64,
    game: Game<S>,
    frame: DrawList,
    show_help: bool,
    should_quit: bool,
    should_suspend: bool,
}

impl App<FileStore> {
    pub fn new(frame_rate: f64) -> Result<Self> {
        let config = Config::new()?;
        let store = FileStore::new(config.config.data_dir.join(BEST_SCORE_FILE));
        log::info!("Best score kept in {}", store.path().display());
        Ok(Self::with_game(config, frame_rate, Game::new(store)))
    }
}

impl<S: BestScoreStore> App<S> {
    fn with_game(config: Config, frame_rate: f64, game: Game<S>) -> Self {
        Self {
            config,
            frame_rate,
            game,
            frame: DrawList::new(),
            show_help: false,
            should_quit: false,
            should_suspend: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = tui::Tui::new()?;
        tui.frame_rate(self.frame_rate);
        tui.enter()?;

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Frame => action_tx.send(Action::Frame)?,
                    tui::Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
                    tui::Event::Closed => action_tx.send(Action::Quit)?,
                    tui::Event::Error => action_tx.send(Action::Error("Failed to read terminal event".into()))?,
                    tui::Event::Key(key) => {
                        if let Some(action) = self.config.keybindings.lookup(key) {
                            log::info!("Got action: {action:?}");
                            action_tx.send(action.clone())?;
                        }
                    },
                    tui::Event::Mouse(mouse) => {
                        if let Some(action) = mouse_action(mouse) {
                            action_tx.send(action)?;
                        }
                    },
                    _ => {},
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Frame {
                    log::debug!("{action:?}");
                }
                if let Action::Resize(w, h) = action {
                    tui.resize(Rect::new(0, 0, w, h))?;
                }
                if self.dispatch(action) {
                    self.render(&mut tui)?;
                }
            }
            if self.should_suspend {
                tui.suspend()?;
                action_tx.send(Action::Resume)?;
                tui = tui::Tui::new()?;
                tui.frame_rate(self.frame_rate);
                tui.enter()?;
            } else if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    /// Applies one queued action. Returns whether the screen needs redrawing.
    fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Frame => {
                self.game.update();
                true
            },
            Action::Resize(..) => true,
            Action::Quit => {
                self.should_quit = true;
                false
            },
            Action::Suspend => {
                self.should_suspend = true;
                false
            },
            Action::Resume => {
                self.should_suspend = false;
                false
            },
            Action::ToggleShowHelp => {
                self.show_help = !self.show_help;
                true
            },
            Action::Error(message) => {
                log::error!("{message}");
                false
            },
            Action::Game(GameAction::Activate) => {
                if !self.show_help {
                    self.game.activate();
                }
                false
            },
        }
    }

    fn render(&mut self, tui: &mut tui::Tui) -> Result<()> {
        self.game.draw(&mut self.frame);
        tui.draw(|f| self.draw(f))?;
        Ok(())
    }

    fn draw(&self, f: &mut Frame<'_>) {
        let area = f.area();
        let view = viewport(area);

        if view.width < MIN_VIEW_WIDTH || view.height < MIN_VIEW_HEIGHT {
            let [row] = Layout::vertical([Constraint::Length(1)]).flex(ratatui::layout::Flex::Center).areas(area);
            let message = Line::from("Please enlarge the terminal").centered();
            let style = Style::default().fg(self.config.palette.color(Paint::Alert)).bold();
            f.render_widget(Paragraph::new(message).style(style), row);
            return;
        }

        f.render_widget(Scene::new(&self.frame, &self.config.palette), view);

        if self.show_help {
            match Help::new(vec![("System", &self.config.keybindings.global), ("Game", &self.config.keybindings.game)])
            {
                Ok(help) => f.render_widget(help, area),
                Err(e) => log::error!("Failed to build help: {e:?}"),
            }
        }
    }
}

fn mouse_action(mouse: MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::Game(GameAction::Activate)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::game::{phase::GamePhase, storage::MemoryStore};

    fn app() -> App<MemoryStore> {
        let config = serde_yaml::from_str(include_str!("../.config/config.yaml")).unwrap();
        App::with_game(config, 60.0, Game::seeded(MemoryStore::default(), 3))
    }

    fn screen(app: &mut App<MemoryStore>, width: u16, height: u16) -> String {
        app.game.draw(&mut app.frame);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buf = terminal.backend().buffer();
        (0..height)
            .map(|y| (0..width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_frames_drive_the_game() {
        let mut app = app();
        assert!(!app.dispatch(Action::Game(GameAction::Activate)));
        assert_eq!(app.game.phase(), GamePhase::Playing);

        let y = app.game.bird().y();
        assert!(app.dispatch(Action::Frame));
        assert!(app.game.bird().y() > y);
    }

    #[test]
    fn test_help_swallows_activate() {
        let mut app = app();
        assert!(app.dispatch(Action::ToggleShowHelp));
        app.dispatch(Action::Game(GameAction::Activate));
        assert_eq!(app.game.phase(), GamePhase::Ready);

        app.dispatch(Action::ToggleShowHelp);
        app.dispatch(Action::Game(GameAction::Activate));
        assert_eq!(app.game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_quit_and_suspend_flags() {
        let mut app = app();
        app.dispatch(Action::Suspend);
        assert!(app.should_suspend);
        app.dispatch(Action::Resume);
        assert!(!app.should_suspend);
        app.dispatch(Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn test_left_click_activates() {
        let click = |kind| MouseEvent { kind, column: 3, row: 4, modifiers: KeyModifiers::NONE };
        assert_eq!(mouse_action(click(MouseEventKind::Down(MouseButton::Left))), Some(Action::Game(GameAction::Activate)));
        assert_eq!(mouse_action(click(MouseEventKind::Down(MouseButton::Right))), None);
        assert_eq!(mouse_action(click(MouseEventKind::Up(MouseButton::Left))), None);
        assert_eq!(mouse_action(click(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_ready_screen() {
        let mut app = app();
        let screen = screen(&mut app, 40, 30);
        assert!(screen.contains("Click to Start"));
        assert!(!screen.contains("Best"));
    }

    #[test]
    fn test_small_terminal_asks_for_resize() {
        let mut app = app();
        let screen = screen(&mut app, 30, 10);
        assert!(screen.contains("Please enlarge the terminal"));
        assert!(!screen.contains("Click to Start"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app();
        app.dispatch(Action::ToggleShowHelp);
        let screen = screen(&mut app, 80, 40);
        assert!(screen.contains("System"));
        assert!(screen.contains("Activate"));
    }
}
