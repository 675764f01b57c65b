use std::{collections::HashMap, path::PathBuf, str::FromStr};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use ratatui::style::Color;
use serde::{
    de::{self, Deserializer},
    Deserialize,
};

use crate::{
    action::{Action, GameAction},
    game::surface::Paint,
    utils::{get_config_dir, get_data_dir},
};

const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub palette: Palette,
}

impl Config {
    pub fn new() -> Result<Self> {
        let default_config: Config = serde_yaml::from_str(CONFIG)?;
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [("config.yaml", config::FileFormat::Yaml), ("config.json5", config::FileFormat::Json5)];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!("No configuration file in {}, using defaults", config_dir.display());
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.fill_from(default_config);
        Ok(cfg)
    }

    /// User settings win; anything they left out comes from `defaults`.
    fn fill_from(&mut self, defaults: Config) {
        for (key, action) in defaults.keybindings.global.0 {
            self.keybindings.global.entry(key).or_insert(action);
        }
        for (key, action) in defaults.keybindings.game.0 {
            self.keybindings.game.entry(key).or_insert(action);
        }
        for (paint, color) in defaults.palette.0 {
            self.palette.entry(paint).or_insert(color);
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
struct _RawKeyBindings {
    #[serde(default)]
    pub global: HashMap<String, String>,
    #[serde(default)]
    pub game: HashMap<String, String>,
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Bindings(pub HashMap<KeyEvent, Action>);

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: Bindings,
    pub game: Bindings,
}

impl KeyBindings {
    /// Global bindings shadow game bindings for the same key.
    pub fn lookup(&self, key: KeyEvent) -> Option<&Action> {
        let key = normalize_key_event(key);
        self.global.get(&key).or_else(|| self.game.get(&key))
    }
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = _RawKeyBindings::deserialize(deserializer)?;

        let global = parse_bindings(&raw.global, |name| serde_plain::from_str::<Action>(name))
            .map_err(de::Error::custom)?;
        let game = parse_bindings(&raw.game, |name| serde_plain::from_str::<GameAction>(name).map(Action::Game))
            .map_err(de::Error::custom)?;

        Ok(KeyBindings { global, game })
    }
}

fn parse_bindings<F, E>(raw: &HashMap<String, String>, parse_action: F) -> Result<Bindings, String>
where
    F: Fn(&str) -> Result<Action, E>,
    E: std::fmt::Display,
{
    raw.iter()
        .map(|(key_str, action_str)| {
            let key = parse_key_event(key_str)?;
            let action = parse_action(action_str.as_str()).map_err(|e| format!("Unknown command `{action_str}`: {e}"))?;
            Ok((key, action))
        })
        .collect::<Result<HashMap<_, _>, String>>()
        .map(Bindings)
}

/// Drops what the terminal adds on its own: kind/state, and SHIFT on symbols like `?`.
pub fn normalize_key_event(key: KeyEvent) -> KeyEvent {
    let mut modifiers = key.modifiers;
    if let KeyCode::Char(c) = key.code {
        if !c.is_ascii_alphabetic() {
            modifiers.remove(KeyModifiers::SHIFT);
        }
    }
    KeyEvent::new(key.code, modifiers)
}

fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{}`", raw));
    }
    let raw = if !raw.contains("><") {
        let raw = raw.strip_prefix('<').unwrap_or(raw);
        let raw = raw.strip_prefix('>').unwrap_or(raw);
        raw
    } else {
        raw
    };
    let raw = raw.trim_start_matches('<').trim_end_matches('>');

    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            },
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            },
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            },
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        },
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        f if f.len() > 1 && f.starts_with('f') && f[1..].parse::<u8>().is_ok_and(|n| (1..=12).contains(&n)) => {
            KeyCode::F(f[1..].parse().unwrap_or(1))
        },
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().unwrap_or(' ');
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "Backspace",
        KeyCode::Enter => "Enter",
        KeyCode::Left => "Left",
        KeyCode::Right => "Right",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Tab => "Tab",
        KeyCode::BackTab => "BackTab",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::F(c) => {
            char = format!("F{c}");
            &char
        },
        KeyCode::Char(' ') => "Space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        },
        KeyCode::Esc => "Esc",
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);

    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("Ctrl");
    }

    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("Shift");
    }

    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("Alt");
    }

    let mut key = modifiers.join("-");

    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);

    key
}

/// Colour for every kind of draw call.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Palette(pub HashMap<Paint, Color>);

impl Palette {
    pub fn color(&self, paint: Paint) -> Color {
        self.get(&paint).copied().unwrap_or(Color::Reset)
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;

        raw.into_iter()
            .map(|(name, color)| {
                let paint = Paint::from_str(&name).map_err(|_| de::Error::custom(format!("Unknown paint `{name}`")))?;
                let color = parse_color(&color).ok_or_else(|| de::Error::custom(format!("Unknown colour `{color}`")))?;
                Ok((paint, color))
            })
            .collect::<Result<HashMap<_, _>, D::Error>>()
            .map(Palette)
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_ascii_lowercase();
    let s = s.replace("grey", "gray");
    if s.contains("bright color") {
        let s = s.trim_start_matches("bright ");
        let c = s.trim_start_matches("color").parse::<u8>().unwrap_or_default();
        Some(Color::Indexed(c.wrapping_shl(8)))
    } else if s.contains("color") {
        let c = s.trim_start_matches("color").parse::<u8>().unwrap_or_default();
        Some(Color::Indexed(c))
    } else if s.contains("gray") {
        let c = 232 + s.trim_start_matches("gray").parse::<u8>().unwrap_or_default().min(23);
        Some(Color::Indexed(c))
    } else if s.contains("rgb") && s.len() == 6 {
        let red = (s.as_bytes()[3] as char).to_digit(10).unwrap_or_default().min(5) as u8;
        let green = (s.as_bytes()[4] as char).to_digit(10).unwrap_or_default().min(5) as u8;
        let blue = (s.as_bytes()[5] as char).to_digit(10).unwrap_or_default().min(5) as u8;
        let c = 16 + red * 36 + green * 6 + blue;
        Some(Color::Indexed(c))
    } else {
        match s.as_str() {
            "bold black" => Some(Color::Indexed(8)),
            "bold red" => Some(Color::Indexed(9)),
            "bold green" => Some(Color::Indexed(10)),
            "bold yellow" => Some(Color::Indexed(11)),
            "bold blue" => Some(Color::Indexed(12)),
            "bold magenta" => Some(Color::Indexed(13)),
            "bold cyan" => Some(Color::Indexed(14)),
            "bold white" => Some(Color::Indexed(15)),
            "black" => Some(Color::Indexed(0)),
            "red" => Some(Color::Indexed(1)),
            "green" => Some(Color::Indexed(2)),
            "yellow" => Some(Color::Indexed(3)),
            "blue" => Some(Color::Indexed(4)),
            "magenta" => Some(Color::Indexed(5)),
            "cyan" => Some(Color::Indexed(6)),
            "white" => Some(Color::Indexed(7)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState};
    use pretty_assertions::assert_eq;

    use super::*;

    fn defaults() -> Config {
        serde_yaml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_default_bindings() {
        let config = defaults();
        let bindings = &config.keybindings;
        let activate = Some(&Action::Game(GameAction::Activate));
        assert_eq!(bindings.lookup(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)), activate);
        assert_eq!(bindings.lookup(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)), activate);
        assert_eq!(bindings.lookup(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)), activate);
        assert_eq!(bindings.lookup(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)), Some(&Action::Quit));
        assert_eq!(bindings.lookup(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(&Action::Quit));
        assert_eq!(bindings.lookup(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_lookup_ignores_terminal_noise() {
        let config = defaults();
        // Terminals report `?` with SHIFT held.
        let key = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(config.keybindings.lookup(key), Some(&Action::ToggleShowHelp));

        let key = KeyEvent::new_with_kind_and_state(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
            KeyEventKind::Press,
            KeyEventState::NUM_LOCK,
        );
        assert_eq!(config.keybindings.lookup(key), Some(&Action::Game(GameAction::Activate)));
    }

    #[test]
    fn test_default_palette_is_complete() {
        let config = defaults();
        for paint in [Paint::Sky, Paint::Bird, Paint::Pipe, Paint::Ground, Paint::Text, Paint::Alert] {
            assert!(config.palette.contains_key(&paint), "{paint}");
        }
        assert_eq!(config.palette.color(Paint::Bird), Color::Indexed(11));
        assert_eq!(config.palette.color(Paint::Sky), Color::Indexed(16 + 2 * 36 + 4 * 6 + 5));
    }

    #[test]
    fn test_user_settings_win_over_defaults() {
        let mut config: Config = serde_yaml::from_str(
            r#"
keybindings:
  global:
    "<esc>": Quit
  game:
    "<space>": Activate
palette:
  bird: red
"#,
        )
        .unwrap();
        config.fill_from(defaults());

        assert_eq!(config.palette.color(Paint::Bird), Color::Indexed(1));
        assert_eq!(config.palette.color(Paint::Pipe), Color::Indexed(2));
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(config.keybindings.lookup(esc), Some(&Action::Quit));
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(config.keybindings.lookup(q), Some(&Action::Quit));
    }

    #[test]
    fn test_bad_config_is_rejected() {
        let unknown_command = serde_yaml::from_str::<Config>("keybindings:\n  game:\n    \"<space>\": Fly\n");
        assert!(unknown_command.is_err());
        let unknown_colour = serde_yaml::from_str::<Config>("palette:\n  Bird: sparkly\n");
        assert!(unknown_colour.is_err());
        let unknown_paint = serde_yaml::from_str::<Config>("palette:\n  Cloud: white\n");
        assert!(unknown_paint.is_err());
    }

    #[test]
    fn test_config() -> Result<()> {
        let config = Config::new()?;
        assert!(!config.keybindings.game.is_empty());
        assert!(!config.palette.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("rgb123"), Some(Color::Indexed(16 + 36 + 2 * 6 + 3)));
        assert_eq!(parse_color("gray12"), Some(Color::Indexed(244)));
        assert_eq!(parse_color("Bold Yellow"), Some(Color::Indexed(11)));
        assert_eq!(parse_color("color200"), Some(Color::Indexed(200)));
        assert_eq!(parse_color("unknown"), None);
    }

    #[test]
    fn test_simple_keys() {
        assert_eq!(parse_key_event("a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));
        assert_eq!(parse_key_event("<enter>").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
        assert_eq!(parse_key_event("<space>").unwrap(), KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty()));
        assert_eq!(parse_key_event("<?>").unwrap(), KeyEvent::new(KeyCode::Char('?'), KeyModifiers::empty()));
        assert_eq!(parse_key_event("<f5>").unwrap(), KeyEvent::new(KeyCode::F(5), KeyModifiers::empty()));
    }

    #[test]
    fn test_with_modifiers() {
        assert_eq!(parse_key_event("ctrl-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
        assert_eq!(parse_key_event("alt-enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
        assert_eq!(
            parse_key_event("<ctrl-alt-a>").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)
        );
        assert_eq!(parse_key_event("CTRL-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_key_event("invalid-key").is_err());
        assert!(parse_key_event("ctrl-invalid-key").is_err());
        assert!(parse_key_event("<q").is_err());
    }

    #[test]
    fn test_key_event_to_string() {
        assert_eq!(
            key_event_to_string(&KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)),
            "Ctrl-Alt-a"
        );
        assert_eq!(key_event_to_string(&KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)), "Space");
        assert_eq!(key_event_to_string(&KeyEvent::new(KeyCode::F(3), KeyModifiers::NONE)), "F3");
    }
}
