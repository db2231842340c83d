//! User-level browser commands.
//!
//! Keybinds, the command script, and the CLI all resolve to a
//! [`BrowserCommand`]. Tabs are addressed by strip position because tab ids
//! are opaque to the user.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BrowserCommand {
    NewTab(Option<String>),
    /// Close the tab at a strip position, or the active tab.
    CloseTab(Option<usize>),
    Activate(usize),
    Next,
    Prev,
    /// Navigate the active tab.
    Navigate(String),
    Back,
    Forward,
    Reload,
    Stop,
    Key(String),
    Pointer { x: f64, y: f64 },
}

impl BrowserCommand {
    /// Human-readable label for logs and menus.
    pub fn label(&self) -> &'static str {
        match self {
            BrowserCommand::NewTab(_) => "New Tab",
            BrowserCommand::CloseTab(_) => "Close Tab",
            BrowserCommand::Activate(_) => "Activate Tab",
            BrowserCommand::Next => "Next Tab",
            BrowserCommand::Prev => "Previous Tab",
            BrowserCommand::Navigate(_) => "Navigate",
            BrowserCommand::Back => "Back",
            BrowserCommand::Forward => "Forward",
            BrowserCommand::Reload => "Reload",
            BrowserCommand::Stop => "Stop",
            BrowserCommand::Key(_) => "Key",
            BrowserCommand::Pointer { .. } => "Pointer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{command}` expects {expected}")]
    BadArgument {
        command: String,
        expected: &'static str,
    },
}

impl FromStr for BrowserCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandParseError::Empty)?;
        let rest: Vec<&str> = words.collect();

        let bad = |expected: &'static str| CommandParseError::BadArgument {
            command: name.to_string(),
            expected,
        };

        let command = match name {
            "new" | "new-tab" => BrowserCommand::NewTab(rest.first().map(|s| s.to_string())),
            "close" => match rest.first() {
                Some(pos) => BrowserCommand::CloseTab(Some(
                    pos.parse().map_err(|_| bad("a tab position"))?,
                )),
                None => BrowserCommand::CloseTab(None),
            },
            "activate" | "tab" => {
                let pos = rest.first().ok_or_else(|| bad("a tab position"))?;
                BrowserCommand::Activate(pos.parse().map_err(|_| bad("a tab position"))?)
            }
            "next" => BrowserCommand::Next,
            "prev" => BrowserCommand::Prev,
            "go" | "navigate" => {
                let url = rest.first().ok_or_else(|| bad("a URL"))?;
                BrowserCommand::Navigate(url.to_string())
            }
            "back" => BrowserCommand::Back,
            "forward" => BrowserCommand::Forward,
            "reload" => BrowserCommand::Reload,
            "stop" => BrowserCommand::Stop,
            "key" => {
                let key = rest.first().ok_or_else(|| bad("a key name"))?;
                BrowserCommand::Key(key.to_string())
            }
            "click" => {
                let [x, y] = rest.as_slice() else {
                    return Err(bad("two coordinates"));
                };
                BrowserCommand::Pointer {
                    x: x.parse().map_err(|_| bad("two coordinates"))?,
                    y: y.parse().map_err(|_| bad("two coordinates"))?,
                }
            }
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

impl fmt::Display for BrowserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserCommand::NewTab(Some(url)) => write!(f, "new {url}"),
            BrowserCommand::NewTab(None) => write!(f, "new"),
            BrowserCommand::CloseTab(Some(pos)) => write!(f, "close {pos}"),
            BrowserCommand::CloseTab(None) => write!(f, "close"),
            BrowserCommand::Activate(pos) => write!(f, "activate {pos}"),
            BrowserCommand::Next => write!(f, "next"),
            BrowserCommand::Prev => write!(f, "prev"),
            BrowserCommand::Navigate(url) => write!(f, "go {url}"),
            BrowserCommand::Back => write!(f, "back"),
            BrowserCommand::Forward => write!(f, "forward"),
            BrowserCommand::Reload => write!(f, "reload"),
            BrowserCommand::Stop => write!(f, "stop"),
            BrowserCommand::Key(key) => write!(f, "key {key}"),
            BrowserCommand::Pointer { x, y } => write!(f, "click {x} {y}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!("next".parse::<BrowserCommand>(), Ok(BrowserCommand::Next));
        assert_eq!("stop".parse::<BrowserCommand>(), Ok(BrowserCommand::Stop));
        assert_eq!(
            "close".parse::<BrowserCommand>(),
            Ok(BrowserCommand::CloseTab(None))
        );
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            "new gemini://example.org/".parse::<BrowserCommand>(),
            Ok(BrowserCommand::NewTab(Some("gemini://example.org/".into())))
        );
        assert_eq!(
            "activate 2".parse::<BrowserCommand>(),
            Ok(BrowserCommand::Activate(2))
        );
        assert_eq!(
            "click 10 20.5".parse::<BrowserCommand>(),
            Ok(BrowserCommand::Pointer { x: 10.0, y: 20.5 })
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<BrowserCommand>(), Err(CommandParseError::Empty));
        assert!(matches!(
            "fly".parse::<BrowserCommand>(),
            Err(CommandParseError::Unknown(ref name)) if name == "fly"
        ));
        assert!(matches!(
            "activate two".parse::<BrowserCommand>(),
            Err(CommandParseError::BadArgument { .. })
        ));
        assert!(matches!(
            "click 1".parse::<BrowserCommand>(),
            Err(CommandParseError::BadArgument { .. })
        ));
    }

    #[test]
    fn display_parses_back() {
        let commands = [
            BrowserCommand::NewTab(None),
            BrowserCommand::CloseTab(Some(1)),
            BrowserCommand::Navigate("file:///tmp/a.gmi".into()),
            BrowserCommand::Key("Enter".into()),
        ];
        for command in commands {
            let parsed: BrowserCommand = command.to_string().parse().unwrap();
            assert_eq!(parsed, command);
        }
    }

    #[test]
    fn every_command_has_label() {
        assert_eq!(BrowserCommand::Reload.label(), "Reload");
        assert!(!BrowserCommand::Pointer { x: 0.0, y: 0.0 }.label().is_empty());
    }
}
