// Theme context - Explicit dark/light mode state with change notification
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("unknown theme mode: {}", other)),
        }
    }
}

/// Shared theme state handed to whoever renders. Subscribers are woken only
/// when the mode actually changes.
#[derive(Clone)]
pub struct ThemeContext {
    sender: Arc<watch::Sender<ThemeMode>>,
}

impl ThemeContext {
    pub fn new(initial: ThemeMode) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> ThemeMode {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ThemeMode> {
        self.sender.subscribe()
    }

    /// Returns whether the mode changed
    pub fn set(&self, mode: ThemeMode) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == mode {
                return false;
            }
            *current = mode;
            true
        })
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(ThemeMode::Light)
    }
}
