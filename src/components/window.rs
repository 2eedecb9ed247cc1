//! The main screen: listing window, notification window and input prompt.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, SetTitle};
use crossterm::{execute, queue};

use crate::config::{APP_NAME, Settings};
use crate::core::listing::PageView;
use crate::core::session::SessionState;
use crate::models::{Notification, NotificationKind};

/// Width used when the terminal size is unknown (e.g., output is piped).
const FALLBACK_WIDTH: u16 = 80;

/// Draws the whole screen after every command.
#[derive(Clone, Copy, Debug)]
pub struct Window {
    settings: Settings,
}

impl Window {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Set the terminal title and colors once at startup.
    pub fn init<W: Write>(&self, out: &mut W) -> io::Result<()> {
        execute!(
            out,
            SetTitle(APP_NAME),
            SetBackgroundColor(self.settings.background),
            SetForegroundColor(self.settings.foreground)
        )
    }

    /// Restore the terminal colors.
    pub fn restore<W: Write>(&self, out: &mut W) -> io::Result<()> {
        execute!(out, ResetColor)
    }

    pub fn draw<W: Write>(&self, out: &mut W, state: &SessionState, view: &PageView) -> io::Result<()> {
        let width = terminal::size().map(|(w, _)| w).unwrap_or(FALLBACK_WIDTH);

        queue!(
            out,
            SetBackgroundColor(self.settings.background),
            SetForegroundColor(self.settings.foreground),
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        for line in self.listing_lines(state, view, width) {
            queue!(out, Print(line), Print("\n"))?;
        }

        let color = match state.notification().kind {
            NotificationKind::Info => self.settings.foreground,
            NotificationKind::Warning => Color::Yellow,
            NotificationKind::Error => Color::Red,
        };
        queue!(out, SetForegroundColor(color))?;
        for line in self.notification_lines(state.notification()) {
            queue!(out, Print(line), Print("\n"))?;
        }
        queue!(
            out,
            SetForegroundColor(self.settings.foreground),
            Print(self.border(width)),
            Print("\n> ")
        )?;
        out.flush()
    }

    /// Header, entries and the border above the notification window.
    pub fn listing_lines(&self, state: &SessionState, view: &PageView, width: u16) -> Vec<String> {
        let header = state
            .current_dir()
            .map(|dir| format!("> {}", dir))
            .unwrap_or_else(|| ">".to_string());

        let mut lines = vec![self.border(width), header, String::new()];
        lines.extend(view.entries.iter().map(|entry| entry.to_string()));
        if view.pages > 1 {
            lines.push(String::new());
            lines.push(format!("page {} of {}", view.page, view.pages));
        }
        lines.push(self.border(width));
        lines
    }

    /// The notification text, padded when there is nothing to show.
    pub fn notification_lines(&self, notification: &Notification) -> Vec<String> {
        if notification.is_empty() {
            return vec![String::new(); self.settings.empty_info_height];
        }
        notification.to_string().lines().map(str::to_string).collect()
    }

    fn border(&self, width: u16) -> String {
        std::iter::repeat_n(self.settings.border_symbol, usize::from(width)).collect()
    }
}
