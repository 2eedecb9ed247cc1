//! Root application module.
//!
//! [`App`] owns the session and runs the read-execute-draw loop until the
//! user exits or input ends. The session is saved either way.

use std::io::{self, BufRead, Write};

use tracing::{error, info};

use crate::components::{ConsolePrompt, Window};
use crate::config::Settings;
use crate::core::listing::current_page;
use crate::core::{CommandContext, CommandTable, LocalFs, PathStyle, SessionState, SessionStore};

/// The interactive file manager.
pub struct App<R, W> {
    table: CommandTable,
    state: SessionState,
    store: SessionStore,
    window: Window,
    settings: Settings,
    fs: LocalFs,
    style: PathStyle,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(
        settings: Settings,
        store: SessionStore,
        state: SessionState,
        input: R,
        output: W,
    ) -> Result<Self, regex::Error> {
        let style = PathStyle::native();
        Ok(Self {
            table: CommandTable::new(style)?,
            state,
            store,
            window: Window::new(settings),
            settings,
            fs: LocalFs,
            style,
            input,
            output,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run until `exit` or end of input, then save the session.
    pub fn run(&mut self) -> io::Result<()> {
        let outcome = self.window.init(&mut self.output).and_then(|_| self.run_loop());
        self.save();
        let restored = self.window.restore(&mut self.output);
        outcome.and(restored)
    }

    fn run_loop(&mut self) -> io::Result<()> {
        loop {
            let view = current_page(&mut self.state, self.settings.files_per_page);
            self.window.draw(&mut self.output, &self.state, &view)?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                info!("input closed");
                return Ok(());
            }
            if self.execute(line.trim_end_matches(['\r', '\n'])) {
                return Ok(());
            }
        }
    }

    /// Execute one command line. Returns `true` when the user asked to exit.
    pub fn execute(&mut self, line: &str) -> bool {
        let mut prompt = ConsolePrompt::new(&mut self.input, &mut self.output);
        let mut ctx = CommandContext {
            current_dir: self.state.current_dir(),
            style: self.style,
            fs: &self.fs,
            prompt: &mut prompt,
        };
        let result = self.table.execute_line(line, &mut ctx);
        self.state.apply(result)
    }

    fn save(&self) {
        if let Err(err) = self.store.save(&self.state) {
            error!(error = %err, "cannot save session");
        }
    }
}
