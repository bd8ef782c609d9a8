use colored::{ColoredString, Colorize};
use indicatif::ProgressBar;

/// Status lines on stderr, gated by the `-v` count.
///
/// While a spinner is attached, lines go through it so they do not tear the
/// spinner line.
#[derive(Clone, Default)]
pub struct Logger {
    verbosity: u8,
    progress: Option<ProgressBar>,
}

impl Logger {
    pub fn new(verbosity: u8) -> Self {
        Self {
            verbosity,
            progress: None,
        }
    }

    pub fn with_progress(&self, pb: ProgressBar) -> Self {
        Self {
            verbosity: self.verbosity,
            progress: Some(pb),
        }
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.verbosity >= 1 {
            self.emit("INF".bold().cyan(), msg.as_ref());
        }
    }

    pub fn debug(&self, msg: impl AsRef<str>) {
        if self.verbosity >= 2 {
            self.emit("DBG".bold().magenta(), msg.as_ref());
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.emit("WRN".bold().yellow(), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        self.emit("ERR".bold().red(), msg.as_ref());
    }

    fn emit(&self, tag: ColoredString, msg: &str) {
        let line = format!("{}{}{} {}", "[".bold().white(), tag, "]".bold().white(), msg);
        match &self.progress {
            Some(pb) if !pb.is_hidden() => pb.println(line),
            _ => eprintln!("{line}"),
        }
    }
}
