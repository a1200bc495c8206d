// sqlbackup/src/utils/output.rs
use colored::Colorize;

/// Verbosity levels, ordered from least to most chatty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    #[default]
    Normal,
    Verbose,
    VeryVerbose,
    Debug,
}

impl Verbosity {
    /// Maps the number of `-v` flags to a level (`-v`, `-vv`, `-vvv`).
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            2 => Verbosity::VeryVerbose,
            _ => Verbosity::Debug,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Plain,
    Info,
    Error,
}

/// Destination for operator-facing progress and diagnostics.
pub trait OutputSink {
    fn write(&mut self, kind: MessageKind, text: &str);

    fn line(&mut self, text: &str) {
        self.write(MessageKind::Plain, text);
    }

    fn info(&mut self, text: &str) {
        self.write(MessageKind::Info, text);
    }

    fn error(&mut self, text: &str) {
        self.write(MessageKind::Error, text);
    }
}

/// Writes plain and info text to stdout, errors to stderr.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write(&mut self, kind: MessageKind, text: &str) {
        match kind {
            MessageKind::Plain => println!("{}", text),
            MessageKind::Info => println!("{}", text.green()),
            MessageKind::Error => eprintln!("{}", text.red()),
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub messages: Vec<(MessageKind, String)>,
}

#[cfg(test)]
impl RecordingSink {
    pub fn of_kind(&self, kind: MessageKind) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text.as_str())
            .collect()
    }
}

#[cfg(test)]
impl OutputSink for RecordingSink {
    fn write(&mut self, kind: MessageKind, text: &str) {
        self.messages.push((kind, text.to_string()));
    }
}
