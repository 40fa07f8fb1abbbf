use std::fmt;

use log::info;

/// Non-fatal note produced while a schema is being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An input port's explicit `required = true` was dropped because a default was given
    RequiredOverridden { port: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RequiredOverridden { port } => write!(
                f,
                "the required attribute for the input port '{}' was overridden because a default was specified",
                port
            ),
        }
    }
}

/// Receiver for schema-building diagnostics
pub trait DiagnosticSink {
    fn note(&mut self, diagnostic: Diagnostic);
}

/// Sink forwarding every diagnostic to the `log` facade at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn note(&mut self, diagnostic: Diagnostic) {
        info!("{}", diagnostic);
    }
}

/// Collecting sink, handy for callers that want to inspect notes
impl DiagnosticSink for Vec<Diagnostic> {
    fn note(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink() {
        let mut notes: Vec<Diagnostic> = Vec::new();
        notes.note(Diagnostic::RequiredOverridden { port: "n".to_string() });
        assert_eq!(notes.len(), 1);
        assert!(notes[0].to_string().contains("'n'"));
    }
}
