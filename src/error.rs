use std::{io::Write, result};

pub type Result<T> = result::Result<T, Error>;

/// Every lexical error is recoverable; the scanner reports it and keeps going.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("[line {line}] Error: {kind}")]
pub struct Error {
    kind: ErrorKind,
    line: usize,
}

impl Error {
    pub fn unterminated_string(line: usize) -> Error {
        Error { kind: ErrorKind::UnterminatedString, line }
    }

    pub fn unexpected_character(line: usize, c: char) -> Error {
        Error { kind: ErrorKind::UnexpectedCharacter(c), line }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Receives the lexical errors found while scanning.
///
/// A reporter is handed to each scan explicitly, so independent scans never
/// share error state. Reporting never stops the scan.
pub trait Reporter {
    fn report(&mut self, error: &Error);
}

impl <F: FnMut(usize, &str)> Reporter for F {
    fn report(&mut self, error: &Error) {
        (*self)(error.line(), &error.message())
    }
}

impl Reporter for Vec<Error> {
    fn report(&mut self, error: &Error) {
        self.push(error.clone());
    }
}

/// Writes one `[line N] Error: ...` line per report to the wrapped stream.
pub struct StreamReporter<W: Write> {
    stream: W,
    had_error: bool,
}

impl <W: Write> StreamReporter<W> {
    pub fn new(stream: W) -> Self {
        StreamReporter { stream, had_error: false }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    /// Forget earlier reports, e.g. between lines of an interactive session.
    pub fn reset(&mut self) {
        self.had_error = false;
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl <W: Write> Reporter for StreamReporter<W> {
    fn report(&mut self, error: &Error) {
        self.had_error = true;
        if let Err(e) = writeln!(self.stream, "{}", error) {
            log::warn!("could not write diagnostic for line {}: {}", error.line(), e);
        }
    }
}

pub fn stderr_reporter() -> StreamReporter<std::io::Stderr> {
    StreamReporter::new(std::io::stderr())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn displays_line_and_message() {
        let e = Error::unexpected_character(3, '@');
        assert_eq!(e.to_string(), "[line 3] Error: Unexpected character: @");

        let e = Error::unterminated_string(1);
        assert_eq!(e.to_string(), "[line 1] Error: Unterminated string.");
    }

    #[test]
    fn closures_receive_line_and_message() {
        let mut seen = Vec::new();
        let mut sink = |line: usize, message: &str| seen.push((line, message.to_string()));
        sink.report(&Error::unexpected_character(2, '#'));
        assert_eq!(seen, vec![(2, "Unexpected character: #".to_string())]);
    }

    #[test]
    fn stream_reporter_writes_one_line_per_error() {
        let mut reporter = StreamReporter::new(Vec::new());
        assert!(!reporter.had_error());

        reporter.report(&Error::unterminated_string(4));
        reporter.report(&Error::unexpected_character(5, '$'));
        assert!(reporter.had_error());

        let written = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            written,
            "[line 4] Error: Unterminated string.\n[line 5] Error: Unexpected character: $\n"
        );
    }

    #[test]
    fn reset_clears_the_error_flag() {
        let mut reporter = StreamReporter::new(Vec::new());
        reporter.report(&Error::unterminated_string(1));
        reporter.reset();
        assert!(!reporter.had_error());
    }
}
