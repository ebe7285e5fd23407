//! Human-readable diagnostic output with optional ANSI color support.

use std::io::Write;

use crate::{Diagnostic, LineIndex, Severity};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m";
    pub const WARNING: &str = "\x1b[1;33m";
    pub const NOTE: &str = "\x1b[1;36m";
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m";
    pub const RESET: &str = "\x1b[0m";
}

fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Colors when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Renders diagnostics for one source file, with `file:line:col` label
/// positions computed against that file's text.
pub struct TerminalEmitter<'a, W: Write> {
    writer: W,
    colors: bool,
    path: &'a str,
    source: &'a str,
    lines: LineIndex,
}

impl<'a, W: Write> TerminalEmitter<'a, W> {
    pub fn new(writer: W, mode: ColorMode, is_tty: bool, path: &'a str, source: &'a str) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            path,
            source,
            lines: LineIndex::build(source),
        }
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        };
        self.write_colored(&severity.to_string(), color);
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        self.write_severity(diagnostic.severity);
        if self.colors {
            let _ = write!(
                self.writer,
                "{}[{}]{}",
                colors::BOLD,
                diagnostic.code,
                colors::RESET
            );
        } else {
            let _ = write!(self.writer, "[{}]", diagnostic.code);
        }
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        for label in &diagnostic.labels {
            let marker = if label.is_primary { "-->" } else { "   " };
            let (line, col) = self.lines.line_col(self.source, label.span.start);
            let _ = write!(self.writer, "  {marker} {}:{line}:{col}: ", self.path);
            let color = if label.is_primary {
                colors::ERROR
            } else {
                colors::SECONDARY
            };
            self.write_colored(&label.message, color);
            let _ = writeln!(self.writer);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }

        let _ = writeln!(self.writer);
    }

    pub fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
    }

    /// Final `aborting due to N previous errors` line.
    pub fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count == 0 && warning_count == 0 {
            return;
        }
        if error_count > 0 {
            self.write_colored("error", colors::ERROR);
            let error_part = if error_count == 1 {
                "previous error".to_string()
            } else {
                format!("{error_count} previous errors")
            };
            if warning_count > 0 {
                let _ = writeln!(
                    self.writer,
                    ": aborting due to {error_part}; {warning_count} warning{} emitted",
                    plural_s(warning_count)
                );
            } else {
                let _ = writeln!(self.writer, ": aborting due to {error_part}");
            }
        } else {
            self.write_colored("warning", colors::WARNING);
            let _ = writeln!(
                self.writer,
                ": {warning_count} warning{} emitted",
                plural_s(warning_count)
            );
        }
    }

    pub fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use super::*;
    use crate::{missing_token, unexpected_token, ErrorCode};
    use dlang_syntax::Span;

    const SOURCE: &str = "module a\nint x;\n";

    fn render(mode: ColorMode, is_tty: bool, diagnostics: &[Diagnostic]) -> String {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::new(&mut output, mode, is_tty, "a.d", SOURCE);
        emitter.emit_all(diagnostics);
        emitter.emit_summary(
            diagnostics.iter().filter(|d| d.is_error()).count(),
            diagnostics.iter().filter(|d| !d.is_error()).count(),
        );
        emitter.flush();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn plain_output_has_positions_and_no_ansi() {
        let diag = missing_token(8, "`;`", "a module declaration");
        let text = render(ColorMode::Never, true, &[diag]);
        assert!(text.contains("error[E1002]"));
        assert!(text.contains("--> a.d:1:9:"));
        assert!(text.contains("aborting due to previous error"));
        assert!(!text.contains("\x1b["));
    }

    #[test]
    fn color_mode_resolution() {
        assert!(ColorMode::Auto.should_use_colors(true));
        assert!(!ColorMode::Auto.should_use_colors(false));
        assert!(ColorMode::Always.should_use_colors(false));
        assert!(!ColorMode::Never.should_use_colors(true));
    }

    #[test]
    fn always_mode_emits_ansi_without_a_tty() {
        let diag = unexpected_token(Span::new(9, 12), "`;`", "`int`", "a module declaration");
        let text = render(ColorMode::Always, false, &[diag]);
        assert!(text.contains("\x1b["));
        assert!(text.contains("E1001"));
    }

    #[test]
    fn secondary_labels_and_notes_render() {
        let diag = Diagnostic::error(ErrorCode::E0001)
            .with_message("unterminated string literal")
            .with_label(Span::new(9, 15), "never closed")
            .with_secondary_label(Span::new(9, 10), "opened here")
            .with_note("strings may span lines; the closing quote is required");
        let text = render(ColorMode::Never, false, &[diag]);
        assert!(text.contains("never closed"));
        assert!(text.contains("opened here"));
        assert!(text.contains("= note: strings may span"));
    }

    #[test]
    fn summary_counts_warnings() {
        let warn = Diagnostic::warning(ErrorCode::E0003)
            .with_message("octal-looking literal")
            .with_label(Span::new(0, 3), "here");
        let text = render(ColorMode::Never, false, &[warn]);
        assert!(text.contains("warning[E0003]"));
        assert!(text.contains("1 warning emitted"));
    }
}
