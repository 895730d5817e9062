//! Human-readable error reports with optional ANSI colors.

use std::fmt::Write;
use crate::interpreter::error::Error;
use crate::util;

#[cfg(test)]
mod tests;

const RED: &str = "\x1b[1;31m";
const BLUE: &str = "\x1b[1;34m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

struct Painter {
    colors: bool,
}

impl Painter {
    fn paint(&self, color: &str, text: &str) -> String {
        if self.colors {
            format!("{}{}{}", color, text, RESET)
        } else {
            text.to_owned()
        }
    }
}

/// Renders `error` against the `source` it came from.
///
/// The first trace entry is shown with its source line and a caret; the rest
/// of the trace follows as `at line:column` entries.
pub fn render(error: &Error, source: &str, colors: bool) -> String {
    let painter = Painter { colors };
    let mut output = String::new();

    let _ = write!(output, "{}: {}",
                   painter.paint(RED, &format!("{} error", error.stage())),
                   painter.paint(BOLD, &error.to_string()));

    let (first, rest) = match error.trace().split_first() {
        Some(split) => split,
        None => return output,
    };

    let (line, column) = util::line_column(source, first.offset);
    let text = util::line_at(source, first.offset);
    let gutter = " ".repeat(line.to_string().len());

    // Keep tabs so the caret lines up with the source line
    let indent: String = text.chars().take(column - 1)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();

    let _ = write!(output, "\n{}{} {}:{}", gutter, painter.paint(BLUE, "-->"), line, column);
    let _ = write!(output, "\n{} {}", gutter, painter.paint(BLUE, "|"));
    let _ = write!(output, "\n{} {} {}", painter.paint(BLUE, &line.to_string()), painter.paint(BLUE, "|"), text);
    let _ = write!(output, "\n{} {} {}{}", gutter, painter.paint(BLUE, "|"), indent, painter.paint(RED, "^"));

    for pos in rest {
        let (line, column) = util::line_column(source, pos.offset);
        let _ = write!(output, "\n{}{} {}:{}", gutter, painter.paint(BLUE, "at"), line, column);
    }

    output
}
