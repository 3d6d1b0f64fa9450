//! Line classifier
//!
//! The scanner looks at one physical line at a time. It:
//! - Drops blank lines and `//` comment lines
//! - Validates indentation (spaces only, whole levels)
//! - Converts indentation into a depth relative to the document baseline
//! - Collects the lines of an open text block verbatim

use crate::error::{ErrorKind, ParseContext, Result};

/// A classified physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Whitespace only, or a comment.
    Blank,
    /// A line introducing a node.
    NodeStart { depth: usize, content: &'a str },
    /// A line belonging to the open text block, with the block's
    /// indentation removed. Blank lines come through as "".
    Continuation(&'a str),
}

/// Indentation tracker. The first node line fixes the baseline; every later
/// node line is measured against it.
#[derive(Debug)]
pub struct Scanner {
    width: usize,
    baseline: Option<usize>,
}

impl Scanner {
    pub fn new(ctx: &ParseContext) -> Self {
        Self {
            width: ctx.indent_width(),
            baseline: None,
        }
    }

    /// Number of leading spaces the content of a text block opened by a
    /// node at `depth` must carry.
    pub fn block_indent(&self, depth: usize) -> usize {
        self.baseline.unwrap_or(0) + (depth + 1) * self.width
    }

    /// Classify one line. `block` is the content indentation of the open
    /// text block, if there is one.
    pub fn classify<'a>(
        &mut self,
        text: &'a str,
        block: Option<usize>,
        ctx: &ParseContext,
        line: usize,
    ) -> Result<Line<'a>> {
        let blank = text.trim().is_empty();

        if let Some(required) = block {
            if blank {
                return Ok(Line::Continuation(""));
            }
            if count_indent(text) >= required {
                return Ok(Line::Continuation(&text[required..]));
            }
        }

        let content = text.trim_start_matches([' ', '\t']);
        if blank || content.starts_with("//") {
            return Ok(Line::Blank);
        }

        let indent = &text[..text.len() - content.len()];
        if indent.contains('\t') {
            return Err(ctx.error(ErrorKind::TabIndentation, line));
        }

        let spaces = indent.len();
        let baseline = *self.baseline.get_or_insert(spaces);
        if spaces < baseline {
            return Err(ctx.error(ErrorKind::DedentBelowRoot, line));
        }
        let offset = spaces - baseline;
        if offset % self.width != 0 {
            return Err(ctx.error(ErrorKind::UnevenIndentation, line));
        }

        Ok(Line::NodeStart {
            depth: offset / self.width,
            content,
        })
    }
}

/// Count the number of leading spaces in a line.
fn count_indent(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}
