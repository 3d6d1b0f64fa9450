//! Tree builder
//!
//! The builder consumes classified lines one at a time and keeps the open
//! scopes on an explicit stack instead of recursing:
//! - `open[0..n]` are the nodes still able to take children, outermost first
//! - the top of `open` is the node inserted last
//! - closing a scope pops the top and appends it to the node beneath it
//!
//! A node at depth `d` is placed after closing scopes until exactly `d` are
//! open, so the new node becomes a child of `open[d - 1]` (or of the root).

use std::io::BufRead;

use tracing::{debug, trace};

use crate::content::{parse_content, NodeContent};
use crate::error::{Error, ErrorKind, ParseContext, Result, SyntaxError};
use crate::node::Node;
use crate::scanner::{Line, Scanner};
use crate::value::{Chomp, Value, ValueText};

/// A text block waiting for its continuation lines.
struct OpenBlock {
    /// Spaces every content line must carry.
    indent: usize,
    chomp: Chomp,
    lines: Vec<String>,
}

/// Parse state for one document.
pub struct Parser<'c> {
    ctx: &'c ParseContext,
    scanner: Scanner,
    root: Node,
    open: Vec<Node>,
    block: Option<OpenBlock>,
    line: usize,
    nodes: usize,
}

impl<'c> Parser<'c> {
    pub fn new(ctx: &'c ParseContext) -> Self {
        Self {
            ctx,
            scanner: Scanner::new(ctx),
            root: Node::root(ctx.shared_origin()),
            open: Vec::new(),
            block: None,
            line: 0,
            nodes: 0,
        }
    }

    /// Feed the next physical line, without its line terminator.
    pub fn feed(&mut self, text: &str) -> Result<()> {
        self.line += 1;
        let block_indent = self.block.as_ref().map(|b| b.indent);

        match self.scanner.classify(text, block_indent, self.ctx, self.line)? {
            Line::Blank => {}
            Line::Continuation(content) => {
                if let Some(block) = self.block.as_mut() {
                    block.lines.push(content.to_string());
                }
            }
            Line::NodeStart { depth, content } => {
                self.close_block();
                self.start_node(depth, content)?;
            }
        }
        Ok(())
    }

    fn start_node(&mut self, depth: usize, content: &str) -> Result<()> {
        if depth > self.open.len() {
            return Err(self
                .ctx
                .error(ErrorKind::UnexpectedIndentation, self.line));
        }
        while self.open.len() > depth {
            self.close_scope();
        }

        let NodeContent { tag, value } = parse_content(content, self.ctx, self.line)?;
        let mut node = Node::new(tag, None, self.line, self.ctx.shared_origin());
        match value {
            Some(ValueText::Inline(value)) => node.set_value(value),
            Some(ValueText::Block(chomp)) => {
                trace!(line = self.line, depth, "opening text block");
                self.block = Some(OpenBlock {
                    indent: self.scanner.block_indent(depth),
                    chomp,
                    lines: Vec::new(),
                });
            }
            None => {}
        }

        self.open.push(node);
        self.nodes += 1;
        Ok(())
    }

    /// Pop the innermost open node and attach it to its parent.
    fn close_scope(&mut self) {
        if let Some(node) = self.open.pop() {
            let parent = self.open.last_mut().unwrap_or(&mut self.root);
            parent.add_child(node);
        }
    }

    /// Finish the open text block, if any, onto the node that opened it.
    fn close_block(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };
        trace!(line = self.line, lines = block.lines.len(), "closing text block");
        let text = block.chomp.finish(block.lines);
        if let Some(node) = self.open.last_mut() {
            node.set_value(Value::Scalar(text));
        }
    }

    /// Close every open scope and hand over the document root.
    pub fn finish(mut self) -> Node {
        self.close_block();
        while !self.open.is_empty() {
            self.close_scope();
        }
        debug!(
            origin = self.ctx.origin(),
            lines = self.line,
            nodes = self.nodes,
            "parsed document"
        );
        self.root
    }
}

/// Parse a whole document held in a string.
pub fn parse_str(input: &str, ctx: &ParseContext) -> Result<Node> {
    let mut parser = Parser::new(ctx);
    for line in input.lines() {
        parser.feed(line).map_err(log_failure)?;
    }
    Ok(parser.finish())
}

/// Parse a document from a stream, reading it to the end.
pub fn parse_stream<R: BufRead>(reader: R, ctx: &ParseContext) -> std::result::Result<Node, Error> {
    let mut parser = Parser::new(ctx);
    for line in reader.lines() {
        let line = line.map_err(|source| Error::Io {
            origin: ctx.origin().to_string(),
            source,
        })?;
        parser.feed(&line).map_err(log_failure)?;
    }
    Ok(parser.finish())
}

fn log_failure(err: SyntaxError) -> SyntaxError {
    debug!(origin = %err.origin, line = err.line, kind = %err.kind, "syntax error");
    err
}
