//! In-memory block document: the default persistence host.
//!
//! A document is a tree of named blocks and named values. Each value is
//! encoded with `MessagePack`, and the whole document round-trips through
//! bytes with [`BlockDocument::to_bytes`] / [`BlockDocument::from_bytes`].
//!
//! [`BlockWriter`] implements [`SaveSink`]; [`BlockReader`] implements
//! [`LoadSource`] as a strictly sequential cursor, so a block or value read
//! out of order is a load failure.

use cairn_foundation::{Error, ErrorContext, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::persist::{LoadSource, SaveSink};

/// One entry of a document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// A named group of entries.
    Block {
        /// Block name.
        name: String,
        /// Entries in write order.
        children: Vec<Node>,
    },
    /// A named, encoded value.
    Value {
        /// Record name.
        name: String,
        /// `MessagePack` encoding of the value.
        data: Vec<u8>,
    },
}

impl Node {
    /// The entry's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Block { name, .. } | Self::Value { name, .. } => name,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Block { name, .. } => format!("block `{name}`"),
            Self::Value { name, .. } => format!("value `{name}`"),
        }
    }
}

/// A complete saved document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDocument {
    nodes: Vec<Node>,
}

impl BlockDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level entries.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Names of the top-level entries, in order.
    #[must_use]
    pub fn block_names(&self) -> Vec<&str> {
        self.nodes.iter().map(Node::name).collect()
    }

    /// Opens a sequential reader at the start of the document.
    #[must_use]
    pub fn reader(&self) -> BlockReader<'_> {
        BlockReader::new(self)
    }

    /// Encodes the document with `MessagePack`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|e| Error::serialization(e.to_string()))
    }

    /// Decodes a document.
    ///
    /// # Errors
    ///
    /// Returns a load failure if the bytes are not a valid document.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        rmp_serde::from_slice(bytes).map_err(|e| Error::load(format!("corrupted document: {e}")))
    }
}

/// Builds a [`BlockDocument`].
#[derive(Debug, Default)]
pub struct BlockWriter {
    root: Vec<Node>,
    open: Vec<(String, Vec<Node>)>,
}

impl BlockWriter {
    /// Creates a writer for an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finishes the document.
    ///
    /// # Errors
    ///
    /// Returns an error if a block is still open.
    pub fn finish(self) -> Result<BlockDocument> {
        if let Some((name, _)) = self.open.last() {
            return Err(Error::serialization(format!("block `{name}` was never closed")));
        }
        Ok(BlockDocument { nodes: self.root })
    }

    fn current(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        }
    }

    fn context(&self, record: &str) -> ErrorContext {
        let context = self
            .open
            .iter()
            .fold(ErrorContext::new(), |ctx, (name, _)| ctx.with_block(name.as_str()));
        context.with_record(record)
    }
}

impl SaveSink for BlockWriter {
    fn begin_block(&mut self, name: &str) -> Result<()> {
        self.open.push((name.to_string(), Vec::new()));
        Ok(())
    }

    fn end_block(&mut self) -> Result<()> {
        let (name, children) = self
            .open
            .pop()
            .ok_or_else(|| Error::serialization("end_block without an open block"))?;
        self.current().push(Node::Block { name, children });
        Ok(())
    }

    fn put<T: Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        let data = rmp_serde::to_vec_named(value)
            .map_err(|e| Error::serialization(e.to_string()).with_context(self.context(name)))?;
        self.current().push(Node::Value {
            name: name.to_string(),
            data,
        });
        Ok(())
    }
}

struct Frame<'a> {
    name: Option<&'a str>,
    nodes: &'a [Node],
    pos: usize,
}

/// Sequential reader over a [`BlockDocument`].
pub struct BlockReader<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> BlockReader<'a> {
    /// Opens a reader at the start of `document`.
    #[must_use]
    pub fn new(document: &'a BlockDocument) -> Self {
        Self {
            frames: vec![Frame {
                name: None,
                nodes: &document.nodes,
                pos: 0,
            }],
        }
    }

    /// Checks that the whole document has been consumed.
    ///
    /// # Errors
    ///
    /// Returns a load failure if a block is still open or entries remain.
    pub fn finish(self) -> Result<()> {
        if self.frames.len() > 1 {
            return Err(self.fail("block was never left", None));
        }
        if let Some(node) = self.peek() {
            return Err(self.fail(&format!("unexpected trailing {}", node.describe()), None));
        }
        Ok(())
    }

    fn peek(&self) -> Option<&'a Node> {
        let frame = self.frames.last()?;
        frame.nodes.get(frame.pos)
    }

    fn advance(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.pos += 1;
        }
    }

    fn fail(&self, reason: &str, record: Option<&str>) -> Error {
        let mut context = self
            .frames
            .iter()
            .filter_map(|frame| frame.name)
            .fold(ErrorContext::new(), |ctx, name| ctx.with_block(name));
        if let Some(record) = record {
            context = context.with_record(record);
        }
        Error::load(reason).with_context(context)
    }
}

impl LoadSource for BlockReader<'_> {
    fn check_and_enter_block(&mut self, name: &str) -> Result<()> {
        match self.peek() {
            Some(Node::Block {
                name: found,
                children,
            }) if found == name => {
                self.advance();
                self.frames.push(Frame {
                    name: Some(found.as_str()),
                    nodes: children,
                    pos: 0,
                });
                Ok(())
            }
            Some(other) => Err(self.fail(
                &format!("expected block `{name}`, found {}", other.describe()),
                None,
            )),
            None => Err(self.fail(
                &format!("expected block `{name}`, found end of data"),
                None,
            )),
        }
    }

    fn check_and_leave_block(&mut self) -> Result<()> {
        if self.frames.len() <= 1 {
            return Err(self.fail("no open block to leave", None));
        }
        if let Some(node) = self.peek() {
            return Err(self.fail(
                &format!("unexpected trailing {} before end of block", node.describe()),
                None,
            ));
        }
        self.frames.pop();
        Ok(())
    }

    fn parse<T: DeserializeOwned>(&mut self, name: &str) -> Result<T> {
        match self.peek() {
            Some(Node::Value { name: found, data }) if found == name => {
                let value = rmp_serde::from_slice(data)
                    .map_err(|e| self.fail(&format!("corrupted value: {e}"), Some(name)))?;
                self.advance();
                Ok(value)
            }
            Some(other) => Err(self.fail(
                &format!("expected value `{name}`, found {}", other.describe()),
                Some(name),
            )),
            None => Err(self.fail("block truncated", Some(name))),
        }
    }
}
