//! Parse boundary.
//!
//! The analyzer itself consumes an already-parsed, immutable
//! `rustpython_parser` syntax tree. This module owns the one place where
//! source text is turned into such a tree, together with the line index
//! that maps the tree's byte offsets back to 1-based source lines.

use std::path::{Path, PathBuf};

use rustpython_parser::ast::{self, Ranged};
use rustpython_parser::Mode;

use crate::error::Error;

/// Maps byte offsets into a source buffer to 1-based line numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (offset, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// 1-based line containing the given byte offset.
    pub fn line_at(&self, offset: u32) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// 1-based line of a syntax tree node's start.
    pub fn line_of<N: Ranged>(&self, node: &N) -> usize {
        self.line_at(node.start().into())
    }
}

/// A parsed source unit: the module tree plus its line index.
#[derive(Debug)]
pub struct ParsedModule {
    pub module: ast::ModModule,
    pub lines: LineIndex,
    pub path: PathBuf,
}

/// Parse one Python source unit.
pub fn parse_module(source: &str, path: impl AsRef<Path>) -> Result<ParsedModule, Error> {
    let path = path.as_ref();
    let parsed = rustpython_parser::parse(source, Mode::Module, &path.to_string_lossy())
        .map_err(|err| Error::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    match parsed {
        ast::Mod::Module(module) => Ok(ParsedModule {
            module,
            lines: LineIndex::new(source),
            path: path.to_path_buf(),
        }),
        _ => Err(Error::Parse {
            path: path.to_path_buf(),
            message: "expected a module".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn line_index_maps_offsets() {
        let index = LineIndex::new("ab\ncd\n\nefg");
        assert_eq!(index.line_at(0), 1);
        assert_eq!(index.line_at(2), 1);
        assert_eq!(index.line_at(3), 2);
        assert_eq!(index.line_at(5), 2);
        assert_eq!(index.line_at(6), 3);
        assert_eq!(index.line_at(7), 4);
        assert_eq!(index.line_at(9), 4);
    }

    #[test]
    fn line_index_handles_empty_source() {
        let index = LineIndex::new("");
        assert_eq!(index.line_at(0), 1);
    }

    #[test]
    fn parses_a_simple_module() {
        let parsed = parse_module("x = 1\n", "sample.py").unwrap();
        assert_eq!(parsed.module.body.len(), 1);
        assert_eq!(parsed.lines.line_of(&parsed.module.body[0]), 1);
    }

    #[test]
    fn node_lines_follow_source_position() {
        let parsed = parse_module("import os\n\ndef foo():\n    return 1\n", "sample.py").unwrap();
        assert_eq!(parsed.lines.line_of(&parsed.module.body[0]), 1);
        assert_eq!(parsed.lines.line_of(&parsed.module.body[1]), 3);
    }

    #[test]
    fn parse_failure_names_the_path() {
        let err = parse_module("def broken(:\n", "broken.py").unwrap_err();
        assert!(err.to_string().contains("broken.py"));
    }
}
