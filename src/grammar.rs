/// Tree-sitter-bash token backend: leaf nodes of the parse tree, in order.
use std::path::Path;

use tree_sitter::{Language, Node, Parser};

use crate::error::Error;
use crate::tokenizer::{Token, TokenKind, is_identifier};

/// Leaf kinds whose text is prose or data rather than words of the script.
const SKIPPED_LEAF_KINDS: &[&str] = &[
    "ansi_c_string",
    "comment",
    "heredoc_body",
    "heredoc_content",
    "heredoc_end",
    "raw_string",
    "string_content",
];

/// Recursively collect leaf tokens in document order.
fn collect_leaf_tokens<'a>(node: Node<'_>, source: &'a [u8], tokens: &mut Vec<Token<'a>>) {
    if node.child_count() == 0 {
        if node.is_missing() || SKIPPED_LEAF_KINDS.contains(&node.kind()) {
            return;
        }
        let Some(bytes) = source.get(node.start_byte()..node.end_byte()) else {
            return;
        };
        if bytes.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(bytes);
        let kind = if is_identifier(&text) { TokenKind::Identifier } else { TokenKind::Other };
        tokens.push(Token {
            end: node.end_byte(),
            kind,
            text,
        });
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_leaf_tokens(child, source, tokens);
    }
}

/// The bash grammar.
pub fn language() -> Language {
    return tree_sitter_bash::LANGUAGE.into();
}

/// Parse `source` and return its leaf tokens.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the grammar cannot be loaded or parsing fails.
pub fn leaf_tokens<'a>(file: &Path, source: &'a [u8]) -> Result<Vec<Token<'a>>, Error> {
    let mut parser = Parser::new();
    parser
        .set_language(&language())
        .map_err(|err| return Error::ParseFailed {
            file: file.to_path_buf(),
            reason: err.to_string(),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| return Error::ParseFailed {
        file: file.to_path_buf(),
        reason: "tree-sitter returned None".to_string(),
    })?;

    let mut tokens = Vec::new();
    collect_leaf_tokens(tree.root_node(), source, &mut tokens);
    return Ok(tokens);
}
