//! Error-tolerant recursive-descent parser for schema source

use super::language::{Keyword, Language, NodeKind};
use super::lexer::{Token, TokenKind, tokenize};
use super::tree::{NodeData, NodeId, Tree};
use crate::error::{Error, Result};

/// Largest input the parser accepts.
pub const MAX_SOURCE_BYTES: usize = 16 * 1024 * 1024;

/// Parses schema bytes into a [`Tree`].
///
/// Syntax errors never abort a parse: unexpected tokens are wrapped in
/// `ERROR` nodes and parsing resumes at the next statement keyword, so
/// partially broken schemas still yield every recognizable declaration.
pub struct Parser<'l> {
    language: &'l Language,
}

impl<'l> Parser<'l> {
    pub fn new(language: &'l Language) -> Self {
        Self { language }
    }

    /// Parse raw schema bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseFailure`] only when the input exceeds
    /// [`MAX_SOURCE_BYTES`].
    pub fn parse(&self, source: &[u8]) -> Result<Tree> {
        if source.len() > MAX_SOURCE_BYTES {
            return Err(Error::ParseFailure {
                reason: format!(
                    "input is {} bytes, larger than the {} byte limit",
                    source.len(),
                    MAX_SOURCE_BYTES
                ),
            });
        }

        let text = match std::str::from_utf8(source) {
            Ok(text) => text.to_owned(),
            Err(e) => {
                tracing::warn!(
                    valid_up_to = e.valid_up_to(),
                    "schema is not valid UTF-8, decoding lossily"
                );
                String::from_utf8_lossy(source).into_owned()
            }
        };

        let tokens = tokenize(&text, self.language);
        let mut state = ParseState {
            source: &text,
            tokens: &tokens,
            pos: 0,
            nodes: Vec::new(),
        };
        let root = state.source_file(text.len());

        let errors = state
            .nodes
            .iter()
            .filter(|node| node.kind == NodeKind::Error)
            .count();
        if errors > 0 {
            tracing::warn!(errors, "schema has syntax errors; recovered what could be parsed");
        }
        tracing::debug!(tokens = tokens.len(), nodes = state.nodes.len(), "parsed schema");

        let nodes = state.nodes;
        Ok(Tree::new(text, nodes, root))
    }
}

struct ParseState<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    nodes: Vec<NodeData>,
}

impl ParseState<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_nth(&self, n: usize) -> Option<Token> {
        self.tokens.get(self.pos + n).copied()
    }

    /// Next token that is not a comment.
    fn peek_significant(&self) -> Option<Token> {
        self.tokens[self.pos..]
            .iter()
            .find(|t| t.kind != TokenKind::Comment)
            .copied()
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn push(&mut self, kind: NodeKind, start: usize, end: usize, children: Vec<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        for child in &children {
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes.push(NodeData {
            kind,
            start,
            end,
            parent: None,
            children,
        });
        id
    }

    fn leaf(&mut self, kind: NodeKind) -> NodeId {
        let token = self.bump();
        self.push(kind, token.start, token.end, Vec::new())
    }

    fn end_of(&self, id: NodeId) -> usize {
        self.nodes[id.0].end
    }

    /// Consume at least one token, then everything up to `stop`.
    fn error_until(&mut self, stop: impl Fn(&Token) -> bool) -> NodeId {
        let first = self.bump();
        let mut end = first.end;
        while let Some(token) = self.peek() {
            if stop(&token) {
                break;
            }
            end = token.end;
            self.pos += 1;
        }
        self.push(NodeKind::Error, first.start, end, Vec::new())
    }

    fn at_top_level_start(token: &Token) -> bool {
        matches!(
            token.kind,
            TokenKind::Keyword(Keyword::Definition | Keyword::Caveat | Keyword::Use)
        )
    }

    /// Relations and permissions end where the next statement or block end begins.
    fn expression_end(&self) -> bool {
        match self.peek_significant() {
            None => true,
            Some(token) => matches!(
                token.kind,
                TokenKind::RBrace
                    | TokenKind::Keyword(
                        Keyword::Relation
                            | Keyword::Permission
                            | Keyword::Definition
                            | Keyword::Caveat
                    )
            ),
        }
    }

    fn source_file(&mut self, len: usize) -> NodeId {
        let mut children = Vec::new();
        while let Some(token) = self.peek() {
            let child = match token.kind {
                TokenKind::Comment => self.leaf(NodeKind::Comment),
                TokenKind::Keyword(Keyword::Definition) => self.definition(),
                TokenKind::Keyword(Keyword::Caveat) => self.caveat(),
                TokenKind::Keyword(Keyword::Use) => self.use_directive(),
                _ => self.top_level_error(),
            };
            children.push(child);
        }
        self.push(NodeKind::SourceFile, 0, len, children)
    }

    /// Junk outside any definition. Relation and permission statements found
    /// inside are still parsed so their names are visible to queries.
    fn top_level_error(&mut self) -> NodeId {
        let mut children = Vec::new();
        let mut start = None;
        let mut end = 0;

        while let Some(token) = self.peek() {
            if Self::at_top_level_start(&token) {
                break;
            }
            start.get_or_insert(token.start);
            match token.kind {
                TokenKind::Keyword(Keyword::Relation) => {
                    let child = self.relation();
                    end = self.end_of(child);
                    children.push(child);
                }
                TokenKind::Keyword(Keyword::Permission) => {
                    let child = self.permission();
                    end = self.end_of(child);
                    children.push(child);
                }
                _ => {
                    end = token.end;
                    self.pos += 1;
                }
            }
        }

        self.push(NodeKind::Error, start.unwrap_or(end), end, children)
    }

    fn definition(&mut self) -> NodeId {
        let keyword = self.bump();
        let mut children = Vec::new();
        let mut end = keyword.end;

        if self.peek().is_some_and(|t| t.is_name()) {
            let name = self.leaf(NodeKind::TypeIdentifier);
            end = self.end_of(name);
            children.push(name);
        }

        while let Some(token) = self.peek() {
            if Self::at_top_level_start(&token) {
                break;
            }
            let child = match token.kind {
                TokenKind::LBrace => {
                    let block = self.block();
                    end = self.end_of(block);
                    children.push(block);
                    break;
                }
                TokenKind::Comment => self.leaf(NodeKind::Comment),
                _ => self.error_until(|t| {
                    t.kind == TokenKind::LBrace
                        || t.kind == TokenKind::Comment
                        || Self::at_top_level_start(t)
                }),
            };
            end = self.end_of(child);
            children.push(child);
        }

        self.push(NodeKind::ObjectDefinition, keyword.start, end, children)
    }

    fn block(&mut self) -> NodeId {
        let open = self.bump();
        let mut children = Vec::new();
        let mut end = open.end;

        loop {
            let Some(token) = self.peek() else {
                tracing::debug!(at = open.start, "definition block not closed before end of input");
                break;
            };
            let child = match token.kind {
                TokenKind::RBrace => {
                    end = self.bump().end;
                    break;
                }
                TokenKind::Comment => self.leaf(NodeKind::Comment),
                TokenKind::Keyword(Keyword::Relation) => self.relation(),
                TokenKind::Keyword(Keyword::Permission) => self.permission(),
                _ if Self::at_top_level_start(&token) => {
                    tracing::debug!(at = open.start, "definition block closed by next statement");
                    break;
                }
                _ => self.error_until(|t| {
                    matches!(
                        t.kind,
                        TokenKind::RBrace
                            | TokenKind::Comment
                            | TokenKind::Keyword(Keyword::Relation | Keyword::Permission)
                    ) || Self::at_top_level_start(t)
                }),
            };
            end = self.end_of(child);
            children.push(child);
        }

        self.push(NodeKind::Block, open.start, end, children)
    }

    /// `relation <name>: <type> | <type>#<relation> | <type>:* ...`
    fn relation(&mut self) -> NodeId {
        let keyword = self.bump();
        if !self.peek().is_some_and(|t| t.is_name()) {
            return self.statement_error(keyword);
        }

        let name = self.leaf(NodeKind::FieldIdentifier);
        let mut end = self.end_of(name);
        let mut children = vec![name];

        if self.peek().is_some_and(|t| t.kind == TokenKind::Colon) {
            end = self.bump().end;
            if let Some(expression) = self.relation_expression() {
                end = self.end_of(expression);
                children.push(expression);
            }
        } else if !self.expression_end() {
            let error = self.error_until_expression_end();
            end = self.end_of(error);
            children.push(error);
        }

        self.push(NodeKind::Relation, keyword.start, end, children)
    }

    /// `permission <name> = <expression>`
    fn permission(&mut self) -> NodeId {
        let keyword = self.bump();
        if !self.peek().is_some_and(|t| t.is_name()) {
            return self.statement_error(keyword);
        }

        let name = self.leaf(NodeKind::MethodIdentifier);
        let mut end = self.end_of(name);
        let mut children = vec![name];

        if self.peek().is_some_and(|t| t.kind == TokenKind::Equals) {
            end = self.bump().end;
            if let Some(expression) = self.permission_expression() {
                end = self.end_of(expression);
                children.push(expression);
            }
        } else if !self.expression_end() {
            let error = self.error_until_expression_end();
            end = self.end_of(error);
            children.push(error);
        }

        self.push(NodeKind::Permission, keyword.start, end, children)
    }

    /// A statement keyword without a usable name.
    fn statement_error(&mut self, keyword: Token) -> NodeId {
        let mut end = keyword.end;
        while !self.expression_end() {
            end = self.bump().end;
        }
        self.push(NodeKind::Error, keyword.start, end, Vec::new())
    }

    fn error_until_expression_end(&mut self) -> NodeId {
        let first = self.bump();
        let mut end = first.end;
        while !self.expression_end() {
            end = self.bump().end;
        }
        self.push(NodeKind::Error, first.start, end, Vec::new())
    }

    fn relation_expression(&mut self) -> Option<NodeId> {
        let mut children = Vec::new();
        let mut span: Option<(usize, usize)> = None;

        while !self.expression_end() {
            let Some(token) = self.peek() else { break };
            let (child, child_end) = match token.kind {
                TokenKind::Comment => {
                    let id = self.leaf(NodeKind::Comment);
                    (Some(id), self.end_of(id))
                }
                TokenKind::Pipe => (None, self.bump().end),
                _ if token.is_name() => {
                    let id = self.type_reference();
                    (Some(id), self.end_of(id))
                }
                _ => {
                    let first = self.bump();
                    let mut end = first.end;
                    while !self.expression_end()
                        && self
                            .peek()
                            .is_some_and(|t| t.kind != TokenKind::Pipe && !t.is_name())
                    {
                        end = self.bump().end;
                    }
                    let id = self.push(NodeKind::Error, first.start, end, Vec::new());
                    (Some(id), end)
                }
            };
            children.extend(child);
            let start = span.map_or(token.start, |(start, _)| start);
            span = Some((start, child_end));
        }

        let (start, end) = span?;
        Some(self.push(NodeKind::RelationExpression, start, end, children))
    }

    /// `<type>`, `<type>#<relation>`, `<type>:*`, optionally `with <trait> [and <trait>]`
    fn type_reference(&mut self) -> NodeId {
        let first = self.bump();
        let mut end = first.end;

        match (self.peek(), self.peek_nth(1)) {
            (Some(hash), Some(name)) if hash.kind == TokenKind::Hash && name.is_name() => {
                self.pos += 2;
                end = name.end;
            }
            (Some(colon), Some(star)) if colon.kind == TokenKind::Colon && star.kind == TokenKind::Star => {
                self.pos += 2;
                end = star.end;
            }
            _ => {}
        }

        let mut after_with = false;
        while let (Some(word), Some(name)) = (self.peek(), self.peek_nth(1)) {
            let joins = if after_with {
                word.kind == TokenKind::Ident && self.is_and(word)
            } else {
                word.is_keyword(Keyword::With)
            };
            if !joins || !name.is_name() {
                break;
            }
            self.pos += 2;
            end = name.end;
            after_with = true;
        }

        self.push(NodeKind::TypeReference, first.start, end, Vec::new())
    }

    fn is_and(&self, token: Token) -> bool {
        &self.source[token.start..token.end] == "and"
    }

    fn permission_expression(&mut self) -> Option<NodeId> {
        let mut children = Vec::new();
        let mut span: Option<(usize, usize)> = None;

        while !self.expression_end() {
            let token = self.peek()?;
            let end = if token.kind == TokenKind::Comment {
                let id = self.leaf(NodeKind::Comment);
                children.push(id);
                self.end_of(id)
            } else {
                self.bump().end
            };
            let start = span.map_or(token.start, |(start, _)| start);
            span = Some((start, end));
        }

        let (start, end) = span?;
        Some(self.push(NodeKind::PermissionExpression, start, end, children))
    }

    /// `caveat <name>(<parameters>) { <expression> }`
    fn caveat(&mut self) -> NodeId {
        let keyword = self.bump();
        let mut children = Vec::new();
        let mut end = keyword.end;

        if self.peek().is_some_and(|t| t.is_name()) {
            let name = self.leaf(NodeKind::CaveatIdentifier);
            end = self.end_of(name);
            children.push(name);
        }

        if self.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
            let parameters = self.balanced(NodeKind::CaveatParameters, TokenKind::LParen, TokenKind::RParen);
            end = self.end_of(parameters);
            children.push(parameters);
        }

        if self.peek().is_some_and(|t| t.kind == TokenKind::LBrace) {
            let body = self.balanced(NodeKind::CaveatBody, TokenKind::LBrace, TokenKind::RBrace);
            end = self.end_of(body);
            children.push(body);
        } else if self.peek().is_some_and(|t| !Self::at_top_level_start(&t)) {
            let error = self.error_until(Self::at_top_level_start);
            end = self.end_of(error);
            children.push(error);
        }

        self.push(NodeKind::CaveatDefinition, keyword.start, end, children)
    }

    /// Consume a bracketed region, stopping early at a definition or caveat
    /// keyword when the closing bracket is missing.
    fn balanced(&mut self, kind: NodeKind, open: TokenKind, close: TokenKind) -> NodeId {
        let first = self.bump();
        let mut end = first.end;
        let mut depth = 1usize;

        while let Some(token) = self.peek() {
            if matches!(
                token.kind,
                TokenKind::Keyword(Keyword::Definition | Keyword::Caveat)
            ) {
                break;
            }
            self.pos += 1;
            end = token.end;
            if token.kind == open {
                depth += 1;
            } else if token.kind == close {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
        }

        self.push(kind, first.start, end, Vec::new())
    }

    fn use_directive(&mut self) -> NodeId {
        let keyword = self.bump();
        let mut end = keyword.end;
        if self.peek().is_some_and(|t| t.is_name()) {
            end = self.bump().end;
        }
        self.push(NodeKind::UseDirective, keyword.start, end, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::language;

    fn parse(source: &str) -> Tree {
        Parser::new(language().unwrap()).parse(source.as_bytes()).unwrap()
    }

    #[test]
    fn test_empty_definition() {
        let tree = parse("definition user {}");
        assert_eq!(
            tree.to_sexp(),
            "(source_file (object_definition (type_identifier) (block)))"
        );
        assert!(!tree.root().has_error());
    }

    #[test]
    fn test_relation_and_permission() {
        let tree = parse(
            "definition doc {\n  relation owner: user | group#member | user:*\n  permission view = owner + viewer->view\n}",
        );
        assert_eq!(
            tree.to_sexp(),
            "(source_file (object_definition (type_identifier) (block \
             (relation (field_identifier) (relation_expression (type_reference) (type_reference) (type_reference))) \
             (permission (method_identifier) (permission_expression)))))"
        );
        let refs: Vec<&str> = tree
            .preorder()
            .into_iter()
            .filter(|n| n.kind() == NodeKind::TypeReference)
            .map(|n| n.text())
            .collect();
        assert_eq!(refs, vec!["user", "group#member", "user:*"]);
    }

    #[test]
    fn test_caveated_type_reference() {
        let tree = parse("definition doc { relation viewer: user with ip_allowed and expiration }");
        let reference = tree
            .preorder()
            .into_iter()
            .find(|n| n.kind() == NodeKind::TypeReference)
            .unwrap();
        assert_eq!(reference.text(), "user with ip_allowed and expiration");
    }

    #[test]
    fn test_trailing_comment_stays_outside_expression() {
        let tree = parse("definition doc {\n relation owner: user // owners\n}");
        let expression = tree
            .preorder()
            .into_iter()
            .find(|n| n.kind() == NodeKind::RelationExpression)
            .unwrap();
        assert_eq!(expression.text(), "user");
        let block = tree.root().child_of_kind(NodeKind::ObjectDefinition).unwrap();
        let block = block.child_of_kind(NodeKind::Block).unwrap();
        assert!(block.child_of_kind(NodeKind::Comment).is_some());
    }

    #[test]
    fn test_caveat_and_use() {
        let tree = parse(
            "use expiration\ncaveat ip_allowed(ip ipaddress, cidr string) {\n  ip.in_cidr(cidr)\n}\ndefinition user {}",
        );
        assert_eq!(
            tree.to_sexp(),
            "(source_file (use_directive) \
             (caveat_definition (caveat_identifier) (caveat_parameters) (caveat_body)) \
             (object_definition (type_identifier) (block)))"
        );
    }

    #[test]
    fn test_missing_brace_recovers_at_next_definition() {
        let tree = parse("definition a {\n relation r: b\n\ndefinition b {\n relation s: a\n}");
        assert_eq!(
            tree.to_sexp(),
            "(source_file \
             (object_definition (type_identifier) (block (relation (field_identifier) (relation_expression (type_reference))))) \
             (object_definition (type_identifier) (block (relation (field_identifier) (relation_expression (type_reference))))))"
        );
    }

    #[test]
    fn test_garbage_becomes_error_node() {
        let tree = parse("!!! ???\ndefinition user {}");
        let root = tree.root();
        assert!(root.has_error());
        let first = root.children().next().unwrap();
        assert!(first.is_error());
        assert_eq!(first.text(), "!!! ???");
        assert!(root.child_of_kind(NodeKind::ObjectDefinition).is_some());
    }

    #[test]
    fn test_relation_without_name_is_error() {
        let tree = parse("definition a { relation : b\n permission p = q }");
        let block = tree
            .preorder()
            .into_iter()
            .find(|n| n.kind() == NodeKind::Block)
            .unwrap();
        let kinds: Vec<NodeKind> = block.children().map(|n| n.kind()).collect();
        assert_eq!(kinds, vec![NodeKind::Error, NodeKind::Permission]);
    }

    #[test]
    fn test_relation_missing_colon_keeps_name() {
        let tree = parse("definition a { relation r b }");
        let relation = tree
            .preorder()
            .into_iter()
            .find(|n| n.kind() == NodeKind::Relation)
            .unwrap();
        assert_eq!(relation.child_of_kind(NodeKind::FieldIdentifier).unwrap().text(), "r");
        assert!(relation.child_of_kind(NodeKind::Error).is_some());
    }

    #[test]
    fn test_statements_in_top_level_junk_are_parsed() {
        let tree = parse("} relation stray: user\ndefinition a {}");
        let error = tree.root().children().next().unwrap();
        assert!(error.is_error());
        assert!(error.child_of_kind(NodeKind::Relation).is_some());
    }

    #[test]
    fn test_empty_and_whitespace_sources() {
        for source in ["", "   \n\t", "// only a comment"] {
            let tree = parse(source);
            assert!(!tree.root().has_error(), "{source:?}");
            assert!(tree.root().child_of_kind(NodeKind::ObjectDefinition).is_none());
        }
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let tree = Parser::new(language().unwrap())
            .parse(b"definition us\xffer {}")
            .unwrap();
        assert!(tree.source().contains('\u{fffd}'));
    }

    #[test]
    fn test_oversized_input_fails() {
        let source = vec![b' '; MAX_SOURCE_BYTES + 1];
        let result = Parser::new(language().unwrap()).parse(&source);
        assert!(matches!(result, Err(Error::ParseFailure { .. })));
    }

    #[test]
    fn test_parent_links() {
        let tree = parse("definition a { relation r: b }");
        for node in tree.preorder() {
            for child in node.children() {
                assert_eq!(child.parent(), Some(node));
                assert!(node.contains(&child));
            }
        }
        assert_eq!(tree.root().parent(), None);
    }
}
