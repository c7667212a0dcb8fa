//! Node kind and keyword tables for the schema grammar

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{Error, Result};

/// Every kind of node the parser can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    SourceFile,
    ObjectDefinition,
    TypeIdentifier,
    Block,
    Relation,
    FieldIdentifier,
    RelationExpression,
    TypeReference,
    Permission,
    MethodIdentifier,
    PermissionExpression,
    CaveatDefinition,
    CaveatIdentifier,
    CaveatParameters,
    CaveatBody,
    UseDirective,
    Comment,
    Error,
}

impl NodeKind {
    pub const ALL: [NodeKind; 18] = [
        NodeKind::SourceFile,
        NodeKind::ObjectDefinition,
        NodeKind::TypeIdentifier,
        NodeKind::Block,
        NodeKind::Relation,
        NodeKind::FieldIdentifier,
        NodeKind::RelationExpression,
        NodeKind::TypeReference,
        NodeKind::Permission,
        NodeKind::MethodIdentifier,
        NodeKind::PermissionExpression,
        NodeKind::CaveatDefinition,
        NodeKind::CaveatIdentifier,
        NodeKind::CaveatParameters,
        NodeKind::CaveatBody,
        NodeKind::UseDirective,
        NodeKind::Comment,
        NodeKind::Error,
    ];

    /// The name used in queries and S-expression output.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::SourceFile => "source_file",
            NodeKind::ObjectDefinition => "object_definition",
            NodeKind::TypeIdentifier => "type_identifier",
            NodeKind::Block => "block",
            NodeKind::Relation => "relation",
            NodeKind::FieldIdentifier => "field_identifier",
            NodeKind::RelationExpression => "relation_expression",
            NodeKind::TypeReference => "type_reference",
            NodeKind::Permission => "permission",
            NodeKind::MethodIdentifier => "method_identifier",
            NodeKind::PermissionExpression => "permission_expression",
            NodeKind::CaveatDefinition => "caveat_definition",
            NodeKind::CaveatIdentifier => "caveat_identifier",
            NodeKind::CaveatParameters => "caveat_parameters",
            NodeKind::CaveatBody => "caveat_body",
            NodeKind::UseDirective => "use_directive",
            NodeKind::Comment => "comment",
            NodeKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reserved words of the schema language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Definition,
    Caveat,
    Relation,
    Permission,
    Use,
    With,
    Nil,
}

impl Keyword {
    pub const ALL: [Keyword; 7] = [
        Keyword::Definition,
        Keyword::Caveat,
        Keyword::Relation,
        Keyword::Permission,
        Keyword::Use,
        Keyword::With,
        Keyword::Nil,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Definition => "definition",
            Keyword::Caveat => "caveat",
            Keyword::Relation => "relation",
            Keyword::Permission => "permission",
            Keyword::Use => "use",
            Keyword::With => "with",
            Keyword::Nil => "nil",
        }
    }

    /// Keywords that open a statement and therefore cannot be used as names.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            Keyword::Definition | Keyword::Caveat | Keyword::Relation | Keyword::Permission
        )
    }
}

/// The compiled schema language.
///
/// Holds the lookup tables shared by the lexer, parser and query compiler.
/// Carries no per-parse state, so one instance serves every parse in the
/// process.
#[derive(Debug)]
pub struct Language {
    kinds_by_name: HashMap<&'static str, NodeKind>,
    keywords: HashMap<&'static str, Keyword>,
}

static LANGUAGE: OnceLock<std::result::Result<Language, String>> = OnceLock::new();

/// Get the compiled schema language, building it on first use.
///
/// Concurrent first calls block until a single build finishes. A failed
/// build is cached as well, so every caller sees the same
/// [`Error::GrammarUnavailable`].
pub fn language() -> Result<&'static Language> {
    LANGUAGE
        .get_or_init(|| {
            let built = Language::compile();
            match &built {
                Ok(_) => tracing::debug!(kinds = NodeKind::ALL.len(), "compiled schema language"),
                Err(reason) => tracing::error!(%reason, "schema grammar failed to build"),
            }
            built
        })
        .as_ref()
        .map_err(|reason| Error::GrammarUnavailable {
            reason: reason.clone(),
        })
}

impl Language {
    fn compile() -> std::result::Result<Self, String> {
        let mut kinds_by_name = HashMap::with_capacity(NodeKind::ALL.len());
        for kind in NodeKind::ALL {
            if kinds_by_name.insert(kind.name(), kind).is_some() {
                return Err(format!("duplicate node kind name '{}'", kind.name()));
            }
        }

        let mut keywords = HashMap::with_capacity(Keyword::ALL.len());
        for keyword in Keyword::ALL {
            let word = keyword.as_str();
            // The lexer only promotes identifier-shaped words
            if word.is_empty() || !word.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(format!("keyword '{word}' is not a plain identifier"));
            }
            if keywords.insert(word, keyword).is_some() {
                return Err(format!("duplicate keyword '{word}'"));
            }
        }

        Ok(Self {
            kinds_by_name,
            keywords,
        })
    }

    /// Resolve a node kind from its query name.
    pub fn kind_for_name(&self, name: &str) -> Option<NodeKind> {
        self.kinds_by_name.get(name).copied()
    }

    /// Resolve a keyword from identifier text.
    pub fn keyword(&self, text: &str) -> Option<Keyword> {
        self.keywords.get(text).copied()
    }

    pub fn node_kind_count(&self) -> usize {
        self.kinds_by_name.len()
    }
}
