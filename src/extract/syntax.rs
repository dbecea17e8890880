use std::path::Path;
use std::sync::OnceLock;

use tree_sitter::{Language, Parser, Query, QueryCursor, StreamingIterator};

use super::{ImportExtractor, RegexExtractor, SourceFile};
use crate::language::LanguageKind;

/// One query with three patterns, matched against JS, TS and TSX grammars alike:
/// 0. ESM static import statements
/// 1. `<identifier>(<string>)` calls, filtered to `require` in code
/// 2. dynamic `import(<string>)`
const IMPORT_QUERY: &str = r#"
    (import_statement
      source: (string (string_fragment) @module_path))

    (call_expression
      function: (identifier) @fn
      arguments: (arguments (string (string_fragment) @module_path)))

    (call_expression
      function: (import)
      arguments: (arguments (string (string_fragment) @module_path)))
"#;

const REQUIRE_PATTERN: usize = 1;

static QUERY_TS: OnceLock<Option<Query>> = OnceLock::new();
static QUERY_TSX: OnceLock<Option<Query>> = OnceLock::new();
static QUERY_JS: OnceLock<Option<Query>> = OnceLock::new();

#[derive(Clone, Copy)]
enum Grammar {
    TypeScript,
    Tsx,
    JavaScript,
}

impl Grammar {
    fn for_path(path: &Path) -> Grammar {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("ts") => Grammar::TypeScript,
            Some("tsx") => Grammar::Tsx,
            _ => Grammar::JavaScript,
        }
    }

    fn language(self) -> Language {
        match self {
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    /// Compiled query for this grammar; `None` if the grammar rejects it.
    fn query(self) -> Option<&'static Query> {
        let cell = match self {
            Grammar::TypeScript => &QUERY_TS,
            Grammar::Tsx => &QUERY_TSX,
            Grammar::JavaScript => &QUERY_JS,
        };
        cell.get_or_init(|| match Query::new(&self.language(), IMPORT_QUERY) {
            Ok(q) => Some(q),
            Err(err) => {
                tracing::warn!("import query rejected by grammar: {err}");
                None
            }
        })
        .as_ref()
    }
}

/// Syntax-tree extractor for JavaScript/TypeScript. Comments and string
/// contents no longer produce false imports, and dynamic `import()` is picked up.
/// Python files, and any file the grammar fails on, go through [`RegexExtractor`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterExtractor;

impl ImportExtractor for TreeSitterExtractor {
    fn extract(&self, file: &SourceFile<'_>, content: &str) -> Vec<String> {
        if file.language == LanguageKind::Python {
            return RegexExtractor.extract(file, content);
        }
        match extract_with_grammar(Grammar::for_path(file.path), content) {
            Some(specs) => specs,
            None => {
                tracing::debug!(
                    "tree-sitter unavailable for {}, using regex extraction",
                    file.path.display()
                );
                RegexExtractor.extract(file, content)
            }
        }
    }
}

fn extract_with_grammar(grammar: Grammar, content: &str) -> Option<Vec<String>> {
    let query = grammar.query()?;
    let mut parser = Parser::new();
    parser.set_language(&grammar.language()).ok()?;
    let source = content.as_bytes();
    let tree = parser.parse(source, None)?;

    let module_path_idx = query.capture_index_for_name("module_path")?;
    let fn_idx = query.capture_index_for_name("fn");

    let mut found: Vec<(usize, String)> = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source);

    while let Some(m) = matches.next() {
        let mut module_path = None;
        let mut fn_name = None;
        for capture in m.captures {
            if capture.index == module_path_idx {
                module_path = Some(capture.node);
            } else if Some(capture.index) == fn_idx {
                fn_name = capture.node.utf8_text(source).ok();
            }
        }

        if m.pattern_index == REQUIRE_PATTERN && fn_name != Some("require") {
            continue;
        }

        if let Some(node) = module_path
            && let Ok(text) = node.utf8_text(source)
        {
            found.push((node.start_byte(), text.to_owned()));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    Some(found.into_iter().map(|(_, spec)| spec).collect())
}
