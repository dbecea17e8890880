use std::sync::LazyLock;

use regex::Regex;

/// ESM `import ... from 'x'` and side-effect `import 'x'`.
static ESM_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"import\s+(?:.*\s+from\s+)?['"]([^'"]+)['"]"#).unwrap());

/// CommonJS `require('x')`.
static CJS_REQUIRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"require\s*\(['"]([^'"]+)['"]\)"#).unwrap());

/// Extract module specifiers from JavaScript/TypeScript source, verbatim and
/// in source order.
pub fn extract_imports(content: &str) -> Vec<String> {
    let mut found: Vec<(usize, String)> = ESM_IMPORT
        .captures_iter(content)
        .chain(CJS_REQUIRE.captures_iter(content))
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let spec = caps.get(1)?;
            Some((whole.start(), spec.as_str().to_owned()))
        })
        .collect();

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, spec)| spec).collect()
}
