use std::sync::LazyLock;

use regex::Regex;

/// `import a.b.c` at the start of a line; captures the dotted path.
static PY_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*import[ \t]+([A-Za-z_][\w.]*)").unwrap());

/// `from <dots><module> import <names>`; captures leading dots, module suffix and the rest of the line.
static PY_FROM_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*from[ \t]+(\.*)([A-Za-z_][\w.]*)?[ \t]+import[ \t]+([^\n#]*)").unwrap()
});

/// Extract dotted module paths from Python source, in source order.
///
/// `package` is the importing file's directory relative to the project root,
/// split into components; relative `from` imports are rebased onto it.
pub fn extract_imports(content: &str, package: &[String]) -> Vec<String> {
    let mut found: Vec<(usize, String)> = Vec::new();

    for caps in PY_IMPORT.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            found.push((m.start(), m.as_str().trim_end_matches('.').to_owned()));
        }
    }

    for caps in PY_FROM_IMPORT.captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        let dots = caps.get(1).map_or(0, |m| m.as_str().len());
        let module = caps.get(2).map_or("", |m| m.as_str());
        let names = caps.get(3).map_or("", |m| m.as_str());

        if dots == 0 {
            if !module.is_empty() {
                found.push((whole.start(), module.to_owned()));
            }
            continue;
        }

        let Some(base) = relative_base(package, dots) else {
            tracing::debug!("relative import climbs above the project root: {}", whole.as_str().trim());
            continue;
        };

        if !module.is_empty() {
            found.push((whole.start(), join_dotted(base, &[module])));
        } else {
            // `from . import a, b`: each name is a module inside the base package.
            for name in imported_names(names) {
                found.push((whole.start(), join_dotted(base, &[name])));
            }
        }
    }

    // Stable sort keeps per-statement name order for bare relative imports.
    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, spec)| spec).collect()
}

/// Package components a relative import with `dots` leading dots starts from.
/// One dot is the current package, each extra dot climbs one directory.
fn relative_base(package: &[String], dots: usize) -> Option<&[String]> {
    let up = dots - 1;
    if up > package.len() {
        return None;
    }
    Some(&package[..package.len() - up])
}

fn join_dotted(base: &[String], tail: &[&str]) -> String {
    base.iter()
        .map(String::as_str)
        .chain(tail.iter().copied())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}

/// Names from the `import` clause of a `from` statement: aliases, parentheses
/// and `*` are dropped.
fn imported_names(clause: &str) -> Vec<&str> {
    clause
        .split(',')
        .filter_map(|part| {
            let part = part.trim_matches(|c: char| c.is_whitespace() || c == '(' || c == ')' || c == '\\');
            let name = part.split_whitespace().next()?;
            let is_ident = name
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && name.chars().all(|c| c.is_alphanumeric() || c == '_');
            is_ident.then_some(name)
        })
        .collect()
}
