//! Resolution of user-defined macros into primitive markup.
//!
//! Definitions introduced with `\newcommand`, `\renewcommand`,
//! `\providecommand` or `\def` are collected, blanked out in place and
//! substituted at every call site before parsing. The resolved output has
//! exactly the same number of lines as the input, so line provenance
//! computed downstream maps 1:1 onto the original file; multi-line macro
//! bodies are flattened to a single line on substitution to keep that
//! invariant.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static RE_NEWCOMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\\(?:newcommand|renewcommand|providecommand)\*?\s*(?:\{\\([A-Za-z]+)\}|\\([A-Za-z]+))\s*(?:\[([0-9])\])?\s*\{",
    )
    .expect("valid newcommand regex")
});

static RE_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\def\s*\\([A-Za-z]+)\s*\{").expect("valid def regex"));

/// Expansion is re-run until a fixed point; definitions referencing each
/// other deeper than this are treated as recursive.
const MAX_EXPANSION_PASSES: usize = 10;

#[derive(Debug, Clone)]
struct MacroDef {
    params: usize,
    body: String,
}

/// Resolve the macros in the given TeX input, returning macro-free markup
/// with an unchanged line count.
pub fn resolve_macros(input: &str) -> Result<String> {
    let (defs, stripped) = collect_definitions(input)?;
    if defs.is_empty() {
        return Ok(stripped);
    }
    log::debug!("resolving {} macro definitions", defs.len());

    let mut out = stripped;
    for _ in 0..MAX_EXPANSION_PASSES {
        let (next, changed) = substitute(&out, &defs);
        out = next;
        if !changed {
            debug_assert_eq!(
                out.lines().count(),
                input.lines().count(),
                "macro resolution must preserve the line count"
            );
            return Ok(out);
        }
    }
    Err(Error::Macro(
        "macro expansion did not terminate (recursive definition?)".to_string(),
    ))
}

/// Resolve the macros of the file at `source` and write the result to
/// `target`.
pub fn resolve_macros_file(source: &Path, target: &Path) -> Result<()> {
    let input = fs::read_to_string(source)?;
    let resolved = resolve_macros(&input)?;
    fs::write(target, resolved)?;
    Ok(())
}

/// Collect all macro definitions and blank them out of the text, preserving
/// every newline so line numbers stay stable.
fn collect_definitions(input: &str) -> Result<(HashMap<String, MacroDef>, String)> {
    let mut defs = HashMap::new();
    let mut work = input.to_string();

    for re in [&*RE_NEWCOMMAND, &*RE_DEF] {
        let mut pos = 0;
        loop {
            // Pull everything out of the captures before mutating `work`.
            let (name, params, m_start, m_end) = {
                let Some(caps) = re.captures_at(&work, pos) else {
                    break;
                };
                let m = caps.get(0).expect("whole match");
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|g| g.as_str().to_string())
                    .ok_or_else(|| {
                        Error::Macro("macro definition without a name".to_string())
                    })?;
                let params = caps
                    .get(3)
                    .map(|g| g.as_str().parse::<usize>().unwrap_or(0))
                    .unwrap_or(0);
                (name, params, m.start(), m.end())
            };

            // The match ends at the opening brace of the body.
            let open = m_end - 1;
            let close = match_brace(&work, open).ok_or_else(|| {
                Error::Macro(format!("unbalanced body in definition of \\{}", name))
            })?;
            let body = work[open + 1..close].to_string();

            blank_region(&mut work, m_start, close);
            defs.insert(name, MacroDef { params, body });
            pos = m_start;
        }
    }

    Ok((defs, work))
}

/// Find the byte index of the `}` matching the `{` at byte index `open`.
fn match_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text[open..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Replace the bytes in `start..=end` with spaces, keeping newlines.
fn blank_region(work: &mut String, start: usize, end: usize) {
    let replaced: String = work[start..=end]
        .chars()
        .map(|c| if c == '\n' { '\n' } else { ' ' })
        .collect();
    work.replace_range(start..=end, &replaced);
}

/// Substitute one round of macro calls. Returns the new text and whether
/// anything changed.
fn substitute(input: &str, defs: &HashMap<String, MacroDef>) -> (String, bool) {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut changed = false;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        // Control symbol or escaped character: copy verbatim.
        if i + 1 >= chars.len() || !chars[i + 1].is_ascii_alphabetic() {
            out.push('\\');
            if i + 1 < chars.len() {
                out.push(chars[i + 1]);
            }
            i += 2;
            continue;
        }

        let start = i + 1;
        let mut j = start;
        while j < chars.len() && chars[j].is_ascii_alphabetic() {
            j += 1;
        }
        let name: String = chars[start..j].iter().collect();

        if let Some(def) = defs.get(&name) {
            if let Some((spliced, next)) = expand_call(&chars, j, def) {
                // Flatten to one line and re-append the consumed newlines so
                // the overall line count is unchanged.
                let consumed_newlines = chars[i..next].iter().filter(|c| **c == '\n').count();
                out.push_str(&spliced.replace('\n', " "));
                for _ in 0..consumed_newlines {
                    out.push('\n');
                }
                changed = true;
                i = next;
                continue;
            }
        }

        out.push('\\');
        out.extend(chars[start..j].iter());
        i = j;
    }

    (out, changed)
}

/// Read the actual arguments of a macro call starting right after the name
/// at index `after_name` and splice them into the body. Returns `None` if
/// the expected arguments are not present, in which case the call is left
/// untouched.
fn expand_call(chars: &[char], after_name: usize, def: &MacroDef) -> Option<(String, usize)> {
    let mut pos = after_name;
    let mut actuals = Vec::with_capacity(def.params);
    while actuals.len() < def.params {
        let (arg, next) = read_braced(chars, pos)?;
        actuals.push(arg);
        pos = next;
    }

    let mut body = def.body.clone();
    for (idx, actual) in actuals.iter().enumerate() {
        body = body.replace(&format!("#{}", idx + 1), actual);
    }
    Some((body, pos))
}

/// Read a braced group starting at `open`, returning its content and the
/// index after the closing brace.
fn read_braced(chars: &[char], open: usize) -> Option<(String, usize)> {
    if chars.get(open) != Some(&'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut out = String::new();
    let mut i = open;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            if depth >= 1 {
                out.push(c);
                if let Some(next) = chars.get(i + 1) {
                    out.push(*next);
                }
            }
            i += 2;
            continue;
        }
        if c == '{' {
            depth += 1;
            if depth > 1 {
                out.push(c);
            }
            i += 1;
            continue;
        }
        if c == '}' {
            depth -= 1;
            if depth == 0 {
                return Some((out, i + 1));
            }
            out.push(c);
            i += 1;
            continue;
        }
        out.push(c);
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_macro() {
        let input = "\\newcommand{\\greet}{Hello}\n\\greet world\n";
        let resolved = resolve_macros(input).unwrap();
        assert!(resolved.contains("Hello world"));
        assert!(!resolved.contains("newcommand"));
        assert_eq!(resolved.lines().count(), input.lines().count());
    }

    #[test]
    fn test_macro_with_parameters() {
        let input = "\\newcommand{\\stress}[1]{\\textbf{#1}}\nsome \\stress{bold} text\n";
        let resolved = resolve_macros(input).unwrap();
        assert!(resolved.contains("some \\textbf{bold} text"));
    }

    #[test]
    fn test_multiple_definitions_collected() {
        let input = "\\newcommand{\\aa}{one}\n\\newcommand{\\bb}{two}\n\\aa \\bb\n";
        let resolved = resolve_macros(input).unwrap();
        assert!(resolved.contains("one two"));
        assert_eq!(resolved.lines().count(), input.lines().count());
    }

    #[test]
    fn test_def_macro() {
        let input = "\\def\\answer{42}\nthe answer is \\answer.\n";
        let resolved = resolve_macros(input).unwrap();
        assert!(resolved.contains("the answer is 42."));
    }

    #[test]
    fn test_name_prefix_is_not_substituted() {
        let input = "\\newcommand{\\ab}{X}\n\\abc \\ab\n";
        let resolved = resolve_macros(input).unwrap();
        assert!(resolved.contains("\\abc X"));
    }

    #[test]
    fn test_nested_macro_expansion() {
        let input = "\\newcommand{\\inner}{deep}\n\\newcommand{\\outer}{very \\inner}\n\\outer\n";
        let resolved = resolve_macros(input).unwrap();
        assert!(resolved.contains("very deep"));
    }

    #[test]
    fn test_recursive_macro_fails() {
        let input = "\\newcommand{\\loop}{\\loop}\n\\loop\n";
        assert!(matches!(resolve_macros(input), Err(Error::Macro(_))));
    }

    #[test]
    fn test_multiline_body_preserves_line_count() {
        let input = "\\newcommand{\\block}{first\nsecond}\nbefore \\block after\n";
        let resolved = resolve_macros(input).unwrap();
        assert_eq!(resolved.lines().count(), input.lines().count());
        assert!(resolved.contains("before first second after"));
    }

    #[test]
    fn test_no_macros_is_identity() {
        let input = "plain text\nwith lines\n";
        assert_eq!(resolve_macros(input).unwrap(), input);
    }

    #[test]
    fn test_unbalanced_definition_fails() {
        let input = "\\newcommand{\\broken}{never closed";
        assert!(matches!(resolve_macros(input), Err(Error::Macro(_))));
    }
}
