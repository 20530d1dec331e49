//! Structural INI grammar: sections, `key <delim> value` lines, and indented
//! continuation lines. Comments are skipped here, even inside a value; the
//! line matcher picks them up in a second pass.

use crate::error::IniformError;
use crate::matcher::{LineKind, LineMatcher, indent_of};

/// One `[section]` block of a single source, options in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedSection {
    pub name: String,
    pub options: Vec<(String, String)>,
}

struct OpenValue {
    section: usize,
    option: String,
    indent: usize,
    lines: Vec<String>,
    pending_blanks: usize,
}

impl OpenValue {
    fn finish(self, sections: &mut [ParsedSection]) {
        let value = self.lines.join("\n");
        let options = &mut sections[self.section].options;
        match options.iter_mut().find(|(k, _)| *k == self.option) {
            Some(slot) => slot.1 = value,
            None => options.push((self.option, value)),
        }
    }
}

/// Parse `text` into sections. `origin` names the source in errors.
///
/// Option names are lower-cased. With `strict`, a section or option repeated
/// within the same source is an error; otherwise the later one wins.
pub(crate) fn parse(
    matcher: &LineMatcher,
    text: &str,
    origin: &str,
    strict: bool,
) -> Result<Vec<ParsedSection>, IniformError> {
    let mut sections: Vec<ParsedSection> = Vec::new();
    let mut current: Option<usize> = None;
    let mut open: Option<OpenValue> = None;

    for (idx, line) in text.lines().enumerate() {
        let lineno = idx + 1;
        let kind = matcher.classify(line);

        if kind == LineKind::Blank {
            if let Some(value) = open.as_mut() {
                value.pending_blanks += 1;
            }
            continue;
        }
        if kind == LineKind::Comment {
            continue;
        }

        if let Some(value) = open.as_mut()
            && indent_of(line) > value.indent
        {
            for _ in 0..value.pending_blanks {
                value.lines.push(String::new());
            }
            value.pending_blanks = 0;
            value.lines.push(line.trim().to_string());
            continue;
        }

        if let Some(value) = open.take() {
            value.finish(&mut sections);
        }

        match kind {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::Section(name) => {
                if let Some(pos) = sections.iter().position(|s| s.name == name) {
                    if strict {
                        return Err(IniformError::DuplicateSection {
                            section: name.to_string(),
                            origin: origin.to_string(),
                            line: lineno,
                        });
                    }
                    current = Some(pos);
                } else {
                    sections.push(ParsedSection {
                        name: name.to_string(),
                        options: Vec::new(),
                    });
                    current = Some(sections.len() - 1);
                }
            }
            LineKind::Option { name, value } => {
                let Some(section) = current else {
                    return Err(IniformError::MissingSectionHeader {
                        origin: origin.to_string(),
                        line: lineno,
                        content: line.to_string(),
                    });
                };
                let option = name.to_lowercase();
                if strict && sections[section].options.iter().any(|(k, _)| *k == option) {
                    return Err(IniformError::DuplicateOption {
                        section: sections[section].name.clone(),
                        option,
                        origin: origin.to_string(),
                        line: lineno,
                    });
                }
                open = Some(OpenValue {
                    section,
                    option,
                    indent: indent_of(line),
                    lines: vec![value.to_string()],
                    pending_blanks: 0,
                });
            }
            LineKind::Other => {
                let Some(section) = current else {
                    return Err(IniformError::MissingSectionHeader {
                        origin: origin.to_string(),
                        line: lineno,
                        content: line.to_string(),
                    });
                };
                return Err(IniformError::ParseError {
                    origin: origin.to_string(),
                    line: lineno,
                    section: sections[section].name.clone(),
                    content: line.to_string(),
                });
            }
        }
    }

    if let Some(value) = open.take() {
        value.finish(&mut sections);
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> LineMatcher {
        LineMatcher::new(&["=", ":"], &["#", ";"]).unwrap()
    }

    fn parse_ok(text: &str) -> Vec<ParsedSection> {
        parse(&matcher(), text, "<test>", true).unwrap()
    }

    #[test]
    fn sections_and_options_in_order() {
        let sections = parse_ok("[B]\ny = 2\nx: 1\n\n[A]\n");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "B");
        assert_eq!(
            sections[0].options,
            vec![("y".into(), "2".into()), ("x".into(), "1".into())]
        );
        assert_eq!(sections[1].name, "A");
        assert!(sections[1].options.is_empty());
    }

    #[test]
    fn option_names_are_lowercased() {
        let sections = parse_ok("[S]\nMixedCase = v\n");
        assert_eq!(sections[0].options[0].0, "mixedcase");
    }

    #[test]
    fn continuation_lines_join_with_newlines() {
        let sections = parse_ok("[S]\nlist = a,\n\tb,\n    c\nnext = 1\n");
        assert_eq!(sections[0].options[0], ("list".into(), "a,\nb,\nc".into()));
        assert_eq!(sections[0].options[1], ("next".into(), "1".into()));
    }

    #[test]
    fn blank_lines_inside_values_are_kept_trailing_dropped() {
        let sections = parse_ok("[S]\ntext = one\n\n  two\n\n\n[T]\n");
        assert_eq!(sections[0].options[0].1, "one\n\ntwo");
    }

    #[test]
    fn indented_comment_is_not_part_of_the_value() {
        let sections = parse_ok("[S]\na = 1\n\n  # about b (indented)\nb = 2\n");
        assert_eq!(
            sections[0].options,
            vec![("a".into(), "1".into()), ("b".into(), "2".into())]
        );
    }

    #[test]
    fn comment_between_continuation_lines_is_skipped() {
        let sections = parse_ok("[S]\nv = a,\n  # note\n  b\n");
        assert_eq!(sections[0].options[0].1, "a,\nb");
    }

    #[test]
    fn comments_between_options_are_skipped() {
        let sections = parse_ok("# top\n[S]\n; about a\na = 1\n# about b\nb = 2\n");
        assert_eq!(sections[0].options.len(), 2);
    }

    #[test]
    fn empty_value() {
        let sections = parse_ok("[S]\nempty =\n");
        assert_eq!(sections[0].options[0], ("empty".into(), String::new()));
    }

    #[test]
    fn line_without_delimiter_is_parse_error() {
        let err = parse(&matcher(), "[S]\na = 1\nnot an option\n", "app.ini", true).unwrap_err();
        match err {
            IniformError::ParseError {
                origin,
                line,
                section,
                content,
            } => {
                assert_eq!(origin, "app.ini");
                assert_eq!(line, 3);
                assert_eq!(section, "S");
                assert_eq!(content, "not an option");
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn option_before_section_is_error() {
        let err = parse(&matcher(), "a = 1\n", "<test>", true).unwrap_err();
        assert!(matches!(err, IniformError::MissingSectionHeader { line: 1, .. }));
    }

    #[test]
    fn strict_rejects_duplicates() {
        let err = parse(&matcher(), "[S]\n[S]\n", "<test>", true).unwrap_err();
        assert!(matches!(err, IniformError::DuplicateSection { line: 2, .. }));

        let err = parse(&matcher(), "[S]\na = 1\nA = 2\n", "<test>", true).unwrap_err();
        assert!(matches!(err, IniformError::DuplicateOption { line: 3, .. }));
    }

    #[test]
    fn lenient_merges_duplicates() {
        let sections = parse(&matcher(), "[S]\na = 1\n[S]\na = 2\n", "<test>", false).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].options, vec![("a".into(), "2".into())]);
    }
}
