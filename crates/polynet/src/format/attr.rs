//! Indented attribute text, the container syntax of the native format.
//!
//! ```text
//! name Cube          # comment
//! vertices \
//!   1 1 1
//!   -1 1 1
//! face 0 1 2 3
//!   class 4
//! ```
//!
//! - Each non-blank line is `name [value]`; lines indented deeper than the
//!   previous attribute become its children.
//! - A value ending in `\` takes the following more-indented lines as a block.
//! - `#` starts a comment at line start or after whitespace.

/// One attribute with its children.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Attr {
    pub name: String,
    pub value: String,
    /// 1-based source line.
    pub line: usize,
    /// Block lines `(line, text)` for values ending in `\`.
    pub block: Vec<(usize, String)>,
    pub children: Vec<Attr>,
}

struct Raw {
    indent: usize,
    attr: Attr,
}

/// Text before the first comment marker.
pub(crate) fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

pub(crate) fn parse_attrs(text: &str) -> Vec<Attr> {
    let lines: Vec<&str> = text.lines().collect();
    let mut raws = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let body = strip_comment(lines[i]);
        let trimmed = body.trim();
        if trimmed.is_empty() {
            i += 1;
            continue;
        }
        let indent = indent_of(body);
        let (name, value) = match trimmed.split_once(char::is_whitespace) {
            Some((n, v)) => (n, v.trim()),
            None => (trimmed, ""),
        };
        let mut attr = Attr {
            name: name.to_string(),
            value: value.to_string(),
            line: i + 1,
            block: Vec::new(),
            children: Vec::new(),
        };
        i += 1;
        if let Some(head) = attr.value.strip_suffix('\\') {
            attr.value = head.trim().to_string();
            while i < lines.len() {
                let b = strip_comment(lines[i]);
                if b.trim().is_empty() {
                    i += 1;
                    continue;
                }
                if indent_of(b) <= indent {
                    break;
                }
                attr.block.push((i + 1, b.trim().to_string()));
                i += 1;
            }
        }
        raws.push(Raw { indent, attr });
    }
    let mut idx = 0;
    nest(&mut raws, &mut idx, None)
}

fn nest(raws: &mut [Raw], idx: &mut usize, parent_indent: Option<usize>) -> Vec<Attr> {
    let mut out = Vec::new();
    while *idx < raws.len() {
        let indent = raws[*idx].indent;
        if parent_indent.is_some_and(|p| indent <= p) {
            break;
        }
        let mut attr = std::mem::replace(
            &mut raws[*idx].attr,
            Attr {
                name: String::new(),
                value: String::new(),
                line: 0,
                block: Vec::new(),
                children: Vec::new(),
            },
        );
        *idx += 1;
        attr.children = nest(raws, idx, Some(indent));
        out.push(attr);
    }
    out
}

/// First non-blank line, trimmed.
pub(crate) fn first_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}
