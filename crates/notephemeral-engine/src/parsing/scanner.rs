use serde::{Deserialize, Serialize};

use super::patterns::url_regex;

/// A token produced by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Token {
    /// A line starting with `#`. `level` is the count of leading hashes and
    /// is not clamped; `content` is the whole trimmed line, hashes included.
    Heading { level: usize, content: String },
    /// Boundary between two non-blank lines of the same block.
    LineBreak,
    Url { content: String },
    Text { content: String },
}

/// Tokens of one block: consecutive non-blank lines.
pub type TokenBlock = Vec<Token>;

/// Scans Markdown text into blocks of tokens.
///
/// Total: every input maps to a result. Blank lines (empty or whitespace
/// only) separate blocks and produce no tokens, so `""` and `"\n\n"` both
/// scan to an empty list.
pub fn scan(input: &str) -> Vec<TokenBlock> {
    let lines: Vec<&str> = input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut blocks = Vec::new();
    let mut current = TokenBlock::new();

    for (i, line) in lines.iter().enumerate() {
        if is_blank(line) {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }

        scan_line(line, &mut current);

        if lines.get(i + 1).is_some_and(|next| !is_blank(next)) {
            current.push(Token::LineBreak);
        }
    }

    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn scan_line(line: &str, out: &mut TokenBlock) {
    if line.starts_with('#') {
        out.push(Token::Heading {
            level: line.chars().take_while(|&c| c == '#').count(),
            content: line.trim().to_string(),
        });
        return;
    }

    let mut last = 0;
    for m in url_regex().find_iter(line) {
        if m.start() > last {
            out.push(Token::Text {
                content: line[last..m.start()].to_string(),
            });
        }
        out.push(Token::Url {
            content: m.as_str().to_string(),
        });
        last = m.end();
    }
    if last < line.len() {
        out.push(Token::Text {
            content: line[last..].to_string(),
        });
    }
}
