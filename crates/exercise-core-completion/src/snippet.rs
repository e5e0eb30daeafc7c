//! Snippet expansion (snippet syntax -> plain text + cursor).
//!
//! Supported syntax:
//! - `$1` / `${1}`: empty tab stop
//! - `${1:default}`: placeholder (defaults may nest further snippet syntax)
//! - `${1|a,b|}`: choice, the first option is inserted
//! - `$0` / `${0}`: final cursor position
//! - `$NAME` / `${NAME:default}`: variables are not resolved; the default (if any) is inserted
//! - `\x`: literal `x`
//!
//! This is not an interactive snippet session: it produces the text to insert and where the
//! caret should land afterwards.

/// The result of expanding a snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedSnippet {
    /// Plain text to insert.
    pub text: String,
    /// Caret position after insertion, as a char offset into `text`.
    ///
    /// `$0` when present; otherwise the end of the first occurrence of the lowest-numbered
    /// tab stop; otherwise the end of `text`.
    pub cursor: usize,
}

#[derive(Debug, Clone, Copy)]
struct TabStop {
    number: u32,
    start: usize,
    end: usize,
}

struct Expander {
    out: String,
    out_chars: usize,
    stops: Vec<TabStop>,
}

impl Expander {
    fn push(&mut self, c: char) {
        self.out.push(c);
        self.out_chars += 1;
    }

    fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
        self.out_chars += s.chars().count();
    }

    fn expand(&mut self, snippet: &str) {
        let mut chars = snippet.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(next) => self.push(next),
                    None => self.push('\\'),
                },
                '$' => match chars.peek().copied() {
                    Some('{') => {
                        chars.next();
                        let content = take_braced(&mut chars);
                        self.expand_braced(&content);
                    }
                    Some(d) if d.is_ascii_digit() => {
                        let mut number = String::new();
                        while let Some(ch) = chars.peek().copied() {
                            if !ch.is_ascii_digit() {
                                break;
                            }
                            number.push(ch);
                            chars.next();
                        }
                        self.tab_stop(&number, self.out_chars);
                    }
                    Some(ch) if ch == '_' || ch.is_ascii_alphabetic() => {
                        while let Some(next) = chars.peek().copied() {
                            if next == '_' || next.is_ascii_alphanumeric() {
                                chars.next();
                            } else {
                                break;
                            }
                        }
                    }
                    _ => self.push('$'),
                },
                other => self.push(other),
            }
        }
    }

    /// `content` is the text between `${` and its matching `}`.
    fn expand_braced(&mut self, content: &str) {
        let number: String = content.chars().take_while(char::is_ascii_digit).collect();
        let rest = &content[number.len()..];

        if number.is_empty() {
            // Variable: `${NAME}` or `${NAME:default}`.
            if let Some((_, default)) = rest.split_once(':') {
                self.expand(default);
            }
            return;
        }

        let start = self.out_chars;
        if let Some(default) = rest.strip_prefix(':') {
            self.expand(default);
        } else if let Some(choices) = rest.strip_prefix('|') {
            let choices = choices.strip_suffix('|').unwrap_or(choices);
            self.push_str(choices.split(',').next().unwrap_or(""));
        }
        self.tab_stop(&number, start);
    }

    fn tab_stop(&mut self, number: &str, start: usize) {
        if let Ok(number) = number.parse() {
            self.stops.push(TabStop {
                number,
                start,
                end: self.out_chars,
            });
        }
    }

    fn cursor(&self) -> usize {
        if let Some(stop) = self.stops.iter().find(|s| s.number == 0) {
            return stop.start;
        }
        self.stops
            .iter()
            .filter(|s| s.number > 0)
            .min_by_key(|s| s.number)
            .map(|s| s.end)
            .unwrap_or(self.out_chars)
    }
}

/// Consume chars up to the `}` matching an already-consumed `${`, honoring nesting and `\`
/// escapes. The closing brace is consumed but not returned.
fn take_braced(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut depth = 0usize;
    let mut content = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                content.push(ch);
                if let Some(next) = chars.next() {
                    content.push(next);
                }
            }
            '{' => {
                depth += 1;
                content.push(ch);
            }
            '}' if depth == 0 => break,
            '}' => {
                depth -= 1;
                content.push(ch);
            }
            _ => content.push(ch),
        }
    }

    content
}

/// Expand `snippet` into plain text and a caret position.
pub fn expand_snippet(snippet: &str) -> ExpandedSnippet {
    let mut expander = Expander {
        out: String::with_capacity(snippet.len()),
        out_chars: 0,
        stops: Vec::new(),
    };
    expander.expand(snippet);
    let cursor = expander.cursor();

    ExpandedSnippet {
        text: expander.out,
        cursor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_and_final_cursor() {
        let expanded = expand_snippet("while (${1:condition}) {\n\t$0\n}");
        assert_eq!(expanded.text, "while (condition) {\n\t\n}");
        // `$0` wins over `$1`.
        assert_eq!(expanded.cursor, 21);
    }

    #[test]
    fn test_first_placeholder_end_without_final_stop() {
        let expanded = expand_snippet("System.out.println(${1:message});");
        assert_eq!(expanded.text, "System.out.println(message);");
        assert_eq!(expanded.cursor, 26);
    }

    #[test]
    fn test_lowest_stop_wins_over_first_seen() {
        let expanded = expand_snippet("${2:b} ${1:a}");
        assert_eq!(expanded.text, "b a");
        assert_eq!(expanded.cursor, 3);
    }

    #[test]
    fn test_repeated_placeholders() {
        let expanded = expand_snippet("for (int ${1:i} = 0; ${1:i} < ${2:n}; ${1:i}++) {\n\t$0\n}");
        assert_eq!(expanded.text, "for (int i = 0; i < n; i++) {\n\t\n}");
    }

    #[test]
    fn test_choice_variable_and_escapes() {
        let expanded = expand_snippet(r"${1|public,private|} ${TM_FILENAME} \$x ${NAME:Main}");
        assert_eq!(expanded.text, "public  $x Main");
    }

    #[test]
    fn test_nested_placeholder() {
        let expanded = expand_snippet("new ${1:ArrayList<${2:String}>}()");
        assert_eq!(expanded.text, "new ArrayList<String>()");
        assert_eq!(expanded.cursor, 21);
    }

    #[test]
    fn test_plain_text_cursor_at_end() {
        let expanded = expand_snippet("public");
        assert_eq!(expanded.text, "public");
        assert_eq!(expanded.cursor, 6);
    }
}
