use crate::error::Error;

// ----------------------------------------------------------------------------
// Lexical helpers

/// Cut `;` and `//` comments and trailing whitespace.
pub fn strip_comment(raw: &str) -> &str {
    let mut code = raw;
    for sep in [";", "//"] {
        if let Some(idx) = code.find(sep) {
            code = &code[..idx];
        }
    }
    code.trim_end()
}

/// Split operand text on commas and whitespace.
pub fn split_operands(s: &str) -> Vec<&str> {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(head) if head.is_ascii_alphabetic() || head == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ----------------------------------------------------------------------------
// Preprocessor directive

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive<'a> {
    Include(&'a str),
    Define(&'a str, &'a str),
}

impl<'a> Directive<'a> {
    /// `None` when the line is not a preprocessor directive at all.
    pub fn parse(code: &'a str) -> Option<Result<Directive<'a>, Error>> {
        let code = code.trim();
        let (head, rest) = match code.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (code, ""),
        };
        let malformed = || Err(Error::MalformedDirective(code.to_string()));

        match head.to_ascii_lowercase().as_str() {
            "%include" | "include" => {
                if rest.is_empty() {
                    return Some(malformed());
                }
                let path = match rest.strip_prefix('"').and_then(|r| r.strip_suffix('"')) {
                    Some(quoted) => quoted,
                    None => rest.split_whitespace().next().unwrap_or(rest),
                };
                Some(Ok(Directive::Include(path)))
            }
            // `#define` is case sensitive, `.equ` is not
            _ if head == "#define" => Some(match rest.split_once(char::is_whitespace) {
                Some((name, value)) if is_ident(name) && !value.trim().is_empty() => {
                    Ok(Directive::Define(name, value.trim()))
                }
                _ => malformed(),
            }),
            ".equ" => {
                let end = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                let (name, value) = rest.split_at(end);
                let sep_ok = value.starts_with(|c: char| c == ',' || c.is_whitespace());
                let value = value.trim_start();
                let value = value.strip_prefix(',').unwrap_or(value).trim();
                Some(if is_ident(name) && sep_ok && !value.is_empty() {
                    Ok(Directive::Define(name, value))
                } else {
                    malformed()
                })
            }
            _ => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Line

/// A source line split into its leading labels and the statement that follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub labels: Vec<&'a str>,
    /// Text after the labels.
    pub code: &'a str,
    pub stmt: Stmt<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt<'a> {
    Blank,
    Org(Vec<&'a str>),
    Inst {
        mnemonic: &'a str,
        operands: Vec<&'a str>,
    },
}

impl<'a> Line<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut labels = vec![];
        let mut code = text.trim();

        // main: loop: LDA $10
        while let Some((label, rest)) = code.split_once(':') {
            if !is_ident(label) {
                break;
            }
            labels.push(label);
            code = rest.trim();
        }

        let words = split_operands(code);
        let stmt = match words.split_first() {
            None => Stmt::Blank,
            Some((head, args)) if head.eq_ignore_ascii_case(".org") => Stmt::Org(args.to_vec()),
            Some((head, args)) => Stmt::Inst {
                mnemonic: *head,
                operands: args.to_vec(),
            },
        };

        Line { labels, code, stmt }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments() {
        assert_eq!(strip_comment("LDA $10 ; load"), "LDA $10");
        assert_eq!(strip_comment("INC // bump"), "INC");
        assert_eq!(strip_comment("; only"), "");
    }

    #[test]
    fn operands() {
        assert_eq!(split_operands("LDA  $10,  X"), vec!["LDA", "$10", "X"]);
        assert!(split_operands("  ").is_empty());
    }

    #[test]
    fn labels_are_stripped_left_to_right() {
        let line = Line::parse("start: loop:  BSR loop");
        assert_eq!(line.labels, vec!["start", "loop"]);
        assert_eq!(line.code, "BSR loop");
        assert_eq!(
            line.stmt,
            Stmt::Inst {
                mnemonic: "BSR",
                operands: vec!["loop"]
            }
        );
    }

    #[test]
    fn label_only() {
        let line = Line::parse("end:");
        assert_eq!(line.labels, vec!["end"]);
        assert_eq!(line.stmt, Stmt::Blank);
    }

    #[test]
    fn char_operand_is_not_a_label() {
        let line = Line::parse("ADC ':'");
        assert!(line.labels.is_empty());
        assert_eq!(
            line.stmt,
            Stmt::Inst {
                mnemonic: "ADC",
                operands: vec!["':'"]
            }
        );
    }

    #[test]
    fn org() {
        assert_eq!(Line::parse(".ORG $0100").stmt, Stmt::Org(vec!["$0100"]));
        assert_eq!(Line::parse(".org").stmt, Stmt::Org(vec![]));
    }

    #[test]
    fn includes() {
        assert!(matches!(
            Directive::parse("%include \"lib/io.asm\""),
            Some(Ok(Directive::Include("lib/io.asm")))
        ));
        assert!(matches!(
            Directive::parse("INCLUDE util.asm"),
            Some(Ok(Directive::Include("util.asm")))
        ));
        assert!(matches!(
            Directive::parse("include"),
            Some(Err(Error::MalformedDirective(_)))
        ));
    }

    #[test]
    fn defines() {
        assert!(matches!(
            Directive::parse("#define PORT $F0"),
            Some(Ok(Directive::Define("PORT", "$F0")))
        ));
        assert!(matches!(
            Directive::parse(".equ SIZE, 16"),
            Some(Ok(Directive::Define("SIZE", "16")))
        ));
        assert!(matches!(
            Directive::parse(".EQU SIZE 16"),
            Some(Ok(Directive::Define("SIZE", "16")))
        ));
        assert!(matches!(
            Directive::parse("#define LONELY"),
            Some(Err(Error::MalformedDirective(_)))
        ));
        assert!(Directive::parse("LDA $10").is_none());
    }
}
