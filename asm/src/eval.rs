use crate::{defines::Defines, error::Error, label::Labels};

/// Parse a literal number.
///
/// Accepted forms: `$FF`, `0xFF`, `%1010`, `0FFh`, `'A'` and plain decimal.
/// The result is not range checked.
pub fn parse_number(s: &str) -> Result<i64, Error> {
    let s = s.trim();
    let err = || Error::ParseNumber(s.to_string());

    // 'c'
    if let Some(inner) = s.strip_prefix('\'').and_then(|r| r.strip_suffix('\'')) {
        let mut chars = inner.chars();
        return match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch as i64),
            _ => Err(err()),
        };
    }

    let lower = s.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix('$') {
        (hex, 16)
    } else if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_prefix('%') {
        (bin, 2)
    } else if let Some(hex) = lower
        .strip_suffix('h')
        .filter(|h| !h.is_empty() && h.chars().all(|c| c.is_ascii_hexdigit()))
    {
        (hex, 16)
    } else {
        (lower.as_str(), 10)
    };
    i64::from_str_radix(digits, radix).map_err(|_| err())
}

/// Operand evaluator over the definition and label tables of one run.
pub struct Evaluator<'a> {
    defines: &'a Defines,
    labels: &'a Labels,
}

impl<'a> Evaluator<'a> {
    pub fn new(defines: &'a Defines, labels: &'a Labels) -> Self {
        Evaluator { defines, labels }
    }

    /// Definitions first, then labels, then literal numbers.
    pub fn eval(&self, token: &str) -> Result<i64, Error> {
        let text = self.defines.resolve(token);
        match self.labels.get_val(text) {
            Some(addr) => Ok(addr as i64),
            None => parse_number(text),
        }
    }

    /// Target address of an `.org` statement, given the operands after `.org`.
    pub fn org_target(&self, operands: &[&str]) -> Result<u16, Error> {
        match operands {
            [token] => self
                .eval(token)
                .ok()
                .and_then(|addr| u16::try_from(addr).ok())
                .ok_or_else(|| Error::InvalidOrg(token.to_string())),
            _ => Err(Error::OrgOperand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;

    fn num(s: &str) -> i64 {
        parse_number(s).unwrap()
    }

    #[test]
    fn hex() {
        assert_eq!(num("$FF"), 255);
        assert_eq!(num("$ff"), 255);
        assert_eq!(num("0x1234"), 0x1234);
        assert_eq!(num("0X10"), 16);
        assert_eq!(num("0FFh"), 255);
        assert_eq!(num("10H"), 16);
        assert_eq!(num("$10000"), 0x10000);
    }

    #[test]
    fn binary_and_decimal() {
        assert_eq!(num("%1010"), 10);
        assert_eq!(num("255"), 255);
        assert_eq!(num("-5"), -5);
        assert_eq!(num("0"), 0);
    }

    #[test]
    fn char_code_keeps_case() {
        assert_eq!(num("'A'"), 65);
        assert_eq!(num("'a'"), 97);
        assert_eq!(num("' '"), 32);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_number("").is_err());
        assert!(parse_number("$").is_err());
        assert!(parse_number("h").is_err());
        assert!(parse_number("'ab'").is_err());
        assert!(parse_number("%102").is_err());
        assert!(parse_number("loop").is_err());
    }

    #[test]
    fn resolution_order() {
        let mut defines = Defines::new();
        defines.insert("ENTRY".to_string(), "start".to_string());
        defines.insert("PORT".to_string(), "$F0".to_string());
        let mut labels = Labels::new();
        let label = Label {
            addr: 0x0200,
            file: "main.asm".to_string(),
            line: 1,
        };
        labels.insert("start", label.clone());
        // a label that also reads as a number
        labels.insert("0FFh", label);

        let eval = Evaluator::new(&defines, &labels);
        assert_eq!(eval.eval("ENTRY").unwrap(), 0x0200);
        assert_eq!(eval.eval("PORT").unwrap(), 0xF0);
        assert_eq!(eval.eval("0FFh").unwrap(), 0x0200);
        assert!(matches!(eval.eval("missing"), Err(Error::ParseNumber(_))));
    }

    #[test]
    fn org() {
        let defines = Defines::new();
        let labels = Labels::new();
        let eval = Evaluator::new(&defines, &labels);
        assert_eq!(eval.org_target(&["$0100"]).unwrap(), 0x0100);
        assert!(matches!(eval.org_target(&[]), Err(Error::OrgOperand)));
        assert!(matches!(eval.org_target(&["1", "2"]), Err(Error::OrgOperand)));
        assert!(matches!(eval.org_target(&["$10000"]), Err(Error::InvalidOrg(_))));
        assert!(matches!(eval.org_target(&["later"]), Err(Error::InvalidOrg(_))));
    }
}
