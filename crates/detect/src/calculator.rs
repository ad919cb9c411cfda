//! Arithmetic detector. The broadest grammar, so it runs last.
//!
//! A small recursive-descent evaluator:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary | implicit-mul)*
//! unary   := ('-' | '+') unary | power
//! power   := postfix ('^' unary)?
//! postfix := primary '!'*
//! primary := number | constant | '(' expr ')' | function primary
//! ```

use crate::number::format_number;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PERCENT_OF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(-?\d+(?:\.\d+)?)\s*%\s*of\s+(.+)$").expect("percent regex")
});

const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "asin", "acos", "atan", "sqrt", "cbrt", "abs", "ln", "log", "log2",
    "exp", "floor", "ceil", "round",
];

/// Deepest nesting of parentheses, signs, exponents and function calls.
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorResult {
    pub expression: String,
    pub value: f64,
    pub display: String,
    pub is_partial: bool,
}

pub fn detect(text: &str) -> Option<CalculatorResult> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = PERCENT_OF_RE.captures(text) {
        let percent: f64 = caps.get(1)?.as_str().parse().ok()?;
        let base = evaluate(caps.get(2)?.as_str()).map(|e| e.value)?;
        return finish(text, percent / 100.0 * base, false);
    }

    match evaluate(text) {
        Some(eval) if eval.has_operation && eval.missing_parens == 0 => {
            finish(text, eval.value, false)
        }
        Some(eval) if eval.has_operation => finish(text, eval.value, true),
        Some(_) => None,
        None => detect_trailing_operator(text),
    }
}

/// `2 +` shows the running value of `2` as a partial result.
fn detect_trailing_operator(text: &str) -> Option<CalculatorResult> {
    let last = text.chars().last()?;
    if !matches!(last, '+' | '-' | '*' | '/' | '^' | '%' | '×' | '÷' | '−') {
        return None;
    }
    let prefix = text[..text.len() - last.len_utf8()].trim_end();
    let eval = evaluate(prefix)?;
    let mut result = finish(text, eval.value, true)?;
    result.display = format!("{} {last} …", format_number(eval.value));
    Some(result)
}

fn finish(expression: &str, value: f64, is_partial: bool) -> Option<CalculatorResult> {
    if !value.is_finite() {
        return None;
    }
    Some(CalculatorResult {
        expression: expression.to_string(),
        value,
        display: format_number(value),
        is_partial,
    })
}

struct Evaluation {
    value: f64,
    has_operation: bool,
    missing_parens: usize,
}

fn evaluate(text: &str) -> Option<Evaluation> {
    let mut tokens = tokenize(text)?;
    if tokens.is_empty() {
        return None;
    }

    // Close unbalanced parentheses so "(2 + 3" still evaluates.
    let depth = tokens.iter().try_fold(0i64, |depth, token| {
        let next = match token {
            Token::LParen => depth + 1,
            Token::RParen => depth - 1,
            _ => depth,
        };
        (next >= 0).then_some(next)
    })?;
    tokens.extend(std::iter::repeat(Token::RParen).take(depth as usize));

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        has_operation: false,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return None;
    }
    Some(Evaluation {
        value,
        has_operation: parser.has_operation,
        missing_parens: depth as usize,
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Op(char),
    LParen,
    RParen,
    Bang,
    Ident(String),
}

fn tokenize(text: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            _ if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == ',')
                {
                    i += 1;
                }
                let raw: String = chars[start..i].iter().filter(|c| **c != ',').collect();
                tokens.push(Token::Num(raw.parse().ok()?));
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Op('^'));
                i += 2;
            }
            '+' | '-' | '*' | '/' | '^' | '%' => {
                tokens.push(Token::Op(c));
                i += 1;
            }
            '×' => {
                tokens.push(Token::Op('*'));
                i += 1;
            }
            '÷' => {
                tokens.push(Token::Op('/'));
                i += 1;
            }
            '−' => {
                tokens.push(Token::Op('-'));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '!' => {
                tokens.push(Token::Bang);
                i += 1;
            }
            'π' => {
                tokens.push(Token::Ident("pi".to_string()));
                i += 1;
            }
            _ if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphanumeric() {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect::<String>().to_lowercase();
                let after_value = matches!(tokens.last(), Some(Token::Num(_) | Token::RParen));
                if ident == "x" && after_value {
                    tokens.push(Token::Op('*'));
                } else {
                    tokens.push(Token::Ident(ident));
                }
            }
            _ => return None,
        }
    }

    Some(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    has_operation: bool,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    /// Run a nested rule, giving up past [`MAX_DEPTH`].
    fn nested(&mut self, rule: fn(&mut Self) -> Option<f64>) -> Option<f64> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = rule(self);
        self.depth -= 1;
        value
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            let op = *op;
            self.pos += 1;
            let rhs = self.term()?;
            self.has_operation = true;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Op(op @ ('*' | '/' | '%'))) => {
                    let op = *op;
                    self.pos += 1;
                    let rhs = self.unary()?;
                    self.has_operation = true;
                    value = match op {
                        '*' => value * rhs,
                        '/' => value / rhs,
                        _ => value % rhs,
                    };
                }
                // Implicit multiplication: 2(3), 2pi, 3 sqrt 4
                Some(Token::LParen | Token::Ident(_)) => {
                    let rhs = self.unary()?;
                    self.has_operation = true;
                    value *= rhs;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn unary(&mut self) -> Option<f64> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                Some(-self.nested(Self::unary)?)
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Option<f64> {
        let base = self.postfix()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.nested(Self::unary)?;
            self.has_operation = true;
            return Some(base.powf(exponent));
        }
        Some(base)
    }

    fn postfix(&mut self) -> Option<f64> {
        let mut value = self.primary()?;
        while let Some(Token::Bang) = self.peek() {
            self.pos += 1;
            self.has_operation = true;
            value = factorial(value)?;
        }
        Some(value)
    }

    fn primary(&mut self) -> Option<f64> {
        match self.next()?.clone() {
            Token::Num(n) => Some(n),
            Token::LParen => {
                let value = self.nested(Self::expr)?;
                match self.next()? {
                    Token::RParen => Some(value),
                    _ => None,
                }
            }
            Token::Ident(name) => match name.as_str() {
                "pi" => Some(std::f64::consts::PI),
                "e" => Some(std::f64::consts::E),
                "tau" => Some(std::f64::consts::TAU),
                f if FUNCTIONS.contains(&f) => {
                    let arg = self.nested(Self::power)?;
                    self.has_operation = true;
                    apply_function(f, arg)
                }
                _ => None,
            },
            Token::Op(_) | Token::RParen | Token::Bang => None,
        }
    }
}

fn apply_function(name: &str, x: f64) -> Option<f64> {
    let value = match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "asin" => x.asin(),
        "acos" => x.acos(),
        "atan" => x.atan(),
        "sqrt" => x.sqrt(),
        "cbrt" => x.cbrt(),
        "abs" => x.abs(),
        "ln" => x.ln(),
        "log" => x.log10(),
        "log2" => x.log2(),
        "exp" => x.exp(),
        "floor" => x.floor(),
        "ceil" => x.ceil(),
        "round" => x.round(),
        _ => return None,
    };
    Some(value)
}

fn factorial(n: f64) -> Option<f64> {
    if n < 0.0 || n.fract() != 0.0 || n > 170.0 {
        return None;
    }
    Some((1..=n as u64).fold(1.0, |acc, k| acc * k as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(text: &str) -> f64 {
        detect(text).unwrap().value
    }

    #[test]
    fn test_precedence() {
        assert_eq!(value("2+2"), 4.0);
        assert_eq!(value("2 + 3 * 4"), 14.0);
        assert_eq!(value("(2 + 3) * 4"), 20.0);
        assert_eq!(value("2^3^2"), 512.0);
        assert_eq!(value("-2^2"), -4.0);
        assert_eq!(value("10 % 4"), 2.0);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(value("sqrt(16) + 1"), 5.0);
        assert_eq!(value("sqrt 16"), 4.0);
        assert!((value("2pi") - std::f64::consts::TAU).abs() < 1e-12);
        assert_eq!(value("5!"), 120.0);
        assert_eq!(detect("log(1000)").unwrap().display, "3");
    }

    #[test]
    fn test_alternate_operators() {
        assert_eq!(value("3 x 4"), 12.0);
        assert_eq!(value("8 ÷ 2"), 4.0);
        assert_eq!(value("2 ** 10"), 1024.0);
        assert_eq!(value("1,000 * 2"), 2000.0);
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(value("15% of 200"), 30.0);
    }

    #[test]
    fn test_display_hides_float_noise() {
        assert_eq!(detect("0.1 + 0.2").unwrap().display, "0.3");
    }

    #[test]
    fn test_bare_numbers_and_words_do_not_match() {
        assert!(detect("42").is_none());
        assert!(detect("-5").is_none());
        assert!(detect("pi").is_none());
        assert!(detect("hello world").is_none());
        assert!(detect("#123456").is_none());
    }

    #[test]
    fn test_partial_shapes() {
        let result = detect("12 *").unwrap();
        assert!(result.is_partial);
        assert_eq!(result.value, 12.0);
        assert_eq!(result.display, "12 * …");

        let result = detect("(2 + 3").unwrap();
        assert!(result.is_partial);
        assert_eq!(result.value, 5.0);
    }

    #[test]
    fn test_nesting_depth_is_bounded() {
        assert_eq!(value(&format!("{}1+1{}", "(".repeat(20), ")".repeat(20))), 2.0);
        assert_eq!(value(&format!("{}2+0", "-".repeat(10))), 2.0);

        let deep = format!("{}1+1", "(".repeat(3_000));
        assert!(detect(&deep).is_none());
        assert!(detect(&format!("{}1", "-".repeat(3_000))).is_none());
        assert!(detect(&format!("{}4", "sqrt ".repeat(3_000))).is_none());
        assert!(detect(&"2^".repeat(3_000)).is_none());
    }

    #[test]
    fn test_non_finite_is_no_match() {
        assert!(detect("1/0").is_none());
        assert!(detect("sqrt(-1) + 1").is_none());
    }
}
