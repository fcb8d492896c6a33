//! Constrained arithmetic evaluator for the offline assistant.
//!
//! Verbal operator words (Indonesian and English) are translated to symbols,
//! everything outside `[0-9+\-*/.()\s]` is discarded, and only the surviving
//! expression is evaluated. Anything that fails to parse, divides by zero or
//! produces a non-finite value yields `None` so the dispatcher can fall back
//! to its generic math-help responses.

/// Trigger words removed before evaluation.
const TRIGGER_WORDS: &[&str] = &[
    "sama dengan",
    "calculate",
    "hitung",
    "what is",
    "berapa",
    "math",
    "hasil",
];

/// Verbal operators translated to symbols. Longer phrases first so that
/// e.g. "divided by" is consumed before "divide".
const OPERATOR_WORDS: &[(&str, &str)] = &[
    ("divided by", "/"),
    ("tambah", "+"),
    ("plus", "+"),
    ("add", "+"),
    ("kurang", "-"),
    ("minus", "-"),
    ("subtract", "-"),
    ("kali", "*"),
    ("times", "*"),
    ("multiply", "*"),
    ("x", "*"),
    ("bagi", "/"),
    ("divide", "/"),
];

/// Attempts to evaluate an arithmetic query. Returns the formatted result
/// sentence, or `None` when no safe expression remains after cleaning.
pub fn calculate(input: &str) -> Option<String> {
    let expr = clean_expression(input);
    if expr.is_empty() || !expr.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let value = evaluate(&expr)?;
    if !value.is_finite() {
        return None;
    }

    Some(format!("Hasil dari {} adalah {}", expr, format_number(value)))
}

fn clean_expression(input: &str) -> String {
    let mut text = input.to_lowercase();
    for word in TRIGGER_WORDS {
        text = text.replace(word, " ");
    }
    for (word, symbol) in OPERATOR_WORDS {
        text = text.replace(word, symbol);
    }

    let filtered: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| c.is_ascii_digit() || "+-*/.() ".contains(*c))
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn evaluate(expr: &str) -> Option<f64> {
    let chars: Vec<char> = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parser = Parser { chars, pos: 0 };
    let value = parser.expression()?;
    if parser.pos == parser.chars.len() {
        Some(value)
    } else {
        None
    }
}

// Recursive descent over: expression := term (('+'|'-') term)*
//                         term       := factor (('*'|'/') factor)*
//                         factor     := number | '(' expression ')' | ('+'|'-') factor
struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expression(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op {
                '+' => {
                    self.advance();
                    value += self.term()?;
                }
                '-' => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek() {
            match op {
                '*' => {
                    self.advance();
                    value *= self.factor()?;
                }
                '/' => {
                    self.advance();
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return None;
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Some(value)
    }

    fn factor(&mut self) -> Option<f64> {
        match self.peek()? {
            '(' => {
                self.advance();
                let value = self.expression()?;
                if self.peek() != Some(')') {
                    return None;
                }
                self.advance();
                Some(value)
            }
            '+' => {
                self.advance();
                self.factor()
            }
            '-' => {
                self.advance();
                Some(-self.factor()?)
            }
            _ => self.number(),
        }
    }

    fn number(&mut self) -> Option<f64> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') {
            self.advance();
        }
        if self.pos == start {
            return None;
        }
        let literal: String = self.chars.get(start..self.pos)?.iter().collect();
        literal.parse().ok()
    }
}
