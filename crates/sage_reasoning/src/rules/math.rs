//! Arithmetic in chat messages: detection, a small recursive-descent
//! evaluator (numbers, unary sign, `+ - * /`, parentheses) and reply text.

use std::sync::LazyLock;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("cannot evaluate expression: {0}")]
    UnparseableExpression(String),
}

/// Deepest parenthesis nesting the evaluator accepts.
const MAX_DEPTH: usize = 64;

static SIMPLE_OPERATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?\s*[+\-*/]\s*\d+").expect("valid regex"));

static OPERATOR_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:plus|add|minus|subtract|times|multiply|multiplied|divide|divided|equals|kitna|hota)\b",
    )
    .expect("valid regex")
});

/// Word → symbol rewrites, longest phrases first.
static WORD_REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?i)\bmultiplied\s+by\b", "*"),
        (r"(?i)\bdivided\s+by\b", "/"),
        (r"(?i)\b(?:plus|add)\b", "+"),
        (r"(?i)\b(?:minus|subtract)\b", "-"),
        (r"(?i)\b(?:times|multiply)\b", "*"),
        (r"(?i)\bdivide\b", "/"),
        (r"(?i)\bequals\b", "="),
    ]
    .into_iter()
    .map(|(p, s)| (Regex::new(p).expect("valid regex"), s))
    .collect()
});

/// Question phrasing around an expression ("what is 2+2?", "2+2 kitna hota hai").
static LEADING_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:what\s+is|what's|whats|calculate|compute|evaluate|solve)\b")
        .expect("valid regex")
});

static TRAILING_FILLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bkitna(?:\s+hota)?(?:\s+hai)?)?[\s?!]*$").expect("valid regex")
});

fn is_expression_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.') || c.is_whitespace()
}

fn has_balanced_parens(s: &str) -> bool {
    let mut depth = 0i32;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Whether a message should be answered by the math solver.
pub fn is_math_expression(message: &str) -> bool {
    let text = message.trim();
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    if !has_digit {
        return false;
    }
    if SIMPLE_OPERATION.is_match(text) {
        return true;
    }
    if text.chars().all(|c| is_expression_char(c) || c == '=') && has_balanced_parens(text) {
        return true;
    }
    OPERATOR_WORD.is_match(text)
}

/// Turn a chat message into a bare arithmetic expression.
pub fn extract_expression(message: &str) -> Result<String, MathError> {
    let mut expr = message.trim().to_string();
    for (pattern, symbol) in WORD_REWRITES.iter() {
        expr = pattern.replace_all(&expr, *symbol).into_owned();
    }

    // Equations: only the left-hand side is evaluated.
    if let Some((lhs, _)) = expr.split_once('=') {
        expr = lhs.to_string();
    }

    let expr = LEADING_FILLER.replace(&expr, "");
    let expr = TRAILING_FILLER.replace(&expr, "");

    // Anything else left over ("x", "%", "1e3") rejects the whole message
    // rather than evaluating a fragment of it.
    let compact: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() || !compact.chars().all(is_expression_char) {
        return Err(MathError::UnparseableExpression(message.trim().to_string()));
    }
    Ok(compact)
}

// ============================================================================
// Evaluator
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Result<Vec<Token>, MathError> {
    let bad = || MathError::UnparseableExpression(expr.to_string());
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => {}
            '+' => tokens.push(Token::Plus),
            '-' => tokens.push(Token::Minus),
            '*' => tokens.push(Token::Star),
            '/' => tokens.push(Token::Slash),
            '(' => tokens.push(Token::LParen),
            ')' => tokens.push(Token::RParen),
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i + 1 < chars.len() && (chars[i + 1].is_ascii_digit() || chars[i + 1] == '.')
                {
                    i += 1;
                }
                let literal: String = chars[start..=i].iter().collect();
                if literal == "." || literal.matches('.').count() > 1 {
                    return Err(bad());
                }
                tokens.push(Token::Num(literal.parse().map_err(|_| bad())?));
            }
            _ => return Err(bad()),
        }
        i += 1;
    }
    Ok(tokens)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn error(&self) -> MathError {
        MathError::UnparseableExpression(self.source.to_string())
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.peek();
        self.pos += 1;
        tok
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == Token::Plus { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    // term := factor (('*' | '/') factor)*
    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            if op == Token::Star {
                value *= rhs;
            } else {
                if rhs == 0.0 {
                    return Err(MathError::DivisionByZero);
                }
                value /= rhs;
            }
        }
        Ok(value)
    }

    // factor := ('+' | '-') factor | number | '(' expr ')'
    fn factor(&mut self) -> Result<f64, MathError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error());
        }
        let value = match self.next() {
            Some(Token::Num(n)) => n,
            Some(Token::Plus) => self.factor()?,
            Some(Token::Minus) => -self.factor()?,
            Some(Token::LParen) => {
                let inner = self.expr()?;
                if self.next() != Some(Token::RParen) {
                    return Err(self.error());
                }
                inner
            }
            _ => return Err(self.error()),
        };
        self.depth -= 1;
        Ok(value)
    }
}

/// Evaluate a bare arithmetic expression.
pub fn evaluate(expr: &str) -> Result<f64, MathError> {
    let tokens = tokenize(expr)?;
    let mut parser = Parser {
        source: expr,
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(parser.error());
    }
    if !value.is_finite() {
        return Err(MathError::UnparseableExpression(expr.to_string()));
    }
    Ok(value)
}

/// Extract and evaluate. Returns the normalised expression with its value.
pub fn solve(message: &str) -> Result<(String, f64), MathError> {
    let expr = extract_expression(message)?;
    let value = evaluate(&expr)?;
    Ok((expr, value))
}

/// Integers print without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn steps(expr: &str, value: f64) -> String {
    let mut steps = Vec::new();
    if expr.contains('(') {
        steps.push("Solve expressions in parentheses first".to_string());
    }
    if expr.contains('*') || expr.contains('/') {
        steps.push("Perform multiplication and division from left to right".to_string());
    }
    if expr.contains('+') || expr.contains('-') {
        steps.push("Perform addition and subtraction from left to right".to_string());
    }
    steps.push(format!("Final result: {}", format_number(value)));
    steps
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n")
}

fn apology(message: &str, err: &MathError) -> String {
    let reason = match err {
        MathError::DivisionByZero => "Division by zero is undefined, so there is no answer to give.\n\n",
        MathError::UnparseableExpression(_) => "",
    };
    format!(
        "I can see you're asking about math! 🔢 However, I couldn't solve \"{}\". {}Could you try rephrasing it? For example:\n\n• \"2 + 2\"\n• \"5 * 3\"\n• \"10 - 4\"\n• \"8 / 2\"\n\nI can solve basic arithmetic expressions!",
        message.trim(),
        reason
    )
}

/// Full chat reply for a math message. Never fails.
pub fn reply(message: &str) -> String {
    match solve(message) {
        Ok((expr, value)) => format!(
            "**Math Solution:** 🔢\n\n**Expression:** {}\n**Result:** **{}**\n\n**Step-by-step:**\n{}",
            message.trim(),
            format_number(value),
            steps(&expr, value)
        ),
        Err(e) => {
            tracing::debug!("Math evaluation failed for {:?}: {}", message, e);
            apology(message, &e)
        }
    }
}
