//! Parsed expression trees for rule conditions and amount formulas.
//!
//! The original free-text fields are parsed into small tagged trees at
//! rule save time; unparsable expressions are rejected there, never at
//! fire time.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::RuleError;
use super::types::PayloadValue;

/// Amount formula for a rule line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmountFormula {
    /// A percentage (0-100) of the event's base amount.
    PercentOfBase {
        /// Percentage, 0-100.
        percent: Decimal,
    },
    /// A percentage (0-100) of an earlier line's resolved amount.
    PercentOfLine {
        /// 1-indexed line number; must reference an earlier line.
        line: usize,
        /// Percentage, 0-100.
        percent: Decimal,
    },
}

impl AmountFormula {
    /// Parses a formula from its textual form.
    ///
    /// Accepted shapes: `"100%"`, `"16% of base"`, `"16% of line 1"`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormula` for anything else or percentages outside
    /// 0-100.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let invalid = || RuleError::InvalidFormula(text.to_string());
        let trimmed = text.trim();

        let (percent_part, rest) = match trimmed.split_once('%') {
            Some((p, r)) => (p.trim(), r.trim()),
            None => return Err(invalid()),
        };

        let percent: Decimal = percent_part.parse().map_err(|_| invalid())?;
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(invalid());
        }

        if rest.is_empty() || rest.eq_ignore_ascii_case("of base") {
            return Ok(Self::PercentOfBase { percent });
        }

        if let Some(line_part) = rest
            .strip_prefix("of line ")
            .or_else(|| rest.strip_prefix("of Line "))
        {
            let line: usize = line_part.trim().parse().map_err(|_| invalid())?;
            if line == 0 {
                return Err(invalid());
            }
            return Ok(Self::PercentOfLine { line, percent });
        }

        Err(invalid())
    }

    /// Evaluates the formula.
    ///
    /// `base` is the event's base amount; `resolved` holds the amounts of
    /// the lines already computed, in rule order.
    ///
    /// # Errors
    ///
    /// Returns `ForwardLineReference` if the referenced line has not been
    /// resolved yet.
    pub fn evaluate(&self, base: Decimal, resolved: &[Decimal]) -> Result<Decimal, RuleError> {
        match self {
            Self::PercentOfBase { percent } => Ok(base * *percent / Decimal::ONE_HUNDRED),
            Self::PercentOfLine { line, percent } => {
                let referenced = line
                    .checked_sub(1)
                    .and_then(|i| resolved.get(i))
                    .ok_or(RuleError::ForwardLineReference { line: *line })?;
                Ok(*referenced * *percent / Decimal::ONE_HUNDRED)
            }
        }
    }
}

impl std::fmt::Display for AmountFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PercentOfBase { percent } => write!(f, "{percent}%"),
            Self::PercentOfLine { line, percent } => write!(f, "{percent}% of line {line}"),
        }
    }
}

/// Comparison operators in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater or equal.
    Ge,
    /// Less or equal.
    Le,
}

/// A literal in a condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Numeric literal.
    Number(Decimal),
    /// Text literal.
    Text(String),
    /// Boolean literal.
    Bool(bool),
}

/// A parsed condition over event payload fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// `field op literal`.
    Compare {
        /// Payload field name.
        field: String,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand literal.
        value: Literal,
    },
    /// All sub-conditions must hold.
    All(Vec<Condition>),
    /// At least one sub-condition must hold.
    Any(Vec<Condition>),
}

impl Condition {
    /// Parses a condition like `tipo = "Preventivo" and amount > 1000`.
    ///
    /// `and` binds tighter than `or`. Bare words on the right-hand side
    /// are text literals; `true`/`false` are booleans.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCondition` when the text cannot be parsed.
    pub fn parse(text: &str) -> Result<Self, RuleError> {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            source: text,
        };
        let condition = parser.parse_or()?;
        if parser.pos != parser.tokens.len() {
            return Err(RuleError::InvalidCondition(text.to_string()));
        }
        Ok(condition)
    }

    /// Evaluates the condition against a payload.
    ///
    /// Missing fields and type mismatches make the comparison false
    /// rather than failing the whole event.
    #[must_use]
    pub fn evaluate(&self, payload: &BTreeMap<String, PayloadValue>) -> bool {
        match self {
            Self::Compare { field, op, value } => payload
                .get(field)
                .is_some_and(|actual| compare(actual, *op, value)),
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(payload)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(payload)),
        }
    }
}

fn compare(actual: &PayloadValue, op: CompareOp, expected: &Literal) -> bool {
    match (actual, expected) {
        (PayloadValue::Number(a), Literal::Number(b)) => match op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            CompareOp::Gt => a > b,
            CompareOp::Lt => a < b,
            CompareOp::Ge => a >= b,
            CompareOp::Le => a <= b,
        },
        (PayloadValue::Text(a), Literal::Text(b)) => match op {
            CompareOp::Eq => a.eq_ignore_ascii_case(b),
            CompareOp::Ne => !a.eq_ignore_ascii_case(b),
            _ => false,
        },
        (PayloadValue::Bool(a), Literal::Bool(b)) => match op {
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
            _ => false,
        },
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Quoted(String),
    Number(Decimal),
    Op(CompareOp),
    And,
    Or,
}

fn tokenize(text: &str) -> Result<Vec<Token>, RuleError> {
    let invalid = || RuleError::InvalidCondition(text.to_string());
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' || c == '\'' {
            chars.next();
            let mut s = String::new();
            loop {
                match chars.next() {
                    Some(ch) if ch == c => break,
                    Some(ch) => s.push(ch),
                    None => return Err(invalid()),
                }
            }
            tokens.push(Token::Quoted(s));
        } else if c == '=' || c == '!' || c == '<' || c == '>' {
            chars.next();
            let eq_follows = chars.peek() == Some(&'=');
            let op = match (c, eq_follows) {
                ('=', true) | ('=', false) => {
                    if eq_follows {
                        chars.next();
                    }
                    CompareOp::Eq
                }
                ('!', true) => {
                    chars.next();
                    CompareOp::Ne
                }
                ('<', true) => {
                    chars.next();
                    CompareOp::Le
                }
                ('>', true) => {
                    chars.next();
                    CompareOp::Ge
                }
                ('<', false) => CompareOp::Lt,
                ('>', false) => CompareOp::Gt,
                _ => return Err(invalid()),
            };
            tokens.push(Token::Op(op));
        } else if c.is_ascii_digit() || c == '-' {
            let mut s = String::new();
            s.push(c);
            chars.next();
            while let Some(&ch) = chars.peek() {
                if ch.is_ascii_digit() || ch == '.' {
                    s.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Number(s.parse().map_err(|_| invalid())?));
        } else if c.is_alphanumeric() || c == '_' {
            let mut s = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' {
                    s.push(ch);
                    chars.next();
                } else {
                    break;
                }
            }
            match s.to_ascii_lowercase().as_str() {
                "and" => tokens.push(Token::And),
                "or" => tokens.push(Token::Or),
                _ => tokens.push(Token::Word(s)),
            }
        } else {
            return Err(invalid());
        }
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    source: &'a str,
}

impl Parser<'_> {
    fn invalid(&self) -> RuleError {
        RuleError::InvalidCondition(self.source.to_string())
    }

    fn parse_or(&mut self) -> Result<Condition, RuleError> {
        let mut parts = vec![self.parse_and()?];
        while self.tokens.get(self.pos) == Some(&Token::Or) {
            self.pos += 1;
            parts.push(self.parse_and()?);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Condition::Any(parts)
        })
    }

    fn parse_and(&mut self) -> Result<Condition, RuleError> {
        let mut parts = vec![self.parse_compare()?];
        while self.tokens.get(self.pos) == Some(&Token::And) {
            self.pos += 1;
            parts.push(self.parse_compare()?);
        }
        Ok(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Condition::All(parts)
        })
    }

    fn parse_compare(&mut self) -> Result<Condition, RuleError> {
        let field = match self.tokens.get(self.pos) {
            Some(Token::Word(w)) => w.clone(),
            _ => return Err(self.invalid()),
        };
        self.pos += 1;

        let op = match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => *op,
            _ => return Err(self.invalid()),
        };
        self.pos += 1;

        let value = match self.tokens.get(self.pos) {
            Some(Token::Number(n)) => Literal::Number(*n),
            Some(Token::Quoted(s)) => Literal::Text(s.clone()),
            Some(Token::Word(w)) => match w.as_str() {
                "true" => Literal::Bool(true),
                "false" => Literal::Bool(false),
                _ => Literal::Text(w.clone()),
            },
            _ => return Err(self.invalid()),
        };
        self.pos += 1;

        Ok(Condition::Compare { field, op, value })
    }
}
