//! Whitelist check, tokenizer and recursive-descent parser for arithmetic formulas.
//!
//! Grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```

use crate::types::{BinaryOp, Expr, FormulaError, Token};

/// Maximum nesting of parentheses and unary signs.
pub const MAX_DEPTH: usize = 128;

/// Returns `true` for the only characters a substituted formula may contain.
pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '(' | ')' | '.') || c.is_whitespace()
}

/// Rejects empty text and any text containing characters outside the whitelist.
///
/// Whitespace-only text is [`FormulaError::Empty`], which is not a rejection.
pub fn check_whitelist(text: &str) -> Result<(), FormulaError> {
    if text.is_empty() {
        return Err(FormulaError::MissingFormula);
    }
    if let Some(ch) = text.chars().find(|c| !is_allowed_char(*c)) {
        return Err(FormulaError::DisallowedCharacter { ch });
    }
    if text.trim().is_empty() {
        return Err(FormulaError::Empty);
    }
    Ok(())
}

/// Splits whitelisted text into tokens.
pub fn tokenize(text: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '0'..='9' | '.' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_ascii_digit() || next == '.' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &text[start..end];
                Token::Number(parse_number(literal)?)
            }
            other => return Err(FormulaError::DisallowedCharacter { ch: other }),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Parses a numeric literal: digits with at most one decimal point.
fn parse_number(literal: &str) -> Result<f64, FormulaError> {
    let invalid = || FormulaError::InvalidNumber(literal.to_string());
    if literal == "." || literal.matches('.').count() > 1 {
        return Err(invalid());
    }
    literal.parse::<f64>().map_err(|_| invalid())
}

/// Parses whitelisted formula text into an expression tree.
pub fn parse(text: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr(0)?;
    if let Some(tok) = parser.peek() {
        return Err(FormulaError::UnexpectedToken {
            found: tok.describe(),
            position: parser.pos,
        });
    }
    Ok(expr)
}

/// Checks, parses and evaluates a formula in one step.
pub fn evaluate(text: &str) -> Result<f64, FormulaError> {
    check_whitelist(text)?;
    Ok(parse(text)?.eval())
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expr(&mut self, depth: usize) -> Result<Expr, FormulaError> {
        let mut lhs = self.term(depth)?;
        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinaryOp::Add),
            Some(Token::Minus) => Some(BinaryOp::Sub),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.term(depth)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self, depth: usize) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary(depth)?;
        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinaryOp::Mul),
            Some(Token::Slash) => Some(BinaryOp::Div),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.unary(depth)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self, depth: usize) -> Result<Expr, FormulaError> {
        if depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep(MAX_DEPTH));
        }
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary(depth + 1)?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary(depth + 1)
            }
            _ => self.primary(depth),
        }
    }

    fn primary(&mut self, depth: usize) -> Result<Expr, FormulaError> {
        let position = self.pos;
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                let inner = self.expr(depth + 1)?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    Some(tok) => Err(FormulaError::UnexpectedToken {
                        found: tok.describe(),
                        position: self.pos - 1,
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(tok) => Err(FormulaError::UnexpectedToken {
                found: tok.describe(),
                position,
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn precedence_and_grouping() {
        assert_eq!(evaluate("3 + 4 * 2").unwrap(), 11.0);
        assert_eq!(evaluate("(3 + 4) * 2").unwrap(), 14.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("24 / 4 / 2").unwrap(), 3.0);
        assert_eq!(evaluate("2 * (3 + (4 - 1)) / 3").unwrap(), 4.0);
    }

    #[test]
    fn unary_signs() {
        assert_eq!(evaluate("-3 + 5").unwrap(), 2.0);
        assert_eq!(evaluate("5 - -3").unwrap(), 8.0);
        assert_eq!(evaluate("-(2 + 3)").unwrap(), -5.0);
        assert_eq!(evaluate("+4").unwrap(), 4.0);
    }

    #[test]
    fn decimals() {
        assert_eq!(evaluate("1.5 * 2").unwrap(), 3.0);
        assert_eq!(evaluate(".5 + .25").unwrap(), 0.75);
        assert_eq!(evaluate("2. * 2").unwrap(), 4.0);
        assert_eq!(
            evaluate("1.2.3"),
            Err(FormulaError::InvalidNumber("1.2.3".into()))
        );
        assert_eq!(evaluate(". + 1"), Err(FormulaError::InvalidNumber(".".into())));
    }

    #[test]
    fn division_by_zero_is_not_an_error() {
        assert_eq!(evaluate("1 / 0").unwrap(), f64::INFINITY);
        assert_eq!(evaluate("-1 / 0").unwrap(), f64::NEG_INFINITY);
        assert!(evaluate("0 / 0").unwrap().is_nan());
    }

    #[test]
    fn whitelist_rejects_letters() {
        assert_eq!(
            evaluate("alert(1)"),
            Err(FormulaError::DisallowedCharacter { ch: 'a' })
        );
        assert_eq!(
            evaluate("2 ** 3; x"),
            Err(FormulaError::DisallowedCharacter { ch: ';' })
        );
        assert_eq!(
            evaluate("{a} + 1"),
            Err(FormulaError::DisallowedCharacter { ch: '{' })
        );
        assert_eq!(evaluate(""), Err(FormulaError::MissingFormula));
        assert_eq!(evaluate("   "), Err(FormulaError::Empty));
        assert!(FormulaError::MissingFormula.is_rejection());
        assert!(!FormulaError::Empty.is_rejection());
    }

    #[test]
    fn malformed_expressions() {
        assert_eq!(evaluate("1 +"), Err(FormulaError::UnexpectedEnd));
        assert_eq!(evaluate("(1 + 2"), Err(FormulaError::UnexpectedEnd));
        assert!(matches!(
            evaluate("1 + 2)"),
            Err(FormulaError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            evaluate("2 ** 3"),
            Err(FormulaError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            evaluate("()"),
            Err(FormulaError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            evaluate("1 2"),
            Err(FormulaError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let text = format!("{}1{}", "(".repeat(MAX_DEPTH + 5), ")".repeat(MAX_DEPTH + 5));
        assert_eq!(evaluate(&text), Err(FormulaError::TooDeep(MAX_DEPTH)));
        let minus = format!("{}1", "-".repeat(MAX_DEPTH + 5));
        assert_eq!(evaluate(&minus), Err(FormulaError::TooDeep(MAX_DEPTH)));
    }

    #[test]
    fn tokenizer_output() {
        assert_eq!(
            tokenize("(1+2.5)").unwrap(),
            vec![
                Token::LParen,
                Token::Number(1.0),
                Token::Plus,
                Token::Number(2.5),
                Token::RParen,
            ]
        );
    }
}
