//! Recursive-descent expression parser
//!
//! ```text
//! expression  := disjunction ["if" disjunction "else" expression]
//! disjunction := conjunction ("or" conjunction)*
//! conjunction := inversion ("and" inversion)*
//! inversion   := "not" inversion | comparison
//! comparison  := bit_or (comp_op bit_or)*
//! bit_or      := bit_and ("|" bit_and)*
//! bit_and     := sum ("&" sum)*
//! sum         := term (("+" | "-") term)*
//! term        := factor (("*" | "/" | "//" | "%") factor)*
//! factor      := ("+" | "-") factor | power
//! power       := postfix ["**" factor]
//! postfix     := atom (subscript | "." NAME "(" args ")" | "(" args ")")*
//! ```

use super::ast::{BinaryOp, BoolOp, CompareOp, Expr, ExprKind, UnaryOp};
use super::error::{SyntaxError, SyntaxResult};
use crate::config::compile_time::expression::MAX_PARSE_DEPTH;
use crate::tokens::{Token, TokenStream};
use crate::utils::Span;
use crate::values::Value;
use crate::{log_debug, log_error};

/// Parse a complete token stream into a single expression
pub fn parse_tokens(tokens: TokenStream) -> SyntaxResult<Expr> {
    if tokens.is_empty() {
        let error = SyntaxError::EmptyExpression;
        log_error!(error.error_code(), &error.to_string());
        return Err(error);
    }

    let token_count = tokens.len();
    let mut parser = Parser::new(tokens);
    let result = parser.parse_expression().and_then(|expr| {
        parser.expect_end()?;
        Ok(expr)
    });

    match &result {
        Ok(expr) => log_debug!(
            "Expression parsed",
            "tokens" => token_count,
            "root" => expr.kind.describe()
        ),
        Err(error) => match error.span() {
            Some(span) => log_error!(error.error_code(), &error.to_string(), span = span),
            None => log_error!(error.error_code(), &error.to_string()),
        },
    }

    result
}

struct Parser {
    tokens: TokenStream,
    depth: usize,
}

impl Parser {
    fn new(tokens: TokenStream) -> Self {
        Self { tokens, depth: 0 }
    }

    // =========================================================================
    // Cursor helpers
    // =========================================================================

    fn expect(&mut self, token: Token, expected: &str) -> SyntaxResult<Span> {
        if self.tokens.check(&token) {
            Ok(self.tokens.advance().span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_end(&self) -> SyntaxResult<()> {
        if self.tokens.is_at_end() {
            Ok(())
        } else {
            Err(self.unexpected("end of expression"))
        }
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let current = self.tokens.current();
        if current.token == Token::Eof {
            SyntaxError::unexpected_end(expected)
        } else {
            SyntaxError::unexpected_token(expected, &current.token.describe(), current.span)
        }
    }

    /// Run `f` one nesting level deeper
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> SyntaxResult<T>) -> SyntaxResult<T> {
        if self.depth >= MAX_PARSE_DEPTH {
            return Err(SyntaxError::MaxDepthExceeded {
                span: self.tokens.current_span(),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // Precedence levels
    // =========================================================================

    fn parse_expression(&mut self) -> SyntaxResult<Expr> {
        self.nested(|p| {
            let then_branch = p.parse_disjunction()?;
            if !p.tokens.eat(&Token::If) {
                return Ok(then_branch);
            }
            let condition = p.parse_disjunction()?;
            p.expect(Token::Else, "'else'")?;
            let else_branch = p.parse_expression()?;
            let span = then_branch.span.merge(else_branch.span);
            Ok(Expr::new(
                ExprKind::Conditional {
                    condition: condition.boxed(),
                    then_branch: then_branch.boxed(),
                    else_branch: else_branch.boxed(),
                },
                span,
            ))
        })
    }

    fn parse_disjunction(&mut self) -> SyntaxResult<Expr> {
        let mut left = self.parse_conjunction()?;
        while self.tokens.eat(&Token::Or) {
            let right = self.parse_conjunction()?;
            left = logical(BoolOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_conjunction(&mut self) -> SyntaxResult<Expr> {
        let mut left = self.parse_inversion()?;
        while self.tokens.eat(&Token::And) {
            let right = self.parse_inversion()?;
            left = logical(BoolOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_inversion(&mut self) -> SyntaxResult<Expr> {
        if self.tokens.check(&Token::Not) {
            let start = self.tokens.advance().span;
            let operand = self.nested(|p| p.parse_inversion())?;
            let span = start.merge(operand.span);
            return Ok(Expr::new(ExprKind::Not(operand.boxed()), span));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> SyntaxResult<Expr> {
        let first = self.parse_bit_or()?;
        let mut rest = Vec::new();

        while let Some(op) = self.comparison_operator()? {
            rest.push((op, self.parse_bit_or()?));
        }

        if rest.is_empty() {
            return Ok(first);
        }
        let span = rest
            .last()
            .map(|(_, e)| first.span.merge(e.span))
            .unwrap_or(first.span);
        Ok(Expr::new(
            ExprKind::Compare {
                first: first.boxed(),
                rest,
            },
            span,
        ))
    }

    /// Consume a comparison operator, including `not in` and `is not`
    fn comparison_operator(&mut self) -> SyntaxResult<Option<CompareOp>> {
        let op = match self.tokens.current_token() {
            Token::EqualEqual => CompareOp::Eq,
            Token::NotEqual => CompareOp::NotEq,
            Token::Less => CompareOp::Lt,
            Token::Greater => CompareOp::Gt,
            Token::LessEqual => CompareOp::Le,
            Token::GreaterEqual => CompareOp::Ge,
            Token::In => CompareOp::In,
            Token::Is => {
                self.tokens.advance();
                return Ok(Some(if self.tokens.eat(&Token::Not) {
                    CompareOp::IsNot
                } else {
                    CompareOp::Is
                }));
            }
            Token::Not if self.tokens.peek() == &Token::In => {
                self.tokens.advance();
                self.tokens.advance();
                return Ok(Some(CompareOp::NotIn));
            }
            _ => return Ok(None),
        };
        self.tokens.advance();
        Ok(Some(op))
    }

    fn parse_bit_or(&mut self) -> SyntaxResult<Expr> {
        let mut left = self.parse_bit_and()?;
        while self.tokens.eat(&Token::Pipe) {
            let right = self.parse_bit_and()?;
            left = binary(BinaryOp::BitOr, left, right);
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> SyntaxResult<Expr> {
        let mut left = self.parse_sum()?;
        while self.tokens.eat(&Token::Ampersand) {
            let right = self.parse_sum()?;
            left = binary(BinaryOp::BitAnd, left, right);
        }
        Ok(left)
    }

    fn parse_sum(&mut self) -> SyntaxResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.tokens.current_token() {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.tokens.advance();
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> SyntaxResult<Expr> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.tokens.current_token() {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::DoubleSlash => BinaryOp::FloorDiv,
                Token::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.tokens.advance();
            let right = self.parse_factor()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> SyntaxResult<Expr> {
        let op = match self.tokens.current_token() {
            Token::Minus => UnaryOp::Neg,
            Token::Plus => UnaryOp::Pos,
            _ => return self.parse_power(),
        };
        let start = self.tokens.advance().span;
        let operand = self.nested(|p| p.parse_factor())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: operand.boxed(),
            },
            span,
        ))
    }

    fn parse_power(&mut self) -> SyntaxResult<Expr> {
        let base = self.parse_postfix()?;
        if !self.tokens.eat(&Token::DoubleStar) {
            return Ok(base);
        }
        // Right-associative, and binds tighter than a unary minus on its left
        let exponent = self.nested(|p| p.parse_factor())?;
        Ok(binary(BinaryOp::Pow, base, exponent))
    }

    fn parse_postfix(&mut self) -> SyntaxResult<Expr> {
        let mut expr = self.parse_atom()?;
        loop {
            match self.tokens.current_token() {
                Token::LeftBracket => {
                    self.tokens.advance();
                    expr = self.nested(|p| p.parse_subscript(expr))?;
                }
                Token::Dot => {
                    self.tokens.advance();
                    let name_span = self.tokens.current_span();
                    let method = match self.tokens.current_token() {
                        Token::Identifier(name) => name.clone(),
                        _ => return Err(self.unexpected("method name")),
                    };
                    self.tokens.advance();
                    if !self.tokens.check(&Token::LeftParen) {
                        return Err(SyntaxError::invalid_construct(
                            &format!("Attribute access '.{}' is only supported as a method call", method),
                            name_span,
                        ));
                    }
                    self.tokens.advance();
                    let (args, end) = self.nested(|p| p.parse_arguments())?;
                    let span = expr.span.merge(end);
                    expr = Expr::new(
                        ExprKind::MethodCall {
                            receiver: expr.boxed(),
                            method,
                            args,
                        },
                        span,
                    );
                }
                Token::LeftParen => {
                    let function = match &expr.kind {
                        ExprKind::Name(name) => name.clone(),
                        other => {
                            return Err(SyntaxError::invalid_construct(
                                &format!("A {} is not callable", other.describe()),
                                expr.span,
                            ))
                        }
                    };
                    self.tokens.advance();
                    let (args, end) = self.nested(|p| p.parse_arguments())?;
                    let span = expr.span.merge(end);
                    expr = Expr::new(ExprKind::Call { function, args }, span);
                }
                _ => return Ok(expr),
            }
        }
    }

    /// After `[`: either an index or a slice, through the closing `]`
    fn parse_subscript(&mut self, target: Expr) -> SyntaxResult<Expr> {
        let start = self.optional_slice_part()?;

        if !self.tokens.check(&Token::Colon) {
            let index = start.ok_or_else(|| self.unexpected("index"))?;
            let end = self.expect(Token::RightBracket, "']'")?;
            let span = target.span.merge(end);
            return Ok(Expr::new(
                ExprKind::Subscript {
                    target: target.boxed(),
                    index: index.boxed(),
                },
                span,
            ));
        }

        self.tokens.advance();
        let stop = self.optional_slice_part()?;
        let step = if self.tokens.eat(&Token::Colon) {
            self.optional_slice_part()?
        } else {
            None
        };
        let end = self.expect(Token::RightBracket, "']'")?;
        let span = target.span.merge(end);
        Ok(Expr::new(
            ExprKind::Slice {
                target: target.boxed(),
                start: start.map(Expr::boxed),
                stop: stop.map(Expr::boxed),
                step: step.map(Expr::boxed),
            },
            span,
        ))
    }

    fn optional_slice_part(&mut self) -> SyntaxResult<Option<Expr>> {
        match self.tokens.current_token() {
            Token::Colon | Token::RightBracket => Ok(None),
            _ => self.parse_expression().map(Some),
        }
    }

    /// After `(`: comma-separated arguments through the closing `)`
    fn parse_arguments(&mut self) -> SyntaxResult<(Vec<Expr>, Span)> {
        self.parse_sequence(Token::RightParen, "')'")
    }

    /// Comma-separated expressions with an optional trailing comma
    fn parse_sequence(&mut self, close: Token, expected: &str) -> SyntaxResult<(Vec<Expr>, Span)> {
        let mut items = Vec::new();
        loop {
            if self.tokens.check(&close) {
                break;
            }
            items.push(self.parse_expression()?);
            if !self.tokens.eat(&Token::Comma) {
                break;
            }
        }
        let end = self.expect(close, expected)?;
        Ok((items, end))
    }

    // =========================================================================
    // Atoms
    // =========================================================================

    fn parse_atom(&mut self) -> SyntaxResult<Expr> {
        let current = self.tokens.current().clone();
        let span = current.span;

        let literal = |value: Value| Ok(Expr::new(ExprKind::Literal(value), span));

        match current.token {
            Token::Int(i) => {
                self.tokens.advance();
                literal(Value::Int(i))
            }
            Token::Float(x) => {
                self.tokens.advance();
                literal(Value::Float(x))
            }
            Token::True => {
                self.tokens.advance();
                literal(Value::Bool(true))
            }
            Token::False => {
                self.tokens.advance();
                literal(Value::Bool(false))
            }
            Token::None => {
                self.tokens.advance();
                literal(Value::None)
            }
            Token::Str(text) => {
                self.tokens.advance();
                // Adjacent string literals concatenate
                let mut text = text;
                let mut end = span;
                while let Token::Str(next) = self.tokens.current_token() {
                    text.push_str(next);
                    end = self.tokens.advance().span;
                }
                Ok(Expr::new(ExprKind::Literal(Value::Str(text)), span.merge(end)))
            }
            Token::Identifier(name) => {
                self.tokens.advance();
                Ok(Expr::new(ExprKind::Name(name), span))
            }
            Token::LeftParen => {
                self.tokens.advance();
                self.nested(|p| p.parse_parenthesized(span))
            }
            Token::LeftBracket => {
                self.tokens.advance();
                let (items, end) = self.nested(|p| p.parse_sequence(Token::RightBracket, "']'"))?;
                Ok(Expr::new(ExprKind::List(items), span.merge(end)))
            }
            Token::LeftBrace => {
                self.tokens.advance();
                self.nested(|p| p.parse_dict(span))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// After `(`: a grouping, or a tuple when a comma is present
    fn parse_parenthesized(&mut self, start: Span) -> SyntaxResult<Expr> {
        if self.tokens.check(&Token::RightParen) {
            let end = self.tokens.advance().span;
            return Ok(Expr::new(ExprKind::Tuple(Vec::new()), start.merge(end)));
        }

        let first = self.parse_expression()?;
        if !self.tokens.check(&Token::Comma) {
            self.expect(Token::RightParen, "')'")?;
            return Ok(first);
        }

        self.tokens.advance();
        let (mut rest, end) = self.parse_sequence(Token::RightParen, "')'")?;
        let mut items = vec![first];
        items.append(&mut rest);
        Ok(Expr::new(ExprKind::Tuple(items), start.merge(end)))
    }

    /// After `{`: key/value pairs through the closing `}`
    fn parse_dict(&mut self, start: Span) -> SyntaxResult<Expr> {
        let mut entries = Vec::new();
        loop {
            if self.tokens.check(&Token::RightBrace) {
                break;
            }
            let key = self.parse_expression()?;
            if !self.tokens.check(&Token::Colon) {
                return Err(match self.tokens.current_token() {
                    Token::Comma | Token::RightBrace => SyntaxError::invalid_construct(
                        "Set literals are not supported",
                        start.merge(key.span),
                    ),
                    _ => self.unexpected("':'"),
                });
            }
            self.tokens.advance();
            let value = self.parse_expression()?;
            entries.push((key, value));
            if !self.tokens.eat(&Token::Comma) {
                break;
            }
        }
        let end = self.expect(Token::RightBrace, "'}'")?;
        Ok(Expr::new(ExprKind::Dict(entries), start.merge(end)))
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: left.boxed(),
            right: right.boxed(),
        },
        span,
    )
}

fn logical(op: BoolOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Logical {
            op,
            left: left.boxed(),
            right: right.boxed(),
        },
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize;
    use assert_matches::assert_matches;

    fn parse(source: &str) -> SyntaxResult<Expr> {
        parse_tokens(tokenize(source).expect("source should tokenize"))
    }

    fn kind(source: &str) -> ExprKind {
        parse(source).expect("source should parse").kind
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_matches!(
            kind("1 + 2 * 3"),
            ExprKind::Binary { op: BinaryOp::Add, right, .. }
                if matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. })
        );
    }

    #[test]
    fn test_power_is_right_associative_and_binds_over_negation() {
        assert_matches!(
            kind("2 ** 3 ** 2"),
            ExprKind::Binary { op: BinaryOp::Pow, right, .. }
                if matches!(right.kind, ExprKind::Binary { op: BinaryOp::Pow, .. })
        );
        assert_matches!(
            kind("-2 ** 2"),
            ExprKind::Unary { op: UnaryOp::Neg, operand }
                if matches!(operand.kind, ExprKind::Binary { op: BinaryOp::Pow, .. })
        );
    }

    #[test]
    fn test_chained_comparison() {
        match kind("1 < x <= 10") {
            ExprKind::Compare { rest, .. } => {
                let ops: Vec<CompareOp> = rest.iter().map(|(op, _)| *op).collect();
                assert_eq!(ops, vec![CompareOp::Lt, CompareOp::Le]);
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn test_negated_membership_and_identity() {
        assert_matches!(
            kind("'a' not in value"),
            ExprKind::Compare { rest, .. } if rest[0].0 == CompareOp::NotIn
        );
        assert_matches!(
            kind("value is not None"),
            ExprKind::Compare { rest, .. } if rest[0].0 == CompareOp::IsNot
        );
    }

    #[test]
    fn test_not_binds_looser_than_comparison() {
        assert_matches!(
            kind("not a == b"),
            ExprKind::Not(inner) if matches!(inner.kind, ExprKind::Compare { .. })
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_matches!(
            kind("a or b and c"),
            ExprKind::Logical { op: BoolOp::Or, right, .. }
                if matches!(right.kind, ExprKind::Logical { op: BoolOp::And, .. })
        );
    }

    #[test]
    fn test_conditional_expression() {
        assert_matches!(kind("1 if value else 2"), ExprKind::Conditional { .. });
    }

    #[test]
    fn test_method_and_function_calls() {
        assert_matches!(
            kind("value.upper().startswith('A')"),
            ExprKind::MethodCall { method, receiver, args }
                if method == "startswith"
                    && args.len() == 1
                    && matches!(receiver.kind, ExprKind::MethodCall { .. })
        );
        assert_matches!(
            kind("len(value, )"),
            ExprKind::Call { function, args } if function == "len" && args.len() == 1
        );
    }

    #[test]
    fn test_subscripts_and_slices() {
        assert_matches!(kind("value[0]"), ExprKind::Subscript { .. });
        assert_matches!(
            kind("value[::-1]"),
            ExprKind::Slice { start: None, stop: None, step: Some(_), .. }
        );
        assert_matches!(
            kind("value[1:]"),
            ExprKind::Slice { start: Some(_), stop: None, step: None, .. }
        );
    }

    #[test]
    fn test_collection_literals() {
        assert_matches!(kind("[1, 2, 3,]"), ExprKind::List(items) if items.len() == 3);
        assert_matches!(kind("(1,)"), ExprKind::Tuple(items) if items.len() == 1);
        assert_matches!(kind("()"), ExprKind::Tuple(items) if items.is_empty());
        assert_matches!(kind("(1)"), ExprKind::Literal(Value::Int(1)));
        assert_matches!(kind("{'a': 1, 'b': 2}"), ExprKind::Dict(entries) if entries.len() == 2);
        assert_matches!(kind("{}"), ExprKind::Dict(entries) if entries.is_empty());
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        assert_eq!(kind("'ab' \"cd\""), ExprKind::Literal(Value::str("abcd")));
    }

    #[test]
    fn test_errors() {
        assert_matches!(parse(""), Err(SyntaxError::EmptyExpression));
        assert_matches!(parse("1 +"), Err(SyntaxError::UnexpectedEnd { .. }));
        assert_matches!(parse("1 2"), Err(SyntaxError::UnexpectedToken { .. }));
        assert_matches!(parse("value.real"), Err(SyntaxError::InvalidConstruct { .. }));
        assert_matches!(parse("(1)(2)"), Err(SyntaxError::InvalidConstruct { .. }));
        assert_matches!(parse("{1, 2}"), Err(SyntaxError::InvalidConstruct { .. }));
        assert_matches!(parse("1 if x"), Err(SyntaxError::UnexpectedEnd { .. }));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_PARSE_DEPTH + 1), ")".repeat(MAX_PARSE_DEPTH + 1));
        assert_matches!(parse(&deep), Err(SyntaxError::MaxDepthExceeded { .. }));
    }

    #[test]
    fn test_span_covers_expression() {
        let expr = parse("a + bb").expect("should parse");
        assert_eq!(expr.span.start().offset, 0);
        assert_eq!(expr.span.end().offset, 6);
    }
}
