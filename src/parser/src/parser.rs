use crate::error::ParseError;
use crate::lexer::{tokenize, Token, TokenKind};
use ast::{
    AggFunc, AggregateCall, BinOp, BinaryOpExpr, ColumnRef, Expression, FunctionCall,
    NamedExpression, Operator, OrderKey, Plan, Source, UnOp, UnaryOpExpr,
};
use data::{DataType, Datum, SortOrder};

/// Recursive-descent parser over the QL grammar, with a
/// precedence-climbing (Pratt) expression parser. The parser never
/// evaluates anything - it only builds the raw `Plan`/`Expression` AST
/// for the planner to resolve.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

pub fn parse(source: &str) -> Result<Plan, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let plan = parser.parse_query()?;
    parser.expect_eof()?;
    Ok(plan)
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError::new(message, token.line, token.col)
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        if self.peek().kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.error(format!("unexpected trailing input {:?}", self.peek().kind)))
        }
    }

    fn ident_text(&self) -> Option<&str> {
        if let TokenKind::Ident(text) = &self.peek().kind {
            Some(text.as_str())
        } else {
            None
        }
    }

    /// Consumes the current token if it's the identifier `keyword`
    /// (case-sensitive, matching the rest of the language).
    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.ident_text() == Some(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", keyword)))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(text) => {
                let text = text.clone();
                self.advance();
                Ok(text)
            }
            other => Err(self.error(format!("expected identifier, found {:?}", other))),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.peek().kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}, found {:?}", kind, self.peek().kind)))
        }
    }

    fn expect_int(&mut self) -> Result<i64, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Int(i) => {
                self.advance();
                Ok(i)
            }
            other => Err(self.error(format!("expected an integer literal, found {:?}", other))),
        }
    }

    // ---- query / source / operators ----

    fn parse_query(&mut self) -> Result<Plan, ParseError> {
        if self.peek().kind == TokenKind::Eof {
            return Err(self.error("empty query"));
        }
        let source = self.parse_source()?;
        let mut plan = Plan::new(source);
        while self.peek().kind == TokenKind::Pipe {
            self.advance();
            plan.operators.push(self.parse_operator()?);
        }
        Ok(plan)
    }

    fn parse_source(&mut self) -> Result<Source, ParseError> {
        if self.eat_keyword("union") {
            let mut tables = vec![self.expect_ident()?];
            while self.peek().kind == TokenKind::Comma {
                self.advance();
                tables.push(self.expect_ident()?);
            }
            Ok(Source::Union(tables))
        } else {
            Ok(Source::Table(self.expect_ident()?))
        }
    }

    fn parse_operator(&mut self) -> Result<Operator, ParseError> {
        if self.eat_keyword("where") {
            return Ok(Operator::Where(self.parse_expr()?));
        }
        if self.eat_keyword("project") {
            return Ok(Operator::Project(self.parse_named_expr_list()?));
        }
        if self.eat_keyword("extend") {
            return Ok(Operator::Extend(self.parse_named_expr_list()?));
        }
        if self.eat_keyword("summarize") {
            return self.parse_summarize();
        }
        if self.eat_keyword("order") || self.eat_keyword("sort") {
            self.expect_keyword("by")?;
            return Ok(Operator::OrderBy(self.parse_order_items()?));
        }
        if self.eat_keyword("take") || self.eat_keyword("limit") {
            return Ok(Operator::Take(self.expect_int()?));
        }
        if self.eat_keyword("top") {
            let count = self.expect_int()?;
            self.expect_keyword("by")?;
            let column = self.expect_ident()?;
            let order = self.parse_optional_direction(SortOrder::Desc);
            return Ok(Operator::Top {
                count,
                by: OrderKey { column, order },
            });
        }
        if self.eat_keyword("distinct") {
            let mut columns = vec![self.expect_ident()?];
            while self.peek().kind == TokenKind::Comma {
                self.advance();
                columns.push(self.expect_ident()?);
            }
            return Ok(Operator::Distinct(columns));
        }
        if self.eat_keyword("count") {
            return Ok(Operator::Count);
        }
        Err(self.error(format!(
            "expected an operator (where/project/extend/summarize/order/sort/take/limit/top/count/distinct), found {:?}",
            self.peek().kind
        )))
    }

    fn parse_named_expr_list(&mut self) -> Result<Vec<NamedExpression>, ParseError> {
        let mut items = vec![self.parse_named_expr()?];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            items.push(self.parse_named_expr()?);
        }
        Ok(items)
    }

    /// `Ident` or `Ident "=" expr` - a bare identifier projects/extends
    /// the column of that name unchanged.
    fn parse_named_expr(&mut self) -> Result<NamedExpression, ParseError> {
        let name = self.expect_ident()?;
        if self.peek().kind == TokenKind::Assign {
            self.advance();
            let expression = self.parse_expr()?;
            Ok(NamedExpression { name, expression })
        } else {
            Ok(NamedExpression {
                name: name.clone(),
                expression: Expression::Column(ColumnRef { name }),
            })
        }
    }

    fn parse_summarize(&mut self) -> Result<Operator, ParseError> {
        let mut aggregates = vec![self.parse_agg_item()?];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            aggregates.push(self.parse_agg_item()?);
        }
        let mut by = Vec::new();
        if self.eat_keyword("by") {
            by.push(self.expect_ident()?);
            while self.peek().kind == TokenKind::Comma {
                self.advance();
                by.push(self.expect_ident()?);
            }
        }
        Ok(Operator::Summarize { aggregates, by })
    }

    /// `(Ident "=")? aggcall` - an unaliased aggregate gets the
    /// conventional `<function>_<column>` default name (bare `count()`
    /// becomes `Count`), applied by the planner once the call is resolved.
    fn parse_agg_item(&mut self) -> Result<NamedExpression, ParseError> {
        let explicit_name = if let TokenKind::Ident(text) = &self.peek().kind {
            let text = text.clone();
            if self.tokens.get(self.pos + 1).map(|t| &t.kind) == Some(&TokenKind::Assign)
                && AggFunc::from_name(&text).is_none()
            {
                self.advance();
                self.advance();
                Some(text)
            } else {
                None
            }
        } else {
            None
        };
        let func_name = self.expect_ident()?;
        let func = AggFunc::from_name(&func_name)
            .ok_or_else(|| self.error(format!("unknown aggregation function '{}'", func_name)))?;
        self.expect(TokenKind::LParen)?;
        let arg = if self.peek().kind == TokenKind::RParen {
            None
        } else {
            Some(Box::new(Expression::Column(ColumnRef {
                name: self.expect_ident()?,
            })))
        };
        self.expect(TokenKind::RParen)?;
        let name = explicit_name.unwrap_or_else(|| default_agg_name(func, &arg));
        Ok(NamedExpression {
            name,
            expression: Expression::Aggregate(AggregateCall { func, arg }),
        })
    }

    fn parse_order_items(&mut self) -> Result<Vec<OrderKey>, ParseError> {
        let mut items = vec![self.parse_order_item()?];
        while self.peek().kind == TokenKind::Comma {
            self.advance();
            items.push(self.parse_order_item()?);
        }
        Ok(items)
    }

    fn parse_order_item(&mut self) -> Result<OrderKey, ParseError> {
        let column = self.expect_ident()?;
        let order = self.parse_optional_direction(SortOrder::Asc);
        Ok(OrderKey { column, order })
    }

    fn parse_optional_direction(&mut self, default: SortOrder) -> SortOrder {
        if self.eat_keyword("asc") {
            SortOrder::Asc
        } else if self.eat_keyword("desc") {
            SortOrder::Desc
        } else {
            default
        }
    }

    // ---- expressions: Pratt precedence climbing ----

    pub fn parse_expr(&mut self) -> Result<Expression, ParseError> {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_bp: u8) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let (op, bp) = match self.peek_binary_op() {
                Some(pair) => pair,
                None => break,
            };
            if bp < min_bp {
                break;
            }
            self.consume_binary_op(&op)?;
            let right = self.parse_binary(bp + 1)?;
            left = Expression::BinaryOp(BinaryOpExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// Binding power table, loosest to tightest: `or` < `and` < equality
    /// < relational < additive < multiplicative < word predicates
    /// (`contains`/`startswith`/`endswith`/`has`/`matches regex`), which
    /// bind as tightly as relational comparisons.
    fn peek_binary_op(&self) -> Option<(BinOp, u8)> {
        match &self.peek().kind {
            TokenKind::EqEq => Some((BinOp::Eq, 3)),
            TokenKind::BangEq => Some((BinOp::Ne, 3)),
            TokenKind::Lt => Some((BinOp::Lt, 4)),
            TokenKind::Le => Some((BinOp::Le, 4)),
            TokenKind::Gt => Some((BinOp::Gt, 4)),
            TokenKind::Ge => Some((BinOp::Ge, 4)),
            TokenKind::Plus => Some((BinOp::Add, 5)),
            TokenKind::Minus => Some((BinOp::Sub, 5)),
            TokenKind::Star => Some((BinOp::Mul, 6)),
            TokenKind::Slash => Some((BinOp::Div, 6)),
            TokenKind::Ident(text) => match text.as_str() {
                "or" => Some((BinOp::Or, 1)),
                "and" => Some((BinOp::And, 2)),
                "contains" => Some((BinOp::Contains, 4)),
                "startswith" => Some((BinOp::StartsWith, 4)),
                "endswith" => Some((BinOp::EndsWith, 4)),
                "has" => Some((BinOp::Has, 4)),
                "matches" => Some((BinOp::MatchesRegex, 4)),
                _ => None,
            },
            _ => None,
        }
    }

    fn consume_binary_op(&mut self, op: &BinOp) -> Result<(), ParseError> {
        self.advance();
        if *op == BinOp::MatchesRegex {
            // `matches regex` is a two-word operator - reject anything else
            // following `matches` rather than silently discarding it.
            self.expect_keyword("regex")?;
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        if self.peek().kind == TokenKind::Minus {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Expression::UnaryOp(UnaryOpExpr {
                op: UnOp::Neg,
                expr: Box::new(expr),
            }));
        }
        if self.ident_text() == Some("not") {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(Expression::UnaryOp(UnaryOpExpr {
                op: UnOp::Not,
                expr: Box::new(expr),
            }));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Int(i) => {
                self.advance();
                Ok(Expression::Literal(Datum::from(i), DataType::Int))
            }
            TokenKind::Real(r) => {
                self.advance();
                Ok(Expression::Literal(Datum::from(r), DataType::Real))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Expression::Literal(Datum::from(s), DataType::String))
            }
            TokenKind::Timespan(t) => {
                self.advance();
                Ok(Expression::Literal(Datum::from(t), DataType::Timespan))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if name == "true" || name == "false" {
                    self.advance();
                    return Ok(Expression::Literal(Datum::from(name == "true"), DataType::Bool));
                }
                self.advance();
                if self.peek().kind == TokenKind::LParen {
                    self.advance();
                    let mut args = Vec::new();
                    if self.peek().kind != TokenKind::RParen {
                        args.push(self.parse_expr()?);
                        while self.peek().kind == TokenKind::Comma {
                            self.advance();
                            args.push(self.parse_expr()?);
                        }
                    }
                    self.expect(TokenKind::RParen)?;
                    Ok(Expression::FunctionCall(FunctionCall {
                        function_name: name,
                        args,
                    }))
                } else {
                    Ok(Expression::Column(ColumnRef { name }))
                }
            }
            other => Err(self.error(format!("unexpected token {:?} in expression", other))),
        }
    }
}

fn default_agg_name(func: AggFunc, arg: &Option<Box<Expression>>) -> String {
    match (func, arg) {
        (AggFunc::Count, _) => "Count".to_string(),
        (_, Some(arg)) => format!("{}_{}", func.name(), arg),
        (_, None) => func.name().to_string(),
    }
}
