//! Recursive-descent expression parser
//!
//! Precedence, lowest first: `or`, `and`, equality/relational,
//! additive, multiplicative, unary, primary.

use crate::error::{ExpressionError, ExpressionResult};
use crate::expr::token::{tokenize, Token, TokenKind};
use crate::expr::value::Value;

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl BinaryOp {
    /// Source form of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Equal => "=",
            BinaryOp::NotEqual => "<>",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
        }
    }
}

/// Expression syntax tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Property(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        namespace: String,
        name: String,
        args: Vec<Expr>,
    },
    /// `if(condition, then, else)`, evaluating only the selected branch
    Conditional {
        condition: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
}

/// Deepest syntax tree the parser accepts
pub const MAX_DEPTH: usize = 128;

/// Tokenize and parse a complete expression
pub fn parse(input: &str) -> ExpressionResult<Expr> {
    let tokens = tokenize(input)?;
    Parser {
        tokens,
        index: 0,
        depth: 0,
    }
    .parse_all()
}

/// A parsed subtree and its height
type Parsed = (Expr, usize);

struct Parser {
    tokens: Vec<Token>,
    index: usize,

    /// Current recursion depth of the descent
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // the token list always ends with Eof, and we never advance past it
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.index += 1;
        }
        token
    }

    fn error(&self, token: &Token, message: impl Into<String>) -> ExpressionError {
        ExpressionError::Parse {
            position: token.position,
            message: message.into(),
        }
    }

    fn too_deep(&self, token: &Token) -> ExpressionError {
        self.error(
            token,
            format!("expression is nested more than {} levels deep", MAX_DEPTH),
        )
    }

    /// Run `f` one recursion level deeper
    fn nested<T>(
        &mut self,
        token: &Token,
        f: impl FnOnce(&mut Parser) -> ExpressionResult<T>,
    ) -> ExpressionResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(self.too_deep(token));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Height of a new node over children of height `child`
    fn node_height(&self, token: &Token, child: usize) -> ExpressionResult<usize> {
        let height = child + 1;
        if height > MAX_DEPTH {
            return Err(self.too_deep(token));
        }
        Ok(height)
    }

    fn combine(
        &self,
        op: BinaryOp,
        token: &Token,
        left: Parsed,
        right: Parsed,
    ) -> ExpressionResult<Parsed> {
        let height = self.node_height(token, left.1.max(right.1))?;
        Ok((binary(op, left.0, right.0), height))
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> ExpressionResult<Token> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            let found = self.peek().clone();
            Err(self.error(&found, format!("expected {}, found {}", what, describe(&found))))
        }
    }

    fn parse_all(mut self) -> ExpressionResult<Expr> {
        let (expr, _) = self.parse_or()?;
        let next = self.peek().clone();
        if next.kind != TokenKind::Eof {
            return Err(self.error(&next, format!("unexpected {}", describe(&next))));
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> ExpressionResult<Parsed> {
        let mut left = self.parse_and()?;
        while self.peek().is_operator("or") {
            let token = self.advance();
            let right = self.parse_and()?;
            left = self.combine(BinaryOp::Or, &token, left, right)?;
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ExpressionResult<Parsed> {
        let mut left = self.parse_relational()?;
        while self.peek().is_operator("and") {
            let token = self.advance();
            let right = self.parse_relational()?;
            left = self.combine(BinaryOp::And, &token, left, right)?;
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> ExpressionResult<Parsed> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek().text.as_str() {
                _ if self.peek().kind != TokenKind::Operator => break,
                "=" => BinaryOp::Equal,
                "<>" => BinaryOp::NotEqual,
                "<" => BinaryOp::Less,
                "<=" => BinaryOp::LessEqual,
                ">" => BinaryOp::Greater,
                ">=" => BinaryOp::GreaterEqual,
                _ => break,
            };
            let token = self.advance();
            let right = self.parse_additive()?;
            left = self.combine(op, &token, left, right)?;
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> ExpressionResult<Parsed> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.peek().is_operator("+") {
                BinaryOp::Add
            } else if self.peek().is_operator("-") {
                BinaryOp::Subtract
            } else {
                break;
            };
            let token = self.advance();
            let right = self.parse_multiplicative()?;
            left = self.combine(op, &token, left, right)?;
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ExpressionResult<Parsed> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.peek().is_operator("*") {
                BinaryOp::Multiply
            } else if self.peek().is_operator("/") {
                BinaryOp::Divide
            } else if self.peek().is_operator("%") {
                BinaryOp::Remainder
            } else {
                break;
            };
            let token = self.advance();
            let right = self.parse_unary()?;
            left = self.combine(op, &token, left, right)?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ExpressionResult<Parsed> {
        let op = if self.peek().is_operator("not") {
            UnaryOp::Not
        } else if self.peek().is_operator("-") {
            UnaryOp::Negate
        } else {
            return self.parse_primary();
        };
        let token = self.advance();
        let (operand, child) = self.nested(&token, |p| p.parse_unary())?;
        let height = self.node_height(&token, child)?;
        Ok((
            Expr::Unary {
                op,
                operand: Box::new(operand),
            },
            height,
        ))
    }

    fn parse_primary(&mut self) -> ExpressionResult<Parsed> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                parse_number(&token).map(|value| (Expr::Literal(value), 1))
            }
            TokenKind::String => {
                self.advance();
                Ok((Expr::Literal(Value::String(token.text)), 1))
            }
            TokenKind::Boolean => {
                self.advance();
                Ok((Expr::Literal(Value::Boolean(token.text == "true")), 1))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.nested(&token, |p| p.parse_or())?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Keyword => {
                self.advance();
                if self.peek().is_operator("::") {
                    self.advance();
                    let name = self.expect(TokenKind::Keyword, "function name")?;
                    let (args, child) = self.parse_arguments(&token)?;
                    let height = self.node_height(&token, child)?;
                    Ok((
                        Expr::Call {
                            namespace: token.text,
                            name: name.text,
                            args,
                        },
                        height,
                    ))
                } else if token.text == "if" && self.peek().kind == TokenKind::LParen {
                    self.parse_conditional(&token)
                } else {
                    Ok((Expr::Property(token.text), 1))
                }
            }
            _ => Err(self.error(&token, format!("unexpected {}", describe(&token)))),
        }
    }

    /// Parse `(arg, ...)`, returning the arguments and the tallest one's height
    fn parse_arguments(&mut self, callee: &Token) -> ExpressionResult<(Vec<Expr>, usize)> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        let mut height = 0;

        if self.peek().kind == TokenKind::RParen {
            self.advance();
            return Ok((args, height));
        }

        loop {
            let (arg, arg_height) = self.nested(callee, |p| p.parse_or())?;
            args.push(arg);
            height = height.max(arg_height);
            match self.peek().kind {
                TokenKind::Comma => {
                    self.advance();
                }
                TokenKind::RParen => {
                    self.advance();
                    return Ok((args, height));
                }
                _ => {
                    let found = self.peek().clone();
                    return Err(self.error(
                        &found,
                        format!("expected ',' or ')', found {}", describe(&found)),
                    ));
                }
            }
        }
    }

    fn parse_conditional(&mut self, keyword: &Token) -> ExpressionResult<Parsed> {
        let (args, child) = self.parse_arguments(keyword)?;
        let height = self.node_height(keyword, child)?;
        let count = args.len();
        let mut args = args.into_iter().map(Box::new);

        match (args.next(), args.next(), args.next(), args.next()) {
            (Some(condition), Some(then_branch), Some(else_branch), None) => Ok((
                Expr::Conditional {
                    condition,
                    then_branch,
                    else_branch,
                },
                height,
            )),
            _ => Err(self.error(keyword, format!("if() takes 3 arguments, got {}", count))),
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn parse_number(token: &Token) -> ExpressionResult<Value> {
    let invalid = || ExpressionError::Parse {
        position: token.position,
        message: format!("invalid number '{}'", token.text),
    };

    if token.text.contains('.') {
        token.text.parse::<f64>().map(Value::Double).map_err(|_| invalid())
    } else {
        token.text.parse::<i64>().map(Value::Integer).map_err(|_| invalid())
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of expression".to_string(),
        TokenKind::String => format!("string '{}'", token.text),
        _ => format!("'{}'", token.text),
    }
}
