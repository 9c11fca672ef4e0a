//! Expression tokenizer

use crate::error::{ExpressionError, ExpressionResult};

/// Kinds of tokens produced by [`tokenize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Number,
    String,
    Boolean,
    Operator,
    LParen,
    RParen,
    Comma,
    Eof,
}

/// A single token with its byte offset in the source expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Check if this is the operator `op`
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }
}

/// Words that tokenize as operators rather than keywords
const WORD_OPERATORS: &[&str] = &["not", "and", "or"];

/// Split an expression into tokens, always ending with an `Eof` token.
///
/// Errors are raised as soon as the offending input is seen, so a malformed
/// identifier fails here even if the parser would never reach it.
pub fn tokenize(input: &str) -> ExpressionResult<Vec<Token>> {
    let mut tokenizer = Tokenizer {
        input,
        chars: input.char_indices().collect(),
        index: 0,
    };

    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }
    tokens.push(Token::new(TokenKind::Eof, "", input.len()));

    Ok(tokens)
}

fn is_keyword_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_keyword_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | '\\')
}

struct Tokenizer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
}

impl<'a> Tokenizer<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        self.chars.get(self.index + 1).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars
            .get(self.index)
            .map(|&(pos, _)| pos)
            .unwrap_or(self.input.len())
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    fn error(&self, position: usize, message: impl Into<String>) -> ExpressionError {
        ExpressionError::Tokenize {
            position,
            message: message.into(),
        }
    }

    fn next_token(&mut self) -> ExpressionResult<Option<Token>> {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }

        let start = self.offset();
        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = match c {
            '0'..='9' => self.scan_number(start),
            '\'' => self.scan_string(start)?,
            c if is_keyword_start(c) => self.scan_keyword(start)?,
            '(' => self.single(TokenKind::LParen, start),
            ')' => self.single(TokenKind::RParen, start),
            ',' => self.single(TokenKind::Comma, start),
            '+' | '-' | '*' | '/' | '%' => self.single(TokenKind::Operator, start),
            '=' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                }
                Token::new(TokenKind::Operator, "=", start)
            }
            '<' => {
                self.bump();
                match self.peek() {
                    Some('>') => {
                        self.bump();
                        Token::new(TokenKind::Operator, "<>", start)
                    }
                    Some('=') => {
                        self.bump();
                        Token::new(TokenKind::Operator, "<=", start)
                    }
                    _ => Token::new(TokenKind::Operator, "<", start),
                }
            }
            '>' => {
                self.bump();
                if self.peek() == Some('=') {
                    self.bump();
                    Token::new(TokenKind::Operator, ">=", start)
                } else {
                    Token::new(TokenKind::Operator, ">", start)
                }
            }
            '!' if self.peek_second() == Some('=') => {
                self.bump();
                self.bump();
                Token::new(TokenKind::Operator, "<>", start)
            }
            ':' if self.peek_second() == Some(':') => {
                self.bump();
                self.bump();
                Token::new(TokenKind::Operator, "::", start)
            }
            other => return Err(self.error(start, format!("unexpected character '{}'", other))),
        };

        Ok(Some(token))
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Token {
        let c = self.bump().unwrap_or_default();
        Token::new(kind, c.to_string(), start)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            text.push(c);
            self.bump();
        }

        // a decimal point only belongs to the number when digits follow it
        if self.peek() == Some('.') && matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) {
            text.push('.');
            self.bump();
            while let Some(c) = self.peek().filter(char::is_ascii_digit) {
                text.push(c);
                self.bump();
            }
        }

        Token::new(TokenKind::Number, text, start)
    }

    fn scan_string(&mut self, start: usize) -> ExpressionResult<Token> {
        self.bump();
        let mut text = String::new();

        loop {
            match self.bump() {
                Some('\'') if self.peek() == Some('\'') => {
                    self.bump();
                    text.push('\'');
                }
                Some('\'') => return Ok(Token::new(TokenKind::String, text, start)),
                Some(c) => text.push(c),
                None => return Err(self.error(start, "unterminated string literal")),
            }
        }
    }

    fn scan_keyword(&mut self, start: usize) -> ExpressionResult<Token> {
        let mut text = String::new();
        while let Some(c) = self.peek().filter(|&c| is_keyword_char(c)) {
            text.push(c);
            self.bump();
        }

        if text.ends_with('.') || text.ends_with('-') {
            return Err(self.error(
                start,
                format!("identifier '{}' cannot end with '.' or '-'", text),
            ));
        }

        let kind = match text.as_str() {
            "true" | "false" => TokenKind::Boolean,
            word if WORD_OPERATORS.contains(&word) => TokenKind::Operator,
            _ => TokenKind::Keyword,
        };

        Ok(Token::new(kind, text, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keyword_spans_whole_input() {
        for input in ["a_d", "a.d", "a-d"] {
            let tokens = tokenize(input).unwrap();
            assert_eq!(tokens.len(), 2, "{input}");
            assert_eq!(tokens[0].kind, TokenKind::Keyword);
            assert_eq!(tokens[0].text, input);
            assert_eq!(tokens[1].kind, TokenKind::Eof);
        }
    }

    #[test]
    fn test_trailing_dot_or_dash_fails_immediately() {
        for input in ["abc-", "abc.", "1 + abc."] {
            assert!(
                matches!(tokenize(input), Err(ExpressionError::Tokenize { .. })),
                "{input}"
            );
        }
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("12 3.25").unwrap();
        assert_eq!(tokens[0].text, "12");
        assert_eq!(tokens[1].text, "3.25");
        assert_eq!(tokens[1].kind, TokenKind::Number);
    }

    #[test]
    fn test_string_with_escaped_quote() {
        let tokens = tokenize("'it''s'").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "it's");
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("'abc").unwrap_err();
        assert_eq!(
            err,
            ExpressionError::Tokenize {
                position: 0,
                message: "unterminated string literal".to_string()
            }
        );
    }

    #[test]
    fn test_operators() {
        let tokens = tokenize("<= >= <> < > = == != + - * / %").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["<=", ">=", "<>", "<", ">", "=", "=", "<>", "+", "-", "*", "/", "%", ""]
        );
    }

    #[test]
    fn test_function_call_tokens() {
        assert_eq!(
            kinds("string::length('x', 1)"),
            vec![
                TokenKind::Keyword,
                TokenKind::Operator,
                TokenKind::Keyword,
                TokenKind::LParen,
                TokenKind::String,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_word_operators_and_booleans() {
        assert_eq!(
            kinds("not true and false or x"),
            vec![
                TokenKind::Operator,
                TokenKind::Boolean,
                TokenKind::Operator,
                TokenKind::Boolean,
                TokenKind::Operator,
                TokenKind::Keyword,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        assert!(matches!(
            tokenize("a # b"),
            Err(ExpressionError::Tokenize { position: 2, .. })
        ));
        assert!(tokenize("a : b").is_err());
    }
}
