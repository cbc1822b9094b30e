//! Lexer for the Pascal subset
//!
//! Converts source text into a stream of tokens with byte-offset spans.

use crate::frontend::token::{Token, TokenKind};
use crate::utils::Span;

fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\n'
}

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_alphanum(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// The lexer state
pub struct Lexer<'a> {
    /// Source code as bytes
    source: &'a [u8],
    /// Current position in source
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            source: source.as_bytes(),
            pos: 0,
        }
    }

    /// Get the current byte without advancing
    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    /// Get the byte after the current one without advancing
    fn peek_next(&self) -> Option<u8> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn make_token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, Span::new(start, self.pos))
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if is_space(b) {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a `{...}` comment, consuming through the closing brace.
    /// An unterminated comment runs to the end of input.
    fn skip_comment(&mut self) {
        while let Some(b) = self.peek() {
            self.advance();
            if b == b'}' {
                break;
            }
        }
    }

    /// Read an identifier or reserved word
    fn id(&mut self) -> Token {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_alphanum(b) {
                self.advance();
            } else {
                break;
            }
        }

        // The grammar is ASCII, so the byte slice is valid UTF-8 here.
        let text = std::str::from_utf8(&self.source[start..self.pos])
            .unwrap_or_default()
            .to_string();

        let kind =
            TokenKind::keyword_from_str(&text).unwrap_or(TokenKind::Id(text));
        self.make_token(kind, start)
    }

    /// Read an integer or real literal
    fn number(&mut self) -> Token {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_digit(b) {
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() == Some(b'.') {
            self.advance();
            while let Some(b) = self.peek() {
                if is_digit(b) {
                    self.advance();
                } else {
                    break;
                }
            }
            let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();
            let value = text.parse().unwrap_or(0.0);
            return self.make_token(TokenKind::RealConst(value), start);
        }

        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap_or_default();
        // Literals wider than i64 saturate; arithmetic is f64 at runtime.
        let value = text
            .parse::<i64>()
            .unwrap_or_else(|_| text.parse::<f64>().unwrap_or_default() as i64);
        self.make_token(TokenKind::IntegerConst(value), start)
    }

    /// Get the next token. After a terminal token (EOF or
    /// UNEXPECTED_CHAR) the caller is expected to stop.
    pub fn next_token(&mut self) -> Token {
        loop {
            match self.peek() {
                Some(b) if is_space(b) => {
                    self.skip_whitespace();
                }
                Some(b'{') => {
                    self.skip_comment();
                }
                _ => break,
            }
        }

        let start = self.pos;
        let b = match self.peek() {
            Some(b) => b,
            None => {
                // One-byte span just past the end, so end-of-file
                // highlighting has a visible target.
                return Token::eof(Span::new(self.pos, self.pos + 1));
            }
        };

        if is_alpha(b) {
            return self.id();
        }

        if is_digit(b) {
            return self.number();
        }

        // := needs the only two-character lookahead in the grammar
        if b == b':' && self.peek_next() == Some(b'=') {
            self.advance();
            self.advance();
            return self.make_token(TokenKind::Assign, start);
        }

        let kind = match b {
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Mul,
            b'/' => TokenKind::FloatDiv,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b';' => TokenKind::Semi,
            b'.' => TokenKind::Dot,
            other => {
                // Report the whole scalar, not its leading byte.
                let ch = std::str::from_utf8(&self.source[self.pos..])
                    .ok()
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(other as char);
                self.pos += ch.len_utf8();
                return self.make_token(TokenKind::UnexpectedChar(ch), start);
            }
        };
        self.advance();
        self.make_token(kind, start)
    }

    /// Tokenize the entire source for the token-stream panel.
    /// A trailing UNEXPECTED_CHAR token is kept in the stream so the
    /// panel can show everything lexed before the error.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let terminal = token.is_terminal();
            tokens.push(token);
            if terminal {
                break;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_expression_offsets() {
        let mut lexer = Lexer::new("12 + 3");
        let tokens = lexer.tokenize();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::IntegerConst(12));
        assert_eq!(tokens[0].span, Span::new(0, 2));
        assert_eq!(tokens[1].kind, TokenKind::Plus);
        assert_eq!(tokens[1].span, Span::new(3, 4));
        assert_eq!(tokens[2].kind, TokenKind::IntegerConst(3));
        assert_eq!(tokens[2].span, Span::new(5, 6));
        assert_eq!(tokens[3].kind, TokenKind::Eof);
        assert_eq!(tokens[3].span, Span::new(6, 7));
    }

    #[test]
    fn test_reserved_words() {
        let mut lexer = Lexer::new("PROGRAM VAR PROCEDURE BEGIN END INTEGER REAL DIV");
        let tokens = lexer.tokenize();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Program,
                TokenKind::Var,
                TokenKind::Procedure,
                TokenKind::Begin,
                TokenKind::End,
                TokenKind::Integer,
                TokenKind::Real,
                TokenKind::IntegerDiv,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let mut lexer = Lexer::new("begin");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Id("begin".to_string()));
    }

    #[test]
    fn test_assign_vs_colon() {
        let mut lexer = Lexer::new("x := 1; y : INTEGER");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[1].kind, TokenKind::Assign);
        assert_eq!(tokens[1].span, Span::new(2, 4));
        assert_eq!(tokens[5].kind, TokenKind::Colon);
    }

    #[test]
    fn test_real_const() {
        let mut lexer = Lexer::new("3.14");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::RealConst(3.14));
        assert_eq!(tokens[0].span, Span::new(0, 4));
    }

    #[test]
    fn test_huge_integer_literal_saturates() {
        let mut lexer = Lexer::new("99999999999999999999");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::IntegerConst(i64::MAX));
        assert_eq!(tokens[0].span, Span::new(0, 20));
    }

    #[test]
    fn test_comments_are_skipped() {
        let mut lexer = Lexer::new("1 { a comment } 2");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::IntegerConst(1));
        assert_eq!(tokens[1].kind, TokenKind::IntegerConst(2));
        assert_eq!(tokens[1].span, Span::new(16, 17));
    }

    #[test]
    fn test_unterminated_comment_runs_to_eof() {
        let mut lexer = Lexer::new("1 { no close");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::IntegerConst(1));
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn test_unexpected_char_is_terminal() {
        let mut lexer = Lexer::new("1 ? 2");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::IntegerConst(1));
        assert_eq!(tokens[1].kind, TokenKind::UnexpectedChar('?'));
        assert_eq!(tokens[1].span, Span::new(2, 3));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_non_ascii_unexpected_char_reports_whole_scalar() {
        let mut lexer = Lexer::new("1 é 2");
        let tokens = lexer.tokenize();
        assert_eq!(tokens[0].kind, TokenKind::IntegerConst(1));
        assert_eq!(tokens[1].kind, TokenKind::UnexpectedChar('é'));
        // Two-byte scalar, two-byte span
        assert_eq!(tokens[1].span, Span::new(2, 4));
    }

    #[test]
    fn test_span_round_trip() {
        let source = "PROGRAM p; BEGIN x := 1 + 2.5 END.";
        let mut lexer = Lexer::new(source);
        let lexemes: Vec<&str> = lexer
            .tokenize()
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| &source[t.span.start..t.span.end])
            .collect();
        assert_eq!(
            lexemes,
            vec!["PROGRAM", "p", ";", "BEGIN", "x", ":=", "1", "+", "2.5", "END", "."]
        );
    }
}
