use super::types::{ParseError, SrcSpan};
use logos::{self, Logos};

//===========================================================================//

#[derive(Clone, Debug, Default, PartialEq)]
enum LexerError {
    #[default]
    InvalidToken,
    IntOverflow,
}

//===========================================================================//

fn int_literal(
    lexer: &mut logos::Lexer<TokenKind>,
    prefix: usize,
    radix: u32,
) -> Result<u32, LexerError> {
    u32::from_str_radix(&lexer.slice()[prefix..], radix)
        .map_err(|_| LexerError::IntOverflow)
}

fn binary_literal_callback(
    lexer: &mut logos::Lexer<TokenKind>,
) -> Result<u32, LexerError> {
    int_literal(lexer, 1, 2)
}

fn decimal_literal_callback(
    lexer: &mut logos::Lexer<TokenKind>,
) -> Result<u32, LexerError> {
    int_literal(lexer, 0, 10)
}

fn hex_literal_callback(
    lexer: &mut logos::Lexer<TokenKind>,
) -> Result<u32, LexerError> {
    int_literal(lexer, 1, 16)
}

#[derive(Debug, Eq, Logos, PartialEq)]
#[logos(error = LexerError)]
#[logos(skip r"[ \t\r]+")] // whitespace
#[logos(skip r";[^\n]*")] // comments
enum TokenKind {
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,
    #[regex(r"[_A-Za-z][_A-Za-z0-9]*")]
    Identifier,
    #[regex(r"%[01]+", binary_literal_callback)]
    #[regex(r"[0-9]+", decimal_literal_callback)]
    #[regex(r"\$[0-9A-Fa-f]+", hex_literal_callback)]
    IntLiteral(u32),
    #[token("\n")]
    Linebreak,
}

impl TokenKind {
    fn into_token(self, lexer: &logos::Lexer<TokenKind>) -> Token {
        let span = SrcSpan::from_byte_range(lexer.span());
        let value = match self {
            TokenKind::Comma => TokenValue::Comma,
            TokenKind::Equals => TokenValue::Equals,
            TokenKind::Identifier => {
                TokenValue::Identifier(lexer.slice().to_string())
            }
            TokenKind::IntLiteral(int) => TokenValue::IntLiteral(int),
            TokenKind::Linebreak => TokenValue::Linebreak,
        };
        Token { span, value }
    }
}

//===========================================================================//

/// The contents of a single lexical token.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TokenValue {
    /// A "`,`" symbol.
    Comma,
    /// A "`=`" symbol.
    Equals,
    /// An identifier or keyword.
    Identifier(String),
    /// An integer literal.
    IntLiteral(u32),
    /// A linebreak.
    Linebreak,
}

impl TokenValue {
    /// Returns the human-readable name for this kind of token.
    pub fn name(&self) -> &'static str {
        match self {
            TokenValue::Comma => "comma",
            TokenValue::Equals => "equals sign",
            TokenValue::Identifier(_) => "identifier",
            TokenValue::IntLiteral(_) => "int literal",
            TokenValue::Linebreak => "linebreak",
        }
    }
}

//===========================================================================//

/// A single lexical token, including location information.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Token {
    /// The location of the token within the script.
    pub span: SrcSpan,
    /// The contents of the token.
    pub value: TokenValue,
}

//===========================================================================//

/// A lexer for tokenizing a script.
pub struct TokenLexer<'a> {
    lexer: logos::Lexer<'a, TokenKind>,
}

impl<'a> TokenLexer<'a> {
    /// Constructs a new lexer in its initial state.
    pub fn new(source: &'a str) -> TokenLexer<'a> {
        TokenLexer { lexer: TokenKind::lexer(source) }
    }
}

impl Iterator for TokenLexer<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Result<Token, ParseError>> {
        let kind = self.lexer.next()?;
        let span = SrcSpan::from_byte_range(self.lexer.span());
        Some(match kind {
            Ok(kind) => Ok(kind.into_token(&self.lexer)),
            Err(LexerError::InvalidToken) => Err(ParseError::new(
                span,
                format!(
                    "invalid character: {}",
                    self.lexer.slice().escape_default()
                ),
            )),
            Err(LexerError::IntOverflow) => Err(ParseError::new(
                span,
                format!("integer literal too large: {}", self.lexer.slice()),
            )),
        })
    }
}

//===========================================================================//


//===========================================================================//
