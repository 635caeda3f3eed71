//! Facilities for parsing setup scripts.

use super::lex::{Token, TokenLexer, TokenValue};
use super::types::{ParseError, SrcSpan};
use crate::cpu::Register;
use chumsky::{self, IterParser, Parser};

//===========================================================================//

/// The error type used for `chumsky::Parser`s in this module.
type PError<'a> = chumsky::extra::Err<chumsky::error::Rich<'a, Token>>;

fn keyword<'a>(
    word: &'static str,
) -> impl Parser<'a, &'a [Token], Token, PError<'a>> + Clone {
    chumsky::prelude::any()
        .filter(move |token: &Token| {
            if let TokenValue::Identifier(id) = &token.value {
                id.eq_ignore_ascii_case(word)
            } else {
                false
            }
        })
        .labelled(word)
}

fn linebreak<'a>() -> impl Parser<'a, &'a [Token], (), PError<'a>> + Clone {
    symbol(TokenValue::Linebreak).repeated().at_least(1)
}

fn symbol<'a>(
    value: TokenValue,
) -> impl Parser<'a, &'a [Token], Token, PError<'a>> + Clone {
    let name = value.name();
    chumsky::prelude::any()
        .filter(move |token: &Token| token.value == value)
        .labelled(name)
}

//===========================================================================//

/// An integer literal, with its location.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct IntAst {
    span: SrcSpan,
    value: u32,
}

impl IntAst {
    fn parser<'a>() -> impl Parser<'a, &'a [Token], IntAst, PError<'a>> + Clone
    {
        chumsky::prelude::any()
            .try_map(|token: Token, span| {
                if let TokenValue::IntLiteral(value) = token.value {
                    Ok(IntAst { span: token.span, value })
                } else {
                    Err(chumsky::error::Rich::custom(span, ""))
                }
            })
            .labelled("int literal")
    }

    fn to_word(self) -> Result<u16, ParseError> {
        u16::try_from(self.value).map_err(|_| {
            let message = format!("${:X} does not fit in a word", self.value);
            ParseError::new(self.span, message)
        })
    }
}

/// A statement as written, before register names and word values have been
/// checked.
#[derive(Clone, Debug)]
enum RawStmt {
    Assign { name: Token, value: IntAst },
    Mem { keyword: Token, address: IntAst, words: Vec<IntAst> },
    Step { keyword: Token, count: Option<IntAst> },
}

impl RawStmt {
    fn parser<'a>() -> impl Parser<'a, &'a [Token], RawStmt, PError<'a>> + Clone
    {
        let mem = keyword("mem")
            .then(IntAst::parser())
            .then_ignore(symbol(TokenValue::Equals))
            .then(
                IntAst::parser()
                    .separated_by(symbol(TokenValue::Comma))
                    .at_least(1)
                    .collect::<Vec<_>>(),
            )
            .map(|((keyword, address), words)| RawStmt::Mem {
                keyword,
                address,
                words,
            });
        let step = keyword("step")
            .then(IntAst::parser().or_not())
            .map(|(keyword, count)| RawStmt::Step { keyword, count });
        let identifier = chumsky::prelude::any()
            .filter(|token: &Token| {
                matches!(token.value, TokenValue::Identifier(_))
            })
            .labelled("identifier");
        let assign = identifier
            .then_ignore(symbol(TokenValue::Equals))
            .then(IntAst::parser())
            .map(|(name, value)| RawStmt::Assign { name, value });
        chumsky::prelude::choice((mem, step, assign)).then_ignore(linebreak())
    }

    fn check(self) -> Result<ScriptStmt, ParseError> {
        match self {
            RawStmt::Assign { name, value } => {
                let id = match &name.value {
                    TokenValue::Identifier(id) => id.as_str(),
                    _ => "",
                };
                match Register::from_name(id) {
                    Some(register) => Ok(ScriptStmt::SetRegister {
                        span: name.span.merged_with(value.span),
                        register,
                        value: value.value,
                    }),
                    None => Err(ParseError::new(
                        name.span,
                        format!("unknown register: {id}"),
                    )),
                }
            }
            RawStmt::Mem { keyword, address, words } => {
                let span = match words.last() {
                    Some(last) => keyword.span.merged_with(last.span),
                    None => keyword.span.merged_with(address.span),
                };
                let words = words
                    .into_iter()
                    .map(IntAst::to_word)
                    .collect::<Result<Vec<u16>, ParseError>>()?;
                Ok(ScriptStmt::Poke { span, address: address.value, words })
            }
            RawStmt::Step { keyword, count } => match count {
                Some(count) if count.value == 0 => Err(ParseError::new(
                    count.span,
                    "step count must be at least 1".to_string(),
                )),
                Some(count) => Ok(ScriptStmt::Step {
                    span: keyword.span.merged_with(count.span),
                    count: count.value,
                }),
                None => Ok(ScriptStmt::Step { span: keyword.span, count: 1 }),
            },
        }
    }
}

//===========================================================================//

/// One statement in a setup script.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScriptStmt {
    /// `REG = INT`: sets a register.
    SetRegister {
        /// The location of the statement.
        span: SrcSpan,
        /// The register to set.
        register: Register,
        /// The new value.
        value: u32,
    },
    /// `mem ADDR = WORD, ...`: stores big-endian words starting at an
    /// address.
    Poke {
        /// The location of the statement.
        span: SrcSpan,
        /// The address of the first word.
        address: u32,
        /// The words to store.
        words: Vec<u16>,
    },
    /// `step [N]`: runs instructions.
    Step {
        /// The location of the statement.
        span: SrcSpan,
        /// The number of instructions to run.
        count: u32,
    },
}

impl ScriptStmt {
    /// Returns the location of this statement in the script.
    pub fn span(&self) -> SrcSpan {
        match self {
            ScriptStmt::SetRegister { span, .. }
            | ScriptStmt::Poke { span, .. }
            | ScriptStmt::Step { span, .. } => *span,
        }
    }
}

//===========================================================================//

/// The abstract syntax tree for a setup script.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScriptAst {
    /// The statements in this script, in order.
    pub statements: Vec<ScriptStmt>,
}

impl ScriptAst {
    /// Parses a setup script.
    pub fn parse_source(source: &str) -> Result<ScriptAst, Vec<ParseError>> {
        let mut tokens: Vec<Token> = TokenLexer::new(source)
            .collect::<Result<_, _>>()
            .map_err(|error| vec![error])?;
        // Make sure the final statement is terminated.
        if tokens.last().is_some_and(|t| t.value != TokenValue::Linebreak) {
            let end = SrcSpan::from_byte_range(source.len()..source.len());
            tokens.push(Token { span: end, value: TokenValue::Linebreak });
        }
        let raw = symbol(TokenValue::Linebreak)
            .repeated()
            .ignore_then(RawStmt::parser().repeated().collect::<Vec<_>>())
            .parse(tokens.as_slice())
            .into_result()
            .map_err(|errors| {
                errors
                    .into_iter()
                    .map(|error| {
                        let index = error.span().start;
                        let span = if index < tokens.len() {
                            tokens[index].span
                        } else {
                            match tokens.last() {
                                Some(token) => token.span.end_span(),
                                None => SrcSpan::from_byte_range(0..0),
                            }
                        };
                        let message = match error.found() {
                            Some(token) => {
                                format!("unexpected {}", token.value.name())
                            }
                            None => "unexpected end of script".to_string(),
                        };
                        ParseError::new(span, message)
                    })
                    .collect::<Vec<_>>()
            })?;
        let mut statements = Vec::with_capacity(raw.len());
        let mut errors = Vec::new();
        for stmt in raw {
            match stmt.check() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => errors.push(error),
            }
        }
        if errors.is_empty() {
            Ok(ScriptAst { statements })
        } else {
            Err(errors)
        }
    }
}

//===========================================================================//


//===========================================================================//
