//! Token stream construction on top of the `mago-syntax` lexer
//!
//! mago's PHP tokens are folded onto the smaller [`TokenKind`] set the sniffs
//! query: interpolated strings and heredoc bodies collapse into one token
//! each, and qualified names are split at `\`. When mago reports a lexical
//! error the unscanned rest becomes a single [`TokenKind::Other`], so
//! tokenizing never fails and the token contents always add up to the input.

use crate::token::{Token, TokenKind, TokenStream};
use mago_database::file::FileId;
use mago_syntax::lexer::Lexer;
use mago_syntax::settings::LexerSettings;
use mago_syntax::token::TokenKind as PhpKind;
use mago_syntax_core::input::Input;

/// Prepended to snippets so mago starts in scripting mode
const SNIPPET_PREFIX: &str = "<?php ";

/// Tokenize a complete PHP file (starts in inline HTML until `<?php`)
pub fn tokenize(source: &str) -> TokenStream {
    StreamBuilder::new(source, 0).build()
}

/// Tokenize a code fragment as if it were already inside `<?php`
pub fn tokenize_snippet(source: &str) -> TokenStream {
    let wrapped = format!("{}{}", SNIPPET_PREFIX, source);
    StreamBuilder::new(&wrapped, SNIPPET_PREFIX.len()).build()
}

struct RawToken {
    kind: PhpKind,
    start: usize,
    end: usize,
}

/// Run mago's lexer to the end of input or the first error
fn lex(source: &str) -> Vec<RawToken> {
    let input = Input::new(FileId::new("phpcompat.php"), source.as_bytes());
    let mut lexer = Lexer::new(input, LexerSettings::default());
    let mut raw = Vec::new();

    while let Some(result) = lexer.advance() {
        let Ok(token) = result else { break };
        raw.push(RawToken {
            kind: token.kind,
            start: token.span.start.offset as usize,
            end: token.span.end.offset as usize,
        });
    }

    raw
}

struct StreamBuilder<'s> {
    source: &'s str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'s> StreamBuilder<'s> {
    /// Tokens are produced for `source[start..]`; positions count from there
    fn new(source: &'s str, start: usize) -> Self {
        Self {
            source,
            pos: start,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn build(mut self) -> TokenStream {
        let raw = lex(self.source);
        let mut i = 0;

        while i < raw.len() {
            let token = &raw[i];
            if token.end <= self.pos {
                i += 1;
                continue;
            }
            self.emit(TokenKind::Other, token.start);

            match &token.kind {
                PhpKind::DoubleQuote => {
                    i = self.emit_enclosed(&raw, i, TokenKind::DoubleQuotedString, |k| {
                        matches!(k, PhpKind::DoubleQuote)
                    });
                }
                PhpKind::Backtick => {
                    i = self.emit_enclosed(&raw, i, TokenKind::Other, |k| {
                        matches!(k, PhpKind::Backtick)
                    });
                }
                PhpKind::DocumentStart(_) => {
                    i = self.emit_document(&raw, i);
                }
                PhpKind::QualifiedIdentifier | PhpKind::FullyQualifiedIdentifier => {
                    self.emit_qualified(token.end);
                    i += 1;
                }
                kind => {
                    self.emit(map_kind(kind), token.end);
                    i += 1;
                }
            }
        }

        self.emit(TokenKind::Other, self.source.len());
        TokenStream::new(self.tokens)
    }

    /// Emit `source[pos..end]` as one token; empty ranges emit nothing
    fn emit(&mut self, kind: TokenKind, end: usize) {
        let end = char_boundary(self.source, end);
        if end <= self.pos {
            return;
        }
        let content = &self.source[self.pos..end];
        self.tokens
            .push(Token::new(kind, content).at(self.line, self.column));
        for ch in content.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    /// Collapse an opener, its parts and the matching closer into one token.
    /// Returns the index after the closer.
    fn emit_enclosed(
        &mut self,
        raw: &[RawToken],
        open: usize,
        kind: TokenKind,
        is_close: impl Fn(&PhpKind) -> bool,
    ) -> usize {
        match (open + 1..raw.len()).find(|&j| is_close(&raw[j].kind)) {
            Some(close) => {
                self.emit(kind, raw[close].end);
                close + 1
            }
            None => {
                self.emit(kind, self.source.len());
                raw.len()
            }
        }
    }

    /// Heredoc/nowdoc: opener, one body token, closer
    fn emit_document(&mut self, raw: &[RawToken], open: usize) -> usize {
        let opener = &raw[open];
        let is_nowdoc = self
            .source
            .get(opener.start..opener.end)
            .is_some_and(|s| s.contains('\''));
        let (start_kind, body_kind, end_kind) = if is_nowdoc {
            (TokenKind::StartNowdoc, TokenKind::Nowdoc, TokenKind::EndNowdoc)
        } else {
            (TokenKind::StartHeredoc, TokenKind::Heredoc, TokenKind::EndHeredoc)
        };

        self.emit(start_kind, opener.end);
        let close = (open + 1..raw.len()).find(|&j| matches!(raw[j].kind, PhpKind::DocumentEnd));
        match close {
            Some(close) => {
                self.emit(body_kind, raw[close].start);
                self.emit(end_kind, raw[close].end);
                close + 1
            }
            None => {
                self.emit(body_kind, self.source.len());
                raw.len()
            }
        }
    }

    /// `Foo\Bar` and `\Foo` as name and separator tokens
    fn emit_qualified(&mut self, end: usize) {
        while self.pos < end {
            let rest = &self.source[self.pos..char_boundary(self.source, end)];
            if rest.starts_with('\\') {
                self.emit(TokenKind::NsSeparator, self.pos + 1);
            } else {
                let len = rest.find('\\').unwrap_or(rest.len());
                self.emit(TokenKind::String, self.pos + len);
            }
        }
    }
}

/// Smallest char boundary at or after `index`, clamped to the source
fn char_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index += 1;
    }
    index
}

fn map_kind(kind: &PhpKind) -> TokenKind {
    match kind {
        PhpKind::Whitespace => TokenKind::Whitespace,
        PhpKind::SingleLineComment | PhpKind::HashComment | PhpKind::MultiLineComment => {
            TokenKind::Comment
        }
        PhpKind::DocBlockComment => TokenKind::DocComment,
        PhpKind::OpenTag | PhpKind::EchoTag => TokenKind::OpenTag,
        PhpKind::CloseTag => TokenKind::CloseTag,
        PhpKind::InlineText => TokenKind::InlineHtml,

        PhpKind::LiteralInteger => TokenKind::LNumber,
        PhpKind::LiteralFloat => TokenKind::DNumber,
        PhpKind::LiteralString => TokenKind::ConstantEncapsedString,
        PhpKind::True => TokenKind::True,
        PhpKind::False => TokenKind::False,
        PhpKind::Null => TokenKind::Null,

        PhpKind::Identifier => TokenKind::String,
        PhpKind::Variable => TokenKind::Variable,
        PhpKind::Function => TokenKind::Function,
        PhpKind::New => TokenKind::New,
        PhpKind::Const => TokenKind::Const,
        PhpKind::Class => TokenKind::Class,
        PhpKind::Extends => TokenKind::Extends,
        PhpKind::Implements => TokenKind::Implements,
        PhpKind::Catch => TokenKind::Catch,
        PhpKind::Use => TokenKind::Use,
        PhpKind::NamespaceSeparator => TokenKind::NsSeparator,

        PhpKind::MinusGreaterThan => TokenKind::ObjectOperator,
        PhpKind::QuestionMinusGreaterThan => TokenKind::NullsafeObjectOperator,
        PhpKind::ColonColon => TokenKind::DoubleColon,

        PhpKind::Plus => TokenKind::Plus,
        PhpKind::Minus => TokenKind::Minus,
        PhpKind::Asterisk => TokenKind::Multiply,
        PhpKind::Slash => TokenKind::Divide,
        PhpKind::Percent => TokenKind::Modulus,
        PhpKind::AsteriskAsterisk => TokenKind::Pow,

        PhpKind::LeftShift => TokenKind::ShiftLeft,
        PhpKind::RightShift => TokenKind::ShiftRight,
        PhpKind::LeftShiftEqual => TokenKind::ShiftLeftEqual,
        PhpKind::RightShiftEqual => TokenKind::ShiftRightEqual,

        PhpKind::Equal => TokenKind::Equal,
        PhpKind::LeftParenthesis => TokenKind::OpenParenthesis,
        PhpKind::RightParenthesis => TokenKind::CloseParenthesis,
        PhpKind::LeftBracket => TokenKind::OpenSquareBracket,
        PhpKind::RightBracket => TokenKind::CloseSquareBracket,
        PhpKind::LeftBrace => TokenKind::OpenCurlyBracket,
        PhpKind::RightBrace => TokenKind::CloseCurlyBracket,
        PhpKind::Semicolon => TokenKind::Semicolon,
        PhpKind::Comma => TokenKind::Comma,

        _ => TokenKind::Other,
    }
}
