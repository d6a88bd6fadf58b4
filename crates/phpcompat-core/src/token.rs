//! Flat token model and the find-next / find-previous queries sniffs run over it

use serde::Serialize;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Trivia
    Whitespace,
    Comment,
    DocComment,
    OpenTag,
    CloseTag,
    InlineHtml,

    // Literals
    LNumber,
    DNumber,
    True,
    False,
    Null,
    /// Single-quoted string, or double-quoted without interpolation
    ConstantEncapsedString,
    /// Double-quoted string containing `$`
    DoubleQuotedString,
    StartHeredoc,
    Heredoc,
    EndHeredoc,
    StartNowdoc,
    Nowdoc,
    EndNowdoc,

    // Names
    String,
    Variable,
    Function,
    New,
    Const,
    Class,
    Extends,
    Implements,
    Catch,
    Use,
    NsSeparator,

    // Member access
    ObjectOperator,
    NullsafeObjectOperator,
    DoubleColon,

    // Arithmetic
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulus,
    Pow,

    // Bitshift
    ShiftLeft,
    ShiftRight,
    ShiftLeftEqual,
    ShiftRightEqual,

    // Punctuation
    Equal,
    OpenParenthesis,
    CloseParenthesis,
    OpenSquareBracket,
    CloseSquareBracket,
    OpenCurlyBracket,
    CloseCurlyBracket,
    Semicolon,
    Comma,

    Other,
}

impl TokenKind {
    /// Whitespace and comments
    pub const EMPTY: &'static [TokenKind] =
        &[TokenKind::Whitespace, TokenKind::Comment, TokenKind::DocComment];

    pub const ARITHMETIC: &'static [TokenKind] = &[
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Multiply,
        TokenKind::Divide,
        TokenKind::Modulus,
        TokenKind::Pow,
    ];

    pub const STRINGS: &'static [TokenKind] =
        &[TokenKind::ConstantEncapsedString, TokenKind::DoubleQuotedString];

    pub fn is_empty(self) -> bool {
        Self::EMPTY.contains(&self)
    }

    pub fn is_string(self) -> bool {
        Self::STRINGS.contains(&self)
    }

    pub fn is_opener(self) -> bool {
        matches!(
            self,
            TokenKind::OpenParenthesis | TokenKind::OpenSquareBracket | TokenKind::OpenCurlyBracket
        )
    }

    pub fn is_closer(self) -> bool {
        matches!(
            self,
            TokenKind::CloseParenthesis
                | TokenKind::CloseSquareBracket
                | TokenKind::CloseCurlyBracket
        )
    }
}

/// A single token with its literal text and 1-based position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            line: 1,
            column: 1,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

/// Randomly indexable, immutable token sequence
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn kind(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).map(|t| t.kind)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// First index in `[start, end)` whose kind is in `kinds`
    /// (or, with `exclude`, is not in `kinds`).
    pub fn find_next(
        &self,
        kinds: &[TokenKind],
        start: usize,
        end: usize,
        exclude: bool,
    ) -> Option<usize> {
        let end = end.min(self.tokens.len());
        (start..end).find(|&i| kinds.contains(&self.tokens[i].kind) != exclude)
    }

    /// Scan backwards from `start` down to `end` inclusive.
    pub fn find_previous(
        &self,
        kinds: &[TokenKind],
        start: usize,
        end: usize,
        exclude: bool,
    ) -> Option<usize> {
        if self.tokens.is_empty() || start < end {
            return None;
        }
        let start = start.min(self.tokens.len() - 1);
        (end..=start)
            .rev()
            .find(|&i| kinds.contains(&self.tokens[i].kind) != exclude)
    }

    pub fn next_non_empty(&self, start: usize, end: usize) -> Option<usize> {
        self.find_next(TokenKind::EMPTY, start, end, true)
    }

    pub fn previous_non_empty(&self, start: usize) -> Option<usize> {
        self.find_previous(TokenKind::EMPTY, start, 0, true)
    }

    /// Index of the token terminating the expression that begins at `start`:
    /// the first `;` or `,` at depth zero, or a closer with no matching opener.
    /// Returns `len()` when the stream runs out first.
    pub fn find_end_of_statement(&self, start: usize) -> usize {
        let mut depth = 0usize;
        for i in start..self.tokens.len() {
            let kind = self.tokens[i].kind;
            if kind.is_opener() {
                depth += 1;
            } else if kind.is_closer() {
                if depth == 0 {
                    return i;
                }
                depth -= 1;
            } else if depth == 0
                && matches!(
                    kind,
                    TokenKind::Semicolon | TokenKind::Comma | TokenKind::CloseTag
                )
            {
                return i;
            }
        }
        self.tokens.len()
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
