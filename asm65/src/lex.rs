
pub mod reader;

use std::mem;

use self::reader::{Character, Reader};

// The keyword set is closed: index register names get their own token
// kind, everything else stays an identifier.
const KEYWORDS: &[&str] = &["X", "Y"];

const SYMBOLS: &str = ".:(),+-#*";

#[derive(Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub from: u32,
    pub to: u32,
}

impl std::fmt::Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.from, self.to)
    }
}

impl Span {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }
    pub fn slice(self, src: &str) -> &str {
        &src[self.from as usize..self.to as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Unknown,
    Eof,
    Eol,
    Whitespace,
    Ident,
    Comment,
    Literal,
    Keyword,
    Symbol,
}

/// Trivia (whitespace, comments) is produced here but filtered out by the
/// token buffer before any grammar sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
    pub whitespace_before: bool,
    pub first_on_line: bool,
    pub is_trivia: bool,
}

impl Token<'_> {
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
    pub fn is_text(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
    pub fn is_symbol(&self, text: &str) -> bool {
        self.is_text(TokenKind::Symbol, text)
    }
    pub fn is_keyword(&self, text: &str) -> bool {
        self.is_text(TokenKind::Keyword, text)
    }
}

#[derive(Debug)]
pub struct Lexer<'a> {
    src: &'a str,
    reader: Reader<'a>,
    current: Character,
    was_whitespace: bool,
    was_eol: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut reader = Reader::new(src);
        let current = reader.get();
        Self {
            src,
            reader,
            current,
            was_whitespace: false,
            was_eol: true,
        }
    }

    pub fn get(&mut self) -> Token<'a> {
        // Flags reflect state captured before scanning.
        let whitespace_before = mem::take(&mut self.was_whitespace);
        let first_on_line = mem::take(&mut self.was_eol);
        let from = self.pos();
        let (mut kind, is_trivia) = self.scan();
        let span = Span::new(from, self.pos());
        let text = span.slice(self.src);
        if kind == TokenKind::Ident && KEYWORDS.contains(&text) {
            kind = TokenKind::Keyword;
        }
        Token {
            kind,
            text,
            span,
            whitespace_before,
            first_on_line,
            is_trivia,
        }
    }

    fn pos(&self) -> u32 {
        if self.current.is_eof() {
            self.src.len() as u32
        } else {
            self.current.offset
        }
    }

    fn bump(&mut self) {
        self.current = self.reader.get();
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while !self.current.is_eof() && predicate(self.current.value) {
            self.bump();
        }
    }

    // Longest match, fixed priority.
    fn scan(&mut self) -> (TokenKind, bool) {
        if is_whitespace(self.current.value) {
            self.eat_while(is_whitespace);
            self.was_whitespace = true;
            return (TokenKind::Whitespace, true);
        }
        if self.current.value == '\r' {
            self.bump();
        }
        if self.current.value == '\n' {
            self.bump();
            self.was_eol = true;
            return (TokenKind::Eol, false);
        }
        if is_ident_start(self.current.value) {
            self.bump();
            self.eat_while(is_ident_continue);
            return (TokenKind::Ident, false);
        }
        if self.current.value == ';' {
            self.bump();
            self.eat_while(|c| c != '\r' && c != '\n');
            return (TokenKind::Comment, true);
        }
        // A lone `0` is not a decimal head; zero is written `$0`.
        if matches!(self.current.value, '1'..='9') {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
            return (TokenKind::Literal, false);
        }
        if self.current.value == '$' {
            self.bump();
            self.eat_while(|c| c.is_ascii_hexdigit());
            return (TokenKind::Literal, false);
        }
        if self.current.value == '%' {
            self.bump();
            self.eat_while(|c| matches!(c, '0' | '1'));
            return (TokenKind::Literal, false);
        }
        if SYMBOLS.contains(self.current.value) {
            self.bump();
            return (TokenKind::Symbol, false);
        }
        if self.current.is_eof() {
            return (TokenKind::Eof, false);
        }
        // Unrecognized content: absorb one run up to the next separator
        // so a garbage sequence surfaces as a single token.
        self.bump();
        self.eat_while(|c| !is_whitespace(c) && c != '\r' && c != '\n');
        (TokenKind::Unknown, false)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
