
use crate::lex::{Lexer, Token};

/// Transactional lookahead window over the token stream.
///
/// Scopes form a stack of backtracking choice points: `push_scope` marks
/// one, `cancel_scope` rewinds to it, `reset` rewinds without popping so
/// sibling grammar alternatives can retry, and `accept_scope` commits.
/// Buffer growth is bounded by the deepest open lookahead, never the
/// whole source: committing the outermost scope discards consumed tokens.
///
/// Unbalancing the scope stack is a bug in a grammar rule, not bad user
/// input, and panics.
#[derive(Debug)]
pub struct TokenBuffer<'a> {
    lexer: Lexer<'a>,
    tokens: Vec<Token<'a>>,
    cursor: usize,
    scopes: Vec<usize>,
}

impl<'a> TokenBuffer<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            tokens: Vec::new(),
            cursor: 0,
            scopes: Vec::new(),
        }
    }

    /// Reads the token at the cursor, pulling from the lexer when the
    /// cursor sits at the buffer's end, and advances past it.
    pub fn stage(&mut self) -> Token<'a> {
        if self.cursor == self.tokens.len() {
            let token = self.fetch();
            self.tokens.push(token);
        }
        let token = self.tokens[self.cursor];
        self.cursor += 1;
        token
    }

    /// Pushes back exactly one staged token.
    pub fn unstage(&mut self) {
        let floor = self.scopes.last().copied().unwrap_or(0);
        assert!(
            self.cursor > floor,
            "unstage would cross the innermost scope mark"
        );
        self.cursor -= 1;
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(self.cursor);
    }

    pub fn accept_scope(&mut self) {
        self.scopes
            .pop()
            .expect("accept_scope without an open scope");
        if self.scopes.is_empty() {
            self.accept();
        }
    }

    pub fn cancel_scope(&mut self) {
        let mark = self
            .scopes
            .pop()
            .expect("cancel_scope without an open scope");
        self.cursor = mark;
    }

    /// Rewinds to the innermost mark while keeping the scope open, for
    /// retrying a sibling alternative. Already-lexed tokens stay buffered.
    pub fn reset(&mut self) {
        let mark = *self.scopes.last().expect("reset without an open scope");
        self.cursor = mark;
    }

    /// Commits everything staged so far and compacts the buffer.
    pub fn accept(&mut self) {
        self.tokens.drain(..self.cursor);
        self.cursor = 0;
        self.scopes.clear();
    }

    fn fetch(&mut self) -> Token<'a> {
        loop {
            let token = self.lexer.get();
            if !token.is_trivia {
                return token;
            }
        }
    }
}
