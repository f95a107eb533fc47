
use std::collections::VecDeque;

use crate::buffer::TokenBuffer;
use crate::expr::{parse_expression, Expression, Width};
use crate::lex::{Lexer, TokenKind};
use crate::{AddressingStyle, Instruction, Interner, Mnemonic, Statement};

/// Pull-based statement parser. One `get()` call yields one statement;
/// a single physical line may queue several (`.byte a, b, c`), and a
/// malformed line degrades to one `Statement::Unknown` instead of
/// desynchronizing the stream.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: TokenBuffer<'a>,
    pub si: Interner,
    pending: VecDeque<Statement>,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            tokens: TokenBuffer::new(Lexer::new(src)),
            si: Interner::default(),
            pending: VecDeque::new(),
        }
    }

    /// Next statement; repeatable `Statement::Eof` once input runs out.
    pub fn get(&mut self) -> Statement {
        loop {
            if let Some(statement) = self.pending.pop_front() {
                tracing::trace!(?statement, "statement");
                return statement;
            }
            if !self.parse_line() {
                return Statement::Eof;
            }
        }
    }

    fn parse_line(&mut self) -> bool {
        if self.parse_eof() {
            return false;
        }
        let directive = self.parse_define()
            || self.parse_align()
            || self.parse_data()
            || self.parse_import()
            || self.parse_export();
        if !directive {
            self.parse_label();
            self.parse_instruction();
        }
        if self.parse_eol() {
            return true;
        }
        self.parse_to_eol();
        true
    }

    fn operand(&mut self, width: Width) -> Option<Expression> {
        parse_expression(&mut self.tokens, &mut self.si, width)
    }

    fn parse_eof(&mut self) -> bool {
        self.parse_terminator(TokenKind::Eof)
    }

    fn parse_eol(&mut self) -> bool {
        self.parse_terminator(TokenKind::Eol)
    }

    fn parse_terminator(&mut self, kind: TokenKind) -> bool {
        self.tokens.push_scope();
        if self.tokens.stage().is(kind) {
            self.tokens.accept_scope();
            true
        } else {
            self.tokens.cancel_scope();
            false
        }
    }

    fn parse_label(&mut self) -> bool {
        self.tokens.push_scope();
        let ident = self.tokens.stage();
        if ident.is(TokenKind::Ident) && self.tokens.stage().is_symbol(":") {
            let name = self.si.get_or_intern(ident.text);
            self.pending.push_back(Statement::Label(name));
            self.tokens.accept_scope();
            true
        } else {
            self.tokens.cancel_scope();
            false
        }
    }

    fn commit(&mut self, statement: Option<Statement>) -> bool {
        match statement {
            Some(statement) => {
                self.pending.push_back(statement);
                self.tokens.accept_scope();
                true
            }
            None => {
                self.tokens.cancel_scope();
                false
            }
        }
    }

    fn directive_head(&mut self, name: &str) -> bool {
        self.tokens.stage().is_symbol(".") && self.tokens.stage().is_text(TokenKind::Ident, name)
    }

    fn parse_define(&mut self) -> bool {
        self.tokens.push_scope();
        let statement = self.define();
        self.commit(statement)
    }

    fn define(&mut self) -> Option<Statement> {
        if !self.directive_head("define") {
            return None;
        }
        let name = self.tokens.stage();
        if !name.is(TokenKind::Ident) {
            return None;
        }
        let value = self.operand(Width::Any)?;
        Some(Statement::Define(self.si.get_or_intern(name.text), value))
    }

    fn parse_align(&mut self) -> bool {
        self.tokens.push_scope();
        let statement = self.align();
        self.commit(statement)
    }

    fn align(&mut self) -> Option<Statement> {
        if !self.directive_head("align") {
            return None;
        }
        Some(Statement::Align(self.operand(Width::Any)?))
    }

    fn parse_import(&mut self) -> bool {
        self.tokens.push_scope();
        let statement = self.import();
        self.commit(statement)
    }

    fn import(&mut self) -> Option<Statement> {
        if !self.directive_head("import") {
            return None;
        }
        let name = self.tokens.stage();
        name.is(TokenKind::Ident)
            .then(|| Statement::Import(self.si.get_or_intern(name.text)))
    }

    fn parse_export(&mut self) -> bool {
        self.tokens.push_scope();
        let statement = self.export();
        self.commit(statement)
    }

    fn export(&mut self) -> Option<Statement> {
        if !self.directive_head("export") {
            return None;
        }
        let name = self.tokens.stage();
        name.is(TokenKind::Ident)
            .then(|| Statement::Export(self.si.get_or_intern(name.text)))
    }

    fn parse_data(&mut self) -> bool {
        self.tokens.push_scope();
        match self.data() {
            Some(()) => {
                self.tokens.accept_scope();
                true
            }
            None => {
                self.tokens.cancel_scope();
                false
            }
        }
    }

    // `.byte`/`.word` queue one data statement per element; each comma
    // continuation is its own transaction, so a broken tail leaves the
    // parsed head intact.
    fn data(&mut self) -> Option<()> {
        if !self.tokens.stage().is_symbol(".") {
            return None;
        }
        let head = self.tokens.stage();
        let width = if head.is_text(TokenKind::Ident, "byte") {
            Width::U8
        } else if head.is_text(TokenKind::Ident, "word") {
            Width::U16
        } else {
            return None;
        };
        let first = self.operand(width)?;
        self.pending.push_back(Statement::Data(first));
        loop {
            self.tokens.push_scope();
            if self.tokens.stage().is_symbol(",") {
                if let Some(next) = self.operand(width) {
                    self.pending.push_back(Statement::Data(next));
                    self.tokens.accept_scope();
                    continue;
                }
            }
            self.tokens.cancel_scope();
            break;
        }
        Some(())
    }

    fn parse_instruction(&mut self) -> bool {
        self.tokens.push_scope();
        match self.instruction() {
            Some(instruction) => {
                tracing::trace!(
                    mnemonic = ?instruction.mnemonic,
                    style = ?instruction.style,
                    "instruction"
                );
                self.pending.push_back(Statement::Instruction(instruction));
                self.tokens.accept_scope();
                true
            }
            None => {
                self.tokens.cancel_scope();
                false
            }
        }
    }

    // Addressing grammars in priority order; the first match wins. The
    // attempts share the scope opened by parse_instruction, so each
    // failed sibling rewinds with reset.
    fn instruction(&mut self) -> Option<Instruction> {
        if let Some(found) = self.relative() {
            return Some(found);
        }
        self.tokens.reset();
        if let Some(found) = self.indirect_y() {
            return Some(found);
        }
        self.tokens.reset();
        if let Some(found) = self.indirect_x() {
            return Some(found);
        }
        self.tokens.reset();
        if let Some(found) = self.indirect() {
            return Some(found);
        }
        self.tokens.reset();
        if let Some(found) = self.direct_indexed() {
            return Some(found);
        }
        self.tokens.reset();
        if let Some(found) = self.direct() {
            return Some(found);
        }
        self.tokens.reset();
        if let Some(found) = self.immediate() {
            return Some(found);
        }
        self.tokens.reset();
        self.no_op()
    }

    fn mnemonic(&mut self) -> Option<Mnemonic> {
        let ident = self.tokens.stage();
        ident
            .is(TokenKind::Ident)
            .then(|| Mnemonic::parse(ident.text))
    }

    // IDENT * (+|-) <i8>
    fn relative(&mut self) -> Option<Instruction> {
        let mnemonic = self.mnemonic()?;
        if !self.tokens.stage().is_symbol("*") {
            return None;
        }
        let sign = self.tokens.stage();
        if !sign.is_symbol("+") && !sign.is_symbol("-") {
            return None;
        }
        let mut operand = self.operand(Width::I8)?;
        if sign.is_symbol("-") {
            operand.negate();
        }
        Some(Instruction {
            mnemonic,
            style: AddressingStyle::Relative,
            operand,
        })
    }

    // IDENT ( <u8> ) , Y
    fn indirect_y(&mut self) -> Option<Instruction> {
        let mnemonic = self.mnemonic()?;
        if !self.tokens.stage().is_symbol("(") {
            return None;
        }
        let operand = self.operand(Width::U8)?;
        if !self.tokens.stage().is_symbol(")")
            || !self.tokens.stage().is_symbol(",")
            || !self.tokens.stage().is_keyword("Y")
        {
            return None;
        }
        Some(Instruction {
            mnemonic,
            style: AddressingStyle::IndirectY,
            operand,
        })
    }

    // IDENT ( <u8> , X )
    fn indirect_x(&mut self) -> Option<Instruction> {
        let mnemonic = self.mnemonic()?;
        if !self.tokens.stage().is_symbol("(") {
            return None;
        }
        let operand = self.operand(Width::U8)?;
        if !self.tokens.stage().is_symbol(",")
            || !self.tokens.stage().is_keyword("X")
            || !self.tokens.stage().is_symbol(")")
        {
            return None;
        }
        Some(Instruction {
            mnemonic,
            style: AddressingStyle::IndirectX,
            operand,
        })
    }

    // IDENT ( <u16> )
    fn indirect(&mut self) -> Option<Instruction> {
        let mnemonic = self.mnemonic()?;
        if !self.tokens.stage().is_symbol("(") {
            return None;
        }
        let operand = self.operand(Width::U16)?;
        if !self.tokens.stage().is_symbol(")") {
            return None;
        }
        Some(Instruction {
            mnemonic,
            style: AddressingStyle::Indirect,
            operand,
        })
    }

    // IDENT <operand> , (X|Y)
    fn direct_indexed(&mut self) -> Option<Instruction> {
        let mnemonic = self.mnemonic()?;
        let mut operand = self.operand(Width::Any)?;
        if !self.tokens.stage().is_symbol(",") {
            return None;
        }
        let index = self.tokens.stage();
        let style = if index.is_keyword("X") {
            AddressingStyle::DirectX
        } else if index.is_keyword("Y") {
            AddressingStyle::DirectY
        } else {
            return None;
        };
        classify(&mut operand);
        Some(Instruction {
            mnemonic,
            style,
            operand,
        })
    }

    // IDENT <operand>
    fn direct(&mut self) -> Option<Instruction> {
        let mnemonic = self.mnemonic()?;
        let mut operand = self.operand(Width::Any)?;
        classify(&mut operand);
        Some(Instruction {
            mnemonic,
            style: AddressingStyle::Direct,
            operand,
        })
    }

    // IDENT # <u8>
    fn immediate(&mut self) -> Option<Instruction> {
        let mnemonic = self.mnemonic()?;
        if !self.tokens.stage().is_symbol("#") {
            return None;
        }
        let operand = self.operand(Width::U8)?;
        Some(Instruction {
            mnemonic,
            style: AddressingStyle::Immediate,
            operand,
        })
    }

    // Bare IDENT: implied or accumulator, left undifferentiated.
    fn no_op(&mut self) -> Option<Instruction> {
        let mnemonic = self.mnemonic()?;
        Some(Instruction {
            mnemonic,
            style: AddressingStyle::NoOp,
            operand: Expression::default(),
        })
    }

    fn parse_to_eol(&mut self) -> bool {
        self.tokens.push_scope();
        let mut has_content = false;
        loop {
            let token = self.tokens.stage();
            if token.is(TokenKind::Eol) || token.is_eof() {
                break;
            }
            has_content = true;
        }
        self.tokens.accept_scope();
        if has_content {
            self.pending.push_back(Statement::Unknown);
        }
        has_content
    }
}

// Literal value operands pick zeropage or absolute width right away;
// references and compound expressions wait for symbol resolution.
fn classify(operand: &mut Expression) {
    if let Some(value) = operand.value() {
        operand.width = if Width::U8.holds(value) {
            Width::U8
        } else {
            Width::U16
        };
    }
}

impl Iterator for Parser<'_> {
    type Item = Statement;

    fn next(&mut self) -> Option<Statement> {
        match self.get() {
            Statement::Eof => None,
            statement => Some(statement),
        }
    }
}
