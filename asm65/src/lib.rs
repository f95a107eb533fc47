//! Front-end for a line-oriented 6502 assembly dialect: turns raw source
//! text into a lazy stream of [`Statement`]s. Symbol resolution, sizing
//! and code emission belong to whatever consumes the stream.

use string_interner::{DefaultBackend, StringInterner};

pub mod buffer;
pub mod expr;
pub mod lex;
pub mod parse;

pub use self::expr::{ExprItem, Expression, Op, Width};
pub use self::parse::Parser;

pub type Symbol = string_interner::DefaultSymbol;
pub type Interner = StringInterner<DefaultBackend>;

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Unknown,
    Eof,
    Instruction(Instruction),
    Label(Symbol),
    Define(Symbol, Expression),
    Align(Expression),
    Data(Expression),
    Import(Symbol),
    Export(Symbol),
}

impl Statement {
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub mnemonic: Mnemonic,
    pub style: AddressingStyle,
    pub operand: Expression,
}

/// Syntactic operand shape. `Direct`/`DirectX`/`DirectY` stay undecided
/// between zeropage and absolute until the operand width is known, and
/// `NoOp` covers both implied and accumulator forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingStyle {
    NoOp,
    Immediate,
    Direct,
    DirectX,
    DirectY,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Unknown,
    ADC, AND, ASL,
    BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS,
    CLC, CLD, CLI, CLV, CMP, CPX, CPY,
    DEC, DEX, DEY,
    EOR,
    INC, INX, INY,
    JMP, JSR,
    LDA, LDX, LDY, LSR,
    NOP,
    ORA,
    PHA, PHP, PLA, PLP,
    ROL, ROR, RTI, RTS,
    SBC, SEC, SED, SEI, STA, STX, STY,
    TAX, TAY, TSX, TXA, TXS, TYA,
}

impl Mnemonic {
    /// Unrecognized spellings parse to `Unknown`; rejecting them is a
    /// later phase's call.
    pub fn parse(content: &str) -> Self {
        use Mnemonic::*;
        match content {
            "ADC" => ADC, "AND" => AND, "ASL" => ASL,
            "BCC" => BCC, "BCS" => BCS, "BEQ" => BEQ, "BIT" => BIT,
            "BMI" => BMI, "BNE" => BNE, "BPL" => BPL, "BRK" => BRK,
            "BVC" => BVC, "BVS" => BVS,
            "CLC" => CLC, "CLD" => CLD, "CLI" => CLI, "CLV" => CLV,
            "CMP" => CMP, "CPX" => CPX, "CPY" => CPY,
            "DEC" => DEC, "DEX" => DEX, "DEY" => DEY,
            "EOR" => EOR,
            "INC" => INC, "INX" => INX, "INY" => INY,
            "JMP" => JMP, "JSR" => JSR,
            "LDA" => LDA, "LDX" => LDX, "LDY" => LDY, "LSR" => LSR,
            "NOP" => NOP,
            "ORA" => ORA,
            "PHA" => PHA, "PHP" => PHP, "PLA" => PLA, "PLP" => PLP,
            "ROL" => ROL, "ROR" => ROR, "RTI" => RTI, "RTS" => RTS,
            "SBC" => SBC, "SEC" => SEC, "SED" => SED, "SEI" => SEI,
            "STA" => STA, "STX" => STX, "STY" => STY,
            "TAX" => TAX, "TAY" => TAY, "TSX" => TSX, "TXA" => TXA,
            "TXS" => TXS, "TYA" => TYA,
            _ => Unknown,
        }
    }

    /// Whether a bare mnemonic means accumulator rather than implied.
    pub fn accumulator_capable(self) -> bool {
        matches!(self, Self::ASL | Self::LSR | Self::ROL | Self::ROR)
    }

    pub fn is_branch(self) -> bool {
        use Mnemonic::*;
        matches!(self, BCC | BCS | BEQ | BMI | BNE | BPL | BVC | BVS)
    }
}
