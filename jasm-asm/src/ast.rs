//! The labeled AST that the parser produces and C2/C3/C4/C5 consume.

use jasm_isa::{OpCode, RegisterId};

/// One operand, tagged with the kind the validator matches against the
/// mode table (spec §4.1/§4.2).
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Label(String),
    Number(i64),
    Register(RegisterId),
    RegisterPair(RegisterId, RegisterId),
}

impl Operand {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Operand::Label(_) => "LABELNAME",
            Operand::Number(_) => "NUMBER",
            Operand::Register(_) => "REGISTER",
            Operand::RegisterPair(_, _) => "REGISTER_PAIR",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Label { name: String, line: u32 },
    Instruction {
        mnemonic: OpCode,
        operands: Vec<Operand>,
        line: u32,
    },
}

impl Node {
    pub fn line(&self) -> u32 {
        match self {
            Node::Label { line, .. } => *line,
            Node::Instruction { line, .. } => *line,
        }
    }
}
