//! The instruction set: the 32 opcodes (C1), the 8 addressing modes, and
//! the per-mnemonic mode table that both the encoder and the decoder treat
//! as the authoritative contract (spec §4.1).

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive as _;

/// One of the 32 five-bit opcodes. Every value 0..31 is assigned, so
/// decoding a header byte can never produce an opcode outside this set —
/// but execution still re-derives `OpCode` from the raw nibble via
/// [`OpCode::from_u8`] rather than trusting the decoder, per spec §4.7
/// ("an unknown opcode must surface at execute time, not decode time").
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum OpCode {
    Load = 0,
    Store = 1,
    Move = 2,
    Push = 3,
    Pop = 4,
    Add = 5,
    Addc = 6,
    Sub = 7,
    Subb = 8,
    Inc = 9,
    Dec = 10,
    Shl = 11,
    Shr = 12,
    And = 13,
    Or = 14,
    Nor = 15,
    Not = 16,
    Xor = 17,
    Inb = 18,
    Outb = 19,
    Cmp = 20,
    Sec = 21,
    Clc = 22,
    Clz = 23,
    Jmp = 24,
    Jz = 25,
    Jnz = 26,
    Jc = 27,
    Jnc = 28,
    Int = 29,
    Halt = 30,
    Nop = 31,
}

impl OpCode {
    pub fn from_u8(value: u8) -> Option<OpCode> {
        num_traits::FromPrimitive::from_u8(value)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Load => "LOAD",
            OpCode::Store => "STORE",
            OpCode::Move => "MOVE",
            OpCode::Push => "PUSH",
            OpCode::Pop => "POP",
            OpCode::Add => "ADD",
            OpCode::Addc => "ADDC",
            OpCode::Sub => "SUB",
            OpCode::Subb => "SUBB",
            OpCode::Inc => "INC",
            OpCode::Dec => "DEC",
            OpCode::Shl => "SHL",
            OpCode::Shr => "SHR",
            OpCode::And => "AND",
            OpCode::Or => "OR",
            OpCode::Nor => "NOR",
            OpCode::Not => "NOT",
            OpCode::Xor => "XOR",
            OpCode::Inb => "INB",
            OpCode::Outb => "OUTB",
            OpCode::Cmp => "CMP",
            OpCode::Sec => "SEC",
            OpCode::Clc => "CLC",
            OpCode::Clz => "CLZ",
            OpCode::Jmp => "JMP",
            OpCode::Jz => "JZ",
            OpCode::Jnz => "JNZ",
            OpCode::Jc => "JC",
            OpCode::Jnc => "JNC",
            OpCode::Int => "INT",
            OpCode::Halt => "HALT",
            OpCode::Nop => "NOP",
        }
    }
}

impl std::str::FromStr for OpCode {
    type Err = ();

    /// Case-insensitive. Accepts `MOV` as an alias of `MOVE`, per the
    /// original grammar (see SPEC_FULL.md, "[SUPPLEMENT] MOV alias").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOAD" => Ok(OpCode::Load),
            "STORE" => Ok(OpCode::Store),
            "MOVE" | "MOV" => Ok(OpCode::Move),
            "PUSH" => Ok(OpCode::Push),
            "POP" => Ok(OpCode::Pop),
            "ADD" => Ok(OpCode::Add),
            "ADDC" => Ok(OpCode::Addc),
            "SUB" => Ok(OpCode::Sub),
            "SUBB" => Ok(OpCode::Subb),
            "INC" => Ok(OpCode::Inc),
            "DEC" => Ok(OpCode::Dec),
            "SHL" => Ok(OpCode::Shl),
            "SHR" => Ok(OpCode::Shr),
            "AND" => Ok(OpCode::And),
            "OR" => Ok(OpCode::Or),
            "NOR" => Ok(OpCode::Nor),
            "NOT" => Ok(OpCode::Not),
            "XOR" => Ok(OpCode::Xor),
            "INB" => Ok(OpCode::Inb),
            "OUTB" => Ok(OpCode::Outb),
            "CMP" => Ok(OpCode::Cmp),
            "SEC" => Ok(OpCode::Sec),
            "CLC" => Ok(OpCode::Clc),
            "CLZ" => Ok(OpCode::Clz),
            "JMP" => Ok(OpCode::Jmp),
            "JZ" => Ok(OpCode::Jz),
            "JNZ" => Ok(OpCode::Jnz),
            "JC" => Ok(OpCode::Jc),
            "JNC" => Ok(OpCode::Jnc),
            "INT" => Ok(OpCode::Int),
            "HALT" => Ok(OpCode::Halt),
            "NOP" => Ok(OpCode::Nop),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// The 3-bit addressing mode selecting the operand layout of an instruction.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum Mode {
    NoOperands = 0,
    SingleReg = 1,
    Imm8Only = 2,
    RegReg = 3,
    RegImm8 = 4,
    RegAbs16 = 5,
    RegPair = 6,
    Abs16Only = 7,
}

impl Mode {
    /// All 8 values of the 3-bit mode field are assigned, so this never
    /// fails — matches spec §4.7: "unknown mode bits are impossible".
    pub fn from_u8(value: u8) -> Mode {
        Mode::from_u8_opt(value).expect("mode field is only 3 bits wide")
    }

    fn from_u8_opt(value: u8) -> Option<Mode> {
        num_traits::FromPrimitive::from_u8(value)
    }

    /// Total encoded length in bytes, header included.
    pub fn encoded_len(self) -> u8 {
        match self {
            Mode::NoOperands => 1,
            Mode::SingleReg => 2,
            Mode::Imm8Only => 3,
            Mode::RegReg => 2,
            Mode::RegImm8 => 3,
            Mode::RegAbs16 => 4,
            Mode::RegPair => 2,
            Mode::Abs16Only => 4,
        }
    }
}

/// The modes a given opcode may legally appear with — the contract shared
/// by the semantic validator, the sizer, the encoder and (defensively) the
/// execution core. See spec §4.1.
pub fn allowed_modes(op: OpCode) -> &'static [Mode] {
    use Mode::*;
    match op {
        OpCode::Load | OpCode::Store => &[RegAbs16, RegPair],
        OpCode::Move => &[RegReg, RegImm8],
        OpCode::Push => &[SingleReg, Imm8Only],
        OpCode::Pop => &[SingleReg],
        OpCode::Add | OpCode::Addc | OpCode::Sub | OpCode::Subb => &[RegReg, RegImm8],
        OpCode::Inc | OpCode::Dec | OpCode::Not => &[SingleReg],
        OpCode::Shl | OpCode::Shr | OpCode::And | OpCode::Or | OpCode::Nor | OpCode::Xor => {
            &[RegReg, RegImm8]
        }
        OpCode::Inb | OpCode::Outb => &[RegReg, RegImm8],
        OpCode::Cmp => &[RegReg, RegImm8],
        OpCode::Sec | OpCode::Clc | OpCode::Clz | OpCode::Nop | OpCode::Halt => &[NoOperands],
        OpCode::Jmp | OpCode::Jz | OpCode::Jnz | OpCode::Jc | OpCode::Jnc => &[RegPair, Abs16Only],
        OpCode::Int => &[Imm8Only],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_opcode_value_round_trips() {
        for v in 0u8..32 {
            let op = OpCode::from_u8(v).expect("all 32 values are assigned");
            assert_eq!(num_traits::ToPrimitive::to_u8(&op).unwrap(), v);
        }
    }

    #[test]
    fn mnemonic_parses_case_insensitively_and_mov_alias() {
        assert_eq!("move".parse::<OpCode>().unwrap(), OpCode::Move);
        assert_eq!("MOV".parse::<OpCode>().unwrap(), OpCode::Move);
        assert_eq!("HaLt".parse::<OpCode>().unwrap(), OpCode::Halt);
        assert!("FROB".parse::<OpCode>().is_err());
    }

    #[test]
    fn mode_covers_all_3_bit_values() {
        for v in 0u8..8 {
            Mode::from_u8(v);
        }
    }
}
