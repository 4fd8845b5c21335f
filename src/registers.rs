//! General-purpose registers, the reserved-name register codes, and the
//! flags/status bytes.

use num_derive::{FromPrimitive, ToPrimitive};

use crate::constants::{FLAG_C, FLAG_N, FLAG_V, FLAG_Z, GPR_COUNT};

/// All register names the lexer accepts as a `REGISTER` token, per spec §6.
/// Codes 0..5 are the real general-purpose registers; codes 6..11 are the
/// reserved special-register names, which decode to zero on read and
/// discard on write like any other reserved code (6..15).
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum RegisterId {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    X = 4,
    Y = 5,
    Sp = 6,
    Pc = 7,
    Z = 8,
    F = 9,
    Mb = 10,
    Sts = 11,
}

impl RegisterId {
    pub fn code(self) -> u8 {
        num_traits::ToPrimitive::to_u8(&self).unwrap()
    }
}

impl std::str::FromStr for RegisterId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(RegisterId::A),
            "B" => Ok(RegisterId::B),
            "C" => Ok(RegisterId::C),
            "D" => Ok(RegisterId::D),
            "X" => Ok(RegisterId::X),
            "Y" => Ok(RegisterId::Y),
            "SP" => Ok(RegisterId::Sp),
            "PC" => Ok(RegisterId::Pc),
            "Z" => Ok(RegisterId::Z),
            "F" => Ok(RegisterId::F),
            "MB" => Ok(RegisterId::Mb),
            "STS" => Ok(RegisterId::Sts),
            _ => Err(()),
        }
    }
}

/// Maps a 4-bit register code to a GPR index, or `None` for a reserved code.
#[inline]
pub fn gpr_index(code: u8) -> Option<usize> {
    if (code as usize) < GPR_COUNT {
        Some(code as usize)
    } else {
        None
    }
}

/// The six 8-bit general-purpose registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u8; GPR_COUNT],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads register `code` (0..15). Reserved codes (6..15) always read zero.
    pub fn read(&self, code: u8) -> u8 {
        gpr_index(code).map(|i| self.regs[i]).unwrap_or(0)
    }

    /// Writes register `code`. Writes to reserved codes are discarded.
    pub fn write(&mut self, code: u8, value: u8) {
        if let Some(i) = gpr_index(code) {
            self.regs[i] = value;
        }
    }

    pub fn get(&self, id: RegisterId) -> u8 {
        self.read(id.code())
    }

    pub fn set(&mut self, id: RegisterId, value: u8) {
        self.write(id.code(), value);
    }
}

/// The flags byte: carry/borrow, zero, negative, signed overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Flags(pub u8);

impl Flags {
    pub fn get(&self, bit: u8) -> bool {
        (self.0 >> bit) & 1 != 0
    }

    pub fn set(&mut self, bit: u8, value: bool) {
        if value {
            self.0 |= 1 << bit;
        } else {
            self.0 &= !(1 << bit);
        }
    }

    pub fn carry(&self) -> bool {
        self.get(FLAG_C)
    }

    pub fn zero(&self) -> bool {
        self.get(FLAG_Z)
    }

    pub fn negative(&self) -> bool {
        self.get(FLAG_N)
    }

    pub fn overflow(&self) -> bool {
        self.get(FLAG_V)
    }

    /// Updates Z and N from an 8-bit result, leaving C and V untouched.
    pub fn update_zn(&mut self, result: u8) {
        self.set(FLAG_Z, result == 0);
        self.set(FLAG_N, result & 0x80 != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_codes_read_zero_and_discard_writes() {
        let mut regs = RegisterFile::new();
        regs.write(0, 0xAB);
        assert_eq!(regs.read(0), 0xAB);

        regs.write(9, 0xFF);
        assert_eq!(regs.read(9), 0);
        assert_eq!(regs.read(15), 0);
    }

    #[test]
    fn flags_update_zn() {
        let mut f = Flags::default();
        f.set(FLAG_C, true);
        f.update_zn(0);
        assert!(f.zero());
        assert!(!f.negative());
        assert!(f.carry());

        f.update_zn(0x80);
        assert!(!f.zero());
        assert!(f.negative());
    }

    #[test]
    fn register_id_from_str_is_case_insensitive() {
        assert_eq!("a".parse::<RegisterId>().unwrap(), RegisterId::A);
        assert_eq!("sp".parse::<RegisterId>().unwrap(), RegisterId::Sp);
        assert!("Q".parse::<RegisterId>().is_err());
    }
}
