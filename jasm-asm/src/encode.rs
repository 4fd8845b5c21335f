//! C5: the second AST walk, emitting bytes. The authoritative dual of
//! `jasm_isa::decode` — every mode handled here must read back identically
//! through the decoder.

use jasm_isa::{header_byte, Mode, OpCode};

use crate::ast::{Node, Operand};
use crate::error::{AsmError, Result};
use crate::labels::LabelMap;
use crate::shape::resolve_mode;
use crate::source_map::{SourceMap, SourceMapItem};

fn reg_code(operand: &Operand) -> u8 {
    match operand {
        Operand::Register(r) => r.code(),
        _ => unreachable!("shape::resolve_mode already checked operand kinds"),
    }
}

fn number_value(operand: &Operand) -> i64 {
    match operand {
        Operand::Number(n) => *n,
        _ => unreachable!("shape::resolve_mode already checked operand kinds"),
    }
}

fn as_imm8(value: i64, line: u32) -> Result<u8> {
    if (0..=255).contains(&value) {
        Ok(value as u8)
    } else if (-128..=-1).contains(&value) {
        Ok((value + 256) as u8)
    } else {
        Err(AsmError::OutOfRange {
            line,
            value,
            context: "imm8",
            min: -128,
            max: 255,
        })
    }
}

fn as_addr(value: i64, line: u32) -> Result<u16> {
    if (0..=65535).contains(&value) {
        Ok(value as u16)
    } else if (-32768..=-1).contains(&value) {
        Ok((value + 65536) as u16)
    } else {
        Err(AsmError::OutOfRange {
            line,
            value,
            context: "address",
            min: -32768,
            max: 65535,
        })
    }
}

fn resolve_addr(operand: &Operand, labels: &LabelMap, line: u32) -> Result<u16> {
    match operand {
        Operand::Number(n) => as_addr(*n, line),
        Operand::Label(name) => {
            labels
                .get(name)
                .copied()
                .ok_or_else(|| AsmError::UndefinedLabel {
                    line,
                    name: name.clone(),
                })
        }
        _ => unreachable!("shape::resolve_mode already checked operand kinds"),
    }
}

/// Runs pass 2: emits the flat byte image and its parallel source map.
pub fn encode(nodes: &[Node], labels: &LabelMap) -> Result<(Vec<u8>, SourceMap)> {
    let mut bytes = Vec::new();
    let mut source_map = Vec::new();

    for node in nodes {
        let (mnemonic, operands, line) = match node {
            Node::Instruction {
                mnemonic,
                operands,
                line,
            } => (*mnemonic, operands, *line),
            Node::Label { .. } => continue,
        };

        let mode = resolve_mode(mnemonic, operands, line)?;
        let start = bytes.len() as u32;
        bytes.push(header_byte(mnemonic as u8, mode as u8));

        match mode {
            Mode::NoOperands => {}
            Mode::SingleReg => {
                let reg = reg_code(&operands[0]);
                bytes.push(reg << 4);
            }
            Mode::Imm8Only => {
                let imm = as_imm8(number_value(&operands[0]), line)?;
                bytes.push(0);
                bytes.push(imm);
            }
            Mode::RegReg => {
                let dest = reg_code(&operands[0]);
                let src = reg_code(&operands[1]);
                bytes.push((dest << 4) | src);
            }
            Mode::RegImm8 => {
                // Whichever operand is the register supplies the high
                // nibble, whichever is the number supplies the imm byte —
                // OUTB's port-then-source order means that isn't always
                // operand 0 (see DESIGN.md).
                let (reg_operand, imm_operand) = if matches!(operands[0], Operand::Register(_)) {
                    (&operands[0], &operands[1])
                } else {
                    (&operands[1], &operands[0])
                };
                let reg = reg_code(reg_operand);
                let imm = as_imm8(number_value(imm_operand), line)?;
                bytes.push(reg << 4);
                bytes.push(imm);
            }
            Mode::RegAbs16 => {
                let reg = reg_code(&operands[0]);
                let addr = resolve_addr(&operands[1], labels, line)?;
                bytes.push(reg << 4);
                bytes.extend_from_slice(&addr.to_le_bytes());
            }
            Mode::RegPair => {
                // LOAD/STORE give (dest register, pair); JMP and friends
                // give just the pair as their sole operand. Either way
                // only the pair's base register reaches the encoding —
                // see DESIGN.md on the register-pair open question.
                let (dest, base) = match operands.as_slice() {
                    [Operand::Register(d), Operand::RegisterPair(base, _)] => (d.code(), base.code()),
                    [Operand::RegisterPair(base, _)] => (0, base.code()),
                    _ => unreachable!("shape::resolve_mode already checked operand kinds"),
                };
                bytes.push((dest << 4) | base);
            }
            Mode::Abs16Only => {
                let addr = resolve_addr(&operands[0], labels, line)?;
                bytes.push(0);
                bytes.extend_from_slice(&addr.to_le_bytes());
            }
        }

        let byte_len = bytes.len() as u32 - start;
        source_map.push(SourceMapItem {
            start_line: line,
            byte_offset: start,
            byte_len,
        });
    }

    Ok((bytes, source_map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::resolve_labels;
    use jasm_isa::RegisterId;

    #[test]
    fn s1_scenario_matches_spec_bytes() {
        let nodes = vec![
            Node::Instruction {
                mnemonic: OpCode::Move,
                operands: vec![Operand::Register(RegisterId::A), Operand::Number(0x05)],
                line: 1,
            },
            Node::Instruction {
                mnemonic: OpCode::Move,
                operands: vec![Operand::Register(RegisterId::B), Operand::Number(3)],
                line: 2,
            },
            Node::Instruction {
                mnemonic: OpCode::Add,
                operands: vec![Operand::Register(RegisterId::A), Operand::Register(RegisterId::B)],
                line: 3,
            },
            Node::Instruction {
                mnemonic: OpCode::Halt,
                operands: vec![],
                line: 4,
            },
        ];
        let labels = resolve_labels(&nodes).unwrap();
        let (bytes, _) = encode(&nodes, &labels).unwrap();
        assert_eq!(
            bytes,
            vec![0x14, 0x00, 0x05, 0x14, 0x10, 0x03, 0x2B, 0x01, 0xF0]
        );
    }

    #[test]
    fn undefined_label_is_fatal() {
        let nodes = vec![Node::Instruction {
            mnemonic: OpCode::Jmp,
            operands: vec![Operand::Label("nowhere".into())],
            line: 1,
        }];
        let labels = resolve_labels(&nodes).unwrap();
        assert!(matches!(
            encode(&nodes, &labels),
            Err(AsmError::UndefinedLabel { .. })
        ));
    }

    #[test]
    fn negative_imm8_wraps_to_unsigned() {
        let nodes = vec![Node::Instruction {
            mnemonic: OpCode::Move,
            operands: vec![Operand::Register(RegisterId::A), Operand::Number(-1)],
            line: 1,
        }];
        let labels = resolve_labels(&nodes).unwrap();
        let (bytes, _) = encode(&nodes, &labels).unwrap();
        assert_eq!(bytes, vec![0x14, 0x00, 0xFF]);
    }
}
