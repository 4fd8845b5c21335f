//! C4: the single forward walk that binds label names to byte offsets.

use std::collections::HashMap;

use crate::ast::Node;
use crate::error::{AsmError, Result};
use crate::sizer::instruction_len;

pub type LabelMap = HashMap<String, u16>;

/// Walks `nodes` once, validating and sizing each instruction (C2+C3) and
/// recording label offsets. Forward references are fine: callers resolve
/// against the completed map during the second (encoding) walk.
pub fn resolve_labels(nodes: &[Node]) -> Result<LabelMap> {
    let mut labels = LabelMap::new();
    let mut pc: u16 = 0;

    for node in nodes {
        match node {
            Node::Label { name, line } => {
                if labels.insert(name.clone(), pc).is_some() {
                    return Err(AsmError::DuplicateLabel {
                        line: *line,
                        name: name.clone(),
                    });
                }
            }
            Node::Instruction {
                mnemonic,
                operands,
                line,
            } => {
                let len = instruction_len(*mnemonic, operands, *line)?;
                pc = pc.wrapping_add(len);
            }
        }
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jasm_isa::{OpCode, RegisterId};
    use crate::ast::Operand;

    #[test]
    fn forward_reference_resolves_after_full_walk() {
        let nodes = vec![
            Node::Label { name: "start".into(), line: 1 },
            Node::Instruction {
                mnemonic: OpCode::Move,
                operands: vec![Operand::Register(RegisterId::A), Operand::Number(1)],
                line: 1,
            },
            Node::Instruction {
                mnemonic: OpCode::Jnz,
                operands: vec![Operand::Label("start".into())],
                line: 2,
            },
        ];
        let labels = resolve_labels(&nodes).unwrap();
        assert_eq!(labels["start"], 0);
    }

    #[test]
    fn duplicate_label_is_fatal() {
        let nodes = vec![
            Node::Label { name: "l".into(), line: 1 },
            Node::Label { name: "l".into(), line: 2 },
        ];
        assert!(matches!(
            resolve_labels(&nodes),
            Err(AsmError::DuplicateLabel { .. })
        ));
    }
}
