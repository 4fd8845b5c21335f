//! Turns `.asm` source text into the labeled AST (the "external
//! collaborator" spec.md treats as out of scope, concretely implemented
//! here with `pest`, the same crate the teacher uses for `vasm`).

use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use jasm_isa::{OpCode, RegisterId};

use crate::ast::{Node, Operand};
use crate::error::{AsmError, Result};

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct JasmParser;

fn to_asm_error(err: pest::error::Error<Rule>) -> AsmError {
    let line = match err.line_col() {
        LineColLocation::Pos((line, _)) => line as u32,
        LineColLocation::Span((line, _), _) => line as u32,
    };
    AsmError::Parse {
        line,
        message: err.to_string(),
    }
}

fn register_name(pair: &Pair<Rule>, line: u32) -> Result<RegisterId> {
    pair.as_str()
        .parse::<RegisterId>()
        .map_err(|_| AsmError::Parse {
            line,
            message: format!("'{}' is not a register name", pair.as_str()),
        })
}

fn parse_number(text: &str, line: u32) -> Result<i64> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if let Some(bin) = rest.strip_prefix('b').or_else(|| rest.strip_prefix('B')) {
        i64::from_str_radix(bin, 2)
    } else {
        rest.parse::<i64>()
    }
    .map_err(|_| AsmError::Parse {
        line,
        message: format!("'{}' is not a valid number", text),
    })?;
    Ok(if negative { -magnitude } else { magnitude })
}

fn build_operand(operand_pair: Pair<Rule>, line: u32) -> Result<Operand> {
    let pair = operand_pair.into_inner().next().unwrap();
    match pair.as_rule() {
        Rule::register_pair => {
            let mut inner = pair.into_inner();
            let high = register_name(&inner.next().unwrap(), line)?;
            let low = register_name(&inner.next().unwrap(), line)?;
            Ok(Operand::RegisterPair(high, low))
        }
        Rule::register_name => Ok(Operand::Register(register_name(&pair, line)?)),
        Rule::number => Ok(Operand::Number(parse_number(pair.as_str(), line)?)),
        Rule::labelname => Ok(Operand::Label(pair.as_str().to_string())),
        other => unreachable!("grammar only produces operand kinds, got {:?}", other),
    }
}

fn build_instruction(pair: Pair<Rule>, line: u32) -> Result<Node> {
    let mut inner = pair.into_inner();
    let mnemonic_pair = inner.next().unwrap();
    let mnemonic = mnemonic_pair
        .as_str()
        .parse::<OpCode>()
        .map_err(|_| AsmError::UnknownMnemonic {
            line,
            mnemonic: mnemonic_pair.as_str().to_string(),
        })?;
    let operands = inner
        .map(|operand_pair| build_operand(operand_pair, line))
        .collect::<Result<Vec<_>>>()?;
    Ok(Node::Instruction {
        mnemonic,
        operands,
        line,
    })
}

/// Parses a complete program, returning the AST in source order.
pub fn parse(input: &str) -> Result<Vec<Node>> {
    let program = JasmParser::parse(Rule::program, input)
        .map_err(to_asm_error)?
        .next()
        .unwrap();

    let mut nodes = Vec::new();
    for (line_no, line_pair) in program.into_inner().enumerate() {
        let line = line_no as u32 + 1;
        match line_pair.as_rule() {
            Rule::line => {
                // A line may hold a label, an instruction, both (`start:
                // MOVE A, 1`), or neither (blank/comment-only).
                for content in line_pair.into_inner() {
                    match content.as_rule() {
                        Rule::label => {
                            let name = content.into_inner().next().unwrap().as_str().to_string();
                            nodes.push(Node::Label { name, line });
                        }
                        Rule::instruction => nodes.push(build_instruction(content, line)?),
                        other => unreachable!("line only contains label or instruction, got {:?}", other),
                    }
                }
            }
            Rule::EOI => {}
            other => unreachable!("program only contains lines, got {:?}", other),
        }
    }

    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_s1_program() {
        let src = "MOVE A, 0x05\nMOVE B, 3\nADD A, B\nHALT\n";
        let nodes = parse(src).unwrap();
        assert_eq!(nodes.len(), 4);
        assert!(matches!(nodes[0], Node::Instruction { mnemonic: OpCode::Move, .. }));
    }

    #[test]
    fn accepts_mov_alias_and_labels_and_comments() {
        let src = "start: MOV A, 1 ; seed the accumulator\nJNZ start\nHALT\n";
        let nodes = parse(src).unwrap();
        assert_eq!(nodes.len(), 4);
        assert!(matches!(nodes[0], Node::Label { .. }));
        assert!(matches!(nodes[1], Node::Instruction { mnemonic: OpCode::Move, .. }));
    }

    #[test]
    fn unknown_mnemonic_is_reported_with_line() {
        let src = "FROB A, B\n";
        let err = parse(src).unwrap_err();
        assert!(matches!(err, AsmError::UnknownMnemonic { line: 1, .. }));
    }
}
