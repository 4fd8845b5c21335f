//! Two-pass assembler for JASM source (C2-C5), plus a pest-derived parser
//! that turns source text into the labeled AST spec.md treats as an
//! external collaborator.

pub mod ast;
pub mod encode;
pub mod error;
pub mod labels;
mod parser;
pub mod shape;
pub mod sizer;
pub mod source_map;

pub use error::{AsmError, Result};
pub use source_map::{write_source_map, SourceMap, SourceMapItem};

/// Runs the full pipeline: parse, resolve labels (C4, which also runs C2/C3
/// on every instruction), then encode (C5).
pub fn assemble(source: &str) -> Result<(Vec<u8>, SourceMap)> {
    let nodes = parser::parse(source)?;
    let labels = labels::resolve_labels(&nodes)?;
    encode::encode(&nodes, &labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_end_to_end() {
        let (bytes, _) = assemble("MOVE A, 0x05\nMOVE B, 3\nADD A, B\nHALT\n").unwrap();
        assert_eq!(
            bytes,
            vec![0x14, 0x00, 0x05, 0x14, 0x10, 0x03, 0x2B, 0x01, 0xF0]
        );
    }
}
