use jasm_asm::assemble;

#[test]
fn s1_move_add_halt() {
    let (bytes, _) = assemble("MOVE A, 0x05\nMOVE B, 3\nADD A, B\nHALT\n").unwrap();
    assert_eq!(
        bytes,
        vec![0x14, 0x00, 0x05, 0x14, 0x10, 0x03, 0x2B, 0x01, 0xF0]
    );
}

#[test]
fn s4_label_round_trip() {
    let (bytes, _) = assemble("start: MOVE A, 1\nJNZ start\nHALT\n").unwrap();
    // MOVE A,1 (3 bytes) then JNZ start -> absolute-16 mode, start=0x0000.
    assert_eq!(bytes[0..3], [0x14, 0x00, 0x01]);
    let jnz_header = bytes[3];
    assert_eq!(jnz_header, (26 << 3) | 7); // JNZ=26, Abs16Only=7
    assert_eq!(&bytes[4..7], &[0x00, 0x00, 0x00]); // filler + LE(0x0000)
}

#[test]
fn s5_outb_then_inb() {
    let (bytes, _) = assemble("MOVE A, 0x42\nOUTB 0x10, A\nINB B, 0x10\nHALT\n").unwrap();
    // OUTB port=imm(0x10), source=A(reg 0): reg nibble 0, imm 0x10.
    assert_eq!(bytes[3..6], [(19 << 3) | 4, 0x00, 0x10]);
}

#[test]
fn s6_push_pop() {
    let (bytes, _) = assemble("MOVE A, 5\nPUSH A\nMOVE A, 0\nPOP A\nHALT\n").unwrap();
    assert_eq!(bytes[3], (3 << 3) | 1); // PUSH=3, SingleReg=1
    assert_eq!(bytes[4], 0x00); // register A in high nibble
}

#[test]
fn duplicate_label_fails_the_build() {
    let err = assemble("a: NOP\na: NOP\n").unwrap_err();
    assert!(matches!(err, jasm_asm::AsmError::DuplicateLabel { .. }));
}

#[test]
fn wrong_operand_count_fails_the_build() {
    let err = assemble("HALT A\n").unwrap_err();
    assert!(matches!(err, jasm_asm::AsmError::WrongOperandCount { .. }));
}

#[test]
fn undefined_label_reference_fails_the_build() {
    let err = assemble("JMP nowhere\n").unwrap_err();
    assert!(matches!(err, jasm_asm::AsmError::UndefinedLabel { .. }));
}

#[test]
fn encode_decode_round_trip_holds_for_every_legal_instruction() {
    let (bytes, _) = assemble(
        "MOVE A, 0x05\n\
         MOVE B, C\n\
         PUSH A\n\
         POP B\n\
         ADD A, B\n\
         CMP A, B\n\
         LOAD A, 0x1234\n\
         STORE A, 0x1234\n\
         OUTB 0x10, A\n\
         INB A, 0x10\n\
         JZ 0x0000\n\
         HALT\n",
    )
    .unwrap();

    let mut mem = jasm_isa::MemoryBus::new();
    mem.load_program(&bytes, 0).unwrap();
    let mut pc = 0u16;
    let mut decoded_len_total = 0usize;
    while (pc as usize) < bytes.len() {
        let before = pc;
        jasm_isa::decode(&mem, &mut pc);
        decoded_len_total += (pc - before) as usize;
    }
    assert_eq!(decoded_len_total, bytes.len());
}
