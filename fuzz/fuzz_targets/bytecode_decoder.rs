#![no_main]

use bcdis_core::OpcodeTable;
use bcdis_disasm::{BytecodeDisassembler, Disassembler, Listing};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte picks the parameter count, the rest is bytecode.
    let parameter_count = (data[0] % 16) as i32;
    let code = &data[1..];

    let disasm = BytecodeDisassembler::new(OpcodeTable::standard())
        .with_parameter_count(parameter_count);

    // Decode single instruction; successful decodes must round-trip
    // through the trusting path.
    if let Ok(insn) = disasm.decode_instruction(code, 0) {
        let (text, size) = disasm.render(code, parameter_count);
        assert_eq!(size, insn.size());
        assert_eq!(text, disasm.render_instruction(&insn));
    }

    // Decode the whole buffer
    let mut offset = 0;
    for result in disasm.disassemble_block(code, 0) {
        match result {
            Ok(insn) => {
                assert_eq!(insn.offset, offset);
                assert!(insn.size() > 0);
                offset += insn.size();
            }
            Err(_) => offset += 1,
        }
    }
    assert_eq!(offset, code.len());

    let _ = Listing::new(&disasm).render(code);
});
