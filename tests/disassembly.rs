use m68tick::bus::{RamBus, SimBus};
use m68tick::dis::disassemble;
use m68tick::instr::OpcodeTable;

//===========================================================================//

fn dis(table: &OpcodeTable, words: &[u16]) -> (String, u32) {
    let mut bus = RamBus::with_address_bits(12);
    for (index, &word) in words.iter().enumerate() {
        bus.write_word(0x100 + 2 * index as u32, word);
    }
    let dis = disassemble(table, &bus, 0x100);
    (dis.to_string(), dis.size)
}

#[test]
fn compare_family_golden_table() {
    let table = OpcodeTable::build();
    let cases: &[(&[u16], &str, u32)] = &[
        (&[0xb607], "CMP.B D7,D3", 2),
        (&[0xb6a0], "CMP.L -(A0),D3", 2),
        (&[0xb049], "CMP.W A1,D0", 2),
        (&[0xb058], "CMP.W (A0)+,D0", 2),
        (&[0xb068, 0xfffe], "CMP.W -$2(A0),D0", 4),
        (&[0xb070, 0x1804], "CMP.W $4(A0,D1.L),D0", 4),
        (&[0xb078, 0x1234], "CMP.W $1234.W,D0", 4),
        (&[0xb0b9, 0x00ff, 0x0000], "CMP.L $00FF0000.L,D0", 6),
        (&[0xb07a, 0x0010], "CMP.W $10(PC),D0", 4),
        (&[0xb07b, 0xa0f0], "CMP.W -$10(PC,A2.W),D0", 4),
        (&[0xb03c, 0x0042], "CMP.B #$42,D0", 4),
        (&[0xb0bc, 0xdead, 0xbeef], "CMP.L #$DEADBEEF,D0", 6),
        (&[0xb2c8], "CMPA.W A0,A1", 2),
        (&[0xbfd0], "CMPA.L (A0),A7", 2),
        (&[0xb0fc, 0x8000], "CMPA.W #$8000,A0", 4),
        (&[0x0c00, 0x0012], "CMPI.B #$12,D0", 4),
        (&[0x0c50, 0xbeef], "CMPI.W #$BEEF,(A0)", 4),
        (&[0x0c80, 0x0001, 0x0002], "CMPI.L #$00010002,D0", 6),
        (&[0x0ca8, 0x1111, 0x2222, 0x0008], "CMPI.L #$11112222,$8(A0)", 8),
        (&[0xb308], "CMPM.B (A0)+,(A1)+", 2),
        (&[0xbf4e], "CMPM.W (A6)+,(A7)+", 2),
        (&[0xb18f], "CMPM.L (A7)+,(A0)+", 2),
    ];
    for &(words, text, size) in cases {
        let expected = (text.to_string(), size);
        assert_eq!(dis(&table, words), expected, "{words:04X?}");
    }
}

#[test]
fn illegal_forms_are_data_words() {
    let table = OpcodeTable::build();
    // CMP.B A0,D0 does not exist.
    assert_eq!(dis(&table, &[0xb008]), ("DC.W $B008".to_string(), 2));
    // Reserved EA encoding.
    assert_eq!(dis(&table, &[0xb03d]), ("DC.W $B03D".to_string(), 2));
    // CMPI to a PC-relative destination.
    assert_eq!(dis(&table, &[0x0c7a, 0x0000]), ("DC.W $0C7A".to_string(), 2));
    assert_eq!(dis(&table, &[0x4e71]), ("DC.W $4E71".to_string(), 2));
}

#[test]
fn every_legal_opcode_has_a_listing() {
    let table = OpcodeTable::build();
    for opcode in 0..=u16::MAX {
        let (text, size) = dis(&table, &[opcode]);
        if table.is_legal(opcode) {
            assert!(text.starts_with("CMP"), "${opcode:04X}: {text}");
            assert!((2..=10).contains(&size), "${opcode:04X}: {size}");
        } else {
            assert_eq!(text, format!("DC.W ${opcode:04X}"));
        }
    }
}

//===========================================================================//
