use m68tick::bus::{RamBus, SimBus};
use m68tick::cpu::flags::{
    FLAG_C, FLAG_N, FLAG_V, FLAG_X, FLAG_Z, SR_MASK, Size, compare,
};
use m68tick::instr::OpcodeTable;
use m68tick::proc::{M68000, SimProc};
use proptest::prelude::*;

//===========================================================================//

fn signed(value: u32, size: Size) -> i64 {
    let value = i64::from(value & size.mask());
    let sign = i64::from(size.sign_bit());
    if value & sign != 0 { value - 2 * sign } else { value }
}

/// Computes compare flags the long way, with wide signed and unsigned
/// arithmetic.
fn reference_flags(size: Size, src: u32, dst: u32) -> u16 {
    let unsigned_src = src & size.mask();
    let unsigned_dst = dst & size.mask();
    let result = unsigned_dst.wrapping_sub(unsigned_src) & size.mask();
    let exact = signed(dst, size) - signed(src, size);
    let mut flags = 0;
    if result & size.sign_bit() != 0 {
        flags |= FLAG_N;
    }
    if result == 0 {
        flags |= FLAG_Z;
    }
    if exact != signed(result, size) {
        flags |= FLAG_V;
    }
    if unsigned_src > unsigned_dst {
        flags |= FLAG_C;
    }
    flags
}

fn size_strategy() -> impl Strategy<Value = Size> {
    prop_oneof![Just(Size::Byte), Just(Size::Word), Just(Size::Long)]
}

proptest! {
    #[test]
    fn compare_matches_wide_arithmetic(
        size in size_strategy(),
        src in any::<u32>(),
        dst in any::<u32>(),
    ) {
        prop_assert_eq!(
            compare(0, size, src, dst),
            reference_flags(size, src, dst)
        );
    }

    #[test]
    fn compare_preserves_extend_and_system_byte(
        size in size_strategy(),
        sr in any::<u16>(),
        src in any::<u32>(),
        dst in any::<u32>(),
    ) {
        let sr = sr & SR_MASK;
        let after = compare(sr, size, src, dst);
        let ccr = FLAG_N | FLAG_Z | FLAG_V | FLAG_C;
        prop_assert_eq!(after & !ccr, sr & !ccr);
        prop_assert_eq!(after & FLAG_X, sr & FLAG_X);
    }

    #[test]
    fn cmp_register_form_leaves_operands_alone(
        src in any::<u32>(),
        dst in any::<u32>(),
    ) {
        let table = OpcodeTable::build();
        let mut bus = RamBus::with_address_bits(8);
        // CMP.L D1,D0
        bus.write_word(0, 0xb081);
        let mut proc = M68000::new(&table);
        proc.set_register("D0", dst);
        proc.set_register("D1", src);
        proc.step(&mut bus).unwrap();
        prop_assert_eq!(proc.get_register("D0"), Some(dst));
        prop_assert_eq!(proc.get_register("D1"), Some(src));
        prop_assert_eq!(
            proc.get_register("CCR"),
            Some(u32::from(reference_flags(Size::Long, src, dst)))
        );
    }

    #[test]
    fn cmpa_word_source_is_sign_extended(
        src in any::<u16>(),
        dst in any::<u32>(),
    ) {
        let table = OpcodeTable::build();
        let mut bus = RamBus::with_address_bits(8);
        // CMPA.W D1,A0
        bus.write_word(0, 0xb0c1);
        let mut proc = M68000::new(&table);
        proc.set_register("A0", dst);
        proc.set_register("D1", 0xabcd_0000 | u32::from(src));
        proc.step(&mut bus).unwrap();
        let extended = src as i16 as i32 as u32;
        prop_assert_eq!(
            proc.get_register("CCR"),
            Some(u32::from(reference_flags(Size::Long, extended, dst)))
        );
    }
}

//===========================================================================//

#[test]
fn overflow_boundaries() {
    assert_eq!(compare(0, Size::Byte, 0x01, 0x80), FLAG_V);
    assert_eq!(compare(0, Size::Byte, 0xff, 0x7f), FLAG_N | FLAG_V | FLAG_C);
    assert_eq!(compare(0, Size::Word, 0x8000, 0x8000), FLAG_Z);
    assert_eq!(
        compare(0, Size::Long, 0x0000_0001, 0x8000_0000),
        FLAG_V
    );
}

//===========================================================================//
