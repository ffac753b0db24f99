//! Iomux (pin-function multiplexer) programming.
//!
//! Each pad's function-select field is written with the RK3288
//! "write-enable-in-high-half" convention: `(reg | (field_mask << 16)) &
//! !field_mask` clears the field to `0` (GPIO function) while gating the
//! write so only that field's bits commit. See SPEC_FULL.md §6.3.

use crate::pin::LogicalPin;
use crate::regs::RegisterMapper;

/// Which register block a pin's iomux field lives in.
enum IomuxArea {
    Pmu,
    Grf,
}

struct IomuxField {
    area: IomuxArea,
    reg_word: usize,
    /// bit width of one pin's field within the register (2 or 4)
    field_width: u32,
    /// bit position of this pin's field, already resolved from `pin % 8`
    /// (or `pin % 8 - 4` for the 4-bit-wide "high" half registers)
    field_shift: u32,
}

const fn words(byte_offset: usize) -> usize {
    byte_offset / 4
}

/// Resolve the iomux field for one of the pins this core uses. Pins with
/// no table entry are assumed to already be routed as GPIO (true for every
/// pin in [`crate::hardware::HardwareMapping::default`]) and are left
/// untouched.
fn lookup(pin: LogicalPin) -> Option<IomuxField> {
    use crate::hardware::rk3288_pins as p;

    let field2 = |reg_word, pin: LogicalPin| IomuxField {
        area: IomuxArea::Grf,
        reg_word,
        field_width: 2,
        field_shift: (pin % 8) * 2,
    };

    Some(match pin {
        p::GPIO0_C1 => IomuxField {
            area: IomuxArea::Pmu,
            reg_word: words(0x008C),
            field_width: 2,
            field_shift: (pin % 8) * 2,
        },
        p::GPIO5_B0..=p::GPIO5_B7 => field2(words(0x0050), pin),
        p::GPIO5_C0..=p::GPIO5_C3 => field2(words(0x0054), pin),
        p::GPIO6_A0 | p::GPIO6_A3 | p::GPIO6_A4 => field2(words(0x005C), pin),
        p::GPIO7_A0..=p::GPIO7_A7 => field2(words(0x006C), pin),
        p::GPIO7_B0..=p::GPIO7_B2 => field2(words(0x0070), pin),
        p::GPIO7_C1 | p::GPIO7_C2 => IomuxField {
            area: IomuxArea::Grf,
            reg_word: words(0x0074),
            field_width: 4,
            field_shift: (pin % 8) * 4,
        },
        p::GPIO7_C6 | p::GPIO7_C7 => IomuxField {
            area: IomuxArea::Grf,
            reg_word: words(0x0078),
            field_width: 4,
            field_shift: (pin % 8 - 4) * 4,
        },
        p::GPIO8_A3..=p::GPIO8_A7 => field2(words(0x0080), pin),
        p::GPIO8_B0 | p::GPIO8_B1 => field2(words(0x0084), pin),
        _ => return None,
    })
}

/// Program `pin`'s pad as plain GPIO (function select `0`).
pub fn route_as_gpio(regs: &RegisterMapper, pin: LogicalPin) {
    let Some(field) = lookup(pin) else { return };
    let field_mask = ((1u32 << field.field_width) - 1) << field.field_shift;
    let region = match field.area {
        IomuxArea::Pmu => &regs.pmu,
        IomuxArea::Grf => &regs.grf,
    };
    let old = region.read(field.reg_word);
    let new = (old | (field_mask << 16)) & !field_mask;
    region.write(field.reg_word, new);
}
