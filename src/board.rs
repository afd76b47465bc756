//! max10_electron_ula: an Intel Max 10 (10M08SCU169) on a board that plugs
//! into the Acorn Electron's 68-pin ULA socket.
//!
//! The ULA header pins are placeholders until the pinout is settled. The FPGA
//! IOs go to the carrier board connectors (nets `C<connector>_<pin>`).

use crate::footprint::{INTEL_UBGA169, PLCC68_SOCKET};
use crate::passives::{capacitor_bank, r0805, Package};
use crate::{Component, Design, DesignError, Pin};

pub const DESIGN_NAME: &str = "max10_electron_ula";
pub const OUTPUT_FILE: &str = "max10_electron_ula.net";

pub const GND: &str = "GND";
pub const SUPPLY: &str = "3V3";

pub const ULA_PINS: u32 = 68;

/// FPGA IOs and the carrier board net each one reaches
const FPGA_IO: &[(&str, &str)] = &[
    // Outer ring, less G1 which is TMS
    ("A2", "C1_11"),
    ("A3", "C1_9"),
    ("A4", "C1_14"),
    ("A5", "C1_19"),
    ("A6", "C1_17"),
    ("A7", "C1_23"),
    ("A8", "C1_16"),
    ("A9", "C1_20"),
    ("A10", "C1_26"),
    ("A11", "C1_25"),
    ("A12", "C1_30"),
    ("N4", "C4_17"),
    ("N5", "C4_19"),
    ("N6", "C4_24"),
    ("N7", "C4_25"),
    ("N8", "C4_22"),
    ("N9", "C4_28"),
    ("N10", "C4_26"),
    ("N11", "C4_31"),
    ("N12", "C4_36"),
    ("B1", "C1_2"),
    ("C1", "C1_1"),
    ("D1", "C2_1"),
    ("E1", "C2_5"),
    ("F1", "C2_8"),
    ("H1", "C1_3"),
    ("J1", "C4_4"),
    ("K1", "C2_12"),
    ("M1", "C4_12"),
    ("B13", "C1_36"),
    ("C13", "C1_33"),
    ("D13", "C1_37"),
    ("G13", "C3_4"),
    ("H13", "C4_34"),
    ("J13", "C3_10"),
    ("K13", "C4_35"),
    ("L13", "C4_37"),
    ("M13", "C4_39"),
    // Second ring
    ("B2", "C1_6"),
    ("B3", "C1_5"),
    ("B4", "C1_10"),
    ("B5", "C1_13"),
    ("B6", "C1_18"),
    ("B7", "C1_12"),
    ("B10", "C1_24"),
    ("B11", "C1_31"),
    ("M2", "C4_11"),
    ("M3", "C4_13"),
    ("M4", "C4_14"),
    ("M5", "C4_20"),
    ("M7", "C4_21"),
    ("M8", "C4_23"),
    ("M9", "C4_33"),
    ("M10", "C4_27"),
    ("M11", "C4_30"),
    ("M12", "C4_38"),
    // Inner balls
    ("C2", "C2_4"),
    ("H2", "C1_7"),
    ("J2", "C4_7"),
    ("K2", "C4_8"),
    ("L2", "C4_6"),
    ("L3", "C4_10"),
    ("C9", "C1_22"),
    ("C10", "C1_27"),
    ("B12", "C1_29"),
    ("C12", "C1_34"),
    ("D11", "C1_38"),
    ("D12", "C3_3"),
    ("E12", "C3_1"),
    ("F12", "C3_6"),
    ("G12", "C3_8"),
    ("J12", "C3_7"),
    ("K11", "C3_12"),
    ("K12", "C3_9"),
    ("L11", "C3_11"),
    ("L12", "C4_40"),
    ("L10", "C4_32"),
    ("C11", "C1_28"),
    ("E3", "C2_3"),
    ("L5", "C4_18"),
];

/// Clock and dual-purpose inputs: (ball, function, net)
const FPGA_CLOCKS: &[(&str, &str, &str)] = &[
    ("G5", "CLK0n", "CLK0n"),
    ("H6", "CLK0p", "CLK0p"),
    ("H5", "CLK1n", "CLK1n"),
    ("H4", "CLK1p", "CLK1p"),
    ("G10", "CLK2n", "CLK2n"),
    ("G9", "CLK2p", "CLK2p"),
    ("E13", "CLK3n", "C3_2_CLK3n"),
    ("F13", "CLK3p", "C3_5_CLK3p"),
    ("N2", "DPCLK0", "C4_16_DPCLK0"),
    ("N3", "DPCLK1", "C4_15_DPCLK1"),
    ("F10", "DPCLK2", "DPCLK2"),
    ("F9", "DPCLK3", "DPCLK3"),
    ("L1", "VREFB2N0", "C4_3_VREFB2N0"),
];

/// JTAG and configuration pins: (ball, function, net)
const FPGA_CONFIG: &[(&str, &str, &str)] = &[
    ("E5", "JTAGEN", "fpga_JTAGEN"),
    ("G1", "TMS", "fpga_TMS"),
    ("G2", "TCK", "fpga_TCK"),
    ("F5", "TDI", "fpga_TDI"),
    ("F6", "TDO", "fpga_TDO"),
    // High at power-up on the first assembled board
    ("B9", "DEV_CLRn", "fpga_DEV_CLRn"),
    ("D8", "DEV_OE", "fpga_DEV_OE"),
    // Not used by this configuration scheme
    ("D7", "CONFIG_SEL", GND),
    ("E7", "nCONFIG", SUPPLY),
    // Error Detection CRC must be disabled in the project settings
    ("D6", "CRC_ERROR", GND),
    ("C4", "nSTATUS", "fpga_nSTATUS"),
    ("C5", "CONF_DONE", "fpga_CONF_DONE"),
];

/// Balls with no destination yet.
///
/// The first group was kept free for power and ground vias on a two layer
/// board. The second group was never declared by the board's netlist.
const FPGA_UNASSIGNED: &[&str] = &[
    "E4", "J5", "J6", "K10", "E10", "J10", "E8", "H8", "D9", "K7", "K8", "E6", "F8", "G4", "L4",
    // Undeclared
    "E9", "F4", "H3", "H9", "H10", "J7", "J8", "J9", "K5", "K6",
];

/// Power balls: (ball, rail function). `GND` balls go to ground, the rest to 3V3.
const FPGA_POWER: &[(&str, &str)] = &[
    ("D2", "GND"),
    ("E2", "GND"),
    ("N13", "GND"),
    ("N1", "GND"),
    ("M6", "GND"),
    ("L9", "GND"),
    ("J4", "GND"),
    ("H12", "GND"),
    ("G7", "GND"),
    ("F3", "GND"),
    ("E11", "GND"),
    ("D5", "GND"),
    ("C3", "GND"),
    ("B8", "GND"),
    ("A13", "GND"),
    ("A1", "GND"),
    ("F2", "VCCIO1A"),
    ("G3", "VCCIO1B"),
    ("K3", "VCCIO2"),
    ("J3", "VCCIO2"),
    ("L8", "VCCIO3"),
    ("L7", "VCCIO3"),
    ("L6", "VCCIO3"),
    ("J11", "VCCIO5"),
    ("H11", "VCCIO5"),
    ("G11", "VCCIO6"),
    ("F11", "VCCIO6"),
    ("C8", "VCCIO8"),
    ("C7", "VCCIO8"),
    ("C6", "VCCIO8"),
    ("K4", "VCCA1"),
    ("D10", "VCCA2"),
    ("D3", "VCCA3"),
    ("D4", "VCCA3"),
    ("K9", "VCCA4"),
    ("H7", "VCC_ONE"),
    ("G8", "VCC_ONE"),
    ("G6", "VCC_ONE"),
    ("F7", "VCC_ONE"),
];

/// Pin headers that plug into a PGA socket fitted in place of the ULA socket
/// (Issue 4) or ULA carrier board (Issue 6)
pub fn ula_header() -> Component {
    Component::new(PLCC68_SOCKET, "ULA")
        .with_value("ULA header")
        .with_description("Set of pin headers to plug into an Acorn Electron ULA socket")
        .with_pins((1..=ULA_PINS).map(Pin::unassigned))
}

pub fn fpga() -> Component {
    let io = FPGA_IO.iter().map(|&(ball, net)| Pin::new(ball, "", net));
    let named = FPGA_CLOCKS
        .iter()
        .chain(FPGA_CONFIG)
        .map(|&(ball, function, net)| Pin::new(ball, function, net));
    let unassigned = FPGA_UNASSIGNED.iter().map(|&ball| Pin::unassigned(ball));
    let power = FPGA_POWER.iter().map(|&(ball, function)| {
        let net = if function == GND { GND } else { SUPPLY };
        Pin::new(ball, function, net)
    });

    Component::new(INTEL_UBGA169, "FPGA")
        .with_value("10M08SCU169")
        .with_pins(io.chain(named).chain(unassigned).chain(power))
}

/// Pull resistors the FPGA needs to configure, plus decoupling
pub fn support() -> Vec<Component> {
    let mut parts = vec![
        // The chip won't leave configuration unless CONF_DONE can go high
        r0805("10k", "fpga_CONF_DONE", SUPPLY, "R1", false),
        // nSTATUS held low is an error state
        r0805("10k", "fpga_nSTATUS", SUPPLY, "R2", false),
        // Keep TCK quiet with no JTAG adapter attached
        r0805("1-10k", "fpga_TCK", GND, "R3", false),
    ];
    parts.extend(capacitor_bank(Package::C0402, "100n", SUPPLY, GND, 10..24, false));
    parts.extend(capacitor_bank(Package::C0805, "1u", SUPPLY, GND, 8..10, false));
    parts
}

pub fn build() -> Result<Design, DesignError> {
    let mut design = Design::new(DESIGN_NAME);
    design.add(ula_header())?;
    design.add(fpga())?;
    design.add_all(support())?;

    for net in carrier_nets() {
        design.allow_dangling(net);
    }
    Ok(design)
}

/// `C<connector>_<pin>` nets, which continue on the carrier board
fn is_carrier_net(net: &str) -> bool {
    let Some((connector, _)) = net.split_once('_') else {
        return false;
    };
    connector
        .strip_prefix('C')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

fn carrier_nets() -> impl Iterator<Item = &'static str> {
    FPGA_IO
        .iter()
        .map(|&(_, net)| net)
        .chain(FPGA_CLOCKS.iter().map(|&(_, _, net)| net))
        .filter(|net| is_carrier_net(net))
}
