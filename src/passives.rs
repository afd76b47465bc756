//! Two-pin resistors and capacitors wired between two nets.

use std::ops::Range;

use crate::{Component, PinId};

/// Surface mount package of a two-pin passive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Package {
    R0805,
    C0805,
    C0402,
}

impl Package {
    pub const ALL: [Package; 3] = [Package::R0805, Package::C0805, Package::C0402];

    /// KiCad footprint name. 0402 has no hand soldering variant.
    pub fn footprint(self, hand_soldering: bool) -> &'static str {
        match (self, hand_soldering) {
            (Package::R0805, false) => "Resistor_SMD:R_0805_2012Metric",
            (Package::R0805, true) => "Resistor_SMD:R_0805_2012Metric_Pad1.15x1.40mm_HandSolder",
            (Package::C0805, false) => "Capacitor_SMD:C_0805_2012Metric",
            (Package::C0805, true) => "Capacitor_SMD:C_0805_2012Metric_Pad1.15x1.40mm_HandSolder",
            (Package::C0402, _) => "Capacitor_SMD:C_0402_1005Metric",
        }
    }

    /// All footprint names this package can produce
    pub fn footprints(self) -> Vec<&'static str> {
        let mut names = vec![self.footprint(false), self.footprint(true)];
        names.dedup();
        names
    }
}

pub fn passive(
    package: Package,
    value: &str,
    net_a: &str,
    net_b: &str,
    reference: &str,
    hand_soldering: bool,
) -> Component {
    Component::new(package.footprint(hand_soldering), reference)
        .with_value(value)
        .pin(PinId::Number(1), "", net_a)
        .pin(PinId::Number(2), "", net_b)
}

pub fn r0805(
    value: &str,
    net_a: &str,
    net_b: &str,
    reference: &str,
    hand_soldering: bool,
) -> Component {
    passive(Package::R0805, value, net_a, net_b, reference, hand_soldering)
}

pub fn c0805(
    value: &str,
    net_a: &str,
    net_b: &str,
    reference: &str,
    hand_soldering: bool,
) -> Component {
    passive(Package::C0805, value, net_a, net_b, reference, hand_soldering)
}

pub fn c0402(
    value: &str,
    net_a: &str,
    net_b: &str,
    reference: &str,
    hand_soldering: bool,
) -> Component {
    passive(Package::C0402, value, net_a, net_b, reference, hand_soldering)
}

/// Identical capacitors `C<n>` for every `n` in `refs`
pub fn capacitor_bank(
    package: Package,
    value: &str,
    net_a: &str,
    net_b: &str,
    refs: Range<u32>,
    hand_soldering: bool,
) -> Vec<Component> {
    refs.map(|n| passive(package, value, net_a, net_b, &format!("C{}", n), hand_soldering))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(Package::R0805, false, "Resistor_SMD:R_0805_2012Metric")]
    #[case(
        Package::R0805,
        true,
        "Resistor_SMD:R_0805_2012Metric_Pad1.15x1.40mm_HandSolder"
    )]
    #[case(Package::C0805, false, "Capacitor_SMD:C_0805_2012Metric")]
    #[case(Package::C0402, true, "Capacitor_SMD:C_0402_1005Metric")]
    fn picks_footprint(#[case] package: Package, #[case] hand: bool, #[case] expected: &str) {
        assert_eq!(package.footprint(hand), expected);
    }

    #[test]
    fn resistor_bridges_two_nets() {
        let r = r0805("10k", "fpga_CONF_DONE", "3V3", "R1", false);
        assert_eq!(r.identifier, "R1");
        assert_eq!(r.value.as_deref(), Some("10k"));
        let nets: Vec<_> = r.pins.iter().map(|p| p.net()).collect();
        assert_eq!(nets, [Some("fpga_CONF_DONE"), Some("3V3")]);
    }

    #[test]
    fn bank_numbers_each_capacitor() {
        let bank = capacitor_bank(Package::C0402, "100n", "3V3", "GND", 10..24, true);
        assert_eq!(bank.len(), 14);
        assert_eq!(bank[0].identifier, "C10");
        assert_eq!(bank[13].identifier, "C23");
        assert!(capacitor_bank(Package::C0805, "1u", "3V3", "GND", 8..8, false).is_empty());
    }

    #[test]
    fn c0402_has_one_footprint() {
        assert_eq!(Package::C0402.footprints().len(), 1);
        assert_eq!(Package::R0805.footprints().len(), 2);
    }
}
