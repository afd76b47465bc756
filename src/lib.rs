//! Component and netlist model for the Max 10 Electron ULA adapter board.
//!
//! A [`Design`] collects [`Component`]s; any two pins that carry the same net
//! name are connected. The design is written out as a KiCad netlist by
//! [`export`] and can be read back into a [`NetList`].

use std::fmt::Display;

pub mod board;
pub mod check;
pub mod design;
mod error;
pub mod export;
pub mod footprint;
mod parse;
pub mod passives;
pub mod sexpr;

pub use design::Design;
pub use error::{DesignError, ExportError, FootprintError, ParseError};

/// Pin designator: a pad number on a header, or a ball on a grid array
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PinId {
    Number(u32),
    Grid { row: char, col: u32 },
    Name(String),
}

impl Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PinId::Number(n) => write!(f, "{}", n),
            PinId::Grid { row, col } => write!(f, "{}{}", row, col),
            PinId::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for PinId {
    fn from(value: u32) -> Self {
        PinId::Number(value)
    }
}

/// Plain decimal digits without a leading zero, so the number prints back as `text`
fn canonical_number(text: &str) -> Option<u32> {
    let digits = !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
    if !digits || (text.len() > 1 && text.starts_with('0')) {
        return None;
    }
    text.parse().ok()
}

impl From<&str> for PinId {
    fn from(value: &str) -> Self {
        if let Some(n) = canonical_number(value) {
            return PinId::Number(n);
        }
        let mut chars = value.chars();
        if let Some(row) = chars.next().filter(char::is_ascii_uppercase) {
            if let Some(col) = canonical_number(chars.as_str()) {
                return PinId::Grid { row, col };
            }
        }
        PinId::Name(value.to_owned())
    }
}

/// One pin of a component.
///
/// A pin without a net is an unassigned placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub designator: PinId,
    pub label: String,
    pub net: Option<String>,
}

impl Pin {
    /// An empty `net` leaves the pin unassigned
    pub fn new(designator: impl Into<PinId>, label: &str, net: &str) -> Self {
        Pin {
            designator: designator.into(),
            label: label.to_owned(),
            net: (!net.is_empty()).then(|| net.to_owned()),
        }
    }

    pub fn unassigned(designator: impl Into<PinId>) -> Self {
        Pin::new(designator, "", "")
    }

    pub fn net(&self) -> Option<&str> {
        self.net.as_deref()
    }
}

/// A part placed on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub identifier: String,
    pub footprint: String,
    pub value: Option<String>,
    pub description: Option<String>,
    pub pins: Vec<Pin>,
}

impl Component {
    pub fn new(footprint: &str, identifier: &str) -> Self {
        Component {
            identifier: identifier.to_owned(),
            footprint: footprint.to_owned(),
            value: None,
            description: None,
            pins: vec![],
        }
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = Some(value.to_owned());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    pub fn with_pins(mut self, pins: impl IntoIterator<Item = Pin>) -> Self {
        self.pins.extend(pins);
        self
    }

    pub fn pin(mut self, designator: impl Into<PinId>, label: &str, net: &str) -> Self {
        self.pins.push(Pin::new(designator, label, net));
        self
    }

    pub fn find_pin(&self, designator: &PinId) -> Option<&Pin> {
        self.pins.iter().find(|pin| &pin.designator == designator)
    }
}

/// A netlist read back from a file, borrowing its text from the parsed tree
#[derive(Debug, Clone)]
pub struct NetList<'a> {
    pub components: Vec<Comp<'a>>,
    pub nets: Vec<Net<'a>>,
}

/// A component entry of a netlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comp<'a> {
    pub ref_des: &'a str,
    pub value: Option<&'a str>,
    pub footprint: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// A node connects a net to a pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'a> {
    pub ref_des: &'a str,
    pub pin: &'a str,
    pub function: Option<&'a str>,
}

/// A net
#[derive(Debug, Clone)]
pub struct Net<'a> {
    /// A unique id for the net
    pub code: &'a str,
    pub name: &'a str,
    pub nodes: Vec<Node<'a>>,
}

impl<'a> NetList<'a> {
    pub fn component(&self, ref_des: &str) -> Option<&Comp<'a>> {
        self.components.iter().find(|comp| comp.ref_des == ref_des)
    }

    pub fn net(&self, name: &str) -> Option<&Net<'a>> {
        self.nets.iter().find(|net| net.name == name)
    }

    /// Nets that a given component pin is a member of
    pub fn nets_of(&self, ref_des: &str, pin: &str) -> Vec<&Net<'a>> {
        self.nets
            .iter()
            .filter(|net| {
                net.nodes
                    .iter()
                    .any(|node| node.ref_des == ref_des && node.pin == pin)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("12", PinId::Number(12))]
    #[case("A1", PinId::Grid { row: 'A', col: 1 })]
    #[case("N13", PinId::Grid { row: 'N', col: 13 })]
    #[case("A01", PinId::Name("A01".to_owned()))]
    #[case("EP", PinId::Name("EP".to_owned()))]
    #[case("01", PinId::Name("01".to_owned()))]
    #[case("+1", PinId::Name("+1".to_owned()))]
    #[case("A+1", PinId::Name("A+1".to_owned()))]
    fn pin_ids_parse_from_text(#[case] input: &str, #[case] expected: PinId) {
        let id = PinId::from(input);
        assert_eq!(id, expected);
        assert_eq!(id.to_string(), input);
    }

    #[test]
    fn zero_padded_pads_keep_their_names() {
        let comp = Component::new("Connector:Test", "J1")
            .pin("01", "", "A")
            .pin("02", "", "B");
        let names: Vec<_> = comp.pins.iter().map(|p| p.designator.to_string()).collect();
        assert_eq!(names, ["01", "02"]);
    }

    #[test]
    fn empty_net_is_unassigned() {
        let pin = Pin::new("E4", "", "");
        assert_eq!(pin.net(), None);
        assert_eq!(pin, Pin::unassigned("E4"));
        assert_eq!(Pin::new(3u32, "", "GND").net(), Some("GND"));
    }

    #[test]
    fn component_builder_keeps_pin_order() {
        let comp = Component::new("Resistor_SMD:R_0805_2012Metric", "R1")
            .with_value("10k")
            .pin(1u32, "", "fpga_CONF_DONE")
            .pin(2u32, "", "3V3");
        assert_eq!(comp.value.as_deref(), Some("10k"));
        assert_eq!(comp.pins[0].net(), Some("fpga_CONF_DONE"));
        assert_eq!(
            comp.find_pin(&PinId::Number(2)).and_then(Pin::net),
            Some("3V3")
        );
    }
}
