use crate::sexpr::SExpr;
use crate::{Comp, Net, NetList, Node, ParseError};

impl<'b> TryFrom<&'b SExpr<'_>> for Comp<'b> {
    type Error = ParseError;

    fn try_from(value: &'b SExpr<'_>) -> Result<Self, Self::Error> {
        Ok(Comp {
            ref_des: value.value("ref")?,
            value: value.optional_value("value")?,
            footprint: value.optional_value("footprint")?,
            description: value.optional_value("description")?,
        })
    }
}

impl<'b> TryFrom<&'b SExpr<'_>> for Node<'b> {
    type Error = ParseError;

    fn try_from(value: &'b SExpr<'_>) -> Result<Self, Self::Error> {
        Ok(Node {
            ref_des: value.value("ref")?,
            pin: value.value("pin")?,
            function: value.optional_value("pinfunction")?,
        })
    }
}

impl<'b> TryFrom<&'b SExpr<'_>> for Net<'b> {
    type Error = ParseError;

    fn try_from(value: &'b SExpr<'_>) -> Result<Self, Self::Error> {
        let nodes = value
            .children("node")
            .map(Node::try_from)
            .collect::<Result<_, _>>()?;
        Ok(Net {
            code: value.value("code")?,
            name: value.value("name")?,
            nodes,
        })
    }
}

impl<'b> TryFrom<&'b SExpr<'_>> for NetList<'b> {
    type Error = ParseError;

    fn try_from(value: &'b SExpr<'_>) -> Result<Self, Self::Error> {
        let components: Vec<Comp> = value
            .child("components")?
            .children("comp")
            .map(Comp::try_from)
            .collect::<Result<_, _>>()?;

        let nets: Vec<Net> = value
            .child("nets")?
            .children("net")
            .map(Net::try_from)
            .collect::<Result<_, _>>()?;

        for node in nets.iter().flat_map(|net| net.nodes.iter()) {
            if !components.iter().any(|comp| comp.ref_des == node.ref_des) {
                return Err(ParseError::UnknownRef(node.ref_des.to_owned()));
            }
        }

        Ok(NetList { components, nets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export;
    use crate::passives::r0805;
    use crate::{Component, Design};

    macro_rules! test_data {
        ($fname:expr) => {
            std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources/test/",
                $fname
            ))
            .unwrap()
        };
    }

    #[test]
    fn netlist_can_parse_full_file() {
        let i = &test_data!("adapter.net");
        let root = SExpr::try_from(i).unwrap();
        let netlist = NetList::try_from(&root).unwrap();

        assert_eq!(netlist.components.len(), 4);
        let ula = netlist.component("ULA").unwrap();
        assert_eq!(ula.footprint, Some("Package_LCC:PLCC-68_THT-Socket"));
        assert_eq!(
            ula.description,
            Some("Set of pin headers to plug into an Acorn Electron ULA socket")
        );

        let conf_done = netlist.net("fpga_CONF_DONE").unwrap();
        assert_eq!(conf_done.code, "3");
        assert_eq!(
            conf_done.nodes[0],
            Node {
                ref_des: "FPGA",
                pin: "C5",
                function: Some("CONF_DONE")
            }
        );
        assert_eq!(netlist.nets_of("R1", "2")[0].name, "3V3");
    }

    #[test]
    fn rejects_nodes_of_unknown_components() {
        let input = r#"(export (components) (nets (net (code "1") (name "GND") (node (ref "U9") (pin "1")))))"#;
        let root = SExpr::try_from(input).unwrap();
        assert_eq!(
            NetList::try_from(&root).unwrap_err(),
            ParseError::UnknownRef("U9".to_owned())
        );
    }

    #[test]
    fn rejects_missing_sections() {
        let root = SExpr::try_from(r#"(export (version "D"))"#).unwrap();
        assert_eq!(
            NetList::try_from(&root).unwrap_err(),
            ParseError::MissingChild("components".to_owned())
        );
    }

    #[test]
    fn exported_design_reads_back() {
        let mut design = Design::new("readback");
        design
            .add(Component::new("x:y", "U1").pin(1u32, "", "a \"quoted\" net"))
            .unwrap();
        design.add(r0805("1k", "a \"quoted\" net", "GND", "R7", true)).unwrap();

        let text = export::to_string(&design);
        let root = SExpr::try_from(text.as_str()).unwrap();
        let netlist = NetList::try_from(&root).unwrap();
        let net = netlist.net("a \"quoted\" net").unwrap();
        assert_eq!(net.nodes.len(), 2);
        assert_eq!(
            netlist.component("R7").unwrap().footprint,
            Some("Resistor_SMD:R_0805_2012Metric_Pad1.15x1.40mm_HandSolder")
        );
    }
}
