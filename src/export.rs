//! KiCad netlist export.
//!
//! Components are listed in the order they were added to the design. Nets are
//! sorted by name and numbered from 1. The output carries no timestamps, so a
//! design always produces the same bytes.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::ExportError;
use crate::sexpr::SExpr;
use crate::{Component, Design};

pub const FORMAT_VERSION: &str = "D";
pub const TOOL: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

fn comp(component: &Component) -> SExpr<'_> {
    let mut fields = vec![SExpr::pair("ref", component.identifier.as_str())];
    if let Some(value) = &component.value {
        fields.push(SExpr::pair("value", value.as_str()));
    }
    fields.push(SExpr::pair("footprint", component.footprint.as_str()));
    if let Some(description) = &component.description {
        fields.push(SExpr::pair("description", description.as_str()));
    }
    SExpr::list("comp", fields)
}

pub fn to_sexpr(design: &Design) -> SExpr<'_> {
    let components = design.components().iter().map(comp);
    let nets = design
        .nets()
        .into_iter()
        .enumerate()
        .map(|(i, (name, nodes))| {
            let header = [
                SExpr::pair("code", (i + 1).to_string()),
                SExpr::pair("name", name),
            ];
            let nodes = nodes.into_iter().map(|node| {
                let mut fields = vec![
                    SExpr::pair("ref", node.component.identifier.as_str()),
                    SExpr::pair("pin", node.pin.designator.to_string()),
                ];
                if !node.pin.label.is_empty() {
                    fields.push(SExpr::pair("pinfunction", node.pin.label.as_str()));
                }
                SExpr::list("node", fields)
            });
            SExpr::list("net", header.into_iter().chain(nodes))
        });

    SExpr::list(
        "export",
        [
            SExpr::pair("version", FORMAT_VERSION),
            SExpr::list(
                "design",
                [SExpr::pair("source", design.name()), SExpr::pair("tool", TOOL)],
            ),
            SExpr::list("components", components),
            SExpr::list("nets", nets),
        ],
    )
}

/// The netlist file contents
pub fn to_string(design: &Design) -> String {
    to_sexpr(design).to_pretty_string()
}

/// Sibling of `path` that the netlist is written to before it replaces `path`
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_file(path: &Path, text: &str) -> std::io::Result<()> {
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    out.write_all(text.as_bytes())?;
    out.flush()?;
    out.get_ref().sync_all()
}

/// Writes the netlist to `path`.
///
/// An existing file is only replaced once the new text is fully written.
pub fn write_netlist(design: &Design, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    let staging = staging_path(path);
    let text = to_string(design);
    let written = write_file(&staging, &text).and_then(|()| std::fs::rename(&staging, path));
    if let Err(source) = written {
        let _ = std::fs::remove_file(&staging);
        return Err(ExportError::Io {
            path: path.to_owned(),
            source,
        });
    }
    info!(
        "Wrote {} components and {} nets to {}",
        design.components().len(),
        design.net_names().len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passives::r0805;

    fn small_design() -> Design {
        let mut design = Design::new("small");
        design
            .add(
                Component::new("x:bga", "FPGA")
                    .with_value("10M08SCU169")
                    .pin("C5", "CONF_DONE", "fpga_CONF_DONE")
                    .pin("E4", "", "")
                    .pin("A1", "GND", "GND"),
            )
            .unwrap();
        design
            .add(r0805("10k", "fpga_CONF_DONE", "3V3", "R1", false))
            .unwrap();
        design
    }

    #[test]
    fn writes_components_and_sorted_nets() {
        let expected = r#"(export (version "D")
  (design (source "small") (tool "TOOL"))
  (components
    (comp (ref "FPGA") (value "10M08SCU169") (footprint "x:bga"))
    (comp (ref "R1") (value "10k") (footprint "Resistor_SMD:R_0805_2012Metric")))
  (nets
    (net (code "1") (name "3V3")
      (node (ref "R1") (pin "2")))
    (net (code "2") (name "GND")
      (node (ref "FPGA") (pin "A1") (pinfunction "GND")))
    (net (code "3") (name "fpga_CONF_DONE")
      (node (ref "FPGA") (pin "C5") (pinfunction "CONF_DONE"))
      (node (ref "R1") (pin "1")))))
"#
        .replace("TOOL", TOOL);
        assert_eq!(to_string(&small_design()), expected);
    }

    #[test]
    fn write_netlist_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.net");
        let b = dir.path().join("b.net");
        write_netlist(&small_design(), &a).unwrap();
        write_netlist(&small_design(), &b).unwrap();
        assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
    }

    #[test]
    fn write_netlist_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.net");
        let err = write_netlist(&small_design(), &path).unwrap_err();
        let ExportError::Io { path: failed, .. } = err;
        assert_eq!(failed, path);
    }

    #[test]
    fn write_netlist_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.net");
        std::fs::write(&path, "old").unwrap();
        write_netlist(&small_design(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), to_string(&small_design()));
        assert!(!dir.path().join("out.net.tmp").exists());
    }

    #[test]
    fn failed_write_leaves_target_alone() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory can't be replaced by a file
        let path = dir.path().join("out.net");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("keep"), "old").unwrap();

        let err = write_netlist(&small_design(), &path).unwrap_err();
        let ExportError::Io { path: failed, .. } = err;
        assert_eq!(failed, path);
        assert_eq!(std::fs::read_to_string(path.join("keep")).unwrap(), "old");
        assert!(!dir.path().join("out.net.tmp").exists());
    }
}
