//! Integrity checks over a design.
//!
//! Every footprint pad must be declared exactly once, pins labelled as ground
//! or supply must sit on the matching rail, and a net that reaches only one
//! pin is reported unless the design expects it.

use std::fmt::Display;

use log::{debug, info};

use crate::error::FootprintError;
use crate::footprint::FootprintLibrary;
use crate::{Component, Design};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    UnknownFootprint {
        component: String,
        footprint: String,
    },
    /// A footprint pad no pin declares
    MissingPad { component: String, pad: String },
    /// A pin the footprint has no pad for
    ExtraPad { component: String, pad: String },
    DanglingNet {
        net: String,
        component: String,
        pin: String,
        allowed: bool,
    },
    RailMismatch {
        component: String,
        pin: String,
        label: String,
        net: Option<String>,
        expected: String,
    },
    Unassigned { component: String, count: usize },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Finding::UnknownFootprint { .. }
            | Finding::MissingPad { .. }
            | Finding::ExtraPad { .. }
            | Finding::RailMismatch { .. } => Severity::Error,
            Finding::DanglingNet { allowed: false, .. } => Severity::Warning,
            Finding::DanglingNet { allowed: true, .. } | Finding::Unassigned { .. } => {
                Severity::Info
            }
        }
    }
}

impl Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::UnknownFootprint {
                component,
                footprint,
            } => write!(f, "{component}: unknown footprint {footprint}"),
            Finding::MissingPad { component, pad } => {
                write!(f, "{component}: pad {pad} is not declared")
            }
            Finding::ExtraPad { component, pad } => {
                write!(f, "{component}: pin {pad} has no pad on the footprint")
            }
            Finding::DanglingNet {
                net,
                component,
                pin,
                allowed,
            } => {
                let note = if *allowed { " (expected)" } else { "" };
                write!(f, "net {net} only reaches {component}.{pin}{note}")
            }
            Finding::RailMismatch {
                component,
                pin,
                label,
                net,
                expected,
            } => write!(
                f,
                "{component}.{pin} ({label}) is on {} instead of {expected}",
                net.as_deref().unwrap_or("no net")
            ),
            Finding::Unassigned { component, count } => {
                write!(f, "{component}: {count} unassigned pins")
            }
        }
    }
}

/// Rail net names and the pin labels that must sit on them
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub ground_net: String,
    pub supply_net: String,
    pub ground_label: String,
    pub supply_label_prefix: String,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            ground_net: "GND".to_owned(),
            supply_net: "3V3".to_owned(),
            ground_label: "GND".to_owned(),
            supply_label_prefix: "VCC".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(move |finding| finding.severity() == severity)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Warning)
    }

    pub fn is_ok(&self) -> bool {
        self.errors().next().is_none()
    }
}

fn check_pads(
    component: &Component,
    footprints: &FootprintLibrary,
    findings: &mut Vec<Finding>,
) -> Result<(), FootprintError> {
    let footprint = match footprints.resolve(&component.footprint) {
        Ok(footprint) => footprint,
        Err(FootprintError::Unknown(_)) | Err(FootprintError::BadReference(_)) => {
            findings.push(Finding::UnknownFootprint {
                component: component.identifier.clone(),
                footprint: component.footprint.clone(),
            });
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let declared: Vec<String> = component
        .pins
        .iter()
        .map(|pin| pin.designator.to_string())
        .collect();
    findings.extend(
        footprint
            .pads
            .iter()
            .filter(|pad| !declared.contains(pad))
            .map(|pad| Finding::MissingPad {
                component: component.identifier.clone(),
                pad: pad.clone(),
            }),
    );
    findings.extend(
        declared
            .into_iter()
            .filter(|pad| !footprint.pads.contains(pad))
            .map(|pad| Finding::ExtraPad {
                component: component.identifier.clone(),
                pad,
            }),
    );
    Ok(())
}

fn check_rails(component: &Component, options: &CheckOptions, findings: &mut Vec<Finding>) {
    for pin in &component.pins {
        let expected = if pin.label == options.ground_label {
            &options.ground_net
        } else if pin.label.starts_with(&options.supply_label_prefix) {
            &options.supply_net
        } else {
            continue;
        };
        if pin.net() != Some(expected.as_str()) {
            findings.push(Finding::RailMismatch {
                component: component.identifier.clone(),
                pin: pin.designator.to_string(),
                label: pin.label.clone(),
                net: pin.net.clone(),
                expected: expected.clone(),
            });
        }
    }
}

pub fn run(
    design: &Design,
    footprints: &FootprintLibrary,
    options: &CheckOptions,
) -> Result<Report, FootprintError> {
    let mut findings = vec![];

    for component in design.components() {
        check_pads(component, footprints, &mut findings)?;
        check_rails(component, options, &mut findings);
        let count = component.pins.iter().filter(|pin| pin.net.is_none()).count();
        if count > 0 {
            findings.push(Finding::Unassigned {
                component: component.identifier.clone(),
                count,
            });
        }
    }

    for (net, nodes) in design.nets() {
        if let [node] = nodes.as_slice() {
            findings.push(Finding::DanglingNet {
                net: net.to_owned(),
                component: node.component.identifier.clone(),
                pin: node.pin.designator.to_string(),
                allowed: design.is_dangling_allowed(net),
            });
        }
    }

    let report = Report { findings };
    for finding in report.with_severity(Severity::Info) {
        debug!("{}", finding);
    }
    info!(
        "Checked {} components: {} errors, {} warnings",
        design.components().len(),
        report.errors().count(),
        report.warnings().count()
    );
    Ok(report)
}
