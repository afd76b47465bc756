//! Footprint lookup.
//!
//! A footprint reference has the form `lib:name`. It resolves first against
//! `.kicad_mod` files in the search directories, then against a small table
//! of footprints this board uses.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::FootprintError;
use crate::passives::Package;
use crate::sexpr::SExpr;

pub const PLCC68_SOCKET: &str = "Package_LCC:PLCC-68_THT-Socket";
pub const INTEL_UBGA169: &str = "myelin-kicad:intel_ubga169";

/// Ball rows of Intel's 169-ball UBGA. Letters that look like digits are skipped.
pub const UBGA169_ROWS: &str = "ABCDEFGHJKLMN";

/// A resolved footprint and its pad names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    pub name: String,
    pub pads: BTreeSet<String>,
}

impl Footprint {
    fn numbered(name: &str, count: u32) -> Self {
        Footprint {
            name: name.to_owned(),
            pads: (1..=count).map(|n| n.to_string()).collect(),
        }
    }

    fn grid(name: &str, rows: &str, cols: u32) -> Self {
        let pads = rows
            .chars()
            .flat_map(|row| (1..=cols).map(move |col| format!("{}{}", row, col)))
            .collect();
        Footprint {
            name: name.to_owned(),
            pads,
        }
    }

    /// Reads the pad names of a `.kicad_mod` footprint
    pub fn from_kicad_mod(name: &str, input: &str) -> Result<Self, crate::ParseError> {
        let root = SExpr::try_from(input)?;
        let pads = root
            .children("pad")
            .filter_map(SExpr::first_string)
            // Unnamed pads are mechanical
            .filter(|pad| !pad.is_empty())
            .map(str::to_owned)
            .collect();
        Ok(Footprint {
            name: name.to_owned(),
            pads,
        })
    }
}

fn builtin(reference: &str) -> Option<Footprint> {
    match reference {
        PLCC68_SOCKET => Some(Footprint::numbered(reference, 68)),
        INTEL_UBGA169 => Some(Footprint::grid(reference, UBGA169_ROWS, 13)),
        _ => Package::ALL
            .iter()
            .flat_map(|package| package.footprints())
            .find(|name| *name == reference)
            .map(|name| Footprint::numbered(name, 2)),
    }
}

/// Resolves footprint references to pad sets
#[derive(Debug, Clone, Default)]
pub struct FootprintLibrary {
    dirs: Vec<PathBuf>,
}

impl FootprintLibrary {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        FootprintLibrary {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Library holding only the built-in footprints
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn add_dir(&mut self, dir: impl Into<PathBuf>) {
        self.dirs.push(dir.into());
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn candidates(&self, lib: &str, name: &str) -> Vec<PathBuf> {
        let lib_dir = format!("{}.pretty", lib);
        let file = format!("{}.kicad_mod", name);
        self.dirs
            .iter()
            .flat_map(|dir| {
                let direct =
                    (dir.file_name() == Some(OsStr::new(&lib_dir))).then(|| dir.join(&file));
                direct.into_iter().chain([dir.join(&lib_dir).join(&file)])
            })
            .collect()
    }

    pub fn resolve(&self, reference: &str) -> Result<Footprint, FootprintError> {
        let Some((lib, name)) = reference.split_once(':') else {
            return Err(FootprintError::BadReference(reference.to_owned()));
        };
        if let Some(path) = self.candidates(lib, name).into_iter().find(|p| p.is_file()) {
            debug!("Footprint {} from {}", reference, path.display());
            return read_kicad_mod(reference, &path);
        }
        builtin(reference).ok_or_else(|| FootprintError::Unknown(reference.to_owned()))
    }
}

fn read_kicad_mod(reference: &str, path: &Path) -> Result<Footprint, FootprintError> {
    let input = std::fs::read_to_string(path).map_err(|source| FootprintError::Io {
        path: path.to_owned(),
        source,
    })?;
    Footprint::from_kicad_mod(reference, &input).map_err(|source| FootprintError::Parse {
        path: path.to_owned(),
        source,
    })
}
