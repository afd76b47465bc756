use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::debug;

use crate::{Component, DesignError, Pin};

/// A pin as a member of a net
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRef<'d> {
    pub component: &'d Component,
    pub pin: &'d Pin,
}

/// The set of components making up a board.
///
/// Components keep their insertion order. Nets are not stored: they are
/// derived from the net names on the pins.
#[derive(Debug, Clone, Default)]
pub struct Design {
    name: String,
    components: Vec<Component>,
    allowed_dangling: BTreeSet<String>,
}

impl Design {
    pub fn new(name: &str) -> Self {
        Design {
            name: name.to_owned(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, component: Component) -> Result<(), DesignError> {
        if component.identifier.is_empty() {
            return Err(DesignError::EmptyIdentifier);
        }
        if self.component(&component.identifier).is_some() {
            return Err(DesignError::DuplicateComponent(component.identifier));
        }
        let mut seen = HashSet::new();
        for pin in &component.pins {
            if !seen.insert(&pin.designator) {
                return Err(DesignError::DuplicatePin {
                    component: component.identifier.clone(),
                    pin: pin.designator.to_string(),
                });
            }
        }
        debug!(
            "Adding {} ({}, {} pins)",
            component.identifier,
            component.footprint,
            component.pins.len()
        );
        self.components.push(component);
        Ok(())
    }

    pub fn add_all(
        &mut self,
        components: impl IntoIterator<Item = Component>,
    ) -> Result<(), DesignError> {
        components.into_iter().try_for_each(|comp| self.add(comp))
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, identifier: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|comp| comp.identifier == identifier)
    }

    /// All nets, sorted by name, with their member pins in declaration order
    pub fn nets(&self) -> BTreeMap<&str, Vec<NodeRef<'_>>> {
        let mut nets: BTreeMap<&str, Vec<NodeRef>> = BTreeMap::new();
        for component in &self.components {
            for pin in &component.pins {
                if let Some(net) = pin.net() {
                    nets.entry(net).or_default().push(NodeRef { component, pin });
                }
            }
        }
        nets
    }

    pub fn net_names(&self) -> BTreeSet<&str> {
        self.components
            .iter()
            .flat_map(|comp| comp.pins.iter().filter_map(Pin::net))
            .collect()
    }

    /// Marks a net as expected to reach only one pin on this board
    pub fn allow_dangling(&mut self, net: &str) {
        self.allowed_dangling.insert(net.to_owned());
    }

    pub fn is_dangling_allowed(&self, net: &str) -> bool {
        self.allowed_dangling.contains(net)
    }
}
