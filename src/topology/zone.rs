//! Stable name -> index bindings for zones and boundary patches.
//!
//! A [`ZoneBinding`] identifies a zone or patch by name and caches its
//! index in the owning list. Topology changes may renumber zone lists, so
//! the binding must be re-resolved by name (`rebind`) after every such
//! event; the name itself never changes. An unresolved binding reports
//! `active() == false`, which the sliding interface treats as a fatal
//! configuration error at definition-check time.

use serde::{Deserialize, Serialize};

/// Anything that can be looked up in a registry by name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Identifies a zone or patch by name and index, with optional physical
/// type and group information.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneBinding {
    name: String,
    #[serde(skip)]
    index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    physical_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    in_groups: Vec<String>,
}

impl ZoneBinding {
    /// Creates an unbound identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index: None,
            physical_type: None,
            in_groups: Vec::new(),
        }
    }

    /// Creates an identifier and resolves it against `list` immediately.
    pub fn bound<T: Named>(name: impl Into<String>, list: &[T]) -> Self {
        let mut binding = Self::new(name);
        binding.rebind(list);
        binding
    }

    /// The zone name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The index of this zone in the owning list, if bound.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// True when the last bind succeeded.
    #[inline]
    pub fn active(&self) -> bool {
        self.index.is_some()
    }

    /// Re-resolves the index by name, leaving the name unchanged.
    ///
    /// Call after every topology change that may renumber zones/patches.
    pub fn rebind<T: Named>(&mut self, list: &[T]) {
        self.index = list.iter().position(|z| z.name() == self.name);
    }

    /// The (optional) physical type of the zone.
    #[inline]
    pub fn physical_type(&self) -> Option<&str> {
        self.physical_type.as_deref()
    }

    pub fn set_physical_type(&mut self, physical_type: impl Into<String>) {
        self.physical_type = Some(physical_type.into());
    }

    /// True when the zone belongs to the named group.
    pub fn in_group(&self, group: &str) -> bool {
        !group.is_empty() && self.in_groups.iter().any(|g| g == group)
    }

    /// Add a (unique) group for the zone.
    pub fn add_group(&mut self, group: impl Into<String>) {
        let group = group.into();
        if !group.is_empty() && !self.in_groups.iter().any(|g| *g == group) {
            self.in_groups.push(group);
        }
    }

    /// Remove a group for the zone.
    pub fn remove_group(&mut self, group: &str) {
        self.in_groups.retain(|g| g != group);
    }
}
