use std::collections::{BTreeMap, BTreeSet};

/// The capabilities a server offers and which of them are enabled.
#[derive(Clone, Default, Debug)]
pub struct Caps {
    /// The capabilities that are available.
    available: BTreeSet<String>,
    /// The values of available capabilities that have them.
    ///
    /// The keys are always a subset of `available`.
    values: BTreeMap<String, String>,
    /// The capabilities that have been enabled.
    enabled: BTreeSet<String>,
}

impl Caps {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Caps::default()
    }
    /// Adds an available capability with an optionally-empty value.
    pub fn add(&mut self, cap: impl Into<String>, value: impl Into<String>) {
        let cap = cap.into();
        let value = value.into();
        if value.is_empty() {
            self.values.remove(&cap);
        } else {
            self.values.insert(cap.clone(), value);
        }
        self.available.insert(cap);
    }
    /// Looks up a capability, returning its value if it is available.
    ///
    /// Capabilities without values have an empty value.
    pub fn get(&self, cap: &str) -> Option<&str> {
        if !self.available.contains(cap) {
            return None;
        }
        Some(self.values.get(cap).map(String::as_str).unwrap_or_default())
    }
    /// Removes a capability, disabling it if it was enabled.
    pub fn del(&mut self, cap: &str) {
        self.values.remove(cap);
        self.available.remove(cap);
        self.enabled.remove(cap);
    }
    /// Returns `true` if the capability is available.
    pub fn is_available(&self, cap: &str) -> bool {
        self.available.contains(cap)
    }
    /// Returns `true` if the capability is enabled.
    pub fn is_enabled(&self, cap: &str) -> bool {
        self.enabled.contains(cap)
    }
    /// Marks a capability as enabled or disabled.
    pub fn set_enabled(&mut self, cap: impl Into<String>, enabled: bool) {
        let cap = cap.into();
        if enabled {
            self.enabled.insert(cap);
        } else {
            self.enabled.remove(&cap);
        }
    }
    /// Iterates over enabled capabilities in lexicographic order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> + '_ {
        self.enabled.iter().map(String::as_str)
    }
}
