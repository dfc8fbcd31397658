//! Profile registry and alias resolution
//!
//! Built once at process start and passed by reference; lookup is
//! case-insensitive so the CLI can accept any spelling of an alias.

use std::collections::{BTreeSet, HashMap};

use crate::error::RegistryError;
use crate::profile::ProfileKind;

struct RegistryEntry {
    kind: ProfileKind,
    aliases: Vec<&'static str>,
}

pub struct ProfileRegistry {
    entries: Vec<RegistryEntry>,
    lookup: HashMap<String, ProfileKind>,
    default_key: &'static str,
}

impl ProfileRegistry {
    /// Build the registry with every supported profile
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
            lookup: HashMap::new(),
            default_key: "sampic",
        };

        registry.register_profile(ProfileKind::Sampic, &["sampic", "sampic-daq"]);
        registry.register_profile(ProfileKind::HdSoc, &["hdsoc", "nalu"]);

        registry
    }

    /// Register a profile under each alias. An alias colliding with a
    /// different profile is a programming error, not a user-facing one.
    fn register_profile(&mut self, kind: ProfileKind, aliases: &[&'static str]) {
        for alias in aliases {
            let normalized = self.normalize_key(alias);
            if let Some(existing) = self.lookup.insert(normalized, kind) {
                assert_eq!(
                    existing, kind,
                    "profile alias '{alias}' registered for two different profiles"
                );
            }
        }

        self.entries.push(RegistryEntry {
            kind,
            aliases: aliases.to_vec(),
        });
    }

    /// Case-fold a lookup key. Pure and idempotent.
    pub fn normalize_key(&self, key: &str) -> String {
        key.to_lowercase()
    }

    /// True iff the key resolves to a registered profile
    pub fn has_profile(&self, key: &str) -> bool {
        self.lookup.contains_key(&self.normalize_key(key))
    }

    /// Resolve a key to its profile, or fail with a message enumerating
    /// every known profile.
    pub fn get_profile(&self, key: &str) -> Result<ProfileKind, RegistryError> {
        self.lookup
            .get(&self.normalize_key(key))
            .copied()
            .ok_or_else(|| RegistryError::UnknownProfile {
                key: key.to_string(),
                available: self.profile_summaries().join("; "),
            })
    }

    /// One line per registered profile, in registration order
    pub fn profile_summaries(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{} (keys: {})",
                    entry.kind.display_name(),
                    entry.aliases.join(", ")
                )
            })
            .collect()
    }

    /// Deduplicated display names in lexicographic order
    pub fn profile_display_names(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .entries
            .iter()
            .map(|entry| entry.kind.display_name())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// The profile key used when none is given on the command line
    pub fn default_profile_key(&self) -> &str {
        self.default_key
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}
