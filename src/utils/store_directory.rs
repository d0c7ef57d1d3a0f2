// Canonical store address directory used while ingesting scraped rows

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::LoadError;

/// How a scraped store name was matched to a directory entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressResolution {
    /// Name equals a directory key (case-insensitive, trimmed)
    Exact(String),
    /// Name contains a directory key or is contained in one
    Substring(String),
    /// Every token of the name longer than one character appears in a directory key
    Tokens(String),
    Unresolved,
}

impl AddressResolution {
    pub fn address(&self) -> Option<&str> {
        match self {
            AddressResolution::Exact(address)
            | AddressResolution::Substring(address)
            | AddressResolution::Tokens(address) => Some(address),
            AddressResolution::Unresolved => None,
        }
    }
}

/// Versioned table of `chain -> location label -> street address`.
///
/// The table is passed explicitly to whoever needs it; there is no global copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDirectory {
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub chains: BTreeMap<String, BTreeMap<String, String>>,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

impl StoreDirectory {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            chains: BTreeMap::new(),
        }
    }

    /// Adds or replaces one store entry
    pub fn insert(&mut self, chain: &str, label: &str, address: &str) {
        self.chains
            .entry(chain.trim().to_string())
            .or_default()
            .insert(label.trim().to_string(), address.trim().to_string());
    }

    /// Loads a directory from JSON: `{ "version": 1, "chains": { "Target": { "Pineville": "..." } } }`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Resolves a scraped store name to a canonical address.
    ///
    /// Precedence: exact match, then substring match in either direction, then
    /// all-tokens match. Within a stage, directory keys are tried in sorted
    /// order and the first hit wins.
    pub fn resolve(&self, chain: &str, store_name: &str) -> AddressResolution {
        let chain_key = normalize(chain);
        let Some(entries) = self
            .chains
            .iter()
            .find(|(name, _)| normalize(name) == chain_key)
            .map(|(_, entries)| entries)
        else {
            return AddressResolution::Unresolved;
        };

        let name = normalize(store_name);
        if name.is_empty() {
            return AddressResolution::Unresolved;
        }

        let keys: Vec<(String, &String)> = entries
            .iter()
            .map(|(label, address)| (normalize(label), address))
            .collect();

        if let Some((_, address)) = keys.iter().find(|(key, _)| *key == name) {
            return AddressResolution::Exact((*address).clone());
        }

        if let Some((_, address)) = keys
            .iter()
            .find(|(key, _)| !key.is_empty() && (name.contains(key.as_str()) || key.contains(&name)))
        {
            return AddressResolution::Substring((*address).clone());
        }

        let tokens: Vec<&str> = name.split_whitespace().filter(|t| t.len() > 1).collect();
        if !tokens.is_empty() {
            if let Some((_, address)) = keys
                .iter()
                .find(|(key, _)| tokens.iter().all(|token| key.contains(token)))
            {
                return AddressResolution::Tokens((*address).clone());
            }
        }

        AddressResolution::Unresolved
    }
}
