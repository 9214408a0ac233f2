use std::path::Path;

use crate::domain::DomainError;

/// Channels whose videos are trusted by default.
pub const DEFAULT_CHANNELS: [&str; 18] = [
    "Anat' Academy",
    "Carl Gdt (Anat' To Me)",
    "Docteur Par Coeur",
    "Dr Explique",
    "scandium theory",
    "Docteur C",
    "Promed Anatomie (Dr Khaled ANNABI)",
    "RB Physio",
    "Anatomie 3D Lyon",
    "Urologie fonctionnelle - Anatomie",
    "Encyclopédie Médicale",
    "Médecine Créative",
    "Physio explain",
    "Anatomyc",
    "Dave Bélanger",
    "Ronald Déry",
    "Anatomie AKIVI",
    "RAKOTOZAFY Mahefa Serge (MÉDECINE EN VIDÉO)",
];

/// Approved channel display names.
///
/// A channel matches when its name contains one of the entries,
/// case-insensitively. Entries are stored lower-cased.
#[derive(Debug, Clone)]
pub struct ChannelWhitelist {
    entries: Vec<String>,
}

impl ChannelWhitelist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    /// Loads a JSON array of channel names.
    pub fn from_json_file(path: &Path) -> Result<Self, DomainError> {
        let raw = std::fs::read_to_string(path)?;
        let names: Vec<String> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::config(format!(
                "Invalid channel list {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::new(names))
    }

    pub fn matches(&self, channel: &str) -> bool {
        let channel = channel.to_lowercase();
        self.entries.iter().any(|entry| channel.contains(entry.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ChannelWhitelist {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let whitelist = ChannelWhitelist::default();
        assert!(whitelist.matches("Dr Explique - Anatomie"));
        assert!(whitelist.matches("DR EXPLIQUE"));
        assert!(whitelist.matches("Encyclopédie médicale officielle"));
    }

    #[test]
    fn test_unknown_channel_is_rejected() {
        let whitelist = ChannelWhitelist::default();
        assert!(!whitelist.matches("Random Channel"));
    }

    #[test]
    fn test_blank_entries_are_dropped() {
        let whitelist = ChannelWhitelist::new(["", "  ", "Anatomyc"]);
        assert_eq!(whitelist.len(), 1);
        assert!(!whitelist.matches("Random Channel"));
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["Ma Chaîne", "Autre"]"#).unwrap();

        let whitelist = ChannelWhitelist::from_json_file(file.path()).unwrap();
        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.matches("ma chaîne d'anatomie"));
        assert!(!whitelist.matches("Dr Explique"));
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ChannelWhitelist::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, DomainError::ConfigError(_)));
    }
}
