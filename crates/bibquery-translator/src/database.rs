//! Target databases.

use std::fmt;
use std::str::FromStr;

use crate::error::TranslateError;

/// A bibliographic database a strategy can be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetDatabase {
    /// Web of Science.
    WoS,
    /// Cochrane Library.
    Cochrane,
    /// Scopus.
    Scopus,
    /// ProQuest.
    Proquest,
    /// PubMed.
    PubMed,
    /// EBSCOhost.
    #[cfg_attr(feature = "serde", serde(rename = "EBSCO"))]
    Ebsco,
}

impl TargetDatabase {
    /// Every supported target, in a stable order.
    pub const ALL: [TargetDatabase; 6] = [
        TargetDatabase::WoS,
        TargetDatabase::Cochrane,
        TargetDatabase::Scopus,
        TargetDatabase::Proquest,
        TargetDatabase::PubMed,
        TargetDatabase::Ebsco,
    ];

    /// The display name used in messages and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            TargetDatabase::WoS => "WoS",
            TargetDatabase::Cochrane => "Cochrane",
            TargetDatabase::Scopus => "Scopus",
            TargetDatabase::Proquest => "Proquest",
            TargetDatabase::PubMed => "PubMed",
            TargetDatabase::Ebsco => "EBSCO",
        }
    }
}

impl fmt::Display for TargetDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TargetDatabase {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TargetDatabase::ALL
            .into_iter()
            .find(|db| db.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TranslateError::UnknownDatabase(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!("wos".parse::<TargetDatabase>().unwrap(), TargetDatabase::WoS);
        assert_eq!("EBSCO".parse::<TargetDatabase>().unwrap(), TargetDatabase::Ebsco);
        assert_eq!(" pubmed ".parse::<TargetDatabase>().unwrap(), TargetDatabase::PubMed);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "Embase".parse::<TargetDatabase>().unwrap_err();
        assert!(matches!(err, TranslateError::UnknownDatabase(name) if name == "Embase"));
    }

    #[test]
    fn test_display_round_trips() {
        for db in TargetDatabase::ALL {
            assert_eq!(db.to_string().parse::<TargetDatabase>().unwrap(), db);
        }
    }
}
