//! XboxReplay API Types

/// Language of the localized fields in XboxReplay responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Culture {
    EnUs,
    FrFr,
}

impl Culture {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::FrFr => "fr_FR",
        }
    }
}

impl std::str::FromStr for Culture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en_US" | "en-US" => Ok(Self::EnUs),
            "fr_FR" | "fr-FR" => Ok(Self::FrFr),
            other => Err(format!("unsupported culture: {other}")),
        }
    }
}

/// Paging and filtering options for XboxReplay media listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayMediaOptions {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Sent comma-joined as `title_ids` when non-empty.
    pub title_ids: Vec<String>,
    pub culture: Option<Culture>,
}

impl ReplayMediaOptions {
    /// Query pairs, absent values skipped.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(culture) = self.culture {
            pairs.push(("culture".to_string(), culture.as_str().to_string()));
        }
        if !self.title_ids.is_empty() {
            pairs.push(("title_ids".to_string(), self.title_ids.join(",")));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs() {
        let options = ReplayMediaOptions {
            limit: Some(10),
            offset: None,
            title_ids: vec!["219630713".to_string(), "1144039928".to_string()],
            culture: Some(Culture::FrFr),
        };
        assert_eq!(
            options.to_pairs(),
            vec![
                ("limit".to_string(), "10".to_string()),
                ("culture".to_string(), "fr_FR".to_string()),
                ("title_ids".to_string(), "219630713,1144039928".to_string()),
            ]
        );
        assert!(ReplayMediaOptions::default().to_pairs().is_empty());
    }

    #[test]
    fn test_culture_parse() {
        assert_eq!("en_US".parse::<Culture>().unwrap(), Culture::EnUs);
        assert_eq!("fr-FR".parse::<Culture>().unwrap(), Culture::FrFr);
        assert!("de_DE".parse::<Culture>().is_err());
    }
}
