// src/services/classifier.rs

//! Carrier name classification against keyword taxonomies.

use crate::models::{ClassifierConfig, LocalLabel};

/// Classifies a carrier/company name by case-insensitive substring match.
///
/// Burner keywords are checked before real carrier keywords, so a name
/// carrying both is flagged as a burner.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    burner: Vec<String>,
    real: Vec<String>,
}

impl KeywordClassifier {
    pub fn new<B, R>(burner: B, real: R) -> Self
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: AsRef<str>,
    {
        Self {
            burner: Self::normalize(burner),
            real: Self::normalize(real),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(&config.burner_keywords, &config.real_keywords)
    }

    fn normalize<I>(keywords: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_uppercase())
            .filter(|k| !k.is_empty())
            .collect()
    }

    /// Classify a company name.
    ///
    /// `None` or a blank name means no reference row was found.
    pub fn classify(&self, company: Option<&str>) -> LocalLabel {
        let Some(company) = company.map(str::trim).filter(|c| !c.is_empty()) else {
            return LocalLabel::NotFound;
        };
        let company = company.to_uppercase();

        if self.burner.iter().any(|k| company.contains(k.as_str())) {
            LocalLabel::BurnerVoip
        } else if self.real.iter().any(|k| company.contains(k.as_str())) {
            LocalLabel::RealMobile
        } else {
            LocalLabel::LandlineRegional
        }
    }

    /// First keyword from either set found in `company`.
    pub fn matched_keyword(&self, company: &str) -> Option<&str> {
        let company = company.to_uppercase();
        self.burner
            .iter()
            .chain(self.real.iter())
            .find(|k| company.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}
