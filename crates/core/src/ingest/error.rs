/// Failure to obtain a day-one series for a country code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure, non-success status, or unreadable body.
    #[error("Could not retrieve for country code {country_code} ({detail})")]
    Retrieval { country_code: String, detail: String },

    /// Body did not match the expected record array.
    #[error("Could not parse JSON for country code {country_code} ({detail})")]
    Parsing { country_code: String, detail: String },
}

impl FetchError {
    pub fn retrieval(country_code: &str, detail: impl ToString) -> Self {
        Self::Retrieval {
            country_code: country_code.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn parsing(country_code: &str, detail: impl ToString) -> Self {
        Self::Parsing {
            country_code: country_code.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn country_code(&self) -> &str {
        match self {
            Self::Retrieval { country_code, .. } | Self::Parsing { country_code, .. } => {
                country_code
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Retrieval { .. } => "RetrievalError",
            Self::Parsing { .. } => "ParsingError",
        }
    }
}
