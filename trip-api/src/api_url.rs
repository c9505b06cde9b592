use crate::ApiError;

/// Base URL of the trip planner backend, always stored without a trailing slash.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiUrl(String);

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ApiUrl {
    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        let trimmed = raw.trim().trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        Ok(Self(trimmed.to_string()))
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }
}
