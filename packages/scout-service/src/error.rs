use scout_domain::{CodeSuggestion, InvalidIndustryCode};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Industry code '{code}' is not recognized.")]
	InvalidIndustryCode { code: String, suggestions: Vec<CodeSuggestion> },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Search failed: {message}")]
	SearchFailed { message: String },
}
impl From<InvalidIndustryCode> for Error {
	fn from(err: InvalidIndustryCode) -> Self {
		Self::InvalidIndustryCode { code: err.code, suggestions: err.suggestions }
	}
}
