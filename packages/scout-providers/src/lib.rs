pub mod award_search;
pub mod command_registry;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

pub fn default_headers(default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

pub(crate) fn client(timeout_ms: u64, headers: &Map<String, Value>) -> Result<Client> {
	Ok(Client::builder()
		.timeout(Duration::from_millis(timeout_ms))
		.default_headers(default_headers(headers)?)
		.build()?)
}
