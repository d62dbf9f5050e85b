pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(reqwest::Error),
	#[error("Upstream unreachable: {message}")]
	Unreachable { message: String },
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("Upstream responded with status {status}.")]
	Status { status: u16 },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// True when no HTTP response was received at all (connect failure, timeout, reset).
	pub fn is_transport(&self) -> bool {
		matches!(self, Self::Unreachable { .. })
	}
}
impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		let unreachable = err.status().is_none()
			&& (err.is_timeout() || err.is_connect() || err.is_request())
			&& !err.is_decode()
			&& !err.is_body()
			&& !err.is_builder();

		if unreachable { Self::Unreachable { message: err.to_string() } } else { Self::Reqwest(err) }
	}
}
