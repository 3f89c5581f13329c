/// A simple wrapper around `reqwest::Client` used to manage HTTP requests
/// with a preconfigured base URL and default settings.
///
/// One instance talks to the simulation bridge, another one to the
/// loadsheet server.
#[derive(Debug)]
pub(crate) struct HTTPClient {
    /// The underlying `reqwest::Client` used to perform HTTP requests.
    client: reqwest::Client,
    /// Base URL for the API, prepended to all endpoint paths.
    base_url: String,
}

impl HTTPClient {
    const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

    /// Constructs a new `HTTPClient` with the given base URL and a request
    /// timeout of 5 seconds.
    ///
    /// # Arguments
    /// * `base_url` – The root URL for all HTTP requests (e.g., `"http://localhost:33100"`).
    pub(crate) fn new(base_url: &str) -> Result<HTTPClient, reqwest::Error> {
        Ok(HTTPClient {
            client: reqwest::Client::builder().timeout(Self::TIMEOUT).build()?,
            base_url: String::from(base_url.trim_end_matches('/')),
        })
    }

    /// Returns a reference to the internal `reqwest::Client`.
    pub(super) fn client(&self) -> &reqwest::Client { &self.client }
    /// Returns the base URL that the client was initialized with.
    pub(crate) fn url(&self) -> &str { self.base_url.as_str() }
}
