//! Wire protocol seam between the HTTP client and provider formats.

use comenius_error::ComeniusResult;

/// What a parsed stream line means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Incremental text to forward
    Delta(String),
    /// End-of-stream sentinel; stop reading
    Done,
    /// Keep-alive, empty delta, or undecodable line; ignore
    Skip,
}

/// Per-provider wire format.
///
/// One implementation exists per backend family. The HTTP client asks the
/// protocol for the request shape and hands it each line of the response
/// body; the protocol never performs I/O itself.
pub trait WireProtocol: Send + Sync {
    /// Full request URL for a given base URL.
    fn endpoint(&self, base_url: &str) -> String;

    /// Request headers beyond Content-Type.
    fn headers(&self) -> Vec<(&'static str, String)>;

    /// JSON request body for a prompt.
    fn payload(&self, prompt: &str) -> serde_json::Value;

    /// Decode one line of the response body.
    ///
    /// In-band error payloads surface as `Err`; lines that are not valid
    /// frames decode as [`Fragment::Skip`] so a noisy stream never aborts
    /// the call.
    fn parse_line(&self, line: &str) -> ComeniusResult<Fragment>;

    /// Health probe URL, for providers that expose one.
    fn health_endpoint(&self, _base_url: &str) -> Option<String> {
        None
    }
}
