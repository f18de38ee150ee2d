// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Shared blocking HTTP plumbing (agent construction, JSON GET with typed errors, basic auth)
// role: transport/http
// inputs: Timeout; prepared ureq::Request; credentials
// outputs: Deserialized bodies or ClientError with status/body preserved
// side_effects: Network calls
// invariants: Non-2xx responses always surface as ClientError::Http with the response body
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

pub const USER_AGENT: &str = "eng-activity-report";

pub fn agent(timeout: Duration) -> ureq::Agent {
  ureq::AgentBuilder::new()
    .timeout(timeout)
    .user_agent(USER_AGENT)
    .build()
}

/// `Authorization` header value for HTTP basic auth.
pub fn basic_auth(user: &str, secret: &str) -> String {
  format!("Basic {}", STANDARD.encode(format!("{user}:{secret}")))
}

/// Execute a GET and decode the JSON body; `url` is only used in errors.
pub fn get_json<T: DeserializeOwned>(req: ureq::Request, url: &str) -> Result<T, ClientError> {
  match req.call() {
    Ok(resp) => resp.into_json::<T>().map_err(|e| ClientError::Decode {
      url: url.to_string(),
      message: e.to_string(),
    }),
    Err(ureq::Error::Status(status, resp)) => Err(ClientError::Http {
      status,
      url: url.to_string(),
      body: resp.into_string().unwrap_or_default(),
    }),
    Err(ureq::Error::Transport(t)) => Err(ClientError::Transport {
      url: url.to_string(),
      message: t.to_string(),
    }),
  }
}
