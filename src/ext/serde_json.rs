// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Path lookups into loosely-shaped JSON (API payloads, env fixtures) with typed extraction
// role: extension/serde_json
// outputs: JsonFetch trait and JsonFetched wrapper (to, to_or_default, exists)
// invariants:
// - Path segments are object keys; a segment of digits indexes into an array
// - No panics; missing paths yield None; to_or_default returns T::default on failure
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A located (or missing) JSON value awaiting typed extraction.
pub struct JsonFetched<'a> {
  inner: Option<&'a Value>,
}

impl<'a> JsonFetched<'a> {
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| T::deserialize(v).ok())
  }

  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Present and not `null`.
  pub fn exists(&self) -> bool {
    self.inner.is_some_and(|v| !v.is_null())
  }
}

/// Fetch nested values by path, e.g. `"total_count"` or `"items.0.user.login"`.
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> JsonFetched<'_>;

  /// Fetch with pre-split segments, for keys that contain dots (logins, emails).
  fn fetch_in(&self, segments: &[&str]) -> JsonFetched<'_>;
}

fn step<'a>(cur: &'a Value, seg: &str) -> Option<&'a Value> {
  match cur {
    Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
    _ => cur.get(seg),
  }
}

impl JsonFetch for Value {
  fn fetch(&self, path: &str) -> JsonFetched<'_> {
    if path.is_empty() {
      return JsonFetched { inner: Some(self) };
    }
    let segments: Vec<&str> = path.split('.').collect();
    self.fetch_in(&segments)
  }

  fn fetch_in(&self, segments: &[&str]) -> JsonFetched<'_> {
    let mut cur = self;

    for seg in segments {
      match step(cur, seg) {
        Some(next) => cur = next,
        None => return JsonFetched { inner: None },
      }
    }

    JsonFetched { inner: Some(cur) }
  }
}
