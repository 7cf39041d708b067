//! Stable request fingerprints used as cache keys

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::transport::RequestDescriptor;

const SEPARATOR: &str = "-";
const ABSENT: &str = "undefined";

fn render(part: Option<&Value>) -> String {
    match part {
        None => ABSENT.to_string(),
        Some(Value::String(s)) => s.clone(),
        // Objects come out of serde_json's default map with sorted keys, so
        // equal objects render identically whatever their insertion order.
        Some(other) => other.to_string(),
    }
}

/// Derives a short url-safe identifier from an ordered list of arguments.
///
/// Strings are taken as-is, structured values as JSON text and missing
/// arguments as the literal `undefined`.
pub fn fingerprint(parts: &[Option<&Value>]) -> String {
    let joined = parts
        .iter()
        .map(|part| render(*part))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    let digest = Sha256::digest(joined.as_bytes());
    URL_SAFE_NO_PAD.encode(digest)
}

impl RequestDescriptor {
    pub fn fingerprint(&self) -> String {
        let url = Value::String(self.url.clone());
        let options = serde_json::json!(self.options);
        fingerprint(&[Some(&url), Some(&options)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::RequestOptions;
    use serde_json::json;

    fn descriptor(url: &str, query: &str) -> RequestDescriptor {
        RequestDescriptor {
            url: url.to_string(),
            options: RequestOptions::graphql(query, "key"),
        }
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = descriptor("https://swop.cx/graphql", "query { latest { quote } }");
        let b = descriptor("https://swop.cx/graphql", "query { latest { quote } }");
        assert_eq!(a.fingerprint(), a.fingerprint());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_url_safe() {
        let fp = descriptor("https://swop.cx/graphql", "query { latest { quote } }").fingerprint();
        assert!(!fp.is_empty());
        assert!(
            fp.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let base = descriptor("https://swop.cx/graphql", "query { latest { quote } }");
        let other_url = descriptor("https://example.com/graphql", "query { latest { quote } }");
        let other_query = descriptor("https://swop.cx/graphql", "query { historical { quote } }");

        let mut other_key = base.clone();
        other_key.options = RequestOptions::graphql("query { latest { quote } }", "other");

        let mut other_method = base.clone();
        other_method.options.method = "GET".to_string();

        let mut other_header = base.clone();
        other_header
            .options
            .headers
            .insert("Accept".to_string(), "application/json".to_string());

        let fingerprints = [
            base.fingerprint(),
            other_url.fingerprint(),
            other_query.fingerprint(),
            other_key.fingerprint(),
            other_method.fingerprint(),
            other_header.fingerprint(),
        ];
        for (i, a) in fingerprints.iter().enumerate() {
            for b in &fingerprints[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_missing_argument_renders_as_undefined() {
        let literal = Value::String("undefined".to_string());
        assert_eq!(fingerprint(&[None]), fingerprint(&[Some(&literal)]));
        assert_ne!(fingerprint(&[None]), fingerprint(&[Some(&Value::Null)]));
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": 2}"#).unwrap();
        let b = json!({"a": 2, "b": 1});
        assert_eq!(fingerprint(&[Some(&a)]), fingerprint(&[Some(&b)]));
    }

    #[test]
    fn test_arguments_are_joined_in_order() {
        let ab = json!("a");
        let c = json!("b");
        let joined = json!("a-b");
        assert_eq!(
            fingerprint(&[Some(&ab), Some(&c)]),
            fingerprint(&[Some(&joined)])
        );
        assert_ne!(
            fingerprint(&[Some(&ab), Some(&c)]),
            fingerprint(&[Some(&c), Some(&ab)])
        );
    }
}
