//! Metadata handling for server responses: internal label and annotation
//! filtering and the generation default.

use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::catalogs::{
    ALLOWED_AUTHORITIES, ANNOTATIONS_KEY, DAEMONSET_GENERATION_KEY, GENERATION_KEY, LABELS_KEY,
    RESERVED_DOMAIN_SUFFIX,
};
use crate::value::Manifest;

/// True for metadata keys that are managed by the cluster rather than the user.
///
/// The key's host is taken by parsing `//<key>` as a network path and is
/// compared as written, not lower-cased. A host ending in the reserved domain
/// is internal unless it is one of the allowed user-facing authorities; other
/// keys are internal only when they carry the daemonset generation marker.
pub fn is_internal_key(key: &str) -> bool {
    if let Some(host) = host(key) {
        if ALLOWED_AUTHORITIES.contains(&host) {
            return false;
        }
        if host.ends_with(RESERVED_DOMAIN_SUFFIX) {
            return true;
        }
    }
    key.contains(DAEMONSET_GENERATION_KEY)
}

/// Host of `//<key>` in the key's own spelling.
fn host(key: &str) -> Option<&str> {
    let base = Url::parse("http://placeholder").ok()?;
    let url = base.join(&format!("//{key}")).ok()?;
    let parsed = url.host_str()?;
    let authority = key.split(['/', '?', '#']).next().unwrap_or_default();
    let start = authority.to_ascii_lowercase().find(parsed)?;
    authority.get(start..start + parsed.len())
}

/// Caller-supplied patterns for labels and annotations to suppress, on top
/// of the internal key rule.
#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    labels: Vec<Regex>,
    annotations: Vec<Regex>,
}

impl MetadataFilter {
    /// Invalid patterns are logged and skipped; they never match.
    pub fn new<S: AsRef<str>>(labels: &[S], annotations: &[S]) -> Self {
        Self {
            labels: compile(labels, LABELS_KEY),
            annotations: compile(annotations, ANNOTATIONS_KEY),
        }
    }

    fn patterns(&self, section: &str) -> &[Regex] {
        if section == LABELS_KEY {
            &self.labels
        } else {
            &self.annotations
        }
    }

    /// Remove internal and ignored keys from the labels and annotations of a
    /// response metadata mapping. Keys present in the configured metadata are
    /// always kept. A section emptied by filtering is removed.
    pub fn apply(&self, response: &mut Manifest, configured: Option<&Manifest>) {
        for section in [LABELS_KEY, ANNOTATIONS_KEY] {
            let Some(Value::Object(entries)) = response.get_mut(section) else {
                continue;
            };
            let user_keys = configured
                .and_then(|c| c.get(section))
                .and_then(Value::as_object);
            let before = entries.len();
            entries.retain(|key, _| {
                if user_keys.is_some_and(|u| u.contains_key(key)) {
                    return true;
                }
                let drop = is_internal_key(key)
                    || self.patterns(section).iter().any(|re| re.is_match(key));
                if drop {
                    debug!(section, %key, "dropping metadata key");
                }
                !drop
            });
            if entries.is_empty() && before > 0 {
                response.remove(section);
            }
        }
    }
}

fn compile<S: AsRef<str>>(patterns: &[S], section: &str) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p.as_ref()) {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(section, pattern = p.as_ref(), error = %e, "ignoring invalid pattern");
                None
            }
        })
        .collect()
}

/// Insert `generation: 0` when the metadata mapping has none.
pub fn default_generation(metadata: &mut Manifest) {
    if !metadata.contains_key(GENERATION_KEY) {
        metadata.insert(GENERATION_KEY.to_string(), Value::from(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest(v: Value) -> Manifest {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn internal_keys() {
        let cases = [
            ("kubernetes.io/metadata.name", true),
            ("node.kubernetes.io/instance-type", true),
            ("kubectl.kubernetes.io/last-applied-configuration", true),
            ("deployment.kubernetes.io/revision", true),
            ("deprecated.daemonset.template.generation", true),
            ("app.kubernetes.io/name", false),
            ("service.beta.kubernetes.io/aws-load-balancer-type", false),
            ("example.com/owner", false),
            ("app", false),
            ("notkubernetes.io.example.com/x", false),
            ("bad host/key", false),
            ("app.kubernetes.io/deprecated.daemonset.template.generation", false),
            ("example.com/deprecated.daemonset.template.generation", true),
            ("Node.Kubernetes.IO/x", false),
            ("user@node.kubernetes.io:80/x", true),
        ];
        for (key, expected) in cases {
            assert_eq!(is_internal_key(key), expected, "key {key}");
        }
    }

    #[test]
    fn filter_drops_internal_keys_and_empty_sections() {
        let mut response = manifest(json!({
            "name": "web",
            "labels": {"kubernetes.io/metadata.name": "web"},
            "annotations": {
                "deployment.kubernetes.io/revision": "1",
                "team": "payments"
            }
        }));
        MetadataFilter::default().apply(&mut response, None);
        assert_eq!(
            Value::Object(response),
            json!({"name": "web", "annotations": {"team": "payments"}})
        );
    }

    #[test]
    fn configured_keys_survive() {
        let mut response = manifest(json!({
            "annotations": {"kubectl.kubernetes.io/restartedAt": "now", "owner.example.com/x": "1"}
        }));
        let configured = manifest(json!({
            "annotations": {"kubectl.kubernetes.io/restartedAt": "now"}
        }));
        MetadataFilter::new(&[] as &[&str], &["^owner\\."]).apply(&mut response, Some(&configured));
        assert_eq!(
            Value::Object(response),
            json!({"annotations": {"kubectl.kubernetes.io/restartedAt": "now"}})
        );
    }

    #[test]
    fn invalid_patterns_never_match() {
        let filter = MetadataFilter::new(&["(unclosed", "^tmp-"], &[]);
        let mut response = manifest(json!({"labels": {"tmp-a": "1", "(unclosed": "2"}}));
        filter.apply(&mut response, None);
        assert_eq!(Value::Object(response), json!({"labels": {"(unclosed": "2"}}));
    }

    #[test]
    fn empty_sections_from_the_server_are_left_alone() {
        let mut response = manifest(json!({"labels": {}}));
        MetadataFilter::default().apply(&mut response, None);
        assert_eq!(Value::Object(response), json!({"labels": {}}));
    }

    #[test]
    fn generation_defaults_to_zero() {
        let mut metadata = manifest(json!({"name": "a"}));
        default_generation(&mut metadata);
        assert_eq!(metadata["generation"], json!(0));

        let mut metadata = manifest(json!({"generation": 4}));
        default_generation(&mut metadata);
        assert_eq!(metadata["generation"], json!(4));
    }
}
