//! Detection of the `ExpiredObjectAllVersions` expiration extension
//!
//! Some S3-compatible servers accept an `<ExpiredObjectAllVersions>` element
//! inside `<Expiration>`. The SDK model has no field for it and drops it
//! while deserializing, so the raw response body is scanned instead and the
//! affected rules are flagged on the decoded policy.

use std::sync::{Arc, Mutex};

use aws_sdk_s3::config::interceptors::AfterDeserializationInterceptorContextRef;
use aws_sdk_s3::config::{ConfigBag, Intercept, RuntimeComponents};
use aws_sdk_s3::error::BoxError;

use ilm_core::LifecyclePolicy;

const ELEMENT: &str = "ExpiredObjectAllVersions";

/// Response interceptor collecting ids of rules that expire all versions
#[derive(Debug, Clone, Default)]
pub(crate) struct ExpireAllScan {
    found: Arc<Mutex<Vec<String>>>,
}

impl ExpireAllScan {
    /// Ids seen in the last response
    pub(crate) fn take(&self) -> Vec<String> {
        self.found
            .lock()
            .map(|mut ids| std::mem::take(&mut *ids))
            .unwrap_or_default()
    }
}

impl Intercept for ExpireAllScan {
    fn name(&self) -> &'static str {
        "ExpireAllScan"
    }

    fn read_after_deserialization(
        &self,
        context: &AfterDeserializationInterceptorContextRef<'_>,
        _runtime_components: &RuntimeComponents,
        _cfg: &mut ConfigBag,
    ) -> Result<(), BoxError> {
        let Some(body) = context.response().body().bytes() else {
            return Ok(());
        };
        let ids = rules_expiring_all_versions(&String::from_utf8_lossy(body));
        if let Ok(mut found) = self.found.lock() {
            *found = ids;
        }
        Ok(())
    }
}

/// Flag the rules named in `ids`
pub(crate) fn mark_expire_all(policy: &mut LifecyclePolicy, ids: &[String]) {
    for rule in policy.rules.iter_mut().filter(|r| ids.contains(&r.id)) {
        rule.expiration.delete_all_versions = true;
    }
}

/// Ids of `<Rule>` elements whose expiration sets `ExpiredObjectAllVersions`
pub(crate) fn rules_expiring_all_versions(xml: &str) -> Vec<String> {
    let mut ids = Vec::new();
    let mut rest = xml;

    while let Some(start) = rest.find("<Rule>") {
        let after = &rest[start + "<Rule>".len()..];
        let end = after.find("</Rule>").unwrap_or(after.len());
        let body = &after[..end];

        let enabled = element_text(body, ELEMENT).is_some_and(|v| v.trim() == "true");
        if enabled && let Some(id) = element_text(body, "ID") {
            ids.push(unescape(id.trim()));
        }
        rest = &after[end..];
    }

    ids
}

fn element_text<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let open = format!("<{name}>");
    let close = format!("</{name}>");
    let start = body.find(&open)? + open.len();
    let len = body[start..].find(&close)?;
    Some(&body[start..start + len])
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ilm_core::LifecycleRule;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<LifecycleConfiguration xmlns="http://s3.amazonaws.com/doc/2006-03-01/">
  <Rule>
    <ID>keep</ID>
    <Status>Enabled</Status>
    <Filter><Prefix>logs/</Prefix></Filter>
    <Expiration><Days>30</Days></Expiration>
  </Rule>
  <Rule>
    <ID>purge &amp; forget</ID>
    <Status>Enabled</Status>
    <Filter><Prefix></Prefix></Filter>
    <Expiration>
      <Days>7</Days>
      <ExpiredObjectAllVersions>true</ExpiredObjectAllVersions>
    </Expiration>
  </Rule>
  <Rule>
    <ID>off</ID>
    <Status>Enabled</Status>
    <Expiration><Days>1</Days><ExpiredObjectAllVersions>false</ExpiredObjectAllVersions></Expiration>
  </Rule>
</LifecycleConfiguration>"#;

    #[test]
    fn test_scan_finds_flagged_rules() {
        assert_eq!(rules_expiring_all_versions(BODY), vec!["purge & forget"]);
    }

    #[test]
    fn test_scan_without_rules() {
        let body = "<Error><Code>NoSuchLifecycleConfiguration</Code></Error>";
        assert!(rules_expiring_all_versions(body).is_empty());
        assert!(rules_expiring_all_versions("").is_empty());
    }

    #[test]
    fn test_marked_policy_refuses_write() {
        let mut keep = LifecycleRule::new("keep");
        keep.expiration.days = Some(30);
        let mut purge = LifecycleRule::new("purge & forget");
        purge.expiration.days = Some(7);
        let mut policy = LifecyclePolicy::new(vec![keep, purge]);

        mark_expire_all(&mut policy, &rules_expiring_all_versions(BODY));
        assert!(!policy.rules[0].expiration.delete_all_versions);
        assert!(policy.rules[1].expiration.delete_all_versions);

        // Writing would drop the element from the untouched rule
        let err = crate::lifecycle::policy_to_sdk(&policy).unwrap_err();
        assert!(matches!(err, ilm_core::Error::UnsupportedFeature(ref m) if m.contains("purge")));

        policy.remove("purge & forget").unwrap();
        assert!(crate::lifecycle::policy_to_sdk(&policy).is_ok());
    }

    #[test]
    fn test_take_drains() {
        let scan = ExpireAllScan::default();
        if let Ok(mut found) = scan.found.lock() {
            found.push("a".into());
        }
        assert_eq!(scan.take(), vec!["a"]);
        assert!(scan.take().is_empty());
    }
}
