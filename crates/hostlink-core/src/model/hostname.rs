// ── Hostname normalization ──
//
// Custom domains and deployment URLs arrive as free-form operator input.
// Both are normalized to a bare, lower-case DNS name before anything else
// looks at them.

use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Trim, lower-case, drop scheme and trailing `/` and `.`, then validate.
fn normalize(raw: &str) -> Result<String, String> {
    let lowered = raw.trim().to_ascii_lowercase();
    let mut name = lowered.as_str();

    for scheme in ["https://", "http://"] {
        if let Some(rest) = name.strip_prefix(scheme) {
            name = rest;
            break;
        }
    }
    name = name.strip_suffix('/').unwrap_or(name);
    name = name.strip_suffix('.').unwrap_or(name);

    if name.is_empty() {
        return Err("is empty".into());
    }
    if name.contains('/') {
        return Err("must not contain a path".into());
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '-')))
    {
        return Err(format!("contains invalid character {bad:?}"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(format!("is longer than {MAX_NAME_LEN} characters"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err("contains an empty label".into());
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(format!("label '{label}' is longer than {MAX_LABEL_LEN} characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("label '{label}' starts or ends with a hyphen"));
        }
    }

    Ok(name.to_owned())
}

// ── Hostname ────────────────────────────────────────────────────────

/// A validated, normalized custom domain name.
///
/// A leading `www.` is kept: it is a real subdomain that needs its own
/// CNAME.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Hostname(String);

impl Hostname {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        normalize(raw)
            .map(Self)
            .map_err(|reason| CoreError::invalid_domain(raw.trim(), reason))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dot-separated labels, leftmost first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for Hostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Hostname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── DeploymentHost ──────────────────────────────────────────────────

/// The hostname of a deployment the custom domain routes to.
///
/// Normalized like [`Hostname`], with a leading `www.` dropped. The first
/// label is the provider-side project name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeploymentHost(String);

impl DeploymentHost {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let host = normalize(raw).map_err(|reason| CoreError::InvalidDeploymentUrl {
            input: raw.trim().to_owned(),
            reason,
        })?;
        let host = match host.strip_prefix("www.") {
            Some(rest) => rest.to_owned(),
            None => host,
        };
        Ok(Self(host))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Provider-side project name: the first hostname label.
    pub fn project_name(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(first, _)| first)
    }

    /// Require the `<project>.<scope>.<suffix>` shape of a platform-issued
    /// deployment hostname.
    pub fn require_platform_suffix(&self, suffix: &str) -> Result<(), CoreError> {
        let suffix = suffix.trim().trim_matches('.').to_ascii_lowercase();
        let prefix = self
            .0
            .strip_suffix(suffix.as_str())
            .and_then(|p| p.strip_suffix('.'));

        match prefix {
            Some(p) if !suffix.is_empty() && p.split('.').count() == 2 => Ok(()),
            _ => Err(CoreError::InvalidDeploymentUrl {
                input: self.0.clone(),
                reason: format!("expected <project>.<scope>.{suffix}"),
            }),
        }
    }
}

impl fmt::Display for DeploymentHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_operator_input() {
        assert_eq!(Hostname::parse("  Example.COM ").unwrap().as_str(), "example.com");
        assert_eq!(
            Hostname::parse("https://Blog.Example.com/").unwrap().as_str(),
            "blog.example.com"
        );
        assert_eq!(Hostname::parse("example.com.").unwrap().as_str(), "example.com");
        assert_eq!(
            Hostname::parse("www.example.com").unwrap().as_str(),
            "www.example.com"
        );
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in [
            "",
            "   ",
            "example.com/path",
            "exa mple.com",
            "exam_ple.com",
            "..example.com",
            "example..com",
            ".example.com",
            "-bad.example.com",
            "bad-.example.com",
            "ex\u{e4}mple.com",
        ] {
            let err = Hostname::parse(bad).unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidDomainFormat { .. }),
                "{bad:?} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn rejects_overlong_labels_and_names() {
        let label = "a".repeat(64);
        assert!(Hostname::parse(&format!("{label}.com")).is_err());

        let long = vec!["abcdefghi"; 26].join(".");
        assert!(long.len() > 253);
        assert!(Hostname::parse(&long).is_err());
    }

    #[test]
    fn path_rejection_names_the_reason() {
        let CoreError::InvalidDomainFormat { input, reason } =
            Hostname::parse("example.com/admin").unwrap_err()
        else {
            panic!("expected InvalidDomainFormat");
        };
        assert_eq!(input, "example.com/admin");
        assert_eq!(reason, "must not contain a path");
    }

    #[test]
    fn deployment_host_derives_project_name() {
        let host = DeploymentHost::parse("https://app-x1.deployer.app").unwrap();
        assert_eq!(host.as_str(), "app-x1.deployer.app");
        assert_eq!(host.project_name(), "app-x1");

        let host = DeploymentHost::parse("https://www.app-x2.deployer.app/").unwrap();
        assert_eq!(host.project_name(), "app-x2");

        let host = DeploymentHost::parse("localhost").unwrap();
        assert_eq!(host.project_name(), "localhost");
    }

    #[test]
    fn deployment_host_errors_are_distinct() {
        assert!(matches!(
            DeploymentHost::parse("https://app.vercel.app/x/y"),
            Err(CoreError::InvalidDeploymentUrl { .. })
        ));
    }

    #[test]
    fn platform_suffix_shape() {
        let ok = DeploymentHost::parse("https://shop-abc123.team.vercel.app").unwrap();
        assert!(ok.require_platform_suffix("vercel.app").is_ok());
        assert!(ok.require_platform_suffix(".vercel.app").is_ok());

        for bad in ["shop.vercel.app", "a.b.c.vercel.app", "shop.team.example.com", "shop.teamvercel.app"] {
            let host = DeploymentHost::parse(bad).unwrap();
            assert!(
                host.require_platform_suffix("vercel.app").is_err(),
                "{bad} should not pass"
            );
        }
    }
}
