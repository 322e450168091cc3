//! Service-line subdomains of the practice site

use serde::{Deserialize, Serialize};

/// Apex domain every subdomain hangs off.
pub const APEX_DOMAIN: &str = "gregpedromd.com";

/// Service-line subdomain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    Tmj,
    Implants,
    Robotic,
    MedSpa,
    #[default]
    AboutFace,
}

impl Site {
    pub const ALL: [Site; 5] = [
        Site::Tmj,
        Site::Implants,
        Site::Robotic,
        Site::MedSpa,
        Site::AboutFace,
    ];

    /// Subdomain label and path segment
    pub fn slug(&self) -> &'static str {
        match self {
            Site::Tmj => "tmj",
            Site::Implants => "implants",
            Site::Robotic => "robotic",
            Site::MedSpa => "medspa",
            Site::AboutFace => "aboutface",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Site::Tmj => "TMJ & Sleep Therapy",
            Site::Implants => "Dental Implants",
            Site::Robotic => "Robotic Implant Surgery",
            Site::MedSpa => "MedSpa",
            Site::AboutFace => "AboutFace Aesthetics",
        }
    }

    /// Name shown in the chat header
    pub fn assistant_name(&self) -> &'static str {
        match self {
            Site::Tmj => "TMJ Assistant",
            Site::Implants => "Implant Assistant",
            Site::Robotic => "Yomi Assistant",
            Site::MedSpa => "MedSpa Concierge",
            Site::AboutFace => "AboutFace Assistant",
        }
    }

    pub fn assistant_tagline(&self) -> &'static str {
        match self {
            Site::Tmj => "Jaw Pain Specialist",
            Site::Implants => "Implant Coordinator",
            Site::Robotic => "Robotic Surgery Guide",
            Site::MedSpa => "Wellness Coordinator",
            Site::AboutFace => "EMFACE Specialist",
        }
    }

    pub fn host(&self) -> String {
        format!("{}.{}", self.slug(), APEX_DOMAIN)
    }

    pub fn path(&self) -> String {
        format!("/{}", self.slug())
    }

    pub fn from_slug(slug: &str) -> Option<Site> {
        Site::ALL
            .into_iter()
            .find(|s| s.slug().eq_ignore_ascii_case(slug))
    }

    /// Resolve a host or URL to a site.
    ///
    /// Accepts subdomain form (`tmj.gregpedromd.com`) and path-based form
    /// (`gregpedromd.com/tmj`), with or without scheme. The bare apex
    /// resolves to `None`.
    pub fn from_host(input: &str) -> Option<Site> {
        let trimmed = input.trim();
        let without_scheme = trimmed
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(trimmed);

        let (host, path) = match without_scheme.split_once('/') {
            Some((h, p)) => (h, p),
            None => (without_scheme, ""),
        };
        let host = host.split(':').next().unwrap_or(host).to_ascii_lowercase();
        let host = host.strip_prefix("www.").unwrap_or(&host);

        if let Some(label) = host.strip_suffix(&format!(".{}", APEX_DOMAIN)) {
            return Site::from_slug(label);
        }

        if host == APEX_DOMAIN {
            let segment = path.split(['/', '?', '#']).next().unwrap_or("");
            return Site::from_slug(segment);
        }

        None
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_host_subdomain() {
        assert_eq!(Site::from_host("tmj.gregpedromd.com"), Some(Site::Tmj));
        assert_eq!(
            Site::from_host("https://aboutface.gregpedromd.com/"),
            Some(Site::AboutFace)
        );
        assert_eq!(
            Site::from_host("MEDSPA.gregpedromd.com:443"),
            Some(Site::MedSpa)
        );
    }

    #[test]
    fn test_from_host_path_based() {
        assert_eq!(
            Site::from_host("https://gregpedromd.com/robotic"),
            Some(Site::Robotic)
        );
        assert_eq!(
            Site::from_host("www.gregpedromd.com/implants?ref=ad"),
            Some(Site::Implants)
        );
    }

    #[test]
    fn test_from_host_rejects_apex_and_foreign() {
        assert_eq!(Site::from_host("https://gregpedromd.com"), None);
        assert_eq!(Site::from_host("gregpedromd.com/blog"), None);
        assert_eq!(Site::from_host("tmj.example.com"), None);
    }

    #[test]
    fn test_host_round_trips_through_resolution() {
        for site in Site::ALL {
            assert_eq!(Site::from_host(&site.host()), Some(site));
            let path_url = format!("{}{}", APEX_DOMAIN, site.path());
            assert_eq!(Site::from_host(&path_url), Some(site));
        }
    }
}
