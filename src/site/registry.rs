use crate::site::Site;
use crate::skycalc_errors::SkycalcError;

static BUNDLED_SITES: &str = include_str!("data/sites.dat");

/// An ordered collection of observing sites.
///
/// The bundled table is compiled into the crate; [`SiteRegistry::from_text`] accepts any text in
/// the same format. Lines that are blank or start with `#` are ignored.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<Site>,
}

impl SiteRegistry {
    /// Parse the site table bundled with the crate.
    pub fn bundled() -> Result<Self, SkycalcError> {
        SiteRegistry::from_text(BUNDLED_SITES)
    }

    /// Parse a site table, one record per line.
    ///
    /// Returns
    /// --------
    /// * The registry, or the first [`SkycalcError::SiteParseError`] / [`SkycalcError::InvalidSite`]
    ///   encountered. Duplicate names are rejected.
    pub fn from_text(text: &str) -> Result<Self, SkycalcError> {
        let sites = text
            .lines()
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .map(Site::parse_record)
            .collect::<Result<Vec<_>, SkycalcError>>()?;

        for (i, site) in sites.iter().enumerate() {
            if sites[..i].iter().any(|s| s.name() == site.name()) {
                return Err(SkycalcError::InvalidSite(format!(
                    "duplicate site name {}",
                    site.name()
                )));
            }
        }

        log::debug!("loaded {} observing sites", sites.len());
        Ok(SiteRegistry { sites })
    }

    /// Look a site up by name.
    ///
    /// An exact (case-insensitive) match wins; otherwise the name is accepted as a prefix if it
    /// selects exactly one site.
    pub fn get(&self, name: &str) -> Result<&Site, SkycalcError> {
        let wanted = name.trim().to_lowercase();
        if wanted.is_empty() {
            return Err(SkycalcError::UnknownSite(name.to_string()));
        }

        if let Some(site) = self
            .sites
            .iter()
            .find(|s| s.name().to_lowercase() == wanted)
        {
            return Ok(site);
        }

        let mut candidates = self
            .sites
            .iter()
            .filter(|s| s.name().to_lowercase().starts_with(&wanted));
        match (candidates.next(), candidates.next()) {
            (Some(site), None) => Ok(site),
            _ => Err(SkycalcError::UnknownSite(name.to_string())),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sites.iter().map(|s| s.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod registry_test {
    use super::*;
    use crate::site::dst::DstRule;

    #[test]
    fn test_bundled_registry() {
        let registry = SiteRegistry::bundled().unwrap();
        assert_eq!(registry.len(), 19);

        let kpno = registry.get("Kitt Peak [MDM Obs.]").unwrap();
        assert_eq!(kpno.zone_abbrev(), "M");
        assert_eq!(kpno.dst_rule(), DstRule::None);

        let ctio = registry.get("cerro tololo").unwrap();
        assert_eq!(ctio.dst_rule(), DstRule::Chile);
    }

    #[test]
    fn test_prefix_lookup() {
        let registry = SiteRegistry::bundled().unwrap();
        assert_eq!(registry.get("Kitt").unwrap().name(), "Kitt Peak [MDM Obs.]");
        // "Cerro" selects several sites
        assert!(matches!(
            registry.get("Cerro"),
            Err(SkycalcError::UnknownSite(_))
        ));
        assert!(registry.get("Atlantis").is_err());
        assert!(registry.get("  ").is_err());
    }

    #[test]
    fn test_duplicate_rejected() {
        let text = "\"A\", 1., 10., 1., 0, \"Z\", \"Z\", 0., 0.\n\"A\", 2., 10., 1., 0, \"Z\", \"Z\", 0., 0.\n";
        assert!(SiteRegistry::from_text(text).is_err());
    }
}
