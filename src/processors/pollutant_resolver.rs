use crate::error::Result;
use crate::models::Pollutant;
use crate::sources::SiteCatalog;

/// A pollutant query resolved against the site catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPollutant {
    pub pollutant: Pollutant,
    pub column: &'static str,
    /// Sites declaring the species, in catalog order
    pub site_codes: Vec<String>,
}

pub struct PollutantResolver;

impl PollutantResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve<C: SiteCatalog + ?Sized>(
        &self,
        code: &str,
        catalog: &C,
    ) -> Result<ResolvedPollutant> {
        let pollutant = Pollutant::from_code(code)?;
        Ok(self.resolve_pollutant(pollutant, catalog))
    }

    pub fn resolve_pollutant<C: SiteCatalog + ?Sized>(
        &self,
        pollutant: Pollutant,
        catalog: &C,
    ) -> ResolvedPollutant {
        let site_codes = catalog
            .sites()
            .iter()
            .filter(|site| site.monitors(pollutant))
            .map(|site| site.code.clone())
            .collect();

        ResolvedPollutant {
            pollutant,
            column: pollutant.column_name(),
            site_codes,
        }
    }
}

impl Default for PollutantResolver {
    fn default() -> Self {
        Self::new()
    }
}
