use std::collections::HashMap;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::SiteRecord;

/// Site code -> location, display name and monitored species.
pub trait SiteCatalog {
    /// All sites in catalog order
    fn sites(&self) -> &[SiteRecord];

    fn site(&self, code: &str) -> Option<&SiteRecord>;
}

/// Catalog held in memory, preserving the order sites were listed in.
#[derive(Debug, Clone, Default)]
pub struct SiteIndex {
    sites: Vec<SiteRecord>,
    by_code: HashMap<String, usize>,
}

impl SiteIndex {
    pub fn new(sites: Vec<SiteRecord>) -> Result<Self> {
        let mut by_code = HashMap::with_capacity(sites.len());

        for (position, site) in sites.iter().enumerate() {
            site.validate()?;
            if by_code.insert(site.code.clone(), position).is_some() {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Duplicate site code in catalog: {}",
                    site.code
                )));
            }
        }

        Ok(Self { sites, by_code })
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

impl SiteCatalog for SiteIndex {
    fn sites(&self) -> &[SiteRecord] {
        &self.sites
    }

    fn site(&self, code: &str) -> Option<&SiteRecord> {
        self.by_code.get(code).map(|&position| &self.sites[position])
    }
}
