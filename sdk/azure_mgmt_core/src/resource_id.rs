//! Parsing of ARM resource ids.
//!
//! ```
//! use azure_mgmt_core::resource_id::ResourceId;
//!
//! let id = ResourceId::parse(
//!     "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.StorageCache/caches/c1/storageTargets/st1",
//! )
//! .unwrap();
//! assert_eq!(id.resource_group.as_deref(), Some("rg"));
//! assert_eq!(id.resource_type(), "Microsoft.StorageCache/caches/storageTargets");
//! assert_eq!(id.name, "st1");
//! assert_eq!(id.parent().unwrap().name, "c1");
//! ```

use crate::error::{ArmError, ArmResult};
use std::fmt;

const SUBSCRIPTIONS: &str = "subscriptions";
const RESOURCE_GROUPS: &str = "resourceGroups";
const PROVIDERS: &str = "providers";

/// A parsed ARM resource id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    /// Subscription id, absent for tenant-level resources.
    pub subscription_id: Option<String>,
    /// Resource group name.
    pub resource_group: Option<String>,
    /// Provider namespace, e.g. `Microsoft.Network`.
    pub provider: Option<String>,
    /// Resource type chain below the provider, e.g. `["privateDnsZones", "A"]`.
    pub types: Vec<String>,
    /// Name of the resource.
    pub name: String,
    /// Names of the ancestors matching `types`, outermost first.
    parent_names: Vec<String>,
}

impl ResourceId {
    /// Parse an id such as
    /// `/subscriptions/{sub}/resourceGroups/{rg}/providers/{ns}/{type}/{name}`.
    pub fn parse(id: &str) -> ArmResult<Self> {
        let invalid = |reason: &str| ArmError::Builder(format!("invalid resource id {id:?}: {reason}"));

        let trimmed = id.trim_end_matches('/');
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Err(invalid("must start with '/'"));
        };
        let segments: Vec<&str> = rest.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("contains an empty segment"));
        }

        let mut idx = 0;
        let mut subscription_id = None;
        let mut resource_group = None;
        let mut provider = None;

        if segments[0].eq_ignore_ascii_case(SUBSCRIPTIONS) {
            let sub = segments.get(1).ok_or_else(|| invalid("missing subscription id"))?;
            subscription_id = Some((*sub).to_string());
            idx = 2;
            if segments.len() == idx {
                return Ok(Self {
                    subscription_id,
                    resource_group,
                    provider,
                    types: vec![SUBSCRIPTIONS.to_string()],
                    name: (*sub).to_string(),
                    parent_names: Vec::new(),
                });
            }
            if segments[idx].eq_ignore_ascii_case(RESOURCE_GROUPS) {
                let rg = segments
                    .get(idx + 1)
                    .ok_or_else(|| invalid("missing resource group name"))?;
                resource_group = Some((*rg).to_string());
                idx += 2;
                if segments.len() == idx {
                    return Ok(Self {
                        subscription_id,
                        resource_group,
                        provider,
                        types: vec![RESOURCE_GROUPS.to_string()],
                        name: (*rg).to_string(),
                        parent_names: Vec::new(),
                    });
                }
            }
        } else if !segments[0].eq_ignore_ascii_case(PROVIDERS) {
            return Err(invalid("must start with /subscriptions/ or /providers/"));
        }

        if !segments
            .get(idx)
            .is_some_and(|s| s.eq_ignore_ascii_case(PROVIDERS))
        {
            return Err(invalid("missing providers segment"));
        }
        let namespace = segments
            .get(idx + 1)
            .ok_or_else(|| invalid("missing provider namespace"))?;
        provider = Some((*namespace).to_string());

        let pairs = &segments[idx + 2..];
        if pairs.is_empty() || pairs.len() % 2 != 0 {
            return Err(invalid("resource types and names must come in pairs"));
        }

        let mut types = Vec::with_capacity(pairs.len() / 2);
        let mut names = Vec::with_capacity(pairs.len() / 2);
        for pair in pairs.chunks(2) {
            types.push(pair[0].to_string());
            names.push(pair[1].to_string());
        }
        let name = names.pop().unwrap_or_default();

        Ok(Self {
            subscription_id,
            resource_group,
            provider,
            types,
            name,
            parent_names: names,
        })
    }

    /// Full resource type, e.g. `Microsoft.Network/privateDnsZones/A`.
    pub fn resource_type(&self) -> String {
        match &self.provider {
            Some(ns) => format!("{ns}/{}", self.types.join("/")),
            None => self.types.join("/"),
        }
    }

    /// The id of the parent resource, for nested resources.
    pub fn parent(&self) -> Option<ResourceId> {
        if self.types.len() < 2 {
            return None;
        }
        let mut types = self.types.clone();
        types.pop();
        let mut parent_names = self.parent_names.clone();
        let name = parent_names.pop()?;
        Some(Self {
            subscription_id: self.subscription_id.clone(),
            resource_group: self.resource_group.clone(),
            provider: self.provider.clone(),
            types,
            name,
            parent_names,
        })
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sub) = &self.subscription_id {
            write!(f, "/{SUBSCRIPTIONS}/{sub}")?;
        }
        if let Some(rg) = &self.resource_group {
            write!(f, "/{RESOURCE_GROUPS}/{rg}")?;
        }
        let Some(ns) = &self.provider else {
            return Ok(());
        };
        write!(f, "/{PROVIDERS}/{ns}")?;
        for (ty, name) in self
            .types
            .iter()
            .zip(self.parent_names.iter().chain(std::iter::once(&self.name)))
        {
            write!(f, "/{ty}/{name}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ResourceId {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
