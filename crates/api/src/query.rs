//! Shared query parameter types for API handlers.

use patrol_core::pagination::PageRequest;
use patrol_core::types::DbId;
use serde::Deserialize;

/// Page-based pagination (`?page=&limit=`), optionally for a named
/// organization (superadmin only).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub organization_id: Option<DbId>,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// `?siteId=&page=&limit=` for site-scoped log listings.
///
/// Dashboards that call sites "objects" send `?objectId=` instead.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLogParams {
    #[serde(alias = "objectId")]
    pub site_id: DbId,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl SiteLogParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// `?siteId=` (or `?objectId=`) filter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteFilter {
    #[serde(alias = "objectId")]
    pub site_id: DbId,
}

/// `?organizationId=` for endpoints scoped to one organization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationFilter {
    pub organization_id: Option<DbId>,
}

/// `?limit=` for a GPS trail.
#[derive(Debug, Default, Deserialize)]
pub struct TrailParams {
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use axum::extract::Query;
    use axum::http::Uri;

    use super::*;

    fn parse<T: serde::de::DeserializeOwned>(uri: &str) -> Option<T> {
        let uri: Uri = uri.parse().unwrap();
        Query::<T>::try_from_uri(&uri).ok().map(|Query(q)| q)
    }

    #[test]
    fn site_log_params_accept_site_id() {
        let params: SiteLogParams = parse("/logs?siteId=4&page=2&limit=5").unwrap();
        assert_eq!(params.site_id, 4);
        assert_eq!(params.page_request(), PageRequest::new(Some(2), Some(5)));
    }

    #[test]
    fn site_log_params_accept_object_id() {
        let params: SiteLogParams = parse("/logs?objectId=9&page=1&limit=10").unwrap();
        assert_eq!(params.site_id, 9);
    }

    #[test]
    fn site_log_params_require_a_site() {
        assert!(parse::<SiteLogParams>("/logs?page=1").is_none());
    }

    #[test]
    fn site_filter_accepts_object_id() {
        let filter: SiteFilter = parse("/checkpoints?objectId=3").unwrap();
        assert_eq!(filter.site_id, 3);
    }
}
