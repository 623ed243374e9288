//! URL helpers for mirroring the modal into `?project=<slug>`.

/// Query parameter carrying the open modal's slug.
pub const PROJECT_PARAM: &str = "project";

/// Split a URL into its path and query (without the `?`). A fragment, if
/// present, is dropped.
#[must_use]
pub fn split_url(url: &str) -> (&str, &str) {
    let url = url.split_once('#').map_or(url, |(head, _)| head);
    url.split_once('?').unwrap_or((url, ""))
}

/// Slug named by the `project` parameter of a query string. Accepts the
/// query with or without its leading `?`. Empty values count as absent.
#[must_use]
pub fn project_param(query: &str) -> Option<&str> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == PROJECT_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// URL of `pathname` with the modal for `slug` open.
#[must_use]
pub fn project_url(pathname: &str, slug: &str) -> String {
    format!("{pathname}?{PROJECT_PARAM}={slug}")
}
