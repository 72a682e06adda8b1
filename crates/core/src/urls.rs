use crate::config::CatalogConfig;
use crate::error::SearchError;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use url::Url;

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

fn with_query(endpoint: &str, query: &str) -> Result<Url, SearchError> {
    let mut url = Url::parse(endpoint)
        .map_err(|err| SearchError::InvalidQuery(format!("bad endpoint {endpoint:?}: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(SearchError::InvalidQuery(format!(
            "endpoint {endpoint:?} cannot carry a query"
        )));
    }
    url.set_query(Some(query));
    Ok(url)
}

/// `<search_endpoint>?term=..&country=..&media=..[&limit=..]`. An empty term is allowed.
pub fn search_url(cfg: &CatalogConfig, term: &str) -> Result<Url, SearchError> {
    let mut query = format!(
        "term={}&country={}&media={}",
        encode(term),
        encode(&cfg.country),
        encode(&cfg.media)
    );
    if let Some(limit) = cfg.limit {
        query.push_str(&format!("&limit={limit}"));
    }
    with_query(&cfg.search_endpoint, &query)
}

pub fn lookup_url(cfg: &CatalogConfig, id: i64) -> Result<Url, SearchError> {
    let query = format!("id={id}&country={}", encode(&cfg.country));
    with_query(&cfg.lookup_endpoint, &query)
}
