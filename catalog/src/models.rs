use scout_core::{CatalogError, MovieKind, MovieSummary, SearchPage};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Full record for one title, as returned by an id lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(rename = "imdbID")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Rated", default)]
    pub rated: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "Poster", default)]
    pub poster_url: String,
    #[serde(rename = "Type")]
    pub kind: MovieKind,
}

/// Every response carries `Response: "True" | "False"`, with `Error` on failure.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "Response")]
    pub response: String,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    #[serde(rename = "Search", default)]
    search: Vec<MovieSummary>,
    #[serde(rename = "totalResults")]
    total_results: String,
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);
    serde_path_to_error::deserialize(deserializer)
        .map_err(|e| CatalogError::InvalidResponse(format!("{}: {}", e.path(), e.inner())))
}

/// Turn a `Response: "False"` envelope into the matching error, or pass through.
pub(crate) fn check_envelope(body: &str) -> Result<(), CatalogError> {
    let envelope: Envelope = decode(body)?;
    if envelope.response.eq_ignore_ascii_case("true") {
        return Ok(());
    }
    let message = envelope.error.unwrap_or_else(|| "request rejected".to_string());
    // "Movie not found!", "Series not found!", ...
    if message.to_ascii_lowercase().contains("not found") {
        Err(CatalogError::NotFound)
    } else {
        Err(CatalogError::Rejected(message))
    }
}

/// Decode a search response body.
pub fn parse_search(body: &str) -> Result<SearchPage, CatalogError> {
    check_envelope(body)?;
    let raw: RawSearch = decode(body)?;
    let total_results = raw
        .total_results
        .trim()
        .parse::<u64>()
        .map_err(|e| CatalogError::InvalidResponse(format!("totalResults: {e}")))?;
    Ok(SearchPage { items: raw.search, total_results })
}

/// Decode a title lookup body.
pub fn parse_detail(body: &str) -> Result<MovieDetail, CatalogError> {
    check_envelope(body)?;
    decode(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_page() {
        let body = r#"{"Search":[
            {"Title":"Batman Begins","Year":"2005","imdbID":"tt0372784","Type":"movie","Poster":"https://x/1.jpg"},
            {"Title":"Batman: The Animated Series","Year":"1992–1995","imdbID":"tt0103359","Type":"series","Poster":"N/A"}
        ],"totalResults":"23","Response":"True"}"#;
        let page = parse_search(body).unwrap();
        assert_eq!(page.total_results, 23);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].kind, MovieKind::Series);
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let body = r#"{"Response":"False","Error":"Series not found!"}"#;
        assert_eq!(parse_search(body), Err(CatalogError::NotFound));
    }

    #[test]
    fn other_refusals_are_rejected() {
        let body = r#"{"Response":"False","Error":"Too many results."}"#;
        assert_eq!(parse_search(body), Err(CatalogError::Rejected("Too many results.".into())));
    }

    #[test]
    fn bad_payload_reports_path() {
        let body = r#"{"Search":[{"Title":"X","imdbID":7,"Type":"movie"}],"totalResults":"1","Response":"True"}"#;
        match parse_search(body) {
            Err(CatalogError::InvalidResponse(msg)) => assert!(msg.starts_with("Search[0].imdbID"), "{msg}"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn bad_total_is_invalid() {
        let body = r#"{"Search":[],"totalResults":"lots","Response":"True"}"#;
        assert!(matches!(parse_search(body), Err(CatalogError::InvalidResponse(_))));
    }

    #[test]
    fn parses_detail() {
        let body = r#"{"Title":"Pulp Fiction","Year":"1994","Rated":"R","Runtime":"154 min","Genre":"Crime, Drama",
            "Director":"Quentin Tarantino","Plot":"...","imdbRating":"8.9","imdbID":"tt0110912","Type":"movie","Response":"True"}"#;
        let detail = parse_detail(body).unwrap();
        assert_eq!(detail.director, "Quentin Tarantino");
        assert_eq!(detail.actors, "");
    }
}
