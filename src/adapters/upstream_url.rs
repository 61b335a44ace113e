//! URL building for upstream APIs that take the mint as a path segment

use reqwest::Url;

use crate::domain::is_mint_address;
use crate::ports::UpstreamError;

/// `base` followed by `segments`, each percent-encoded as exactly one path
/// segment. The mint must look like a mint address before it reaches a
/// keyed upstream.
pub(crate) fn mint_endpoint(base: &str, mint: &str, segments: &[&str]) -> Result<Url, UpstreamError> {
    if !is_mint_address(mint) {
        return Err(UpstreamError::InvalidMint(mint.to_string()));
    }

    let mut url = Url::parse(base).map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", base, e)))?;
    url.path_segments_mut()
        .map_err(|_| UpstreamError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments.iter().map(|s| if *s == "{mint}" { mint } else { *s }));
    Ok(url)
}
