use url::Url;

/// Validates the base origin a post-payment redirect may point at.
///
/// Only `https:` origins and plain-http `localhost`/`127.0.0.1` are allowed.
/// Arbitrary caller-supplied origins must never be forwarded to the payment
/// provider as the redirect target, so anything else is rejected, including
/// malformed URLs.
pub fn is_allowed_redirect_base(base: &str) -> bool {
    let Ok(url) = Url::parse(base) else {
        return false;
    };

    match url.scheme() {
        "https" => url.host_str().is_some(),
        "http" => matches!(url.host_str(), Some("localhost") | Some("127.0.0.1")),
        _ => false,
    }
}

/// Joins an allowed base origin with a redirect path and attaches the
/// merchant order id as a query parameter, producing the absolute URL handed
/// to the payment gateway.
///
/// Returns `None` when the base fails [`is_allowed_redirect_base`] or the
/// path does not resolve against it.
pub fn normalize_redirect_url(base: &str, path: &str, merchant_order_id: &str) -> Option<String> {
    if !is_allowed_redirect_base(base) {
        return None;
    }

    let mut url = Url::parse(base).ok()?.join(path).ok()?;
    url.query_pairs_mut()
        .append_pair("merchantOrderId", merchant_order_id);
    Some(url.to_string())
}
