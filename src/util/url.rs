/// Strips known tracking query parameters from a link.
///
/// Removes parameters whose key starts with `utm_` or equals `fbclid`
/// (and that carry a value), then drops a now-dangling `?`. Every other
/// parameter, the path, and the fragment are preserved byte-for-byte;
/// no URL re-serialization happens, so this is a pure text transform.
/// Empty input yields an empty string.
pub fn normalize_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }

    let (base, fragment) = match url.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (url, None),
    };

    let Some((path, query)) = base.split_once('?') else {
        return url.to_string();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|param| !is_tracking_param(param))
        .collect();

    let mut out = String::with_capacity(url.len());
    out.push_str(path);
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// A parameter is only considered tracking noise when it actually carries
/// a value; a bare `utm_source` key is left alone.
fn is_tracking_param(param: &str) -> bool {
    match param.split_once('=') {
        Some((key, value)) if !value.is_empty() => {
            (key.starts_with("utm_") && key.len() > "utm_".len()) || key == "fbclid"
        }
        _ => false,
    }
}
