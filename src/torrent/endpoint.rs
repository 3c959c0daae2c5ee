//! Endpoint construction relative to a server host.
//!
//! Hosts are configured with or without a trailing slash; every endpoint is
//! built as `host + "/" + path` with exactly one separator in between.

/// The host with exactly one trailing `/`.
pub fn base(host: &str) -> String {
    format!("{}/", host.trim_end_matches('/'))
}

/// Join a relative path (or a bare `?query`) onto a host.
pub fn join(host: &str, path: &str) -> String {
    let mut url = base(host);
    url.push_str(path.trim_start_matches('/'));
    url
}

/// Join directory segments with exactly one `/` between them.
pub fn join_dir(base_dir: &str, relative: &str) -> String {
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
        return base_dir.to_string();
    }
    format!("{}/{}", base_dir.trim_end_matches('/'), relative)
}
