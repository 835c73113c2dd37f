//! Site-relative path helpers used for nav resolution and active-link matching.

/// Strip trailing slashes; an empty result becomes `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        String::from("/")
    } else {
        trimmed.to_owned()
    }
}

/// Prefix `href` with the base path. An empty base leaves `href` untouched.
pub fn join_base(base_path: &str, href: &str) -> String {
    let base = base_path.trim_end_matches('/');
    if base.is_empty() {
        return href.to_owned();
    }
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}

/// Normalized site path for a location: the base prefix is removed first.
pub fn current_route(base_path: &str, location_path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let local = if base.is_empty() {
        location_path
    } else {
        location_path.strip_prefix(base).unwrap_or(location_path)
    };
    normalize_path(local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_to_root() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("/den/events/"), "/den/events");
        assert_eq!(normalize_path("/den"), "/den");
    }

    #[test]
    fn base_is_joined_with_single_slash() {
        assert_eq!(join_base("", "/start/"), "/start/");
        assert_eq!(join_base("", "https://elsewhere.example/"), "https://elsewhere.example/");
        assert_eq!(join_base("/repo/", "/start/"), "/repo/start/");
        assert_eq!(join_base("/repo", "start/"), "/repo/start/");
        assert_eq!(join_base("/repo//", "/"), "/repo/");
    }

    #[test]
    fn route_drops_base_prefix() {
        assert_eq!(current_route("/repo", "/repo/den/"), "/den");
        assert_eq!(current_route("/repo/", "/repo"), "/");
        assert_eq!(current_route("", "/den/events/"), "/den/events");
        assert_eq!(current_route("/repo", "/other/"), "/other");
    }
}
