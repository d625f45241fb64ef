/// Slug served at the site root
pub const INDEX_SLUG: &str = "index";

/// Route a page is served at
///
/// The `index` slug (or an empty one) maps to `/`; everything else lives under
/// the route prefix.
pub fn route_for_slug(slug: &str, prefix: &str) -> String {
    let slug = slug.trim_matches('/');
    if slug.is_empty() || slug == INDEX_SLUG {
        return "/".to_string();
    }
    format!("{}/{}", prefix.trim_end_matches('/'), slug)
}

/// Slug for a route produced by [`route_for_slug`]
pub fn slug_for_route(route: &str, prefix: &str) -> String {
    let path = route.split(['?', '#']).next().unwrap_or_default();
    let trimmed_prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(trimmed_prefix).unwrap_or(path);
    let slug = rest.trim_matches('/');
    if slug.is_empty() {
        INDEX_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Convert a slug to a safe file name stem
pub fn sanitize_filename(slug: &str) -> String {
    let mut name = slug.trim().trim_matches('/').to_string();
    name = name.replace(['/', '\\', ':', '?', '&', '=', '#', '%'], "_");
    name = name.replace("..", "_");

    if name.is_empty() {
        return INDEX_SLUG.to_string();
    }

    // Limit filename length
    if name.len() > 100 {
        let mut end = 100;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name[..end].to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for_slug() {
        assert_eq!(route_for_slug("index", "/content/"), "/");
        assert_eq!(route_for_slug("", "/content/"), "/");
        assert_eq!(
            route_for_slug("fight-speeding-ticket-calgary", "/content/"),
            "/content/fight-speeding-ticket-calgary"
        );
        assert_eq!(route_for_slug("/faq/", ""), "/faq");
    }

    #[test]
    fn test_slug_for_route() {
        assert_eq!(slug_for_route("/", "/content/"), "index");
        assert_eq!(
            slug_for_route("/content/fight-speeding-ticket-calgary?x=1", "/content/"),
            "fight-speeding-ticket-calgary"
        );
        assert_eq!(slug_for_route("/faq", ""), "faq");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("calgary"), "calgary");
        assert_eq!(sanitize_filename("a/b?c"), "a_b_c");
        assert_eq!(sanitize_filename("../etc"), "__etc");
        assert_eq!(sanitize_filename("/"), "index");
        assert_eq!(sanitize_filename(&"x".repeat(140)).len(), 100);
    }
}
