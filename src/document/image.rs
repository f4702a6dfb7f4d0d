use crate::attribute;

/// Used whenever a document offers nothing better.
pub const DEFAULT_IMAGE: &str = "https://parflow.org/img/pf3d.png";

const ABSTRACT: &str = "Abstract";
const IMAGE_TAG: &str = "<img";
/// Image lines mentioning any of these are branding, not figures.
const EXCLUDED: [&str; 2] = ["logo", "license"];

/// Picks a representative image for a document page.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    default_image: String,
}

impl Default for ImageResolver {
    fn default() -> Self {
        ImageResolver::new(DEFAULT_IMAGE)
    }
}

impl ImageResolver {
    /// `default_image` must be non-empty; it is returned whenever the scan comes up empty.
    pub fn new(default_image: impl Into<String>) -> Self {
        ImageResolver {
            default_image: default_image.into(),
        }
    }

    /// Image URL for a page body. Never fails: a missing body or a page without usable images
    /// gives the default image.
    ///
    /// The first image found after a line mentioning "Abstract" wins. Failing that, the last
    /// image line on the page is used. Protocol-relative results get an `https:` scheme.
    pub fn resolve(&self, body: Option<&str>) -> String {
        let Some(body) = body else {
            return self.default_image.clone();
        };
        let image = scan(body);
        if image.is_empty() {
            self.default_image.clone()
        } else if !image.starts_with("http") {
            format!("https:{image}")
        } else {
            image.to_string()
        }
    }
}

fn scan(body: &str) -> &str {
    let mut seen_abstract = false;
    let mut image = "";
    for line in body.lines() {
        if line.contains(ABSTRACT) {
            seen_abstract = true;
        }
        if line.contains(IMAGE_TAG) && !EXCLUDED.iter().any(|word| line.contains(word)) {
            // A later image line without a src clears the fallback.
            image = attribute::SRC.read(line);
            if seen_abstract && !image.is_empty() {
                break;
            }
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_body_gives_default() {
        assert_eq!(ImageResolver::default().resolve(None), DEFAULT_IMAGE);
    }

    #[test]
    fn page_without_images_gives_default() {
        let body = "<html>\n<h1>Abstract</h1>\n<p>No figures.</p>\n</html>";
        assert_eq!(ImageResolver::default().resolve(Some(body)), DEFAULT_IMAGE);
    }

    #[test]
    fn first_image_after_abstract_wins() {
        let body = concat!(
            "<img src=\"https://cdn.example.com/banner.png\">\n",
            "<h2>Abstract</h2>\n",
            "<img src=\"//cdn.example.com/fig1.png\">\n",
            "<img src=\"//cdn.example.com/fig2.png\">\n",
        );
        assert_eq!(
            ImageResolver::default().resolve(Some(body)),
            "https://cdn.example.com/fig1.png"
        );
    }

    #[test]
    fn abstract_on_the_image_line_counts() {
        let body = "<div>Abstract <img src=\"https://x/fig.png\"></div>\n<img src=\"https://x/late.png\">";
        assert_eq!(ImageResolver::default().resolve(Some(body)), "https://x/fig.png");
    }

    #[test]
    fn without_abstract_last_image_is_used() {
        let body = "<img src=\"https://x/a.png\">\n<p>text</p>\n<img src=\"https://x/b.png\">\n";
        assert_eq!(ImageResolver::default().resolve(Some(body)), "https://x/b.png");
    }

    #[test]
    fn logo_and_license_lines_are_skipped() {
        let body = concat!(
            "<p>Abstract</p>\n",
            "<img class=\"logo\" src=\"https://x/logo.png\">\n",
            "<img src=\"https://x/cc.png\" alt=\"license\">\n",
            "<img src=\"https://x/figure.png\">\n",
        );
        assert_eq!(ImageResolver::default().resolve(Some(body)), "https://x/figure.png");
    }

    #[test]
    fn exclusion_is_case_sensitive() {
        let body = "<p>Abstract</p>\n<img alt=\"Logo\" src=\"https://x/Logo.png\">";
        assert_eq!(ImageResolver::default().resolve(Some(body)), "https://x/Logo.png");
    }

    #[test]
    fn sourceless_image_after_abstract_keeps_scanning() {
        let body = "<p>Abstract</p>\n<img alt=\"lazy\">\n<img src=\"/static/f.png\">";
        assert_eq!(ImageResolver::default().resolve(Some(body)), "https:/static/f.png");
    }

    #[test]
    fn trailing_sourceless_image_clears_fallback() {
        let body = "<img src=\"https://x/a.png\">\n<img alt=\"no src\">";
        assert_eq!(ImageResolver::default().resolve(Some(body)), DEFAULT_IMAGE);
    }

    #[test]
    fn custom_default() {
        let resolver = ImageResolver::new("https://example.org/placeholder.svg");
        assert_eq!(resolver.resolve(None), "https://example.org/placeholder.svg");
    }

    #[test]
    fn always_returns_something() {
        proptest::proptest!(|(body in proptest::option::of("(Abstract|<img src=\"[a-z/:.]{0,10}\">|logo|[a-z <>\"=]{0,20}|\n){0,12}"))| {
            let image = ImageResolver::default().resolve(body.as_deref());
            proptest::prop_assert!(!image.is_empty());
        })
    }
}
