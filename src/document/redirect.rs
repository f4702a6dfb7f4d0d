use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

use crate::{attribute, document::read_document, fetch::Fetcher};

/// Hidden form field some publishers use to bounce the client to the real landing page.
pub const REDIRECT_MARKER: &str = r#"<input type="hidden" name="redirectURL"#;

/// Redirect forms followed per document. A target page that redirects again is scanned as is.
const MAX_HOPS: usize = 1;

/// Decoded redirect target announced by `body`, if any.
pub fn redirect_target(body: &str) -> Option<String> {
    let start = body.find(REDIRECT_MARKER)?;
    let encoded = attribute::VALUE.read(&body[start + REDIRECT_MARKER.len()..]);
    let target = percent_decode_str(encoded).decode_utf8_lossy().into_owned();
    (!target.is_empty()).then_some(target)
}

/// Body to scan for an image: `body` itself, or the page its redirect form points at.
///
/// A redirect target that cannot be read yields `None`, which the image scan treats like any
/// other missing page.
pub fn resolve<F: Fetcher>(fetcher: &F, body: Option<String>) -> Option<String> {
    let mut body = body;
    for _ in 0..MAX_HOPS {
        let Some(target) = body.as_deref().and_then(redirect_target) else {
            break;
        };
        debug!(url = %target, "following redirect form");
        body = match read_document(fetcher, &target) {
            Ok(next) => Some(next),
            Err(e) => {
                warn!(error = %e, "redirect target unreadable");
                None
            }
        };
    }
    body
}
