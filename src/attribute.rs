use once_cell::sync::Lazy;
use regex::Regex;

/// `src="..."` on image tags.
pub static SRC: Lazy<TagAttribute> = Lazy::new(|| TagAttribute::new("src"));
/// `value="..."` on form inputs.
pub static VALUE: Lazy<TagAttribute> = Lazy::new(|| TagAttribute::new("value"));

/// Reads the quoted value of one attribute out of a fragment of HTML-like text.
///
/// Only the first `name="` occurrence in the fragment is looked at. An occurrence at offset 0
/// is treated as absent, so fragments that merely start with the attribute text never match.
pub struct TagAttribute {
    re: Regex,
}

impl TagAttribute {
    pub fn new(name: &str) -> Self {
        let re = Regex::new(&format!(r#"{}="([^"]*)""#, regex::escape(name)))
            .expect("escaped attribute name is a valid pattern");
        TagAttribute { re }
    }

    /// Value of the attribute, or `""` when it is missing, unterminated or at offset 0.
    pub fn read<'a>(&self, text: &'a str) -> &'a str {
        // The leftmost match is always the first occurrence: any later `name="` would supply
        // the closing quote for an earlier one.
        let Some(caps) = self.re.captures(text) else {
            return "";
        };
        match (caps.get(0), caps.get(1)) {
            (Some(whole), Some(value)) if whole.start() > 0 => value.as_str(),
            _ => "",
        }
    }
}
