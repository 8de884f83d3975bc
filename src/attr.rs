//! Attribute serialization for SVG elements.
//!
//! Two layers:
//! - `AttrList`: ordered `(name, Option<value>)` pairs rendered to
//!   `name="value"` markup. A `None` value suppresses the pair entirely; an
//!   empty string does not (`name=""` is emitted). Blank names are skipped.
//! - `ExtraAttrs`: caller-supplied attributes as plain `Vec<(String, String)>`
//!   with an extension trait, appended after an element's built-in attributes.
//!
//! Values are emitted as-is: no XML escaping is performed, callers are
//! expected to hand over pre-sanitized attribute values.

/// Maximum decimal places kept when formatting coordinates and offsets.
pub const MAX_DECIMALS: usize = 3;

// =============================================================================
// AttrList
// =============================================================================

/// Ordered attribute pairs with suppression semantics.
///
/// Order is preserved exactly as pushed; callers control the final attribute
/// order of their markup.
#[derive(Debug, Default, Clone)]
pub struct AttrList {
    pairs: Vec<(String, Option<String>)>,
}

impl AttrList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Push an attribute that is always emitted.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), Some(value.into())));
    }

    /// Push an attribute that is emitted only when `value` is `Some`.
    pub fn push_opt(&mut self, name: impl Into<String>, value: Option<String>) {
        self.pairs.push((name.into(), value));
    }

    /// Push a numeric attribute formatted via [`fmt_number`].
    pub fn push_num(&mut self, name: impl Into<String>, value: f64) {
        self.push(name, fmt_number(value, MAX_DECIMALS));
    }

    /// Append caller-supplied extra attributes (always emitted).
    pub fn extend_extra(&mut self, extra: &[(String, String)]) {
        for (name, value) in extra {
            self.pairs.push((name.clone(), Some(value.clone())));
        }
    }

    /// Number of pairs pushed, including suppressed ones.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Render to `name="value"` tokens joined by single spaces.
    ///
    /// Pairs with a blank name or a `None` value are omitted. Empty-string
    /// values ARE emitted as `name=""`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.pairs {
            let Some(value) = value else { continue };
            if name.trim().is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out
    }
}

// =============================================================================
// Tag assembly
// =============================================================================

/// Render `<tag attrs/>`, collapsing to `<tag/>` when there are no attributes.
pub fn self_closing_tag(tag: &str, data: &str) -> String {
    if data.is_empty() {
        format!("<{tag}/>")
    } else {
        format!("<{tag} {data}/>")
    }
}

/// Render `<tag attrs>`, collapsing to `<tag>` when there are no attributes.
pub fn open_tag(tag: &str, data: &str) -> String {
    if data.is_empty() {
        format!("<{tag}>")
    } else {
        format!("<{tag} {data}>")
    }
}

// =============================================================================
// ExtraAttrs
// =============================================================================

/// Caller-supplied extra attributes as simple key-value pairs.
pub type ExtraAttrs = Vec<(String, String)>;

/// Extension trait for attribute operations on [`ExtraAttrs`].
pub trait AttrsExt {
    /// Get an attribute value by name.
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Check if an attribute exists.
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (insert or update). Returns the previous value.
    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String>;

    /// Remove an attribute by name, returning the old value if present.
    fn remove_attr(&mut self, name: &str) -> Option<String>;
}

impl AttrsExt for ExtraAttrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| k == &name) {
            Some(std::mem::replace(&mut attr.1, value))
        } else {
            self.push((name, value));
            None
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// URL references
// =============================================================================

/// Format an element id as a `url(#id)` reference, the form used by paint
/// attributes (`fill`, `mask`, ...) to point at a definition.
pub fn url_ref(id: &str) -> String {
    format!("url(#{id})")
}

/// True when `value` is exactly a `url(#id)` reference to `id`, modulo
/// surrounding whitespace. Substring mentions do not match.
pub(crate) fn matches_url_ref(value: &str, id: &str) -> bool {
    value
        .trim()
        .strip_prefix("url(#")
        .and_then(|rest| rest.strip_suffix(')'))
        .is_some_and(|referenced| referenced == id)
}

// =============================================================================
// Number formatting
// =============================================================================

/// Format a number with at most `max_decimals` places, stripping trailing
/// zeros and a dangling decimal point.
///
/// `33.333333` with 3 decimals becomes `"33.333"`, `33.300` becomes `"33.3"`,
/// `50.0` becomes `"50"`. Non-finite values collapse to `"0"`.
pub fn fmt_number(value: f64, max_decimals: usize) -> String {
    if !value.is_finite() {
        return String::from("0");
    }
    let mut out = format!("{value:.max_decimals$}");
    if out.contains('.') {
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out == "-0" {
        out.clear();
        out.push('0');
    }
    out
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_skips_none_and_blank_names() {
        let mut attrs = AttrList::new();
        attrs.push("x", "0");
        attrs.push_opt("y", None);
        attrs.push("", "hidden");
        attrs.push("  ", "hidden");
        attrs.push("fill", "#beeeef");
        assert_eq!(attrs.render(), "x=\"0\" fill=\"#beeeef\"");
    }

    #[test]
    fn test_render_emits_empty_string_values() {
        let mut attrs = AttrList::new();
        attrs.push("stroke", "");
        attrs.push("points", "  ");
        assert_eq!(attrs.render(), "stroke=\"\" points=\"  \"");
    }

    #[test]
    fn test_render_preserves_order() {
        let mut attrs = AttrList::new();
        attrs.push("z", "3");
        attrs.push("a", "1");
        attrs.push("m", "2");
        assert_eq!(attrs.render(), "z=\"3\" a=\"1\" m=\"2\"");
    }

    #[test]
    fn test_extend_extra() {
        let mut attrs = AttrList::new();
        attrs.push("id", "r1");
        attrs.extend_extra(&[("class".to_string(), "box".to_string())]);
        assert_eq!(attrs.render(), "id=\"r1\" class=\"box\"");
    }

    #[test]
    fn test_tag_assembly() {
        assert_eq!(self_closing_tag("rect", "x=\"0\""), "<rect x=\"0\"/>");
        assert_eq!(self_closing_tag("rect", ""), "<rect/>");
        assert_eq!(open_tag("svg", "viewBox=\"0 0 200 100\""), "<svg viewBox=\"0 0 200 100\">");
        assert_eq!(open_tag("defs", ""), "<defs>");
    }

    #[test]
    fn test_extra_attrs_operations() {
        let mut attrs: ExtraAttrs = Vec::new();

        assert_eq!(attrs.set_attr("id", "main"), None);
        assert_eq!(attrs.set_attr("class", "container"), None);
        assert_eq!(attrs.len(), 2);

        assert_eq!(attrs.get_attr("id"), Some("main"));
        assert_eq!(attrs.get_attr("href"), None);
        assert!(attrs.has_attr("id"));
        assert!(!attrs.has_attr("href"));

        // Update keeps position and returns the old value.
        assert_eq!(attrs.set_attr("class", "wrapper").as_deref(), Some("container"));
        assert_eq!(attrs.get_attr("class"), Some("wrapper"));
        assert_eq!(attrs.len(), 2);

        let removed = attrs.remove_attr("id");
        assert_eq!(removed.as_deref(), Some("main"));
        assert!(!attrs.has_attr("id"));
    }

    #[test]
    fn test_fmt_number() {
        assert_eq!(fmt_number(33.333333, 3), "33.333");
        assert_eq!(fmt_number(33.300, 3), "33.3");
        assert_eq!(fmt_number(50.0, 3), "50");
        assert_eq!(fmt_number(0.0, 3), "0");
        assert_eq!(fmt_number(0.5, 3), "0.5");
        assert_eq!(fmt_number(66.666666, 3), "66.667");
        assert_eq!(fmt_number(-12.25, 3), "-12.25");
        assert_eq!(fmt_number(f64::NAN, 3), "0");
        assert_eq!(fmt_number(f64::INFINITY, 3), "0");
    }

    #[test]
    fn test_fmt_number_negative_zero() {
        assert_eq!(fmt_number(-0.0001, 3), "0");
    }

    #[test]
    fn test_url_ref_round_trip() {
        let reference = url_ref("g1");
        assert_eq!(reference, "url(#g1)");
        assert!(matches_url_ref(&reference, "g1"));
        assert!(matches_url_ref("  url(#g1) ", "g1"));
    }

    #[test]
    fn test_matches_url_ref_rejects_other_forms() {
        assert!(!matches_url_ref("url(#g1)", "g2"));
        assert!(!matches_url_ref("#g1", "g1"));
        assert!(!matches_url_ref("g1", "g1"));
        assert!(!matches_url_ref("url(#g1) none", "g1"));
        assert!(!matches_url_ref("url(#g12)", "g1"));
    }
}
