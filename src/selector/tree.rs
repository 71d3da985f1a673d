//! Tree-pattern rules for document elements.
//!
//! These are the XPath-style patterns tried after the CSS selectors: they
//! match on substrings of attribute values rather than exact tokens, so they
//! catch generated class names such as `document-row_x81f`.

use dom_query::Selection;

use super::{utils, Rule};

/// `//div[contains(@class, 'document')]`
#[must_use]
pub fn is_document_div(sel: &Selection) -> bool {
    utils::is_tag(sel, "div") && utils::class(sel).contains("document")
}

/// `//li[contains(@role, 'listitem')]`
#[must_use]
pub fn is_listitem_li(sel: &Selection) -> bool {
    utils::is_tag(sel, "li") && utils::role(sel).contains("listitem")
}

/// `//div[contains(@data-testid, 'document')]`
#[must_use]
pub fn is_document_testid_div(sel: &Selection) -> bool {
    utils::is_tag(sel, "div") && utils::attr(sel, "data-testid").contains("document")
}

/// Tree patterns in priority order, named by the path they express.
pub const DOCUMENT_PATTERNS: &[(&str, Rule)] = &[
    ("//div[contains(@class, 'document')]", is_document_div),
    ("//li[contains(@role, 'listitem')]", is_listitem_li),
    ("//div[contains(@data-testid, 'document')]", is_document_testid_div),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::selector::{document_root, query_all};

    #[test]
    fn test_document_div_matches_substring() {
        let doc = dom::parse(
            r#"
            <div class="documents-panel">panel</div>
            <div class="row document-row_x81f">row</div>
            <span class="document">not a div</span>
        "#,
        );
        let found = query_all(&document_root(&doc), is_document_div);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_listitem_li_requires_role() {
        let doc = dom::parse(
            r#"<ul><li role="listitem">a</li><li>b</li><li role="listitem treeitem">c</li></ul>"#,
        );
        let found = query_all(&document_root(&doc), is_listitem_li);
        let texts: Vec<String> = found.iter().map(dom::trimmed_text).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[test]
    fn test_document_testid_div() {
        let doc = dom::parse(
            r#"<div data-testid="kb-document-3">x</div><div data-testid="header">y</div>"#,
        );
        let found = query_all(&document_root(&doc), is_document_testid_div);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_patterns_are_ordered() {
        let names: Vec<&str> = DOCUMENT_PATTERNS.iter().map(|(name, _)| *name).collect();
        assert!(names[0].contains("@class"));
        assert!(names[1].starts_with("//li"));
        assert_eq!(names.len(), 3);
    }
}
