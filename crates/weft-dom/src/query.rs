//! Element collection queries.

use weft_html::QuirksMode;

use crate::{DomTree, NodeId};

impl DomTree {
    /// [§ 4.2.6.2 getElementsByClassName](https://dom.spec.whatwg.org/#concept-getelementsbyclassname)
    ///
    /// "Let classes be the result of running the ordered set parser on
    /// classNames."
    /// "If classes is the empty set, return an empty HTMLCollection."
    /// "Return a HTMLCollection rooted at root, whose filter matches
    /// descendant elements that have all their classes in classes."
    ///
    /// "The comparisons for the classes must be done in an ASCII
    /// case-insensitive manner if root's node document's mode is "quirks";
    /// otherwise in an identical to manner."
    #[must_use]
    pub fn get_elements_by_class_name(&self, root: NodeId, class_names: &str) -> Vec<NodeId> {
        let wanted: Vec<&str> = class_names
            .split(|c: char| c.is_ascii_whitespace())
            .filter(|class| !class.is_empty())
            .collect();
        if wanted.is_empty() {
            return Vec::new();
        }
        let quirks = self.quirks_mode() == QuirksMode::Quirks;
        self.descendants(root)
            .filter(|&id| {
                self.as_element(id).is_some_and(|element| {
                    let classes = element.classes();
                    wanted.iter().all(|want| {
                        classes.iter().any(|class| {
                            if quirks {
                                class.eq_ignore_ascii_case(want)
                            } else {
                                class == want
                            }
                        })
                    })
                })
            })
            .collect()
    }

    /// [§ 4.2.6.2 getElementsByTagName](https://dom.spec.whatwg.org/#concept-getelementsbytagname)
    ///
    /// `"*"` matches every element. HTML elements match `qualified_name`
    /// converted to ASCII lowercase; other elements match it exactly.
    #[must_use]
    pub fn get_elements_by_tag_name(&self, root: NodeId, qualified_name: &str) -> Vec<NodeId> {
        let lowered = qualified_name.to_ascii_lowercase();
        self.descendants(root)
            .filter(|&id| {
                self.as_element(id).is_some_and(|element| {
                    qualified_name == "*"
                        || if element.namespace == weft_html::Namespace::Html {
                            element.local_name == lowered
                        } else {
                            element.local_name == qualified_name
                        }
                })
            })
            .collect()
    }

    /// [§ 4.2.4 getElementById](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    ///
    /// "The getElementById(elementId) method steps are to return the first
    /// element, in tree order, within this's descendants, whose ID is
    /// elementId; otherwise, if there is no such element, null."
    #[must_use]
    pub fn get_element_by_id(&self, root: NodeId, element_id: &str) -> Option<NodeId> {
        self.descendants(root)
            .find(|&id| self.as_element(id).and_then(|e| e.id()) == Some(element_id))
    }
}

#[cfg(test)]
mod tests {
    use crate::parse_html;

    #[test]
    fn test_class_query_matches_whole_tokens() {
        let tree = parse_html(
            r#"<div class="best blue some"><span></div><div class="red pref_best grep"></div><div class="red best grep"></div><div class="red c++ best"></div>"#,
        )
        .unwrap();
        let found = tree.get_elements_by_class_name(tree.root(), "best");
        assert_eq!(found.len(), 3);
        for id in found {
            let element = tree.as_element(id).unwrap();
            assert!(element.classes().contains(&"best"));
        }
    }

    #[test]
    fn test_class_query_requires_every_class() {
        let tree = parse_html(r#"<p class="a b"></p><p class="a"></p><p class="b a c"></p>"#).unwrap();
        assert_eq!(tree.get_elements_by_class_name(tree.root(), " b  a ").len(), 2);
        assert!(tree.get_elements_by_class_name(tree.root(), "   ").is_empty());
    }

    #[test]
    fn test_class_query_case_folds_only_in_quirks_mode() {
        let quirks = parse_html(r#"<p class="Note"></p>"#).unwrap();
        assert_eq!(quirks.get_elements_by_class_name(quirks.root(), "note").len(), 1);

        let standard = parse_html(r#"<!DOCTYPE html><p class="Note"></p>"#).unwrap();
        assert!(standard.get_elements_by_class_name(standard.root(), "note").is_empty());
    }

    #[test]
    fn test_tag_name_and_id_queries() {
        let tree = parse_html(r#"<DIV id=x><svg><foreignObject id=y></foreignObject></svg></DIV>"#).unwrap();
        assert_eq!(tree.get_elements_by_tag_name(tree.root(), "DIV").len(), 1);
        assert_eq!(tree.get_elements_by_tag_name(tree.root(), "foreignObject").len(), 1);
        assert_eq!(tree.get_elements_by_tag_name(tree.root(), "foreignobject").len(), 0);
        let y = tree.get_element_by_id(tree.root(), "y").unwrap();
        assert_eq!(tree.as_element(y).unwrap().local_name, "foreignObject");
        assert!(tree.get_element_by_id(tree.root(), "z").is_none());
    }
}
