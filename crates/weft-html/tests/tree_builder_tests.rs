//! Integration tests for the tree builder against a minimal recording sink.

use weft_common::{Result, Status};
use weft_html::tree_builder::{ElementAttribute, InsertionMode, Namespace, NodeOrText, TreeSink};
use weft_html::{HtmlParser, QuirksMode, TreeBuilderError, TreeBuilderOptions, TokenizerOptions};

/// A node in the recording sink.
#[derive(Debug, Default)]
struct Node {
    name: String,
    text: String,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Helper sink: a flat node list, optionally failing after `budget` nodes.
#[derive(Debug)]
struct Recorder {
    nodes: Vec<Node>,
    budget: Option<usize>,
    quirks_mode: Option<QuirksMode>,
}

impl Recorder {
    fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: "#document".to_string(),
                ..Node::default()
            }],
            budget: None,
            quirks_mode: None,
        }
    }

    fn add(&mut self, name: &str, text: &str) -> Result<usize> {
        if self.budget.is_some_and(|budget| self.nodes.len() >= budget) {
            return Err(Status::MemoryAllocation);
        }
        self.nodes.push(Node {
            name: name.to_string(),
            text: text.to_string(),
            ..Node::default()
        });
        Ok(self.nodes.len() - 1)
    }

    fn detach(&mut self, node: usize) {
        if let Some(parent) = self.nodes[node].parent.take() {
            self.nodes[parent].children.retain(|&c| c != node);
        }
    }

    /// Names of the element path, `html > body > p` style, to the first
    /// node called `name`.
    fn path_to(&self, name: &str) -> Vec<&str> {
        let Some(mut node) = self.nodes.iter().position(|n| n.name == name) else {
            return Vec::new();
        };
        let mut path = vec![self.nodes[node].name.as_str()];
        while let Some(parent) = self.nodes[node].parent {
            if parent == 0 {
                break;
            }
            path.push(self.nodes[parent].name.as_str());
            node = parent;
        }
        path.reverse();
        path
    }

    fn text_in(&self, name: &str) -> String {
        let Some(node) = self.nodes.iter().position(|n| n.name == name) else {
            return String::new();
        };
        self.nodes[node]
            .children
            .iter()
            .map(|&c| self.nodes[c].text.as_str())
            .collect()
    }
}

impl TreeSink for Recorder {
    type Handle = usize;

    fn document(&self) -> usize {
        0
    }

    fn create_element(
        &mut self,
        namespace: Namespace,
        name: &str,
        _attributes: Vec<ElementAttribute>,
    ) -> Result<usize> {
        let name = if namespace == Namespace::Html {
            name.to_string()
        } else {
            format!("{namespace} {name}")
        };
        self.add(&name, "")
    }

    fn create_comment(&mut self, data: &str) -> Result<usize> {
        self.add("#comment", data)
    }

    fn append_doctype(&mut self, name: &str, _public_id: &str, _system_id: &str) -> Result<()> {
        let doctype = self.add("#doctype", name)?;
        self.append(&0, NodeOrText::Node(doctype))
    }

    fn append(&mut self, parent: &usize, child: NodeOrText<usize>) -> Result<()> {
        let child = match child {
            NodeOrText::Node(node) => node,
            NodeOrText::Text(text) => self.add("#text", &text)?,
        };
        self.detach(child);
        self.nodes[child].parent = Some(*parent);
        self.nodes[*parent].children.push(child);
        Ok(())
    }

    fn insert_before(&mut self, sibling: &usize, child: NodeOrText<usize>) -> Result<()> {
        let child = match child {
            NodeOrText::Node(node) => node,
            NodeOrText::Text(text) => self.add("#text", &text)?,
        };
        self.detach(child);
        let Some(parent) = self.nodes[*sibling].parent else {
            return Ok(());
        };
        let index = self.nodes[parent]
            .children
            .iter()
            .position(|c| c == sibling)
            .unwrap_or(0);
        self.nodes[parent].children.insert(index, child);
        self.nodes[child].parent = Some(parent);
        Ok(())
    }

    fn parent(&self, node: &usize) -> Option<usize> {
        self.nodes[*node].parent
    }

    fn template_contents(&self, template: &usize) -> usize {
        *template
    }

    fn add_attributes_if_missing(
        &mut self,
        _target: &usize,
        _attributes: Vec<ElementAttribute>,
    ) -> Result<()> {
        Ok(())
    }

    fn remove_from_parent(&mut self, target: &usize) -> Result<()> {
        self.detach(*target);
        Ok(())
    }

    fn reparent_children(&mut self, node: &usize, new_parent: &usize) -> Result<()> {
        let children = std::mem::take(&mut self.nodes[*node].children);
        for child in children {
            self.nodes[child].parent = Some(*new_parent);
            self.nodes[*new_parent].children.push(child);
        }
        Ok(())
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = Some(mode);
    }
}

fn parse(html: &str) -> (Recorder, Vec<TreeBuilderError>) {
    let mut parser = HtmlParser::new(Recorder::new());
    parser.feed_str(html).unwrap();
    let document = parser.finish().unwrap();
    let errors = document.tree_errors.iter().map(|e| e.code).collect();
    (document.sink, errors)
}

#[test_log::test]
fn test_implied_elements() {
    let (tree, errors) = parse("<p>x");
    assert_eq!(tree.path_to("p"), vec!["html", "body", "p"]);
    assert_eq!(tree.quirks_mode, Some(QuirksMode::Quirks));
    assert_eq!(errors, vec![TreeBuilderError::UnexpectedTokenInInitialMode]);
}

#[test]
fn test_title_switches_tokenizer_to_rcdata() {
    let (tree, errors) = parse("<!DOCTYPE html><title>a<b>&amp;</title>");
    assert_eq!(tree.path_to("title"), vec!["html", "head", "title"]);
    assert_eq!(tree.text_in("title"), "a<b>&");
    assert!(errors.is_empty());
}

#[test]
fn test_script_switches_tokenizer_to_script_data() {
    let (tree, _) = parse("<!DOCTYPE html><script>if (a</scriptx>b) {}</script>");
    assert_eq!(tree.text_in("script"), "if (a</scriptx>b) {}");
}

#[test]
fn test_leading_newline_in_pre_is_dropped() {
    let (tree, _) = parse("<!DOCTYPE html><pre>\n\nx</pre>");
    assert_eq!(tree.text_in("pre"), "\nx");

    let mut parser = HtmlParser::new(Recorder::new());
    parser.feed_str("<!DOCTYPE html><textarea>").unwrap();
    parser.feed_str("\nx</textarea>").unwrap();
    let document = parser.finish().unwrap();
    assert_eq!(document.sink.text_in("textarea"), "x");
}

#[test]
fn test_self_closing_non_void_is_an_error() {
    let (tree, errors) = parse("<!DOCTYPE html><div/>x<br/>");
    assert_eq!(tree.text_in("div"), "x");
    assert_eq!(
        errors,
        vec![
            TreeBuilderError::NonVoidHtmlElementStartTagWithTrailingSolidus,
            // The div is still open at the end of the input.
            TreeBuilderError::UnexpectedEndOfFile,
        ]
    );
}

#[test]
fn test_svg_self_closing_is_acknowledged() {
    let (tree, errors) = parse("<!DOCTYPE html><svg><circle/></svg><math/>");
    assert_eq!(tree.path_to("svg circle"), vec!["html", "body", "svg svg", "svg circle"]);
    assert!(errors.is_empty());
}

#[test]
fn test_noscript_depends_on_scripting_flag() {
    let html = "<!DOCTYPE html><head><noscript><p>x</p></noscript>";
    let (tree, _) = parse(html);
    assert_eq!(tree.path_to("p"), vec!["html", "body", "p"]);

    let options = TreeBuilderOptions::default().with_scripting(true);
    let mut parser =
        HtmlParser::with_options(Recorder::new(), TokenizerOptions::default(), options);
    parser.feed_str(html).unwrap();
    let document = parser.finish().unwrap();
    assert_eq!(document.sink.text_in("noscript"), "<p>x</p>");
}

#[test]
fn test_insertion_mode_after_parse() {
    let mut parser = HtmlParser::new(Recorder::new());
    parser.feed_str("<!DOCTYPE html><table><tr><td>").unwrap();
    assert_eq!(parser.tree_builder().insertion_mode(), InsertionMode::InCell);
    parser.feed_str("</td></tr></table><frameset>").unwrap();
    assert_eq!(parser.tree_builder().insertion_mode(), InsertionMode::InBody);
}

#[test]
fn test_frameset_replaces_body_when_allowed() {
    let (tree, _) = parse("<!DOCTYPE html><frameset><frame></frameset>");
    assert_eq!(tree.path_to("frame"), vec!["html", "frameset", "frame"]);
}

#[test]
fn test_sink_failure_stops_parsing() {
    let mut recorder = Recorder::new();
    recorder.budget = Some(3);
    let mut parser = HtmlParser::new(recorder);
    assert_eq!(
        parser.feed_str("<!DOCTYPE html><p>a</p><p>b</p>"),
        Err(Status::MemoryAllocation)
    );
    assert!(parser.feed_str("more").is_err());
}

#[test]
fn test_quirks_override() {
    let options = TreeBuilderOptions::default().with_quirks_mode(QuirksMode::LimitedQuirks);
    let mut parser =
        HtmlParser::with_options(Recorder::new(), TokenizerOptions::default(), options);
    parser.feed_str("<!DOCTYPE html>").unwrap();
    let document = parser.finish().unwrap();
    assert_eq!(document.quirks_mode, QuirksMode::LimitedQuirks);
}
