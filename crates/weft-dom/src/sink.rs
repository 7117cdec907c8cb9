//! [`TreeSink`] implementation for the arena tree.

use log::trace;
use weft_common::{Result, Status};
use weft_html::{NodeOrText, QuirksMode, TreeSink};
use weft_html::tree_builder::{ElementAttribute, Namespace};

use crate::{DomTree, ElementData, NodeId, NodeType};

impl DomTree {
    /// Append `data` to the text node `id`, if `id` is one.
    fn append_to_text(&mut self, id: Option<NodeId>, data: &str) -> Result<bool> {
        let Some(id) = id else {
            return Ok(false);
        };
        match self.get_mut(id).map(|node| &mut node.node_type) {
            Some(NodeType::Text(existing)) => {
                Status::reserve_str(existing, data.len())?;
                existing.push_str(data);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl TreeSink for DomTree {
    type Handle = NodeId;

    fn document(&self) -> NodeId {
        self.root()
    }

    fn create_element(
        &mut self,
        namespace: Namespace,
        name: &str,
        attributes: Vec<ElementAttribute>,
    ) -> Result<NodeId> {
        // [§ 4.12.3](https://html.spec.whatwg.org/multipage/scripting.html#template-contents)
        // "each template element has an associated DocumentFragment object that is
        // its template contents."
        let template_contents = if namespace == Namespace::Html && name == "template" {
            Some(self.alloc(NodeType::DocumentFragment)?)
        } else {
            None
        };
        trace!(target: "dom", "create <{namespace}:{name}>");
        self.alloc(NodeType::Element(ElementData {
            namespace,
            local_name: name.to_string(),
            attributes,
            template_contents,
        }))
    }

    fn create_comment(&mut self, data: &str) -> Result<NodeId> {
        self.alloc(NodeType::Comment(data.to_string()))
    }

    fn append_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> Result<()> {
        let doctype = self.alloc(NodeType::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        })?;
        self.append_child(NodeId::ROOT, doctype);
        Ok(())
    }

    fn append(&mut self, parent: &NodeId, child: NodeOrText<NodeId>) -> Result<()> {
        match child {
            NodeOrText::Node(node) => {
                self.append_child(*parent, node);
                Ok(())
            }
            NodeOrText::Text(data) => {
                if self.append_to_text(self.last_child(*parent), &data)? {
                    return Ok(());
                }
                let text = self.alloc(NodeType::Text(data))?;
                self.append_child(*parent, text);
                Ok(())
            }
        }
    }

    fn insert_before(&mut self, sibling: &NodeId, child: NodeOrText<NodeId>) -> Result<()> {
        let Some(parent) = self.parent(*sibling) else {
            return Ok(());
        };
        match child {
            NodeOrText::Node(node) => {
                Self::insert_before(self, parent, node, *sibling);
                Ok(())
            }
            NodeOrText::Text(data) => {
                if self.append_to_text(self.prev_sibling(*sibling), &data)? {
                    return Ok(());
                }
                let text = self.alloc(NodeType::Text(data))?;
                Self::insert_before(self, parent, text, *sibling);
                Ok(())
            }
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent(self, *node)
    }

    fn template_contents(&self, template: &NodeId) -> NodeId {
        self.as_element(*template)
            .and_then(|element| element.template_contents)
            .unwrap_or(*template)
    }

    fn add_attributes_if_missing(
        &mut self,
        target: &NodeId,
        attributes: Vec<ElementAttribute>,
    ) -> Result<()> {
        let Some(element) = self.as_element_mut(*target) else {
            return Ok(());
        };
        for attribute in attributes {
            if element
                .attributes
                .iter()
                .any(|existing| existing.name == attribute.name)
            {
                continue;
            }
            Status::reserve(&mut element.attributes, 1)?;
            element.attributes.push(attribute);
        }
        Ok(())
    }

    fn remove_from_parent(&mut self, target: &NodeId) -> Result<()> {
        self.detach(*target);
        Ok(())
    }

    fn reparent_children(&mut self, node: &NodeId, new_parent: &NodeId) -> Result<()> {
        self.move_children(*node, *new_parent);
        Ok(())
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }
}
