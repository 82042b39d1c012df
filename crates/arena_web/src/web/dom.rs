use arena::render::{Fragment, Node};
use arena::{ButtonView, ElementId, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, DocumentFragment, Element, HtmlButtonElement};

/// The page template's DOM. Writes to elements the template lacks are
/// skipped.
pub(crate) struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub(crate) fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.document.get_element_by_id(id.as_str())
    }

    fn build(&self, node: &Node) -> Result<Element, JsValue> {
        let el = self.document.create_element(node.tag)?;
        el.set_class_name(node.class);
        if let Some(text) = &node.text {
            el.set_text_content(Some(text));
        }
        for child in &node.children {
            el.append_child(&self.build(child)?)?;
        }
        Ok(el)
    }

    /// Builds `content` off-document. Nodes that fail to build or append are
    /// logged and left out; returns how many were.
    fn detached(&self, content: &Fragment) -> (DocumentFragment, usize) {
        let fragment = self.document.create_document_fragment();
        let mut skipped = 0;
        for node in content.nodes() {
            let appended = self
                .build(node)
                .and_then(|el| fragment.append_child(&el));
            if let Err(e) = appended {
                skipped += 1;
                web_sys::console::warn_2(
                    &format!("arena: dropped <{}> from fragment", node.tag).into(),
                    &e,
                );
            }
        }
        (fragment, skipped)
    }
}

impl Surface for DomSurface {
    fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn replace_children(&mut self, id: ElementId, content: Fragment) {
        let Some(target) = self.element(id) else {
            return;
        };
        let (fragment, _) = self.detached(&content);
        target.replace_children_with_node_1(&fragment);
    }

    fn scroll_to_end(&mut self, id: ElementId) {
        if let Some(el) = self.element(id) {
            el.set_scroll_top(el.scroll_height());
        }
    }

    fn apply_button(&mut self, id: ElementId, view: &ButtonView) {
        let Some(button) = self
            .element(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
        else {
            return;
        };
        button.set_disabled(!view.enabled);
        button.set_text_content(Some(view.label));
    }

    fn notify(&mut self, notice: &str) {
        let shown = web_sys::window().map(|w| w.alert_with_message(notice).is_ok());
        if shown != Some(true) {
            web_sys::console::warn_1(&format!("arena: {notice}").into());
        }
    }
}
