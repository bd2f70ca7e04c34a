//! A marked component and a hand-written dispatch in the generated shape.

use std::collections::HashMap;

use svg_inline_macros::generate_svg;

pub trait Component {
    fn build_render_tree(&self, builder: &mut RenderTreeBuilder);
}

#[derive(Default)]
pub struct RenderTreeBuilder {
    pub output: String,
}

impl RenderTreeBuilder {
    pub fn open_element(&mut self, name: &str) {
        self.output.push_str(name);
    }

    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.output.push_str(name);
        self.output.push_str(value);
    }

    pub fn add_markup_content(&mut self, markup: &str) {
        self.output.push_str(markup);
    }

    pub fn close_element(&mut self) {}
}

pub enum IconKind {
    Home,
}

#[generate_svg(kind, attributes)]
pub struct Icon {
    pub kind: IconKind,
    pub attributes: HashMap<String, String>,
}

#[generate_svg("kind", "attributes")]
pub struct OptionalIcon {
    pub kind: IconKind,
    pub attributes: Option<HashMap<String, String>>,
}

impl Component for Icon {
    fn build_render_tree(&self, builder: &mut RenderTreeBuilder) {
        match self.kind {
            IconKind::Home => {
                builder.open_element("svg");
                builder.add_attribute("viewBox", "0 0 24 24");
                let extras = &self.attributes;
                for (name, value) in extras.iter() {
                    builder.add_attribute(name, value);
                }
                builder.add_markup_content("<path d=\"M3 9\"/>");
                builder.close_element();
            }
        }
    }
}

fn main() {
    let icon = Icon {
        kind: IconKind::Home,
        attributes: HashMap::new(),
    };
    let optional = OptionalIcon {
        kind: IconKind::Home,
        attributes: None,
    };
    let mut builder = RenderTreeBuilder::default();
    icon.build_render_tree(&mut builder);
    assert!(builder.output.starts_with("svg"));
    let _ = (optional.kind, optional.attributes);
}
