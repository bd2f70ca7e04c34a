use std::collections::HashMap;

pub trait Component {
    fn build_render_tree(&self, builder: &mut RenderTreeBuilder);
}

#[derive(Debug, Default)]
pub struct RenderTreeBuilder {
    pub output: String,
}

impl RenderTreeBuilder {
    pub fn open_element(&mut self, name: &str) {
        self.output.push('<');
        self.output.push_str(name);
    }

    pub fn add_attribute(&mut self, name: &str, value: &str) {
        self.output.push_str(&format!(" {name}=\"{value}\""));
    }

    pub fn add_content(&mut self, text: &str) {
        self.output.push('>');
        self.output.push_str(text);
    }

    pub fn add_markup_content(&mut self, markup: &str) {
        self.output.push('>');
        self.output.push_str(markup);
    }

    pub fn close_element(&mut self) {
        self.output.push_str("</>");
    }
}

pub type Attributes = HashMap<String, String>;
