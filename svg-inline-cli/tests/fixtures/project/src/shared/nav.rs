use crate::component::Attributes;
use svg_inline_macros::generate_svg;

pub enum NavGlyph {
    Back,
    Forward,
}

/// Missing extras property.
#[generate_svg(glyph, extras)]
pub struct NavButton {
    pub glyph: NavGlyph,
    pub label: String,
}

/// Kind property is not an enum.
#[generate_svg(name, attributes)]
pub struct NamedIcon {
    pub name: String,
    pub attributes: Attributes,
}
