use crate::component::Attributes;
use svg_inline_macros::generate_svg;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconKind {
    Home,
    LayoutList,
    Plus,
}

#[generate_svg(kind, attributes)]
pub struct Icon {
    pub kind: IconKind,
    pub attributes: Attributes,
}

#[generate_svg(kind, attributes)]
pub struct OptionalIcon {
    pub kind: IconKind,
    pub attributes: Option<Attributes>,
}
