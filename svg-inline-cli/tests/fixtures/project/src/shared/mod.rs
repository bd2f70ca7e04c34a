pub mod icons;
pub mod nav;
