pub mod card;
pub mod help_overlay;
