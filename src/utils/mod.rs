pub mod embeds;
pub mod text;
