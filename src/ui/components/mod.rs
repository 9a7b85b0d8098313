pub mod layout;
pub mod nav_bar;
pub mod text_input;
