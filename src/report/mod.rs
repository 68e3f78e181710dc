pub mod html;
pub mod model;
pub mod parser;
pub mod summary;
pub mod terminal;
