mod generate;
mod list;

pub use generate::{GenerateConfig, generate_code};
pub use list::{list_modules, list_operations};
