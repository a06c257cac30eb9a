pub mod add;
pub mod delete;
pub mod export;
pub mod import;
pub mod list;
pub mod show;

pub use add::handle_add;
pub use delete::handle_delete;
pub use export::handle_export;
pub use import::handle_import;
pub use list::handle_list;
pub use show::handle_show;
