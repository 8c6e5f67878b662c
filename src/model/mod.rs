pub mod project;
pub mod work_item;
