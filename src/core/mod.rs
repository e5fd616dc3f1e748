pub mod catalog;
pub mod comment;
pub mod due;
pub mod label;
pub mod link;
pub mod project;
pub mod row;
pub mod task;
