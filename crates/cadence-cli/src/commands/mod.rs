pub mod add;
pub mod category;
pub mod delete;
pub mod edit;
pub mod note;
pub mod range;
pub mod repair;
pub mod serve;
pub mod show;
pub mod skip;
