pub mod contact;
pub mod experiences;
pub mod extractors;
pub mod projects;
pub mod skills;
