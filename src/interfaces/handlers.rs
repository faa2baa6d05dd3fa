pub mod contact_messages;
pub mod envelope;
pub mod experiences;
pub mod home;
pub mod projects;
pub mod skills;
pub mod system;
