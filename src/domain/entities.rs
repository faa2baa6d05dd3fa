pub mod contact_message;
pub mod experience;
pub mod list_field;
pub mod project;
pub mod skill;
