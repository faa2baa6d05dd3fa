pub mod contact_message;
pub mod experience;
pub mod memory;
pub mod project;
pub mod skill;
pub mod sqlx_repo;
