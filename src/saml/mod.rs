pub mod assertion;
pub mod roles;
