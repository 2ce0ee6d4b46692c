//! `SeaORM` entity definitions.

pub mod application_documents;
pub mod applications;
pub mod companies;
pub mod offers;
pub mod sea_orm_active_enums;
pub mod users;
