pub mod audit_logs;
pub mod categories;
pub mod contents;
pub mod inquiries;
pub mod products;
pub mod sub_subcategories;
pub mod subcategories;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use contents::Entity as Contents;
pub use inquiries::Entity as Inquiries;
pub use products::Entity as Products;
pub use sub_subcategories::Entity as SubSubcategories;
pub use subcategories::Entity as Subcategories;
pub use users::Entity as Users;
