// Company module
// Models, resolver and HTTP handlers for company CRUD

pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::{
    create_company_handler, delete_company_handler, get_company_handler,
    missing_company_id_handler, update_company_handler,
};
pub use models::{Company, CompanyInput, CompanyRequest, CompanyType};
pub use service::CompanyService;
