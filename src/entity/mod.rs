pub mod borrow_requests;
pub mod invoices;

pub use borrow_requests::Entity as BorrowRequests;
pub use invoices::Entity as Invoices;
