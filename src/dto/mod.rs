pub mod borrow_requests;
pub mod invoices;
