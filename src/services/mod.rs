pub mod borrow_request_service;
pub mod invoice_service;
