//! JSON adapters for the command line: checkout forms in, payment reports out.

pub mod checkout_reader;
pub mod report_writer;
