//! Integration tests for pdfmix.
//!
//! These tests run whole operations against PDFs generated in a scratch
//! directory and read the results back from disk.
