// src/mailbox/mod.rs
// =============================================================================
// This module gets the message body we are asked to report.
//
// A mail client would hand us the open message; the CLI reads it from files.
// Either way the rest of the program only sees a MessageBody.
// =============================================================================

mod body;

pub use body::read_message_body;
