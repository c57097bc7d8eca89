//! Ticket Module
//! Mission: Register ticket codes and redeem them exactly once

pub mod api;
pub mod service;

pub use service::{RegisterOutcome, TicketError, TicketService, ValidateOutcome};
