//! Domain types of the 3-D Secure payment workflow and the ports through
//! which it reaches the payment gateway.

pub mod address;
pub mod card;
pub mod gateway;
pub mod lookup;
pub mod payment;
pub mod ports;
