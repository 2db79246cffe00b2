//! ClearHome Lead Intake Library
//!
//! Server side of the ClearHome landing page contact form: validates a lead,
//! checks its reCAPTCHA token and forwards it to the operator as an e-mail
//! through Resend.
//!
//! # Modules
//!
//! - `app`: Router assembly and middleware.
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers and shared state.
//! - `models`: Request, response and provider data models.
//! - `notification`: Notification e-mail composition.
//! - `recaptcha`: reCAPTCHA verification client and score policy.
//! - `resend`: Resend e-mail delivery client.
//! - `validation`: Contact form validation.

pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notification;
pub mod recaptcha;
pub mod resend;
pub mod validation;
