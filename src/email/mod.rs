// src/email/mod.rs

// Contrato de envio de e-mail e a implementação SMTP
pub mod notificador;
