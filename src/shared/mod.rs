// src/shared/mod.rs

// Helpers de desserialização numérica flexível (número ou string)
pub mod coercao;
// Acumulador de erros de validação por campo
pub mod validacao;
