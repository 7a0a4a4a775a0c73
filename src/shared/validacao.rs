// src/shared/validacao.rs

use crate::erros::{ApiError, ErroCampo};

/// Acumulador de erros de validação. As rotas validam o corpo inteiro
/// antes de qualquer acesso ao banco e devolvem todos os problemas de
/// uma vez, campo a campo.
#[derive(Default)]
pub struct Validador {
    erros: Vec<ErroCampo>,
}

impl Validador {
    pub fn novo() -> Self {
        Self::default()
    }

    pub fn erro(&mut self, campo: &str, mensagem: &str) {
        self.erros.push(ErroCampo {
            campo: campo.to_string(),
            mensagem: mensagem.to_string(),
        });
    }

    /// Exige um mínimo de caracteres (equivalente ao `min` dos schemas).
    pub fn min_caracteres(&mut self, campo: &str, valor: &str, min: usize) {
        if valor.chars().count() < min {
            self.erro(
                campo,
                &format!("deve possuir, no mínimo, {min} caracteres"),
            );
        }
    }

    /// Verificação de forma de e-mail. A unicidade é garantida pelo banco.
    pub fn email(&mut self, campo: &str, valor: &str) {
        let partes: Vec<&str> = valor.split('@').collect();
        let valido = partes.len() == 2
            && !partes[0].is_empty()
            && partes[1].contains('.')
            && !partes[1].starts_with('.')
            && !partes[1].ends_with('.');
        if !valido {
            self.erro(campo, "E-mail inválido");
        }
    }

    /// Senha com no mínimo 8 caracteres, uma maiúscula e um caractere especial.
    pub fn senha_forte(&mut self, campo: &str, valor: &str) {
        if valor.chars().count() < 8 {
            self.erro(campo, "A senha deve ter no mínimo 8 caracteres");
        }
        if !valor.chars().any(|c| c.is_ascii_uppercase()) {
            self.erro(campo, "A senha deve conter pelo menos uma letra maiúscula");
        }
        if !valor.chars().any(|c| !c.is_ascii_alphanumeric()) {
            self.erro(campo, "A senha deve conter pelo menos um caractere especial");
        }
    }

    /// Telefone com apenas dígitos, entre 10 e 11 posições.
    pub fn telefone(&mut self, campo: &str, valor: &str) {
        let tamanho_ok = (10..=11).contains(&valor.chars().count());
        if !tamanho_ok || !valor.chars().all(|c| c.is_ascii_digit()) {
            self.erro(
                campo,
                "Telefone deve conter apenas números e ter entre 10 e 11 dígitos",
            );
        }
    }

    pub fn finalizar(self) -> Result<(), ApiError> {
        if self.erros.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validacao(self.erros))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn so_erros(v: Validador) -> Vec<ErroCampo> {
        match v.finalizar() {
            Ok(()) => vec![],
            Err(ApiError::Validacao(erros)) => erros,
            Err(outro) => panic!("erro inesperado: {outro}"),
        }
    }

    #[test]
    fn acumula_erros_de_varios_campos() {
        let mut v = Validador::novo();
        v.min_caracteres("nome", "a", 2);
        v.email("email", "sem-arroba");
        let erros = so_erros(v);
        assert_eq!(erros.len(), 2);
        assert_eq!(erros[0].campo, "nome");
        assert_eq!(erros[1].campo, "email");
    }

    #[test]
    fn corpo_valido_passa() {
        let mut v = Validador::novo();
        v.min_caracteres("nome", "Maria", 2);
        v.email("email", "maria@exemplo.com.br");
        v.senha_forte("senha", "Segredo@123");
        v.telefone("telefone", "11987654321");
        assert!(v.finalizar().is_ok());
    }

    #[test]
    fn senha_fraca_gera_todas_as_mensagens() {
        let mut v = Validador::novo();
        v.senha_forte("senha", "abc");
        let erros = so_erros(v);
        assert_eq!(erros.len(), 3);
    }

    #[test]
    fn telefone_com_letras_ou_curto_falha() {
        let mut v = Validador::novo();
        v.telefone("telefone", "11abc");
        assert_eq!(so_erros(v).len(), 1);

        let mut v = Validador::novo();
        v.telefone("telefone", "119876543210000");
        assert_eq!(so_erros(v).len(), 1);
    }
}
