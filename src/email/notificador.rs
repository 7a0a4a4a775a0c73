// src/email/notificador.rs

use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::config::AppConfig;
use crate::erros::ApiError;

/// Falha no envio de e-mail. Nunca é convertida em resposta HTTP
/// diretamente: cada chamador decide se propaga (recuperação de senha)
/// ou apenas registra (notificação de status de pedido).
#[derive(Debug, Error)]
pub enum ErroNotificacao {
    #[error("endereço de e-mail inválido: {0}")]
    Endereco(#[from] lettre::address::AddressError),

    #[error("falha ao montar a mensagem: {0}")]
    Mensagem(#[from] lettre::error::Error),

    #[error("falha no envio SMTP: {0}")]
    Transporte(#[from] lettre::transport::smtp::Error),
}

/// Contrato do transporte de saída de e-mail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notificador: Send + Sync {
    async fn enviar(
        &self,
        para: &str,
        assunto: &str,
        texto: &str,
        html: &str,
    ) -> Result<(), ErroNotificacao>;
}

/// Implementação SMTP (porta 587 sem TLS implícito, como o sandbox do
/// Mailtrap usado em desenvolvimento).
pub struct NotificadorSmtp {
    transporte: AsyncSmtpTransport<Tokio1Executor>,
    remetente: Mailbox,
}

impl NotificadorSmtp {
    pub fn novo(config: &AppConfig) -> Result<Self, ApiError> {
        let remetente: Mailbox = config
            .smtp_from
            .parse()
            .map_err(|e| ApiError::Configuracao(format!("SMTP_FROM inválido: {e}")))?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port);
        if !config.smtp_user.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_pass.clone(),
            ));
        }

        Ok(Self {
            transporte: builder.build(),
            remetente,
        })
    }
}

#[async_trait]
impl Notificador for NotificadorSmtp {
    async fn enviar(
        &self,
        para: &str,
        assunto: &str,
        texto: &str,
        html: &str,
    ) -> Result<(), ErroNotificacao> {
        let mensagem = Message::builder()
            .from(self.remetente.clone())
            .to(para.parse()?)
            .subject(assunto)
            .multipart(MultiPart::alternative_plain_html(
                texto.to_string(),
                html.to_string(),
            ))?;

        self.transporte.send(mensagem).await?;
        tracing::info!(para, assunto, "e-mail enviado");
        Ok(())
    }
}
