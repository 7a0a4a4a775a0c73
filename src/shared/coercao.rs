// src/shared/coercao.rs

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};

// Os clientes enviam quantidades ora como número JSON, ora como string
// ("2" em vez de 2). Estes helpers aceitam as duas formas, para uso com
// `#[serde(deserialize_with = ...)]`.

#[derive(Deserialize)]
#[serde(untagged)]
enum NumeroOuTexto {
    Numero(serde_json::Number),
    Texto(String),
}

fn numero_para_i32(valor: &NumeroOuTexto) -> Option<i32> {
    match valor {
        NumeroOuTexto::Numero(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        NumeroOuTexto::Texto(t) => t.trim().parse::<i32>().ok(),
    }
}

fn numero_para_decimal(valor: &NumeroOuTexto) -> Option<BigDecimal> {
    match valor {
        NumeroOuTexto::Numero(n) => BigDecimal::from_str(&n.to_string()).ok(),
        NumeroOuTexto::Texto(t) => BigDecimal::from_str(t.trim()).ok(),
    }
}

/// Desserializa um inteiro que pode chegar como número ou string.
pub fn inteiro_flexivel<'de, D>(d: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let valor = NumeroOuTexto::deserialize(d)?;
    numero_para_i32(&valor).ok_or_else(|| serde::de::Error::custom("deve ser um número inteiro"))
}

/// Variante opcional de [`inteiro_flexivel`], para campos de PATCH.
/// Usar junto com `#[serde(default)]`: campo ausente ou nulo vira `None`.
pub fn inteiro_flexivel_opcional<'de, D>(d: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumeroOuTexto>::deserialize(d)? {
        None => Ok(None),
        Some(valor) => numero_para_i32(&valor)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("deve ser um número inteiro")),
    }
}

/// Desserializa um decimal (quantidades fracionadas do carrinho) que pode
/// chegar como número ou string.
pub fn decimal_flexivel<'de, D>(d: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let valor = NumeroOuTexto::deserialize(d)?;
    numero_para_decimal(&valor).ok_or_else(|| serde::de::Error::custom("deve ser um número"))
}
