//! Supporting-document (cédula) checks run before an acta is persisted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::AppError;

const USER_AGENT: &str = concat!("actas/", env!("CARGO_PKG_VERSION"));

/// Cross-checks a participant's RUT against the serial number of their cédula.
/// Returns one message per failure; empty means the document checks out.
#[allow(async_fn_in_trait)]
pub trait DocumentVerifier {
    async fn verify(&self, rut: &str, serie: Option<&str>) -> Vec<String>;
}

/// Local format check only: 9 digits (current cédula) or a letter followed by
/// 9 digits (older documents). Dots are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialFormatVerifier;

impl SerialFormatVerifier {
    pub fn check(&self, rut: &str, serie: Option<&str>) -> Vec<String> {
        let Some(serie) = serie.map(str::trim).filter(|s| !s.is_empty()) else {
            return vec![format!("Falta el número de serie de la cédula del RUT {rut}.")];
        };
        if is_well_formed_serial(serie) {
            Vec::new()
        } else {
            vec![format!("Número de serie de la cédula del RUT {rut} es inválido.")]
        }
    }
}

impl DocumentVerifier for SerialFormatVerifier {
    async fn verify(&self, rut: &str, serie: Option<&str>) -> Vec<String> {
        self.check(rut, serie)
    }
}

fn is_well_formed_serial(serie: &str) -> bool {
    let compact: String = serie.chars().filter(|c| *c != '.').collect();
    let digits = match compact.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => &compact[1..],
        _ => compact.as_str(),
    };
    digits.len() == 9 && digits.chars().all(|c| c.is_ascii_digit())
}

#[derive(Serialize)]
struct RegistryRequest<'a> {
    rut: &'a str,
    serie: &'a str,
}

#[derive(Deserialize)]
struct RegistryReply {
    vigente: bool,
}

/// Format check, then a lookup against the document registry endpoint.
#[derive(Debug, Clone)]
pub struct RegistryVerifier {
    http: reqwest::Client,
    url: String,
}

impl RegistryVerifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Registry(e.to_string()))?;
        Ok(Self { http, url: url.into() })
    }

    async fn lookup(&self, rut: &str, serie: &str) -> Result<bool, AppError> {
        let response = self
            .http
            .post(&self.url)
            .json(&RegistryRequest { rut, serie })
            .send()
            .await
            .map_err(|e| AppError::Registry(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Registry(format!("registry answered {}", response.status())));
        }

        let reply: RegistryReply = response
            .json()
            .await
            .map_err(|e| AppError::Registry(format!("unreadable registry reply: {e}")))?;
        Ok(reply.vigente)
    }
}

impl DocumentVerifier for RegistryVerifier {
    async fn verify(&self, rut: &str, serie: Option<&str>) -> Vec<String> {
        let errors = SerialFormatVerifier.check(rut, serie);
        if !errors.is_empty() {
            return errors;
        }
        let serie = serie.unwrap_or_default().trim();

        match self.lookup(rut, serie).await {
            Ok(true) => Vec::new(),
            Ok(false) => vec![format!(
                "La cédula del RUT {rut} no está vigente o no corresponde al número de serie."
            )],
            Err(e) => {
                log::warn!("Document lookup failed: {e}");
                vec![format!("No fue posible verificar la cédula del RUT {rut}.")]
            }
        }
    }
}

/// The verifier selected by configuration.
#[derive(Debug, Clone)]
pub enum CedulaVerifier {
    FormatOnly(SerialFormatVerifier),
    Registry(RegistryVerifier),
}

impl CedulaVerifier {
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        match &config.registro_civil_url {
            Some(url) => {
                log::info!("Checking cédulas against {url}");
                Ok(CedulaVerifier::Registry(RegistryVerifier::new(
                    url.clone(),
                    config.registro_civil_timeout,
                )?))
            }
            None => {
                log::warn!("REGISTRO_CIVIL_URL not set, cédulas are only format-checked");
                Ok(CedulaVerifier::FormatOnly(SerialFormatVerifier))
            }
        }
    }
}

impl DocumentVerifier for CedulaVerifier {
    async fn verify(&self, rut: &str, serie: Option<&str>) -> Vec<String> {
        match self {
            CedulaVerifier::FormatOnly(v) => v.verify(rut, serie).await,
            CedulaVerifier::Registry(v) => v.verify(rut, serie).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_current_and_old_serials() {
        let v = SerialFormatVerifier;
        assert!(v.check("11111111-1", Some("100.123.456")).is_empty());
        assert!(v.check("11111111-1", Some("100123456")).is_empty());
        assert!(v.check("11111111-1", Some("A012345678")).is_empty());
    }

    #[test]
    fn missing_serial_is_reported() {
        let errors = SerialFormatVerifier.check("11111111-1", None);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("11111111-1"));
        assert_eq!(SerialFormatVerifier.check("11111111-1", Some("  ")).len(), 1);
    }

    #[test]
    fn malformed_serial_is_reported() {
        for serie in ["12345", "1234567890", "AB12345678", "10012345X", "Ñ123456789"] {
            assert_eq!(SerialFormatVerifier.check("11111111-1", Some(serie)).len(), 1, "{serie}");
        }
    }

    #[test]
    fn config_without_url_selects_format_only() {
        let verifier = CedulaVerifier::from_config(&AppConfig::default()).unwrap();
        assert!(matches!(verifier, CedulaVerifier::FormatOnly(_)));
    }

    #[tokio::test]
    async fn unreachable_registry_yields_one_message() {
        let verifier = RegistryVerifier::new("http://127.0.0.1:9/verificar", Duration::from_millis(200)).unwrap();
        let errors = verifier.verify("11111111-1", Some("100123456")).await;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("No fue posible verificar"));
    }

    #[tokio::test]
    async fn registry_verifier_checks_format_before_calling_out() {
        let verifier = RegistryVerifier::new("http://127.0.0.1:9/verificar", Duration::from_millis(200)).unwrap();
        let errors = verifier.verify("11111111-1", Some("x")).await;
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("es inválido"));
    }
}
