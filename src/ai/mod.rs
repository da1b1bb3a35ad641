pub mod gemini;

use crate::config::AppConfig;
use crate::model::Deal;

/// Shown when the service answered but produced no usable text.
pub const ANALYSIS_EMPTY: &str = "No se pudo generar el análisis en este momento.";
/// Shown when the call failed outright; the caller never sees an error.
pub const ANALYSIS_FAILED: &str = "Error al conectar con la inteligencia artificial de Hungers.";

pub fn build_deal_prompt(deal: &Deal) -> String {
    format!(
        "Eres un experto consultor de ventas senior para \"Hungers\", un CRM de alimentos y logística.\n\
         Analiza el siguiente trato y proporciona 3 recomendaciones rápidas para cerrarlo.\n\
         Título: {}\n\
         Valor: ${}\n\
         Estado actual: {}\n\
         Contacto: {} de {}\n\
         Prioridad: {}\n\n\
         Formato de respuesta: Markdown breve con viñetas.",
        deal.title,
        deal.value,
        deal.status.as_str(),
        deal.contact_name,
        deal.organization,
        deal.priority.as_str(),
    )
}

/// One best-effort advisory request for a single deal. Always returns
/// text: failures degrade to a fixed message instead of propagating, and
/// nothing is retried or persisted.
pub async fn analyze_deal(config: &AppConfig, deal: &Deal) -> String {
    let prompt = build_deal_prompt(deal);
    match gemini::generate(config, &prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => ANALYSIS_EMPTY.to_string(),
        Err(err) => {
            log::error!("Deal analysis failed: {}", err);
            ANALYSIS_FAILED.to_string()
        }
    }
}
