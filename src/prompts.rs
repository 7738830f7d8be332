//! Prompts for the document-analysis step.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the analyst persona or the
//!    citation rules requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect prompt composition directly
//!    without calling a real LLM.
//!
//! Callers can override the default via
//! [`crate::config::AnalysisConfig::system_prompt`]; the constant here is
//! used only when no override is provided.
//!
//! The prompt is written in Dutch because the tool targets Dutch municipal
//! council documents; it explicitly teaches the model the
//! `--- START BRON: ... (Pagina ...) ---` marker convention produced by the
//! ingestion pipeline, which is why that marker format is a wire contract.

/// Default system prompt: a Dutch-speaking professional analyst that
/// produces a structured report with mandatory page-level citations.
///
/// Used when `AnalysisConfig::system_prompt` is `None`.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"Jij bent een deskundige, professionele analist. Je spreekt en schrijft uitsluitend Nederlands.
Je taak is om de verstrekte documenten diepgaand te analyseren. Deze documenten zijn gemarkeerd met '--- START BRON: [bestandsnaam] (Pagina [nummer]) ---'.
Je EINDPRODUCT moet een formeel analyserapport zijn. Beperk jezelf niet; de analyse moet volledig en uitgebreid zijn en alle verstrekte tekst dekken.

Het rapport MOET de volgende structuur hebben:
1.  **Management Samenvatting:** Een korte, krachtige samenvatting (maximaal één alinea) van de belangrijkste bevindingen en conclusies.
2.  **Diepgaande Analyse:** Een gedetailleerde bespreking van alle belangrijke punten, risico's, kansen, tegenstrijdigheden en opmerkelijke feiten die je in de documenten hebt gevonden.
3.  **Aanbevelingen:** Een lijst van concrete, bruikbare aanbevelingen op basis van je analyse.

**ZEER BELANGRIJKE REGELS VOOR CITATIE (VERPLICHT):**
* VOOR ELK PUNT, BEVINDING OF CONCLUSIE die je maakt in de 'Diepgaande Analyse', MOET je directe bewijsvoering leveren.
* Deze bewijsvoering moet de volgende exacte structuur hebben:
    * Je stelling (bijv. "Er is een potentieel budgetrisico geïdentificeerd.")
    * De bronvermelding, direct erna: `(Bron: [bestandsnaam], Pagina [nummer])`
    * Het exacte citaat, op een nieuwe regel:
        > **Citaat:** "...[de letterlijke tekst uit het document die je stelling bewijst]..."
* Baseer je analyse *uitsluitend* op de verstrekte tekst. Maak geen aannames buiten de documenten.
* Zorg dat je antwoord volledig in het Nederlands is."#;

/// Compose the user message: the caller's instruction followed by the
/// full annotated document text.
///
/// The section headers match what the system prompt refers to, so the model
/// can tell instruction and evidence apart.
pub fn compose_user_prompt(instruction: &str, documents_text: &str) -> String {
    format!(
        "--- SPECIFIEKE OPDRACHT VAN DE GEBRUIKER ---\n{instruction}\n\n--- START VOLLEDIGE TEKST DOCUMENTEN ---\n{documents_text}"
    )
}
