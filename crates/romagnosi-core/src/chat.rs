use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error};

use crate::{
    api::{ApiError, GeminiClient},
    provider::Service,
    quiz::QuizResult,
    types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig},
};

/// Shown to the student whenever a chat turn fails
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost. Try again later.";

/// Quick questions offered next to the chat
pub const FAQ_ITEMS: [&str; 4] = [
    "Quali indirizzi offre la scuola?",
    "Sbocchi Lavorativi (Money)",
    "Docenti & Crew",
    "Laboratori & Tech",
];

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

static SCHOOL_CONTEXT: &str = r#"
DATI SCUOLA (FONTE PTOF 2025-2028 ISIS G.D. ROMAGNOSI):
- Nome: ISIS G.D. ROMAGNOSI.
- Sede Centrale: Via Carducci 5, Erba (CO).
- Succursale (Sezione associata Beldosso): Via Eupilio 22, Longone al Segrino.

DOCENTI DI RIFERIMENTO:
- Economia Aziendale: Prof.sse Bonetto Cristina, Fabbri Michela, Invernizzi.

INDIRIZZI DI STUDIO:
1. ISTITUTO TECNICO ECONOMICO (Sede Erba):
   - Amministrazione, Finanza e Marketing (AFM).
   - Sistemi Informativi Aziendali (ITSI), informatica gestionale.
   - Turismo, lingue e valorizzazione del territorio.
2. ISTITUTO TECNICO TECNOLOGICO (Sede Erba):
   - Costruzioni, Ambiente e Territorio (CAT, ex Geometri).
   - Agraria, Agroalimentare e Agroindustria (Gestione Ambiente e Territorio).
3. ISTITUTO TECNICO TECNOLOGICO (Sede Longone al Segrino):
   - Elettronica ed Elettrotecnica (articolazione Automazione).
4. ISTITUTO PROFESSIONALE:
   - Enogastronomia e Ospitalità Alberghiera (Sede Longone/Erba).
   - Servizi per la Sanità e l'Assistenza Sociale (attivo dal 2024/25).

ATMOSFERA E PROGETTI:
- Ambiente accogliente, inclusivo, attento al "ben-essere" dello studente.
- Laboratori avanzati di automazione, informatica, linguistici.
- Erasmus+ (stage all'estero) ed eTwinning.
- PCTO (stage) con aziende del territorio (Como, Lecco, Brianza).
- Attenzione a studenti con BES/DSA e stranieri, sportello psicologico attivo.
- Trimestre + Pentamestre (Erba) o Quadrimestri (Beldosso).

FILOSOFIA:
Centralità dello studente, pensiero critico, cittadinanza attiva, dialogo costante docenti-studenti.
"#;

static PERSONA: &str = r#"
Sei "Romagnosi Bot", un assistente virtuale super simpatico dell'ISIS G.D. ROMAGNOSI.
Il tuo obiettivo è aiutare ragazzi e ragazze di 13-14 anni (terza media) a scegliere la loro futura scuola superiore.

IL TUO PERSONAGGIO:
- Sei uno studente dell'ultimo anno: esperto, affidabile, informale e alla mano.
- Parla in ITALIANO, con tono entusiasta e accogliente.
- Usa le emoji (👋, 🚀, 🏫, ✨) senza esagerare.
- Spiega i termini difficili (PCTO, Pentamestre, articolazione) in modo semplicissimo.

FORMATTAZIONE:
- Sii breve: resta sotto le 100 parole, salvo dettagli specifici.
- Usa elenchi puntati per materie e indirizzi.
- Usa il grassetto per le parole chiave.

COMPORTAMENTO:
1. Se chiedono "Cosa si studia?", chiedi prima cosa piace a loro (numeri, lingue o tecnologia?).
2. Se chiedono se la scuola è difficile: "Bisogna studiare, ma i prof ti aiutano e l'ambiente è sereno!".
3. Per domande fuori contesto rispondi simpaticamente che sei esperto solo del mondo Romagnosi.
4. La sede di Beldosso è a Longone al Segrino (Elettronica/Alberghiero).
"#;

pub fn system_instruction() -> String {
    format!("{PERSONA}\nCONTESTO SCUOLA:\n{SCHOOL_CONTEXT}")
}

/// Message sent to the chat once the quiz recommends a path
pub fn quiz_followup_message(result: &QuizResult) -> String {
    format!(
        "Ho completato il Setup del Colpo (Quiz) e il risultato è: \"{}\". Dammi i dettagli.",
        result.label()
    )
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Temperature {0} is outside [0, 1]")]
    InvalidTemperature(f32),

    #[error("Chat request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Empty response from model (block reason: {})", .block_reason.as_deref().unwrap_or("none"))]
    EmptyResponse { block_reason: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub system_instruction: String,
    pub temperature: f32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_instruction: system_instruction(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ChatConfig {
    pub fn with_temperature(mut self, temperature: f32) -> Result<Self, ChatError> {
        if !(0.0..=1.0).contains(&temperature) {
            return Err(ChatError::InvalidTemperature(temperature));
        }
        self.temperature = temperature;
        Ok(self)
    }
}

#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError>;
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        self.generate_content(Service::Chat, request).await
    }
}

/// Conversation with the school assistant. History lives only in memory.
pub struct SchoolChat<B = GeminiClient> {
    backend: B,
    config: ChatConfig,
    history: Vec<ChatTurn>,
}

impl<B: ChatBackend> SchoolChat<B> {
    pub fn new(backend: B, config: ChatConfig) -> Self {
        Self {
            backend,
            config,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: Some(Content::text(None, self.config.system_instruction.clone())),
            contents: self
                .history
                .iter()
                .map(|turn| Content::text(Some(turn.role.as_str()), turn.text.clone()))
                .collect(),
            generation_config: Some(GenerationConfig {
                temperature: Some(self.config.temperature),
                ..Default::default()
            }),
        }
    }

    /// Send one user message and return the model's reply. On failure the
    /// user turn is dropped again so the history only holds answered turns.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.history.push(ChatTurn {
            role: Role::User,
            text: text.to_string(),
        });

        match self.exchange().await {
            Ok(reply) => {
                self.history.push(ChatTurn {
                    role: Role::Model,
                    text: reply.clone(),
                });
                Ok(reply)
            }
            Err(e) => {
                error!("Chat Error: {}", e);
                self.history.pop();
                Err(e)
            }
        }
    }

    async fn exchange(&self) -> Result<String, ChatError> {
        let request = self.build_request();
        debug!(turns = request.contents.len(), "sending chat request");

        let response = self.backend.generate(&request).await?;
        response
            .text()
            .ok_or_else(|| ChatError::EmptyResponse {
                block_reason: response.block_reason().map(str::to_string),
            })
    }
}
